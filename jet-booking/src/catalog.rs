use serde::Serialize;

/// A bookable class of aircraft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AircraftCategory {
    pub id: u32,
    pub name: &'static str,
    pub image_url: &'static str,
}

static CATEGORIES: [AircraftCategory; 7] = [
    AircraftCategory {
        id: 1,
        name: "Turboprop",
        image_url: "https://dev-atlas.amalfijets.com/admin/assets/images/aircrafts_category/turboprop.png",
    },
    AircraftCategory {
        id: 2,
        name: "Light",
        image_url: "https://dev-atlas.amalfijets.com/admin/assets/images/aircrafts_category/light.png",
    },
    AircraftCategory {
        id: 3,
        name: "Midsize",
        image_url: "https://dev-atlas.amalfijets.com/admin/assets/images/aircrafts_category/midsize.png",
    },
    AircraftCategory {
        id: 4,
        name: "Super Midsize",
        image_url: "https://dev-atlas.amalfijets.com/admin/assets/images/aircrafts_category/super_midsize.png",
    },
    AircraftCategory {
        id: 5,
        name: "Heavy",
        image_url: "https://dev-atlas.amalfijets.com/admin/assets/images/aircrafts_category/heavy.png",
    },
    AircraftCategory {
        id: 6,
        name: "Ultra Long Haul",
        image_url: "https://dev-atlas.amalfijets.com/admin/assets/images/aircrafts_category/ultra_long_haul.png",
    },
    AircraftCategory {
        id: 7,
        name: "Helicopter",
        image_url: "https://dev-atlas.amalfijets.com/admin/assets/images/aircrafts_category/helicopter.png",
    },
];

pub fn all() -> &'static [AircraftCategory] {
    &CATEGORIES
}

pub fn by_id(id: u32) -> Option<&'static AircraftCategory> {
    CATEGORIES.iter().find(|c| c.id == id)
}

/// Case-insensitive lookup; underscores and dashes count as spaces.
pub fn by_name(name: &str) -> Option<&'static AircraftCategory> {
    let wanted = name.trim().replace(['_', '-'], " ");
    CATEGORIES
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(&wanted))
}
