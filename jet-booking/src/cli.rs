use clap::{Args, Parser, Subcommand};

use crate::search::SearchSlot;

#[derive(Debug, Parser)]
#[command(name = "jet-booking")]
#[command(about = "Private jet booking requests with live airport search")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Search airports interactively, reading one query edit per stdin line
    Search(SearchArgs),
    /// Find both airports, fill in a booking request and submit it
    Book(BookArgs),
    /// List aircraft categories
    Categories,
    /// Print config path and create default file if missing
    ConfigPath,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Which airport the search is for
    #[arg(long, value_enum, default_value_t = SearchSlot::Departure)]
    pub slot: SearchSlot,
    /// Print every state change as a JSON line
    #[arg(long)]
    pub json: bool,
    /// Use built-in airports instead of the network
    #[arg(long)]
    pub dev: bool,
}

#[derive(Debug, Args)]
pub struct BookArgs {
    /// Departure airport search text
    #[arg(long)]
    pub from: String,
    /// Arrival airport search text
    #[arg(long)]
    pub to: String,
    /// Departure date and time (RFC 3339), defaults to now
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long, default_value_t = 1)]
    pub passengers: u8,
    /// Aircraft category name, e.g. "Super Midsize"
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long, default_value = "")]
    pub notes: String,
    /// Use built-in airports instead of the network
    #[arg(long)]
    pub dev: bool,
}
