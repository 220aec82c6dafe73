use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::search::{AirportSearchController, SearchSlot, SearchViewState};

/// Feeds each input line to the controller as a query edit and prints every
/// state change until input ends and the last query has settled.
pub async fn run_search_session<R>(
    input: R,
    controller: &AirportSearchController,
    slot: SearchSlot,
    json: bool,
) -> Result<SearchViewState>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut updates = controller.subscribe();
    let mut last_printed = SearchViewState::default();

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(query) => controller.set_query(query),
                None => break,
            },
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                print_if_changed(&mut last_printed, state, slot, json)?;
            }
        }
    }

    let final_state = controller
        .wait_until_idle()
        .await
        .unwrap_or_else(|| controller.snapshot());
    print_if_changed(&mut last_printed, final_state.clone(), slot, json)?;
    controller.shutdown();

    Ok(final_state)
}

fn print_if_changed(
    last: &mut SearchViewState,
    state: SearchViewState,
    slot: SearchSlot,
    json: bool,
) -> Result<()> {
    if *last == state {
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string(&state)?);
    } else {
        println!("{}", render(&state, slot));
    }
    *last = state;
    Ok(())
}

fn render(state: &SearchViewState, slot: SearchSlot) -> String {
    let mut out = format!("[{slot}] query: {:?}", state.query);
    if state.is_loading {
        out.push_str(" (searching...)");
    }
    for airport in &state.results {
        out.push_str(&format!(
            "\n  {:<5} {} - {}",
            airport.code(),
            airport.name,
            airport.location_label()
        ));
    }
    if let Some(error) = &state.error_message {
        out.push_str(&format!("\n  ! {error}"));
    }
    out
}
