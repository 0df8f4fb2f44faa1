use crate::output::Output;
use color_eyre::Result;
use popcorn_core::SearchState;
use serde_json::json;
use super::context::AppContext;
use super::{render, ui};

pub async fn run_search(context: &AppContext, api_key: Option<String>, query: &str, output: &Output) -> Result<()> {
    let session = context.open_session(api_key)?;

    let handle = session.set_query(query);
    if handle.is_none() {
        output.warn(format!(
            "Type at least {} characters to search",
            context.config.search.min_query_length
        ));
        return Ok(());
    }
    ui::wait_for(handle, &format!("Searching for \"{}\"...", query.trim()), output.is_human()).await?;

    print_results(&session.search().state(), output);
    Ok(())
}

/// Shared with browse: error line, or count plus table
pub fn print_results(state: &SearchState, output: &Output) {
    if output.is_json() {
        let error = state.has_error().then_some(&state.error);
        output.json(&json!({
            "query": state.query,
            "results": state.results,
            "error": error,
        }));
        return;
    }

    if state.has_error() {
        output.error(&state.error);
        return;
    }

    output.info(format!("Found {} results", state.results.len()));
    if !state.results.is_empty() {
        output.info(render::results_table(&state.results).to_string());
    }
}
