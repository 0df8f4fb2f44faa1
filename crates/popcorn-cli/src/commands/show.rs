use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use popcorn_core::Session;
use serde_json::json;
use super::context::AppContext;
use super::{render, ui};

pub async fn run_show(context: &AppContext, api_key: Option<String>, imdb_id: &str, output: &Output) -> Result<()> {
    let session = context.open_session(api_key)?;
    open(&session, imdb_id, output).await?;

    if !print_detail(&session, output) {
        return Err(eyre!("Unable to load movie {}", imdb_id));
    }
    Ok(())
}

/// Select `imdb_id` in the session and wait for its detail
pub async fn open(session: &Session, imdb_id: &str, output: &Output) -> Result<()> {
    if session.selection().selected_id() == Some(imdb_id) {
        return Ok(());
    }
    let handle = session.select(imdb_id);
    ui::wait_for(handle, &format!("Loading {}...", imdb_id), output.is_human()).await
}

/// Print the open movie; `false` when no detail is loaded
pub fn print_detail(session: &Session, output: &Output) -> bool {
    let state = session.detail().state();
    let Some(detail) = state.loaded() else {
        return false;
    };
    let user_rating = session.current_user_rating();

    if output.is_json() {
        output.json(&json!({
            "title": session.document_title(),
            "detail": detail,
            "is_top": detail.is_top(),
            "user_rating": user_rating,
        }));
        return true;
    }

    output.info(format!("[{}]", session.document_title()));
    output.info(render::detail_table(detail).to_string());
    match user_rating {
        Some(rating) => output.info(render::rated_line(rating)),
        None => output.info("Not in your watched list yet"),
    }
    true
}
