use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use popcorn_core::{Session, SessionError, WatchlistManager};
use popcorn_models::UserRating;
use serde_json::json;
use super::context::AppContext;
use super::{prompts, render, show, ui};

pub async fn run_add(
    context: &AppContext,
    api_key: Option<String>,
    imdb_id: &str,
    rating: Option<u8>,
    output: &Output,
) -> Result<()> {
    // Validate before touching the network
    let rating = rating
        .map(UserRating::new)
        .transpose()
        .map_err(|e| eyre!("{}", e))?;

    let session = context.open_session(api_key)?;

    if let Some(existing) = session.watchlist().user_rating_for(imdb_id) {
        output.warn(render::rated_line(existing));
        return Ok(());
    }

    show::open(&session, imdb_id, output).await?;
    let title = session
        .detail()
        .state()
        .loaded()
        .map(|d| d.title.clone())
        .ok_or_else(|| eyre!("Unable to load movie {}", imdb_id))?;

    let rating = match rating {
        Some(rating) => rating,
        None if ui::is_interactive() => prompts::prompt_rating(&title)?,
        None => return Err(eyre!("--rating is required when not running in a terminal")),
    };

    add_current(&session, rating, output)
}

/// Add the open movie with `rating` and report the outcome
pub fn add_current(session: &Session, rating: UserRating, output: &Output) -> Result<()> {
    match session.add_current(rating) {
        Ok(record) => {
            if output.is_json() {
                output.json(&json!({ "added": record }));
            } else {
                output.success(format!("Added {} ({}) with {}/10", record.title, record.year, rating));
            }
            Ok(())
        }
        Err(SessionError::AlreadyWatched(id)) => {
            output.warn(format!("{} is already in your watched list", id));
            Ok(())
        }
        Err(e) => Err(eyre!("{}", e)),
    }
}

pub fn run_remove(context: &AppContext, imdb_id: &str, output: &Output) -> Result<()> {
    remove(&context.watchlist(), imdb_id, output)
}

pub fn remove(watchlist: &WatchlistManager, imdb_id: &str, output: &Output) -> Result<()> {
    let title = watchlist.get(imdb_id).map(|r| r.title);
    let removed = watchlist.remove(imdb_id).map_err(|e| eyre!("{}", e))?;

    if output.is_json() {
        output.json(&json!({ "removed": removed, "imdb_id": imdb_id }));
    } else if removed {
        output.success(format!("Removed {}", title.as_deref().unwrap_or(imdb_id)));
    } else {
        output.warn(format!("{} is not in your watched list", imdb_id));
    }
    Ok(())
}

pub fn run_watched(context: &AppContext, output: &Output) -> Result<()> {
    print_watched(&context.watchlist(), output);
    Ok(())
}

pub fn print_watched(watchlist: &WatchlistManager, output: &Output) {
    let summary = watchlist.summary();
    let records = watchlist.records();

    if output.is_json() {
        output.json(&json!({ "summary": summary, "watched": records }));
        return;
    }

    output.info("MOVIES YOU WATCHED");
    output.info(render::summary_line(&summary));
    if !records.is_empty() {
        output.info(render::watched_table(&records).to_string());
    }
}
