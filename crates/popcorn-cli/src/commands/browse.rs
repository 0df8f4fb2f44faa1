use crate::output::Output;
use color_eyre::Result;
use popcorn_core::Session;
use popcorn_models::UserRating;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use super::context::AppContext;
use super::{search, show, ui, watchlist};

const HELP: &str = "\
  <text>      search for a title
  :N          open result N (again to close it)
  :close :esc close the open movie
  :add N      rate the open movie N/10 and add it to your watched list
  :rm ID      remove a movie from your watched list
  :watched    show your watched list
  :q          quit";

#[derive(Debug, PartialEq)]
enum BrowseCommand {
    Query(String),
    Select(usize),
    Close,
    Add(UserRating),
    Remove(String),
    Watched,
    Help,
    Quit,
    Invalid(String),
}

fn parse_command(line: &str) -> BrowseCommand {
    let line = line.trim_end_matches(&['\r', '\n'][..]);
    let Some(rest) = line.strip_prefix(':') else {
        return BrowseCommand::Query(line.to_string());
    };

    let mut parts = rest.trim().splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    match name {
        "q" | "quit" => BrowseCommand::Quit,
        "close" | "esc" => BrowseCommand::Close,
        "watched" | "w" => BrowseCommand::Watched,
        "help" | "h" | "?" => BrowseCommand::Help,
        "add" => match arg.parse::<u8>() {
            Ok(value) => match UserRating::new(value) {
                Ok(rating) => BrowseCommand::Add(rating),
                Err(e) => BrowseCommand::Invalid(e.to_string()),
            },
            Err(_) => BrowseCommand::Invalid("usage: :add <rating 1-10>".to_string()),
        },
        "rm" | "remove" if arg.is_empty() => BrowseCommand::Invalid("usage: :rm <imdb id>".to_string()),
        "rm" | "remove" => BrowseCommand::Remove(arg.to_string()),
        other => match other.parse::<usize>() {
            Ok(n) if n >= 1 => BrowseCommand::Select(n),
            _ => BrowseCommand::Invalid(format!("Unknown command ':{}' (try :help)", other)),
        },
    }
}

pub async fn run_browse(context: &AppContext, api_key: Option<String>, output: &Output) -> Result<()> {
    let session = context.open_session(api_key)?;
    let min_query_length = context.config.search.min_query_length;

    session.search().subscribe(|state| {
        debug!(
            query = %state.query,
            results = state.results.len(),
            is_loading = state.is_loading,
            error = %state.error,
            "Search state changed"
        );
    });
    session.subscribe_selection(|selection| debug!(?selection, "Selection changed"));

    output.info(format!("[{}] Type a title to search, :help for commands", session.document_title()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        output.print("> ")?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_command(&line) {
            BrowseCommand::Quit => break,
            BrowseCommand::Help => output.info(HELP),
            BrowseCommand::Query(query) => {
                let handle = session.set_query(query.as_str());
                let trimmed = query.trim();
                if handle.is_none() && !trimmed.is_empty() && trimmed.chars().count() < min_query_length {
                    output.warn(format!("Type at least {} characters to search", min_query_length));
                    continue;
                }
                ui::wait_for(handle, "Searching...", output.is_human()).await?;
                if !trimmed.is_empty() {
                    search::print_results(&session.search().state(), output);
                }
            }
            BrowseCommand::Select(n) => select(&session, n, output).await?,
            BrowseCommand::Close => {
                session.close();
                output.info(format!("[{}]", session.document_title()));
            }
            BrowseCommand::Add(rating) => {
                if let Err(e) = watchlist::add_current(&session, rating, output) {
                    output.error(e.to_string());
                }
            }
            BrowseCommand::Remove(imdb_id) => {
                if let Err(e) = watchlist::remove(session.watchlist(), &imdb_id, output) {
                    output.error(e.to_string());
                }
            }
            BrowseCommand::Watched => watchlist::print_watched(session.watchlist(), output),
            BrowseCommand::Invalid(msg) => output.warn(msg),
        }
    }

    Ok(())
}

async fn select(session: &Session, n: usize, output: &Output) -> Result<()> {
    let results = session.search().state().results;
    let Some(item) = results.get(n - 1) else {
        output.warn(format!("No result #{} (the list has {})", n, results.len()));
        return Ok(());
    };

    let handle = session.select(&item.imdb_id);
    if !session.selection().is_viewing() {
        output.info(format!("[{}]", session.document_title()));
        return Ok(());
    }

    ui::wait_for(handle, &format!("Loading {}...", item.title), output.is_human()).await?;
    if !show::print_detail(session, output) {
        output.error(format!("Unable to load movie {}", item.imdb_id));
    }
    Ok(())
}
