use clap::{ArgAction, Parser, Subcommand};
use commands::{browse, config, context::AppContext, search, show, watchlist};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "popcorn")]
#[command(about = "popcorn - Search movies and keep a rated list of what you've watched")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// OMDb API key for this run (overrides the stored key)
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// Write logs to this file (rotated daily) instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search OMDb by title
    Search {
        /// Title to search for
        query: String,
    },
    /// Show the full details of one movie
    Show {
        /// IMDb identifier (e.g. tt0068646)
        imdb_id: String,
    },
    /// Rate a movie and add it to the watched list
    #[command(long_about = "Fetch a movie's details, rate it and add it to the watched list. Prompts for the rating (1-10) when --rating is not given.")]
    Add {
        /// IMDb identifier (e.g. tt0068646)
        imdb_id: String,

        /// Your rating, 1 to 10
        #[arg(long, short)]
        rating: Option<u8>,
    },
    /// Remove a movie from the watched list
    Remove {
        /// IMDb identifier of the watched movie
        imdb_id: String,
    },
    /// Show the watched list and its averages
    Watched,
    /// Interactive search, detail and rating loop
    #[command(long_about = "Interactive session. Type a title to search; ':N' opens the Nth result (again to close), ':close' or ':esc' closes it, ':add N' rates the open movie and adds it, ':rm ID' removes a watched movie, ':watched' lists them and ':q' quits.")]
    Browse,
    /// Store the OMDb API key and inspect settings
    #[command(long_about = "Store the OMDb API key in the credentials file, or show the active configuration and file locations. With no flags, prompts for the key.")]
    Config {
        /// API key to store
        #[arg(long, value_name = "KEY")]
        api_key: Option<String>,

        /// Show configuration and file locations
        #[arg(long, action = ArgAction::SetTrue)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let context = AppContext::load()?;
    let log_file = context.log_file(cli.log_file.clone(), matches!(cli.command, Commands::Browse));

    logging::init_logging(cli.verbose, cli.quiet, &context.config.logging.level, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);
    let api_key = cli.api_key;

    match cli.command {
        Commands::Search { query } => search::run_search(&context, api_key, &query, &output).await,
        Commands::Show { imdb_id } => show::run_show(&context, api_key, &imdb_id, &output).await,
        Commands::Add { imdb_id, rating } => watchlist::run_add(&context, api_key, &imdb_id, rating, &output).await,
        Commands::Remove { imdb_id } => watchlist::run_remove(&context, &imdb_id, &output),
        Commands::Watched => watchlist::run_watched(&context, &output),
        Commands::Browse => browse::run_browse(&context, api_key, &output).await,
        Commands::Config { api_key: new_key, show } => config::run_config(&context, new_key, show, &output),
    }
}
