mod format;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use reel_core::config::AppConfig;
use reel_core::storage::Storage;
use reel_core::watched::{AddOutcome, WatchedList};
use reel_runtime::{AppState, QueryChange, RuntimeError, Selection};
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "reel")]
#[command(about = "Search movies and keep a rated list of what you've watched")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog by title
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Show full details for a catalog id (e.g. tt0816692)
    Show { id: String },
    /// Rate a movie and add it to the watched list
    Add {
        id: String,

        /// Your rating, 1-10
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=10))]
        rating: u8,
    },
    /// Remove a movie from the watched list
    Remove { id: String },
    /// Show the watched list with averages
    List,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("reel=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<ExitCode, RuntimeError> {
    let config = AppConfig::load()?;

    match command {
        Commands::Remove { id } => {
            let mut watched = open_watched()?;
            if watched.remove(&id)? {
                println!("Removed {id}");
            } else {
                println!("{id} is not on the watched list");
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::List => {
            let watched = open_watched()?;
            print!("{}", format::watched_list(watched.entries(), &watched.summary()));
            Ok(ExitCode::SUCCESS)
        }
        other => run_with_catalog(other, &config).await,
    }
}

async fn run_with_catalog(command: Commands, config: &AppConfig) -> Result<ExitCode, RuntimeError> {
    let state = AppState::from_config(config)?;
    match command {
        Commands::Search { query } => {
            match state.set_query(query.join(" ")) {
                QueryChange::Started(handle) => settle(handle).await,
                QueryChange::Cleared => {
                    eprintln!(
                        "Search needs at least {} characters",
                        config.catalog.min_query_len
                    );
                    return Ok(ExitCode::FAILURE);
                }
            }
            let view = state.search_view();
            if let Some(error) = view.error {
                eprintln!("{error}");
                return Ok(ExitCode::FAILURE);
            }
            print!("{}", format::search_results(&view.results));
        }
        Commands::Show { id } => {
            if !load_details(&state, &id).await {
                return Ok(ExitCode::FAILURE);
            }
            if let Some(movie) = state.detail_view().movie {
                print!(
                    "{}",
                    format::movie_detail(&movie, state.watched_rating(&movie.catalog_id))
                );
            }
        }
        Commands::Add { id, rating } => {
            if !load_details(&state, &id).await {
                return Ok(ExitCode::FAILURE);
            }
            let title = state
                .detail_view()
                .movie
                .map(|m| m.title)
                .unwrap_or_else(|| id.clone());
            match state.add_watched(rating)? {
                AddOutcome::Added => println!("Added {title} ({rating}/10)"),
                AddOutcome::AlreadyWatched => {
                    let previous = state.watched_rating(&id).unwrap_or_default();
                    println!("Already watched {title}, rated {previous}/10");
                }
            }
        }
        Commands::Remove { .. } | Commands::List => {}
    }

    Ok(ExitCode::SUCCESS)
}

/// Open the details for `id` and wait for them. Prints and returns `false`
/// on failure.
async fn load_details(state: &AppState<reel_api::omdb::OmdbClient>, id: &str) -> bool {
    match state.select(id) {
        Selection::Opened(handle) => settle(handle).await,
        Selection::Closed => return false,
    }
    match state.detail_view().error {
        Some(error) => {
            eprintln!("{id}: {error}");
            false
        }
        None => true,
    }
}

/// The watched list alone, for commands that never reach the catalog.
fn open_watched() -> Result<WatchedList, RuntimeError> {
    let storage = Storage::open(&AppConfig::ensure_db_path()?)?;
    Ok(WatchedList::load(Box::new(storage)))
}

async fn settle(handle: JoinHandle<()>) {
    if let Err(e) = handle.await {
        tracing::error!(error = %e, "Fetch task failed");
    }
}
