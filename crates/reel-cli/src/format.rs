//! Plain-text rendering for terminal output.

use std::fmt::Write;

use reel_api::{MovieDetail, MovieSummary};
use reel_core::models::{WatchedEntry, WatchedSummary};

pub fn search_results(results: &[MovieSummary]) -> String {
    let mut out = format!("Found {} results\n", results.len());
    for movie in results {
        let _ = writeln!(out, "  {:<11} {} ({})", movie.catalog_id, movie.title, movie.year);
    }
    out
}

pub fn movie_detail(movie: &MovieDetail, watched_rating: Option<u8>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", movie.title, movie.year);

    let released = movie.released.as_deref().unwrap_or("unknown release");
    match movie.runtime.as_deref() {
        Some(runtime) => {
            let _ = writeln!(out, "{released} • {runtime}");
        }
        None => {
            let _ = writeln!(out, "{released}");
        }
    }
    if let Some(genre) = &movie.genre {
        let _ = writeln!(out, "{genre}");
    }
    if let Some(rating) = &movie.rating {
        let _ = writeln!(out, "⭐ {rating} IMDb rating");
    }
    if let Some(plot) = &movie.plot {
        let _ = writeln!(out, "\n{plot}\n");
    }
    let cast = movie.cast();
    if !cast.is_empty() {
        let _ = writeln!(out, "Starring {}", cast.join(", "));
    }
    if let Some(director) = &movie.director {
        let _ = writeln!(out, "Directed by {director}");
    }
    if let Some(rating) = watched_rating {
        let _ = writeln!(out, "\nYou rated this movie {rating}/10");
    }
    out
}

pub fn watched_list(entries: &[WatchedEntry], summary: &WatchedSummary) -> String {
    let mut out = String::from("Movies you watched\n");
    let _ = writeln!(
        out,
        "  {} movies  ⭐ {:.1}  🌟 {:.1}  ⏳ {:.0} min",
        summary.count, summary.avg_catalog_rating, summary.avg_user_rating, summary.avg_runtime
    );
    for entry in entries {
        let runtime = entry
            .runtime_minutes
            .map(|m| format!("{m} min"))
            .unwrap_or_else(|| "?".into());
        let rating = entry
            .catalog_rating
            .map(|r| format!("{r:.1}"))
            .unwrap_or_else(|| "-".into());
        let _ = writeln!(
            out,
            "  {:<11} {} ({})  ⭐ {rating}  🌟 {}  ⏳ {runtime}",
            entry.catalog_id, entry.title, entry.year, entry.user_rating
        );
    }
    out
}
