mod watched;

pub use watched::{WatchedEntry, WatchedSummary};
