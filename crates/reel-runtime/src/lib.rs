mod detail;
mod error;
mod events;
mod search;
mod task;
mod title;

#[cfg(test)]
mod testing;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reel_api::omdb::OmdbClient;
use reel_api::{CatalogService, MovieDetail};
use reel_core::config::AppConfig;
use reel_core::error::ReelError;
use reel_core::models::{WatchedEntry, WatchedSummary};
use reel_core::storage::{KeyValueStore, Storage};
use reel_core::watched::{AddOutcome, WatchedList};

pub use detail::{DetailLoader, DetailView, Selection};
pub use error::{LoadError, RuntimeError};
pub use events::{EventBus, Key, Subscription};
pub use search::{QueryChange, SearchSession, SearchView};
pub use title::{movie_title, TerminalTitle, TitleGuard, TitleSink};

/// Lock a mutex, recovering the data if a panicking holder poisoned it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Everything the application holds between user actions.
///
/// Built once by [`AppState::init`], which loads the watched list from its
/// snapshot. Dropping it cancels in-flight fetches and restores the window
/// title.
pub struct AppState<S> {
    search: SearchSession<S>,
    detail: DetailLoader<S>,
    watched: Mutex<WatchedList>,
    events: EventBus,
    focus_requested: Arc<AtomicBool>,
    _focus: Subscription,
}

impl AppState<OmdbClient> {
    /// Wire the OMDb client, the on-disk database and the terminal title.
    pub fn from_config(config: &AppConfig) -> Result<Self, RuntimeError> {
        let client = OmdbClient::new(config.api_key()?, config.catalog.base_url.clone());
        let db_path = AppConfig::ensure_db_path()?;
        let storage = Storage::open(&db_path)?;
        tracing::debug!(path = %db_path.display(), "Opened database");

        Ok(Self::init(
            client,
            Box::new(storage),
            Arc::new(TerminalTitle::stderr()),
            config,
        ))
    }
}

impl<S: CatalogService + 'static> AppState<S> {
    pub fn init(
        service: S,
        store: Box<dyn KeyValueStore>,
        title: Arc<dyn TitleSink>,
        config: &AppConfig,
    ) -> Self {
        let service = Arc::new(service);
        let events = EventBus::new();

        let focus_requested = Arc::new(AtomicBool::new(false));
        let flag = focus_requested.clone();
        let focus = events.subscribe(Key::Enter, move || flag.store(true, Ordering::SeqCst));

        Self {
            search: SearchSession::new(service.clone(), config.catalog.min_query_len),
            detail: DetailLoader::new(
                service,
                events.clone(),
                title,
                config.general.default_title.clone(),
            ),
            watched: Mutex::new(WatchedList::load(store)),
            events,
            focus_requested,
            _focus: focus,
        }
    }

    // ── Search ──────────────────────────────────────────────────

    /// Apply a query edit. A searchable query closes the open details first.
    pub fn set_query(&self, query: impl Into<String>) -> QueryChange {
        let query = query.into();
        if self.search.is_searchable(&query) {
            self.detail.close();
        }
        self.search.set_query(query)
    }

    pub fn search_view(&self) -> SearchView {
        self.search.view()
    }

    // ── Details ─────────────────────────────────────────────────

    /// Select a search result; selecting the open one again closes it.
    pub fn select(&self, catalog_id: &str) -> Selection {
        self.detail.toggle(catalog_id)
    }

    pub fn close_detail(&self) -> bool {
        self.detail.close()
    }

    pub fn detail_view(&self) -> DetailView {
        self.detail.view()
    }

    // ── Keyboard ────────────────────────────────────────────────

    pub fn press(&self, key: Key) -> usize {
        self.events.dispatch(key)
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Whether Enter asked for the search input since the last call.
    pub fn take_focus_request(&self) -> bool {
        self.focus_requested.swap(false, Ordering::SeqCst)
    }

    // ── Watched list ────────────────────────────────────────────

    /// Add the open movie with the user's rating, then close its details.
    pub fn add_watched(&self, user_rating: u8) -> Result<AddOutcome, RuntimeError> {
        let view = self.detail.view();
        let movie = match (view.movie, view.selected) {
            (Some(movie), _) => movie,
            (None, Some(id)) if view.loading => return Err(RuntimeError::StillLoading(id)),
            (None, _) => return Err(RuntimeError::NothingSelected),
        };

        let entry = watched_entry(&movie, user_rating)?;
        let outcome = lock(&self.watched).add(entry)?;
        self.detail.close();
        Ok(outcome)
    }

    pub fn remove_watched(&self, catalog_id: &str) -> Result<bool, RuntimeError> {
        Ok(lock(&self.watched).remove(catalog_id)?)
    }

    pub fn watched(&self) -> Vec<WatchedEntry> {
        lock(&self.watched).entries().to_vec()
    }

    pub fn watched_summary(&self) -> WatchedSummary {
        lock(&self.watched).summary()
    }

    /// The user's rating for `catalog_id`, if it is on the watched list.
    pub fn watched_rating(&self, catalog_id: &str) -> Option<u8> {
        lock(&self.watched).user_rating(catalog_id)
    }
}

/// Build a watched entry from a loaded record and the user's rating.
pub fn watched_entry(movie: &MovieDetail, user_rating: u8) -> Result<WatchedEntry, ReelError> {
    Ok(WatchedEntry {
        catalog_id: movie.catalog_id.clone(),
        title: movie.title.clone(),
        year: movie.year.clone(),
        poster_url: movie.poster_url.clone(),
        runtime_minutes: movie.runtime_minutes(),
        catalog_rating: movie.catalog_rating(),
        user_rating: WatchedEntry::check_rating(user_rating)?,
    })
}
