//! Debounced place search
//!
//! Typing schedules a lookup after a quiet period. Every lookup carries a
//! sequence number; a newer keystroke aborts the pending task, and a result
//! is only applied while its sequence number is still the latest issued.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::geocoding::PlaceSearcher;
use crate::models::PlaceSuggestion;

/// What the search box and its dropdown show
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    /// Text in the search box
    pub query: String,
    pub suggestions: Vec<PlaceSuggestion>,
    /// Whether the dropdown is open
    pub show_suggestions: bool,
    /// A lookup is in flight
    pub is_loading: bool,
}

impl SearchState {
    /// Suggestions the dropdown actually renders
    #[must_use]
    pub fn visible_suggestions(&self) -> &[PlaceSuggestion] {
        if self.show_suggestions {
            &self.suggestions
        } else {
            &[]
        }
    }
}

pub struct PlaceSearch {
    searcher: Arc<dyn PlaceSearcher>,
    debounce: Duration,
    state: Arc<watch::Sender<SearchState>>,
    sequence: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
}

impl PlaceSearch {
    #[must_use]
    pub fn new(searcher: Arc<dyn PlaceSearcher>, debounce: Duration) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            searcher,
            debounce,
            state: Arc::new(state),
            sequence: Arc::new(AtomicU64::new(0)),
            pending: None,
        }
    }

    /// Observe search box state changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    #[must_use]
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// The user edited the search box.
    ///
    /// Blank input clears the suggestions at once and never reaches the
    /// geocoder; anything else is looked up once typing pauses.
    pub fn input_changed(&mut self, text: &str) {
        let seq = self.cancel_pending();
        let query = text.to_string();

        if query.trim().is_empty() {
            self.state.send_modify(|state| {
                state.query = query;
                state.suggestions.clear();
                state.show_suggestions = true;
                state.is_loading = false;
            });
            return;
        }

        self.state.send_modify(|state| {
            state.query.clone_from(&query);
            state.show_suggestions = true;
            state.is_loading = false;
        });

        let searcher = Arc::clone(&self.searcher);
        let state = Arc::clone(&self.state);
        let sequence = Arc::clone(&self.sequence);
        let debounce = self.debounce;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if sequence.load(Ordering::SeqCst) != seq {
                return;
            }

            state.send_if_modified(|s| {
                let current = sequence.load(Ordering::SeqCst) == seq;
                if current {
                    s.is_loading = true;
                }
                current
            });
            let result = searcher.search(&query).await;

            // Compared under the watch lock; `input_changed` bumps the sequence first
            let applied = state.send_if_modified(|s| {
                if sequence.load(Ordering::SeqCst) != seq {
                    return false;
                }
                s.is_loading = false;
                match &result {
                    Ok(suggestions) => s.suggestions.clone_from(suggestions),
                    Err(_) => s.suggestions.clear(),
                }
                true
            });

            match result {
                Ok(suggestions) if applied => {
                    debug!("{} suggestions for '{}'", suggestions.len(), query);
                }
                Err(e) if applied => {
                    warn!("Error searching locations for '{}': {}", query, e);
                }
                _ => debug!("Discarding suggestions for superseded query '{}'", query),
            }
        }));
    }

    /// Reopen the dropdown when the search box regains focus
    pub fn focus(&mut self) {
        self.state.send_modify(|state| state.show_suggestions = true);
    }

    /// Pick a suggestion from the dropdown.
    ///
    /// Puts its name in the search box and closes the dropdown; a lookup
    /// still waiting on the debounce timer is dropped.
    pub fn select(&mut self, index: usize) -> Option<PlaceSuggestion> {
        let picked = self.state.borrow().suggestions.get(index).cloned()?;
        self.cancel_pending();
        self.state.send_modify(|state| {
            state.query.clone_from(&picked.display_name);
            state.show_suggestions = false;
            state.is_loading = false;
        });
        Some(picked)
    }

    /// Enter / search button: close the dropdown and take the top suggestion
    pub fn submit(&mut self) -> Option<PlaceSuggestion> {
        if self.state.borrow().query.trim().is_empty() {
            return None;
        }
        self.state.send_modify(|state| state.show_suggestions = false);
        self.state.borrow().suggestions.first().cloned()
    }

    /// Put text in the search box without searching (favorite picks)
    pub fn set_query(&mut self, text: &str) {
        self.state.send_modify(|state| {
            state.query = text.to_string();
            state.show_suggestions = false;
        });
    }

    fn cancel_pending(&mut self) -> u64 {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl Drop for PlaceSearch {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
