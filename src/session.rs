//! One visitor's map page: search box, favorites, active place and weather
//!
//! All services are injected, so a session can run against the real HTTP
//! clients or against in-process fakes.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::Result;
use crate::config::WeatherMapConfig;
use crate::favorites::{FavoritesStore, Notice};
use crate::geocoding::PlaceSearcher;
use crate::i18n::{Language, TranslationKey, translate};
use crate::location_resolver::ResolvedLocation;
use crate::models::{ActivePlace, Coordinate, CurrentConditions, DailyForecast, FavoriteLocation};
use crate::readout::{PanelState, WeatherReadout};
use crate::search::{PlaceSearch, SearchState};
use crate::store::KeyValueStore;
use crate::weather::WeatherSource;

pub struct MapSession {
    search: PlaceSearch,
    favorites: FavoritesStore,
    readout: WeatherReadout,
    active: watch::Sender<ActivePlace>,
    language: Language,
}

impl MapSession {
    pub fn new(
        searcher: Arc<dyn PlaceSearcher>,
        weather: Arc<dyn WeatherSource>,
        store: Arc<dyn KeyValueStore>,
        initial: ResolvedLocation,
        config: &WeatherMapConfig,
    ) -> Self {
        let (active, _) = watch::channel(ActivePlace::new(initial.city, initial.coordinate));
        Self {
            search: PlaceSearch::new(searcher, config.geocoding.debounce()),
            favorites: FavoritesStore::new(store),
            readout: WeatherReadout::new(weather),
            active,
            language: Language::default(),
        }
    }

    /// Load saved favorites and fetch weather for the initial place
    pub async fn start(&mut self) -> Vec<FavoriteLocation> {
        let favorites = self.favorites.load().await;
        let place = self.active.borrow().clone();
        info!(
            "Session starting at {} ({}) with {} favorites",
            place.display_name,
            place.coordinate,
            favorites.len()
        );
        self.readout.refresh(place.coordinate, self.language);
        favorites
    }

    pub fn search_input(&mut self, text: &str) {
        self.search.input_changed(text);
    }

    pub fn search_focus(&mut self) {
        self.search.focus();
    }

    /// Make the suggestion at `index` the active place
    pub fn select_suggestion(&mut self, index: usize) -> Option<ActivePlace> {
        let suggestion = self.search.select(index)?;
        let place = ActivePlace::from(suggestion);
        self.set_active(place.clone());
        Some(place)
    }

    /// Search button / Enter: jump to the top suggestion if there is one
    pub fn submit_search(&mut self) -> Option<ActivePlace> {
        let suggestion = self.search.submit()?;
        let place = ActivePlace::from(suggestion);
        self.set_active(place.clone());
        Some(place)
    }

    pub async fn add_active_to_favorites(&self) -> Result<Notice> {
        let place = self.active.borrow().clone();
        self.favorites.add(place.into()).await
    }

    pub async fn remove_favorite(&self, coordinate: Coordinate) -> Result<Notice> {
        self.favorites.remove(coordinate).await
    }

    /// Jump to a saved place; its name goes into the search box
    pub async fn select_favorite(&mut self, coordinate: Coordinate) -> Option<ActivePlace> {
        let Some(favorite) = self.favorites.select(coordinate).await else {
            warn!("No favorite at ({})", coordinate);
            return None;
        };
        self.search.set_query(&favorite.display_name);
        let place = ActivePlace::from(favorite);
        self.set_active(place.clone());
        Some(place)
    }

    pub fn set_language(&mut self, language: Language) {
        debug!("Switching language to {}", language);
        self.language = language;
    }

    pub fn toggle_language(&mut self) -> Language {
        self.set_language(self.language.toggle());
        self.language
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    #[must_use]
    pub fn translate(&self, key: TranslationKey) -> &'static str {
        translate(self.language, key)
    }

    /// Localized toast text for a favorites notice
    #[must_use]
    pub fn notice_text(&self, notice: &Notice) -> &'static str {
        self.translate(notice.key())
    }

    #[must_use]
    pub fn active_place(&self) -> ActivePlace {
        self.active.borrow().clone()
    }

    pub fn subscribe_active(&self) -> watch::Receiver<ActivePlace> {
        self.active.subscribe()
    }

    pub async fn favorites(&self) -> Vec<FavoriteLocation> {
        self.favorites.list().await
    }

    #[must_use]
    pub fn search_state(&self) -> SearchState {
        self.search.state()
    }

    pub fn subscribe_search(&self) -> watch::Receiver<SearchState> {
        self.search.subscribe()
    }

    pub fn current_weather(&self) -> watch::Receiver<PanelState<CurrentConditions>> {
        self.readout.current()
    }

    pub fn forecast(&self) -> watch::Receiver<PanelState<Vec<DailyForecast>>> {
        self.readout.forecast()
    }

    fn set_active(&mut self, place: ActivePlace) {
        debug!("Active place is now {} ({})", place.display_name, place.coordinate);
        let coordinate = place.coordinate;
        self.active.send_replace(place);
        self.readout.refresh(coordinate, self.language);
    }
}
