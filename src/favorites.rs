//! Saved places, persisted as one JSON array in the key-value store

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::Result;
use crate::i18n::TranslationKey;
use crate::models::{Coordinate, FavoriteLocation};
use crate::store::KeyValueStore;

/// Storage key of the favorites list
pub const FAVORITES_KEY: &str = "favoriteLocations";

/// Toast shown after a favorites mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    AddedToFavorites,
    AlreadyInFavorites,
    RemovedFromFavorites { display_name: Option<String> },
}

impl Notice {
    #[must_use]
    pub fn key(&self) -> TranslationKey {
        match self {
            Notice::AddedToFavorites => TranslationKey::AddedToFavorites,
            Notice::AlreadyInFavorites => TranslationKey::AlreadyInFavorites,
            Notice::RemovedFromFavorites { .. } => TranslationKey::RemovedFromFavorites,
        }
    }
}

pub struct FavoritesStore {
    store: Arc<dyn KeyValueStore>,
    favorites: Mutex<Vec<FavoriteLocation>>,
}

impl FavoritesStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            favorites: Mutex::new(Vec::new()),
        }
    }

    /// Read the persisted list, replacing whatever is held in memory.
    ///
    /// Missing or unreadable data yields an empty list.
    pub async fn load(&self) -> Vec<FavoriteLocation> {
        let loaded = match self.store.get(FAVORITES_KEY).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<Vec<FavoriteLocation>>(&bytes) {
                Ok(list) => list,
                Err(e) => {
                    warn!("Stored favorites are corrupt, starting empty: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Could not read favorites: {}", e);
                Vec::new()
            }
        };

        debug!("Loaded {} favorites", loaded.len());
        let mut favorites = self.favorites.lock().await;
        *favorites = loaded.clone();
        loaded
    }

    /// Append `place` unless a favorite already has its exact coordinate
    pub async fn add(&self, place: FavoriteLocation) -> Result<Notice> {
        let mut favorites = self.favorites.lock().await;
        if favorites.iter().any(|f| f.coordinate == place.coordinate) {
            debug!("{} is already a favorite", place.display_name);
            return Ok(Notice::AlreadyInFavorites);
        }

        info!("Adding favorite {} ({})", place.display_name, place.coordinate);
        let mut next = favorites.clone();
        next.push(place);
        self.persist(&next).await?;
        *favorites = next;
        Ok(Notice::AddedToFavorites)
    }

    /// Remove every favorite at `coordinate`
    pub async fn remove(&self, coordinate: Coordinate) -> Result<Notice> {
        let mut favorites = self.favorites.lock().await;
        let display_name = favorites
            .iter()
            .find(|f| f.coordinate == coordinate)
            .map(|f| f.display_name.clone());

        let next: Vec<FavoriteLocation> = favorites
            .iter()
            .filter(|f| f.coordinate != coordinate)
            .cloned()
            .collect();
        self.persist(&next).await?;
        *favorites = next;

        if let Some(name) = &display_name {
            info!("Removed favorite {}", name);
        }
        Ok(Notice::RemovedFromFavorites { display_name })
    }

    pub async fn select(&self, coordinate: Coordinate) -> Option<FavoriteLocation> {
        self.favorites
            .lock()
            .await
            .iter()
            .find(|f| f.coordinate == coordinate)
            .cloned()
    }

    pub async fn list(&self) -> Vec<FavoriteLocation> {
        self.favorites.lock().await.clone()
    }

    async fn persist(&self, favorites: &[FavoriteLocation]) -> Result<()> {
        let bytes = serde_json::to_vec(favorites)?;
        self.store.put(FAVORITES_KEY, bytes).await
    }
}
