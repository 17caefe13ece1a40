//! Current-conditions and forecast panels for the active place
//!
//! Each panel loads on its own. A coordinate change aborts whatever the panel
//! was still fetching, so only the latest coordinate's data ever lands.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::Result;
use crate::i18n::{Language, TranslationKey, translate};
use crate::models::{Coordinate, CurrentConditions, DailyForecast};
use crate::weather::WeatherSource;

#[derive(Debug, Clone, PartialEq)]
pub enum PanelState<T> {
    Loading,
    Ready(T),
    /// Localized message shown in place of the data
    Error(String),
}

impl<T> PanelState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, PanelState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            PanelState::Ready(value) => Some(value),
            _ => None,
        }
    }
}

type Panel<T> = Arc<watch::Sender<PanelState<T>>>;

pub struct WeatherReadout {
    source: Arc<dyn WeatherSource>,
    current: Panel<CurrentConditions>,
    forecast: Panel<Vec<DailyForecast>>,
    current_task: Option<JoinHandle<()>>,
    forecast_task: Option<JoinHandle<()>>,
}

impl WeatherReadout {
    #[must_use]
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        let (current, _) = watch::channel(PanelState::Loading);
        let (forecast, _) = watch::channel(PanelState::Loading);
        Self {
            source,
            current: Arc::new(current),
            forecast: Arc::new(forecast),
            current_task: None,
            forecast_task: None,
        }
    }

    /// Refetch both panels for `coordinate`, even if it did not change
    pub fn refresh(&mut self, coordinate: Coordinate, language: Language) {
        self.abort_pending();

        let source = Arc::clone(&self.source);
        self.current_task = Some(spawn_panel(
            Arc::clone(&self.current),
            async move { source.current(coordinate).await },
            translate(language, TranslationKey::WeatherLoadFailed),
            "current weather",
            coordinate,
        ));

        let source = Arc::clone(&self.source);
        self.forecast_task = Some(spawn_panel(
            Arc::clone(&self.forecast),
            async move { source.forecast(coordinate).await },
            translate(language, TranslationKey::ForecastLoadFailed),
            "forecast",
            coordinate,
        ));
    }

    pub fn current(&self) -> watch::Receiver<PanelState<CurrentConditions>> {
        self.current.subscribe()
    }

    pub fn forecast(&self) -> watch::Receiver<PanelState<Vec<DailyForecast>>> {
        self.forecast.subscribe()
    }

    pub fn current_state(&self) -> PanelState<CurrentConditions> {
        self.current.borrow().clone()
    }

    pub fn forecast_state(&self) -> PanelState<Vec<DailyForecast>> {
        self.forecast.borrow().clone()
    }

    fn abort_pending(&mut self) {
        for task in [self.current_task.take(), self.forecast_task.take()]
            .into_iter()
            .flatten()
        {
            task.abort();
        }
    }
}

impl Drop for WeatherReadout {
    fn drop(&mut self) {
        self.abort_pending();
    }
}

fn spawn_panel<T, F>(
    panel: Panel<T>,
    fetch: F,
    failure_text: &'static str,
    what: &'static str,
    coordinate: Coordinate,
) -> JoinHandle<()>
where
    T: Send + Sync + 'static,
    F: Future<Output = Result<T>> + Send + 'static,
{
    panel.send_replace(PanelState::Loading);
    tokio::spawn(async move {
        match fetch.await {
            Ok(data) => {
                info!("Loaded {} for ({})", what, coordinate);
                panel.send_replace(PanelState::Ready(data));
            }
            Err(e) => {
                error!("Error fetching {} for ({}): {}", what, coordinate, e);
                panel.send_replace(PanelState::Error(failure_text.to_string()));
            }
        }
    })
}
