use anyhow::Result;
use tracing_subscriber::EnvFilter;

use weathermap::{WeatherMapConfig, web};

fn init_tracing(config: &WeatherMapConfig) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "weathermap={},tower_http=info",
            config.logging.level
        ))
    });

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.pretty().init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = WeatherMapConfig::load()?;
    init_tracing(&config);

    tracing::info!("Starting weathermap {}", weathermap::VERSION);
    if config.weather.api_key.is_none() {
        tracing::warn!("No weather API key configured; weather panels will show errors");
    }

    web::run(config).await
}
