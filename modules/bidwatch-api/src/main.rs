use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bidwatch_api::{build_router, AppState};
use bidwatch_common::Config;
use bidwatch_fetch::{AdapterRegistry, CardHobbyAdapter, FetchPipeline, ReqwestTransport};
use bidwatch_store::{ItemStore, JsonFileStore};
use bidwatch_tracker::{start_refresh_interval, ExchangeRateService, Tracker};

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("bidwatch=info".parse()?)
        .add_directive("exchange_rate_client=info".parse()?);

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing()?;
    config.log_redacted();

    let store: Arc<dyn ItemStore> = Arc::new(JsonFileStore::open(&config.data_path).await?);

    let registry = AdapterRegistry::new().register(
        CardHobbyAdapter::new().with_close_offset_hours(config.cardhobby_close_offset_hours),
    );
    let pipeline = Arc::new(FetchPipeline::new(
        registry,
        Arc::new(ReqwestTransport::new()),
    ));
    let tracker = Arc::new(Tracker::new(pipeline, store.clone()));

    if config.refresh_interval.is_zero() {
        info!("Periodic refresh disabled");
    } else {
        start_refresh_interval(tracker.clone(), config.refresh_interval);
    }

    let rates = ExchangeRateService::from_config(
        config.exchange_rate_base_url.as_deref(),
        config.exchange_rate_api_key.as_deref(),
    );

    let app = build_router(Arc::new(AppState {
        tracker,
        store,
        rates,
    }));

    let addr = config.bind_addr();
    info!("bidwatch API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
