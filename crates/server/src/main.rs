use std::env;
use std::error::Error;
use std::sync::Arc;

use pagegrade_core::{AnalysisConfig, FetchConfig, HttpFetcher, PageAnalysisService, ProviderSettings, RetryPolicy};
use pagegrade_server::{AppState, BIND_ENV, DEFAULT_BIND, app};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = ProviderSettings::from_env();
    let fetcher = Arc::new(HttpFetcher::new(FetchConfig::default())?);
    let service = PageAnalysisService::new(fetcher, &settings, AnalysisConfig::default(), RetryPolicy::default())?;

    let bind = env::var(BIND_ENV).unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(address = %bind, configured = settings.is_configured(), "pagegrade server listening");

    axum::serve(listener, app(AppState::new(service))).await?;
    Ok(())
}
