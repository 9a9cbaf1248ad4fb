use std::sync::Arc;

use dotenvy::dotenv;
use snafu::ResultExt;
use tokio::net::TcpListener;

use marquee::api::{self, App};
use marquee::config::Config;
use marquee::error::{
    ApplicationError, BindAddressSnafu, ConfigLoadSnafu, MovieProviderSnafu, TemplatesSnafu,
    WebServerSnafu,
};
use marquee::logger;
use marquee::page::Page;

#[tokio::main]
async fn main() -> Result<(), ApplicationError> {
    dotenv().ok();

    let config = Config::from_env().context(ConfigLoadSnafu)?;

    let _guard = logger::init(&config)?;

    let services = config.services().context(MovieProviderSnafu)?;
    let page = Arc::new(Page::load(services, config.page()));

    let engine = api::templates().context(TemplatesSnafu)?;
    let router = api::create_router(App::new(page.clone(), engine), &config.public_dir);

    let listener = TcpListener::bind(config.host)
        .await
        .context(BindAddressSnafu { address: config.host })?;
    tracing::info!(address = %config.host, "serving the movie page");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown())
        .await
        .context(WebServerSnafu)?;

    page.settle().await;
    Ok(())
}

async fn shutdown() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "could not listen for the shutdown signal");
    }
}
