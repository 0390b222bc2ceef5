use std::{net::TcpListener, sync::Arc};

use anyhow::Context;
use env_logger::Env;
use prospector::{
    configuration::get_configuration,
    dal::company_catalog::{CompanyCatalog, StaticCatalog},
    services::{
        BrightDataClient, CachedScraper, JobRunner, LiveCompanySource, Reconciler, ScrapeCache,
        SystemClock,
    },
    startup::run,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().context("Failed to read configuration.")?;
    let brightdata = &configuration.brightdata;

    let catalog: Arc<dyn CompanyCatalog> =
        Arc::new(StaticCatalog::embedded().context("Failed to load static company catalog.")?);

    let brightdata_client = brightdata.api_key().map(|api_key| {
        BrightDataClient::new(
            api_key.to_string(),
            brightdata.base_url.clone(),
            brightdata.company_dataset_id.clone(),
        )
    });

    let live_source = brightdata_client.clone().map(|client| {
        let cache = Arc::new(ScrapeCache::new(
            brightdata.cache_ttl(),
            Arc::new(SystemClock),
        ));
        let scraper = CachedScraper::new(
            JobRunner::new(client, brightdata.poll_interval()),
            cache,
            brightdata.max_wait(),
        );
        Arc::new(scraper) as Arc<dyn LiveCompanySource>
    });

    match &brightdata_client {
        Some(client) => log::info!("BrightData API configured ({})", client.masked_key()),
        None => log::warn!("BrightData API key not set, serving static catalog only"),
    }

    let reconciler = Reconciler::new(catalog, live_source)
        .with_live_batch_size(configuration.reconciler.live_batch_size)
        .with_default_page_size(configuration.reconciler.default_page_size);

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address).with_context(|| format!("Failed to bind {}", address))?;
    log::info!("Server running at http://{}", address);

    run(listener, reconciler, brightdata_client)?.await?;
    Ok(())
}
