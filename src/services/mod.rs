pub mod brightdata_client;
pub mod cached_scraper;
pub mod job_runner;
pub mod link_builder;
pub mod normalizer;
pub mod reconciler;
pub mod scrape_cache;
#[cfg(test)]
mod testing;

pub use brightdata_client::*;
pub use cached_scraper::*;
pub use job_runner::*;
pub use link_builder::*;
pub use normalizer::*;
pub use reconciler::*;
pub use scrape_cache::*;
