pub mod company;
pub mod error;
pub mod scrape_job;
