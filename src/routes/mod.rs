pub mod brightdata_route;
pub mod company_route;
pub mod default_route;
pub mod research_route;
pub mod search_route;
pub mod stats_route;
