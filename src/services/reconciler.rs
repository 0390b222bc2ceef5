use std::{collections::HashSet, sync::Arc};

use rand::seq::SliceRandom;
use serde::Serialize;

use crate::{
    dal::company_catalog::CompanyCatalog,
    domain::{
        company::{Category, CompanyRecord, ResultSource},
        error::{ScrapeError, ValidationError},
    },
};

use super::{build_company_urls, normalize, LiveCompanySource};

pub const DEFAULT_LIVE_BATCH_SIZE: usize = 20;
pub const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Debug, Clone, Default)]
pub struct CompanyQuery {
    pub search: Option<String>,
    pub region: Option<String>,
    pub complexity: Option<String>,
    pub live: bool,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct CompanyPage {
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub source: ResultSource,
    pub companies: Vec<CompanyRecord>,
}

#[derive(Debug)]
pub struct FallbackEvent {
    pub category: Category,
    pub reason: ScrapeError,
}

pub type FallbackHook = Arc<dyn Fn(&FallbackEvent) + Send + Sync>;

fn log_fallback(event: &FallbackEvent) {
    log::warn!(
        "Live data unavailable for {}, serving static catalog: {}",
        event.category,
        event.reason
    );
}

/// Merges live provider data over the static catalog.
///
/// The live path never fails a request: any error is handed to the fallback
/// hook and the static records are returned instead.
pub struct Reconciler {
    catalog: Arc<dyn CompanyCatalog>,
    live: Option<Arc<dyn LiveCompanySource>>,
    on_fallback: FallbackHook,
    live_batch_size: usize,
    default_page_size: usize,
}

impl Reconciler {
    pub fn new(
        catalog: Arc<dyn CompanyCatalog>,
        live: Option<Arc<dyn LiveCompanySource>>,
    ) -> Self {
        Reconciler {
            catalog,
            live,
            on_fallback: Arc::new(log_fallback),
            live_batch_size: DEFAULT_LIVE_BATCH_SIZE,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_fallback_hook(mut self, hook: FallbackHook) -> Self {
        self.on_fallback = hook;
        self
    }

    pub fn with_live_batch_size(mut self, size: usize) -> Self {
        self.live_batch_size = size;
        self
    }

    pub fn with_default_page_size(mut self, size: usize) -> Self {
        self.default_page_size = size;
        self
    }

    pub fn catalog(&self) -> &dyn CompanyCatalog {
        self.catalog.as_ref()
    }

    pub async fn resolve(&self, category: Category, query: &CompanyQuery) -> CompanyPage {
        let static_companies = self.catalog.get_all(category);

        let (merged, source) = match query.live {
            true => match self.fetch_live(category, &static_companies).await {
                Ok(live) if !live.is_empty() => merge(live, static_companies),
                Ok(_) => {
                    log::info!("Live scrape for {} returned no companies", category);
                    (dedupe(static_companies), ResultSource::Static)
                }
                Err(reason) => {
                    (self.on_fallback)(&FallbackEvent { category, reason });
                    (dedupe(static_companies), ResultSource::Static)
                }
            },
            false => (dedupe(static_companies), ResultSource::Static),
        };

        let mut companies = filter(merged, category, query);
        companies.shuffle(&mut rand::thread_rng());

        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(self.default_page_size);

        CompanyPage {
            total: companies.len(),
            page,
            limit,
            source,
            companies: paginate(companies, page, limit),
        }
    }

    /// Case-insensitive search across both categories of the static catalog.
    pub fn search(&self, q: Option<&str>) -> Result<Vec<CompanyRecord>, ValidationError> {
        let q = q
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or(ValidationError::MissingField("Query"))?
            .to_lowercase();

        Ok(dedupe(self.catalog.all())
            .into_iter()
            .filter(|c| matches_search(c, c.category, &q))
            .collect())
    }

    async fn fetch_live(
        &self,
        category: Category,
        static_companies: &[CompanyRecord],
    ) -> Result<Vec<CompanyRecord>, ScrapeError> {
        let Some(live) = &self.live else {
            return Err(ScrapeError::Configuration);
        };

        let names: Vec<&str> = static_companies
            .iter()
            .take(self.live_batch_size)
            .map(|c| c.company.as_str())
            .collect();
        if names.is_empty() {
            return Ok(vec![]);
        }

        let payload = live.scrape_companies(&build_company_urls(names.as_slice())).await?;
        Ok(normalize(&payload, category))
    }
}

/// Live records win over static ones with the same (case-insensitive) name;
/// static records nobody shadowed are kept.
fn merge(
    live: Vec<CompanyRecord>,
    static_companies: Vec<CompanyRecord>,
) -> (Vec<CompanyRecord>, ResultSource) {
    let mut merged = dedupe(live);
    let mut seen: HashSet<String> = merged.iter().map(CompanyRecord::key).collect();

    let mut kept_static = 0;
    for company in static_companies {
        if seen.insert(company.key()) {
            merged.push(company);
            kept_static += 1;
        }
    }

    let source = match kept_static {
        0 => ResultSource::Live,
        _ => ResultSource::Hybrid,
    };
    (merged, source)
}

fn dedupe(companies: Vec<CompanyRecord>) -> Vec<CompanyRecord> {
    let mut seen = HashSet::new();
    companies
        .into_iter()
        .filter(|c| seen.insert(c.key()))
        .collect()
}

fn filter(
    companies: Vec<CompanyRecord>,
    category: Category,
    query: &CompanyQuery,
) -> Vec<CompanyRecord> {
    let search = non_blank(&query.search).map(str::to_lowercase);
    let region = non_blank(&query.region);
    let complexity = non_blank(&query.complexity);

    companies
        .into_iter()
        .filter(|c| match &search {
            Some(q) => matches_search(c, category, q),
            None => true,
        })
        .filter(|c| region.map_or(true, |r| c.region.as_str().eq_ignore_ascii_case(r)))
        .filter(|c| {
            complexity.map_or(true, |x| c.cloud_complexity.as_str().eq_ignore_ascii_case(x))
        })
        .collect()
}

fn matches_search(company: &CompanyRecord, category: Category, q: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(q);

    contains(&company.company)
        || contains(&company.industry)
        || contains(&company.hq)
        || company.cloud_providers.iter().any(|p| contains(p))
        || (category == Category::IcpSimilar && contains(&company.icp_similarity))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn paginate(companies: Vec<CompanyRecord>, page: usize, limit: usize) -> Vec<CompanyRecord> {
    let start = (page - 1).saturating_mul(limit);
    companies.into_iter().skip(start).take(limit).collect()
}
