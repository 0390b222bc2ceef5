use actix_web::{get, web, HttpResponse};
use serde::Serialize;

use crate::{
    dal::company_catalog::{CompanyCatalog, IcpReference, ICP_REFERENCE},
    domain::company::{Category, CompanyRecord, Complexity, Region},
    services::{Reconciler, TARGET_ROLES},
};

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_companies: usize,
    pub icp_similar: usize,
    pub high_fit: usize,
    pub indian_companies: usize,
    pub global_companies: usize,
    pub high_complexity: usize,
    pub verified: usize,
    pub target_roles: usize,
    pub icp_reference: &'static [IcpReference],
}

impl CatalogStats {
    pub fn from_companies(companies: &[CompanyRecord]) -> Self {
        let count = |pred: fn(&CompanyRecord) -> bool| companies.iter().filter(|c| pred(c)).count();

        CatalogStats {
            total_companies: companies.len(),
            icp_similar: count(|c| c.category == Category::IcpSimilar),
            high_fit: count(|c| c.category == Category::HighFit),
            indian_companies: count(|c| c.region == Region::India),
            global_companies: count(|c| c.region == Region::Global),
            high_complexity: count(|c| c.cloud_complexity == Complexity::High),
            verified: count(|c| c.verified),
            target_roles: TARGET_ROLES.len(),
            icp_reference: &ICP_REFERENCE,
        }
    }
}

#[get("/stats")]
pub async fn stats(reconciler: web::Data<Reconciler>) -> HttpResponse {
    let companies = reconciler.catalog().all();
    HttpResponse::Ok().json(CatalogStats::from_companies(&companies))
}
