use actix_web::{get, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::{
    dal::company_catalog::{IcpReference, ICP_REFERENCE},
    domain::company::Category,
    services::{CompanyPage, CompanyQuery, Reconciler},
};

#[derive(Deserialize)]
pub struct CompanyListQuery {
    page: Option<usize>,
    limit: Option<usize>,
    search: Option<String>,
    region: Option<String>,
    complexity: Option<String>,
    live: Option<bool>,
}

impl From<CompanyListQuery> for CompanyQuery {
    fn from(q: CompanyListQuery) -> Self {
        CompanyQuery {
            search: q.search,
            region: q.region,
            complexity: q.complexity,
            live: q.live.unwrap_or(false),
            page: q.page,
            limit: q.limit,
        }
    }
}

#[derive(Serialize)]
struct IcpSimilarPage {
    #[serde(flatten)]
    page: CompanyPage,
    icp_reference: &'static [IcpReference],
}

#[get("/high-fit")]
pub async fn high_fit(
    reconciler: web::Data<Reconciler>,
    query: web::Query<CompanyListQuery>,
) -> HttpResponse {
    let page = reconciler
        .resolve(Category::HighFit, &query.into_inner().into())
        .await;
    HttpResponse::Ok().json(page)
}

#[get("/icp-similar")]
pub async fn icp_similar(
    reconciler: web::Data<Reconciler>,
    query: web::Query<CompanyListQuery>,
) -> HttpResponse {
    let page = reconciler
        .resolve(Category::IcpSimilar, &query.into_inner().into())
        .await;
    HttpResponse::Ok().json(IcpSimilarPage {
        page,
        icp_reference: &ICP_REFERENCE,
    })
}
