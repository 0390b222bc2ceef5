use actix_web::{get, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{domain::company::CompanyRecord, services::Reconciler};

#[derive(Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

#[derive(Serialize)]
struct SearchResults {
    total: usize,
    results: Vec<CompanyRecord>,
}

#[get("/search")]
pub async fn search(
    reconciler: web::Data<Reconciler>,
    query: web::Query<SearchQuery>,
) -> HttpResponse {
    match reconciler.search(query.q.as_deref()) {
        Ok(results) => HttpResponse::Ok().json(SearchResults {
            total: results.len(),
            results,
        }),
        Err(e) => HttpResponse::BadRequest().json(json!({ "error": e.to_string() })),
    }
}
