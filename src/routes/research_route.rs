use actix_web::{get, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::services::{google_verify_links, linkedin_people_search};

#[derive(Deserialize)]
pub struct LinkedInSearchQuery {
    company: Option<String>,
    role: Option<String>,
}

#[get("/linkedin-search")]
pub async fn linkedin_search(query: web::Query<LinkedInSearchQuery>) -> HttpResponse {
    match linkedin_people_search(query.company.as_deref(), query.role.as_deref()) {
        Ok(links) => HttpResponse::Ok().json(links),
        Err(e) => HttpResponse::BadRequest().json(json!({ "error": e.to_string() })),
    }
}

#[derive(Deserialize)]
pub struct GoogleVerifyQuery {
    company: Option<String>,
}

#[get("/google-verify")]
pub async fn google_verify(query: web::Query<GoogleVerifyQuery>) -> HttpResponse {
    match google_verify_links(query.company.as_deref()) {
        Ok(links) => HttpResponse::Ok().json(links),
        Err(e) => HttpResponse::BadRequest().json(json!({ "error": e.to_string() })),
    }
}
