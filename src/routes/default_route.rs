use actix_web::{get, HttpResponse, Responder};
use serde_json::json;

#[get("/")]
pub async fn default() -> impl Responder {
    HttpResponse::Ok().body("Prospector is up. Try /api/high-fit or /api/icp-similar")
}

pub async fn api_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "error": "API route not found" }))
}
