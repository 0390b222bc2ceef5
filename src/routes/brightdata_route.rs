use actix_web::{get, web, HttpResponse};
use serde_json::json;

use crate::services::BrightDataClient;

/// The client is only registered when a credential is configured.
#[get("/brightdata/status")]
pub async fn status(client: Option<web::Data<BrightDataClient>>) -> HttpResponse {
    match client {
        Some(client) => HttpResponse::Ok().json(client.check_status().await),
        None => HttpResponse::Ok().json(json!({ "connected": false, "apiKey": "NOT SET" })),
    }
}
