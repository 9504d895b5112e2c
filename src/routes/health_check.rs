use actix_web::HttpResponse;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    message: &'static str,
    timestamp: String,
}

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthStatus {
        status: "OK",
        message: "API is running",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
