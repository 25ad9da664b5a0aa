use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

/// Liveness payload; `backend` says which storage the process ended up on.
#[derive(Serialize)]
pub struct Health {
    status: &'static str,
    version: &'static str,
    backend: &'static str,
    timestamp: String,
}

pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        backend: state.backend,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
