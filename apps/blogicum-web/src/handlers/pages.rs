//! Static pages and the fallback 404.

use actix_web::HttpResponse;

use super::render;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::views;

/// GET /about/
pub async fn about(viewer: OptionalIdentity) -> HttpResponse {
    render(views::pages::about(viewer.identity()))
}

/// GET /rules/
pub async fn rules(viewer: OptionalIdentity) -> HttpResponse {
    render(views::pages::rules(viewer.identity()))
}

/// Any request no route matched.
pub async fn not_found(req: actix_web::HttpRequest) -> AppResult<HttpResponse> {
    Err(AppError::NotFound(format!("no route for {}", req.path())))
}
