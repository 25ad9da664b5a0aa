//! HTTP handlers and route configuration.

mod auth;
mod blog;
mod comments;
mod health;
mod pages;
mod posts;

#[cfg(test)]
mod tests;

use actix_web::cookie::Cookie;
use actix_web::http::header::{self, ContentType};
use actix_web::{HttpResponse, web};
use maud::Markup;

use blogicum_core::DomainError;
use blogicum_core::domain::User;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Largest urlencoded form body accepted; post text has no length cap of its own.
pub const FORM_LIMIT: usize = 2_621_440;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::NotFound(format!("unmatched path parameter: {err}")).into()
    }))
    .app_data(
        web::FormConfig::default()
            .limit(FORM_LIMIT)
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .route("/", web::get().to(blog::index))
    .route("/health", web::get().to(health::health_check))
    .route("/about/", web::get().to(pages::about))
    .route("/rules/", web::get().to(pages::rules))
    .route("/category/{slug}/", web::get().to(blog::category_posts))
    // Profiles
    .service(
        web::resource("/profile/edit/")
            .route(web::get().to(blog::edit_profile_form))
            .route(web::post().to(blog::edit_profile)),
    )
    .route("/profile/{username}/", web::get().to(blog::profile))
    // Posts; `create` is registered ahead of `{post_id}`
    .service(
        web::resource("/posts/create/")
            .route(web::get().to(posts::create_form))
            .route(web::post().to(posts::create)),
    )
    .route("/posts/{post_id}/", web::get().to(posts::detail))
    .service(
        web::resource("/posts/{post_id}/edit/")
            .route(web::get().to(posts::edit_form))
            .route(web::post().to(posts::edit)),
    )
    .service(
        web::resource("/posts/{post_id}/delete/")
            .route(web::get().to(posts::delete_confirm))
            .route(web::post().to(posts::delete)),
    )
    // Comments
    .route("/posts/{post_id}/comment/", web::post().to(comments::add))
    .service(
        web::resource("/posts/{post_id}/comment/{comment_id}/edit/")
            .route(web::get().to(comments::edit_form))
            .route(web::post().to(comments::edit)),
    )
    .service(
        web::resource("/posts/{post_id}/comment/{comment_id}/delete/")
            .route(web::get().to(comments::delete_confirm))
            .route(web::post().to(comments::delete)),
    )
    // Auth
    .service(
        web::scope("/auth")
            .service(
                web::resource("/login/")
                    .route(web::get().to(auth::login_form))
                    .route(web::post().to(auth::login)),
            )
            .service(
                web::resource("/registration/")
                    .route(web::get().to(auth::registration_form))
                    .route(web::post().to(auth::register)),
            )
            .route("/logout/", web::post().to(auth::logout)),
    )
    .default_service(web::to(pages::not_found));
}

/// 200 response with a rendered page.
fn render(markup: Markup) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(markup.into_string())
}

/// 302 to `location`.
fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// 302 to `location` that also sets or clears a cookie.
fn redirect_with_cookie(location: &str, cookie: Cookie<'static>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .cookie(cookie)
        .finish()
}

/// The account behind a session. A session can outlive its user.
async fn current_user(state: &AppState, identity: &Identity) -> AppResult<User> {
    state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| DomainError::not_found("user", identity.user_id).into())
}
