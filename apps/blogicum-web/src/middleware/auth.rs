//! Session cookie authentication and extractors.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload, web};
use std::future::{Ready, ready};

use blogicum_core::ports::{AuthError, TokenClaims};

use crate::state::AppState;
use crate::urls;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "blogicum_session";

/// Signed-in user, taken from the session cookie.
///
/// Handlers that take an `Identity` are login-only: anonymous requests are
/// redirected to the login page with `next` pointing back at them.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: i32,
    pub username: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

/// Anonymous request to a login-only page.
#[derive(Debug)]
pub struct LoginRequired {
    pub next: String,
    pub reason: AuthError,
}

impl std::fmt::Display for LoginRequired {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "login required for {}: {}", self.next, self.reason)
    }
}

impl ResponseError for LoginRequired {
    fn status_code(&self) -> StatusCode {
        StatusCode::FOUND
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::Found()
            .insert_header((header::LOCATION, urls::login_then(&self.next)))
            .finish()
    }
}

fn identify(req: &HttpRequest) -> Result<Identity, AuthError> {
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        tracing::error!("AppState not found in app data");
        AuthError::InvalidToken("Server configuration error".to_string())
    })?;

    let cookie = req.cookie(SESSION_COOKIE).ok_or(AuthError::MissingSession)?;

    state.tokens.validate_token(cookie.value()).map(Identity::from)
}

impl FromRequest for Identity {
    type Error = LoginRequired;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(identify(req).map_err(|reason| {
            let next = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| req.path().to_string());
            tracing::debug!(%next, %reason, "Anonymous request to a login-only page");
            LoginRequired { next, reason }
        }))
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
#[derive(Debug, Clone, Default)]
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    pub fn user_id(&self) -> Option<i32> {
        self.0.as_ref().map(|identity| identity.user_id)
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalIdentity(identify(req).ok())))
    }
}

/// `HttpOnly`, `SameSite=Lax` cookie holding a freshly issued session token.
pub fn session_cookie(token: String, ttl_seconds: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::seconds(ttl_seconds))
        .finish()
}

/// Cookie that makes the browser drop the session.
pub fn cleared_session_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .finish();
    cookie.make_removal();
    cookie
}
