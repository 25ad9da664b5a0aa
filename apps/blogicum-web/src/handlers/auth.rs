//! Login, registration and logout.

use actix_web::{HttpResponse, web};

use blogicum_core::domain::NewUser;
use blogicum_core::error::RepoError;
use blogicum_core::ports::AuthError;
use blogicum_shared::{FormErrors, LoginForm, NextQuery, RegistrationForm};

use super::{redirect_with_cookie, render};
use crate::middleware::auth::{cleared_session_cookie, session_cookie};
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::{urls, views};

const BAD_CREDENTIALS: &str = "Please enter a correct username and password. \
                               Note that both fields may be case-sensitive.";

/// Where the login form posts back to, keeping `next`.
fn login_action(next: &NextQuery) -> String {
    match next.safe_target() {
        Some(target) => urls::login_then(target),
        None => "/auth/login/".to_string(),
    }
}

/// Sign `user_id` in and send them to `location`.
fn signed_in(
    state: &AppState,
    user_id: i32,
    username: &str,
    location: &str,
) -> AppResult<HttpResponse> {
    let token = state.tokens.generate_token(user_id, username)?;
    Ok(redirect_with_cookie(
        location,
        session_cookie(
            token,
            state.tokens.expiration_seconds(),
            state.secure_cookies,
        ),
    ))
}

/// GET /auth/login/
pub async fn login_form(next: web::Query<NextQuery>) -> HttpResponse {
    render(views::account::login(
        &login_action(&next),
        &LoginForm::default(),
        &FormErrors::new(),
    ))
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    next: web::Query<NextQuery>,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let action = login_action(&next);

    if let Err(errors) = form.validate() {
        return Ok(render(views::account::login(&action, &form, &errors)));
    }

    let user = state.users.find_by_username(form.username.trim()).await?;
    let verified = match &user {
        Some(user) => match state.passwords.verify(&form.password, &user.password_hash) {
            Ok(valid) => valid,
            Err(AuthError::InvalidCredentials) => false,
            Err(e) => return Err(e.into()),
        },
        None => false,
    };

    let Some(user) = user.filter(|_| verified) else {
        tracing::warn!(username = %form.username, "Failed login");
        let mut errors = FormErrors::new();
        errors.add_non_field(BAD_CREDENTIALS);
        return Ok(render(views::account::login(&action, &form, &errors)));
    };

    tracing::info!(user_id = user.id, "User logged in");
    let location = next
        .safe_target()
        .map(str::to_string)
        .unwrap_or_else(|| urls::profile(&user.username));

    signed_in(&state, user.id, &user.username, &location)
}

/// GET /auth/registration/
pub async fn registration_form() -> HttpResponse {
    render(views::account::registration(
        &RegistrationForm::default(),
        &FormErrors::new(),
    ))
}

/// POST /auth/registration/
pub async fn register(
    state: web::Data<AppState>,
    form: web::Form<RegistrationForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    if let Err(errors) = form.validate() {
        return Ok(render(views::account::registration(&form, &errors)));
    }

    let password_hash = state.passwords.hash(&form.password1)?;
    let new_user = NewUser::new(
        form.username.trim().to_string(),
        form.email.trim().to_string(),
        password_hash,
    );

    let user = match state.users.create(new_user).await {
        Ok(user) => user,
        Err(RepoError::Constraint(_)) => {
            let mut errors = FormErrors::new();
            errors.add("username", "A user with that username already exists.");
            return Ok(render(views::account::registration(&form, &errors)));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    signed_in(&state, user.id, &user.username, &urls::profile(&user.username))
}

/// POST /auth/logout/
pub async fn logout(state: web::Data<AppState>) -> HttpResponse {
    redirect_with_cookie("/", cleared_session_cookie(state.secure_cookies))
}
