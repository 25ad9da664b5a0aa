//! Feed, category listing and profile pages.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blogicum_core::domain::User;
use blogicum_core::error::RepoError;
use blogicum_core::{DomainError, PageRequest, PostQuery};
use blogicum_shared::{FormErrors, PageQuery, ProfileForm};

use super::{current_user, redirect_with_cookie, render};
use crate::middleware::auth::{Identity, OptionalIdentity, session_cookie};
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::{urls, views};

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = PageRequest::parse(query.page.as_deref(), state.page_size);
    let posts = state.posts.list(&PostQuery::feed(Utc::now()), page).await?;

    Ok(render(views::posts::feed(viewer.identity(), &posts)))
}

/// GET /category/{slug}/
pub async fn category_posts(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let slug = slug.into_inner();
    let category = state
        .categories
        .find_published_by_slug(&slug)
        .await?
        .ok_or_else(|| DomainError::not_found("category", &slug))?;

    let page = PageRequest::parse(query.page.as_deref(), state.page_size);
    let posts = state
        .posts
        .list(&PostQuery::category(category.id, Utc::now()), page)
        .await?;

    Ok(render(views::posts::category(
        viewer.identity(),
        &category,
        &posts,
    )))
}

/// GET /profile/{username}/
///
/// The owner sees every post of theirs; everyone else only public ones.
pub async fn profile(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let username = username.into_inner();
    let user = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| DomainError::not_found("user", &username))?;

    let page = PageRequest::parse(query.page.as_deref(), state.page_size);
    let post_query = PostQuery::profile(user.id, viewer.user_id(), Utc::now());
    let posts = state.posts.list(&post_query, page).await?;

    Ok(render(views::account::profile(
        viewer.identity(),
        &user,
        &posts,
    )))
}

fn profile_form(user: &User) -> ProfileForm {
    ProfileForm {
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        email: user.email.clone(),
    }
}

/// GET /profile/edit/
pub async fn edit_profile_form(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let user = current_user(&state, &identity).await?;

    Ok(render(views::account::edit_profile(
        Some(&identity),
        &profile_form(&user),
        &FormErrors::new(),
    )))
}

/// POST /profile/edit/
pub async fn edit_profile(
    state: web::Data<AppState>,
    identity: Identity,
    form: web::Form<ProfileForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let user = current_user(&state, &identity).await?;

    let cleaned = match form.validate() {
        Ok(cleaned) => cleaned,
        Err(errors) => {
            return Ok(render(views::account::edit_profile(
                Some(&identity),
                &form,
                &errors,
            )));
        }
    };

    let changed = User {
        username: cleaned.username,
        first_name: cleaned.first_name,
        last_name: cleaned.last_name,
        email: cleaned.email,
        ..user
    };

    let updated = match state.users.update(changed).await {
        Ok(updated) => updated,
        Err(RepoError::Constraint(_)) => {
            let mut errors = FormErrors::new();
            errors.add("username", "A user with that username already exists.");
            return Ok(render(views::account::edit_profile(
                Some(&identity),
                &form,
                &errors,
            )));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = updated.id, username = %updated.username, "Profile updated");

    // The username is part of the session, so a rename needs a fresh token.
    let token = state
        .tokens
        .generate_token(updated.id, &updated.username)?;

    Ok(redirect_with_cookie(
        &urls::profile(&updated.username),
        session_cookie(
            token,
            state.tokens.expiration_seconds(),
            state.secure_cookies,
        ),
    ))
}
