//! Post detail, create, edit and delete.
//!
//! Owner-only actions redirect anyone else back to the post's detail page
//! without touching it.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blogicum_core::DomainError;
use blogicum_core::domain::{Category, Location, NewPost, Post, PostView};
use blogicum_core::policy;
use blogicum_core::visibility::can_view;
use blogicum_shared::{CommentForm, FormErrors, PostChoices, PostForm, format_datetime_local};

use super::{current_user, redirect, render};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::views::posts::{DetailPage, PostFormPage};
use crate::{urls, views};

/// A post the viewer may see, with everything the detail page shows.
pub(super) async fn viewable_post(
    state: &AppState,
    viewer: Option<i32>,
    post_id: i32,
) -> AppResult<PostView> {
    let view = state
        .posts
        .find_view(post_id)
        .await?
        .filter(|view| can_view(viewer, view, Utc::now()))
        .ok_or_else(|| DomainError::not_found("post", post_id))?;

    Ok(view)
}

/// A post by id, whatever its visibility.
async fn stored_post(state: &AppState, post_id: i32) -> AppResult<Post> {
    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("post", post_id))?;

    Ok(post)
}

/// Choices offered by the post form: published categories and locations,
/// plus whatever `current` already points at.
async fn choices(
    state: &AppState,
    current: Option<&Post>,
) -> AppResult<(Vec<Category>, Vec<Location>)> {
    let mut categories = state.categories.list_published().await?;
    let mut locations = state.locations.list_published().await?;

    if let Some(post) = current {
        if let Some(id) = post.category_id.filter(|id| !categories.iter().any(|c| c.id == *id)) {
            if let Some(category) = state.categories.find_by_id(id).await? {
                categories.push(category);
            }
        }
        if let Some(id) = post.location_id.filter(|id| !locations.iter().any(|l| l.id == *id)) {
            if let Some(location) = state.locations.find_by_id(id).await? {
                locations.push(location);
            }
        }
    }

    Ok((categories, locations))
}

fn post_choices(categories: &[Category], locations: &[Location]) -> PostChoices {
    PostChoices {
        categories: categories.iter().map(|c| c.id).collect(),
        locations: locations.iter().map(|l| l.id).collect(),
    }
}

fn form_from_post(post: &Post) -> PostForm {
    PostForm {
        title: post.title.clone(),
        text: post.text.clone(),
        pub_date: format_datetime_local(post.pub_date),
        image: post.image.clone().unwrap_or_default(),
        category: post.category_id.map(|id| id.to_string()).unwrap_or_default(),
        location: post.location_id.map(|id| id.to_string()).unwrap_or_default(),
        is_published: post.is_published.then(|| "on".to_string()),
    }
}

fn form_page(
    identity: &Identity,
    heading: &str,
    action: &str,
    form: &PostForm,
    errors: &FormErrors,
    categories: &[Category],
    locations: &[Location],
) -> HttpResponse {
    render(views::posts::post_form(PostFormPage {
        viewer: Some(identity),
        heading,
        action,
        form,
        errors,
        categories,
        locations,
    }))
}

/// GET /posts/{post_id}/
pub async fn detail(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    post_id: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let view = viewable_post(&state, viewer.user_id(), post_id.into_inner()).await?;
    let comments = state.comments.list_for_post(view.post.id).await?;

    Ok(render(views::posts::detail(DetailPage {
        viewer: viewer.identity(),
        view: &view,
        comments: &comments,
        comment_form: &CommentForm::default(),
        comment_errors: &FormErrors::new(),
    })))
}

/// GET /posts/create/
pub async fn create_form(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let (categories, locations) = choices(&state, None).await?;

    Ok(form_page(
        &identity,
        "New post",
        "/posts/create/",
        &PostForm::blank(Utc::now()),
        &FormErrors::new(),
        &categories,
        &locations,
    ))
}

/// POST /posts/create/
///
/// The author is always the signed-in user.
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let (categories, locations) = choices(&state, None).await?;

    let input = match form.validate(&post_choices(&categories, &locations)) {
        Ok(input) => input,
        Err(errors) => {
            return Ok(form_page(
                &identity,
                "New post",
                "/posts/create/",
                &form,
                &errors,
                &categories,
                &locations,
            ));
        }
    };

    let post = state
        .posts
        .create(NewPost {
            title: input.title,
            text: input.text,
            image: input.image,
            pub_date: input.pub_date,
            is_published: input.is_published,
            author_id: identity.user_id,
            category_id: input.category_id,
            location_id: input.location_id,
        })
        .await?;

    tracing::info!(post_id = post.id, author_id = post.author_id, "Post created");

    // The token's username may predate a rename made elsewhere.
    let author = current_user(&state, &identity).await?;
    Ok(redirect(&urls::profile(&author.username)))
}

/// GET /posts/{post_id}/edit/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let post = stored_post(&state, post_id.into_inner()).await?;
    if !policy::can_modify(identity.user_id, &post) {
        return Ok(redirect(&urls::post_detail(post.id)));
    }

    let (categories, locations) = choices(&state, Some(&post)).await?;
    Ok(form_page(
        &identity,
        "Edit post",
        &urls::post_edit(post.id),
        &form_from_post(&post),
        &FormErrors::new(),
        &categories,
        &locations,
    ))
}

/// POST /posts/{post_id}/edit/
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<i32>,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let post = stored_post(&state, post_id.into_inner()).await?;
    if let Err(denied) = policy::authorize(identity.user_id, &post) {
        tracing::warn!(user_id = identity.user_id, "{}", denied);
        return Ok(redirect(&urls::post_detail(post.id)));
    }

    let form = form.into_inner();
    let (categories, locations) = choices(&state, Some(&post)).await?;
    let input = match form.validate(&post_choices(&categories, &locations)) {
        Ok(input) => input,
        Err(errors) => {
            return Ok(form_page(
                &identity,
                "Edit post",
                &urls::post_edit(post.id),
                &form,
                &errors,
                &categories,
                &locations,
            ));
        }
    };

    let updated = state
        .posts
        .update(Post {
            title: input.title,
            text: input.text,
            image: input.image,
            pub_date: input.pub_date,
            is_published: input.is_published,
            category_id: input.category_id,
            location_id: input.location_id,
            ..post
        })
        .await?;

    tracing::info!(post_id = updated.id, "Post updated");
    Ok(redirect(&urls::post_detail(updated.id)))
}

/// GET /posts/{post_id}/delete/
pub async fn delete_confirm(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let post_id = post_id.into_inner();
    let view = state
        .posts
        .find_view(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("post", post_id))?;
    if !policy::can_modify(identity.user_id, &view.post) {
        return Ok(redirect(&urls::post_detail(post_id)));
    }

    Ok(render(views::posts::confirm_delete(Some(&identity), &view)))
}

/// POST /posts/{post_id}/delete/
///
/// Comments go with the post.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let post = stored_post(&state, post_id.into_inner()).await?;
    if let Err(denied) = policy::authorize(identity.user_id, &post) {
        tracing::warn!(user_id = identity.user_id, "{}", denied);
        return Ok(redirect(&urls::post_detail(post.id)));
    }

    state.posts.delete(post.id).await?;

    tracing::info!(post_id = post.id, "Post deleted");

    let author = current_user(&state, &identity).await?;
    Ok(redirect(&urls::profile(&author.username)))
}
