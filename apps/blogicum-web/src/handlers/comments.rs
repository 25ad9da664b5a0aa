//! Adding, editing and deleting comments.

use actix_web::{HttpResponse, web};

use blogicum_core::DomainError;
use blogicum_core::domain::{Comment, NewComment};
use blogicum_core::policy;
use blogicum_shared::{CommentForm, FormErrors};

use super::posts::viewable_post;
use super::{redirect, render};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::views::posts::DetailPage;
use crate::{urls, views};

/// The comment `comment_id` of post `post_id`. A comment of another post is
/// as missing as an unknown id.
async fn comment_of_post(state: &AppState, post_id: i32, comment_id: i32) -> AppResult<Comment> {
    let comment = state
        .comments
        .find_by_id(comment_id)
        .await?
        .filter(|c| c.post_id == post_id)
        .ok_or_else(|| DomainError::not_found("comment", comment_id))?;

    Ok(comment)
}

/// POST /posts/{post_id}/comment/
pub async fn add(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<i32>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let view = viewable_post(&state, Some(identity.user_id), post_id.into_inner()).await?;
    let form = form.into_inner();

    let text = match form.validate() {
        Ok(text) => text,
        Err(errors) => {
            let comments = state.comments.list_for_post(view.post.id).await?;
            return Ok(render(views::posts::detail(DetailPage {
                viewer: Some(&identity),
                view: &view,
                comments: &comments,
                comment_form: &form,
                comment_errors: &errors,
            })));
        }
    };

    let comment = state
        .comments
        .create(NewComment {
            text,
            post_id: view.post.id,
            author_id: identity.user_id,
        })
        .await?;

    tracing::info!(comment_id = comment.id, post_id = comment.post_id, "Comment added");
    Ok(redirect(&urls::post_detail(view.post.id)))
}

/// GET /posts/{post_id}/comment/{comment_id}/edit/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(i32, i32)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = comment_of_post(&state, post_id, comment_id).await?;
    if !policy::can_modify(identity.user_id, &comment) {
        return Ok(redirect(&urls::post_detail(post_id)));
    }

    let form = CommentForm {
        text: comment.text.clone(),
    };
    Ok(render(views::comments::edit(
        Some(&identity),
        &comment,
        &form,
        &FormErrors::new(),
    )))
}

/// POST /posts/{post_id}/comment/{comment_id}/edit/
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(i32, i32)>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = comment_of_post(&state, post_id, comment_id).await?;
    if let Err(denied) = policy::authorize(identity.user_id, &comment) {
        tracing::warn!(user_id = identity.user_id, "{}", denied);
        return Ok(redirect(&urls::post_detail(post_id)));
    }

    let form = form.into_inner();
    let text = match form.validate() {
        Ok(text) => text,
        Err(errors) => {
            return Ok(render(views::comments::edit(
                Some(&identity),
                &comment,
                &form,
                &errors,
            )));
        }
    };

    state.comments.update(Comment { text, ..comment }).await?;

    tracing::info!(comment_id, post_id, "Comment updated");
    Ok(redirect(&urls::post_detail(post_id)))
}

/// GET /posts/{post_id}/comment/{comment_id}/delete/
pub async fn delete_confirm(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(i32, i32)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = comment_of_post(&state, post_id, comment_id).await?;
    if !policy::can_modify(identity.user_id, &comment) {
        return Ok(redirect(&urls::post_detail(post_id)));
    }

    Ok(render(views::comments::confirm_delete(
        Some(&identity),
        &comment,
    )))
}

/// POST /posts/{post_id}/comment/{comment_id}/delete/
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(i32, i32)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = comment_of_post(&state, post_id, comment_id).await?;
    if let Err(denied) = policy::authorize(identity.user_id, &comment) {
        tracing::warn!(user_id = identity.user_id, "{}", denied);
        return Ok(redirect(&urls::post_detail(post_id)));
    }

    state.comments.delete(comment.id).await?;

    tracing::info!(comment_id, post_id, "Comment deleted");
    Ok(redirect(&urls::post_detail(post_id)))
}
