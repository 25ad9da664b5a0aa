use blogicum_core::domain::{Comment, CommentView};
use blogicum_shared::{CommentForm, FormErrors};
use maud::{Markup, html};

use super::{field_errors, format_date, layout, non_field_errors};
use crate::middleware::auth::Identity;
use crate::urls;

pub fn comment_item(item: &CommentView, viewer: Option<&Identity>) -> Markup {
    let comment = &item.comment;
    let is_author = viewer.is_some_and(|v| v.user_id == comment.author_id);
    html! {
        div class="card" id={ "comment-" (comment.id) } {
            p class="meta" {
                a href=(urls::profile(&item.author.username)) { "@" (item.author.username) }
                " · " (format_date(comment.created_at))
            }
            p class="post-text" { (comment.text) }
            @if is_author {
                p class="meta" {
                    a href=(urls::comment_edit(comment.post_id, comment.id)) { "Edit" }
                    " · "
                    a href=(urls::comment_delete(comment.post_id, comment.id)) { "Delete" }
                }
            }
        }
    }
}

pub fn comment_form(action: &str, form: &CommentForm, errors: &FormErrors, submit: &str) -> Markup {
    html! {
        form class="stacked card" method="post" action=(action) {
            (non_field_errors(errors))
            label for="id_text" { "Comment" }
            textarea id="id_text" name="text" { (form.text) }
            (field_errors(errors, "text"))
            button type="submit" { (submit) }
        }
    }
}

pub fn edit(
    viewer: Option<&Identity>,
    comment: &Comment,
    form: &CommentForm,
    errors: &FormErrors,
) -> Markup {
    layout(
        "Edit comment",
        viewer,
        html! {
            h1 { "Edit comment" }
            (comment_form(
                &urls::comment_edit(comment.post_id, comment.id),
                form,
                errors,
                "Save",
            ))
            p { a href=(urls::post_detail(comment.post_id)) { "Back to the post" } }
        },
    )
}

pub fn confirm_delete(viewer: Option<&Identity>, comment: &Comment) -> Markup {
    layout(
        "Delete comment",
        viewer,
        html! {
            h1 { "Delete comment" }
            div class="card" {
                p class="post-text" { (comment.text) }
            }
            form class="card" method="post" action=(urls::comment_delete(comment.post_id, comment.id)) {
                p { "This comment will be removed." }
                button class="danger" type="submit" { "Delete" }
                " "
                a href=(urls::post_detail(comment.post_id)) { "Cancel" }
            }
        },
    )
}
