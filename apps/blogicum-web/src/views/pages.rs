//! Static pages and error pages.

use actix_web::http::StatusCode;
use maud::{Markup, html};

use super::layout;
use crate::middleware::auth::Identity;

pub fn about(viewer: Option<&Identity>) -> Markup {
    layout(
        "About",
        viewer,
        html! {
            h1 { "About" }
            div class="card" {
                p {
                    "Blogicum is a place to keep a travel and life journal: write posts, "
                    "sort them into categories, tag where they happened and talk about them "
                    "in the comments."
                }
                p {
                    "Posts can be drafted or scheduled. Only published posts whose date has "
                    "come, in a published category, show up in the feed."
                }
            }
        },
    )
}

pub fn rules(viewer: Option<&Identity>) -> Markup {
    layout(
        "Rules",
        viewer,
        html! {
            h1 { "Rules" }
            div class="card" {
                ol {
                    li { "Be polite to other authors and commenters." }
                    li { "Post only content you have the right to publish." }
                    li { "No spam, advertising or link farms." }
                    li { "Keep comments on the topic of the post." }
                }
                p class="meta" { "Posts and comments that break the rules may be removed." }
            }
        },
    )
}

/// Dedicated page for an error status.
pub fn error(status: StatusCode, message: &str) -> Markup {
    let title = match status {
        StatusCode::NOT_FOUND => "Page not found",
        StatusCode::FORBIDDEN => "Request rejected",
        StatusCode::BAD_REQUEST => "Bad request",
        _ => "Something went wrong",
    };

    layout(
        title,
        None,
        html! {
            div class="card" {
                h1 { (status.as_u16()) " · " (title) }
                p { (message) }
                p { a href="/" { "Back to the feed" } }
            }
        },
    )
}
