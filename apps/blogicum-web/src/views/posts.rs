//! Post listings, detail page and the post form.

use blogicum_core::Page;
use blogicum_core::domain::{Category, CommentView, Location, Post, PostView};
use blogicum_core::visibility::is_publicly_visible;
use blogicum_shared::{CommentForm, FormErrors, PostForm};
use chrono::Utc;
use maud::{Markup, html};

use super::{comments, field_errors, format_date, layout, non_field_errors, pagination};
use crate::middleware::auth::Identity;
use crate::urls;

fn byline(view: &PostView) -> Markup {
    html! {
        p class="meta" {
            (format_date(view.post.pub_date))
            " · "
            a href=(urls::profile(&view.author.username)) { "@" (view.author.username) }
            @if let Some(location) = &view.location {
                @if location.is_published {
                    " · " (location.name)
                }
            }
            @if let Some(category) = &view.category {
                " · "
                @if category.is_published {
                    a href=(urls::category(&category.slug)) { (category.title) }
                } @else {
                    (category.title)
                }
            }
        }
    }
}

/// Badges only the author ever sees: why a post is not public yet.
fn status_badges(post: &Post, category: Option<&Category>) -> Markup {
    let now = Utc::now();
    html! {
        @if !is_publicly_visible(post, category, now) {
            p {
                @if !post.is_published {
                    span class="badge" { "unpublished" } " "
                }
                @if post.pub_date > now {
                    span class="badge" { "scheduled" } " "
                }
                @if !category.is_some_and(|c| c.is_published) {
                    span class="badge" { "category hidden" }
                }
            }
        }
    }
}

fn excerpt(text: &str) -> String {
    const LIMIT: usize = 300;
    if text.chars().count() <= LIMIT {
        text.to_string()
    } else {
        let cut: String = text.chars().take(LIMIT).collect();
        format!("{}…", cut.trim_end())
    }
}

pub fn post_card(view: &PostView) -> Markup {
    html! {
        article class="card" {
            h2 { a href=(urls::post_detail(view.post.id)) { (view.post.title) } }
            (byline(view))
            (status_badges(&view.post, view.category.as_ref()))
            p class="post-text" { (excerpt(&view.post.text)) }
            p class="meta" {
                a href=(urls::post_detail(view.post.id)) {
                    "Comments (" (view.comment_count) ")"
                }
            }
        }
    }
}

/// Cards for one page of posts, followed by the page links.
pub fn post_list(page: &Page<PostView>, base: &str) -> Markup {
    html! {
        @if page.items.is_empty() {
            p class="meta" { "No posts yet." }
        }
        @for view in &page.items {
            (post_card(view))
        }
        (pagination(page, base))
    }
}

pub fn feed(viewer: Option<&Identity>, page: &Page<PostView>) -> Markup {
    layout(
        "Latest posts",
        viewer,
        html! {
            h1 { "Latest posts" }
            (post_list(page, "/"))
        },
    )
}

pub fn category(viewer: Option<&Identity>, category: &Category, page: &Page<PostView>) -> Markup {
    layout(
        &category.title,
        viewer,
        html! {
            h1 { (category.title) }
            @if !category.description.is_empty() {
                p { (category.description) }
            }
            (post_list(page, &urls::category(&category.slug)))
        },
    )
}

pub struct DetailPage<'a> {
    pub viewer: Option<&'a Identity>,
    pub view: &'a PostView,
    pub comments: &'a [CommentView],
    pub comment_form: &'a CommentForm,
    pub comment_errors: &'a FormErrors,
}

pub fn detail(page: DetailPage<'_>) -> Markup {
    let DetailPage {
        viewer,
        view,
        comments,
        comment_form,
        comment_errors,
    } = page;
    let post = &view.post;
    let is_author = viewer.is_some_and(|v| v.user_id == post.author_id);

    layout(
        &post.title,
        viewer,
        html! {
            article class="card" {
                h1 { (post.title) }
                (byline(view))
                @if is_author {
                    (status_badges(post, view.category.as_ref()))
                    p {
                        a href=(urls::post_edit(post.id)) { "Edit" }
                        " · "
                        a href=(urls::post_delete(post.id)) { "Delete" }
                    }
                }
                @if let Some(image) = &post.image {
                    img class="post-image" src=(image) alt=(post.title);
                }
                p class="post-text" { (post.text) }
            }
            section {
                h2 { "Comments (" (comments.len()) ")" }
                @for item in comments {
                    (comments::comment_item(item, viewer))
                }
                @if viewer.is_some() {
                    (comments::comment_form(
                        &urls::comment_add(post.id),
                        comment_form,
                        comment_errors,
                        "Add comment",
                    ))
                } @else {
                    p class="meta" {
                        a href=(urls::login_then(&urls::post_detail(post.id))) { "Log in" }
                        " to leave a comment."
                    }
                }
            }
        },
    )
}

/// Inputs for the create/edit post page.
pub struct PostFormPage<'a> {
    pub viewer: Option<&'a Identity>,
    pub heading: &'a str,
    pub action: &'a str,
    pub form: &'a PostForm,
    pub errors: &'a FormErrors,
    pub categories: &'a [Category],
    pub locations: &'a [Location],
}

pub fn post_form(page: PostFormPage<'_>) -> Markup {
    let PostFormPage {
        viewer,
        heading,
        action,
        form,
        errors,
        categories,
        locations,
    } = page;

    layout(
        heading,
        viewer,
        html! {
            h1 { (heading) }
            form class="stacked card" method="post" action=(action) {
                (non_field_errors(errors))

                label for="id_title" { "Title" }
                input id="id_title" type="text" name="title" maxlength="256" value=(form.title);
                (field_errors(errors, "title"))

                label for="id_text" { "Text" }
                textarea id="id_text" name="text" { (form.text) }
                (field_errors(errors, "text"))

                label for="id_pub_date" { "Publication date" }
                input id="id_pub_date" type="datetime-local" name="pub_date" value=(form.pub_date);
                (field_errors(errors, "pub_date"))

                label for="id_image" { "Image URL" }
                input id="id_image" type="url" name="image" value=(form.image);
                (field_errors(errors, "image"))

                label for="id_category" { "Category" }
                select id="id_category" name="category" {
                    option value="" { "---------" }
                    @for c in categories {
                        @let value = c.id.to_string();
                        option value=(value) selected[form.category == value] { (c.title) }
                    }
                }
                (field_errors(errors, "category"))

                label for="id_location" { "Location" }
                select id="id_location" name="location" {
                    option value="" { "---------" }
                    @for l in locations {
                        @let value = l.id.to_string();
                        option value=(value) selected[form.location == value] { (l.name) }
                    }
                }
                (field_errors(errors, "location"))

                label {
                    input type="checkbox" name="is_published" checked[form.is_published()];
                    " Published"
                }

                button type="submit" { "Save" }
            }
        },
    )
}

pub fn confirm_delete(viewer: Option<&Identity>, view: &PostView) -> Markup {
    layout(
        "Delete post",
        viewer,
        html! {
            h1 { "Delete post" }
            (post_card(view))
            form class="card" method="post" action=(urls::post_delete(view.post.id)) {
                p { "The post and all of its comments will be removed." }
                button class="danger" type="submit" { "Delete" }
                " "
                a href=(urls::post_detail(view.post.id)) { "Cancel" }
            }
        },
    )
}
