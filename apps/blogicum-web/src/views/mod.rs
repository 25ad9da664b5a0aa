//! HTML pages rendered with [maud](https://maud.lambda.xyz/).
//!
//! Every dynamic value goes through maud's escaping; no page builds HTML by
//! string concatenation.

pub mod account;
pub mod comments;
pub mod pages;
pub mod posts;

use blogicum_core::Page;
use blogicum_shared::FormErrors;
use chrono::{DateTime, Utc};
use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::middleware::auth::Identity;
use crate::urls;

/// Inline CSS shared by all pages.
pub const PAGE_CSS: &str = r#"
*{box-sizing:border-box}
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;line-height:1.6;color:#1d1d1f;background:#f7f7f8;margin:0}
header{background:#fff;border-bottom:1px solid #e5e5ea;padding:.75rem 1rem}
header nav{max-width:760px;margin:0 auto;display:flex;gap:1rem;align-items:center;flex-wrap:wrap}
header .brand{font-weight:700;margin-right:auto}
header form{display:inline;margin:0}
main{max-width:760px;margin:1.5rem auto;padding:0 1rem}
footer{max-width:760px;margin:2rem auto;padding:0 1rem;color:#8e8e93;font-size:.85rem}
a{color:#0a58ca;text-decoration:none}
a:hover{text-decoration:underline}
.card{background:#fff;border:1px solid #e5e5ea;border-radius:8px;padding:1rem 1.25rem;margin-bottom:1rem}
.meta{color:#6e6e73;font-size:.9rem}
.badge{display:inline-block;background:#fff3cd;color:#664d03;border-radius:4px;padding:0 .4rem;font-size:.8rem}
.post-text{white-space:pre-wrap;word-break:break-word}
.post-image{max-width:100%;border-radius:6px}
.errorlist{color:#b02a37;margin:.25rem 0;padding-left:1.25rem}
form.stacked label{display:block;margin-top:.75rem;font-weight:600}
form.stacked input[type=text],form.stacked input[type=email],form.stacked input[type=password],form.stacked input[type=url],form.stacked input[type=datetime-local],form.stacked textarea,form.stacked select{width:100%;padding:.4rem;border:1px solid #c7c7cc;border-radius:4px;font:inherit}
form.stacked textarea{min-height:8rem}
button,.button{margin-top:1rem;padding:.45rem 1rem;border:0;border-radius:4px;background:#0a58ca;color:#fff;font:inherit;cursor:pointer}
button.link{background:none;color:#0a58ca;padding:0;margin:0}
button.danger{background:#b02a37}
.pagination{display:flex;gap:1rem;justify-content:center;margin:1.5rem 0}
"#;

/// Wrap `body` in the site chrome.
pub fn layout(title: &str, viewer: Option<&Identity>, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " | Blogicum" }
                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                header {
                    nav {
                        a class="brand" href="/" { "Blogicum" }
                        a href="/" { "Home" }
                        a href="/about/" { "About" }
                        a href="/rules/" { "Rules" }
                        @match viewer {
                            Some(identity) => {
                                a href="/posts/create/" { "New post" }
                                a href=(urls::profile(&identity.username)) { (identity.username) }
                                form method="post" action="/auth/logout/" {
                                    button class="link" type="submit" { "Log out" }
                                }
                            }
                            None => {
                                a href="/auth/login/" { "Log in" }
                                a href="/auth/registration/" { "Sign up" }
                            }
                        }
                    }
                }
                main { (body) }
                footer { "Blogicum" }
            }
        }
    }
}

/// Errors attached to one field.
pub fn field_errors(errors: &FormErrors, field: &str) -> Markup {
    let messages = errors.field(field);
    html! {
        @if !messages.is_empty() {
            ul class="errorlist" {
                @for message in messages {
                    li { (message) }
                }
            }
        }
    }
}

/// Errors about the form as a whole.
pub fn non_field_errors(errors: &FormErrors) -> Markup {
    html! {
        @if !errors.non_field().is_empty() {
            ul class="errorlist" {
                @for message in errors.non_field() {
                    li { (message) }
                }
            }
        }
    }
}

/// Previous/next links for a paginated listing rooted at `base`.
pub fn pagination<T>(page: &Page<T>, base: &str) -> Markup {
    html! {
        @if page.num_pages > 1 {
            nav class="pagination" {
                @if page.has_previous() {
                    a href={ (base) "?page=1" } { "« first" }
                    a href={ (base) "?page=" (page.number - 1) } { "previous" }
                }
                span { "Page " (page.number) " of " (page.num_pages) }
                @if page.has_next() {
                    a href={ (base) "?page=" (page.number + 1) } { "next" }
                    a href={ (base) "?page=" (page.num_pages) } { "last »" }
                }
            }
        }
    }
}

pub fn format_date(value: DateTime<Utc>) -> String {
    value.format("%d %B %Y, %H:%M").to_string()
}
