//! Paths of the site's pages, with user-supplied segments percent-encoded.

use url::Url;

fn path(segments: &[&str]) -> String {
    let fallback = || format!("/{}/", segments.join("/"));
    let Ok(mut url) = Url::parse("http://localhost/") else {
        return fallback();
    };
    match url.path_segments_mut() {
        Ok(mut parts) => {
            parts.clear().extend(segments).push("");
        }
        Err(()) => return fallback(),
    }
    url.path().to_string()
}

pub fn profile(username: &str) -> String {
    path(&["profile", username])
}

pub fn category(slug: &str) -> String {
    path(&["category", slug])
}

pub fn post_detail(post_id: i32) -> String {
    format!("/posts/{post_id}/")
}

pub fn post_edit(post_id: i32) -> String {
    format!("/posts/{post_id}/edit/")
}

pub fn post_delete(post_id: i32) -> String {
    format!("/posts/{post_id}/delete/")
}

pub fn comment_add(post_id: i32) -> String {
    format!("/posts/{post_id}/comment/")
}

pub fn comment_edit(post_id: i32, comment_id: i32) -> String {
    format!("/posts/{post_id}/comment/{comment_id}/edit/")
}

pub fn comment_delete(post_id: i32, comment_id: i32) -> String {
    format!("/posts/{post_id}/comment/{comment_id}/delete/")
}

/// Login page that sends the user back to `next` afterwards.
pub fn login_then(next: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
    format!("/auth/login/?next={encoded}")
}
