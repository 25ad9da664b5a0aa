//! The public visibility filter shared by the feed, profile and category pages.
//!
//! A post is public when it is published, its publication date has passed and
//! its category is published. Repositories receive a [`PostQuery`] and apply
//! the same rule in their own query language; [`is_publicly_visible`] is the
//! reference predicate they are tested against.

use chrono::{DateTime, Utc};

use crate::domain::{Category, Post, PostView};

/// Which posts a listing may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Only posts passing the visibility filter at `now`.
    Public { now: DateTime<Utc> },
    /// Every post, whatever its publication state.
    All,
}

impl Visibility {
    pub fn admits(&self, post: &Post, category: Option<&Category>) -> bool {
        match self {
            Visibility::Public { now } => is_publicly_visible(post, category, *now),
            Visibility::All => true,
        }
    }
}

/// Returns true when `post` may be shown to anyone at `now`.
///
/// `category` must be the post's own category; a post without one is never
/// public.
pub fn is_publicly_visible(post: &Post, category: Option<&Category>, now: DateTime<Utc>) -> bool {
    post.is_published
        && post.pub_date <= now
        && category.is_some_and(|c| c.is_published && Some(c.id) == post.category_id)
}

/// Returns true when `viewer` may open the detail page of `view`.
///
/// Authors always see their own posts.
pub fn can_view(viewer: Option<i32>, view: &PostView, now: DateTime<Utc>) -> bool {
    viewer == Some(view.post.author_id)
        || is_publicly_visible(&view.post, view.category.as_ref(), now)
}

/// A post listing request: optional author/category scope plus visibility.
///
/// Results are always ordered by publication date, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    pub author_id: Option<i32>,
    pub category_id: Option<i32>,
    pub visibility: Visibility,
}

impl PostQuery {
    /// The main feed.
    pub fn feed(now: DateTime<Utc>) -> Self {
        Self {
            author_id: None,
            category_id: None,
            visibility: Visibility::Public { now },
        }
    }

    /// A profile page. The owner sees everything they wrote.
    pub fn profile(author_id: i32, viewer: Option<i32>, now: DateTime<Utc>) -> Self {
        let visibility = if viewer == Some(author_id) {
            Visibility::All
        } else {
            Visibility::Public { now }
        };
        Self {
            author_id: Some(author_id),
            category_id: None,
            visibility,
        }
    }

    /// A category page.
    pub fn category(category_id: i32, now: DateTime<Utc>) -> Self {
        Self {
            author_id: None,
            category_id: Some(category_id),
            visibility: Visibility::Public { now },
        }
    }

    /// Scope checks only; visibility is applied separately.
    pub fn in_scope(&self, post: &Post) -> bool {
        self.author_id.is_none_or(|id| post.author_id == id)
            && self.category_id.is_none_or(|id| post.category_id == Some(id))
    }

    pub fn matches(&self, post: &Post, category: Option<&Category>) -> bool {
        self.in_scope(post) && self.visibility.admits(post, category)
    }
}
