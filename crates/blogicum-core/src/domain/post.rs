use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Author, Category, Location};

/// Post entity - represents a blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub text: String,
    pub image: Option<String>,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub author_id: i32,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// A post about to be stored.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub text: String,
    pub image: Option<String>,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub author_id: i32,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
}

/// A post with its relations preloaded and its comments counted.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub post: Post,
    pub author: Author,
    pub category: Option<Category>,
    pub location: Option<Location>,
    pub comment_count: u64,
}
