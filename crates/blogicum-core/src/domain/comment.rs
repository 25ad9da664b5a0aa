use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Author;

/// Comment entity - always bound to one post and one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i32,
    pub text: String,
    pub post_id: i32,
    pub author_id: i32,
    pub created_at: DateTime<Utc>,
}

/// A comment about to be stored. Post and author come from the request
/// context, never from user input.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub text: String,
    pub post_id: i32,
    pub author_id: i32,
}

/// A comment together with its author, as displayed under a post.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub comment: Comment,
    pub author: Author,
}
