//! Domain entities - the core business objects.

mod category;
mod comment;
mod location;
mod post;
mod user;

pub use category::{Category, NewCategory};
pub use comment::{Comment, CommentView, NewComment};
pub use location::{Location, NewLocation};
pub use post::{NewPost, Post, PostView};
pub use user::{Author, NewUser, User};
