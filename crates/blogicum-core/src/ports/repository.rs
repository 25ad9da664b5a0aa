use async_trait::async_trait;

use crate::domain::{
    Category, Comment, CommentView, Location, NewCategory, NewComment, NewLocation, NewPost,
    NewUser, Post, PostView, User,
};
use crate::error::RepoError;
use crate::pagination::{Page, PageRequest};
use crate::visibility::PostQuery;

/// Generic repository trait defining the operations every entity supports.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Overwrite a stored entity with `entity`.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i32> {
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
///
/// `delete` also removes the post's comments.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i32> {
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Load one post with author, category, location and comment count.
    async fn find_view(&self, id: i32) -> Result<Option<PostView>, RepoError>;

    /// One page of posts matching `query`, newest first.
    async fn list(&self, query: &PostQuery, page: PageRequest)
    -> Result<Page<PostView>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, i32> {
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError>;

    /// Comments of a post in creation order.
    async fn list_for_post(&self, post_id: i32) -> Result<Vec<CommentView>, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, i32> {
    async fn create(&self, category: NewCategory) -> Result<Category, RepoError>;

    /// Resolve a slug to a category, only if that category is published.
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    async fn list_published(&self) -> Result<Vec<Category>, RepoError>;
}

/// Location repository.
#[async_trait]
pub trait LocationRepository: BaseRepository<Location, i32> {
    async fn create(&self, location: NewLocation) -> Result<Location, RepoError>;

    async fn list_published(&self) -> Result<Vec<Location>, RepoError>;
}
