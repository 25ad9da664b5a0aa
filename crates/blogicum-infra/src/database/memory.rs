//! In-memory repositories - used as fallback when no database is configured.
//!
//! All repositories handed out by one [`InMemoryStore`] share the same tables,
//! so cascades (post -> comments) behave like the relational schema.
//! Note: Data is lost on process restart.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use blogicum_core::domain::{
    Category, Comment, CommentView, Location, NewCategory, NewComment, NewLocation, NewPost,
    NewUser, Post, PostView, User,
};
use blogicum_core::error::RepoError;
use blogicum_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, LocationRepository, PostRepository,
    UserRepository,
};
use blogicum_core::{Page, PageRequest, PostQuery};

/// One table: rows by id plus the id sequence.
pub struct Table<T> {
    rows: BTreeMap<i32, T>,
    next_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Default)]
pub struct Tables {
    users: Table<User>,
    categories: Table<Category>,
    locations: Table<Location>,
    posts: Table<Post>,
    comments: Table<Comment>,
}

impl Tables {
    fn post_view(&self, post: &Post) -> Result<PostView, RepoError> {
        let author = self
            .users
            .rows
            .get(&post.author_id)
            .map(User::author)
            .ok_or_else(|| RepoError::Query(format!("post {} has no author row", post.id)))?;
        let comment_count = self
            .comments
            .rows
            .values()
            .filter(|c| c.post_id == post.id)
            .count() as u64;

        Ok(PostView {
            post: post.clone(),
            author,
            category: post
                .category_id
                .and_then(|id| self.categories.rows.get(&id).cloned()),
            location: post
                .location_id
                .and_then(|id| self.locations.rows.get(&id).cloned()),
            comment_count,
        })
    }

    fn username_taken(&self, username: &str, except: Option<i32>) -> bool {
        self.users
            .rows
            .values()
            .any(|u| u.username == username && Some(u.id) != except)
    }

    fn slug_taken(&self, slug: &str, except: Option<i32>) -> bool {
        self.categories
            .rows
            .values()
            .any(|c| c.slug == slug && Some(c.id) != except)
    }

    /// Drop rows whose parent is gone and null out optional references, the
    /// way the foreign keys of the relational schema do.
    fn cascade(&mut self) {
        let Tables {
            users,
            categories,
            locations,
            posts,
            comments,
        } = self;

        posts
            .rows
            .retain(|_, post| users.rows.contains_key(&post.author_id));
        for post in posts.rows.values_mut() {
            if post
                .category_id
                .is_some_and(|id| !categories.rows.contains_key(&id))
            {
                post.category_id = None;
            }
            if post
                .location_id
                .is_some_and(|id| !locations.rows.contains_key(&id))
            {
                post.location_id = None;
            }
        }
        comments.rows.retain(|_, comment| {
            posts.rows.contains_key(&comment.post_id)
                && users.rows.contains_key(&comment.author_id)
        });
    }
}

/// A domain entity stored in one of the [`Tables`].
pub trait StoredRow: Clone + Send + Sync + 'static {
    const NAME: &'static str;

    fn id(&self) -> i32;
    fn table(tables: &Tables) -> &Table<Self>;
    fn table_mut(tables: &mut Tables) -> &mut Table<Self>;

    /// Unique-key checks run before an update is applied.
    fn check_unique(&self, _tables: &Tables) -> Result<(), RepoError> {
        Ok(())
    }
}

impl StoredRow for User {
    const NAME: &'static str = "user";

    fn id(&self) -> i32 {
        self.id
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.users
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.users
    }

    fn check_unique(&self, tables: &Tables) -> Result<(), RepoError> {
        if tables.username_taken(&self.username, Some(self.id)) {
            return Err(RepoError::Constraint(format!(
                "duplicate username {}",
                self.username
            )));
        }
        Ok(())
    }
}

impl StoredRow for Category {
    const NAME: &'static str = "category";

    fn id(&self) -> i32 {
        self.id
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.categories
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.categories
    }

    fn check_unique(&self, tables: &Tables) -> Result<(), RepoError> {
        if tables.slug_taken(&self.slug, Some(self.id)) {
            return Err(RepoError::Constraint(format!("duplicate slug {}", self.slug)));
        }
        Ok(())
    }
}

impl StoredRow for Location {
    const NAME: &'static str = "location";

    fn id(&self) -> i32 {
        self.id
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.locations
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.locations
    }
}

impl StoredRow for Post {
    const NAME: &'static str = "post";

    fn id(&self) -> i32 {
        self.id
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.posts
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.posts
    }
}

impl StoredRow for Comment {
    const NAME: &'static str = "comment";

    fn id(&self) -> i32 {
        self.id
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.comments
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.comments
    }
}

/// Shared storage behind the in-memory repositories.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryRepository::new(self.clone())
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryRepository::new(self.clone())
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        InMemoryRepository::new(self.clone())
    }

    pub fn categories(&self) -> InMemoryCategoryRepository {
        InMemoryRepository::new(self.clone())
    }

    pub fn locations(&self) -> InMemoryLocationRepository {
        InMemoryRepository::new(self.clone())
    }
}

/// Generic in-memory repository over one table of an [`InMemoryStore`].
pub struct InMemoryRepository<T> {
    store: InMemoryStore,
    _row: PhantomData<fn() -> T>,
}

impl<T> InMemoryRepository<T> {
    pub fn new(store: InMemoryStore) -> Self {
        Self {
            store,
            _row: PhantomData,
        }
    }
}

pub type InMemoryUserRepository = InMemoryRepository<User>;
pub type InMemoryPostRepository = InMemoryRepository<Post>;
pub type InMemoryCommentRepository = InMemoryRepository<Comment>;
pub type InMemoryCategoryRepository = InMemoryRepository<Category>;
pub type InMemoryLocationRepository = InMemoryRepository<Location>;

#[async_trait]
impl<T: StoredRow> BaseRepository<T, i32> for InMemoryRepository<T> {
    async fn find_by_id(&self, id: i32) -> Result<Option<T>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(T::table(&tables).rows.get(&id).cloned())
    }

    async fn update(&self, entity: T) -> Result<T, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !T::table(&tables).rows.contains_key(&entity.id()) {
            return Err(RepoError::NotFound);
        }
        entity.check_unique(&tables)?;
        T::table_mut(&mut tables)
            .rows
            .insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if T::table_mut(&mut tables).rows.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.cascade();
        tracing::debug!(entity = T::NAME, id, "Deleted from in-memory store");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.username_taken(&new_user.username, None) {
            return Err(RepoError::Constraint(format!(
                "duplicate username {}",
                new_user.username
            )));
        }

        let user = User {
            id: tables.users.next_id(),
            username: new_user.username,
            email: new_user.email,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            password_hash: new_user.password_hash,
            date_joined: Utc::now(),
        };
        tables.users.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .users
            .rows
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.users.rows.contains_key(&new_post.author_id) {
            return Err(RepoError::Constraint("unknown author".to_string()));
        }

        let post = Post {
            id: tables.posts.next_id(),
            title: new_post.title,
            text: new_post.text,
            image: new_post.image,
            pub_date: new_post.pub_date,
            is_published: new_post.is_published,
            author_id: new_post.author_id,
            category_id: new_post.category_id,
            location_id: new_post.location_id,
            created_at: Utc::now(),
        };
        tables.posts.rows.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_view(&self, id: i32) -> Result<Option<PostView>, RepoError> {
        let tables = self.store.tables.read().await;
        tables
            .posts
            .rows
            .get(&id)
            .map(|post| tables.post_view(post))
            .transpose()
    }

    async fn list(
        &self,
        query: &PostQuery,
        page: PageRequest,
    ) -> Result<Page<PostView>, RepoError> {
        let tables = self.store.tables.read().await;

        let mut matching: Vec<&Post> = tables
            .posts
            .rows
            .values()
            .filter(|post| {
                let category = post
                    .category_id
                    .and_then(|id| tables.categories.rows.get(&id));
                query.matches(post, category)
            })
            .collect();
        matching.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));

        let total = matching.len() as u64;
        let views = matching
            .into_iter()
            .skip(page.offset(total) as usize)
            .take(page.per_page() as usize)
            .map(|post| tables.post_view(post))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(page.page(views, total))
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn create(&self, new_comment: NewComment) -> Result<Comment, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.posts.rows.contains_key(&new_comment.post_id) {
            return Err(RepoError::Constraint("unknown post".to_string()));
        }
        if !tables.users.rows.contains_key(&new_comment.author_id) {
            return Err(RepoError::Constraint("unknown author".to_string()));
        }

        let comment = Comment {
            id: tables.comments.next_id(),
            text: new_comment.text,
            post_id: new_comment.post_id,
            author_id: new_comment.author_id,
            created_at: Utc::now(),
        };
        tables.comments.rows.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn list_for_post(&self, post_id: i32) -> Result<Vec<CommentView>, RepoError> {
        let tables = self.store.tables.read().await;

        let mut comments: Vec<&Comment> = tables
            .comments
            .rows
            .values()
            .filter(|c| c.post_id == post_id)
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        comments
            .into_iter()
            .map(|comment| {
                let author = tables
                    .users
                    .rows
                    .get(&comment.author_id)
                    .map(User::author)
                    .ok_or_else(|| {
                        RepoError::Query(format!("comment {} has no author row", comment.id))
                    })?;
                Ok(CommentView {
                    comment: comment.clone(),
                    author,
                })
            })
            .collect()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn create(&self, new_category: NewCategory) -> Result<Category, RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.slug_taken(&new_category.slug, None) {
            return Err(RepoError::Constraint(format!(
                "duplicate slug {}",
                new_category.slug
            )));
        }

        let category = Category {
            id: tables.categories.next_id(),
            title: new_category.title,
            description: new_category.description,
            slug: new_category.slug,
            is_published: new_category.is_published,
            created_at: Utc::now(),
        };
        tables.categories.rows.insert(category.id, category.clone());
        Ok(category)
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .categories
            .rows
            .values()
            .find(|c| c.slug == slug && c.is_published)
            .cloned())
    }

    async fn list_published(&self) -> Result<Vec<Category>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut categories: Vec<Category> = tables
            .categories
            .rows
            .values()
            .filter(|c| c.is_published)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(categories)
    }
}

#[async_trait]
impl LocationRepository for InMemoryLocationRepository {
    async fn create(&self, new_location: NewLocation) -> Result<Location, RepoError> {
        let mut tables = self.store.tables.write().await;
        let location = Location {
            id: tables.locations.next_id(),
            name: new_location.name,
            is_published: new_location.is_published,
            created_at: Utc::now(),
        };
        tables.locations.rows.insert(location.id, location.clone());
        Ok(location)
    }

    async fn list_published(&self) -> Result<Vec<Location>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut locations: Vec<Location> = tables
            .locations
            .rows
            .values()
            .filter(|l| l.is_published)
            .cloned()
            .collect();
        locations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(locations)
    }
}
