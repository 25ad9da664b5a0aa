//! PostgreSQL repository implementations.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};

use blogicum_core::domain::{
    Category, Comment, CommentView, Location, NewCategory, NewComment, NewLocation, NewPost,
    NewUser, Post, PostView, User,
};
use blogicum_core::error::RepoError;
use blogicum_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};
use blogicum_core::{Page, PageRequest, PostQuery, Visibility};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::location::{self, Entity as LocationEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, query_error, write_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL location repository.
pub type PostgresLocationRepository = PostgresBaseRepository<LocationEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, RepoError> {
        tracing::debug!(username = %new_user.username, "Creating user");

        let model = user::ActiveModel::from(new_user)
            .insert(&self.db)
            .await
            .map_err(write_error)?;

        Ok(model.into())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }
}

/// Narrow a post select to `query`'s author/category scope and visibility.
///
/// The public branch joins `categories` so the category's own flag takes part
/// in the filter; posts without a category drop out of the inner join.
fn apply_post_query(mut select: Select<PostEntity>, query: &PostQuery) -> Select<PostEntity> {
    if let Some(author_id) = query.author_id {
        select = select.filter(post::Column::AuthorId.eq(author_id));
    }
    if let Some(category_id) = query.category_id {
        select = select.filter(post::Column::CategoryId.eq(category_id));
    }

    match query.visibility {
        Visibility::Public { now } => select
            .inner_join(CategoryEntity)
            .filter(post::Column::IsPublished.eq(true))
            .filter(post::Column::PubDate.lte(now))
            .filter(category::Column::IsPublished.eq(true)),
        Visibility::All => select,
    }
}

fn distinct_ids(ids: impl Iterator<Item = i32>) -> Vec<i32> {
    let unique: HashSet<i32> = ids.collect();
    unique.into_iter().collect()
}

impl PostgresPostRepository {
    /// Attach authors, categories, locations and comment counts to posts,
    /// one query per relation.
    async fn hydrate(&self, models: Vec<post::Model>) -> Result<Vec<PostView>, RepoError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let author_ids = distinct_ids(models.iter().map(|m| m.author_id));
        let category_ids = distinct_ids(models.iter().filter_map(|m| m.category_id));
        let location_ids = distinct_ids(models.iter().filter_map(|m| m.location_id));

        let authors: HashMap<i32, User> = UserEntity::find()
            .filter(user::Column::Id.is_in(author_ids))
            .all(&self.db)
            .await
            .map_err(query_error)?
            .into_iter()
            .map(|m| (m.id, User::from(m)))
            .collect();

        let categories: HashMap<i32, Category> = if category_ids.is_empty() {
            HashMap::new()
        } else {
            CategoryEntity::find()
                .filter(category::Column::Id.is_in(category_ids))
                .all(&self.db)
                .await
                .map_err(query_error)?
                .into_iter()
                .map(|m| (m.id, Category::from(m)))
                .collect()
        };

        let locations: HashMap<i32, Location> = if location_ids.is_empty() {
            HashMap::new()
        } else {
            LocationEntity::find()
                .filter(location::Column::Id.is_in(location_ids))
                .all(&self.db)
                .await
                .map_err(query_error)?
                .into_iter()
                .map(|m| (m.id, Location::from(m)))
                .collect()
        };

        let counts: HashMap<i32, i64> = CommentEntity::find()
            .select_only()
            .column(comment::Column::PostId)
            .column_as(Expr::col(comment::Column::Id).count(), "comment_count")
            .filter(comment::Column::PostId.is_in(post_ids))
            .group_by(comment::Column::PostId)
            .into_tuple::<(i32, i64)>()
            .all(&self.db)
            .await
            .map_err(query_error)?
            .into_iter()
            .collect();

        models
            .into_iter()
            .map(|model| {
                let author = authors
                    .get(&model.author_id)
                    .map(User::author)
                    .ok_or_else(|| {
                        RepoError::Query(format!("post {} has no author row", model.id))
                    })?;
                let comment_count = counts.get(&model.id).copied().unwrap_or(0).max(0) as u64;
                let category = model.category_id.and_then(|id| categories.get(&id).cloned());
                let location = model.location_id.and_then(|id| locations.get(&id).cloned());

                Ok(PostView {
                    post: model.into(),
                    author,
                    category,
                    location,
                    comment_count,
                })
            })
            .collect()
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        tracing::debug!(author_id = new_post.author_id, "Creating post");

        let model = post::ActiveModel::from(new_post)
            .insert(&self.db)
            .await
            .map_err(write_error)?;

        Ok(model.into())
    }

    async fn find_view(&self, id: i32) -> Result<Option<PostView>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_error)?
        else {
            return Ok(None);
        };

        Ok(self.hydrate(vec![model]).await?.pop())
    }

    async fn list(
        &self,
        query: &PostQuery,
        page: PageRequest,
    ) -> Result<Page<PostView>, RepoError> {
        let select = apply_post_query(PostEntity::find(), query);

        let total = select
            .clone()
            .count(&self.db)
            .await
            .map_err(query_error)?;

        tracing::debug!(?query, total, "Listing posts");

        let models = select
            .order_by_desc(post::Column::PubDate)
            .order_by_desc(post::Column::Id)
            .offset(page.offset(total))
            .limit(page.per_page())
            .all(&self.db)
            .await
            .map_err(query_error)?;

        let views = self.hydrate(models).await?;
        Ok(page.page(views, total))
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create(&self, new_comment: NewComment) -> Result<Comment, RepoError> {
        tracing::debug!(post_id = new_comment.post_id, "Creating comment");

        let model = comment::ActiveModel::from(new_comment)
            .insert(&self.db)
            .await
            .map_err(write_error)?;

        Ok(model.into())
    }

    async fn list_for_post(&self, post_id: i32) -> Result<Vec<CommentView>, RepoError> {
        let rows = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .find_also_related(UserEntity)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        rows.into_iter()
            .map(|(comment, author)| {
                let author = author.map(|m| User::from(m).author()).ok_or_else(|| {
                    RepoError::Query(format!("comment {} has no author row", comment.id))
                })?;
                Ok(CommentView {
                    comment: comment.into(),
                    author,
                })
            })
            .collect()
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn create(&self, new_category: NewCategory) -> Result<Category, RepoError> {
        let model = category::ActiveModel::from(new_category)
            .insert(&self.db)
            .await
            .map_err(write_error)?;

        Ok(model.into())
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        tracing::debug!(%slug, "Finding published category");

        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .filter(category::Column::IsPublished.eq(true))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn list_published(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::IsPublished.eq(true))
            .order_by_asc(category::Column::Title)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {
    async fn create(&self, new_location: NewLocation) -> Result<Location, RepoError> {
        let model = location::ActiveModel::from(new_location)
            .insert(&self.db)
            .await
            .map_err(write_error)?;

        Ok(model.into())
    }

    async fn list_published(&self) -> Result<Vec<Location>, RepoError> {
        let result = LocationEntity::find()
            .filter(location::Column::IsPublished.eq(true))
            .order_by_asc(location::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
