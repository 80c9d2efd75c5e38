//! Blog post repository for database operations
//!
//! Every operation is a single statement, so each one is atomic on its own
//! and nothing here performs a read-modify-write cycle.

use async_trait::async_trait;
use common::error::RepositoryResult;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{BlogPost, NewBlogPost, PostFilter, PostUpdate};

/// Storage operations behind the post endpoints
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Insert a post and return its store-assigned id
    async fn create(&self, post: &NewBlogPost) -> RepositoryResult<Uuid>;

    /// List posts in insertion order
    async fn list(&self, filter: &PostFilter) -> RepositoryResult<Vec<BlogPost>>;

    /// Fetch one post
    async fn get(&self, id: Uuid) -> RepositoryResult<Option<BlogPost>>;

    /// Merge the supplied fields; false if no post has the id
    async fn update(&self, id: Uuid, update: &PostUpdate) -> RepositoryResult<bool>;

    /// Remove a post; false if no post has the id
    async fn delete(&self, id: Uuid) -> RepositoryResult<bool>;

    /// Increment the like counter and return the new count
    async fn like(&self, id: Uuid) -> RepositoryResult<Option<i64>>;
}

/// PostgreSQL-backed post repository
#[derive(Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    /// Create a new post repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PostRepository {
    async fn create(&self, post: &NewBlogPost) -> RepositoryResult<Uuid> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO blog_posts (title, author, category, content, images, tags,
                                    seo_title, seo_description, is_draft, publish_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(&post.title)
        .bind(&post.author)
        .bind(&post.category)
        .bind(&post.content)
        .bind(&post.images)
        .bind(&post.tags)
        .bind(&post.seo_title)
        .bind(&post.seo_description)
        .bind(post.is_draft)
        .bind(post.publish_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list(&self, filter: &PostFilter) -> RepositoryResult<Vec<BlogPost>> {
        let posts = sqlx::query_as::<_, BlogPost>(
            r#"
            SELECT id, title, author, category, content, images, tags, seo_title,
                   seo_description, is_draft, publish_date, likes, created_at, updated_at
            FROM blog_posts
            WHERE ($1::TEXT IS NULL OR category = $1)
            ORDER BY created_at ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&filter.category)
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn get(&self, id: Uuid) -> RepositoryResult<Option<BlogPost>> {
        let post = sqlx::query_as::<_, BlogPost>(
            r#"
            SELECT id, title, author, category, content, images, tags, seo_title,
                   seo_description, is_draft, publish_date, likes, created_at, updated_at
            FROM blog_posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn update(&self, id: Uuid, update: &PostUpdate) -> RepositoryResult<bool> {
        // Absent required fields bind as NULL and COALESCE keeps the stored
        // value. Nullable fields carry a flag so an explicit null clears them.
        let result = sqlx::query(
            r#"
            UPDATE blog_posts
            SET title = COALESCE($2, title),
                author = COALESCE($3, author),
                category = COALESCE($4, category),
                content = COALESCE($5, content),
                images = COALESCE($6, images),
                tags = COALESCE($7, tags),
                seo_title = CASE WHEN $8 THEN $9 ELSE seo_title END,
                seo_description = CASE WHEN $10 THEN $11 ELSE seo_description END,
                is_draft = COALESCE($12, is_draft),
                publish_date = CASE WHEN $13 THEN $14 ELSE publish_date END,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&update.title)
        .bind(&update.author)
        .bind(&update.category)
        .bind(&update.content)
        .bind(&update.images)
        .bind(&update.tags)
        .bind(update.seo_title.is_some())
        .bind(update.seo_title.clone().flatten())
        .bind(update.seo_description.is_some())
        .bind(update.seo_description.clone().flatten())
        .bind(update.is_draft)
        .bind(update.publish_date.is_some())
        .bind(update.publish_date.flatten())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn like(&self, id: Uuid) -> RepositoryResult<Option<i64>> {
        let likes = sqlx::query_scalar::<_, i64>(
            "UPDATE blog_posts SET likes = likes + 1 WHERE id = $1 RETURNING likes",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(likes)
    }
}
