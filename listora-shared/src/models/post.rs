//! Post model and database operations
//!
//! Posts are catalog listings that belong to a category and own zero or more
//! plans. The category reference is advisory (no foreign key), so the read
//! queries LEFT JOIN to tolerate a dangling reference instead of dropping
//! the row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Catalog post (listing)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique post ID (UUID v4)
    pub id: Uuid,

    /// Display name, unique across all posts
    pub name: String,

    /// Listing description
    pub description: String,

    /// Owning category
    pub category_id: Uuid,

    /// Optional logo URL (object storage or local uploads)
    pub logo_url: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post row joined with its category name, for list and detail responses
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PostWithCategory {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category_id: Uuid,
    /// `None` when the category reference dangles
    pub category_name: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a post
#[derive(Debug, Clone)]
pub struct CreatePost {
    pub name: String,
    pub description: String,
    pub category_id: Uuid,
    pub logo_url: Option<String>,
}

/// Input for updating a post, `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdatePost {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub logo_url: Option<String>,
}

const WITH_CATEGORY_SELECT: &str = r#"
    SELECT p.id, p.name, p.description, p.category_id,
           c.name AS category_name,
           p.logo_url, p.created_at, p.updated_at
    FROM posts p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

impl Post {
    /// Creates a new post
    pub async fn create(pool: &PgPool, data: CreatePost) -> Result<Self, sqlx::Error> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (name, description, category_id, logo_url)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, category_id, logo_url, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.category_id)
        .bind(data.logo_url)
        .fetch_one(pool)
        .await?;

        Ok(post)
    }

    /// Finds a post by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, name, description, category_id, logo_url, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(post)
    }

    /// Finds a post by ID with its category name joined in
    pub async fn find_by_id_with_category(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<PostWithCategory>, sqlx::Error> {
        let post = sqlx::query_as::<_, PostWithCategory>(&format!(
            "{WITH_CATEGORY_SELECT} WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(post)
    }

    /// Checks whether a post with the given name already exists
    pub async fn name_taken(
        pool: &PgPool,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM posts WHERE name = $1 AND ($2::uuid IS NULL OR id != $2)",
        )
        .bind(name)
        .bind(exclude)
        .fetch_one(pool)
        .await?;

        Ok(count > 0)
    }

    /// Updates a post with partial data, returning `None` if it does not exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdatePost,
    ) -> Result<Option<Self>, sqlx::Error> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                category_id = COALESCE($4, category_id),
                logo_url = COALESCE($5, logo_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, category_id, logo_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.category_id)
        .bind(data.logo_url)
        .fetch_optional(pool)
        .await?;

        Ok(post)
    }

    /// Deletes a post by ID, returning whether a row was removed
    ///
    /// Callers must enforce the delete-restrict policy (no plans may still
    /// reference the post) before calling this.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists one page of posts, newest first, with category names
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostWithCategory>, sqlx::Error> {
        let posts = sqlx::query_as::<_, PostWithCategory>(&format!(
            "{WITH_CATEGORY_SELECT} ORDER BY p.created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(posts)
    }

    /// Lists one page of posts in a category, newest first
    pub async fn list_by_category(
        pool: &PgPool,
        category_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostWithCategory>, sqlx::Error> {
        let posts = sqlx::query_as::<_, PostWithCategory>(&format!(
            "{WITH_CATEGORY_SELECT} WHERE p.category_id = $1 \
             ORDER BY p.created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(category_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(posts)
    }

    /// Lists every post with category names, newest first (admin surface)
    pub async fn list_all(pool: &PgPool) -> Result<Vec<PostWithCategory>, sqlx::Error> {
        let posts = sqlx::query_as::<_, PostWithCategory>(&format!(
            "{WITH_CATEGORY_SELECT} ORDER BY p.created_at DESC"
        ))
        .fetch_all(pool)
        .await?;

        Ok(posts)
    }

    /// Counts all posts
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Counts posts referencing a category
    pub async fn count_by_category(pool: &PgPool, category_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM posts WHERE category_id = $1")
                .bind(category_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_with_category_tolerates_dangling_reference() {
        let row = PostWithCategory {
            id: Uuid::new_v4(),
            name: "Acme VPN".to_string(),
            description: "Fast and private".to_string(),
            category_id: Uuid::new_v4(),
            category_name: None,
            logo_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&row).unwrap();
        assert!(json.get("categoryName").unwrap().is_null());
        assert_eq!(json.get("name").unwrap(), "Acme VPN");
    }
}
