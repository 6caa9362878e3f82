//! Category model and database operations
//!
//! Categories are the top level of the catalog hierarchy. Each category
//! carries a URL-friendly slug derived from its name; the slug is generated
//! on create and regenerated whenever the name changes, never edited
//! directly by clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::slug::slugify;

/// Catalog category
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique category ID (UUID v4)
    pub id: Uuid,

    /// Display name, unique across all categories
    pub name: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Optional image URL (object storage or local uploads)
    pub image_url: Option<String>,

    /// URL-friendly identifier derived from the name
    pub slug: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a category
#[derive(Debug, Clone)]
pub struct CreateCategory {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Input for updating a category
///
/// `None` fields are left unchanged. Renaming regenerates the slug.
#[derive(Debug, Clone, Default)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl Category {
    /// Creates a new category, deriving the slug from the name
    pub async fn create(pool: &PgPool, data: CreateCategory) -> Result<Self, sqlx::Error> {
        let slug = slugify(&data.name);

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description, image_url, slug)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, image_url, slug, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.image_url)
        .bind(slug)
        .fetch_one(pool)
        .await?;

        Ok(category)
    }

    /// Finds a category by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, image_url, slug, created_at, updated_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(category)
    }

    /// Checks whether a category with the given name already exists
    ///
    /// `exclude` skips one ID, so a category can keep its own name on update.
    pub async fn name_taken(
        pool: &PgPool,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM categories WHERE name = $1 AND ($2::uuid IS NULL OR id != $2)",
        )
        .bind(name)
        .bind(exclude)
        .fetch_one(pool)
        .await?;

        Ok(count > 0)
    }

    /// Updates a category with partial data
    ///
    /// Returns the updated category, or `None` if it does not exist. When the
    /// name changes the slug is recomputed in the same statement.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateCategory,
    ) -> Result<Option<Self>, sqlx::Error> {
        let slug = data.name.as_deref().map(slugify);

        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                image_url = COALESCE($4, image_url),
                slug = COALESCE($5, slug),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, image_url, slug, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.image_url)
        .bind(slug)
        .fetch_optional(pool)
        .await?;

        Ok(category)
    }

    /// Deletes a category by ID, returning whether a row was removed
    ///
    /// Callers must enforce the delete-restrict policy (no posts may still
    /// reference the category) before calling this.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists one page of categories ordered by name
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, image_url, slug, created_at, updated_at
            FROM categories
            ORDER BY name ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(categories)
    }

    /// Lists every category ordered by name (admin surface, homepage feed)
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, image_url, slug, created_at, updated_at
            FROM categories
            ORDER BY name ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(categories)
    }

    /// Counts all categories
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_input_slug_derivation() {
        // The slug column is always populated from the name, not the caller.
        assert_eq!(slugify("Cloud Hosting"), "cloud-hosting");
    }

    #[test]
    fn test_category_serializes_camel_case() {
        let category = Category {
            id: Uuid::new_v4(),
            name: "Gaming".to_string(),
            description: None,
            image_url: Some("/uploads/categories/x.png".to_string()),
            slug: "gaming".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&category).unwrap();
        assert!(json.get("imageUrl").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("image_url").is_none());
    }
}
