//! Plan model and database operations
//!
//! Plans are priced offerings attached to a post. Public listings order by
//! price ascending; the "latest plans" homepage feed orders by creation time
//! descending instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Pricing plan attached to a post
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: Uuid,
    pub post_id: Uuid,
    /// Human-readable billing period, e.g. "1 month"
    pub duration: String,
    pub price: f64,
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Plan row joined with its post (and that post's category name)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PlanWithPost {
    pub id: Uuid,
    pub post_id: Uuid,
    pub duration: String,
    pub price: f64,
    pub features: Vec<String>,
    /// `None` when the post reference dangles
    pub post_name: Option<String>,
    pub post_description: Option<String>,
    pub post_logo_url: Option<String>,
    pub category_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a plan
#[derive(Debug, Clone)]
pub struct CreatePlan {
    pub post_id: Uuid,
    pub duration: String,
    pub price: f64,
    pub features: Vec<String>,
}

/// Input for updating a plan, `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdatePlan {
    pub post_id: Option<Uuid>,
    pub duration: Option<String>,
    pub price: Option<f64>,
    pub features: Option<Vec<String>>,
}

/// Whether a price is storable: finite, non-negative, at most two decimals
pub fn valid_price(price: f64) -> bool {
    if !price.is_finite() || price < 0.0 {
        return false;
    }
    let cents = price * 100.0;
    (cents - cents.round()).abs() < 1e-6
}

const WITH_POST_SELECT: &str = r#"
    SELECT pl.id, pl.post_id, pl.duration, pl.price, pl.features,
           p.name AS post_name,
           p.description AS post_description,
           p.logo_url AS post_logo_url,
           c.name AS category_name,
           pl.created_at, pl.updated_at
    FROM plans pl
    LEFT JOIN posts p ON p.id = pl.post_id
    LEFT JOIN categories c ON c.id = p.category_id
"#;

impl Plan {
    pub async fn create(pool: &PgPool, data: CreatePlan) -> Result<Self, sqlx::Error> {
        let plan = sqlx::query_as::<_, Plan>(
            r#"
            INSERT INTO plans (post_id, duration, price, features)
            VALUES ($1, $2, $3, $4)
            RETURNING id, post_id, duration, price, features, created_at, updated_at
            "#,
        )
        .bind(data.post_id)
        .bind(data.duration)
        .bind(data.price)
        .bind(data.features)
        .fetch_one(pool)
        .await?;

        Ok(plan)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let plan = sqlx::query_as::<_, Plan>(
            r#"
            SELECT id, post_id, duration, price, features, created_at, updated_at
            FROM plans
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(plan)
    }

    /// Finds a plan by ID with its post and category names joined in
    pub async fn find_by_id_with_post(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<PlanWithPost>, sqlx::Error> {
        let plan = sqlx::query_as::<_, PlanWithPost>(&format!(
            "{WITH_POST_SELECT} WHERE pl.id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(plan)
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdatePlan,
    ) -> Result<Option<Self>, sqlx::Error> {
        let plan = sqlx::query_as::<_, Plan>(
            r#"
            UPDATE plans
            SET post_id = COALESCE($2, post_id),
                duration = COALESCE($3, duration),
                price = COALESCE($4, price),
                features = COALESCE($5, features),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, post_id, duration, price, features, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.post_id)
        .bind(data.duration)
        .bind(data.price)
        .bind(data.features)
        .fetch_optional(pool)
        .await?;

        Ok(plan)
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM plans WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists one page of plans, newest first, with post details
    pub async fn list_latest(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PlanWithPost>, sqlx::Error> {
        let plans = sqlx::query_as::<_, PlanWithPost>(&format!(
            "{WITH_POST_SELECT} ORDER BY pl.created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(plans)
    }

    /// Lists every plan for one post, cheapest first
    pub async fn list_by_post(pool: &PgPool, post_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let plans = sqlx::query_as::<_, Plan>(
            r#"
            SELECT id, post_id, duration, price, features, created_at, updated_at
            FROM plans
            WHERE post_id = $1
            ORDER BY price ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(pool)
        .await?;

        Ok(plans)
    }

    /// Lists one page of a post's plans, cheapest first
    pub async fn list_by_post_page(
        pool: &PgPool,
        post_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let plans = sqlx::query_as::<_, Plan>(
            r#"
            SELECT id, post_id, duration, price, features, created_at, updated_at
            FROM plans
            WHERE post_id = $1
            ORDER BY price ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(post_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(plans)
    }

    /// Lists every plan with post details, cheapest first (admin surface)
    pub async fn list_all(pool: &PgPool) -> Result<Vec<PlanWithPost>, sqlx::Error> {
        let plans = sqlx::query_as::<_, PlanWithPost>(&format!(
            "{WITH_POST_SELECT} ORDER BY pl.price ASC"
        ))
        .fetch_all(pool)
        .await?;

        Ok(plans)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM plans")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Counts plans referencing a post
    pub async fn count_by_post(pool: &PgPool, post_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM plans WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_price_accepts_two_decimals() {
        assert!(valid_price(0.0));
        assert!(valid_price(9.99));
        assert!(valid_price(1200.5));
        assert!(valid_price(15.0));
    }

    #[test]
    fn test_valid_price_rejects_bad_values() {
        assert!(!valid_price(-0.01));
        assert!(!valid_price(9.999));
        assert!(!valid_price(f64::NAN));
        assert!(!valid_price(f64::INFINITY));
    }
}
