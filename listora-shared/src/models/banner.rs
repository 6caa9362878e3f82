//! Banner model and database operations
//!
//! Banners are promotional tiles that point at exactly one entity, either a
//! category or a plan. The row keeps two nullable reference columns, and
//! every write path normalizes them so that only the column matching the
//! link type survives. A banner can therefore never point both ways, no
//! matter what the client sends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Which entity a banner links to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "banner_link_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BannerLinkType {
    Category,
    Plan,
}

impl BannerLinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BannerLinkType::Category => "category",
            BannerLinkType::Plan => "plan",
        }
    }

    /// Parses the wire form ("category" / "plan")
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "category" => Some(BannerLinkType::Category),
            "plan" => Some(BannerLinkType::Plan),
            _ => None,
        }
    }
}

/// Drops whichever reference does not match the link type
///
/// Returns `(linked_category_id, linked_plan_id)` with the off-type side
/// forced to `None`. Applied before every insert and update so stale
/// references cannot survive a link type switch.
pub fn normalize_links(
    link_type: BannerLinkType,
    linked_category_id: Option<Uuid>,
    linked_plan_id: Option<Uuid>,
) -> (Option<Uuid>, Option<Uuid>) {
    match link_type {
        BannerLinkType::Category => (linked_category_id, None),
        BannerLinkType::Plan => (None, linked_plan_id),
    }
}

/// Promotional banner
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: Uuid,
    pub title: String,
    /// Image URL, required; banners are purely visual without one
    pub image_url: String,
    pub link_type: BannerLinkType,
    pub linked_category_id: Option<Uuid>,
    pub linked_plan_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Banner row with the linked entity's display fields joined in
///
/// Category links resolve to the category name; plan links resolve to the
/// plan's duration and price. The off-type columns are always `NULL`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BannerResolved {
    pub id: Uuid,
    pub title: String,
    pub image_url: String,
    pub link_type: BannerLinkType,
    pub linked_category_id: Option<Uuid>,
    pub linked_plan_id: Option<Uuid>,
    pub linked_category_name: Option<String>,
    pub linked_plan_duration: Option<String>,
    pub linked_plan_price: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a banner; references must already be normalized
#[derive(Debug, Clone)]
pub struct CreateBanner {
    pub title: String,
    pub image_url: String,
    pub link_type: BannerLinkType,
    pub linked_category_id: Option<Uuid>,
    pub linked_plan_id: Option<Uuid>,
}

/// Input for updating a banner; all fields are written, not merged
///
/// Updates replace the whole link (type + reference) atomically, so the
/// caller re-submits the full banner shape after validation.
#[derive(Debug, Clone)]
pub struct UpdateBanner {
    pub title: String,
    pub image_url: String,
    pub link_type: BannerLinkType,
    pub linked_category_id: Option<Uuid>,
    pub linked_plan_id: Option<Uuid>,
}

const RESOLVED_SELECT: &str = r#"
    SELECT b.id, b.title, b.image_url, b.link_type,
           b.linked_category_id, b.linked_plan_id,
           c.name AS linked_category_name,
           pl.duration AS linked_plan_duration,
           pl.price AS linked_plan_price,
           b.created_at, b.updated_at
    FROM banners b
    LEFT JOIN categories c ON c.id = b.linked_category_id
    LEFT JOIN plans pl ON pl.id = b.linked_plan_id
"#;

impl Banner {
    pub async fn create(pool: &PgPool, data: CreateBanner) -> Result<Self, sqlx::Error> {
        let (category_id, plan_id) =
            normalize_links(data.link_type, data.linked_category_id, data.linked_plan_id);

        let banner = sqlx::query_as::<_, Banner>(
            r#"
            INSERT INTO banners (title, image_url, link_type, linked_category_id, linked_plan_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, image_url, link_type, linked_category_id, linked_plan_id,
                      created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.image_url)
        .bind(data.link_type)
        .bind(category_id)
        .bind(plan_id)
        .fetch_one(pool)
        .await?;

        Ok(banner)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let banner = sqlx::query_as::<_, Banner>(
            r#"
            SELECT id, title, image_url, link_type, linked_category_id, linked_plan_id,
                   created_at, updated_at
            FROM banners
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(banner)
    }

    /// Finds a banner by ID with the linked entity resolved
    pub async fn find_by_id_resolved(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<BannerResolved>, sqlx::Error> {
        let banner = sqlx::query_as::<_, BannerResolved>(&format!(
            "{RESOLVED_SELECT} WHERE b.id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(banner)
    }

    /// Replaces a banner's contents, returning `None` if it does not exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateBanner,
    ) -> Result<Option<Self>, sqlx::Error> {
        let (category_id, plan_id) =
            normalize_links(data.link_type, data.linked_category_id, data.linked_plan_id);

        let banner = sqlx::query_as::<_, Banner>(
            r#"
            UPDATE banners
            SET title = $2,
                image_url = $3,
                link_type = $4,
                linked_category_id = $5,
                linked_plan_id = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, image_url, link_type, linked_category_id, linked_plan_id,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.image_url)
        .bind(data.link_type)
        .bind(category_id)
        .bind(plan_id)
        .fetch_optional(pool)
        .await?;

        Ok(banner)
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM banners WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists one page of banners, newest first, with linked entities resolved
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BannerResolved>, sqlx::Error> {
        let banners = sqlx::query_as::<_, BannerResolved>(&format!(
            "{RESOLVED_SELECT} ORDER BY b.created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(banners)
    }

    /// Lists every banner, newest first, with linked entities resolved
    pub async fn list_all(pool: &PgPool) -> Result<Vec<BannerResolved>, sqlx::Error> {
        let banners = sqlx::query_as::<_, BannerResolved>(&format!(
            "{RESOLVED_SELECT} ORDER BY b.created_at DESC"
        ))
        .fetch_all(pool)
        .await?;

        Ok(banners)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM banners")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_link_type() {
        assert_eq!(BannerLinkType::parse("category"), Some(BannerLinkType::Category));
        assert_eq!(BannerLinkType::parse("plan"), Some(BannerLinkType::Plan));
        assert_eq!(BannerLinkType::parse("post"), None);
        assert_eq!(BannerLinkType::parse("Category"), None);
    }

    #[test]
    fn test_normalize_drops_off_type_reference() {
        let category = Uuid::new_v4();
        let plan = Uuid::new_v4();

        let (c, p) = normalize_links(BannerLinkType::Category, Some(category), Some(plan));
        assert_eq!(c, Some(category));
        assert_eq!(p, None);

        let (c, p) = normalize_links(BannerLinkType::Plan, Some(category), Some(plan));
        assert_eq!(c, None);
        assert_eq!(p, Some(plan));
    }

    #[test]
    fn test_normalize_keeps_matching_reference_only() {
        let plan = Uuid::new_v4();
        let (c, p) = normalize_links(BannerLinkType::Plan, None, Some(plan));
        assert_eq!(c, None);
        assert_eq!(p, Some(plan));

        // Switching type with no new reference clears both sides.
        let (c, p) = normalize_links(BannerLinkType::Category, None, Some(plan));
        assert_eq!(c, None);
        assert_eq!(p, None);
    }

    #[test]
    fn test_resolved_banner_serializes_camel_case() {
        let banner = BannerResolved {
            id: Uuid::new_v4(),
            title: "Summer sale".to_string(),
            image_url: "/uploads/banners/1-sale.png".to_string(),
            link_type: BannerLinkType::Plan,
            linked_category_id: None,
            linked_plan_id: Some(Uuid::new_v4()),
            linked_category_name: None,
            linked_plan_duration: Some("1 month".to_string()),
            linked_plan_price: Some(9.99),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&banner).unwrap();
        assert_eq!(json.get("linkType").unwrap(), "plan");
        assert_eq!(json.get("linkedPlanDuration").unwrap(), "1 month");
        assert!(json.get("linkedCategoryName").unwrap().is_null());
    }
}
