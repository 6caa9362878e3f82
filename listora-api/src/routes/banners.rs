/// Banner management endpoints (admin only)
///
/// # Endpoints
///
/// - `POST   /api/banners` - Create banner (multipart, required `image`)
/// - `GET    /api/banners` - List all banners with links resolved
/// - `GET    /api/banners/:id` - Get one banner
/// - `POST   /api/banners/:id` - Update banner (multipart)
/// - `DELETE /api/banners/:id` - Delete banner
///
/// Every banner links to exactly one entity. The reference matching the
/// link type is mandatory and must point at a live row; the off-type
/// reference is discarded before anything is written, so switching a
/// banner from a category to a plan can never leave the old category
/// reference behind.
use axum::{
    extract::{Multipart, Path, State},
    response::Response,
};
use listora_shared::models::{
    Banner, BannerLinkType, Category, CreateBanner, Plan, UpdateBanner,
};
use uuid::Uuid;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{discard_image, parse_form, store_image, MultipartForm},
    response,
};

/// Validated link: type plus the reference it requires
#[derive(Debug, Clone, Copy)]
struct BannerLink {
    link_type: BannerLinkType,
    linked_category_id: Option<Uuid>,
    linked_plan_id: Option<Uuid>,
}

fn check_title(title: &str) -> Result<(), ApiError> {
    let chars = title.chars().count();
    if chars < 3 || chars > 100 {
        return Err(ApiError::invalid_field(
            "title",
            "Title must be 3 to 100 characters",
        ));
    }
    Ok(())
}

fn parse_link_type(raw: &str) -> Result<BannerLinkType, ApiError> {
    BannerLinkType::parse(raw).ok_or_else(|| {
        ApiError::invalid_field("linkType", "linkType must be 'category' or 'plan'")
    })
}

fn parse_link_id(form: &MultipartForm, field: &str) -> Result<Option<Uuid>, ApiError> {
    match form.field(field) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ApiError::invalid_field(field, format!("{} must be a valid UUID", field))),
        None => Ok(None),
    }
}

/// Resolves the submitted link fields against the link type
///
/// The reference matching the type is required; its target must exist.
async fn resolve_link(
    state: &AppState,
    link_type: BannerLinkType,
    category_id: Option<Uuid>,
    plan_id: Option<Uuid>,
) -> Result<BannerLink, ApiError> {
    match link_type {
        BannerLinkType::Category => {
            let id = category_id.ok_or_else(|| {
                ApiError::invalid_field(
                    "linkedCategoryId",
                    "linkedCategoryId is required when linkType is 'category'",
                )
            })?;

            Category::find_by_id(&state.db, id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Linked category not found".to_string()))?;

            Ok(BannerLink {
                link_type,
                linked_category_id: Some(id),
                linked_plan_id: None,
            })
        }
        BannerLinkType::Plan => {
            let id = plan_id.ok_or_else(|| {
                ApiError::invalid_field(
                    "linkedPlanId",
                    "linkedPlanId is required when linkType is 'plan'",
                )
            })?;

            Plan::find_by_id(&state.db, id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Linked plan not found".to_string()))?;

            Ok(BannerLink {
                link_type,
                linked_category_id: None,
                linked_plan_id: Some(id),
            })
        }
    }
}

/// `POST /api/banners`
///
/// # Errors
///
/// - `400 Bad Request`: Missing title, link type, image, or the reference
///   the link type requires
/// - `404 Not Found`: The linked category or plan does not exist
pub async fn create(State(state): State<AppState>, multipart: Multipart) -> ApiResult<Response> {
    let form = parse_form(multipart, "image").await?;

    let title = form.require_field("title")?.to_string();
    check_title(&title)?;

    let link_type = parse_link_type(form.require_field("linkType")?)?;
    let link = resolve_link(
        &state,
        link_type,
        parse_link_id(&form, "linkedCategoryId")?,
        parse_link_id(&form, "linkedPlanId")?,
    )
    .await?;

    let image = form
        .image
        .as_ref()
        .ok_or_else(|| ApiError::invalid_field("image", "Banner image is required"))?;
    let image_url = store_image(state.storage.as_ref(), "banners", image).await?;

    let banner = Banner::create(
        &state.db,
        CreateBanner {
            title,
            image_url,
            link_type: link.link_type,
            linked_category_id: link.linked_category_id,
            linked_plan_id: link.linked_plan_id,
        },
    )
    .await?;

    Ok(response::created("Banner created successfully", banner))
}

/// `GET /api/banners`
pub async fn list(State(state): State<AppState>) -> ApiResult<Response> {
    let banners = Banner::list_all(&state.db).await?;
    Ok(response::ok(banners))
}

/// `GET /api/banners/:id`
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let banner = Banner::find_by_id_resolved(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Banner not found".to_string()))?;

    Ok(response::ok(banner))
}

/// `POST /api/banners/:id`
///
/// Absent fields keep their current values, except the link: when the link
/// type changes, the matching reference must be re-submitted, since the
/// existing reference belongs to the old type and is dropped.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> ApiResult<Response> {
    let existing = Banner::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Banner not found".to_string()))?;

    let form = parse_form(multipart, "image").await?;

    let title = match form.field("title") {
        Some(title) => {
            check_title(title)?;
            title.to_string()
        }
        None => existing.title.clone(),
    };

    let link_type = match form.field("linkType") {
        Some(raw) => parse_link_type(raw)?,
        None => existing.link_type,
    };

    // Submitted references win; stored ones only carry over while the link
    // type stays the same.
    let mut category_id = parse_link_id(&form, "linkedCategoryId")?;
    let mut plan_id = parse_link_id(&form, "linkedPlanId")?;
    if link_type == existing.link_type {
        category_id = category_id.or(existing.linked_category_id);
        plan_id = plan_id.or(existing.linked_plan_id);
    }

    let link = resolve_link(&state, link_type, category_id, plan_id).await?;

    let image_url = match &form.image {
        Some(image) => store_image(state.storage.as_ref(), "banners", image).await?,
        None => existing.image_url.clone(),
    };
    let replaced_image = form.image.is_some();

    let banner = Banner::update(
        &state.db,
        id,
        UpdateBanner {
            title,
            image_url,
            link_type: link.link_type,
            linked_category_id: link.linked_category_id,
            linked_plan_id: link.linked_plan_id,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Banner not found".to_string()))?;

    if replaced_image {
        discard_image(state.storage.as_ref(), &existing.image_url).await;
    }

    Ok(response::ok(banner))
}

/// `DELETE /api/banners/:id`
pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Response> {
    let banner = Banner::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Banner not found".to_string()))?;

    Banner::delete(&state.db, id).await?;
    discard_image(state.storage.as_ref(), &banner.image_url).await;

    Ok(response::ok_message("Banner deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_title() {
        assert!(check_title("Summer sale").is_ok());
        assert!(check_title("").is_err());
        assert!(check_title("ab").is_err());
        assert!(check_title(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_check_title_counts_chars_not_bytes() {
        // Two characters, four bytes.
        assert!(check_title("éé").is_err());
        assert!(check_title("ééé").is_ok());
        // One hundred multibyte characters are within bounds.
        assert!(check_title(&"é".repeat(100)).is_ok());
        assert!(check_title(&"é".repeat(101)).is_err());
    }

    #[test]
    fn test_parse_link_type() {
        assert!(parse_link_type("category").is_ok());
        assert!(parse_link_type("plan").is_ok());
        assert!(parse_link_type("post").is_err());
        assert!(parse_link_type("").is_err());
    }
}
