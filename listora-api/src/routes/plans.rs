/// Plan management endpoints (admin only)
///
/// # Endpoints
///
/// - `POST   /api/plans` - Create plan (JSON)
/// - `GET    /api/plans` - List all plans with post details
/// - `GET    /api/plans/:id` - Get one plan
/// - `GET    /api/plans/post/:post_id` - List a post's plans
/// - `POST   /api/plans/:id` - Update plan (JSON)
/// - `DELETE /api/plans/:id` - Delete plan
///
/// Prices must be non-negative with at most two decimal places. The post
/// reference is validated on create and whenever it changes. Banners linking
/// to a plan do not block its deletion; their resolved link just goes null.
use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use listora_shared::models::{valid_price, CreatePlan, Plan, Post, UpdatePlan};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response,
};

/// Create plan request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanRequest {
    pub post_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Duration must be 1 to 100 characters"))]
    pub duration: String,

    pub price: f64,

    #[serde(default)]
    pub features: Vec<String>,
}

/// Update plan request; absent fields keep their current values
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlanRequest {
    pub post_id: Option<Uuid>,

    #[validate(length(min = 1, max = 100, message = "Duration must be 1 to 100 characters"))]
    pub duration: Option<String>,

    pub price: Option<f64>,

    pub features: Option<Vec<String>>,
}

fn check_price(price: f64) -> Result<(), ApiError> {
    if !valid_price(price) {
        return Err(ApiError::invalid_field(
            "price",
            "Price must be non-negative with at most two decimal places",
        ));
    }
    Ok(())
}

fn check_features(features: &[String]) -> Result<(), ApiError> {
    if features.iter().any(|f| f.is_empty() || f.len() > 200) {
        return Err(ApiError::invalid_field(
            "features",
            "Each feature must be 1 to 200 characters",
        ));
    }
    Ok(())
}

async fn ensure_post_exists(state: &AppState, post_id: Uuid) -> Result<(), ApiError> {
    Post::find_by_id(&state.db, post_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;
    Ok(())
}

/// `POST /api/plans`
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreatePlanRequest>,
) -> ApiResult<Response> {
    req.validate()?;
    check_price(req.price)?;
    if req.features.is_empty() {
        return Err(ApiError::invalid_field(
            "features",
            "At least one feature is required",
        ));
    }
    check_features(&req.features)?;
    ensure_post_exists(&state, req.post_id).await?;

    let plan = Plan::create(
        &state.db,
        CreatePlan {
            post_id: req.post_id,
            duration: req.duration,
            price: req.price,
            features: req.features,
        },
    )
    .await?;

    Ok(response::created("Plan created successfully", plan))
}

/// `GET /api/plans`
pub async fn list(State(state): State<AppState>) -> ApiResult<Response> {
    let plans = Plan::list_all(&state.db).await?;
    Ok(response::ok(plans))
}

/// `GET /api/plans/:id`
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let plan = Plan::find_by_id_with_post(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Plan not found".to_string()))?;

    Ok(response::ok(plan))
}

/// `GET /api/plans/post/:post_id`
///
/// A post with no plans yields an empty list, not an error.
pub async fn list_by_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> ApiResult<Response> {
    ensure_post_exists(&state, post_id).await?;

    let plans = Plan::list_by_post(&state.db, post_id).await?;
    Ok(response::ok(plans))
}

/// `POST /api/plans/:id`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePlanRequest>,
) -> ApiResult<Response> {
    req.validate()?;

    if let Some(price) = req.price {
        check_price(price)?;
    }
    if let Some(ref features) = req.features {
        check_features(features)?;
    }
    if let Some(post_id) = req.post_id {
        ensure_post_exists(&state, post_id).await?;
    }

    let plan = Plan::update(
        &state.db,
        id,
        UpdatePlan {
            post_id: req.post_id,
            duration: req.duration,
            price: req.price,
            features: req.features,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Plan not found".to_string()))?;

    Ok(response::ok(plan))
}

/// `DELETE /api/plans/:id`
pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Response> {
    let deleted = Plan::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Plan not found".to_string()));
    }

    Ok(response::ok_message("Plan deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_price() {
        assert!(check_price(0.0).is_ok());
        assert!(check_price(9.99).is_ok());
        assert!(check_price(-1.0).is_err());
        assert!(check_price(9.999).is_err());
    }

    #[test]
    fn test_check_features() {
        assert!(check_features(&[]).is_ok());
        assert!(check_features(&["Unlimited bandwidth".to_string()]).is_ok());
        assert!(check_features(&[String::new()]).is_err());
        assert!(check_features(&["x".repeat(201)]).is_err());
    }

    #[test]
    fn test_create_request_validation() {
        let valid = CreatePlanRequest {
            post_id: Uuid::new_v4(),
            duration: "1 month".to_string(),
            price: 9.99,
            features: vec!["SSL included".to_string()],
        };
        assert!(valid.validate().is_ok());

        let empty_duration = CreatePlanRequest {
            post_id: Uuid::new_v4(),
            duration: String::new(),
            price: 9.99,
            features: vec![],
        };
        assert!(empty_duration.validate().is_err());
    }
}
