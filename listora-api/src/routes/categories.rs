/// Category management endpoints (admin only)
///
/// # Endpoints
///
/// - `POST   /api/categories` - Create category (multipart, optional `image`)
/// - `GET    /api/categories` - List all categories
/// - `GET    /api/categories/:id` - Get one category
/// - `POST   /api/categories/:id` - Update category (multipart)
/// - `DELETE /api/categories/:id` - Delete category
///
/// Deletes are restricted: a category still referenced by posts cannot be
/// removed. Renames regenerate the slug inside the model layer.
use axum::{
    extract::{Multipart, Path, State},
    response::Response,
};
use listora_shared::models::{Category, CreateCategory, Post, UpdateCategory};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{discard_image, parse_form, store_image},
    response,
};

#[derive(Debug, Validate)]
struct CategoryInput {
    #[validate(length(min = 2, max = 50, message = "Name must be 2 to 50 characters"))]
    name: String,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    description: Option<String>,
}

/// `POST /api/categories`
pub async fn create(State(state): State<AppState>, multipart: Multipart) -> ApiResult<Response> {
    let form = parse_form(multipart, "image").await?;
    let input = CategoryInput {
        name: form.require_field("name")?.to_string(),
        description: form.field("description").map(str::to_string),
    };
    input.validate()?;

    if Category::name_taken(&state.db, &input.name, None).await? {
        return Err(ApiError::BadRequest(
            "Category with this name already exists".to_string(),
        ));
    }

    let image_url = match &form.image {
        Some(image) => Some(store_image(state.storage.as_ref(), "categories", image).await?),
        None => None,
    };

    let category = Category::create(
        &state.db,
        CreateCategory {
            name: input.name,
            description: input.description,
            image_url,
        },
    )
    .await?;

    Ok(response::created("Category created successfully", category))
}

/// `GET /api/categories`
pub async fn list(State(state): State<AppState>) -> ApiResult<Response> {
    let categories = Category::list_all(&state.db).await?;
    Ok(response::ok(categories))
}

/// `GET /api/categories/:id`
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let category = Category::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    Ok(response::ok(category))
}

/// `POST /api/categories/:id`
///
/// Partial update: absent fields keep their current values. A replaced
/// image leaves the old object behind only if cleanup fails.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> ApiResult<Response> {
    let existing = Category::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    let form = parse_form(multipart, "image").await?;
    let new_name = form.field("name").map(str::to_string);

    let input = CategoryInput {
        name: new_name.clone().unwrap_or_else(|| existing.name.clone()),
        description: form.field("description").map(str::to_string),
    };
    input.validate()?;

    if let Some(ref name) = new_name {
        if Category::name_taken(&state.db, name, Some(id)).await? {
            return Err(ApiError::BadRequest(
                "Category with this name already exists".to_string(),
            ));
        }
    }

    let image_url = match &form.image {
        Some(image) => Some(store_image(state.storage.as_ref(), "categories", image).await?),
        None => None,
    };

    let category = Category::update(
        &state.db,
        id,
        UpdateCategory {
            name: new_name,
            description: input.description,
            image_url: image_url.clone(),
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    if image_url.is_some() {
        if let Some(old_url) = existing.image_url {
            discard_image(state.storage.as_ref(), &old_url).await;
        }
    }

    Ok(response::ok(category))
}

/// `DELETE /api/categories/:id`
///
/// # Errors
///
/// - `404 Not Found`: Unknown category
/// - `400 Bad Request`: Posts still reference this category
pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Response> {
    let category = Category::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    let post_count = Post::count_by_category(&state.db, id).await?;
    if post_count > 0 {
        return Err(ApiError::BadRequest(
            "Cannot delete category with existing posts".to_string(),
        ));
    }

    Category::delete(&state.db, id).await?;

    if let Some(image_url) = category.image_url {
        discard_image(state.storage.as_ref(), &image_url).await;
    }

    Ok(response::ok_message("Category deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_input_validation() {
        let valid = CategoryInput {
            name: "Gaming".to_string(),
            description: Some("Game server hosting".to_string()),
        };
        assert!(valid.validate().is_ok());

        let empty_name = CategoryInput {
            name: String::new(),
            description: None,
        };
        assert!(empty_name.validate().is_err());

        let one_char_name = CategoryInput {
            name: "G".to_string(),
            description: None,
        };
        assert!(one_char_name.validate().is_err());

        let long_name = CategoryInput {
            name: "x".repeat(51),
            description: None,
        };
        assert!(long_name.validate().is_err());

        let long_description = CategoryInput {
            name: "Gaming".to_string(),
            description: Some("x".repeat(501)),
        };
        assert!(long_description.validate().is_err());
    }
}
