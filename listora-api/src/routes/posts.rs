/// Post management endpoints (admin only)
///
/// # Endpoints
///
/// - `POST   /api/posts` - Create post (multipart, optional `logo`)
/// - `GET    /api/posts` - List all posts with category names
/// - `GET    /api/posts/:id` - Get one post
/// - `POST   /api/posts/:id` - Update post (multipart)
/// - `DELETE /api/posts/:id` - Delete post
///
/// The category reference is validated against a live category on create and
/// whenever it changes. A post with plans cannot be deleted.
use axum::{
    extract::{Multipart, Path, State},
    response::Response,
};
use listora_shared::models::{Category, CreatePost, Plan, Post, UpdatePost};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{discard_image, parse_form, store_image},
    response,
};

#[derive(Debug, Validate)]
struct PostInput {
    #[validate(length(min = 2, max = 100, message = "Name must be 2 to 100 characters"))]
    name: String,

    #[validate(length(
        min = 10,
        max = 2000,
        message = "Description must be 10 to 2000 characters"
    ))]
    description: String,
}

fn parse_category_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_field("categoryId", "categoryId must be a valid UUID"))
}

async fn ensure_category_exists(state: &AppState, category_id: Uuid) -> Result<(), ApiError> {
    Category::find_by_id(&state.db, category_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;
    Ok(())
}

/// `POST /api/posts`
pub async fn create(State(state): State<AppState>, multipart: Multipart) -> ApiResult<Response> {
    let form = parse_form(multipart, "logo").await?;

    let input = PostInput {
        name: form.require_field("name")?.to_string(),
        description: form.require_field("description")?.to_string(),
    };
    input.validate()?;

    let category_id = parse_category_id(form.require_field("categoryId")?)?;
    ensure_category_exists(&state, category_id).await?;

    if Post::name_taken(&state.db, &input.name, None).await? {
        return Err(ApiError::BadRequest(
            "Post with this name already exists".to_string(),
        ));
    }

    let logo_url = match &form.image {
        Some(image) => Some(store_image(state.storage.as_ref(), "posts", image).await?),
        None => None,
    };

    let post = Post::create(
        &state.db,
        CreatePost {
            name: input.name,
            description: input.description,
            category_id,
            logo_url,
        },
    )
    .await?;

    Ok(response::created("Post created successfully", post))
}

/// `GET /api/posts`
pub async fn list(State(state): State<AppState>) -> ApiResult<Response> {
    let posts = Post::list_all(&state.db).await?;
    Ok(response::ok(posts))
}

/// `GET /api/posts/:id`
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let post = Post::find_by_id_with_category(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    Ok(response::ok(post))
}

/// `POST /api/posts/:id`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> ApiResult<Response> {
    let existing = Post::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    let form = parse_form(multipart, "logo").await?;
    let new_name = form.field("name").map(str::to_string);
    let new_description = form.field("description").map(str::to_string);

    let input = PostInput {
        name: new_name.clone().unwrap_or_else(|| existing.name.clone()),
        description: new_description
            .clone()
            .unwrap_or_else(|| existing.description.clone()),
    };
    input.validate()?;

    if let Some(ref name) = new_name {
        if Post::name_taken(&state.db, name, Some(id)).await? {
            return Err(ApiError::BadRequest(
                "Post with this name already exists".to_string(),
            ));
        }
    }

    let category_id = match form.field("categoryId") {
        Some(raw) => {
            let category_id = parse_category_id(raw)?;
            ensure_category_exists(&state, category_id).await?;
            Some(category_id)
        }
        None => None,
    };

    let logo_url = match &form.image {
        Some(image) => Some(store_image(state.storage.as_ref(), "posts", image).await?),
        None => None,
    };

    let post = Post::update(
        &state.db,
        id,
        UpdatePost {
            name: new_name,
            description: new_description,
            category_id,
            logo_url: logo_url.clone(),
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    if logo_url.is_some() {
        if let Some(old_url) = existing.logo_url {
            discard_image(state.storage.as_ref(), &old_url).await;
        }
    }

    Ok(response::ok(post))
}

/// `DELETE /api/posts/:id`
///
/// # Errors
///
/// - `404 Not Found`: Unknown post
/// - `400 Bad Request`: Plans still reference this post
pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Response> {
    let post = Post::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    let plan_count = Plan::count_by_post(&state.db, id).await?;
    if plan_count > 0 {
        return Err(ApiError::BadRequest(
            "Cannot delete post with existing plans".to_string(),
        ));
    }

    Post::delete(&state.db, id).await?;

    if let Some(logo_url) = post.logo_url {
        discard_image(state.storage.as_ref(), &logo_url).await;
    }

    Ok(response::ok_message("Post deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_input_validation() {
        let valid = PostInput {
            name: "Acme VPN".to_string(),
            description: "Fast and private".to_string(),
        };
        assert!(valid.validate().is_ok());

        let short_description = PostInput {
            name: "Acme VPN".to_string(),
            description: "Too brief".to_string(),
        };
        assert!(short_description.validate().is_err());

        let long_name = PostInput {
            name: "x".repeat(101),
            description: "A long enough description".to_string(),
        };
        assert!(long_name.validate().is_err());
    }

    #[test]
    fn test_parse_category_id() {
        assert!(parse_category_id("not-a-uuid").is_err());
        assert!(parse_category_id("6b36a776-3a6d-4a75-8f27-c01337a2d7a8").is_ok());
    }
}
