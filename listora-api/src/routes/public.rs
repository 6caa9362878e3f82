/// Public read surface
///
/// All endpoints here are unauthenticated. Lists are paginated via
/// `?page=` and `?limit=` (defaults 1 and 10, lenient parsing) and reply
/// with the shared page envelope. The row query and its count always run
/// concurrently.
///
/// # Endpoints
///
/// - `GET /api/public/categories` - Categories, name ascending
/// - `GET /api/public/categories/:id/posts` - A category's posts, newest first
/// - `GET /api/public/posts` - Posts with category names, newest first
/// - `GET /api/public/posts/:id` - One post with its category and plans
/// - `GET /api/public/posts/:id/plans` - A post's plans, cheapest first
/// - `GET /api/public/banners` - Banners with links resolved, newest first
/// - `GET /api/public/home` - Composite homepage feed
use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use listora_shared::{
    models::{Banner, BannerResolved, Category, Plan, PlanWithPost, Post, PostWithCategory},
    pagination::{Page, PageQuery, Paginated},
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response,
};

/// Post detail payload: the post plus its plans, cheapest first
#[derive(Debug, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: PostWithCategory,
    pub plans: Vec<Plan>,
}

/// An unpaginated homepage rail with its item count
#[derive(Debug, Serialize)]
pub struct HomeRail<T> {
    pub count: usize,
    pub data: Vec<T>,
}

/// Homepage composite feed: all banners, all categories, and a page of the
/// newest plans
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeFeed {
    pub banners: HomeRail<BannerResolved>,
    pub categories: HomeRail<Category>,
    pub latest_plans: Paginated<PlanWithPost>,
}

/// `GET /api/public/categories`
pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Response> {
    let page = Page::from_query(&query);

    let (categories, total) = tokio::try_join!(
        Category::list(&state.db, page.limit, page.offset()),
        Category::count(&state.db),
    )?;

    Ok(response::page(Paginated::new(categories, total, page)))
}

/// `GET /api/public/categories/:id/posts`
///
/// The category must exist; an existing category with no posts is an empty
/// page, not an error.
pub async fn list_category_posts(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Response> {
    Category::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    let page = Page::from_query(&query);

    let (posts, total) = tokio::try_join!(
        Post::list_by_category(&state.db, id, page.limit, page.offset()),
        Post::count_by_category(&state.db, id),
    )?;

    Ok(response::page(Paginated::new(posts, total, page)))
}

/// `GET /api/public/posts`
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Response> {
    let page = Page::from_query(&query);

    let (posts, total) = tokio::try_join!(
        Post::list(&state.db, page.limit, page.offset()),
        Post::count(&state.db),
    )?;

    Ok(response::page(Paginated::new(posts, total, page)))
}

/// `GET /api/public/posts/:id`
pub async fn get_post(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Response> {
    let post = Post::find_by_id_with_category(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    let plans = Plan::list_by_post(&state.db, id).await?;

    Ok(response::ok(PostDetail { post, plans }))
}

/// `GET /api/public/posts/:id/plans`
pub async fn list_post_plans(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Response> {
    Post::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    let page = Page::from_query(&query);

    let (plans, total) = tokio::try_join!(
        Plan::list_by_post_page(&state.db, id, page.limit, page.offset()),
        Plan::count_by_post(&state.db, id),
    )?;

    Ok(response::page(Paginated::new(plans, total, page)))
}

/// `GET /api/public/banners`
pub async fn list_banners(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Response> {
    let page = Page::from_query(&query);

    let (banners, total) = tokio::try_join!(
        Banner::list(&state.db, page.limit, page.offset()),
        Banner::count(&state.db),
    )?;

    Ok(response::page(Paginated::new(banners, total, page)))
}

/// `GET /api/public/home`
///
/// One round trip for everything the landing page renders: every banner
/// with its link resolved, every category, and a page of the newest plans.
/// If any of the four queries fails the whole response fails.
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Response> {
    let page = Page::from_query(&query);

    let (banners, categories, latest_plans, total_plans) = tokio::try_join!(
        Banner::list_all(&state.db),
        Category::list_all(&state.db),
        Plan::list_latest(&state.db, page.limit, page.offset()),
        Plan::count(&state.db),
    )?;

    Ok(response::ok(HomeFeed {
        banners: HomeRail {
            count: banners.len(),
            data: banners,
        },
        categories: HomeRail {
            count: categories.len(),
            data: categories,
        },
        latest_plans: Paginated::new(latest_plans, total_plans, page),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_post_detail_flattens_post_fields() {
        let detail = PostDetail {
            post: PostWithCategory {
                id: Uuid::new_v4(),
                name: "Acme VPN".to_string(),
                description: "Fast".to_string(),
                category_id: Uuid::new_v4(),
                category_name: Some("VPN".to_string()),
                logo_url: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            plans: vec![],
        };

        let json = serde_json::to_value(&detail).unwrap();
        // Post fields sit next to the plans array, not nested under "post".
        assert_eq!(json.get("name").unwrap(), "Acme VPN");
        assert_eq!(json.get("categoryName").unwrap(), "VPN");
        assert!(json.get("plans").unwrap().is_array());
        assert!(json.get("post").is_none());
    }

    #[test]
    fn test_home_feed_shape() {
        let feed = HomeFeed {
            banners: HomeRail {
                count: 0,
                data: vec![],
            },
            categories: HomeRail {
                count: 0,
                data: vec![],
            },
            latest_plans: Paginated::new(vec![], 0, Page::default()),
        };

        let json = serde_json::to_value(&feed).unwrap();
        assert_eq!(json.get("banners").unwrap().get("count").unwrap(), 0);
        let plans = json.get("latestPlans").unwrap();
        assert_eq!(plans.get("totalPages").unwrap(), 0);
        assert_eq!(plans.get("currentPage").unwrap(), 1);
    }
}
