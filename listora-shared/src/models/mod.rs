//! Domain models for Listora
//!
//! Each model owns its table: a plain struct mirroring the row, typed input
//! structs for create/update, and static async methods wrapping the sqlx
//! queries. Handlers never write SQL directly.

pub mod banner;
pub mod category;
pub mod plan;
pub mod post;
pub mod user;

pub use banner::{
    Banner, BannerLinkType, BannerResolved, CreateBanner, UpdateBanner, normalize_links,
};
pub use category::{Category, CreateCategory, UpdateCategory};
pub use plan::{CreatePlan, Plan, PlanWithPost, UpdatePlan, valid_price};
pub use post::{CreatePost, Post, PostWithCategory, UpdatePost};
pub use user::{CreateUser, User, UserRole};
