//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles CRUD operations for a specific entity.

pub mod article;
pub mod article_image;
pub mod attribute_variant;
pub mod category;
pub mod session;
pub mod user;

pub use article::{ArticleRepository, SqlxArticleRepository};
pub use article_image::{ArticleImageRepository, SqlxArticleImageRepository};
pub use attribute_variant::{AttributeVariantRepository, SqlxAttributeVariantRepository};
pub use category::{CategoryRepository, SqlxCategoryRepository};
pub use session::{SessionRepository, SqlxSessionRepository};
pub use user::{SqlxUserRepository, UserRepository};
