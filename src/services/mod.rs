//! Business logic services
//!
//! Services sit between the HTTP handlers and the repositories. They own
//! validation, ownership scoping, nested writes, and cache invalidation.

pub mod article;
pub mod attribute_variant;
pub mod category;
pub mod password;
pub mod user;
pub mod wizard;

pub use article::{ArticleService, ArticleServiceError};
pub use attribute_variant::{AttributeVariantService, AttributeVariantServiceError};
pub use category::{CategoryService, CategoryServiceError};
pub use user::{UserService, UserServiceError};
pub use wizard::{WizardService, WizardServiceError};
