//! Data models
//!
//! Entities and input types for the Mercato catalog backend.

pub mod article;
pub mod article_image;
pub mod attribute_variant;
pub mod category;
pub mod session;
pub mod user;
pub mod wizard;

pub use article::{Article, ArticleDetail, CreateArticleInput, UpdateArticleInput, VariantKind};
pub use article_image::ArticleImage;
pub use attribute_variant::{AttributeVariant, AttributeVariantInput, UpdateAttributeVariantInput};
pub use category::Category;
pub use session::Session;
pub use user::{CreateUserInput, UpdateProfileInput, User};
pub use wizard::{
    OrderDetails, PersonalDetails, ProfessionalDetails, WizardState, WizardStep, WizardStepData,
};
