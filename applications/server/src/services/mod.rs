/// Server services
pub mod auth;
pub mod catalog;
pub mod classifier;
pub mod recommendations;

pub use auth::AuthService;
pub use catalog::{CatalogCredentials, SpotifyCatalog};
pub use classifier::HttpEmotionClassifier;
