pub mod models;
pub mod repository;
pub mod service;

// Re-exports
pub use models::*;
pub use repository::*;
pub use service::*;
