pub mod append_request;
pub mod content_store;

// Re-exports
pub use append_request::*;
pub use content_store::*;
