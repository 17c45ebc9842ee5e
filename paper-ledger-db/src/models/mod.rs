pub mod chain_linked;

// Re-exports
pub use chain_linked::*;
