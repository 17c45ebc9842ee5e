use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentStoreError {
    /// The client-supplied name is empty, or a stored name carries path
    /// separators or traversal sequences.
    #[error("invalid object name: {0}")]
    InvalidName(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
