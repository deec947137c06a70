//! Store error types

/// Errors raised by [`crate::ResourceStore`] operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{0} cannot be empty")]
    BlankField(&'static str),

    #[error("No update data provided")]
    NoUpdateData,

    #[error("Record {0} not found")]
    NotFound(String),
}

