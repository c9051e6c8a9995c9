use thiserror::Error;

/// Failure taxonomy for the recommendation core.
///
/// The algorithmic layers return these explicitly; policy (HTTP status vs.
/// degradation to a fallback list) lives at the endpoint layer.
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("invalid identifier: {0}")]
    Validation(String),

    #[error("product not found: {0}")]
    NotFound(String),

    #[error("data access failed: {0}")]
    DataAccess(#[from] StoreError),

    #[error("feature computation failed: {0}")]
    Computation(String),
}

/// Failures at the document-store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("connection attempt timed out after {0}ms")]
    ConnectTimeout(u64),

    #[error("query on '{collection}' failed: {message}")]
    Query { collection: String, message: String },
}
