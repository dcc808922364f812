//! Errors raised while computing the export order

use thiserror::Error;

/// Failure of the ordering pipeline
///
/// Every variant is fatal: no partial order is ever produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderingError {
    /// The metadata provider could not answer for a model
    #[error("metadata unavailable for model '{model}': {reason}")]
    MetadataUnavailable { model: String, reason: String },

    /// The dependency graph has no valid order
    #[error("circular dependency detected: {}", .cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    /// A non-polymorphic association names a model outside the candidate set
    #[error("model '{model}' association '{association}' references unknown model '{target}'")]
    UnresolvableReference {
        model: String,
        association: String,
        target: String,
    },
}

pub type OrderingResult<T> = std::result::Result<T, OrderingError>;
