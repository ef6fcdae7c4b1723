//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::content::SchemaViolation;
use crate::domain::entities::NodeId;

/// Domain errors represent business rule violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("document is invalid ({} violation(s)): {}", .0.len(), summarize(.0))]
    InvalidDocument(Vec<SchemaViolation>),

    #[error("cycle detected: node {node} cannot be moved under {parent}")]
    Cycle { node: NodeId, parent: NodeId },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn node_not_found(id: NodeId) -> Self {
        Self::NotFound {
            entity: "menu node",
            id: id.to_string(),
        }
    }
}

fn summarize(violations: &[SchemaViolation]) -> String {
    let mut shown: Vec<String> = violations.iter().take(3).map(|v| v.to_string()).collect();
    if violations.len() > 3 {
        shown.push(format!("... and {} more", violations.len() - 3));
    }
    shown.join("; ")
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
