use thiserror::Error;

/// Failures surfaced by the aggregation engine.
///
/// Division by zero inside a rate is never an error; those rates are defined as 0.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalyticsError {
    /// A single-entity lookup had no match.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A required parameter is missing or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The snapshot is internally inconsistent (dangling reference, duplicate key, ...).
    #[error("computation failed on {entity} {id}: {reason}")]
    Computation {
        entity: &'static str,
        id: String,
        reason: String,
    },

    /// A snapshot source could not be read or decoded.
    #[error("failed to load snapshot: {0}")]
    Load(String),
}

impl AnalyticsError {
    pub fn computation(entity: &'static str, id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Computation {
            entity,
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn dangling(entity: &'static str, id: &str, field: &str, target: &str) -> Self {
        Self::computation(entity, id, format!("{field} references missing row {target}"))
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = AnalyticsError::dangling("enrollment", "e1", "courseId", "c9");
        assert_eq!(
            err.to_string(),
            "computation failed on enrollment e1: courseId references missing row c9"
        );

        let err = AnalyticsError::NotFound {
            entity: "course",
            id: "c1".to_string(),
        };
        assert_eq!(err.to_string(), "course not found: c1");
    }
}
