//! Error types for NRM operations.
//!
//! Only configuration problems are fatal. Population overflow and
//! extinction are termination reasons reported in cycle summaries,
//! not errors.

use crate::types::{AgentId, Depth};
use thiserror::Error;

/// Result type for NRM operations.
pub type Result<T> = std::result::Result<T, NrmError>;

/// Errors that can occur during NRM operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NrmError {
    /// Invalid simulation parameters.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    /// Misuse of the population store API.
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),
    /// A checkpoint could not be restored.
    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),
    /// Serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for NrmError {
    fn from(e: serde_json::Error) -> Self {
        NrmError::Serialization(e.to_string())
    }
}

/// Configuration errors, raised when an engine is constructed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Invalid value.
    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
    /// Out of range.
    #[error("{field} out of range: {value} (must be {min}-{max})")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },
}

/// Agent-related errors from direct store access.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AgentError {
    /// Agent not present in the expected depth bucket.
    #[error("Agent {id} not found at depth {depth}")]
    NotFound { id: AgentId, depth: Depth },
    /// An agent with this id is already live.
    #[error("Agent already exists: {0}")]
    AlreadyExists(AgentId),
    /// Depth outside `[0, max_depth]`.
    #[error("Depth {depth} out of range (max depth {max_depth})")]
    DepthOutOfRange { depth: Depth, max_depth: Depth },
    /// The agent's own depth disagrees with the bucket it was filed under.
    #[error("Agent {id} has depth {agent_depth} but was added at depth {bucket}")]
    DepthMismatch {
        id: AgentId,
        agent_depth: Depth,
        bucket: Depth,
    },
    /// Energy must be finite and strictly positive for a live agent.
    #[error("Invalid agent energy: {0}")]
    InvalidEnergy(f64),
}

/// Checkpoint restore errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckpointError {
    /// Format version mismatch.
    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
    /// The checkpoint contents contradict themselves.
    #[error("Checkpoint corrupt: {0}")]
    Corrupt(String),
}

// Convenience constructors
impl NrmError {
    pub fn agent_not_found(id: AgentId, depth: Depth) -> Self {
        NrmError::Agent(AgentError::NotFound { id, depth })
    }

    pub fn invalid_config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        NrmError::Config(ConfigError::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        })
    }

    pub fn out_of_range(field: impl Into<String>, min: f64, max: f64, value: f64) -> Self {
        NrmError::Config(ConfigError::OutOfRange {
            field: field.into(),
            min,
            max,
            value,
        })
    }

    /// Whether this error came from parameter validation.
    pub fn is_config(&self) -> bool {
        matches!(self, NrmError::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        let err = NrmError::out_of_range("split_factor", 0.0, 1.0, 1.5);
        assert_eq!(
            err.to_string(),
            "Config error: split_factor out of range: 1.5 (must be 0-1)"
        );
        assert!(err.is_config());
    }

    #[test]
    fn not_found_reports_id_and_depth() {
        let err = NrmError::agent_not_found(AgentId(7), 2);
        assert_eq!(err.to_string(), "Agent error: Agent agent-7 not found at depth 2");
        assert!(!err.is_config());
    }

    #[test]
    fn json_errors_become_serialization_errors() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("not json");
        let err: NrmError = parse.unwrap_err().into();
        assert!(matches!(err, NrmError::Serialization(_)));
    }
}
