//! Unified error type for the dataflow core

use thiserror::Error;

/// Structured error values returned by the core. User-visible translation
/// is owned by the transport collaborator (see `api::types::ApiError`).
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration line count not divisible by three, or an agent-type
    /// name not present in the factory table.
    #[error("parse error: {0}")]
    Parse(String),

    /// Publish to a topic that does not exist in the registry.
    #[error("topic not found: {0}")]
    NotFound(String),

    /// Publish to an output-only or intermediate topic.
    #[error("topic is protected against external publish: {0}")]
    ProtectedTopic(String),

    /// Configuration file unreadable.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A `ParallelAgent` failed to drain within its close timeout.
    #[error("resource error: {0}")]
    Resource(String),
}

impl EngineError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn not_found(topic: impl Into<String>) -> Self {
        Self::NotFound(topic.into())
    }

    pub fn protected_topic(topic: impl Into<String>) -> Self {
        Self::ProtectedTopic(topic.into())
    }

    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
