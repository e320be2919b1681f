//! Error types for the stage status notifier.
//!
//! A failure anywhere in a dispatch surfaces as a single [`NotifyError`] and
//! aborts that one notification. Nothing is posted for a failed dispatch.

use thiserror::Error;

/// The main error type for notifier operations.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// A material could not be serialized.
    #[error("{0}")]
    Material(#[from] MaterialError),

    /// The pipeline group lookup failed.
    #[error("Failed to resolve pipeline group for '{pipeline_name}'")]
    GroupLookup {
        /// The pipeline being looked up.
        pipeline_name: String,
        /// The collaborator's error.
        #[source]
        source: anyhow::Error,
    },

    /// The build-cause lookup failed.
    #[error("Failed to resolve build cause for '{pipeline_name}/{pipeline_counter}'")]
    BuildCauseLookup {
        /// The pipeline being looked up.
        pipeline_name: String,
        /// The pipeline counter being looked up.
        pipeline_counter: u64,
        /// The collaborator's error.
        #[source]
        source: anyhow::Error,
    },

    /// A notification kind identifier was rejected.
    #[error("{0}")]
    NotificationKind(#[from] NotificationKindError),

    /// Configuration could not be loaded.
    #[error("{0}")]
    Config(#[from] ConfigError),
}

impl NotifyError {
    /// Creates a group lookup error.
    pub fn group_lookup(pipeline_name: impl Into<String>, source: anyhow::Error) -> Self {
        Self::GroupLookup {
            pipeline_name: pipeline_name.into(),
            source,
        }
    }

    /// Creates a build-cause lookup error.
    pub fn build_cause_lookup(
        pipeline_name: impl Into<String>,
        pipeline_counter: u64,
        source: anyhow::Error,
    ) -> Self {
        Self::BuildCauseLookup {
            pipeline_name: pipeline_name.into(),
            pipeline_counter,
            source,
        }
    }

    /// Returns true if the error came from an external lookup collaborator.
    #[must_use]
    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, Self::GroupLookup { .. } | Self::BuildCauseLookup { .. })
    }
}

/// Errors raised while describing a material.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MaterialError {
    /// No serializer knows the material kind.
    #[error("Unknown material type: '{kind}'")]
    UnknownKind {
        /// The offending kind identifier.
        kind: String,
    },

    /// A registered serializer rejected the material.
    #[error("Invalid '{kind}' material: {message}")]
    Invalid {
        /// The material kind.
        kind: String,
        /// What was wrong.
        message: String,
    },
}

impl MaterialError {
    /// Creates an unknown kind error.
    #[must_use]
    pub fn unknown_kind(kind: impl Into<String>) -> Self {
        Self::UnknownKind { kind: kind.into() }
    }

    /// Creates an invalid material error.
    #[must_use]
    pub fn invalid(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Returns the kind of the offending material.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::UnknownKind { kind } | Self::Invalid { kind, .. } => kind,
        }
    }
}

/// Error raised when a notification kind identifier is malformed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid notification kind '{name}': expected lowercase kebab-case")]
pub struct NotificationKindError {
    /// The rejected identifier.
    pub name: String,
}

impl NotificationKindError {
    /// Creates a new notification kind error.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured log filter is not a valid directive.
    #[error("Invalid log filter '{filter}': {message}")]
    LogFilter {
        /// The rejected filter.
        filter: String,
        /// The parser's message.
        message: String,
    },
}
