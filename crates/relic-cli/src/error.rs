//! Error types for the `relic` binary.
//!
//! [`CliError`] is the top-level error type that wraps every failure mode
//! of a single command invocation.

/// Top-level error for the `relic` binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: relic_core::ConfigError,
    },

    /// A progression operation was rejected or could not be saved.
    #[error("{source}")]
    Progression {
        /// The underlying progression error.
        #[from]
        source: relic_core::ProgressionError,
    },

    /// State could not be rendered as JSON.
    #[error("json error: {source}")]
    Json {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },

    /// The command line could not be understood.
    #[error("usage error: {message}")]
    Usage {
        /// What was wrong with the arguments.
        message: String,
    },
}

impl CliError {
    /// Build a [`CliError::Usage`].
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Whether the failure is an ordinary rejection the player can act on
    /// (cooldown running, bad selection) rather than a fault.
    pub const fn is_rejection(&self) -> bool {
        match self {
            Self::Progression { source } => source.is_recoverable(),
            Self::Usage { .. } => true,
            Self::Config { .. } | Self::Json { .. } => false,
        }
    }
}
