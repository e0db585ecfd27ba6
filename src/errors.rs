// src/errors.rs

//! The error taxonomy shared by every command.
//!
//! Each variant carries a human-readable message and, optionally, the error that caused
//! it. Handlers usually return `anyhow::Result` and wrap a `SwankyError` at the point the
//! failure is classified; `render_error` turns whatever reaches `main` into the one-line
//! message shown to the user.

use std::error::Error as StdError;
use thiserror::Error;

/// A boxed, thread-safe error used as the optional cause of a `SwankyError`.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Distinguishes a configuration document that is simply absent from one that is broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    /// The document does not exist. Callers decide whether that is fatal.
    NotFound,
    /// Anything else: malformed JSON, missing records, unknown aliases, bad overrides.
    Invalid,
}

/// Errors raised by swanky itself, classified by origin.
#[derive(Error, Debug)]
pub enum SwankyError {
    /// Missing or invalid configuration, missing contract record, unknown account alias.
    #[error("{message}")]
    Config {
        message: String,
        kind: ConfigErrorKind,
        #[source]
        source: Option<BoxError>,
    },
    /// A filesystem path expected to exist does not.
    #[error("{message}")]
    File {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
    /// A spawned tool failed, or produced output that could not be understood.
    #[error("{message}")]
    Process {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
    /// The user supplied an invalid combination of flags or arguments.
    #[error("{message}")]
    Input {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
    /// Chain connectivity failure.
    #[error("{message}")]
    Network {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
    /// The chain answered, but not with what was expected.
    #[error("{message}")]
    Api {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl SwankyError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            kind: ConfigErrorKind::Invalid,
            source: None,
        }
    }

    pub fn config_not_found(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            kind: ConfigErrorKind::NotFound,
            source: None,
        }
    }

    pub fn file(message: impl Into<String>) -> Self {
        Self::File {
            message: message.into(),
            source: None,
        }
    }

    pub fn process(message: impl Into<String>) -> Self {
        Self::Process {
            message: message.into(),
            source: None,
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
            source: None,
        }
    }

    /// Attaches the underlying cause, replacing any previous one.
    pub fn with_source(mut self, cause: impl Into<BoxError>) -> Self {
        let slot = match &mut self {
            Self::Config { source, .. }
            | Self::File { source, .. }
            | Self::Process { source, .. }
            | Self::Input { source, .. }
            | Self::Network { source, .. }
            | Self::Api { source, .. } => source,
        };
        *slot = Some(cause.into());
        self
    }

    /// The short label used when the error is shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Config { .. } => "Config error",
            Self::File { .. } => "File error",
            Self::Process { .. } => "Process error",
            Self::Input { .. } => "Input error",
            Self::Network { .. } => "Network error",
            Self::Api { .. } => "API error",
        }
    }

    /// True for the recoverable "document does not exist" flavour of `Config`.
    pub fn is_config_not_found(&self) -> bool {
        matches!(
            self,
            Self::Config {
                kind: ConfigErrorKind::NotFound,
                ..
            }
        )
    }
}

/// Renders an error as the single line printed to the user.
///
/// The label comes from the first `SwankyError` found in the chain; the text is the
/// outermost message, followed by the innermost cause when the two differ.
pub fn render_error(err: &anyhow::Error) -> String {
    let label = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<SwankyError>())
        .map(SwankyError::label);

    let top = err.to_string();
    let root = err.root_cause().to_string();
    let body = if root == top || root.is_empty() {
        top
    } else {
        format!("{} ({})", top, root)
    };

    match label {
        Some(label) => format!("{}: {}", label, body),
        None => body,
    }
}
