//! Error types for the App Store provider.

use std::path::PathBuf;

use thiserror::Error;

use crate::client::ClientError;
use crate::schema::Diagnostic;

/// Errors that can occur while serving a provider operation.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A required attribute is absent or empty where a request is assembled.
    #[error("Missing required attribute '{attribute}': {message}")]
    Validation {
        /// The attribute that failed validation.
        attribute: String,
        /// What the attribute was needed for.
        message: String,
    },

    /// The App Store Connect client call failed.
    #[error("{summary}: {source}")]
    Upstream {
        /// What the provider was doing, e.g. "Failed to create achievement".
        summary: String,
        /// The client's error, unaltered.
        #[source]
        source: ClientError,
    },

    /// A local file could not be read.
    #[error("Failed to read file '{}': {source}", .path.display())]
    Io {
        /// The file that was read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The provider is not (or cannot be) configured.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested resource or data source type is unknown.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// A state attribute has the wrong JSON type.
    #[error("Invalid state for attribute '{attribute}': expected {expected}")]
    InvalidState {
        /// The offending attribute.
        attribute: String,
        /// The expected JSON type.
        expected: &'static str,
    },
}

/// The local file behind an uploaded image no longer matches its stored
/// checksum.
///
/// Not a failure: the image read reports it and clears the file reference so
/// the next plan replaces the image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Image file '{}' changed since upload (checksum {stored} is now {current})", .path.display())]
pub struct DriftDetected {
    /// The file that was re-read.
    pub path: PathBuf,
    /// Checksum recorded at upload, if any.
    pub stored: String,
    /// Checksum of the file now.
    pub current: String,
}

impl ProviderError {
    /// A validation error naming `attribute`.
    pub fn missing(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            attribute: attribute.into(),
            message: message.into(),
        }
    }

    /// Wrap a client error with a summary of the failed operation.
    pub fn upstream(summary: impl Into<String>, source: ClientError) -> Self {
        Self::Upstream {
            summary: summary.into(),
            source,
        }
    }

    /// The attribute this error is about, if any.
    pub fn attribute(&self) -> Option<&str> {
        match self {
            Self::Validation { attribute, .. } | Self::InvalidState { attribute, .. } => {
                Some(attribute)
            },
            _ => None,
        }
    }

    /// Whether this error came from the App Store Connect client.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }
}

impl From<ProviderError> for Diagnostic {
    fn from(err: ProviderError) -> Self {
        let diagnostic = match &err {
            ProviderError::Validation { message, .. } => {
                Diagnostic::error("Missing required attribute").with_detail(message.clone())
            },
            ProviderError::Upstream { summary, source } => {
                Diagnostic::error(summary.clone()).with_detail(source.to_string())
            },
            ProviderError::Io { source, .. } => {
                Diagnostic::error("Failed to read image file").with_detail(source.to_string())
            },
            _ => Diagnostic::error(err.to_string()),
        };

        match err.attribute() {
            Some(attribute) => diagnostic.with_attribute(attribute),
            None => diagnostic,
        }
    }
}
