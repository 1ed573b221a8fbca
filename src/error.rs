//! Error types shared by argument resolution and the Gitea API client.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, AttachError>;

/// Everything that can go wrong between parsing the command line and the
/// last upload.
#[derive(Error, Debug)]
pub enum AttachError {
    /// Username or password missing from both the flag and the environment.
    #[error("{name} is missing. Either set argument or environment variable.")]
    MissingCredential {
        /// Human readable credential name ("Username", "Password")
        name: &'static str,
    },

    /// A required argument was given but is empty
    #[error("{0} must not be empty")]
    MissingArgument(&'static str),

    /// Repository URL does not split into base, owner and project
    #[error("Invalid repository URL '{0}': expected host/owner/project")]
    InvalidRepoUrl(String),

    /// Unknown repository URL field name
    #[error("key not found: {0}")]
    UnknownRepoField(String),

    /// Attachment path is not a readable regular file
    #[error("Attachment {} does not exist or is not a file", .0.display())]
    MissingAttachment(PathBuf),

    /// Verbosity counter above the highest supported level
    #[error("Verbosity level {0} is too high (maximum is -vvv)")]
    Verbosity(u8),

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Transport-level failure (connection refused, timeout, ...)
    #[error("API call errored: {0}")]
    Call(#[from] reqwest::Error),

    /// The server answered with a status the operation does not accept
    #[error("API response errored: HTTP {status}")]
    Response {
        /// Status code returned by the server
        status: StatusCode,
        /// Raw response body, kept for debugging
        body: String,
    },

    /// The response body was not the JSON the operation expected
    #[error("Failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// No release matches the requested tag
    #[error("no release found for tag '{tag}'")]
    NoRelease {
        /// Tag that was looked up
        tag: String,
    },

    /// IO errors while opening attachments
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AttachError {
    /// Whether the error was raised before any network call was made.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AttachError::MissingCredential { .. }
                | AttachError::MissingArgument(_)
                | AttachError::InvalidRepoUrl(_)
                | AttachError::UnknownRepoField(_)
                | AttachError::MissingAttachment(_)
                | AttachError::Verbosity(_)
        )
    }

    /// Process exit code for this error: 1 for validation, 3 for remote failures.
    pub fn exit_code(&self) -> i32 {
        if self.is_validation() {
            1
        } else {
            3
        }
    }
}
