// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions. Anything in here ends the run with exit status 1.
///
/// Bad operator input never lands here: the prompt loops recover from it
/// locally and ask again.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Required command '{0}' is not installed or not on PATH")]
    MissingDependency(String),

    #[error("Directory {} does not exist", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Directory {} cannot be used: {reason}", .path.display())]
    InvalidDirectory { path: PathBuf, reason: String },

    #[error("{0} needs a backend port but none was given")]
    MissingPort(String),

    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{step} failed: {stderr}")]
    CommandFailed { step: &'static str, stderr: String },

    #[error("Nginx configuration test failed: {0}")]
    InvalidProxyConfig(String),

    #[error("Certificate request for {domain} failed: {stderr}")]
    CertificateFailed { domain: String, stderr: String },

    #[error("Input closed before all answers were collected")]
    InputClosed,

    #[error("Terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
