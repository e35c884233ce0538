//! Error types and handling for Stackforge
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! The taxonomy follows the failure modes of an installation run:
//! - Manifest errors: malformed or incomplete manifest files, recovered
//!   locally by the provider (skip + log), never fatal to a run
//! - Path errors: a resolved target escaped the install root, fatal to a run
//! - Git/step errors: a delegated operation failed, aborts remaining stages
//! - `Cancelled`: cooperative cancellation, reported as a distinct outcome

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Stackforge operations
#[derive(Error, Diagnostic, Debug)]
pub enum StackforgeError {
    // Manifest errors
    #[error("Failed to parse manifest: {path}")]
    #[diagnostic(code(stackforge::manifest::parse_failed))]
    ManifestParseFailed { path: String, reason: String },

    #[error("Invalid manifest '{path}': {reason}")]
    #[diagnostic(
        code(stackforge::manifest::invalid),
        help(
            "A manifest needs a schemaVersion, a baseSoftware entry with a relative target, and a usable source (repositoryUrl or name)"
        )
    )]
    ManifestInvalid { path: String, reason: String },

    #[error("Manifest '{id}' not found")]
    #[diagnostic(
        code(stackforge::manifest::not_found),
        help("Run 'stackforge list' to see the manifests in the watched directory")
    )]
    ManifestNotFound { id: String },

    #[error("Manifest directory not found: {path}")]
    #[diagnostic(
        code(stackforge::manifest::directory_not_found),
        help("Create the directory or point --manifests-dir at an existing one")
    )]
    ManifestDirectoryNotFound { path: String },

    #[error("Failed to watch manifest directory: {reason}")]
    #[diagnostic(code(stackforge::manifest::watch_failed))]
    WatchFailed { reason: String },

    // Path errors
    #[error("Path '{path}' escapes the install root {root}")]
    #[diagnostic(
        code(stackforge::paths::escape),
        help("Manifest targets must be relative paths that stay inside the install root")
    )]
    PathEscape { path: String, root: String },

    #[error("Unknown path alias: {alias}")]
    #[diagnostic(
        code(stackforge::paths::unknown_alias),
        help("Valid anchors are '<installRoot>' and 'baseSoftware.target'")
    )]
    UnknownPathAlias { alias: String },

    // Logging errors
    #[error("Failed to create log file: {path}")]
    #[diagnostic(code(stackforge::logging::file_failed))]
    LogFileFailed { path: String, reason: String },

    // Git errors
    #[error("Failed to clone repository: {url}: {reason}")]
    #[diagnostic(
        code(stackforge::git::clone_failed),
        help("Check that the URL is correct and you have access to the repository")
    )]
    GitCloneFailed { url: String, reason: String },

    #[error("Failed to resolve git ref '{git_ref}': {reason}")]
    #[diagnostic(code(stackforge::git::ref_resolve_failed))]
    GitRefResolveFailed { git_ref: String, reason: String },

    #[error("Failed to checkout commit '{sha}': {reason}")]
    #[diagnostic(code(stackforge::git::checkout_failed))]
    GitCheckoutFailed { sha: String, reason: String },

    #[error("Git operation failed: {message}")]
    #[diagnostic(code(stackforge::git::operation_failed))]
    GitOperationFailed { message: String },

    // Step errors
    #[error("Step '{step}' failed: {reason}")]
    #[diagnostic(code(stackforge::runner::step_failed))]
    StepFailed { step: String, reason: String },

    #[error("Failed to download {url}: {reason}")]
    #[diagnostic(code(stackforge::runner::download_failed))]
    DownloadFailed { url: String, reason: String },

    #[error("Invalid file match pattern '{pattern}': {reason}")]
    #[diagnostic(code(stackforge::runner::invalid_pattern))]
    InvalidMatchPattern { pattern: String, reason: String },

    // Run control
    #[error("Installation cancelled")]
    #[diagnostic(code(stackforge::engine::cancelled))]
    Cancelled,

    #[error("IO error: {message}")]
    #[diagnostic(code(stackforge::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for StackforgeError {
    fn from(err: std::io::Error) -> Self {
        StackforgeError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<git2::Error> for StackforgeError {
    fn from(err: git2::Error) -> Self {
        StackforgeError::GitOperationFailed {
            message: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for StackforgeError {
    fn from(err: inquire::InquireError) -> Self {
        StackforgeError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, StackforgeError>;
