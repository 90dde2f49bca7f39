//! CLI error types and exit codes.

use thiserror::Error;

/// Exit codes for the CLI
/// - 0: Routine completed (including zero-effect and skipped outcomes)
/// - 1: General error
/// - 2: Configuration error
/// - 3: Database error
/// - 4: Rejected group mutation
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] groupsync_db::DbError),

    #[error(transparent)]
    Lifecycle(#[from] groupsync_recon::LifecycleError),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CliError {
    /// Map the error to a process exit code.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => 2,
            CliError::Database(_) => 3,
            CliError::Lifecycle(_) => 4,
            CliError::Io(_) | CliError::Serialize(_) => 1,
        }
    }

    /// Print the error to stderr.
    pub fn print(&self) {
        eprintln!("Error: {self}");
    }
}
