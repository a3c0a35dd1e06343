//! Structured dock-layout error types.

use std::fmt::{self, Display, Formatter};
use std::path::Path;

/// Stable error categories for dock-layout runs.
///
/// `ReadinessTimeout` and `Store` are the two functional failure kinds of a run; the remaining
/// categories cover argument, configuration and subprocess failures around them.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DockErrorCategory {
    /// Invalid or unreadable configuration.
    Config,
    /// Invalid command-line input.
    Validation,
    /// The launcher process did not appear within the configured window.
    ReadinessTimeout,
    /// The preference domain could not be loaded, changed or saved.
    Store,
    /// Failure to spawn a child process.
    ProcessLaunch,
    /// Child process exited unsuccessfully.
    ProcessExit,
    /// Filesystem or general I/O failure.
    Io,
}

/// Structured error with contextual metadata.
///
/// Optional `operation`, `target`, and `hint` fields can be attached as the error propagates so
/// the final `error: ...` line stays actionable.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DockError {
    /// High-level error category.
    pub category: DockErrorCategory,
    /// Human-readable message.
    pub message: String,
    /// Optional operation name.
    pub operation: Option<String>,
    /// Optional path target.
    pub target: Option<String>,
    /// Optional remediation hint.
    pub hint: Option<String>,
}

/// Convenience result type for dock-layout internals.
pub type DockResult<T> = Result<T, DockError>;

impl DockError {
    /// Create an error with the given category and message.
    pub fn new(category: DockErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            operation: None,
            target: None,
            hint: None,
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(DockErrorCategory::Config, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(DockErrorCategory::Validation, message)
    }

    /// Create a readiness-timeout error.
    pub fn readiness_timeout(message: impl Into<String>) -> Self {
        Self::new(DockErrorCategory::ReadinessTimeout, message)
    }

    /// Create a preference-store error.
    pub fn store(message: impl Into<String>) -> Self {
        Self::new(DockErrorCategory::Store, message)
    }

    /// Create a process launch error.
    pub fn process_launch(message: impl Into<String>) -> Self {
        Self::new(DockErrorCategory::ProcessLaunch, message)
    }

    /// Create a process exit error.
    pub fn process_exit(message: impl Into<String>) -> Self {
        Self::new(DockErrorCategory::ProcessExit, message)
    }

    /// Create an IO error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(DockErrorCategory::Io, message)
    }

    /// Attach an operation label.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Attach a target path.
    pub fn with_path(mut self, path: &Path) -> Self {
        self.target = Some(path.display().to_string());
        self
    }

    /// Attach a remediation hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for DockError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(operation) = &self.operation {
            write!(f, " [operation: {operation}]")?;
        }
        if let Some(target) = &self.target {
            write!(f, " [target: {target}]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " [hint: {hint}]")?;
        }
        Ok(())
    }
}

impl std::error::Error for DockError {}
