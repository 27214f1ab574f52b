//! Application error type.
//!
//! Every component returns `Result<T, AppError>`. The error carries a kind so
//! the two front-ends can decide what to do with it: the CLI maps the kind to
//! a process exit code, the TUI turns it into a notice and keeps running.

/// Error taxonomy shared by all components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Dataset, credential, or export file could not be read or written.
    FileAccess,
    /// User input was rejected (missing entity, bad date, bad credentials...).
    Validation,
    /// The selection produced no rows.
    EmptySelection,
    /// An operation ran before its prerequisite (export before any chart).
    Precondition,
    /// Terminal setup or drawing failed.
    Terminal,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::FileAccess => 2,
            ErrorKind::Validation => 3,
            ErrorKind::EmptySelection => 4,
            ErrorKind::Precondition => 5,
            ErrorKind::Terminal => 6,
        }
    }

    /// Short title used when the error is shown as a notice.
    pub fn title(self) -> &'static str {
        match self {
            ErrorKind::EmptySelection => "No data",
            ErrorKind::Precondition => "Info",
            _ => "Error",
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn file_access(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FileAccess, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn empty_selection(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EmptySelection, message)
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Precondition, message)
    }

    pub fn terminal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Terminal, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
