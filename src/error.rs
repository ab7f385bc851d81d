use std::{collections::TryReserveError, fmt, io, path::Path};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    Io,
    Allocation,
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorType::Io => write!(f, "I/O error"),
            ErrorType::Allocation => write!(f, "Allocation error"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{error_type}: {message}")]
pub struct Error {
    pub error_type: ErrorType,
    pub message: String,
}

impl Error {
    pub fn new(error_type: ErrorType, message: String) -> Self {
        Self {
            error_type,
            message,
        }
    }

    pub fn io(path: &Path, error: io::Error) -> Self {
        Self::new(ErrorType::Io, format!("{}: {error}", path.display()))
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Self::new(ErrorType::Io, error.to_string())
    }
}

impl From<TryReserveError> for Error {
    fn from(error: TryReserveError) -> Self {
        Self::new(ErrorType::Allocation, error.to_string())
    }
}
