mod internal;
pub use internal::{Error, ErrorKind};

use std::fmt;

#[derive(Debug)]
pub enum SessionError {
    // login was called with a user record that misses required fields.
    InvalidUserRecord { missing: Vec<&'static str> },
    InvalidEmail { email: String },
    // Enumeration parsed from text did not match any known variant.
    UnknownVariant { kind: &'static str, value: String },
    Internal(Error),
}

impl SessionError {
    /// Whether the error was caused by caller supplied input.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, SessionError::Internal(_))
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SessionError::InvalidUserRecord { missing } => {
                write!(f, "invalid user record. missing: {}", missing.join(", "))
            }
            SessionError::InvalidEmail { email } => write!(f, "invalid email address: {}", email),
            SessionError::UnknownVariant { kind, value } => {
                write!(f, "unknown {} '{}'", kind, value)
            }
            SessionError::Internal(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Internal(err) => Some(err),
            _ => None,
        }
    }
}

impl From<Error> for SessionError {
    fn from(err: Error) -> Self {
        SessionError::Internal(err)
    }
}

impl From<ErrorKind> for SessionError {
    fn from(kind: ErrorKind) -> Self {
        SessionError::Internal(Error::from(kind))
    }
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        SessionError::Internal(Error::from(err))
    }
}
