use std::error;
use std::fmt;
use std::io;

use backtrace::Backtrace;

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    backtrace: Option<Backtrace>,
}

#[derive(Debug)]
pub enum ErrorKind {
    Io(io::Error),
    // Persisted record could not be turned back into a session state.
    Decode { description: String },
    // Session state could not be serialized.
    Encode { description: String },
    QuotaExceeded { quota_bytes: usize, requested_bytes: usize },
    StorageUnavailable,
    Config { description: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind() {
            ErrorKind::Io(err) => err.fmt(f),
            ErrorKind::Decode { description } => {
                write!(f, "persisted session decode error. {}", description)
            }
            ErrorKind::Encode { description } => {
                write!(f, "session encode error. {}", description)
            }
            ErrorKind::QuotaExceeded {
                quota_bytes,
                requested_bytes,
            } => write!(
                f,
                "storage quota({} bytes) exceeded. requested: {} bytes",
                quota_bytes, requested_bytes
            ),
            ErrorKind::StorageUnavailable => write!(f, "storage medium unavailable"),
            ErrorKind::Config { description } => write!(f, "config error. {}", description),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::from(ErrorKind::Io(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::from(ErrorKind::Decode {
            description: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::from(ErrorKind::Config {
            description: err.to_string(),
        })
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::with_backtrace(kind)
    }
}

impl Error {
    /// Serialization failure. Plain `From<serde_json::Error>` reads as a decode error.
    pub fn encode(err: serde_json::Error) -> Self {
        Error::from(ErrorKind::Encode {
            description: err.to_string(),
        })
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn backtrace(&self) -> Option<&Backtrace> {
        self.backtrace.as_ref()
    }

    pub fn is_decode(&self) -> bool {
        matches!(self.kind(), ErrorKind::Decode { .. })
    }

    pub fn is_encode(&self) -> bool {
        matches!(self.kind(), ErrorKind::Encode { .. })
    }

    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self.kind(), ErrorKind::QuotaExceeded { .. })
    }

    pub fn is_not_found(&self) -> bool {
        if let ErrorKind::Io(err) = self.kind() {
            err.kind().eq(&io::ErrorKind::NotFound)
        } else {
            false
        }
    }

    fn with_backtrace(kind: ErrorKind) -> Self {
        Self {
            kind,
            backtrace: Some(Backtrace::new()),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Io(err) => Some(err),
            _ => None,
        }
    }
}
