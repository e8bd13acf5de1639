#![allow(clippy::module_inception)]

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod error;
pub mod redirect;
pub mod storage;
pub mod validate;

pub use crate::error::SessionError;
pub type Result<T, E = crate::error::SessionError> = std::result::Result<T, E>;

pub use crate::core::{hydrate, Hydration, SessionState, SessionStore, Subscription, User};
pub use crate::domain::Role;
pub use crate::storage::Storage;

pub(crate) mod common {
    pub(crate) type Result<T, E = crate::error::Error> = std::result::Result<T, E>;

    pub(crate) type Error = crate::error::Error;
    pub(crate) type ErrorKind = crate::error::ErrorKind;

    pub(crate) type Time = chrono::DateTime<chrono::Utc>;

    pub use tracing::{debug, info, trace, warn};
}
