//! Durable per-origin key value media the session store persists into.

mod memory;
pub use self::memory::MemoryStorage;

mod file;
pub use self::file::FileStorage;

mod cookie;
pub use self::cookie::{CookieJar, CookieStorage};

use serde::Deserialize;

use crate::error::Error;

/// A synchronous key value medium.
///
/// Implementations take `&self` so that one medium can be shared between a
/// store and anything else inspecting it.
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> crate::Result<Option<String>, Error>;
    fn set_item(&self, key: &str, value: &str) -> crate::Result<(), Error>;
    fn remove_item(&self, key: &str) -> crate::Result<(), Error>;
}

impl<S: Storage + ?Sized> Storage for std::sync::Arc<S> {
    fn get_item(&self, key: &str) -> crate::Result<Option<String>, Error> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> crate::Result<(), Error> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> crate::Result<(), Error> {
        (**self).remove_item(key)
    }
}

/// Which medium a configured store writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Memory,
    File,
    Cookie,
}

impl Backend {
    /// Whether a session written through this backend outlives the process.
    pub fn outlives_process(self) -> bool {
        matches!(self, Backend::File)
    }
}

impl Default for Backend {
    fn default() -> Self {
        Backend::File
    }
}

impl std::str::FromStr for Backend {
    type Err = crate::SessionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(Backend::Memory),
            "file" => Ok(Backend::File),
            "cookie" => Ok(Backend::Cookie),
            _ => Err(crate::SessionError::UnknownVariant {
                kind: "storage backend",
                value: s.to_owned(),
            }),
        }
    }
}
