use std::fs;
use std::path::{Path, PathBuf};

use crate::common::{debug, Result};
use crate::config::filepath;
use crate::config::Config;
use crate::core::SessionStore;
use crate::redirect::{AppUrls, DEFAULT_STUDENT_URL};
use crate::storage::{Backend, CookieStorage, FileStorage, MemoryStorage};

/// Turns configuration into a hydrated store. Built once at application
/// bootstrap.
#[derive(Debug, Default)]
pub struct Initializer {
    pub config: Config,
}

impl Initializer {
    pub fn load_config_file(path: impl AsRef<Path>) -> Result<Self> {
        let f = fs::File::open(path.as_ref())?;
        let config = serde_yaml::from_reader::<_, Config>(f)?;
        debug!(path = %path.as_ref().display(), "Load config");

        Ok(Self { config })
    }

    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    pub fn set_backend(&mut self, backend: Option<Backend>) {
        if let Some(backend) = backend {
            self.config.storage.backend = backend;
        }
    }

    pub fn set_root_dir(&mut self, root_dir: Option<PathBuf>) {
        if root_dir.is_some() {
            self.config.storage.root_dir = root_dir;
        }
    }

    pub fn set_origin(&mut self, origin: Option<String>) {
        if origin.is_some() {
            self.config.storage.origin = origin;
        }
    }

    /// Apply `TAKATHON_*_URL` variables on top of the configured URLs.
    pub fn apply_url_env(&mut self) {
        self.config.urls = self
            .config
            .urls
            .clone()
            .override_with(|name| std::env::var(name).ok());
    }

    pub fn urls(&self) -> &AppUrls {
        &self.config.urls
    }

    pub fn origin(&self) -> &str {
        self.config
            .storage
            .origin
            .as_deref()
            .unwrap_or(DEFAULT_STUDENT_URL)
    }

    pub fn root_dir(&self) -> PathBuf {
        self.config
            .storage
            .root_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(filepath::DEFAULT_ROOT_DIR))
    }

    /// Open the configured medium and hydrate a store from it.
    pub fn build_store(&self) -> Result<SessionStore> {
        let origin = self.origin();
        debug!(backend = ?self.config.storage.backend, origin, "Build session store");

        let store = match self.config.storage.backend {
            Backend::Memory => SessionStore::new(MemoryStorage::new()),
            Backend::File => SessionStore::new(FileStorage::open(self.root_dir(), origin)?),
            Backend::Cookie => SessionStore::new(CookieStorage::new(origin)),
        };
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::core::Hydration;
    use crate::{Role, User};

    #[test]
    fn load_and_build_file_store() {
        let root = tempfile::TempDir::new().unwrap();
        let path = root.path().join("config.yaml");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "storage:\n  backend: file\n  origin: http://localhost:3002").unwrap();

        let mut initializer = Initializer::load_config_file(&path).unwrap();
        initializer.set_root_dir(Some(root.path().join("data")));
        initializer.set_origin(None);
        assert_eq!(initializer.origin(), "http://localhost:3002");

        let store = initializer.build_store().unwrap();
        assert_eq!(store.hydration(), Hydration::Empty);
        store
            .login(User::new("o1", "o@b.com", "Olga", Role::Organizer))
            .unwrap();

        let store = initializer.build_store().unwrap();
        assert_eq!(store.hydration(), Hydration::Restored);
        assert_eq!(store.state().role(), Some(Role::Organizer));
        assert!(root
            .path()
            .join("data/http___localhost_3002/auth-storage")
            .exists());
    }

    #[test]
    fn missing_config_file() {
        let err = Initializer::load_config_file("/nonexistent/takathon.yaml").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn memory_backend_override() {
        let mut initializer = Initializer::default();
        initializer.set_backend(Some(Backend::Memory));
        let store = initializer.build_store().unwrap();
        assert!(!store.is_authenticated());
    }
}
