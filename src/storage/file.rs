use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::common::{debug, ErrorKind, Result};
use crate::storage::Storage;

/// Durable medium keeping one file per key under a directory per origin.
///
/// ```text
/// <root_dir>/
///   http___localhost_3001/
///     auth-storage
/// ```
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open the medium for `origin`, creating its directory if needed.
    pub fn open(root_dir: impl AsRef<Path>, origin: &str) -> Result<Self> {
        let dir = root_dir.as_ref().join(origin_dir_name(origin));
        fs::create_dir_all(&dir)?;
        debug!("Open file storage {}", dir.display());

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn item_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(ErrorKind::Config {
                description: format!("storage key '{}' is not a valid file name", key),
            }
            .into());
        }
        Ok(self.dir.join(key))
    }
}

// Distinguishes temporary files of concurrent writers within a process.
static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

// Origins become a single path component.
fn origin_dir_name(origin: &str) -> String {
    origin
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.item_path(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.item_path(key)?;
        // Readers never see a partially written item, and each writer gets
        // its own temporary file.
        let tmp = self.dir.join(format!(
            ".{}.{}.{}.tmp",
            key,
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        let written = fs::File::create(&tmp).and_then(|mut f| {
            f.write_all(value.as_bytes())?;
            f.sync_all()
        });
        if let Err(err) = written.and_then(|()| fs::rename(&tmp, &path)) {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }

        debug!(path = %path.display(), bytes = value.len(), "Write item");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.item_path(key)?) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
