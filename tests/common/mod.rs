use tempfile::TempDir;

use takathon_session::storage::FileStorage;
use takathon_session::{Role, User};

pub const ORIGIN: &str = "http://localhost:3001";

pub fn temp_dir() -> TempDir {
    tempfile::TempDir::new().unwrap()
}

pub fn file_storage(dir: &TempDir) -> FileStorage {
    FileStorage::open(dir.path(), ORIGIN).unwrap()
}

pub fn ada() -> User {
    User::new("u1", "a@b.com", "Ada Lovelace", Role::Student)
}
