mod initialize;
pub use initialize::Initializer;

mod config;
pub use config::{Config, StorageConfig};

pub mod env {
    pub const LOG_DIRECTIVE: &str = "TAKATHON_LOG";
    pub const CONFIG_PATH: &str = "TAKATHON_CONFIG";
    pub const DIR: &str = "TAKATHON_DIR";
    pub const ORIGIN: &str = "TAKATHON_ORIGIN";
}

pub mod filepath {
    pub const DEFAULT_ROOT_DIR: &str = ".takathon";
}
