use std::path::PathBuf;

use serde::Deserialize;

use crate::redirect::AppUrls;
use crate::storage::Backend;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub urls: AppUrls,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: Backend,
    // Only used by the file backend.
    pub root_dir: Option<PathBuf>,
    // Scheme, host and port the store is scoped to.
    pub origin: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_yaml() {
        let yaml = r#"
storage:
  backend: cookie
  origin: https://sponsors.takathon.dev
urls:
  landing: https://takathon.dev
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.storage.backend, Backend::Cookie);
        assert_eq!(
            config.storage.origin.as_deref(),
            Some("https://sponsors.takathon.dev")
        );
        assert_eq!(config.storage.root_dir, None);
        assert_eq!(config.urls.login_url(), "https://takathon.dev/login");
    }

    #[test]
    fn empty_document_is_default() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.storage.backend, Backend::File);
    }
}
