use std::path::PathBuf;

use serde::Deserialize;

use crate::store::StoreFormat;

pub mod setup;

#[derive(Debug, Deserialize)]
pub struct PoseConfig {
    pub store: StoreConfig,
    #[serde(default)]
    pub log: log4rs::config::RawConfig,
}

#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the pose files.
    pub dir: PathBuf,
    #[serde(default)]
    pub format: StoreFormat,
    /// Indent JSON files.
    #[serde(default)]
    pub pretty: bool,
}

#[cfg(test)]
mod tests {
    use super::setup::{Builder, TomlText};
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config: PoseConfig = Builder::new()
            .add_layer(TomlText::new(crate::DEFAULT_CONFIG))
            .build()
            .expect("embedded config must deserialize");

        assert_eq!(config.store.format, StoreFormat::Binary, "binary by default");
        assert!(config.store.pretty, "json is indented by default");
    }

    #[test]
    fn format_names() {
        let config: PoseConfig = Builder::new()
            .add_layer(TomlText::new("[store]\ndir = \"x\"\nformat = \"json\""))
            .build()
            .expect("valid config");

        assert_eq!(config.store.format, StoreFormat::Json, "json format");
        assert!(!config.store.pretty, "pretty defaults off when unset");
    }
}
