use lazy_static::lazy_static;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    pub log_level: Option<String>,
    /// Catalog YAML to use instead of the embedded one.
    pub catalog_path: Option<PathBuf>,
}

impl Config {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Reads `path` if it exists; a missing file means defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Config::default();
        }
        match Config::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                // The logger is not up yet when the config is read.
                eprintln!("Ignoring {}: {:#}", path.display(), e);
                Config::default()
            }
        }
    }
}

lazy_static! {
    pub static ref CONFIG: Config = Config::load_or_default(Path::new(CONFIG_FILE));
}
