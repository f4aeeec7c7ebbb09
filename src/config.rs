use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATABASE: &str = "realty.db";
pub const DEFAULT_PORT: u16 = 5000;

/// Contents of `realty.toml`. Every key is optional; CLI flags win over
/// file values, which win over the built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RealtyConfig {
    pub database: Option<String>,
    pub port: Option<u16>,
    pub seed_on_start: Option<bool>,
}

impl RealtyConfig {
    pub fn database_path(&self, cli: Option<PathBuf>) -> PathBuf {
        cli.or_else(|| self.database.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE))
    }

    pub fn port(&self, cli: Option<u16>) -> u16 {
        cli.or(self.port).unwrap_or(DEFAULT_PORT)
    }

    pub fn seed_on_start(&self, cli: bool) -> bool {
        cli || self.seed_on_start.unwrap_or(false)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("realty.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<RealtyConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: RealtyConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
