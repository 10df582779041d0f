use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Top-level config (wakeup.toml + WAKEUP_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WakeupConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.wakeup/wakeup.db", home)
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.wakeup/wakeup.toml", home)
}

impl WakeupConfig {
    /// Load config from a TOML file with WAKEUP_* env var overrides.
    ///
    /// Falls back to `~/.wakeup/wakeup.toml` when no explicit path is given;
    /// a missing file yields the defaults.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: WakeupConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("WAKEUP_").split("_"))
            .extract()
            .map_err(|e| crate::error::CoreError::Config(e.to_string()))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_home_dir() {
        let config = WakeupConfig::default();
        assert!(config.database.path.ends_with("/.wakeup/wakeup.db"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = WakeupConfig::load(Some("/nonexistent/wakeup.toml")).unwrap();
        assert!(config.database.path.ends_with("wakeup.db"));
    }
}
