use directories::BaseDirs;
use serde::Deserialize;
use std::{env, fs, path::PathBuf, time::Duration};

pub const DEFAULT_BASE_URL: &str = "https://restcountries.com/v3.1";

#[derive(Clone, Debug, Deserialize)]
pub struct RestCountriesFileConfig {
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct RestCountriesConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub proxy: Option<String>,
}

impl RestCountriesConfig {
    /// Defaults, overlaid by `atlas/config.toml`, overlaid by env.
    /// The API is keyless, so nothing here is required to exist.
    pub fn from_env_and_file() -> anyhow::Result<Self> {
        let mut base_url = DEFAULT_BASE_URL.to_string();
        let mut timeout_ms = 15_000u64;

        if let Some(path) = Self::config_path() {
            if path.exists() {
                if let Ok(text) = fs::read_to_string(&path) {
                    if let Ok(file_cfg) = toml::from_str::<RestCountriesFileConfig>(&text) {
                        if let Some(u) = file_cfg.base_url {
                            base_url = u;
                        }
                        if let Some(t) = file_cfg.timeout_ms {
                            timeout_ms = t;
                        }
                    }
                }
            }
        }

        if let Ok(u) = env::var("ATLAS_BASE_URL") {
            base_url = u;
        }

        let proxy = env::var("HTTPS_PROXY")
            .ok()
            .or_else(|| env::var("HTTP_PROXY").ok());

        Ok(RestCountriesConfig {
            base_url,
            timeout: Duration::from_millis(timeout_ms),
            proxy,
        })
    }

    fn config_path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        let p = if cfg!(target_os = "windows") {
            base.home_dir().join(".atlas").join("config.toml")
        } else {
            base.config_dir().join("atlas").join("config.toml")
        };
        Some(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_config_parses_partial_tables() {
        let cfg: RestCountriesFileConfig =
            toml::from_str("base_url = \"http://localhost:8080/v3.1\"").unwrap();
        assert_eq!(cfg.base_url.as_deref(), Some("http://localhost:8080/v3.1"));
        assert_eq!(cfg.timeout_ms, None);

        let cfg: RestCountriesFileConfig = toml::from_str("timeout_ms = 2500").unwrap();
        assert_eq!(cfg.timeout_ms, Some(2500));
    }
}
