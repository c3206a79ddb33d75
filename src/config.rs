use anyhow::{Context, Result};
use inspire_core::query::DEFAULT_API_URL;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Optional settings read from config.toml. Command-line flags take precedence.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Seminar search endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Output path used when `--output` is not given
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Named series usable with `--series-alias <name>`
    /// Example: `cosmo = "Oxford Cosmology Seminar"`
    #[serde(default)]
    pub shortcuts: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: default_api_url(),
            output: None,
            shortcuts: BTreeMap::new(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

/// Get the config file path (~/.config/inspire-seminars/config.toml)
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Could not determine config directory")?
        .join("inspire-seminars");
    Ok(config_dir.join("config.toml"))
}

/// Load the config file.
///
/// An explicit path must exist. The default location is optional and falls
/// back to built-in defaults when absent.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found at {}", path.display());
            }
            path.to_path_buf()
        }
        None => match config_path() {
            Ok(path) if path.exists() => path,
            _ => {
                log::debug!("No config file, using defaults");
                return Ok(Config::default());
            }
        },
    };

    log::debug!("Loading config from {}", path.display());

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    parse_config(&contents)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))
}

fn parse_config(contents: &str) -> Result<Config> {
    Ok(toml::from_str(contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api_url, "https://inspirehep.net/api/seminars");
    }

    #[test]
    fn test_full_config() {
        let config = parse_config(
            r#"
            api_url = "http://localhost:5000/api/seminars"
            output = "/tmp/seminars.ics"

            [shortcuts]
            cosmo = "Oxford Cosmology Seminar"
            "#,
        )
        .unwrap();

        assert_eq!(config.api_url, "http://localhost:5000/api/seminars");
        assert_eq!(config.output, Some(PathBuf::from("/tmp/seminars.ics")));
        assert_eq!(
            config.shortcuts.get("cosmo").map(String::as_str),
            Some("Oxford Cosmology Seminar")
        );
    }

    #[test]
    fn test_load_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "output = \"talks.ics\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.output, Some(PathBuf::from("talks.ics")));
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "shortcuts = 3\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }
}
