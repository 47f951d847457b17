use dnotation_roll::random::DEFAULT_MAX_DICE;
use serde::Deserialize;
use std::{fs, path::Path};
use thiserror::Error;
use toml::Value;

/// Settings for the process-wide roller, read from the `[roller]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RollerConfig {
    pub seed: Option<u64>,
    pub max_dice: usize,
}

impl Default for RollerConfig {
    fn default() -> Self {
        RollerConfig {
            seed: None,
            max_dice: DEFAULT_MAX_DICE,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),
}

pub fn parse_config(text: &str) -> Result<RollerConfig, ConfigError> {
    let config: Value = toml::from_str(text)?;
    match config.get("roller") {
        Some(roller) => Ok(roller.clone().try_into()?),
        None => {
            log::warn!("Missing roller section in config, using defaults");
            Ok(RollerConfig::default())
        }
    }
}

pub fn load_config(path: &Path) -> Result<RollerConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&text)
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_parse_config() {
        assert_eq!(
            parse_config("[roller]\nseed = 42\nmax_dice = 100\n").unwrap(),
            RollerConfig {
                seed: Some(42),
                max_dice: 100
            }
        );
        assert_eq!(
            parse_config("[roller]\nseed = 7\n").unwrap(),
            RollerConfig {
                seed: Some(7),
                max_dice: DEFAULT_MAX_DICE
            }
        );
    }

    #[test]
    fn test_missing_section_uses_defaults() {
        assert_eq!(parse_config("").unwrap(), RollerConfig::default());
        assert_eq!(
            parse_config("[other]\nkey = 1\n").unwrap(),
            RollerConfig::default()
        );
    }

    #[test]
    fn test_malformed_config() {
        assert!(matches!(
            parse_config("[roller]\nmax_dice = \"many\"\n"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            load_config(Path::new("/nonexistent/roll.toml")),
            Err(ConfigError::Read { .. })
        ));
    }
}
