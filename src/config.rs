use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::blockchain::{BASE_REWARD, DEFAULT_DIFFICULTY, MAX_DIFFICULTY};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value:?}")]
    InvalidValue { name: &'static str, value: String },
    #[error("DIFFICULTY must be at most 64, got {0}")]
    DifficultyTooHigh(u32),
}

/// Runtime settings read from the environment (and `.env`, if present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub difficulty: u32,
    pub miner_reward: u64,
    pub mining_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            difficulty: DEFAULT_DIFFICULTY,
            miner_reward: BASE_REWARD,
            mining_timeout: Duration::from_secs(60),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT")?.unwrap_or(defaults.port),
            difficulty: parse_var(&lookup, "DIFFICULTY")?.unwrap_or(defaults.difficulty),
            miner_reward: parse_var(&lookup, "MINER_REWARD")?.unwrap_or(defaults.miner_reward),
            mining_timeout: parse_var(&lookup, "MINING_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.mining_timeout),
        };
        if config.difficulty > MAX_DIFFICULTY {
            return Err(ConfigError::DifficultyTooHigh(config.difficulty));
        }
        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(Config::from_lookup(lookup(&[])), Ok(Config::default()));
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "5000"),
            ("DIFFICULTY", "5"),
            ("MINER_REWARD", "12"),
            ("MINING_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.difficulty, 5);
        assert_eq!(config.miner_reward, 12);
        assert_eq!(config.mining_timeout, Duration::from_secs(3));
    }

    #[test]
    fn rejects_garbage_and_oversized_difficulty() {
        assert_eq!(
            Config::from_lookup(lookup(&[("PORT", "eighty")])),
            Err(ConfigError::InvalidValue {
                name: "PORT",
                value: "eighty".into()
            })
        );
        assert_eq!(
            Config::from_lookup(lookup(&[("DIFFICULTY", "65")])),
            Err(ConfigError::DifficultyTooHigh(65))
        );
    }
}
