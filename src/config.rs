//! Process configuration, read once from the environment at start-up.
//!
//! | Variable | Default |
//! |---|---|
//! | `VIBECHECK_HOST` | `127.0.0.1` |
//! | `VIBECHECK_PORT` | `8000` |
//! | `VIBECHECK_DATABASE` | `vibecheck.db` |
//! | `VIBECHECK_LEXICON` | built-in lexicon |
//! | `VIBECHECK_MISSING_BUSINESS` | `ignore` (or `report`) |
use std::collections::HashMap;
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::info;

use crate::aggregator::MissingBusinessPolicy;
use crate::error::ConfigError;
use crate::lexicon::Lexicon;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub lexicon_path: Option<PathBuf>,
    pub missing_business: MissingBusinessPolicy,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Ok(Self {
            host: try_load(vars, "VIBECHECK_HOST", "127.0.0.1")?,
            port: try_load(vars, "VIBECHECK_PORT", "8000")?,
            database_path: try_load(vars, "VIBECHECK_DATABASE", "vibecheck.db")?,
            lexicon_path: vars.get("VIBECHECK_LEXICON").map(PathBuf::from),
            missing_business: try_load(vars, "VIBECHECK_MISSING_BUSINESS", "ignore")?,
        })
    }

    /// The configured lexicon file, or the built-in lexicon when none is set.
    pub fn lexicon(&self) -> Result<Lexicon, ConfigError> {
        match &self.lexicon_path {
            Some(path) => Lexicon::from_file(path),
            None => {
                info!("VIBECHECK_LEXICON not set, using built-in lexicon");
                Ok(Lexicon::default())
            }
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn try_load<T: FromStr>(
    vars: &HashMap<String, String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = vars.get(key).cloned().unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.parse::<T>().map_err(|e| ConfigError::InvalidVar {
        key: key.to_string(),
        value,
        reason: e.to_string(),
    })
}
