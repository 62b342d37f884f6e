use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use shoplist_db::credentials::MIN_TOKEN_BITS;

const DEFAULT_DB_PATH: &str = "shoplist.db";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_TOKEN_BITS: u32 = 500;

/// Process configuration. Built once at startup and handed to the stores
/// and the router; nothing reads the environment after that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub token_bits: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the environment layer only. Callers merge CLI overrides on top
    /// and then call [`Config::validate`] on the result.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path: PathBuf = lookup("SHOPLIST_DB_PATH")
            .unwrap_or_else(|| DEFAULT_DB_PATH.into())
            .into();
        let host = lookup("SHOPLIST_HOST").unwrap_or_else(|| DEFAULT_HOST.into());
        let port = match lookup("SHOPLIST_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("SHOPLIST_PORT is not a port number: {}", raw))?,
            None => DEFAULT_PORT,
        };
        let token_bits = match lookup("SHOPLIST_TOKEN_BITS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("SHOPLIST_TOKEN_BITS is not a number: {}", raw))?,
            None => DEFAULT_TOKEN_BITS,
        };

        Ok(Self {
            db_path,
            host,
            port,
            token_bits,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.token_bits < MIN_TOKEN_BITS {
            bail!(
                "token width of {} bits is below the minimum of {}",
                self.token_bits,
                MIN_TOKEN_BITS
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.db_path, PathBuf::from("shoplist.db"));
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.token_bits, 500);
    }

    #[test]
    fn overrides() {
        let config = config_from(&[
            ("SHOPLIST_DB_PATH", "/var/lib/shoplist/list.db"),
            ("SHOPLIST_HOST", "127.0.0.1"),
            ("SHOPLIST_PORT", "8080"),
            ("SHOPLIST_TOKEN_BITS", "256"),
        ])
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/var/lib/shoplist/list.db"));
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.token_bits, 256);
    }

    #[test]
    fn bad_numbers_rejected() {
        assert!(config_from(&[("SHOPLIST_PORT", "http")]).is_err());
        assert!(config_from(&[("SHOPLIST_PORT", "70000")]).is_err());
        assert!(config_from(&[("SHOPLIST_TOKEN_BITS", "lots")]).is_err());
    }

    #[test]
    fn narrow_tokens_rejected() {
        let config = config_from(&[("SHOPLIST_TOKEN_BITS", "64")]).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("256"));
    }

    #[test]
    fn minimum_width_accepted() {
        let config = config_from(&[("SHOPLIST_TOKEN_BITS", "256")]).unwrap();
        assert!(config.validate().is_ok());
    }
}
