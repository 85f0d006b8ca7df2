//! Runtime configuration.
//!
//! Sources, lowest to highest precedence:
//! - built-in defaults
//! - `config.toml` in the working directory (optional)
//! - `SUPABASE_URL` / `SUPABASE_ANON_KEY` (also with the `NEXT_PUBLIC_` prefix)
//! - `PORTFOLIO_`-prefixed variables, nested with `__`
//!   (e.g. `PORTFOLIO_BASIC__LISTEN_ADDR`)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::PortfolioError;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub basic: BasicConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicConfig {
    pub listen_addr: String,
    pub loglevel: String,
    /// Outbound proxy for store requests.
    #[serde(default)]
    pub proxy: Option<Url>,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            proxy: None,
        }
    }
}

/// Where portfolio rows come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    #[default]
    Remote,
    /// Built-in static rows; local development only.
    Fixture,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub url: Option<Url>,
    #[serde(default)]
    pub anon_key: Option<String>,
    #[serde(default)]
    pub source: DataSource,
}

impl StoreConfig {
    /// Endpoint and key for the remote store. Both are required when
    /// `source` is `remote`.
    pub fn credentials(&self) -> Result<(Url, String), PortfolioError> {
        let url = self
            .url
            .clone()
            .ok_or(PortfolioError::MissingConfig("SUPABASE_URL"))?;
        let key = self
            .anon_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(PortfolioError::MissingConfig("SUPABASE_ANON_KEY"))?;
        Ok((url, key))
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(store_env("NEXT_PUBLIC_SUPABASE_"))
            .merge(store_env("SUPABASE_"))
            .merge(Env::prefixed("PORTFOLIO_").split("__"))
    }

    /// Load and validate configuration from all sources.
    pub fn load() -> Result<Self, PortfolioError> {
        let cfg: Config = Self::figment().extract()?;
        if cfg.store.source == DataSource::Remote {
            cfg.store.credentials()?;
        }
        Ok(cfg)
    }
}

/// Maps `<prefix>URL` and `<prefix>ANON_KEY` onto `store.url` / `store.anon_key`.
fn store_env(prefix: &'static str) -> Env {
    Env::prefixed(prefix)
        .only(&["url", "anon_key"])
        .map(|key| format!("store.{}", key.as_str()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_to_remote_on_port_8000() {
        let cfg = Config::default();
        assert_eq!(cfg.basic.listen_addr, "0.0.0.0:8000");
        assert_eq!(cfg.store.source, DataSource::Remote);
        assert!(cfg.store.credentials().is_err());
    }

    #[test]
    fn reads_supabase_env() {
        Jail::expect_with(|jail| {
            jail.set_env("SUPABASE_URL", "https://abc.supabase.co");
            jail.set_env("SUPABASE_ANON_KEY", "anon");
            let cfg = Config::load().expect("config should load");
            let (url, key) = cfg.store.credentials().expect("credentials");
            assert_eq!(url.as_str(), "https://abc.supabase.co/");
            assert_eq!(key, "anon");
            Ok(())
        });
    }

    #[test]
    fn accepts_next_public_prefix() {
        Jail::expect_with(|jail| {
            jail.set_env("NEXT_PUBLIC_SUPABASE_URL", "https://xyz.supabase.co");
            jail.set_env("NEXT_PUBLIC_SUPABASE_ANON_KEY", "public");
            let cfg = Config::load().expect("config should load");
            assert_eq!(cfg.store.anon_key.as_deref(), Some("public"));
            Ok(())
        });
    }

    #[test]
    fn missing_key_is_fatal_for_remote_source() {
        Jail::expect_with(|jail| {
            jail.set_env("SUPABASE_URL", "https://abc.supabase.co");
            let err = Config::load().unwrap_err();
            assert!(matches!(
                err,
                PortfolioError::MissingConfig("SUPABASE_ANON_KEY")
            ));
            Ok(())
        });
    }

    #[test]
    fn fixture_source_needs_no_credentials() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                [basic]
                listen_addr = "127.0.0.1:3000"
                loglevel = "debug"

                [store]
                source = "fixture"
                "#,
            )?;
            jail.set_env("PORTFOLIO_BASIC__LOGLEVEL", "warn");
            let cfg = Config::load().expect("config should load");
            assert_eq!(cfg.store.source, DataSource::Fixture);
            assert_eq!(cfg.basic.listen_addr, "127.0.0.1:3000");
            assert_eq!(cfg.basic.loglevel, "warn");
            Ok(())
        });
    }
}
