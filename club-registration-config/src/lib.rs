use core::fmt::{Debug, Display};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;

pub const CONFIG_FILE: &str = "clubs.toml";
pub const ENV_PREFIX: &str = "CLUB_";

/// Every student starts the term with this many cancellations.
pub const DEFAULT_CANCELLATION_QUOTA: i32 = 2;

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_listen_address")]
    pub listen_address: SocketAddr,
    /// Without a database url the server runs on an in-memory roster seeded with demo data.
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_cancellation_quota")]
    pub cancellation_quota: i32,
    /// Fixes the auto-assignment randomness, mostly useful for reproducing a run.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

const fn default_listen_address() -> SocketAddr {
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 3000))
}

const fn default_cancellation_quota() -> i32 {
    DEFAULT_CANCELLATION_QUOTA
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            database_url: None,
            cancellation_quota: DEFAULT_CANCELLATION_QUOTA,
            random_seed: None,
        }
    }
}

#[derive(thiserror::Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Figment(#[from] figment::Error),
    #[error("cancellation quota must not be negative but is {0}")]
    NegativeCancellationQuota(i32),
}

impl Debug for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

#[must_use]
pub fn figment() -> Figment {
    Figment::new()
        .merge(Toml::file(CONFIG_FILE))
        .merge(Env::prefixed(ENV_PREFIX))
}

pub fn get_config() -> Result<Config, ConfigError> {
    let config: Config = figment().extract()?;
    if config.cancellation_quota < 0 {
        return Err(ConfigError::NegativeCancellationQuota(
            config.cancellation_quota,
        ));
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn defaults_without_file_or_env() {
        Jail::expect_with(|_jail| {
            let config: Config = figment().extract()?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                    listen_address = "0.0.0.0:8080"
                    cancellation_quota = 3
                    random_seed = 7
                "#,
            )?;
            jail.set_env("CLUB_CANCELLATION_QUOTA", "1");
            jail.set_env("CLUB_DATABASE_URL", "postgres://postgres@localhost/clubs");

            let config: Config = figment().extract()?;
            assert_eq!(config.listen_address.port(), 8080);
            assert_eq!(config.cancellation_quota, 1);
            assert_eq!(config.random_seed, Some(7));
            assert_eq!(
                config.database_url.as_deref(),
                Some("postgres://postgres@localhost/clubs")
            );
            Ok(())
        });
    }

    #[test]
    fn negative_quota_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("CLUB_CANCELLATION_QUOTA", "-1");
            assert!(matches!(
                get_config(),
                Err(ConfigError::NegativeCancellationQuota(-1))
            ));
            Ok(())
        });
    }
}
