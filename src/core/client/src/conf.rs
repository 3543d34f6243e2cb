//! Key/value configuration shared by the client and the master.
//!
//! Values come from code defaults, overridden by `FSQL_*` environment
//! variables. `FSQL_MASTER_LOADBALANCER_IMPL` maps to the dotted key
//! `fsql.master.loadbalancer.impl`.
//!
//! | Key                              | Default       | Description                          |
//! |----------------------------------|---------------|--------------------------------------|
//! | `fsql.master.loadbalancer.impl`  | `round-robin` | Balancer strategy identifier         |
//! | `fsql.balancer.random.seed`      | unset         | Seed for the `random` strategy       |
//! | `fsql.log.level`                 | `info`        | tracing filter for the master binary |
//! | `fsql.master.servers`            | empty         | Comma-separated `host:port` list     |

use std::collections::HashMap;
use std::str::FromStr;

/// Strategy identifier the master instantiates at startup.
pub const MASTER_LOADBALANCER_IMPL: &str = "fsql.master.loadbalancer.impl";

/// Optional u64 seed consumed by the random balancer.
pub const BALANCER_RANDOM_SEED: &str = "fsql.balancer.random.seed";

/// tracing filter used when `RUST_LOG` is not set.
pub const LOG_LEVEL: &str = "fsql.log.level";

/// Query servers known to the master at startup.
pub const MASTER_SERVERS: &str = "fsql.master.servers";

const ENV_PREFIX: &str = "FSQL_";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    values: HashMap<String, String>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `FSQL_*` variable from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Same mapping as [`Configuration::from_env`], over an explicit set of
    /// variables.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let values = vars
            .into_iter()
            .filter_map(|(k, v)| env_key(k.as_ref()).map(|key| (key, v.into())))
            .collect();
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Parse a value, `None` if the key is absent.
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Option<Result<T, T::Err>> {
        self.get(key).map(str::parse)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }
}

fn env_key(var: &str) -> Option<String> {
    let rest = var.strip_prefix(ENV_PREFIX)?;
    if rest.is_empty() {
        return None;
    }
    let mut key = String::from("fsql.");
    key.push_str(&rest.to_ascii_lowercase().replace('_', "."));
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_vars_map_to_dotted_keys() {
        let conf = Configuration::from_vars([
            ("FSQL_MASTER_LOADBALANCER_IMPL", "random"),
            ("FSQL_BALANCER_RANDOM_SEED", "7"),
            ("HOME", "/root"),
            ("FSQL_", "ignored"),
        ]);
        assert_eq!(conf.get(MASTER_LOADBALANCER_IMPL), Some("random"));
        assert_eq!(conf.get(BALANCER_RANDOM_SEED), Some("7"));
        assert_eq!(conf.get("home"), None);
        assert_eq!(
            conf,
            Configuration::new()
                .with(MASTER_LOADBALANCER_IMPL, "random")
                .with(BALANCER_RANDOM_SEED, "7")
        );
    }

    #[test]
    fn defaults_and_parsing() {
        let conf = Configuration::new().with(BALANCER_RANDOM_SEED, "not-a-number");
        assert_eq!(conf.get_or(LOG_LEVEL, "info"), "info");
        assert!(conf.get_parsed::<u64>(BALANCER_RANDOM_SEED).unwrap().is_err());
        assert!(conf.get_parsed::<u64>(MASTER_LOADBALANCER_IMPL).is_none());
    }
}
