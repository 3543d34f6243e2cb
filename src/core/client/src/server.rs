use std::fmt;
use std::str::FromStr;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Address of one query server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerName {
    host: String,
    port: u16,
}

impl ServerName {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for ServerName {
    /// IPv6 hosts are bracketed so the result is a valid URI authority.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Errors encountered while parsing a [`ServerName`] from `host:port` text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseServerNameError {
    #[error("missing host in server name '{0}'")]
    MissingHost(String),
    #[error("missing port in server name '{0}', expected host:port")]
    MissingPort(String),
    #[error("invalid port in server name '{0}'")]
    InvalidPort(String),
    /// IPv6 hosts must be written as `[host]:port`.
    #[error("unbracketed IPv6 host in server name '{0}', expected [host]:port")]
    UnbracketedIpv6(String),
}

impl FromStr for ServerName {
    type Err = ParseServerNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, port) = match s.strip_prefix('[') {
            Some(rest) => rest
                .split_once("]:")
                .ok_or_else(|| ParseServerNameError::MissingPort(s.to_string()))?,
            None => {
                let (host, port) = s
                    .rsplit_once(':')
                    .ok_or_else(|| ParseServerNameError::MissingPort(s.to_string()))?;
                if host.contains(':') {
                    return Err(ParseServerNameError::UnbracketedIpv6(s.to_string()));
                }
                (host, port)
            }
        };
        if host.is_empty() {
            return Err(ParseServerNameError::MissingHost(s.to_string()));
        }
        let port = port
            .parse()
            .map_err(|_| ParseServerNameError::InvalidPort(s.to_string()))?;
        Ok(Self::new(host, port))
    }
}

/// Source of the servers currently reachable by clients.
///
/// Implementations are shared and may return a different set on every call.
pub trait ServerTracker: Send + Sync {
    fn online_servers(&self) -> Vec<ServerName>;
}

/// Tracker over an explicit server list.
#[derive(Debug, Default)]
pub struct StaticServerTracker {
    servers: RwLock<Vec<ServerName>>,
}

impl StaticServerTracker {
    pub fn new(servers: Vec<ServerName>) -> Self {
        Self {
            servers: RwLock::new(servers),
        }
    }

    pub fn set_servers(&self, servers: Vec<ServerName>) {
        *self.servers.write() = servers;
    }
}

impl ServerTracker for StaticServerTracker {
    fn online_servers(&self) -> Vec<ServerName> {
        self.servers.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("fserver-1:10010", "fserver-1", 10010)]
    #[case("10.0.0.7:80", "10.0.0.7", 80)]
    #[case("[::1]:10010", "::1", 10010)]
    #[case("[fe80::2]:9000", "fe80::2", 9000)]
    fn display_round_trips(#[case] input: &str, #[case] host: &str, #[case] port: u16) {
        let sn: ServerName = input.parse().unwrap();
        assert_eq!(sn, ServerName::new(host, port));
        assert_eq!(sn.to_string(), input);
    }

    #[rstest]
    #[case("fserver-1", ParseServerNameError::MissingPort("fserver-1".into()))]
    #[case(":10010", ParseServerNameError::MissingHost(":10010".into()))]
    #[case("[]:10010", ParseServerNameError::MissingHost("[]:10010".into()))]
    #[case("fserver-1:port", ParseServerNameError::InvalidPort("fserver-1:port".into()))]
    #[case("fserver-1:70000", ParseServerNameError::InvalidPort("fserver-1:70000".into()))]
    #[case("[::1]", ParseServerNameError::MissingPort("[::1]".into()))]
    #[case("::1:80", ParseServerNameError::UnbracketedIpv6("::1:80".into()))]
    fn rejects_malformed_names(#[case] input: &str, #[case] expected: ParseServerNameError) {
        assert_eq!(input.parse::<ServerName>(), Err(expected));
    }

    #[test]
    fn static_tracker_reflects_updates() {
        let tracker = StaticServerTracker::new(vec![ServerName::new("a", 1)]);
        assert_eq!(tracker.online_servers().len(), 1);
        tracker.set_servers(Vec::new());
        assert!(tracker.online_servers().is_empty());
    }
}
