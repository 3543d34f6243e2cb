use std::sync::atomic::{AtomicUsize, Ordering};

use fsql_client::ServerName;

use super::strategy::LoadBalancer;

pub const ROUND_ROBIN: &str = "round-robin";

/// Cycles through the servers in the order given.
pub struct RoundRobinBalancer {
    counter: AtomicUsize,
}

impl RoundRobinBalancer {
    pub fn new() -> Self {
        Self {
            counter: AtomicUsize::new(0),
        }
    }
}

impl Default for RoundRobinBalancer {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadBalancer for RoundRobinBalancer {
    fn name(&self) -> &'static str {
        ROUND_ROBIN
    }

    fn pick_server(&self, servers: &[ServerName]) -> Option<ServerName> {
        if servers.is_empty() {
            return None;
        }

        let index = self.counter.fetch_add(1, Ordering::Relaxed) % servers.len();
        Some(servers[index].clone())
    }

    fn debug_snapshot(&self) -> Option<String> {
        Some(format!("next: {}", self.counter.load(Ordering::Relaxed)))
    }
}
