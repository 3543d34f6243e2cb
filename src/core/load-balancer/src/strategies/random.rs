use fsql_client::conf::{Configuration, BALANCER_RANDOM_SEED};
use fsql_client::ServerName;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::strategy::LoadBalancer;
use crate::error::{BalancerError, Result};

pub const RANDOM: &str = "random";

pub struct RandomBalancer {
    rng: Mutex<StdRng>,
}

impl RandomBalancer {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Seeded from `fsql.balancer.random.seed` when set.
    pub fn from_conf(conf: &Configuration) -> Result<Self> {
        match conf.get_parsed::<u64>(BALANCER_RANDOM_SEED) {
            None => Ok(Self::new()),
            Some(Ok(seed)) => Ok(Self::seeded(seed)),
            Some(Err(e)) => Err(BalancerError::InvalidSetting {
                key: BALANCER_RANDOM_SEED,
                reason: e.to_string(),
            }),
        }
    }
}

impl Default for RandomBalancer {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadBalancer for RandomBalancer {
    fn name(&self) -> &'static str {
        RANDOM
    }

    fn pick_server(&self, servers: &[ServerName]) -> Option<ServerName> {
        if servers.is_empty() {
            return None;
        }
        let idx = self.rng.lock().gen_range(0..servers.len());
        Some(servers[idx].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn servers() -> Vec<ServerName> {
        (0..5).map(|i| ServerName::new(format!("fserver-{i}"), 10010)).collect()
    }

    #[test]
    fn picks_a_member() {
        let balancer = RandomBalancer::new();
        let servers = servers();
        for _ in 0..20 {
            let picked = balancer.pick_server(&servers).unwrap();
            assert!(servers.contains(&picked));
        }
        assert_eq!(balancer.pick_server(&[]), None);
    }

    #[test]
    fn seed_from_conf_is_reproducible() {
        let conf = Configuration::new().with(BALANCER_RANDOM_SEED, "11");
        let a = RandomBalancer::from_conf(&conf).unwrap();
        let b = RandomBalancer::from_conf(&conf).unwrap();
        let servers = servers();
        for _ in 0..10 {
            assert_eq!(a.pick_server(&servers), b.pick_server(&servers));
        }
    }

    #[test]
    fn bad_seed_is_rejected() {
        let conf = Configuration::new().with(BALANCER_RANDOM_SEED, "eleven");
        assert!(matches!(
            RandomBalancer::from_conf(&conf),
            Err(BalancerError::InvalidSetting { .. })
        ));
    }
}
