//! Picks the load balancer implementation named in the configuration.
//!
//! Strategies are registered by identifier together with a constructor.
//! `fsql.master.loadbalancer.impl` selects one; when unset the
//! [`DEFAULT_LOAD_BALANCER`] is used. Every call builds a new instance.

use std::collections::HashMap;

use fsql_client::conf::{Configuration, MASTER_LOADBALANCER_IMPL};
use tracing::{debug, info};

use crate::error::{BalancerError, Result};
use crate::strategies::random::RANDOM;
use crate::strategies::round_robin::ROUND_ROBIN;
use crate::strategies::{LoadBalancer, RandomBalancer, RoundRobinBalancer};

pub const DEFAULT_LOAD_BALANCER: &str = ROUND_ROBIN;

pub type StrategyConstructor = fn(&Configuration) -> Result<Box<dyn LoadBalancer>>;

#[derive(Clone, Default)]
pub struct StrategyRegistry {
    constructors: HashMap<String, StrategyConstructor>,
}

impl StrategyRegistry {
    /// Registry without any strategy.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(ROUND_ROBIN, round_robin);
        registry.register(RANDOM, random);
        registry
    }

    /// Add a strategy, returning the constructor it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        constructor: StrategyConstructor,
    ) -> Option<StrategyConstructor> {
        self.constructors.insert(name.into(), constructor)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Instantiate the configured strategy.
    pub fn create(&self, conf: &Configuration) -> Result<Box<dyn LoadBalancer>> {
        let name = conf.get_or(MASTER_LOADBALANCER_IMPL, DEFAULT_LOAD_BALANCER);
        let construction_error = |reason: String| BalancerError::StrategyConstruction {
            name: name.to_string(),
            reason,
        };

        let constructor = self.constructors.get(name).ok_or_else(|| {
            construction_error(format!("unknown strategy, known: {}", self.names().join(", ")))
        })?;
        let balancer = constructor(conf).map_err(|e| construction_error(e.to_string()))?;

        info!(strategy = name, "load balancer selected");
        if let Some(snapshot) = balancer.debug_snapshot() {
            debug!(strategy = name, %snapshot, "initial balancer state");
        }
        Ok(balancer)
    }
}

fn round_robin(_conf: &Configuration) -> Result<Box<dyn LoadBalancer>> {
    Ok(Box::new(RoundRobinBalancer::new()))
}

fn random(conf: &Configuration) -> Result<Box<dyn LoadBalancer>> {
    Ok(Box::new(RandomBalancer::from_conf(conf)?))
}

/// Create the configured load balancer from the built-in strategies.
pub fn get_load_balancer(conf: &Configuration) -> Result<Box<dyn LoadBalancer>> {
    StrategyRegistry::with_builtins().create(conf)
}
