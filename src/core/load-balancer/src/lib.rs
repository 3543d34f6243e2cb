pub mod error;
pub mod factory;
pub mod startup;
pub mod strategies;

pub use error::BalancerError;
pub use factory::{get_load_balancer, StrategyRegistry, DEFAULT_LOAD_BALANCER};
pub use strategies::strategy::LoadBalancer;
