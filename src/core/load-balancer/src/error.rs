use thiserror::Error;

#[derive(Error, Debug)]
pub enum BalancerError {
    #[error("Cannot construct load balancer '{name}': {reason}")]
    StrategyConstruction { name: String, reason: String },

    #[error("Invalid value for {key}: {reason}")]
    InvalidSetting { key: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, BalancerError>;
