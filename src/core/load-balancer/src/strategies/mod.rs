pub mod random;
pub mod round_robin;
pub mod strategy;

pub use random::RandomBalancer;
pub use round_robin::RoundRobinBalancer;
pub use strategy::LoadBalancer;
