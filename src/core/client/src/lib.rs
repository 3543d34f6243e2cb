//! Client side of the fsql query service.
//!
//! - [`callable`]: binds to an online server and executes one statement or
//!   transaction on it, tracking the server-assigned session.
//! - [`rpc`]: controller and service plumbing used on the serving side to
//!   report failures through callback-style calls.
//! - [`transport`]: JSON-over-HTTP transport for the execute call.

pub mod callable;
pub mod conf;
pub mod connection;
pub mod error;
pub mod protocol;
pub mod rpc;
pub mod server;
pub mod transport;

pub use callable::{Dispatcher, RandomChooser, RequestSpec, ServerChooser};
pub use conf::Configuration;
pub use connection::{ClientConnection, ConnectionFactory};
pub use error::{ClientError, Result, ServiceError};
pub use protocol::{ExecuteRequest, ExecuteResponse, ReadModel};
pub use server::{ServerName, ServerTracker, StaticServerTracker};
pub use transport::HttpConnectionFactory;
