pub mod controller;
pub mod service;

pub use controller::{Fault, RpcController, ServerRpcController};
pub use service::{call_execute, handle_http, ExecuteService};
