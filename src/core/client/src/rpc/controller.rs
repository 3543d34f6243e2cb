//! Controller handed to server-side service methods so they can report a
//! failure to the invoking side without returning an error across the
//! callback boundary.
//!
//! A handler that catches an error records it on the controller and still
//! invokes its completion callback:
//!
//! ```
//! use fsql_client::rpc::{RpcController, ServerRpcController};
//!
//! fn handler(controller: &mut ServerRpcController, done: impl FnOnce(Option<u64>)) {
//!     match std::fs::metadata("/definitely/not/here") {
//!         Ok(meta) => done(Some(meta.len())),
//!         Err(e) => {
//!             controller.set_failed_on(e);
//!             done(None);
//!         }
//!     }
//! }
//!
//! let mut controller = ServerRpcController::new();
//! handler(&mut controller, |_| {});
//! assert!(controller.failed());
//! assert!(controller.failed_on_exception());
//! ```

use std::error::Error;
use std::fmt::Write;

/// Generic per-call controller surface.
pub trait RpcController {
    fn reset(&mut self);

    fn failed(&self) -> bool;

    fn error_text(&self) -> Option<String>;

    fn start_cancel(&mut self);

    fn set_failed(&mut self, message: String);

    fn is_canceled(&self) -> bool;

    fn notify_on_cancel(&mut self, callback: Box<dyn FnOnce() + Send>);
}

/// Failure recorded on a controller.
#[derive(Debug)]
pub enum Fault<E> {
    None,
    Exception(E),
    Message(String),
}

#[derive(Debug)]
pub struct ServerRpcController<E = std::io::Error> {
    fault: Fault<E>,
}

impl<E> Default for ServerRpcController<E> {
    fn default() -> Self {
        Self { fault: Fault::None }
    }
}

impl<E: Error> ServerRpcController<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the error raised by the service method.
    pub fn set_failed_on(&mut self, error: E) {
        self.fault = Fault::Exception(error);
    }

    pub fn failed_on(&self) -> Option<&E> {
        match &self.fault {
            Fault::Exception(e) => Some(e),
            _ => None,
        }
    }

    /// Take the recorded error, leaving the controller reset.
    pub fn take_failed_on(&mut self) -> Option<E> {
        match std::mem::replace(&mut self.fault, Fault::None) {
            Fault::Exception(e) => Some(e),
            other => {
                self.fault = other;
                None
            }
        }
    }

    pub fn failed_on_exception(&self) -> bool {
        matches!(self.fault, Fault::Exception(_))
    }

    pub fn fault(&self) -> &Fault<E> {
        &self.fault
    }
}

impl<E: Error> RpcController for ServerRpcController<E> {
    fn reset(&mut self) {
        self.fault = Fault::None;
    }

    fn failed(&self) -> bool {
        !matches!(self.fault, Fault::None)
    }

    fn error_text(&self) -> Option<String> {
        match &self.fault {
            Fault::None => None,
            Fault::Exception(e) => Some(stringify_error(e)),
            Fault::Message(message) => Some(message.clone()),
        }
    }

    // Cancellation is not supported.
    fn start_cancel(&mut self) {}

    fn set_failed(&mut self, message: String) {
        self.fault = Fault::Message(message);
    }

    fn is_canceled(&self) -> bool {
        false
    }

    // Never invoked; see start_cancel.
    fn notify_on_cancel(&mut self, _callback: Box<dyn FnOnce() + Send>) {}
}

/// Render an error followed by its `source()` chain, one cause per line.
pub fn stringify_error(error: &dyn Error) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let _ = write!(text, "\nCaused by: {cause}");
        source = cause.source();
    }
    text
}
