use thiserror::Error;

use crate::server::ServerName;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("No online servers available")]
    NoServersAvailable,

    #[error("Connection error to {server}: {reason}")]
    Connection { server: ServerName, reason: String },

    #[error("Remote execution failed: {exception_class}: {message}")]
    RemoteExecution {
        exception_class: String,
        message: String,
    },

    #[error("Dispatcher is not bound to a server")]
    NotBound,
}

/// Failure reported by a [`ClientConnection`](crate::connection::ClientConnection)
/// before it is translated for the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The server ran the call and raised an exception.
    #[error("{exception_class}: {message}")]
    Remote {
        exception_class: String,
        message: String,
    },

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Exception class reported for failures that never reached the server.
pub const TRANSPORT_EXCEPTION_CLASS: &str = "TransportError";

/// Unwrap a service failure into the remote-execution error surfaced to callers.
pub fn remote_exception(err: ServiceError) -> ClientError {
    match err {
        ServiceError::Remote {
            exception_class,
            message,
        } => ClientError::RemoteExecution {
            exception_class,
            message,
        },
        ServiceError::Transport(message) => ClientError::RemoteExecution {
            exception_class: TRANSPORT_EXCEPTION_CLASS.to_string(),
            message,
        },
    }
}

impl From<ServiceError> for ClientError {
    fn from(err: ServiceError) -> Self {
        remote_exception(err)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_exception_keeps_class_and_message() {
        let err = remote_exception(ServiceError::Remote {
            exception_class: "TableNotFoundException".to_string(),
            message: "t1".to_string(),
        });
        match err {
            ClientError::RemoteExecution {
                exception_class,
                message,
            } => {
                assert_eq!(exception_class, "TableNotFoundException");
                assert_eq!(message, "t1");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn transport_failure_becomes_remote_execution() {
        let err: ClientError = ServiceError::Transport("connection reset".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Remote execution failed: TransportError: connection reset"
        );
    }
}
