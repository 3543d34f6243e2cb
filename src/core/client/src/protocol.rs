//! Request and response shapes exchanged with a query server.
//!
//! Requests are JSON objects tagged by `type`:
//!
//! ```json
//! {"type":"statement","statement":"SELECT 1","read_model":"SNAPSHOT","fetch_size":50,"session_id":null}
//! {"type":"transaction","statements":["INSERT A","INSERT B"],"is_transaction":true,"session_id":"S1"}
//! {"type":"close","session_id":"S1","original_statement":"SELECT 1","close":true}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Read consistency requested for a single statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadModel {
    /// Latest committed data.
    #[default]
    Current,
    /// Point-in-time view taken when the statement starts.
    Snapshot,
    /// Whatever the serving replica has, without coordination.
    Inconsistent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExecuteRequest {
    Statement {
        statement: String,
        read_model: ReadModel,
        fetch_size: u32,
        session_id: Option<String>,
    },
    Transaction {
        statements: Vec<String>,
        is_transaction: bool,
        session_id: Option<String>,
    },
    Close {
        session_id: String,
        original_statement: Option<String>,
        close: bool,
    },
}

impl ExecuteRequest {
    pub fn statement(
        statement: impl Into<String>,
        read_model: ReadModel,
        fetch_size: u32,
        session_id: Option<String>,
    ) -> Self {
        Self::Statement {
            statement: statement.into(),
            read_model,
            fetch_size,
            session_id,
        }
    }

    /// Batch of statements, executed atomically when `is_transaction` is set.
    pub fn transaction(
        statements: Vec<String>,
        is_transaction: bool,
        session_id: Option<String>,
    ) -> Self {
        Self::Transaction {
            statements,
            is_transaction,
            session_id,
        }
    }

    pub fn close(session_id: impl Into<String>, original_statement: Option<String>) -> Self {
        Self::Close {
            session_id: session_id.into(),
            original_statement,
            close: true,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        match self {
            Self::Statement { session_id, .. } | Self::Transaction { session_id, .. } => {
                session_id.as_deref()
            }
            Self::Close { session_id, .. } => Some(session_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteResponse {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub payload: Value,
}

impl ExecuteResponse {
    pub fn new(session_id: impl Into<String>, payload: Value) -> Self {
        Self {
            session_id: session_id.into(),
            payload,
        }
    }

    /// Session assigned by the server; an empty id means none.
    pub fn session(&self) -> Option<&str> {
        if self.session_id.is_empty() {
            None
        } else {
            Some(&self.session_id)
        }
    }
}

/// Body returned by a server when a call fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionResponse {
    pub exception_class: String,
    #[serde(default)]
    pub message: String,
}
