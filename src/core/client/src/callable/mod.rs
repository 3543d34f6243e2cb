//! Client-side dispatch of one statement or transaction to a query server.
//!
//! A [`Dispatcher`] is driven by an outer retry loop:
//!
//! 1. [`Dispatcher::bind`] picks an online server and opens a connection to it,
//! 2. [`Dispatcher::execute`] sends the request and adopts the session id the
//!    server answers with,
//! 3. [`Dispatcher::close`] releases the server-side session once the caller
//!    is done with it.
//!
//! A dispatcher performs no retries and no internal synchronization. Calls on
//! one instance must be sequential.

mod chooser;
mod state;

use std::sync::Arc;

use tracing::{debug, warn};

pub use chooser::{RandomChooser, ServerChooser};
pub use state::{Binding, DispatchState, Session};

use crate::connection::{ClientConnection, ConnectionFactory};
use crate::error::{remote_exception, ClientError, Result};
use crate::protocol::{ExecuteRequest, ExecuteResponse, ReadModel};
use crate::server::{ServerName, ServerTracker};

/// What a dispatcher executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestSpec {
    Single {
        sql: String,
        read_model: ReadModel,
        fetch_size: u32,
    },
    Batch {
        sqls: Vec<String>,
        is_transaction: bool,
    },
}

pub struct Dispatcher {
    tracker: Arc<dyn ServerTracker>,
    connections: Arc<dyn ConnectionFactory>,
    chooser: Box<dyn ServerChooser>,
    spec: RequestSpec,
    state: DispatchState<Arc<dyn ClientConnection>>,
}

impl Dispatcher {
    pub fn new(
        tracker: Arc<dyn ServerTracker>,
        connections: Arc<dyn ConnectionFactory>,
        spec: RequestSpec,
    ) -> Self {
        Self {
            tracker,
            connections,
            chooser: Box::new(RandomChooser::from_entropy()),
            spec,
            state: DispatchState::new(None),
        }
    }

    pub fn statement(
        tracker: Arc<dyn ServerTracker>,
        connections: Arc<dyn ConnectionFactory>,
        sql: impl Into<String>,
        read_model: ReadModel,
        fetch_size: u32,
    ) -> Self {
        Self::new(
            tracker,
            connections,
            RequestSpec::Single {
                sql: sql.into(),
                read_model,
                fetch_size,
            },
        )
    }

    pub fn transaction(
        tracker: Arc<dyn ServerTracker>,
        connections: Arc<dyn ConnectionFactory>,
        sqls: Vec<String>,
    ) -> Self {
        Self::new(
            tracker,
            connections,
            RequestSpec::Batch {
                sqls,
                is_transaction: true,
            },
        )
    }

    /// Continue a session the server assigned to an earlier dispatcher.
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.state = DispatchState::new(Some(session_id.into()));
        self
    }

    pub fn with_chooser(mut self, chooser: impl ServerChooser + 'static) -> Self {
        self.chooser = Box::new(chooser);
        self
    }

    pub fn request_spec(&self) -> &RequestSpec {
        &self.spec
    }

    pub fn session_id(&self) -> Option<&str> {
        self.state.session_id()
    }

    pub fn bound_server(&self) -> Option<&ServerName> {
        self.state.server()
    }

    /// Bind to a randomly chosen online server.
    ///
    /// A no-op when already bound and `force_rebind` is false. On failure the
    /// previous binding, if any, is kept.
    pub async fn bind(&mut self, force_rebind: bool) -> Result<()> {
        if !self.state.needs_binding(force_rebind) {
            return Ok(());
        }

        let mut servers = self.tracker.online_servers();
        if servers.is_empty() {
            warn!("no online servers to bind to");
            return Err(ClientError::NoServersAvailable);
        }
        let index = self.chooser.choose(servers.len()) % servers.len();
        let server = servers.swap_remove(index);

        let connection = self.connections.get_connection(&server).await?;
        debug!(%server, force_rebind, "dispatcher bound");
        self.state.bound(server, connection);
        Ok(())
    }

    /// Request for the next `execute`, carrying the current session id.
    pub fn build_request(&self) -> ExecuteRequest {
        let session_id = self.state.session_id().map(str::to_string);
        match &self.spec {
            RequestSpec::Single {
                sql,
                read_model,
                fetch_size,
            } => ExecuteRequest::statement(sql.clone(), *read_model, *fetch_size, session_id),
            RequestSpec::Batch {
                sqls,
                is_transaction,
            } => ExecuteRequest::transaction(sqls.clone(), *is_transaction, session_id),
        }
    }

    /// Close request for the current session, `None` when there is no session.
    pub fn build_close_request(&self) -> Option<ExecuteRequest> {
        let session_id = self.state.session_id()?;
        let original_statement = match &self.spec {
            RequestSpec::Single { sql, .. } => Some(sql.clone()),
            RequestSpec::Batch { .. } => None,
        };
        Some(ExecuteRequest::close(session_id, original_statement))
    }

    /// Send the request over the bound connection.
    ///
    /// The session id in the response replaces the local one.
    pub async fn execute(&mut self) -> Result<ExecuteResponse> {
        let connection = self.bound_connection()?;
        let request = self.build_request();
        debug!(
            server = ?self.state.server(),
            session_id = ?request.session_id(),
            "executing request"
        );

        let response = connection.execute(request).await.map_err(|e| {
            warn!(error = %e, server = ?self.state.server(), "execute failed");
            remote_exception(e)
        })?;
        self.state.observe_response(response.session());
        Ok(response)
    }

    /// Close the server-side session.
    ///
    /// Without a session this sends nothing. After a successful close the
    /// session is forgotten, so a second call is a no-op.
    pub async fn close(&mut self) -> Result<()> {
        let Some(request) = self.build_close_request() else {
            return Ok(());
        };
        let connection = self.bound_connection()?;

        connection.execute(request).await.map_err(|e| {
            warn!(error = %e, session_id = ?self.state.session_id(), "closing session failed");
            remote_exception(e)
        })?;
        if let Some(session_id) = self.state.end_session() {
            debug!(%session_id, "session closed");
        }
        Ok(())
    }

    fn bound_connection(&self) -> Result<Arc<dyn ClientConnection>> {
        self.state.connection().cloned().ok_or(ClientError::NotBound)
    }
}
