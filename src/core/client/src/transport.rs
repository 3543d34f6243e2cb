//! JSON-over-HTTP transport for the execute service.

use std::sync::Arc;

use async_trait::async_trait;
use hyper::client::HttpConnector;
use hyper::{Body, Client, Method, Request, Uri};
use tokio::net::TcpStream;
use tracing::debug;

use crate::connection::{ClientConnection, ConnectionFactory};
use crate::error::{ClientError, Result, ServiceError};
use crate::protocol::{ExceptionResponse, ExecuteRequest, ExecuteResponse};
use crate::server::ServerName;

/// Path the execute service listens on.
pub const EXECUTE_PATH: &str = "/execute";

/// Builds [`HttpConnection`]s that share one pooled hyper client.
#[derive(Clone)]
pub struct HttpConnectionFactory {
    client: Client<HttpConnector, Body>,
}

impl HttpConnectionFactory {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpConnectionFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// `http://<server>/execute`, with IPv6 hosts bracketed.
fn execute_uri(server: &ServerName) -> std::result::Result<Uri, http::Error> {
    Uri::builder()
        .scheme("http")
        .authority(server.to_string().as_str())
        .path_and_query(EXECUTE_PATH)
        .build()
}

#[async_trait]
impl ConnectionFactory for HttpConnectionFactory {
    async fn get_connection(&self, server: &ServerName) -> Result<Arc<dyn ClientConnection>> {
        let connection_error = |reason: String| ClientError::Connection {
            server: server.clone(),
            reason,
        };

        let uri = execute_uri(server).map_err(|e| connection_error(e.to_string()))?;

        // Fail at bind time if the server is unreachable.
        TcpStream::connect((server.host(), server.port()))
            .await
            .map_err(|e| connection_error(e.to_string()))?;
        debug!(%server, "server reachable");

        Ok(Arc::new(HttpConnection {
            client: self.client.clone(),
            server: server.clone(),
            uri,
        }))
    }
}

pub struct HttpConnection {
    client: Client<HttpConnector, Body>,
    server: ServerName,
    uri: Uri,
}

fn transport_error(e: impl std::fmt::Display) -> ServiceError {
    ServiceError::Transport(e.to_string())
}

#[async_trait]
impl ClientConnection for HttpConnection {
    async fn execute(
        &self,
        request: ExecuteRequest,
    ) -> std::result::Result<ExecuteResponse, ServiceError> {
        let body = serde_json::to_vec(&request).map_err(transport_error)?;
        let outbound = Request::builder()
            .method(Method::POST)
            .uri(self.uri.clone())
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .map_err(transport_error)?;

        let response = self.client.request(outbound).await.map_err(transport_error)?;
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body())
            .await
            .map_err(transport_error)?;

        if status.is_success() {
            return serde_json::from_slice(&bytes).map_err(|e| {
                ServiceError::Transport(format!("invalid response from {}: {e}", self.server))
            });
        }

        match serde_json::from_slice::<ExceptionResponse>(&bytes) {
            Ok(exception) => Err(ServiceError::Remote {
                exception_class: exception.exception_class,
                message: exception.message,
            }),
            Err(_) => Err(ServiceError::Transport(format!(
                "{} answered {}",
                self.server, status
            ))),
        }
    }
}
