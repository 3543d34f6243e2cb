use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Result, ServiceError};
use crate::protocol::{ExecuteRequest, ExecuteResponse};
use crate::server::ServerName;

/// Live handle to one server's execute service.
#[async_trait]
pub trait ClientConnection: Send + Sync {
    async fn execute(
        &self,
        request: ExecuteRequest,
    ) -> std::result::Result<ExecuteResponse, ServiceError>;
}

/// Hands out connections by server address. Shared between dispatchers.
#[async_trait]
pub trait ConnectionFactory: Send + Sync {
    async fn get_connection(&self, server: &ServerName) -> Result<Arc<dyn ClientConnection>>;
}
