//! Inbound port: the client-facing capability surface.

use crate::domain::correlation::CorrelationId;
use crate::domain::error::ClientError;
use crate::domain::message::{RpcParams, RpcResponse};
use crate::domain::pending::ResponseHandler;
use async_trait::async_trait;
use std::time::Duration;

/// Capability interface for issuing RPC calls.
///
/// Split from the engine so callers can depend on the capability alone;
/// `RpcClientService` provides the reusable correlation logic behind it.
#[async_trait]
pub trait RpcClientApi: Send + Sync {
    /// Fire-and-forget notification: no id, no reply, never waits
    async fn notify(&self, method: &str, params: RpcParams) -> Result<(), ClientError>;

    /// Correlated call, suspending until the response or the default deadline
    async fn call(&self, method: &str, params: RpcParams) -> Result<RpcResponse, ClientError>;

    /// Correlated call with an explicit deadline
    async fn call_with_timeout(
        &self,
        method: &str,
        params: RpcParams,
        timeout: Duration,
    ) -> Result<RpcResponse, ClientError>;

    /// Correlated call completing through `callback` on the dispatcher's
    /// execution context; returns as soon as the request is sent
    async fn call_async(
        &self,
        method: &str,
        params: RpcParams,
        callback: ResponseHandler,
    ) -> Result<CorrelationId, ClientError>;

    /// Abandon all pending calls and release the transport. Idempotent.
    async fn close(&self);
}
