//! Correlation engine: send path, async-to-sync bridge, response dispatcher.
//!
//! `RpcClientService` is the reusable core behind the `RpcClientApi`
//! capability trait. It is parameterized by the outbound transport hook and
//! exposes `handle_raw_message` as the inbound hook; callers may run on any
//! task while the dispatcher runs on whatever context the transport uses.

use crate::domain::config::ClientConfig;
use crate::domain::correlation::CorrelationId;
use crate::domain::error::ClientError;
use crate::domain::message::{RpcParams, RpcRequest, RpcResponse};
use crate::domain::pending::{PendingCallStore, ResponseHandler};
use crate::ports::inbound::RpcClientApi;
use crate::ports::outbound::RawTransport;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// RPC client engine.
///
/// One instance per logical connection. All methods take `&self`; the
/// pending-call store is the only shared mutable state.
pub struct RpcClientService {
    store: Arc<PendingCallStore>,
    transport: Arc<dyn RawTransport>,
    config: ClientConfig,
    closed: AtomicBool,
}

impl RpcClientService {
    /// Create a client over the given transport hook
    pub fn new(transport: Arc<dyn RawTransport>, config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let store = Arc::new(PendingCallStore::with_limit(
            config.default_timeout,
            config.max_pending,
        ));
        Ok(Self {
            store,
            transport,
            config,
            closed: AtomicBool::new(false),
        })
    }

    /// The pending-call registry (for wiring the expiry sweeper and stats)
    pub fn store(&self) -> Arc<PendingCallStore> {
        self.store.clone()
    }

    /// Number of currently outstanding correlated calls
    pub fn pending_count(&self) -> usize {
        self.store.pending_count()
    }

    fn ensure_open(&self) -> Result<(), ClientError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ClientError::Closed);
        }
        Ok(())
    }

    /// Send a notification: no id, no registry entry, no wait
    pub async fn notify(&self, method: &str, params: RpcParams) -> Result<(), ClientError> {
        self.ensure_open()?;
        let request = RpcRequest::notification(method, params);
        let text = request.to_json()?;
        self.transport.send_raw(&text).await?;
        debug!(method, "sent notification");
        Ok(())
    }

    /// Correlated call with the configured default deadline
    pub async fn call(&self, method: &str, params: RpcParams) -> Result<RpcResponse, ClientError> {
        self.call_with_timeout(method, params, self.config.default_timeout)
            .await
    }

    /// Correlated call: register, send, then suspend until the response
    /// arrives or `timeout` elapses.
    ///
    /// The timeout path removes the registry entry before returning, so a
    /// late response for it is discarded as unknown.
    pub async fn call_with_timeout(
        &self,
        method: &str,
        params: RpcParams,
        timeout: Duration,
    ) -> Result<RpcResponse, ClientError> {
        self.ensure_open()?;

        let id = CorrelationId::new();
        let (tx, rx) = oneshot::channel();
        self.store.register(
            id,
            method,
            Some(timeout),
            Box::new(move |response| {
                // Receiver dropped means the waiter already gave up
                let _ = tx.send(response);
            }),
        )?;

        if let Err(e) = self.send_registered(id, method, params).await {
            self.store.remove(&id);
            return Err(e);
        }

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => {
                if self.closed.load(Ordering::SeqCst) {
                    Err(ClientError::Closed)
                } else {
                    Err(ClientError::ChannelClosed)
                }
            }
            Err(_) => {
                self.store.remove(&id);
                warn!(
                    correlation_id = %id,
                    method,
                    timeout_ms = timeout.as_millis() as u64,
                    "request timed out"
                );
                Err(ClientError::Timeout { elapsed: timeout })
            }
        }
    }

    /// Correlated call completing through `callback`; returns the id as soon
    /// as the request is on the wire.
    ///
    /// The callback runs on the dispatcher's execution context, not the
    /// caller's. Entries whose response never arrives are reaped by the
    /// expiry sweep after the default timeout.
    pub async fn call_async<F>(
        &self,
        method: &str,
        params: RpcParams,
        callback: F,
    ) -> Result<CorrelationId, ClientError>
    where
        F: FnOnce(RpcResponse) + Send + Sync + 'static,
    {
        self.ensure_open()?;

        let id = CorrelationId::new();
        self.store.register(id, method, None, Box::new(callback))?;

        if let Err(e) = self.send_registered(id, method, params).await {
            self.store.remove(&id);
            return Err(e);
        }
        Ok(id)
    }

    async fn send_registered(
        &self,
        id: CorrelationId,
        method: &str,
        params: RpcParams,
    ) -> Result<(), ClientError> {
        let request = RpcRequest::call(id, method, params);
        let text = request.to_json()?;
        self.transport.send_raw(&text).await?;
        debug!(correlation_id = %id, method, "sent request");
        Ok(())
    }

    /// Inbound hook: the transport calls this once per complete message.
    ///
    /// Never panics. Undecodable text, id-less responses, and unknown ids
    /// are logged and discarded; a matching entry is claimed atomically and
    /// its handler invoked exactly once, error responses included.
    pub fn handle_raw_message(&self, text: &str) {
        let response = match RpcResponse::from_json(text) {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "discarding undecodable inbound message");
                return;
            }
        };

        let Some(id) = response.id else {
            if let Some(error) = &response.error {
                warn!(code = error.code, message = %error.message, "uncorrelated error response");
            } else {
                debug!("discarding response without correlation id");
            }
            return;
        };

        if let Some(error) = &response.error {
            // Delivered to the waiter below so the caller sees the error
            // instead of timing out
            warn!(correlation_id = %id, code = error.code, message = %error.message, "rpc call returned error");
        }

        match self.store.resolve(&id) {
            Some(call) => call.complete(response),
            None => {
                debug!(correlation_id = %id, "response for unknown or already-resolved id");
            }
        }
    }

    /// Abandon all pending calls and release the transport.
    ///
    /// Safe to call more than once; only the first call has any effect.
    /// Synchronous waiters observe `ClientError::Closed`; asynchronous
    /// callbacks are dropped without invocation.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let abandoned = self.store.drain();
        if !abandoned.is_empty() {
            debug!(count = abandoned.len(), "abandoning pending calls on close");
        }
        // Dropping the handlers drops their oneshot senders, waking waiters
        drop(abandoned);
        self.transport.close().await;
    }

    /// Whether `close()` has run
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RpcClientApi for RpcClientService {
    async fn notify(&self, method: &str, params: RpcParams) -> Result<(), ClientError> {
        RpcClientService::notify(self, method, params).await
    }

    async fn call(&self, method: &str, params: RpcParams) -> Result<RpcResponse, ClientError> {
        RpcClientService::call(self, method, params).await
    }

    async fn call_with_timeout(
        &self,
        method: &str,
        params: RpcParams,
        timeout: Duration,
    ) -> Result<RpcResponse, ClientError> {
        RpcClientService::call_with_timeout(self, method, params, timeout).await
    }

    async fn call_async(
        &self,
        method: &str,
        params: RpcParams,
        callback: ResponseHandler,
    ) -> Result<CorrelationId, ClientError> {
        RpcClientService::call_async(self, method, params, callback).await
    }

    async fn close(&self) {
        RpcClientService::close(self).await;
    }
}
