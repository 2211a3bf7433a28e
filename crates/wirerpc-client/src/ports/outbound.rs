//! Outbound ports: the two hooks the transport collaborator provides.
//!
//! The core never opens sockets or frames messages; it hands encoded text to
//! `send_raw` and expects complete inbound messages back, either pushed
//! directly into the dispatcher or pulled through a `RawMessageSource`.

use crate::domain::error::TransportError;
use async_trait::async_trait;

/// Outbound hook: delivers encoded request text to the wire.
///
/// Implementations own delivery; a returned error means the message never
/// left, and the send path rolls back any registry entry it created.
#[async_trait]
pub trait RawTransport: Send + Sync {
    /// Send one complete encoded message
    async fn send_raw(&self, text: &str) -> Result<(), TransportError>;

    /// Release underlying resources. Must be safe to call more than once.
    async fn close(&self) {}
}

/// Pull-style inbound hook for the listener loop.
///
/// Must yield exactly one complete message per call.
#[async_trait]
pub trait RawMessageSource: Send + Sync {
    /// Receive the next complete inbound message (pends until available)
    async fn receive(&self) -> Result<String, TransportError>;
}
