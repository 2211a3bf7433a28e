//! In-process transport for tests and examples.
//!
//! Outbound messages land on an mpsc channel the harness reads; inbound
//! messages are injected through a paired `ChannelSource` or straight into
//! `handle_raw_message`. Suitable for single-process wiring; real
//! deployments supply their own socket-backed `RawTransport`.

use crate::domain::error::TransportError;
use crate::ports::outbound::{RawMessageSource, RawTransport};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::Mutex;

/// Transport that captures every outbound message on a channel
pub struct LoopbackTransport {
    outbound: mpsc::UnboundedSender<String>,
    closed: AtomicBool,
}

impl LoopbackTransport {
    /// Create the transport plus the receiver observing its outbound traffic
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                outbound: tx,
                closed: AtomicBool::new(false),
            }),
            rx,
        )
    }

    /// Whether `close()` has run
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RawTransport for LoopbackTransport {
    async fn send_raw(&self, text: &str) -> Result<(), TransportError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }
        self.outbound
            .send(text.to_string())
            .map_err(|_| TransportError::Closed)
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Pull-style message source backed by an mpsc channel
pub struct ChannelSource {
    inbound: Mutex<mpsc::UnboundedReceiver<String>>,
}

impl ChannelSource {
    /// Create the source plus the sender used to inject inbound messages
    pub fn new() -> (Arc<Self>, mpsc::UnboundedSender<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                inbound: Mutex::new(rx),
            }),
            tx,
        )
    }
}

#[async_trait]
impl RawMessageSource for ChannelSource {
    async fn receive(&self) -> Result<String, TransportError> {
        self.inbound
            .lock()
            .await
            .recv()
            .await
            .ok_or(TransportError::Closed)
    }
}
