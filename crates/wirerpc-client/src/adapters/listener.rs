//! Listener loop feeding inbound messages into the dispatcher.
//!
//! For transports that pull messages (a read loop on an I/O task) rather
//! than pushing into `handle_raw_message` directly.

use crate::domain::error::TransportError;
use crate::ports::outbound::RawMessageSource;
use crate::service::RpcClientService;
use std::sync::Arc;
use tracing::{error, warn};

/// Drives the response dispatcher from a pull-style message source
pub struct MessageListener {
    client: Arc<RpcClientService>,
    source: Arc<dyn RawMessageSource>,
}

impl MessageListener {
    pub fn new(client: Arc<RpcClientService>, source: Arc<dyn RawMessageSource>) -> Self {
        Self { client, source }
    }

    /// Run until the source closes. One dispatch per complete message.
    pub async fn run(self) {
        loop {
            match self.source.receive().await {
                Ok(text) => self.client.handle_raw_message(&text),
                Err(TransportError::Closed) => {
                    warn!("inbound message source closed, stopping listener");
                    break;
                }
                Err(e) => {
                    error!(error = %e, "error receiving inbound message");
                }
            }
        }
    }
}
