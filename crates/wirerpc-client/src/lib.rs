//! Wire-RPC client - correlation core for JSON-RPC 2.0 request/response messaging.
//!
//! This crate matches outbound requests to their eventual inbound responses
//! over a caller-supplied transport. It owns the pending-call registry, the
//! async-to-sync bridge, and the response dispatcher; everything else (actual
//! sockets, framing, reconnect policy) lives behind two narrow hooks.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     RPC CLIENT CORE                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  notify()        call() / call_with_timeout()   call_async() │
//! │     │                      │                         │       │
//! │     │             ┌────────┴─────────┐               │       │
//! │     │             │  Pending Call    │◄──────────────┘       │
//! │     │             │  Store (DashMap) │                       │
//! │     │             └────────┬─────────┘                       │
//! │     │                      │ oneshot / callback              │
//! │  ┌──┴──────────────────────┴───────────────────────┐         │
//! │  │                 Send Path                       │         │
//! │  └──────────────────────┬──────────────────────────┘         │
//! │                         │                                    │
//! │  ┌──────────────────────┴──────────────────────────┐         │
//! │  │          Response Dispatcher                    │         │
//! │  │   (handle_raw_message: decode → resolve)        │         │
//! │  └──────────────────────┬──────────────────────────┘         │
//! └─────────────────────────┼────────────────────────────────────┘
//!                           │
//!              RawTransport::send_raw / RawMessageSource
//!                           │
//!                       [network]
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use wirerpc_client::{ClientConfig, RpcClientService, RpcParams};
//!
//! let client = RpcClientService::new(transport, ClientConfig::default())?;
//! let response = client.call("ping", RpcParams::none()).await?;
//! ```
//!
//! # Guarantees
//!
//! - Each correlation id resolves to at most one handler invocation
//! - Notifications never register state and never suspend
//! - A synchronous call suspends at most its timeout
//! - Unknown, stale, or malformed inbound messages never crash the dispatcher

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports for public API
pub use adapters::listener::MessageListener;
pub use adapters::loopback::{ChannelSource, LoopbackTransport};
pub use domain::config::{ClientConfig, ConfigError};
pub use domain::correlation::CorrelationId;
pub use domain::error::{codes, ClientError, ClientResult, TransportError};
pub use domain::message::{RpcErrorObject, RpcParams, RpcRequest, RpcResponse, JSONRPC_VERSION};
pub use domain::pending::{expiry_sweeper, CallStats, PendingCall, PendingCallStore, ResponseHandler};
pub use ports::inbound::RpcClientApi;
pub use ports::outbound::{RawMessageSource, RawTransport};
pub use service::RpcClientService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
