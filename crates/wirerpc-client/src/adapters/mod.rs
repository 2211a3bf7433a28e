//! Adapters wiring the core to concrete message delivery.

pub mod listener;
pub mod loopback;
