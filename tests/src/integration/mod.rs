//! End-to-end correlation flows over the loopback transport.

pub mod flows;
