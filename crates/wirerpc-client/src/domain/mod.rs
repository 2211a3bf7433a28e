//! Domain types for the correlation core.

pub mod config;
pub mod correlation;
pub mod error;
pub mod message;
pub mod pending;
