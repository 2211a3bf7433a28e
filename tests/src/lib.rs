//! # Wire-RPC Test Suite
//!
//! Unified test crate for the correlation core.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Loopback wiring and responder harness
//! └── integration/      # End-to-end correlation flows
//!     ├── flows.rs      # notify / call / call_async over loopback
//!     └── concurrency.rs# Races, id uniqueness, expiry sweeping
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p wirerpc-tests
//!
//! # By category
//! cargo test -p wirerpc-tests integration::flows::
//! cargo test -p wirerpc-tests integration::concurrency::
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
