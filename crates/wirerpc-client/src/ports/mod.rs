//! Port traits at the boundary of the correlation core.

pub mod inbound;
pub mod outbound;
