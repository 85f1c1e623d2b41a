//! Command handlers, one module per API area.

pub mod account;
pub mod node;
pub mod ping;
