//! Adapters implementing the ports against real infrastructure.

pub mod cache;
pub mod http;
pub mod transport;
