//! Papo Social daemon: HTTP API over the shared engines.

pub mod config;
pub mod routes;
pub mod server;
pub mod service;
pub mod store;
