//! tinyhttpd - streaming static-page server for small hosts
//!
//! Core library: the bounded-memory HTTP engine, storage and config.

pub mod config;
pub mod http;
pub mod netconfig;
pub mod server;
pub mod site;
pub mod storage;
