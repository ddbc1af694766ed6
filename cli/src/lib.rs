//! # cvm-proxy CLI
//!
//! Driving side of the proxy: command line parsing, logging, and the HTTP
//! server that exposes the resolution pipeline.

pub mod commands;
pub mod server;
pub mod terminal;
