//! # cvm-proxy core
//!
//! Decision logic of the proxy, independent of any transport.
//!
//! * **[`selection`]**: pick one record out of ambiguous registry results.
//! * **[`resolution`]**: the CNPJ to regulation pipeline.
//! * **[`rate_limit`]**: per-client admission control.
//! * **[`file_store`]**, **[`clock`]**: concrete adapters for the storage and clock ports.

pub mod clock;
pub mod file_store;
pub mod rate_limit;
pub mod resolution;
pub mod selection;
