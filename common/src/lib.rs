//! # cvm-proxy common
//!
//! Types shared by every crate of the workspace.
//!
//! * **[`models`]**: records exchanged with the CVM registry.
//! * **[`cnpj`]**: the fund identifier and its normalization rules.
//! * **[`error`]**: the error taxonomy of the resolution pipeline.
//! * **[`registry`]**, **[`storage`]**, **[`clock`]**: the traits (ports) implemented by adapters.
//! * **[`config`]**: process configuration.

pub mod clock;
pub mod cnpj;
pub mod config;
pub mod error;
pub mod models;
pub mod registry;
pub mod storage;
