//! Wire-level plumbing for the CVM fund registry.
//!
//! * [`cvm`]: HTTP client implementing [`cvm_proxy_common::registry::FundRegistry`].
//! * [`wire`]: request bodies as the registry expects them.
//! * [`content_disposition`]: file name extraction from download responses.

pub mod content_disposition;
pub mod cvm;
pub mod wire;
