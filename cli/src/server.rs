//! # HTTP Server
//!
//! axum adapter over the resolution pipeline and the admission controller.

pub mod admission;
pub mod handlers;
pub mod response;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
