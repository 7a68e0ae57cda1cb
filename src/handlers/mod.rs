//! HTTP API handlers
//!
//! Each submodule handles one domain of the REST API.

pub mod entities;
pub mod graph;
pub mod health;
pub mod router;
pub mod state;
pub mod types;

pub use router::{build_api_routes, build_public_routes, build_router};
pub use state::{AppState, SharedState};
pub use types::*;
