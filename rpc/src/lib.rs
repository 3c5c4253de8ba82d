//! HTTP API for the ZID verification service.
//!
//! Routes:
//! - `GET /verify-employment/{tokenId}/{action}` — the public resolve entry
//!   point (the only way into the state machine from outside)
//! - `/api/job-histories` — record CRUD and verification-request issuance
//!   for the admin frontend
//! - `/api/anchor/telemetry`, `/metrics` — operational visibility

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod pagination;
pub mod server;

pub use error::RpcError;
pub use metrics::RpcMetrics;
pub use server::{router, AppState, RpcServer};
