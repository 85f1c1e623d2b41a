//! HTTP read-path of a hoprd node.
//!
//! All routes are nested under `/api/v3`:
//!
//! | Route | Success | Failure |
//! |-------|---------|---------|
//! | `GET /account/balances` | `{native, hopr}` | 422 |
//! | `GET /node/info` | node info | 422 |
//! | `GET /peers/:peer/ping` | `{latency}` or `{timedOut}` | 400, 404, 422 |
//! | `GET /aliases` | alias → peer id | |
//!
//! When an API token is configured every route requires it; see [`auth`].

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod responses;
pub mod server;

pub use config::ApiConfig;
pub use error::ApiError;
pub use handlers::{build_router, AppState, NodeServices};
pub use server::ApiServer;
