//! Same-origin HTTP relay for the verification portal.
//!
//! Requests under a mount prefix (default `/api/proxy`) are re-issued against
//! one fixed backend origin; the backend's status, payload and cookies are
//! relayed back to the caller.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod relay;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use relay::Relay;
