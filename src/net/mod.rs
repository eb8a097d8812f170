//! Network layer subsystem.
//!
//! Plain TCP is handed straight to axum; TLS termination (rustls through
//! axum-server) is optional and configured on the listener.

pub mod tls;
