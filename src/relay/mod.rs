//! HTTP relay subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request (method, raw path under the mount prefix, headers, body)
//!     → target.rs (<origin>/<sub_path>[?query])
//!     → body.rs (RequestBodyKind decided once; body extracted)
//!     → headers.rs (request headers sanitized)
//!     → forward.rs (reqwest call to the backend)
//!     → body.rs (PayloadKind decided once; payload decoded)
//!     → headers.rs (response headers filtered, set-cookie kept)
//!     → response to caller, or error.rs (uniform JSON error)
//! ```
//!
//! # Design Decisions
//! - Both bodies are buffered in full; no streaming pass-through
//! - No retries, caching or failure classification
//! - The backend origin is injected at construction and never changes

pub mod body;
pub mod error;
pub mod forward;
pub mod headers;
pub mod target;

pub use error::RelayError;
pub use forward::Relay;
