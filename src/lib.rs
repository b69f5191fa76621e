//! Strict-Transport-Security (RFC 6797) response header middleware.
//!
//! ```text
//! HstsSettings ──configure──▶ HstsPolicy ──HstsLayer / wrap──▶ HstsService<S>
//!                                                               │
//!                      every response ◀── Strict-Transport-Security
//! ```

pub mod config;
pub mod http;
pub mod observability;
pub mod security;

pub use config::{AppConfig, HstsSettings};
pub use http::HttpServer;
pub use security::{wrap, HstsError, HstsLayer, HstsPolicy, HstsService};
