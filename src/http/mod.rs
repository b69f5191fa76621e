//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → TraceLayer → TimeoutLayer → HstsLayer
//!     → handler
//!     → Strict-Transport-Security set on the way out
//! ```

pub mod server;

pub use server::HttpServer;
