//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!
//! Consumers:
//!     → stdout (human-readable or JSON)
//! ```
//!
//! # Design Decisions
//! - Structured fields instead of formatted strings
//! - `RUST_LOG` overrides the configured level

pub mod logging;

pub use logging::init_logging;
