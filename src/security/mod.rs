//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     HstsSettings → policy.rs (validate, build directive suffix)
//!     → HstsPolicy (immutable)
//!     → headers.rs HstsLayer wraps the handler chain
//!
//! Outgoing response:
//!     → headers.rs (compute max-age, set Strict-Transport-Security)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - Header injection only: no HTTPS enforcement or redirects
//! - Policy is captured by value when wrapping; no shared mutable state
//! - Time is read through `clock.rs` so the countdown can be driven in tests

pub mod clock;
pub mod headers;
pub mod policy;

pub use clock::{Clock, SystemClock};
pub use headers::{wrap, HstsLayer, HstsService};
pub use policy::{Directive, HstsError, HstsPolicy};
