//! Core primitives for the odbcprobe diagnostic client.
//!
//! This crate provides the session object, catalog listings, driver
//! information lookup, result-set rendering, and diagnostics reporting used
//! by the `odbcprobe` binary. All connectivity primitives (handle
//! allocation, connect, execute, fetch, diagnostics, catalog functions) come
//! from the `odbc-api` binding; nothing here reimplements the driver
//! manager.
//!
//! # Resource Model
//! Three nested resources with strict lifetimes, enforced by the borrow
//! checker instead of manual handle bookkeeping:
//! - the [`Environment`], created once and destroyed last;
//! - a [`Session`] borrowing the environment for the lifetime of one
//!   connection;
//! - per-query cursors borrowing the session, consumed forward-only and
//!   dropped as soon as their results are rendered.
//!
//! Everything is single-threaded, synchronous, and blocking.

pub mod catalog;
pub mod diagnostics;
pub mod error;
mod getinfo;
pub mod logging;
pub mod render;
pub mod session;
pub mod target;

// Re-export commonly used types
pub use error::{ProbeError, Result, redact_connection_string};
pub use logging::init_logging;
pub use session::{DriverInformation, GetDataSupport, Session, create_environment};
pub use target::ProbeTarget;

// The environment type is part of this crate's public API surface: callers
// create one in `main` and lend it to every session.
pub use odbc_api::Environment;
