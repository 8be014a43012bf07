//! # Duplicate Media Mover
//!
//! Finds content duplicates in a directory tree and moves them into a
//! quarantine folder instead of deleting them.
//!
//! ## Core Philosophy
//! - **Never delete** - duplicates are moved, and nothing in quarantine is
//!   ever overwritten
//! - **Content, not names** - photos and videos match by what they look
//!   like, everything else by exact bytes
//! - **Keep going** - a bad file is reported and left alone; only setup
//!   failures stop a run
//!
//! ## Architecture
//! - `core` - The deduplication engine
//! - `events` - Event-driven progress reporting
//! - `error` - Error types

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{DedupError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point. `default_level`
/// applies when `RUST_LOG` is not set.
pub fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
