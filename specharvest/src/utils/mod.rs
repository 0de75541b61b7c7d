//! Utility functions for run identifiers, timestamps and fingerprints.

pub mod fingerprint;
pub mod timestamps;

pub use fingerprint::page_fingerprint;
pub use timestamps::{
    format_iso8601, now_utc, parse_published, parse_timestamp, Timestamp, TimestampError,
};

use uuid::Uuid;

/// Generates a new time-ordered run identifier (UUID v7).
#[must_use]
pub fn generate_run_id() -> Uuid {
    Uuid::now_v7()
}
