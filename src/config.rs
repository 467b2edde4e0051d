//! Configuration types for the ingestion pipeline.
//!
//! Every resource ceiling the pipeline enforces lives in [`IngestLimits`];
//! nothing is hard-coded at the enforcement sites. [`Deadline`] is the
//! cooperative wall-clock check the orchestrator and archive walker share.
//!
//! # Example
//!
//! ```rust
//! use chatvault::config::IngestLimits;
//!
//! let limits = IngestLimits::new()
//!     .with_max_attachment_bytes(10 * 1024 * 1024)
//!     .with_max_entries(20_000);
//! ```

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::ChatvaultError;

/// Resource ceilings for one upload.
///
/// Exceeding any ceiling is fatal for that upload, with one exception: an
/// archive member that exceeds `max_attachment_bytes` fails only that member.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IngestLimits {
    /// Maximum decompressed size of a single file, in bytes (default: 25MB).
    pub max_attachment_bytes: u64,

    /// Maximum number of parsed entries per upload (default: 100,000).
    pub max_entries: usize,

    /// Maximum number of archive members walked (default: 2,000).
    pub max_archive_members: usize,

    /// Wall-clock ceiling for the whole upload, in milliseconds
    /// (default: 60,000).
    pub max_elapsed_ms: u64,
}

impl Default for IngestLimits {
    fn default() -> Self {
        Self {
            max_attachment_bytes: 25 * 1024 * 1024, // 25MB
            max_entries: 100_000,
            max_archive_members: 2_000,
            max_elapsed_ms: 60_000,
        }
    }
}

impl IngestLimits {
    /// Creates limits with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-file size ceiling in bytes.
    #[must_use]
    pub fn with_max_attachment_bytes(mut self, bytes: u64) -> Self {
        self.max_attachment_bytes = bytes;
        self
    }

    /// Sets the per-upload entry-count ceiling.
    #[must_use]
    pub fn with_max_entries(mut self, count: usize) -> Self {
        self.max_entries = count;
        self
    }

    /// Sets the archive member-count ceiling.
    #[must_use]
    pub fn with_max_archive_members(mut self, count: usize) -> Self {
        self.max_archive_members = count;
        self
    }

    /// Sets the wall-clock ceiling in milliseconds.
    #[must_use]
    pub fn with_max_elapsed_ms(mut self, millis: u64) -> Self {
        self.max_elapsed_ms = millis;
        self
    }

    /// Starts a deadline clock for one upload under these limits.
    pub fn start_deadline(&self) -> Deadline {
        Deadline::starting_now(Duration::from_millis(self.max_elapsed_ms))
    }
}

/// Cooperative wall-clock ceiling.
///
/// The pipeline calls [`check`](Deadline::check) at natural pause points
/// (between archive members, between entry batches); nothing interrupts an
/// in-flight read.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    limit: Duration,
}

impl Deadline {
    /// Creates a deadline beginning now.
    pub fn starting_now(limit: Duration) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    /// Milliseconds elapsed since the deadline started.
    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Returns `Err(Timeout)` once the ceiling has passed.
    pub fn check(&self) -> Result<(), ChatvaultError> {
        let elapsed = self.started.elapsed();
        if elapsed > self.limit {
            return Err(ChatvaultError::Timeout {
                elapsed_ms: elapsed.as_millis() as u64,
                limit_ms: self.limit.as_millis() as u64,
            });
        }
        Ok(())
    }
}
