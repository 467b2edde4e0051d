//! # Chatvault
//!
//! A Rust library for ingesting exported chat archives — plain text
//! transcripts or ZIP archives holding a transcript plus media — into
//! structured, deduplicated records.
//!
//! ## Overview
//!
//! Chatvault reconstructs multi-line chat entries from the loosely
//! structured, timestamp-delimited export format, classifies each entry,
//! walks ZIP archives in a single pass to hash attached media for
//! content-addressed storage, and reconciles re-uploads of the same chat
//! against stored history with a minimal insert/delete set.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::io::Cursor;
//! use chatvault::ingest::{Ingestor, SourceKind};
//! use chatvault::store::{MemoryAttachmentStore, MemoryEntryRepository};
//!
//! let mut repo = MemoryEntryRepository::new();
//! let mut attachments = MemoryAttachmentStore::new();
//! let mut ingestor = Ingestor::new(&mut repo, &mut attachments);
//!
//! let summary = ingestor.ingest(
//!     "user-1",
//!     "holiday chat.txt",
//!     SourceKind::Text,
//!     Cursor::new("9/4/23, 7:34 - Alice: made it home safe"),
//! );
//!
//! assert!(summary.success);
//! assert_eq!(summary.entry_count, 1);
//! ```
//!
//! ## Streaming
//!
//! Transcripts stream block-by-block — memory stays bounded to one entry at
//! a time no matter the file size:
//!
//! ```rust
//! use std::io::Cursor;
//! use chatvault::streaming::BlockSplitter;
//! use chatvault::parsing::parse_block;
//!
//! let transcript = "9/4/23, 7:34 - Alice: hi\n9/4/23, 7:35 - Bob: hey";
//! for block in BlockSplitter::new(Cursor::new(transcript)) {
//!     let parsed = parse_block(&block.unwrap());
//!     println!("{}: {:?}", parsed.entry.author, parsed.entry.payload);
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`ingest`] — **top-level driver** ([`Ingestor`], [`UploadSummary`])
//! - [`streaming`] — pull-based transcript block splitter
//! - [`parsing`] — block parsing, timestamp resolution, classification
//! - [`archive`] — single-pass ZIP walking and content hashing
//! - [`reconcile`] — multiset diff between stored and fresh entries
//! - [`store`] — storage collaborator traits + in-memory implementations
//! - [`config`] — resource ceilings ([`IngestLimits`](config::IngestLimits))
//! - [`error`] — unified error type ([`ChatvaultError`], [`Result`])
//! - [`prelude`] — convenient re-exports

pub mod archive;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod entry;
pub mod error;
pub mod ingest;
pub mod parsing;
pub mod reconcile;
pub mod store;
pub mod streaming;

// Re-export the main types at the crate root for convenience
pub use entry::{ChatEntry, EntryKind};
pub use error::{ChatvaultError, ErrorClass, Result};
pub use ingest::{Ingestor, SourceKind, UploadSummary};

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use chatvault::prelude::*;
/// ```
pub mod prelude {
    // Core entry types
    pub use crate::entry::{ChatEntry, EntryKind};

    // Error types
    pub use crate::error::{ChatvaultError, ErrorClass, Result};

    // Driver
    pub use crate::ingest::{Ingestor, SourceKind, UploadSummary};

    // Limits
    pub use crate::config::IngestLimits;

    // Pipeline pieces
    pub use crate::archive::{hash_stream, walk_archive};
    pub use crate::parsing::{classify, parse_block, resolve_timestamp};
    pub use crate::reconcile::{EntryKey, ReconcilePlan, reconcile};
    pub use crate::streaming::BlockSplitter;

    // Storage collaborators
    pub use crate::store::{
        AttachmentLocation, AttachmentObject, AttachmentStore, EntryRepository,
        MemoryAttachmentStore, MemoryEntryRepository, StoredEntry,
    };
}
