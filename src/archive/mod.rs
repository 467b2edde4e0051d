//! Archive walking and content hashing.
//!
//! An uploaded archive is walked in a single pass, member by member, without
//! extraction to disk: the transcript member is buffered for parsing and
//! every other member is streamed through the content hasher so attachments
//! can be stored content-addressed.

mod hash;
mod walker;

pub use hash::{HASH_CHUNK_SIZE, HashStreamError, hash_stream};
pub use walker::{ArchiveScan, TRANSCRIPT_EXTENSIONS, walk_archive};
