//! Streaming block splitter for transcript streams.
//!
//! Transcripts can be large, so the splitter never buffers more than one
//! logical entry: it consumes a line-producing stream and lazily yields one
//! raw block per chat entry, multi-line bodies included.
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use chatvault::streaming::BlockSplitter;
//!
//! let transcript = "9/4/23, 7:34 - Alice: first\nstill first\n9/4/23, 7:35 - Bob: second";
//! let blocks: Vec<String> = BlockSplitter::new(Cursor::new(transcript))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! assert_eq!(blocks.len(), 2);
//! assert_eq!(blocks[0], "9/4/23, 7:34 - Alice: first\nstill first");
//! ```

mod splitter;

pub use splitter::BlockSplitter;
