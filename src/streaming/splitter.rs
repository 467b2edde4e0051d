//! Pull-based splitter turning a line stream into raw entry blocks.
//!
//! The splitter holds a single accumulator: each line either opens a new
//! entry (flushing the accumulated block) or is appended verbatim, which is
//! how multi-line message bodies survive, embedded blank lines included.
//! Forward-only; re-parsing means re-invoking on a fresh stream.

use std::io::{self, BufRead};

use crate::parsing::is_entry_start;

/// Iterator over raw entry blocks of a transcript stream.
///
/// Yields `io::Result<String>`; an I/O error is yielded once and the
/// iterator fuses. Each block has its final line terminator stripped;
/// everything else is preserved verbatim.
///
/// A stream with no entry-start line yields exactly one block containing the
/// whole stream; an empty stream yields nothing.
pub struct BlockSplitter<R: BufRead> {
    reader: R,
    accumulator: String,
    line: String,
    bytes_read: u64,
    finished: bool,
}

impl<R: BufRead> BlockSplitter<R> {
    /// Creates a splitter over a line-producing stream.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            accumulator: String::new(),
            line: String::with_capacity(256),
            bytes_read: 0,
            finished: false,
        }
    }

    /// Returns the number of bytes consumed so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Takes the accumulator as a finished block, stripping the final line
    /// terminator.
    fn flush(&mut self) -> String {
        let mut block = std::mem::take(&mut self.accumulator);
        if block.ends_with('\n') {
            block.pop();
            if block.ends_with('\r') {
                block.pop();
            }
        }
        block
    }
}

impl<R: BufRead> Iterator for BlockSplitter<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => {
                    self.finished = true;
                    if self.accumulator.is_empty() {
                        return None;
                    }
                    return Some(Ok(self.flush()));
                }
                Ok(n) => {
                    self.bytes_read += n as u64;
                    if is_entry_start(&self.line) && !self.accumulator.is_empty() {
                        let block = self.flush();
                        self.accumulator.push_str(&self.line);
                        return Some(Ok(block));
                    }
                    self.accumulator.push_str(&self.line);
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn split(input: &str) -> Vec<String> {
        BlockSplitter::new(Cursor::new(input))
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_single_line_entries() {
        let blocks = split("9/4/23, 7:34 - Alice: one\n9/4/23, 7:35 - Bob: two\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], "9/4/23, 7:34 - Alice: one");
        assert_eq!(blocks[1], "9/4/23, 7:35 - Bob: two");
    }

    #[test]
    fn test_multiline_body_kept_in_one_block() {
        let blocks = split(
            "9/4/23, 7:34 - Alice: first line\nsecond line\n\nfourth line\n9/4/23, 7:35 - Bob: next",
        );
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[0],
            "9/4/23, 7:34 - Alice: first line\nsecond line\n\nfourth line"
        );
    }

    #[test]
    fn test_no_entry_start_yields_whole_stream() {
        let blocks = split("just some text\nwith lines\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0], "just some text\nwith lines");
    }

    #[test]
    fn test_empty_stream_yields_nothing() {
        let blocks = split("");
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_no_trailing_newline_on_last_block() {
        let blocks = split("9/4/23, 7:34 - Alice: no trailing newline");
        assert_eq!(blocks, vec!["9/4/23, 7:34 - Alice: no trailing newline"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let blocks = split("9/4/23, 7:34 - Alice: one\r\n9/4/23, 7:35 - Bob: two\r\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], "9/4/23, 7:34 - Alice: one");
        assert_eq!(blocks[1], "9/4/23, 7:35 - Bob: two");
    }

    #[test]
    fn test_preamble_before_first_entry_is_its_own_block() {
        let blocks = split("exported chat\n9/4/23, 7:34 - Alice: hi\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], "exported chat");
        assert_eq!(blocks[1], "9/4/23, 7:34 - Alice: hi");
    }

    #[test]
    fn test_reparse_is_idempotent() {
        let input =
            "9/4/23, 7:34 - Alice: one\nmore\n9/4/23, 7:35 - Bob: two\n9/4/23, 7:36 - Eve: three";
        let first = split(input);
        let second = split(input);
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_bytes_read_tracks_consumption() {
        let input = "9/4/23, 7:34 - Alice: one\n9/4/23, 7:35 - Bob: two\n";
        let mut splitter = BlockSplitter::new(Cursor::new(input));
        let _: Vec<_> = splitter.by_ref().collect();
        assert_eq!(splitter.bytes_read(), input.len() as u64);
    }

    #[test]
    fn test_io_error_is_yielded_then_fuses() {
        struct FailingReader;
        impl io::Read for FailingReader {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "broken stream"))
            }
        }

        let mut splitter = BlockSplitter::new(io::BufReader::new(FailingReader));
        assert!(splitter.next().unwrap().is_err());
        assert!(splitter.next().is_none());
    }
}
