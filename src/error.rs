//! Unified error types for chatvault.
//!
//! This module provides a single [`ChatvaultError`] enum that covers all error
//! cases in the library, plus an [`ErrorClass`] that groups them into the
//! categories callers care about: invalid input, resource limit, storage
//! trouble, or plain I/O.
//!
//! # Error Handling Philosophy
//!
//! - **Malformed entries are not errors.** A block that does not fit the chat
//!   grammar degrades into a best-effort entry and a warning; the pipeline
//!   keeps going.
//! - **Resource ceilings are fatal for the upload.** Oversized files, too many
//!   entries or archive members, and wall-clock timeouts abort the current
//!   upload with a clear, user-facing reason.
//! - **Storage failures are local.** A failed attachment upsert skips that one
//!   attachment; it never takes the upload down.

use std::io;

use thiserror::Error;

/// A specialized [`Result`] type for chatvault operations.
pub type Result<T> = std::result::Result<T, ChatvaultError>;

/// Coarse classification of an error, stable across variants.
///
/// Callers use this to distinguish "your input was invalid" from "the system
/// hit a resource limit" without matching on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The uploaded bytes were not what they claimed to be.
    InvalidInput,
    /// A configured ceiling (size, count, time) was exceeded.
    ResourceLimit,
    /// A storage collaborator refused or failed.
    Storage,
    /// Plain I/O failure reading the source stream.
    Io,
}

/// The error type for all chatvault operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatvaultError {
    /// An I/O error occurred reading the upload stream.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The archive stream is not a well-formed ZIP.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Transcript bytes were not valid UTF-8.
    #[error("UTF-8 encoding error in {context}: {source}")]
    Utf8 {
        /// Description of where the error occurred
        context: String,
        /// The underlying UTF-8 error
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// A single file exceeded the configured per-file ceiling.
    ///
    /// Fatal only when the oversized file is the upload itself; an oversized
    /// archive member becomes a per-file warning instead.
    #[error("File '{name}' exceeds the {limit}-byte limit")]
    OversizedFile {
        /// Name of the offending file
        name: String,
        /// The configured ceiling in bytes
        limit: u64,
    },

    /// The upload produced more entries than allowed.
    #[error("Upload exceeds the maximum of {limit} entries")]
    TooManyEntries {
        /// The configured ceiling
        limit: usize,
    },

    /// The archive contains more members than allowed.
    #[error("Archive exceeds the maximum of {limit} members")]
    TooManyMembers {
        /// The configured ceiling
        limit: usize,
    },

    /// Processing ran past the wall-clock ceiling.
    #[error("Processing timed out after {elapsed_ms}ms (limit: {limit_ms}ms)")]
    Timeout {
        /// Milliseconds elapsed when the check fired
        elapsed_ms: u64,
        /// The configured ceiling in milliseconds
        limit_ms: u64,
    },

    /// A storage collaborator call failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ChatvaultError {
    /// Creates a UTF-8 error with context about where decoding failed.
    pub fn utf8(context: impl Into<String>, source: std::string::FromUtf8Error) -> Self {
        ChatvaultError::Utf8 {
            context: context.into(),
            source,
        }
    }

    /// Creates an oversized-file error.
    pub fn oversized_file(name: impl Into<String>, limit: u64) -> Self {
        ChatvaultError::OversizedFile {
            name: name.into(),
            limit,
        }
    }

    /// Creates a storage-collaborator error.
    pub fn storage(message: impl Into<String>) -> Self {
        ChatvaultError::Storage(message.into())
    }

    /// Returns the coarse classification of this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            ChatvaultError::Io(_) => ErrorClass::Io,
            ChatvaultError::Zip(_) | ChatvaultError::Utf8 { .. } => ErrorClass::InvalidInput,
            ChatvaultError::OversizedFile { .. }
            | ChatvaultError::TooManyEntries { .. }
            | ChatvaultError::TooManyMembers { .. }
            | ChatvaultError::Timeout { .. } => ErrorClass::ResourceLimit,
            ChatvaultError::Storage(_) => ErrorClass::Storage,
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatvaultError::Io(_))
    }

    /// Returns `true` if this error was caused by a resource ceiling.
    pub fn is_resource_limit(&self) -> bool {
        self.class() == ErrorClass::ResourceLimit
    }

    /// Returns `true` if the uploaded bytes themselves were invalid.
    pub fn is_invalid_input(&self) -> bool {
        self.class() == ErrorClass::InvalidInput
    }

    /// A short, user-facing description safe to surface to callers.
    ///
    /// Never contains internal paths or source chains.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

impl From<std::string::FromUtf8Error> for ChatvaultError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        ChatvaultError::Utf8 {
            context: "transcript decoding".to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = ChatvaultError::from(io_err);
        let display = err.to_string();
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_oversized_file_display() {
        let err = ChatvaultError::oversized_file("video.mp4", 1024);
        let display = err.to_string();
        assert!(display.contains("video.mp4"));
        assert!(display.contains("1024"));
    }

    #[test]
    fn test_too_many_entries_display() {
        let err = ChatvaultError::TooManyEntries { limit: 50_000 };
        assert!(err.to_string().contains("50000"));
    }

    #[test]
    fn test_timeout_display() {
        let err = ChatvaultError::Timeout {
            elapsed_ms: 61_000,
            limit_ms: 60_000,
        };
        let display = err.to_string();
        assert!(display.contains("61000"));
        assert!(display.contains("60000"));
    }

    #[test]
    fn test_utf8_error_display() {
        let invalid_bytes = vec![0xff, 0xfe];
        let utf8_err = String::from_utf8(invalid_bytes).unwrap_err();
        let err = ChatvaultError::utf8("reading transcript", utf8_err);
        let display = err.to_string();
        assert!(display.contains("UTF-8"));
        assert!(display.contains("reading transcript"));
    }

    #[test]
    fn test_storage_display() {
        let err = ChatvaultError::storage("connection refused");
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = ChatvaultError::from(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_class_io() {
        let err = ChatvaultError::Io(io::Error::new(io::ErrorKind::NotFound, ""));
        assert_eq!(err.class(), ErrorClass::Io);
        assert!(err.is_io());
        assert!(!err.is_resource_limit());
        assert!(!err.is_invalid_input());
    }

    #[test]
    fn test_class_resource_limits() {
        let errs = [
            ChatvaultError::oversized_file("a.bin", 10),
            ChatvaultError::TooManyEntries { limit: 1 },
            ChatvaultError::TooManyMembers { limit: 1 },
            ChatvaultError::Timeout {
                elapsed_ms: 2,
                limit_ms: 1,
            },
        ];
        for err in errs {
            assert_eq!(err.class(), ErrorClass::ResourceLimit);
            assert!(err.is_resource_limit());
        }
    }

    #[test]
    fn test_class_invalid_input() {
        let utf8_err = String::from_utf8(vec![0xff]).unwrap_err();
        let err: ChatvaultError = utf8_err.into();
        assert_eq!(err.class(), ErrorClass::InvalidInput);
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_class_storage() {
        let err = ChatvaultError::storage("down");
        assert_eq!(err.class(), ErrorClass::Storage);
    }

    #[test]
    fn test_error_debug() {
        let err = ChatvaultError::TooManyEntries { limit: 3 };
        let debug = format!("{:?}", err);
        assert!(debug.contains("TooManyEntries"));
    }
}
