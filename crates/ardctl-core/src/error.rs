//! Error types for ardctl.
//!
//! All fallible operations across the library return [`Result<T>`], which
//! uses [`Error`] as the error type. Transport failures are tagged with the
//! stage they happened in (open, reset, write, read, close) so callers can
//! tell a dead link from a board that answered with the wrong echo.

use std::fmt;

/// The error type for all ardctl operations.
///
/// Nothing in the library retries on its own: every variant is surfaced to
/// the caller of the operation that triggered it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested board model is not present in the model registry.
    #[error("unsupported model '{0}'")]
    UnsupportedModel(String),

    /// A pin, value, or mode was rejected before any I/O took place.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The transport could not be opened.
    #[error("failed to open transport: {0}")]
    TransportOpen(String),

    /// The transport could not be reset after opening.
    #[error("failed to reset transport: {0}")]
    TransportReset(String),

    /// A command frame could not be written in full.
    #[error("failed to write to transport: {0}")]
    TransportWrite(String),

    /// Reading the reply (or polling for it) failed.
    #[error("failed to read from transport: {0}")]
    TransportRead(String),

    /// The reply did not arrive as exactly one full frame.
    ///
    /// Carries the number of bytes that were available when polling gave up.
    #[error("short read: {0} bytes available")]
    ShortRead(usize),

    /// The reply frame could not be parsed as `<pin> <value>`.
    #[error("malformed reply: {0}")]
    MalformedReply(String),

    /// The board echoed a different pin than the one requested.
    #[error("pin mismatch: expected {expected}, got {got}")]
    PinMismatch { expected: u8, got: u8 },

    /// The board echoed a different value than the one requested.
    #[error("value mismatch: expected {expected}, got {got}")]
    ValueMismatch { expected: i32, got: i32 },

    /// The transport could not be closed cleanly.
    #[error("failed to close transport: {0}")]
    TransportClose(String),

    /// A command payload does not fit in a single frame.
    #[error("command too long: {len} bytes exceeds frame size of {max}")]
    CommandTooLong { len: usize, max: usize },

    /// The transport has already been closed.
    #[error("not connected")]
    NotConnected,

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The point in a transport's lifecycle where a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportStage {
    Open,
    Reset,
    Write,
    Read,
    Close,
}

impl fmt::Display for TransportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportStage::Open => "open",
            TransportStage::Reset => "reset",
            TransportStage::Write => "write",
            TransportStage::Read => "read",
            TransportStage::Close => "close",
        };
        f.write_str(s)
    }
}

impl Error {
    /// Tag a raw transport failure with the stage it happened in.
    ///
    /// Errors that already name a transport stage, and [`Error::ShortRead`],
    /// are returned unchanged. Anything else (I/O errors, `NotConnected`) is
    /// wrapped in the variant for `stage`.
    pub fn at(self, stage: TransportStage) -> Self {
        match self {
            e @ (Error::TransportOpen(_)
            | Error::TransportReset(_)
            | Error::TransportWrite(_)
            | Error::TransportRead(_)
            | Error::TransportClose(_)
            | Error::ShortRead(_)) => e,
            other => {
                let msg = other.to_string();
                match stage {
                    TransportStage::Open => Error::TransportOpen(msg),
                    TransportStage::Reset => Error::TransportReset(msg),
                    TransportStage::Write => Error::TransportWrite(msg),
                    TransportStage::Read => Error::TransportRead(msg),
                    TransportStage::Close => Error::TransportClose(msg),
                }
            }
        }
    }
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;
