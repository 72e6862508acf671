//! Error types for encoding, decoding and table exchange.

use thiserror::Error;

/// Result type alias for fallible symbol table operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors surfaced by the codec and by table (de)serialization.
///
/// Training never fails: an empty corpus simply yields an empty table.
#[derive(Debug, Error)]
pub enum Error {
    /// The code stream cannot have been produced by `encode` with this table.
    #[error("corrupt stream at offset {offset}: {detail}")]
    CorruptStream {
        /// Offset of the offending byte in the code stream.
        offset: usize,
        /// Description of what was found at `offset`.
        detail: String,
    },

    /// The output buffer cannot hold the next token.
    #[error("buffer too small: need at least {required} bytes, got {provided}")]
    BufferTooSmall {
        /// Minimum size the buffer needs to make progress.
        required: usize,
        /// Size of the buffer that was supplied.
        provided: usize,
    },

    /// A symbol must hold between 1 and 8 bytes.
    #[error("invalid symbol length {0}: must be in range [1, 8]")]
    InvalidSymbolLength(usize),

    /// A serialized or hand-built table violates the table invariants.
    #[error("invalid symbol table: {0}")]
    InvalidTable(String),

    /// I/O error while reading or writing a serialized table.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an error for a code byte that has no entry in the table.
    pub fn unknown_code(offset: usize, code: u8, n_symbols: usize) -> Self {
        Error::CorruptStream {
            offset,
            detail: format!("code {code} is not in a table of {n_symbols} symbols"),
        }
    }

    /// Create an error for an escape code in the last position of the stream.
    pub fn truncated_escape(offset: usize) -> Self {
        Error::CorruptStream {
            offset,
            detail: "escape code is not followed by a literal byte".to_string(),
        }
    }

    /// Create a buffer too small error.
    pub fn buffer_too_small(required: usize, provided: usize) -> Self {
        Error::BufferTooSmall { required, provided }
    }

    /// Create an invalid table error.
    pub fn invalid_table(message: impl Into<String>) -> Self {
        Error::InvalidTable(message.into())
    }
}
