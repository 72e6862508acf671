//! Static symbol table compression for short byte strings.
//!
//! A [`SymbolTable`] maps up to 255 one-byte codes to symbols of 1 to 8 bytes. Code 255 is
//! reserved as the escape code: it is followed by one literal byte that no symbol matched.
//! Every code decodes on its own, so compressed strings support random access.
//!
//! Tables are trained from a sample corpus with [`build_table`] (or [`SymbolTable::train`]),
//! after which they are immutable and can be shared between threads.
//!
//! ```
//! let table = fsst_sorted::build_table("tumcwitumvldb");
//! let codes = fsst_sorted::encode(&table, b"tumcwitumvldb");
//! assert!(codes.len() < 13);
//! assert_eq!(fsst_sorted::decode(&table, &codes).unwrap(), b"tumcwitumvldb");
//! ```

/// Throw a compiler error if a type isn't guaranteed to have a specific size in bytes.
macro_rules! assert_sizeof {
    ($typ:ty => $size_in_bytes:expr) => {
        const _: [u8; $size_in_bytes] = [0; std::mem::size_of::<$typ>()];
    };
}

use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};

mod builder;
mod codec;
mod counter;
mod error;
mod heap;
mod table;

pub use builder::TrainOptions;
pub use codec::{Decoder, Encoder};
pub use error::{Error, Result};
pub use heap::{Candidate, CandidateHeap};
pub use table::SymbolTable;

/// Code used to indicate bytes that are not in the symbol table.
///
/// When compressing a string that cannot fully be expressed with the symbol table, the compressed
/// output will contain an `ESCAPE_CODE` byte followed by a raw byte. At decompression time, the
/// presence of `ESCAPE_CODE` indicates that the next byte should be appended directly to the result
/// instead of being looked up in the symbol table.
pub const ESCAPE_CODE: u8 = 255;

/// Maximum number of symbols in a table. Codes range over `0..MAX_SYMBOLS`.
pub const MAX_SYMBOLS: usize = 255;

/// Maximum length of a single symbol in bytes.
pub const MAX_SYMBOL_LEN: usize = 8;

/// `Symbol`s are small (up to 8-byte) segments of strings, stored in a [`SymbolTable`] and
/// identified by an 8-bit code.
///
/// Symbols are ordered lexicographically, except that when one symbol is a prefix of another
/// the longer one sorts first. A table kept in this order can stop its longest-match scan at
/// the first hit.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    bytes: [u8; MAX_SYMBOL_LEN],
    len: u8,
}

assert_sizeof!(Symbol => 9);

impl Symbol {
    /// Constructor for a `Symbol` from a slice of 1 to 8 bytes.
    ///
    /// # Panics
    ///
    /// If the slice is empty or longer than [`MAX_SYMBOL_LEN`]. Use `Symbol::try_from` for
    /// untrusted input.
    pub fn from_slice(slice: &[u8]) -> Self {
        assert!(
            (1..=MAX_SYMBOL_LEN).contains(&slice.len()),
            "symbol length must be in [1, 8]"
        );

        let mut bytes = [0u8; MAX_SYMBOL_LEN];
        bytes[..slice.len()].copy_from_slice(slice);
        Self {
            bytes,
            len: slice.len() as u8,
        }
    }

    /// Create a new single-byte symbol
    pub fn from_u8(value: u8) -> Self {
        let mut bytes = [0u8; MAX_SYMBOL_LEN];
        bytes[0] = value;
        Self { bytes, len: 1 }
    }

    /// Length of the symbol in bytes. Always a value between 1 and 8.
    #[allow(clippy::len_without_is_empty)]
    #[inline]
    pub fn len(self) -> usize {
        self.len as usize
    }

    /// The bytes of the symbol.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// All 8 bytes of storage, zero padded past `len()`.
    #[inline]
    pub(crate) fn padded(&self) -> &[u8; MAX_SYMBOL_LEN] {
        &self.bytes
    }

    /// Get the first byte of the symbol.
    #[inline]
    pub fn first_byte(self) -> u8 {
        self.bytes[0]
    }

    /// Return a new `Symbol` by logically concatenating ourselves with another `Symbol`.
    ///
    /// The result is clamped to [`MAX_SYMBOL_LEN`] bytes: only as many leading bytes of `other`
    /// as fit in the remaining space are taken.
    pub fn concat(self, other: Self) -> Self {
        let self_len = self.len();
        let copy_len = other.len().min(MAX_SYMBOL_LEN - self_len);

        let mut bytes = self.bytes;
        bytes[self_len..self_len + copy_len].copy_from_slice(&other.bytes[..copy_len]);
        Self {
            bytes,
            len: (self_len + copy_len) as u8,
        }
    }

    /// True if `text` starts with this symbol.
    #[inline]
    pub fn is_prefix_of(&self, text: &[u8]) -> bool {
        text.starts_with(self.as_bytes())
    }
}

impl TryFrom<&[u8]> for Symbol {
    type Error = Error;

    fn try_from(slice: &[u8]) -> Result<Self> {
        if (1..=MAX_SYMBOL_LEN).contains(&slice.len()) {
            Ok(Self::from_slice(slice))
        } else {
            Err(Error::InvalidSymbolLength(slice.len()))
        }
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        let (left, right) = (self.as_bytes(), other.as_bytes());
        let common = left.len().min(right.len());

        // On a shared prefix, the longer symbol comes first.
        left[..common]
            .cmp(&right[..common])
            .then_with(|| right.len().cmp(&left.len()))
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Debug for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let debug = self
            .as_bytes()
            .iter()
            .map(|&b| {
                if b.is_ascii_graphic() || b == b' ' {
                    (b as char).to_string()
                } else {
                    format!("\\x{b:02X}")
                }
            })
            .collect::<String>();
        write!(f, "Symbol({debug:?})")
    }
}

/// Train a symbol table on a sample corpus using the default [`TrainOptions`].
///
/// An empty corpus yields an empty table, under which every byte is escaped.
pub fn build_table(corpus: impl AsRef<[u8]>) -> SymbolTable {
    SymbolTable::train(corpus)
}

/// Compress `input` with `table`. The output is at most twice as long as the input.
pub fn encode(table: &SymbolTable, input: &[u8]) -> Vec<u8> {
    table.encoder().encode(input)
}

/// Decompress a code stream previously produced by [`encode`] with the same table.
///
/// # Errors
///
/// Returns [`Error::CorruptStream`] if the stream contains a code the table doesn't define, or
/// ends with a dangling escape code.
pub fn decode(table: &SymbolTable, codes: &[u8]) -> Result<Vec<u8>> {
    table.decoder().decode(codes)
}
