//! The symbol table and its leading-byte index.
//!
//! Symbols are kept sorted (see [`Symbol`]'s `Ord`), so all symbols sharing a first byte occupy a
//! contiguous run of codes, and within a run any symbol precedes its own prefixes. `first_index`
//! records where each run starts: the codes for leading byte `b` are
//! `first_index[b]..first_index[b + 1]`.

use std::io::{Read, Write};
use std::ops::Range;

use crate::{Decoder, Encoder, Error, Result, Symbol, ESCAPE_CODE, MAX_SYMBOLS, MAX_SYMBOL_LEN};

/// The core structure of the codec, holding a mapping between `Symbol`s and codes.
///
/// Tables are built by [training][`SymbolTable::train`] on a corpus, from an explicit list of
/// symbols with [`SymbolTable::from_symbols`], or by deserializing with
/// [`SymbolTable::from_bytes`]. Once built a table is never mutated, so it can be shared freely
/// between threads that encode and decode with it.
///
/// Example usage:
///
/// ```
/// use fsst_sorted::{Symbol, SymbolTable, ESCAPE_CODE};
///
/// let table = SymbolTable::from_symbols([
///     Symbol::from_slice(b"a"),
///     Symbol::from_slice(b"ab"),
/// ])
/// .unwrap();
///
/// // "ab" sorts before its prefix "a".
/// assert_eq!(table.find_longest_symbol(b"abc"), 0);
/// assert_eq!(table.find_longest_symbol(b"ac"), 1);
/// assert_eq!(table.find_longest_symbol(b"c"), ESCAPE_CODE);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SymbolTable {
    /// Symbols in code order, which is also sorted order.
    symbols: Vec<Symbol>,

    /// Start code of the run of symbols beginning with each byte value, plus an end sentinel.
    first_index: [u8; 257],

    /// Length of the longest symbol, 0 for an empty table.
    max_symbol_len: usize,
}

impl SymbolTable {
    /// Build a table from a set of symbols.
    ///
    /// Codes are assigned in sorted order, so they generally differ from the iteration order
    /// of `symbols`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTable`] if more than 255 symbols are supplied or if a symbol
    /// appears twice.
    pub fn from_symbols(symbols: impl IntoIterator<Item = Symbol>) -> Result<Self> {
        let mut symbols: Vec<Symbol> = symbols.into_iter().collect();
        if symbols.len() > MAX_SYMBOLS {
            return Err(Error::invalid_table(format!(
                "{} symbols exceed the limit of {MAX_SYMBOLS}",
                symbols.len()
            )));
        }

        symbols.sort_unstable();
        if let Some(pair) = symbols.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(Error::invalid_table(format!(
                "duplicate symbol \"{}\"",
                pair[0].as_bytes().escape_ascii()
            )));
        }

        Ok(Self::with_index(symbols))
    }

    /// Sort `symbols` and build the leading-byte index over them.
    ///
    /// # Panics
    ///
    /// If there are more than 255 symbols. Callers inside the crate bound the count up front.
    pub(crate) fn from_candidates(mut symbols: Vec<Symbol>) -> Self {
        assert!(
            symbols.len() <= MAX_SYMBOLS,
            "symbol table cannot hold more than 255 symbols"
        );
        symbols.sort_unstable();
        debug_assert!(
            symbols.windows(2).all(|pair| pair[0] != pair[1]),
            "candidates must be unique"
        );

        Self::with_index(symbols)
    }

    /// Build `first_index` over symbols that are already sorted.
    fn with_index(symbols: Vec<Symbol>) -> Self {
        debug_assert!(symbols.windows(2).all(|pair| pair[0] < pair[1]));

        // Count the run length of every leading byte, then turn the counts into run starts.
        let mut first_index = [0u8; 257];
        for symbol in &symbols {
            first_index[symbol.first_byte() as usize + 1] += 1;
        }
        for byte in 1..first_index.len() {
            first_index[byte] += first_index[byte - 1];
        }

        let max_symbol_len = symbols.iter().map(|s| s.len()).max().unwrap_or(0);

        Self {
            symbols,
            first_index,
            max_symbol_len,
        }
    }

    /// Number of symbols in the table, not counting the escape code.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// True if the table holds no symbols, in which case every byte is escaped.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Length in bytes of the longest symbol, or 0 for an empty table.
    pub fn max_symbol_len(&self) -> usize {
        self.max_symbol_len
    }

    /// Returns a readonly slice of the symbols, indexed by code.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Look up the symbol for a code. Returns `None` for the escape code and for codes past the
    /// end of the table.
    #[inline]
    pub fn symbol(&self, code: u8) -> Option<Symbol> {
        self.symbols.get(code as usize).copied()
    }

    /// The range of codes whose symbols start with `byte`. Empty if there are none.
    #[inline]
    pub fn code_range(&self, byte: u8) -> Range<usize> {
        let byte = byte as usize;
        self.first_index[byte] as usize..self.first_index[byte + 1] as usize
    }

    /// Find the code of the longest symbol that is a prefix of `text`.
    ///
    /// Only the run of codes sharing `text[0]` is scanned. Because a symbol sorts before its own
    /// prefixes, the first match in the run is the longest. Returns [`ESCAPE_CODE`] if nothing
    /// matches. Symbols longer than the remaining text never match, so no read goes past the end
    /// of `text`. Empty text also yields [`ESCAPE_CODE`].
    #[inline]
    pub fn find_longest_symbol(&self, text: &[u8]) -> u8 {
        let Some(&first) = text.first() else {
            return ESCAPE_CODE;
        };

        let range = self.code_range(first);
        let start = range.start;
        self.symbols[range]
            .iter()
            .position(|symbol| symbol.is_prefix_of(text))
            .map_or(ESCAPE_CODE, |offset| (start + offset) as u8)
    }

    /// Access an encoder for this table.
    pub fn encoder(&self) -> Encoder<'_> {
        Encoder::new(self)
    }

    /// Access the decoder that can be used to decode strings encoded with this table.
    pub fn decoder(&self) -> Decoder<'_> {
        Decoder::new(self)
    }

    /// Number of bytes `text` encodes to, without materializing the output.
    pub fn compressed_len(&self, text: &[u8]) -> usize {
        let mut pos = 0;
        let mut out_len = 0;
        while pos < text.len() {
            let code = self.find_longest_symbol(&text[pos..]);
            match self.symbol(code) {
                Some(symbol) => {
                    pos += symbol.len();
                    out_len += 1;
                }
                None => {
                    pos += 1;
                    out_len += 2;
                }
            }
        }
        out_len
    }

    /// Number of bytes [`SymbolTable::to_bytes`] produces.
    pub fn serialized_len(&self) -> usize {
        1 + self.symbols.iter().map(|s| 1 + s.len()).sum::<usize>()
    }

    /// Serialize the table: the symbol count, then one `(len, bytes)` record per symbol in
    /// code order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.serialized_len());
        buf.push(self.symbols.len() as u8);
        for symbol in &self.symbols {
            buf.push(symbol.len() as u8);
            buf.extend_from_slice(symbol.as_bytes());
        }
        buf
    }

    /// Write the serialized table to `writer`.
    ///
    /// # Errors
    ///
    /// Propagates any I/O error from the writer.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// Deserialize a table from the front of `buf`.
    ///
    /// # Returns
    ///
    /// The table and the number of bytes of `buf` it occupied, so that a payload following the
    /// table can be located.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTable`] if the buffer is truncated, holds a symbol length outside
    /// `1..=8`, or lists symbols out of sorted order. Tables must arrive in exactly the order they
    /// were written so that codes keep their meaning.
    pub fn from_bytes(buf: &[u8]) -> Result<(Self, usize)> {
        let (&count, mut rest) = buf
            .split_first()
            .ok_or_else(|| Error::invalid_table("missing symbol count"))?;
        let count = count as usize;
        if count > MAX_SYMBOLS {
            return Err(Error::invalid_table(format!(
                "{count} symbols exceed the limit of {MAX_SYMBOLS}"
            )));
        }

        let mut symbols = Vec::with_capacity(count);
        for code in 0..count {
            let (&len, tail) = rest.split_first().ok_or_else(|| {
                Error::invalid_table(format!("missing length of symbol {code}"))
            })?;
            let len = len as usize;
            if !(1..=MAX_SYMBOL_LEN).contains(&len) {
                return Err(Error::invalid_table(format!(
                    "symbol {code} has invalid length {len}"
                )));
            }
            if tail.len() < len {
                return Err(Error::invalid_table(format!(
                    "symbol {code} is truncated"
                )));
            }

            let (bytes, tail) = tail.split_at(len);
            symbols.push(Symbol::from_slice(bytes));
            rest = tail;
        }

        if let Some(code) = symbols.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(Error::invalid_table(format!(
                "symbol {} is out of order",
                code + 1
            )));
        }

        let consumed = buf.len() - rest.len();
        Ok((Self::with_index(symbols), consumed))
    }

    /// Read a serialized table from `reader`, consuming exactly the bytes of the table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the reader fails or ends early, and [`Error::InvalidTable`] for
    /// the conditions listed on [`SymbolTable::from_bytes`].
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut count = [0u8; 1];
        reader.read_exact(&mut count)?;

        let mut buf = Vec::with_capacity(1 + count[0] as usize * (1 + MAX_SYMBOL_LEN));
        buf.push(count[0]);
        for _ in 0..count[0] {
            let mut len = [0u8; 1];
            reader.read_exact(&mut len)?;
            buf.push(len[0]);

            let len = len[0] as usize;
            if !(1..=MAX_SYMBOL_LEN).contains(&len) {
                // Let from_bytes report the bad record.
                break;
            }
            let start = buf.len();
            buf.resize(start + len, 0);
            reader.read_exact(&mut buf[start..])?;
        }

        Self::from_bytes(&buf).map(|(table, _)| table)
    }
}

impl Default for SymbolTable {
    /// An empty table, under which every byte is escaped.
    fn default() -> Self {
        Self::with_index(Vec::new())
    }
}

impl std::fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolTable")
            .field("n_symbols", &self.symbols.len())
            .field("symbols", &self.symbols)
            .finish()
    }
}
