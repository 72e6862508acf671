//! Token and token-pair frequency counts gathered while tokenizing a training sample.
//!
//! Tokens share one id space: a literal byte `b` that matched no symbol is id `b`, and symbol
//! code `c` is id `256 + c`. The last symbol code, 254, maps to 510.

use crate::{Symbol, SymbolTable, ESCAPE_CODE, MAX_SYMBOLS};

/// Number of token ids: 256 literal bytes followed by 255 symbol codes.
pub(crate) const TOKEN_SPACE: usize = 256 + MAX_SYMBOLS;

/// Token id of a literal (escaped) byte.
#[inline]
pub(crate) fn literal_token(byte: u8) -> u16 {
    byte as u16
}

/// Token id of a symbol code.
#[inline]
pub(crate) fn symbol_token(code: u8) -> u16 {
    debug_assert_ne!(code, ESCAPE_CODE, "ESCAPE_CODE is not a symbol");
    256 + code as u16
}

/// The bytes a token stands for under `table`.
#[inline]
pub(crate) fn token_symbol(table: &SymbolTable, token: u16) -> Symbol {
    if token < 256 {
        Symbol::from_u8(token as u8)
    } else {
        table.symbols()[(token - 256) as usize]
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Counter {
    /// Frequency count for each token.
    counts1: Vec<usize>,

    /// Frequency count for each token pair, row-major by the leading token.
    counts2: Vec<usize>,
}

impl Counter {
    pub(crate) fn new() -> Self {
        Self {
            counts1: vec![0; TOKEN_SPACE],
            counts2: vec![0; TOKEN_SPACE * TOKEN_SPACE],
        }
    }

    pub(crate) fn reset(&mut self) {
        self.counts1.fill(0);
        self.counts2.fill(0);
    }

    #[inline]
    fn record_count1(&mut self, token: u16) {
        self.counts1[token as usize] += 1;
    }

    #[inline]
    fn record_count2(&mut self, token1: u16, token2: u16) {
        self.counts2[token1 as usize * TOKEN_SPACE + token2 as usize] += 1;
    }

    #[inline]
    pub(crate) fn count1(&self, token: u16) -> usize {
        self.counts1[token as usize]
    }

    /// All pair counts that start with `token1`, indexed by the following token.
    #[inline]
    pub(crate) fn counts2_from(&self, token1: u16) -> &[usize] {
        let start = token1 as usize * TOKEN_SPACE;
        &self.counts2[start..start + TOKEN_SPACE]
    }

    /// Size of the encoded sample: two bytes per escaped literal, one per symbol code.
    pub(crate) fn encoded_len(&self) -> usize {
        let (literals, symbols) = self.counts1.split_at(256);
        2 * literals.iter().sum::<usize>() + symbols.iter().sum::<usize>()
    }

    /// Tokenize `text` the way the encoder would and record every token and every pair of
    /// adjacent tokens.
    ///
    /// Pairs are only counted within `text`, so counting several strings never links the end of
    /// one to the start of the next.
    pub(crate) fn compress_count(&mut self, table: &SymbolTable, text: &[u8]) {
        let mut pos = 0;
        let mut prev: Option<u16> = None;

        while pos < text.len() {
            let code = table.find_longest_symbol(&text[pos..]);
            let (token, advance) = match table.symbol(code) {
                Some(symbol) => (symbol_token(code), symbol.len()),
                None => (literal_token(text[pos]), 1),
            };

            self.record_count1(token);
            if let Some(prev) = prev {
                self.record_count2(prev, token);
            }

            prev = Some(token);
            pos += advance;
        }
    }
}
