//! Encoding and decoding with a finished [`SymbolTable`].
//!
//! Both directions work one token at a time. The `*_step` methods expose a single step over
//! caller-owned buffers and report how far to advance each side; the `*_into` methods loop
//! over a whole input, and the plain methods allocate their output.

use crate::{Error, Result, SymbolTable, ESCAPE_CODE, MAX_SYMBOL_LEN};

/// Encoder uses a symbol table to greedily compress strings into codes and escapes.
#[derive(Clone, Copy, Debug)]
pub struct Encoder<'a> {
    table: &'a SymbolTable,
}

impl<'a> Encoder<'a> {
    /// Returns a new encoder that uses the provided symbol table.
    pub fn new(table: &'a SymbolTable) -> Self {
        Self { table }
    }

    /// Worst-case encoded size of `input_len` bytes: every byte escaped.
    pub const fn max_encoded_len(input_len: usize) -> usize {
        2 * input_len
    }

    /// Find the code for the front of `input` and the number of input bytes it covers.
    #[inline]
    fn next_code(&self, input: &[u8]) -> (u8, usize) {
        let code = self.table.find_longest_symbol(input);
        match self.table.symbol(code) {
            Some(symbol) => (code, symbol.len()),
            None => (ESCAPE_CODE, 1),
        }
    }

    /// Encode one token from the front of `input` into the front of `output`.
    ///
    /// # Returns
    ///
    /// A tuple of (advance_in, advance_out): the number of bytes consumed from `input` and the
    /// number written to `output`. An escape writes two bytes, a symbol one. Empty input
    /// returns `(0, 0)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferTooSmall`] if `output` can't hold the token. Nothing is written.
    pub fn encode_step(&self, input: &[u8], output: &mut [u8]) -> Result<(usize, usize)> {
        self.encode_at(input, 0, output, 0)
    }

    fn encode_at(
        &self,
        input: &[u8],
        in_pos: usize,
        output: &mut [u8],
        out_pos: usize,
    ) -> Result<(usize, usize)> {
        let Some(&first) = input.get(in_pos) else {
            return Ok((0, 0));
        };

        let (code, advance_in) = self.next_code(&input[in_pos..]);
        let advance_out = if code == ESCAPE_CODE { 2 } else { 1 };
        if output.len() < out_pos + advance_out {
            return Err(Error::buffer_too_small(out_pos + advance_out, output.len()));
        }

        output[out_pos] = code;
        if code == ESCAPE_CODE {
            output[out_pos + 1] = first;
        }
        Ok((advance_in, advance_out))
    }

    /// Encode all of `input` into `output`, returning the number of bytes written.
    ///
    /// An `output` of [`Encoder::max_encoded_len`] bytes is always large enough.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferTooSmall`] as soon as the next token doesn't fit. `output` holds a
    /// valid encoding of a prefix of `input` in that case.
    pub fn encode_into(&self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        let mut in_pos = 0;
        let mut out_pos = 0;
        while in_pos < input.len() {
            let (advance_in, advance_out) = self.encode_at(input, in_pos, output, out_pos)?;
            in_pos += advance_in;
            out_pos += advance_out;
        }
        Ok(out_pos)
    }

    /// Use the symbol table to compress the plaintext into a sequence of codes and escapes.
    pub fn encode(&self, plaintext: &[u8]) -> Vec<u8> {
        let mut values = Vec::with_capacity(Self::max_encoded_len(plaintext.len()));

        let mut pos = 0;
        while pos < plaintext.len() {
            let (code, advance) = self.next_code(&plaintext[pos..]);
            values.push(code);
            if code == ESCAPE_CODE {
                values.push(plaintext[pos]);
            }
            pos += advance;
        }

        values
    }

    /// Compress many lines in bulk.
    pub fn encode_bulk(&self, lines: &[&[u8]]) -> Vec<Vec<u8>> {
        lines.iter().map(|line| self.encode(line)).collect()
    }
}

/// Decoder uses a symbol table to turn a stream of 8-bit codes back into a string.
#[derive(Clone, Copy, Debug)]
pub struct Decoder<'a> {
    table: &'a SymbolTable,
}

impl<'a> Decoder<'a> {
    /// Returns a new decoder that uses the provided symbol table.
    pub fn new(table: &'a SymbolTable) -> Self {
        Self { table }
    }

    /// Upper bound on the decoded size of `codes_len` code bytes: every code an 8-byte symbol.
    ///
    /// This is also the buffer size at which [`Decoder::decode_into`] never has to fall back
    /// from whole-word symbol copies.
    pub const fn max_decoded_len(codes_len: usize) -> usize {
        MAX_SYMBOL_LEN * codes_len
    }

    /// Decode one token from the front of `codes` into the front of `output`.
    ///
    /// # Returns
    ///
    /// A tuple of (advance_in, advance_out): the number of code bytes consumed (2 for an escape,
    /// 1 for a symbol) and the number of bytes written. Empty input returns `(0, 0)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptStream`] for a code that isn't in the table or a trailing escape,
    /// and [`Error::BufferTooSmall`] if `output` can't hold the decoded bytes.
    pub fn decode_step(&self, codes: &[u8], output: &mut [u8]) -> Result<(usize, usize)> {
        self.decode_at(codes, 0, output, 0)
    }

    fn decode_at(
        &self,
        codes: &[u8],
        in_pos: usize,
        output: &mut [u8],
        out_pos: usize,
    ) -> Result<(usize, usize)> {
        let Some(&code) = codes.get(in_pos) else {
            return Ok((0, 0));
        };

        if code == ESCAPE_CODE {
            let literal = *codes
                .get(in_pos + 1)
                .ok_or_else(|| Error::truncated_escape(in_pos))?;
            let provided = output.len();
            let slot = output
                .get_mut(out_pos)
                .ok_or_else(|| Error::buffer_too_small(out_pos + 1, provided))?;
            *slot = literal;
            return Ok((2, 1));
        }

        let symbol = self
            .table
            .symbol(code)
            .ok_or_else(|| Error::unknown_code(in_pos, code, self.table.len()))?;
        let len = symbol.len();

        if output.len() >= out_pos + MAX_SYMBOL_LEN {
            // Whole-word copy; the bytes past `len` are overwritten by the next token.
            output[out_pos..out_pos + MAX_SYMBOL_LEN].copy_from_slice(symbol.padded());
        } else if output.len() >= out_pos + len {
            output[out_pos..out_pos + len].copy_from_slice(symbol.as_bytes());
        } else {
            return Err(Error::buffer_too_small(out_pos + len, output.len()));
        }

        Ok((1, len))
    }

    /// Decode all of `codes` into `output`, returning the number of bytes written.
    ///
    /// Bytes of `output` past the returned length may have been overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptStream`] if `codes` was not produced with this table, and
    /// [`Error::BufferTooSmall`] if the decoded string doesn't fit in `output`.
    pub fn decode_into(&self, codes: &[u8], output: &mut [u8]) -> Result<usize> {
        let mut in_pos = 0;
        let mut out_pos = 0;
        while in_pos < codes.len() {
            let (advance_in, advance_out) = self.decode_at(codes, in_pos, output, out_pos)?;
            in_pos += advance_in;
            out_pos += advance_out;
        }
        Ok(out_pos)
    }

    /// Decompress a byte slice that was previously returned by an encoder using the same symbol
    /// table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptStream`] if `codes` was not produced with this table.
    pub fn decode(&self, codes: &[u8]) -> Result<Vec<u8>> {
        let mut decoded = vec![0u8; Self::max_decoded_len(codes.len())];
        let len = self.decode_into(codes, &mut decoded)?;
        decoded.truncate(len);
        Ok(decoded)
    }
}
