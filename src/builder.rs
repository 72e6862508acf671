//! Functions and types used for training a [`SymbolTable`] from a corpus of text.
//!
//! Training is generational. Starting from an empty table, each generation tokenizes the sample
//! with the current table, counts tokens and adjacent token pairs, and then builds a fresh table
//! from the candidates with the highest gain: every counted token on its own, plus every counted
//! token extended by the token that followed it.
//!
//! Selection keeps the candidates with the highest gain, so a frequent short symbol tends to be
//! outgrown by its own extensions over later generations. Trained on `"tumcwitumvldb"` with the
//! default budget, the table ends up as `["mvldb", "tumcwitu"]`: both occurrences of `"tum"` are
//! covered, but not by a standalone `"tum"` symbol. A tighter [`TrainOptions::max_symbols`]
//! budget keeps shorter symbols; with a budget of one, the table is exactly `["tum"]`.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::counter::{token_symbol, Counter, TOKEN_SPACE};
use crate::heap::{Candidate, CandidateHeap};
use crate::{Symbol, SymbolTable, MAX_SYMBOLS, MAX_SYMBOL_LEN};

/// The number of generations used for training.
#[cfg(not(miri))]
const MAX_GENERATIONS: usize = 5;

#[cfg(miri)]
const MAX_GENERATIONS: usize = 1;

/// Options controlling [`SymbolTable::train_with`].
///
/// ```
/// use fsst_sorted::{SymbolTable, TrainOptions};
///
/// let options = TrainOptions::default().max_symbols(1);
/// let table = SymbolTable::train_with("tumcwitumvldb", &options);
/// assert_eq!(table.symbols()[0].as_bytes(), b"tum");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainOptions {
    generations: usize,
    max_symbols: usize,
    stop_when_stable: bool,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            generations: MAX_GENERATIONS,
            max_symbols: MAX_SYMBOLS,
            stop_when_stable: false,
        }
    }
}

impl TrainOptions {
    /// Number of count-and-update generations to run. Zero yields an empty table.
    pub fn generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Upper bound on the number of symbols in the trained table, clamped to 255.
    pub fn max_symbols(mut self, max_symbols: usize) -> Self {
        self.max_symbols = max_symbols.min(MAX_SYMBOLS);
        self
    }

    /// Stop before the configured number of generations once a generation reproduces the table
    /// it started from.
    pub fn stop_when_stable(mut self, stop_when_stable: bool) -> Self {
        self.stop_when_stable = stop_when_stable;
        self
    }
}

impl SymbolTable {
    /// Build and train a `SymbolTable` from a sample corpus of text.
    ///
    /// Starting with an empty symbol table, it iteratively compresses the corpus, then attempts
    /// to merge symbols when doing so would yield better compression than leaving them unmerged.
    /// The resulting table will have at most 255 symbols (the 256th code is reserved for the
    /// escape code).
    pub fn train(corpus: impl AsRef<[u8]>) -> Self {
        Self::train_with(corpus, &TrainOptions::default())
    }

    /// Specify the number of generations to train for
    pub fn train_n(corpus: impl AsRef<[u8]>, generations: usize) -> Self {
        Self::train_with(corpus, &TrainOptions::default().generations(generations))
    }

    /// Train on a single sample with explicit options.
    pub fn train_with(corpus: impl AsRef<[u8]>, options: &TrainOptions) -> Self {
        Self::train_bulk_with(&[corpus.as_ref()], options)
    }

    /// Train on many short strings, such as the values of a column.
    ///
    /// Adjacent-token pairs are only counted within each string.
    pub fn train_bulk(lines: &[&[u8]]) -> Self {
        Self::train_bulk_with(lines, &TrainOptions::default())
    }

    /// Train on many short strings with explicit options.
    pub fn train_bulk_with(lines: &[&[u8]], options: &TrainOptions) -> Self {
        let mut table = Self::default();
        let sample_len: usize = lines.iter().map(|line| line.len()).sum();
        if sample_len == 0 {
            return table;
        }

        let mut counter = Counter::new();
        for generation in 0..options.generations {
            for line in lines {
                counter.compress_count(&table, line);
            }

            let compressed_len = counter.encoded_len();
            let next = table.update_table(&counter, options.max_symbols);
            counter.reset();

            debug!(
                generation,
                sample_len,
                compressed_len,
                n_symbols = next.len(),
                "trained symbol table generation"
            );

            if options.stop_when_stable && next == table {
                trace!(generation, "symbol table is stable, stopping early");
                break;
            }
            table = next;
        }

        table
    }

    /// Using a set of counters and the existing set of symbols, build a new table holding the
    /// `max_symbols` candidates with the highest gain over the distribution in `counter`.
    fn update_table(&self, counter: &Counter, max_symbols: usize) -> Self {
        // The same bytes can arise from several token pairs, so gains are merged per symbol.
        let mut gains: HashMap<Symbol, u64> = HashMap::with_capacity(TOKEN_SPACE);
        let mut add_gain = |symbol: Symbol, count: usize| {
            *gains.entry(symbol).or_insert(0) += (count * symbol.len()) as u64;
        };

        for token1 in 0..(256 + self.len()) as u16 {
            let count1 = counter.count1(token1);
            if count1 == 0 {
                continue;
            }

            let symbol1 = token_symbol(self, token1);
            add_gain(symbol1, count1);

            if symbol1.len() == MAX_SYMBOL_LEN {
                continue;
            }

            for (token2, &count2) in counter.counts2_from(token1).iter().enumerate() {
                if count2 == 0 {
                    continue;
                }

                let merged = symbol1.concat(token_symbol(self, token2 as u16));
                add_gain(merged, count2);
            }
        }

        let mut pqueue = CandidateHeap::with_capacity(max_symbols);
        for (&symbol, &gain) in &gains {
            pqueue.push(Candidate::new(symbol, gain));
        }

        trace!(
            candidates = gains.len(),
            selected = pqueue.len(),
            "selected symbol candidates"
        );

        let symbols = pqueue
            .into_sorted_vec()
            .into_iter()
            .map(|candidate| candidate.symbol)
            .collect();
        Self::from_candidates(symbols)
    }
}

#[cfg(test)]
mod test {
    use tracing_test::traced_test;

    use crate::{SymbolTable, TrainOptions, ESCAPE_CODE};

    fn symbol_strings(table: &SymbolTable) -> Vec<&[u8]> {
        table.symbols().iter().map(|s| s.as_bytes()).collect()
    }

    #[test]
    fn test_builder() {
        // Train a table on the toy string
        let text = "hello world";
        let table = SymbolTable::train(text.as_bytes());

        // Use the table to compress a string, see the values
        let compressed = table.encoder().encode(text.as_bytes());

        // Ensure that the compressed string has no escape bytes
        assert!(compressed.iter().all(|b| *b != ESCAPE_CODE));

        // Ensure that we can compress a string with no values seen at training time, with escape bytes
        let compressed = table.encoder().encode("xyz123".as_bytes());
        assert_eq!(
            compressed,
            vec![
                ESCAPE_CODE,
                b'x',
                ESCAPE_CODE,
                b'y',
                ESCAPE_CODE,
                b'z',
                ESCAPE_CODE,
                b'1',
                ESCAPE_CODE,
                b'2',
                ESCAPE_CODE,
                b'3',
            ]
        );
    }

    #[test]
    fn test_train_empty() {
        let table = SymbolTable::train("");
        assert!(table.is_empty());

        let table = SymbolTable::train_bulk(&[b"", b""]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_first_generation() {
        // One generation sees only escapes: every byte and every adjacent pair is a candidate.
        let table = SymbolTable::train_n("tumcwitumvldb", 1);
        assert_eq!(table.len(), 20);
        assert!(table.symbols().iter().all(|s| s.len() <= 2));
        assert_eq!(table.find_longest_symbol(b"tum"), 12);
        assert_eq!(table.symbols()[12].as_bytes(), b"tu");
    }

    #[test]
    fn test_generations_converge() {
        let table = SymbolTable::train("tumcwitumvldb");
        assert_eq!(symbol_strings(&table), vec![&b"mvldb"[..], b"tumcwitu"]);
        assert_eq!(table.encoder().encode(b"tumcwitumvldb"), vec![1, 0]);

        let stable = SymbolTable::train_with(
            "tumcwitumvldb",
            &TrainOptions::default().generations(50).stop_when_stable(true),
        );
        assert_eq!(stable, table);
    }

    #[test]
    fn test_small_budget() {
        let table =
            SymbolTable::train_with("tumcwitumvldb", &TrainOptions::default().max_symbols(1));
        assert_eq!(symbol_strings(&table), vec![&b"tum"[..]]);

        let encoded = table.encoder().encode(b"tumcwitumvldb");
        assert_eq!(encoded[0], 0);
        assert_eq!(encoded[7], 0);
        assert_eq!(encoded.iter().filter(|&&code| code == 0).count(), 2);

        let table = SymbolTable::train_with("abc", &TrainOptions::default().max_symbols(0));
        assert!(table.is_empty());
    }

    #[test]
    fn test_capacity() {
        // Far more distinct byte pairs than codes.
        let corpus: Vec<u8> = (0..20_000u32)
            .map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8)
            .collect();
        let table = SymbolTable::train(&corpus);
        assert_eq!(table.len(), 255);
        assert!(table.symbols().iter().all(|s| (1..=8).contains(&s.len())));

        let decoded = table.decoder().decode(&table.encoder().encode(&corpus)).unwrap();
        assert_eq!(decoded, corpus);
    }

    #[test]
    fn test_bulk() {
        let lines: [&[u8]; 3] = [b"hello", b"help", b"hello"];
        let table = SymbolTable::train_bulk(&lines);
        assert_eq!(symbol_strings(&table), vec![&b"hello"[..], b"help"]);
        assert_eq!(table.encoder().encode(b"hello"), vec![0]);
    }

    #[test]
    fn test_zero_generations() {
        assert!(SymbolTable::train_n("abc", 0).is_empty());
    }

    #[test]
    #[traced_test]
    fn test_logs_generations() {
        let _ = SymbolTable::train("tumcwitumvldb");
        assert!(logs_contain("trained symbol table generation"));
        assert!(logs_contain("generation=4"));
    }
}
