//! End-to-end tests: train on text fixtures, then round-trip through encode and decode.
#![cfg(test)]

use fsst_sorted::{Error, Symbol, SymbolTable, TrainOptions, ESCAPE_CODE};

static PREAMBLE: &str = r#"
When in the Course of human events, it becomes necessary for one people to dissolve
the political bands which have connected them with another, and to assume among the
powers of the earth, the separate and equal station to which the Laws of Nature and
of Nature's God entitle them, a decent respect to the opinions of mankind requires
that they should declare the causes which impel them to the separation."#;

static DECLARATION: &str = include_str!("./fixtures/declaration.txt");

#[test]
fn test_basic() {
    // Roundtrip the preamble
    let trained = fsst_sorted::build_table(PREAMBLE);
    let compressed = fsst_sorted::encode(&trained, PREAMBLE.as_bytes());
    let decompressed = fsst_sorted::decode(&trained, &compressed).unwrap();
    assert_eq!(decompressed, PREAMBLE.as_bytes());
    assert!(compressed.len() < PREAMBLE.len());
}

#[test]
fn test_train_on_empty() {
    let trained = fsst_sorted::build_table("");
    assert!(trained.is_empty());

    // We can still compress with it, but every byte is escaped.
    let text = "the quick brown fox jumped over the lazy dog".as_bytes();
    let compressed = fsst_sorted::encode(&trained, text);
    assert_eq!(compressed.len(), 2 * text.len());
    assert_eq!(fsst_sorted::decode(&trained, &compressed).unwrap(), text);
}

#[test]
fn test_zeros() {
    // make sure we don't panic if there are zeros in the training or input data
    let training_data: Vec<u8> = vec![0, 1, 2, 3, 4];
    let trained = fsst_sorted::build_table(&training_data);
    let compressed = fsst_sorted::encode(&trained, &[0, 4]);
    assert_eq!(fsst_sorted::decode(&trained, &compressed).unwrap(), &[0, 4]);

    let compressed = fsst_sorted::encode(&trained, &training_data);
    assert_eq!(compressed, vec![0]);
}

#[test]
fn test_escape_byte_in_corpus() {
    // 0xFF as plain data must not be confused with the escape code or with symbol code 0.
    let training_data: Vec<u8> = vec![255, 255, 0, 255, 255, 255, 0, 255];
    let trained = fsst_sorted::build_table(&training_data);
    assert!(!trained.is_empty());

    let compressed = fsst_sorted::encode(&trained, &training_data);
    assert!(compressed.len() < training_data.len());
    assert_eq!(
        fsst_sorted::decode(&trained, &compressed).unwrap(),
        training_data
    );
}

#[test]
fn test_declaration() {
    let trained = SymbolTable::train(DECLARATION);
    assert_eq!(trained.len(), 255);

    let compressed = trained.encoder().encode(DECLARATION.as_bytes());
    assert_eq!(compressed.len(), trained.compressed_len(DECLARATION.as_bytes()));
    assert!(compressed.len() * 10 < DECLARATION.len() * 6);
    assert_eq!(
        trained.decoder().decode(&compressed).unwrap(),
        DECLARATION.as_bytes()
    );
}

#[test]
fn test_large() {
    let mut corpus = String::new();
    while corpus.len() < 256 * 1_024 {
        corpus.push_str(DECLARATION);
    }

    let trained = SymbolTable::train(&corpus);
    let compressed = trained.encoder().encode(corpus.as_bytes());
    assert_eq!(
        trained.decoder().decode(&compressed).unwrap(),
        corpus.as_bytes()
    );
}

#[test]
fn test_bulk_lines() {
    let lines: Vec<&[u8]> = DECLARATION
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::as_bytes)
        .collect();

    let trained = SymbolTable::train_bulk(&lines);
    let compressed = trained.encoder().encode_bulk(&lines);
    for (line, codes) in lines.iter().zip(&compressed) {
        assert_eq!(&trained.decoder().decode(codes).unwrap(), line);
    }

    let total: usize = lines.iter().map(|line| line.len()).sum();
    let total_compressed: usize = compressed.iter().map(Vec::len).sum();
    assert!(total_compressed < total);
}

#[test]
fn test_tum_scenario() {
    let text = b"tumcwitumvldb";

    // With the full budget, training converges on two long symbols; the first starts with "tum".
    let trained = SymbolTable::train(text);
    assert!(trained.symbols().iter().all(|s| s.len() > 1));
    let first = trained.symbol(trained.find_longest_symbol(text)).unwrap();
    assert!(first.as_bytes().starts_with(b"tum"));
    let compressed = fsst_sorted::encode(&trained, text);
    assert_eq!(compressed.len(), 2);
    assert_eq!(fsst_sorted::decode(&trained, &compressed).unwrap(), text);

    // With a single code, "tum" is the best symbol and is used for both occurrences.
    let trained = SymbolTable::train_with(text, &TrainOptions::default().max_symbols(1));
    assert_eq!(trained.symbols(), &[Symbol::from_slice(b"tum")]);
    let compressed = fsst_sorted::encode(&trained, text);
    assert_eq!(
        compressed,
        vec![
            0,
            ESCAPE_CODE,
            b'c',
            ESCAPE_CODE,
            b'w',
            ESCAPE_CODE,
            b'i',
            0,
            ESCAPE_CODE,
            b'v',
            ESCAPE_CODE,
            b'l',
            ESCAPE_CODE,
            b'd',
            ESCAPE_CODE,
            b'b',
        ]
    );
    assert_eq!(fsst_sorted::decode(&trained, &compressed).unwrap(), text);
}

#[test]
fn test_deterministic() {
    let first = SymbolTable::train(DECLARATION);
    let second = SymbolTable::train(DECLARATION);
    assert_eq!(first, second);
}

#[test]
fn test_exchange_table() {
    // Ship the serialized table in front of the payload, as a separate process would receive it.
    let trained = SymbolTable::train(PREAMBLE);
    let mut message = trained.to_bytes();
    message.extend(fsst_sorted::encode(&trained, PREAMBLE.as_bytes()));

    let (received, consumed) = SymbolTable::from_bytes(&message).unwrap();
    assert_eq!(received, trained);
    assert_eq!(
        fsst_sorted::decode(&received, &message[consumed..]).unwrap(),
        PREAMBLE.as_bytes()
    );
}

#[test]
fn test_foreign_stream() {
    let small = SymbolTable::train_with(PREAMBLE, &TrainOptions::default().max_symbols(4));
    let large = SymbolTable::train(DECLARATION);

    let compressed = fsst_sorted::encode(&large, DECLARATION.as_bytes());
    assert!(matches!(
        fsst_sorted::decode(&small, &compressed),
        Err(Error::CorruptStream { .. })
    ));
}
