#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let table = fsst_sorted::SymbolTable::train_n(data, 2);
    assert!(table.len() <= fsst_sorted::MAX_SYMBOLS);

    let compress = table.encoder().encode(data);
    assert!(compress.len() <= 2 * data.len());
    assert_eq!(table.decoder().decode(&compress).unwrap(), data);
});
