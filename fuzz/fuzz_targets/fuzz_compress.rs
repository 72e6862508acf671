#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let table = fsst_sorted::build_table("the quick brown fox jumped over the lazy dog");
    let compress = fsst_sorted::encode(&table, data);
    let decompress = fsst_sorted::decode(&table, &compress).unwrap();
    assert_eq!(&decompress, data);
});
