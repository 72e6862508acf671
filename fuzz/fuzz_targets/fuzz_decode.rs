#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The first bytes pick a table, the rest is an untrusted code stream.
    let Ok((table, consumed)) = fsst_sorted::SymbolTable::from_bytes(data) else {
        return;
    };
    let _ = table.decoder().decode(&data[consumed..]);
});
