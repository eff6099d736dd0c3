#![no_main]

use ccml::charset::{compare_search, symbols};
use ccml::index::{address_of, decode_record, encode_record};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Titles in the wild are arbitrary legacy-charset bytes
    let _ = symbols(data).count();
    let _ = address_of(data, 4);
    let (key, text) = data.split_at(data.len() / 2);
    let _ = compare_search(key, text);

    if let Ok(method) = decode_record(data, 8) {
        let bytes = encode_record(&method).expect("decoded record must encode");
        let again = decode_record(&bytes, 8).expect("encoded record must decode");
        assert_eq!(method, again);
    }
});
