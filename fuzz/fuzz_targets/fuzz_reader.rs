#![no_main]

use arbitrary::Arbitrary;
use ccml::index::MethodReader;
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

#[derive(Arbitrary, Debug)]
struct Input {
    key: Vec<u8>,
    file: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let Ok(mut reader) = MethodReader::from_source(Cursor::new(input.file)) else {
        return;
    };
    if let Err(err) = reader.search(&input.key) {
        assert_eq!(reader.is_open(), !err.is_corrupt());
        return;
    }
    // Bounded: every successful read advances by at least three bytes
    while let Ok(false) = reader.end_of_file() {
        if reader.read_method().is_err() {
            break;
        }
    }
});
