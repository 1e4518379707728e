#![no_main]

use libfuzzer_sys::{fuzz_target, Corpus};
use rlp_decoder::{decode, item_header};

fuzz_target!(|bytes: Vec<u8>| -> Corpus {
    let item = match decode(&bytes) {
        Ok(item) => item,
        Err(_) => return Corpus::Reject,
    };
    assert_eq!(item_header(&bytes).unwrap().total(), Ok(bytes.len()));
    assert_eq!(decode(&bytes), Ok(item));
    Corpus::Keep
});
