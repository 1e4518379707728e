#![no_main]

use block_types::RawBlock;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|bytes: &[u8]| {
    let _ = RawBlock::from_rlp_bytes(bytes);
});
