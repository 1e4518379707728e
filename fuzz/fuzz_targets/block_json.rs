#![no_main]

use block_types::EthereumBlock;
use libfuzzer_sys::{fuzz_target, Corpus};

fuzz_target!(|json: &str| -> Corpus {
    let block: EthereumBlock = match serde_json::from_str(json) {
        Ok(block) => block,
        Err(_) => return Corpus::Reject,
    };
    let serialized = serde_json::to_string(&block).unwrap();
    let again: EthereumBlock = serde_json::from_str(&serialized).unwrap();
    assert_eq!(block, again);
    Corpus::Keep
});
