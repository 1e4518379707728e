mod block;
mod primitives;
mod transaction;

pub use block::{BlockTransaction, EthereumBlock, Header, RawBlock};
pub use primitives::*;
pub use rlp_decoder::RlpError;
pub use transaction::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlockError {
    #[error(transparent)]
    Rlp(#[from] RlpError),
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("missing 0x prefix")]
    MissingPrefix,
    #[error("invalid quantity {0:?}")]
    InvalidQuantity(String),
    #[error("expected a list for {0}")]
    ExpectedList(&'static str),
    #[error("expected bytes for {0}")]
    ExpectedBytes(&'static str),
    #[error("{name} has {found} fields, expected {expected}")]
    FieldCount {
        name: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("{field} is {len} bytes long, expected {expected}")]
    FieldLength {
        field: &'static str,
        len: usize,
        expected: usize,
    },
    #[error("{field} is {len} bytes long, at most {max} allowed")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
    #[error("empty typed transaction")]
    EmptyTypedTransaction,
}
