use crate::BlockError;
use rlp_decoder::RlpItem;
use sha3::{Digest, Keccak256};

pub type Address = [u8; 20];

pub type U256 = [u8; 32];

pub type B32 = [u8; 32];

pub type Bloom = [u8; 256];

pub type Nonce = [u8; 8];

pub fn keccak256(bytes: &[u8]) -> B32 {
    Keccak256::digest(bytes).into()
}

fn strip_prefix(s: &str) -> Result<&str, BlockError> {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or(BlockError::MissingPrefix)
}

/// Decode `0x` prefixed data such as a hash, an address or call data.
pub fn decode_hex_data(s: &str) -> Result<Vec<u8>, BlockError> {
    Ok(hex::decode(strip_prefix(s)?)?)
}

/// Decode a `0x` prefixed quantity, like `"0x1b4"`.
pub fn decode_quantity(s: &str) -> Result<u64, BlockError> {
    let digits = strip_prefix(s)?;
    if digits.is_empty() || digits.len() > 16 {
        return Err(BlockError::InvalidQuantity(s.to_string()));
    }
    u64::from_str_radix(digits, 16).map_err(|_| BlockError::InvalidQuantity(s.to_string()))
}

pub(crate) fn need_list<'a>(
    item: &'a RlpItem,
    name: &'static str,
) -> Result<&'a [RlpItem], BlockError> {
    item.as_list().ok_or(BlockError::ExpectedList(name))
}

pub(crate) fn need_bytes<'a>(item: &'a RlpItem, field: &'static str) -> Result<&'a [u8], BlockError> {
    item.as_bytes().ok_or(BlockError::ExpectedBytes(field))
}

pub(crate) fn need_fixed<const N: usize>(
    item: &RlpItem,
    field: &'static str,
) -> Result<[u8; N], BlockError> {
    let bytes = need_bytes(item, field)?;
    bytes.try_into().map_err(|_| BlockError::FieldLength {
        field,
        len: bytes.len(),
        expected: N,
    })
}

/// Big-endian integer of at most `N` bytes, left padded with zeroes.
pub(crate) fn need_uint<const N: usize>(
    item: &RlpItem,
    field: &'static str,
) -> Result<[u8; N], BlockError> {
    let bytes = need_bytes(item, field)?;
    if bytes.len() > N {
        return Err(BlockError::FieldTooLong {
            field,
            len: bytes.len(),
            max: N,
        });
    }
    let mut padded = [0; N];
    padded[N - bytes.len()..].copy_from_slice(bytes);
    Ok(padded)
}

pub(crate) fn need_u64(item: &RlpItem, field: &'static str) -> Result<u64, BlockError> {
    need_uint::<8>(item, field).map(u64::from_be_bytes)
}
