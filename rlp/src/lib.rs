mod de;
pub use de::{decode, item_header, short_item_header, Decoder, DecoderConfig, ItemHeader};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RlpError {
    #[error("empty input, expected at least the prefix byte")]
    InputEmpty,
    #[error("declared length does not match the input")]
    InputBad,
    #[error("declared length does not fit in a usize")]
    InputTooLong,
    /// Never produced by the decoder since the five prefix classes cover every
    /// byte value, kept so that callers can match on a total classification.
    #[error("invalid length prefix")]
    LengthPrefixBad,
    #[error("list nesting deeper than {max}")]
    DepthLimit { max: usize },
    #[error("input of {len} bytes exceeds the limit of {max}")]
    SizeLimit { len: usize, max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RlpItem {
    /// Bytes (string)
    Bytes(#[cfg_attr(feature = "serde", serde(with = "serde_bytes"))] Vec<u8>),
    /// Arbitrarily nested items (list)
    List(Vec<RlpItem>),
}

impl RlpItem {
    /// Decode a complete item with the default [`Decoder`].
    pub fn decode(bytes: &[u8]) -> Result<Self, RlpError> {
        decode(bytes)
    }

    pub fn empty_list() -> Self {
        RlpItem::List(Vec::new())
    }

    pub fn is_bytes(&self) -> bool {
        matches!(self, RlpItem::Bytes(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, RlpItem::List(_))
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RlpItem::Bytes(bytes) => Some(bytes),
            RlpItem::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[RlpItem]> {
        match self {
            RlpItem::Bytes(_) => None,
            RlpItem::List(items) => Some(items),
        }
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            RlpItem::Bytes(bytes) => Some(bytes),
            RlpItem::List(_) => None,
        }
    }

    pub fn into_list(self) -> Option<Vec<RlpItem>> {
        match self {
            RlpItem::Bytes(_) => None,
            RlpItem::List(items) => Some(items),
        }
    }

    /// Child at `index`, `None` for leaves or out of range.
    pub fn get(&self, index: usize) -> Option<&RlpItem> {
        self.as_list()?.get(index)
    }

    /// Byte count of a leaf or child count of a list.
    pub fn len(&self) -> usize {
        match self {
            RlpItem::Bytes(bytes) => bytes.len(),
            RlpItem::List(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<u8>> for RlpItem {
    fn from(bytes: Vec<u8>) -> Self {
        RlpItem::Bytes(bytes)
    }
}

impl From<Vec<RlpItem>> for RlpItem {
    fn from(items: Vec<RlpItem>) -> Self {
        RlpItem::List(items)
    }
}

impl TryFrom<&[u8]> for RlpItem {
    type Error = RlpError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        decode(bytes)
    }
}
