use crate::primitives::{need_bytes, need_fixed, need_list, need_u64, need_uint, Address, U256};
use crate::BlockError;
use rlp_decoder::{decode, RlpItem};
use serde::{Deserialize, Serialize};

/// A transaction object as returned by a node over JSON-RPC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthereumTransaction {
    pub hash: String,
    pub nonce: String,
    /// `None` while pending.
    pub block_hash: Option<String>,
    pub block_number: Option<String>,
    pub transaction_index: Option<String>,
    pub from: String,
    /// `None` for contract creations.
    pub to: Option<String>,
    pub value: String,
    pub gas_price: String,
    pub gas: String,
    pub input: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTransaction {
    pub nonce: u64,
    pub gas_price: U256,
    pub gas_limit: u64,
    /// `None` for contract creations.
    pub to: Option<Address>,
    pub value: U256,
    pub data: Vec<u8>,
    pub v: u64,
    pub r: U256,
    pub s: U256,
}

impl LegacyTransaction {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BlockError> {
        Self::from_rlp(&decode(bytes)?)
    }

    pub fn from_rlp(item: &RlpItem) -> Result<Self, BlockError> {
        let [nonce, gas_price, gas_limit, to, value, data, v, r, s] =
            need_list(item, "transaction")?
        else {
            return Err(BlockError::FieldCount {
                name: "transaction",
                expected: 9,
                found: item.len(),
            });
        };

        let to = match need_bytes(to, "to")? {
            [] => None,
            _ => Some(need_fixed(to, "to")?),
        };

        Ok(LegacyTransaction {
            nonce: need_u64(nonce, "nonce")?,
            gas_price: need_uint(gas_price, "gas_price")?,
            gas_limit: need_u64(gas_limit, "gas_limit")?,
            to,
            value: need_uint(value, "value")?,
            data: need_bytes(data, "data")?.to_vec(),
            v: need_u64(v, "v")?,
            r: need_uint(r, "r")?,
            s: need_uint(s, "s")?,
        })
    }
}

/// A transaction as found in a block body.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RawTransaction {
    Legacy(LegacyTransaction),
    /// EIP-2718 envelope, the fields are left undecoded.
    Typed { tx_type: u8, fields: RlpItem },
}

impl RawTransaction {
    pub fn tx_type(&self) -> u8 {
        match self {
            RawTransaction::Legacy(_) => 0,
            RawTransaction::Typed { tx_type, .. } => *tx_type,
        }
    }

    pub fn from_rlp(item: &RlpItem) -> Result<Self, BlockError> {
        match item {
            RlpItem::List(_) => LegacyTransaction::from_rlp(item).map(RawTransaction::Legacy),
            RlpItem::Bytes(envelope) => {
                let (tx_type, payload) = envelope
                    .split_first()
                    .ok_or(BlockError::EmptyTypedTransaction)?;
                Ok(RawTransaction::Typed {
                    tx_type: *tx_type,
                    fields: decode(payload)?,
                })
            }
        }
    }
}
