use crate::primitives::{
    keccak256, need_bytes, need_fixed, need_list, need_u64, need_uint, Address, Bloom, Nonce,
    B32, U256,
};
use crate::{BlockError, EthereumTransaction, RawTransaction};
use rlp_decoder::{decode, item_header, RlpItem};
use serde::{Deserialize, Serialize};

/// A block as returned by a node over JSON-RPC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthereumBlock {
    /// `None` for a pending block.
    pub number: Option<String>,
    /// `None` for a pending block.
    pub hash: Option<String>,
    pub parent_hash: String,
    /// `None` for a pending block.
    pub nonce: Option<String>,
    pub sha3_uncles: String,
    /// `None` for a pending block.
    pub logs_bloom: Option<String>,
    pub transactions_root: String,
    pub state_root: String,
    pub receipts_root: String,
    pub miner: String,
    pub difficulty: String,
    pub total_difficulty: String,
    pub extra_data: String,
    pub size: String,
    pub gas_limit: String,
    pub gas_used: String,
    pub timestamp: String,
    pub transactions: Vec<BlockTransaction>,
    pub uncles: Vec<String>,
}

/// Depending on the request, a node returns either full transaction objects
/// or only their hashes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, expecting = "unsupported type, expected a transaction object or hash")]
pub enum BlockTransaction {
    Object(Box<EthereumTransaction>),
    Hash(String),
}

impl BlockTransaction {
    pub fn hash(&self) -> &str {
        match self {
            BlockTransaction::Object(tx) => &tx.hash,
            BlockTransaction::Hash(hash) => hash,
        }
    }

    pub fn object(&self) -> Option<&EthereumTransaction> {
        match self {
            BlockTransaction::Object(tx) => Some(tx),
            BlockTransaction::Hash(_) => None,
        }
    }
}

const HEADER_FIELDS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub parent_hash: B32,
    pub uncle_hash: B32,
    pub coinbase: Address,
    pub state_root: B32,
    pub tx_root: B32,
    pub receipt_hash: B32,
    pub bloom: Bloom,
    pub difficulty: U256,
    pub number: U256,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub time: u64,
    pub extra: Vec<u8>,
    pub mix_digest: B32,
    pub nonce: Nonce,
    /// Fields appended by later forks (base fee, withdrawals root, ...).
    pub extra_fields: Vec<RlpItem>,
}

impl Header {
    pub fn from_rlp(item: &RlpItem) -> Result<Self, BlockError> {
        let fields = need_list(item, "header")?;
        if fields.len() < HEADER_FIELDS {
            return Err(BlockError::FieldCount {
                name: "header",
                expected: HEADER_FIELDS,
                found: fields.len(),
            });
        }

        Ok(Header {
            parent_hash: need_fixed(&fields[0], "parent_hash")?,
            uncle_hash: need_fixed(&fields[1], "uncle_hash")?,
            coinbase: need_fixed(&fields[2], "coinbase")?,
            state_root: need_fixed(&fields[3], "state_root")?,
            tx_root: need_fixed(&fields[4], "tx_root")?,
            receipt_hash: need_fixed(&fields[5], "receipt_hash")?,
            bloom: need_fixed(&fields[6], "bloom")?,
            difficulty: need_uint(&fields[7], "difficulty")?,
            number: need_uint(&fields[8], "number")?,
            gas_limit: need_u64(&fields[9], "gas_limit")?,
            gas_used: need_u64(&fields[10], "gas_used")?,
            time: need_u64(&fields[11], "time")?,
            extra: need_bytes(&fields[12], "extra")?.to_vec(),
            mix_digest: need_fixed(&fields[13], "mix_digest")?,
            nonce: need_fixed(&fields[14], "nonce")?,
            extra_fields: fields[HEADER_FIELDS..].to_vec(),
        })
    }
}

/// A block decoded from its RLP network encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    /// Keccak-256 of the encoded header.
    pub hash: B32,
    pub header: Header,
    pub transactions: Vec<RawTransaction>,
    pub uncles: Vec<Header>,
}

impl RawBlock {
    pub fn from_rlp_bytes(bytes: &[u8]) -> Result<Self, BlockError> {
        let block = decode(bytes)?;

        let [header, transactions, uncles, ..] = need_list(&block, "block")? else {
            return Err(BlockError::FieldCount {
                name: "block",
                expected: 3,
                found: block.len(),
            });
        };

        // the decode above validated every length, the header is the first item
        // of the block payload
        let block_prefix = item_header(bytes)?.prefix_len;
        let header_bytes = &bytes[block_prefix..];
        let header_len = item_header(header_bytes)?.total()?;
        let hash = keccak256(&header_bytes[..header_len]);

        let transactions = need_list(transactions, "transactions")?
            .iter()
            .map(RawTransaction::from_rlp)
            .collect::<Result<_, _>>()?;

        let uncles = need_list(uncles, "uncles")?
            .iter()
            .map(Header::from_rlp)
            .collect::<Result<_, _>>()?;

        Ok(RawBlock {
            hash,
            header: Header::from_rlp(header)?,
            transactions,
            uncles,
        })
    }
}
