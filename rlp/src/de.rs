use crate::{RlpError, RlpItem};
use tracing::{debug, trace};

/// Longest length field a long-form prefix may declare, lengths are read into a u64.
const MAX_LEN_OF_LEN: usize = 8;

const DEFAULT_MAX_DEPTH: usize = 1024;

/// Limits applied by a [`Decoder`] before and while walking the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct DecoderConfig {
    /// Maximum number of nested lists, `None` to recurse as deep as the input goes.
    pub max_depth: Option<usize>,
    /// Maximum size of the top-level input in bytes.
    pub max_input_len: Option<usize>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            max_depth: Some(DEFAULT_MAX_DEPTH),
            max_input_len: None,
        }
    }
}

impl DecoderConfig {
    pub fn unbounded() -> Self {
        DecoderConfig {
            max_depth: None,
            max_input_len: None,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_max_input_len(mut self, max_input_len: usize) -> Self {
        self.max_input_len = Some(max_input_len);
        self
    }
}

/// Prefix and body sizes of one encoded item, as declared by its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemHeader {
    /// Bytes taken by the sign and the optional length field. Zero for a single
    /// byte item, whose sign is its own payload.
    pub prefix_len: usize,
    pub payload_len: usize,
}

impl ItemHeader {
    /// Size of the whole encoded item.
    pub fn total(&self) -> Result<usize, RlpError> {
        self.prefix_len
            .checked_add(self.payload_len)
            .ok_or(RlpError::InputTooLong)
    }
}

type Lookahead = fn(&[u8]) -> Result<ItemHeader, RlpError>;

/// Recursive descent RLP decoder. Holds no state besides its limits, so a
/// single instance can be shared across threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    pub fn new(config: DecoderConfig) -> Self {
        Decoder { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode `bytes` as exactly one item. Any byte not accounted for by the
    /// prefixes is an error.
    pub fn decode(&self, bytes: &[u8]) -> Result<RlpItem, RlpError> {
        trace!(target: "rlp_decoder", len = bytes.len(), "decoding rlp item");

        if let Some(max) = self.config.max_input_len {
            if bytes.len() > max {
                let err = RlpError::SizeLimit {
                    len: bytes.len(),
                    max,
                };
                debug!(target: "rlp_decoder", %err, "rejected rlp input");
                return Err(err);
            }
        }

        self.decode_item(bytes, 0).inspect_err(|err| {
            debug!(target: "rlp_decoder", %err, len = bytes.len(), "rejected rlp input");
        })
    }

    fn decode_item(&self, bytes: &[u8], depth: usize) -> Result<RlpItem, RlpError> {
        let sign = *bytes.first().ok_or(RlpError::InputEmpty)?;

        match sign {
            0x00..=0x7f => {
                if bytes.len() != 1 {
                    return Err(RlpError::InputBad);
                }
                Ok(RlpItem::Bytes(vec![sign]))
            }
            0x80..=0xbf => {
                let payload = exact_payload(bytes)?;
                Ok(RlpItem::Bytes(payload.to_vec()))
            }
            0xc0..=0xf7 => {
                let payload = exact_payload(bytes)?;
                self.decode_list(payload, depth, short_item_header)
            }
            0xf8..=0xff => {
                let payload = exact_payload(bytes)?;
                self.decode_list(payload, depth, item_header)
            }
        }
    }

    fn decode_list(
        &self,
        mut payload: &[u8],
        depth: usize,
        lookahead: Lookahead,
    ) -> Result<RlpItem, RlpError> {
        let depth = depth + 1;
        if let Some(max) = self.config.max_depth {
            if depth > max {
                return Err(RlpError::DepthLimit { max });
            }
        }

        let mut items = Vec::new();
        while !payload.is_empty() {
            let len = lookahead(payload)?.total()?;
            let item = payload.get(..len).ok_or(RlpError::InputBad)?;
            items.push(self.decode_item(item, depth)?);
            payload = &payload[len..];
        }

        Ok(RlpItem::List(items))
    }
}

/// Decode `bytes` with the default limits.
pub fn decode(bytes: &[u8]) -> Result<RlpItem, RlpError> {
    Decoder::default().decode(bytes)
}

/// Read the prefix of the item starting at `bytes[0]` without decoding it.
/// Trailing bytes after the item are ignored.
pub fn item_header(bytes: &[u8]) -> Result<ItemHeader, RlpError> {
    let sign = *bytes.first().ok_or(RlpError::InputEmpty)?;

    let header = match sign {
        0x00..=0x7f => ItemHeader {
            prefix_len: 0,
            payload_len: 1,
        },
        0x80..=0xb7 => ItemHeader {
            prefix_len: 1,
            payload_len: (sign - 0x80) as usize,
        },
        0xb8..=0xbf => long_header(bytes, (sign - 0xb7) as usize)?,
        0xc0..=0xf7 => ItemHeader {
            prefix_len: 1,
            payload_len: (sign - 0xc0) as usize,
        },
        0xf8..=0xff => long_header(bytes, (sign - 0xf7) as usize)?,
    };

    Ok(header)
}

/// Lookahead used inside short lists. A list of at most 55 bytes cannot hold a
/// canonically encoded long item, so long-form signs are rejected.
pub fn short_item_header(bytes: &[u8]) -> Result<ItemHeader, RlpError> {
    let sign = *bytes.first().ok_or(RlpError::InputEmpty)?;

    match sign {
        0xb8..=0xbf | 0xf8..=0xff => Err(RlpError::InputBad),
        _ => item_header(bytes),
    }
}

fn long_header(bytes: &[u8], len_of_len: usize) -> Result<ItemHeader, RlpError> {
    let len_bytes = bytes
        .get(1..1 + len_of_len)
        .ok_or(RlpError::InputBad)?;

    Ok(ItemHeader {
        prefix_len: 1 + len_of_len,
        payload_len: parse_be_len(len_bytes)?,
    })
}

/// Payload of a string or list item, which must span the rest of `bytes`.
fn exact_payload(bytes: &[u8]) -> Result<&[u8], RlpError> {
    let header = item_header(bytes)?;
    if bytes.len() != header.total()? {
        return Err(RlpError::InputBad);
    }
    Ok(&bytes[header.prefix_len..])
}

/// Big-endian length field of 1 to 8 bytes.
fn parse_be_len(len_bytes: &[u8]) -> Result<usize, RlpError> {
    if len_bytes.len() > MAX_LEN_OF_LEN {
        return Err(RlpError::InputTooLong);
    }

    let len = len_bytes
        .iter()
        .try_fold(0u64, |acc, b| acc.checked_mul(256)?.checked_add(*b as u64))
        .ok_or(RlpError::InputTooLong)?;

    usize::try_from(len).map_err(|_| RlpError::InputTooLong)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(b: &[u8]) -> RlpItem {
        RlpItem::Bytes(b.to_vec())
    }

    #[test]
    fn decode_dog() {
        let dog_bites = "dog".as_bytes();
        let mut dog_rlp = vec![0x83];
        dog_rlp.extend_from_slice(dog_bites);

        assert_eq!(decode(&dog_rlp).unwrap(), bytes(b"dog"));
    }

    #[test]
    fn decode_cat_dog_list() {
        let rlp = [0xc8, 0x83, b'c', b'a', b't', 0x83, b'd', b'o', b'g'];

        assert_eq!(
            decode(&rlp).unwrap(),
            RlpItem::List(vec![bytes(b"cat"), bytes(b"dog")])
        );
    }

    #[test]
    fn decode_empty_string() {
        assert_eq!(decode(&[0x80]).unwrap(), bytes(&[]));
    }

    #[test]
    fn decode_empty_list() {
        assert_eq!(decode(&[0xc0]).unwrap(), RlpItem::empty_list());
    }

    #[test]
    fn decode_empty_input() {
        assert_eq!(decode(&[]), Err(RlpError::InputEmpty));
    }

    #[test]
    fn single_bytes() {
        for b in 0x00..=0x7fu8 {
            assert_eq!(decode(&[b]).unwrap(), bytes(&[b]));
            assert_eq!(decode(&[b, 0x00]), Err(RlpError::InputBad));
        }
    }

    #[test]
    fn decode_two_bytes() {
        assert_eq!(decode(&[0x82, 0x04, 0x00]).unwrap(), bytes(&[0x04, 0x00]));
    }

    #[test]
    fn decode_three_set_repr() {
        let rlp = [0xc7, 0xc0, 0xc1, 0xc0, 0xc3, 0xc0, 0xc1, 0xc0];

        assert_eq!(
            decode(&rlp).unwrap(),
            RlpItem::List(vec![
                RlpItem::empty_list(),
                RlpItem::List(vec![RlpItem::empty_list()]),
                RlpItem::List(vec![
                    RlpItem::empty_list(),
                    RlpItem::List(vec![RlpItem::empty_list()]),
                ]),
            ])
        );
    }

    #[test]
    fn decode_lorem_ipsum() {
        let lorem = b"Lorem ipsum dolor sit amet, consectetur adipisicing elit";
        assert_eq!(lorem.len(), 56);

        let mut rlp = vec![0xb8, 0x38];
        rlp.extend_from_slice(lorem);

        assert_eq!(decode(&rlp).unwrap(), bytes(lorem));
    }

    #[test]
    fn long_string_in_short_form() {
        let mut rlp = vec![0xb7];
        rlp.extend_from_slice(&[b'a'; 56]);

        assert_eq!(decode(&rlp), Err(RlpError::InputBad));
    }

    #[test]
    fn length_mismatch() {
        #[rustfmt::skip]
        let tests = [
            // short string, one byte missing
            &[0x83, b'd', b'o'][..],
            // short string, one byte too many
            &[0x83, b'd', b'o', b'g', b's'][..],
            // long string, length field cut short
            &[0xb9, 0x01][..],
            // long string, payload cut short
            &[0xb8, 0x38, 0x00][..],
            // short list, child overruns the payload
            &[0xc3, 0x83, b'd', b'o'][..],
            // long list, declared payload longer than the input
            &[0xf8, 0x38, 0xc0][..],
            // trailing bytes after a complete list
            &[0xc0, 0xc0][..],
        ];

        for (i, bytes) in tests.into_iter().enumerate() {
            println!("{i}...");

            assert_eq!(decode(bytes), Err(RlpError::InputBad));

            println!("ok");
        }
    }

    #[test]
    fn long_list_child_overruns_payload() {
        // 56 byte payload holding a string that declares 60 bytes
        let mut rlp = vec![0xf8, 0x38, 0xb8, 0x3c];
        rlp.extend_from_slice(&[b'a'; 54]);

        assert_eq!(decode(&rlp), Err(RlpError::InputBad));
    }

    #[test]
    fn short_list_rejects_long_children() {
        // a 1 byte string wrapped in the long string form
        assert_eq!(decode(&[0xc3, 0xb8, 0x01, 0x00]), Err(RlpError::InputBad));
        assert_eq!(decode(&[0xc2, 0xf8, 0x00]), Err(RlpError::InputBad));
    }

    #[test]
    fn long_list_accepts_long_children() {
        assert_eq!(
            decode(&[0xf8, 0x03, 0xb8, 0x01, 0x00]).unwrap(),
            RlpItem::List(vec![bytes(&[0x00])])
        );
    }

    #[test]
    fn long_list_of_short_strings() {
        let mut rlp = vec![0xf8, 60];
        for _ in 0..15 {
            rlp.extend_from_slice(&[0x83, b'c', b'a', b't']);
        }

        let item = decode(&rlp).unwrap();
        assert_eq!(item.len(), 15);
        assert!(item
            .as_list()
            .unwrap()
            .iter()
            .all(|child| child == &bytes(b"cat")));
    }

    #[test]
    fn nested_single_bytes() {
        let rlp = [201, 59, 59, 59, 59, 0, 0, 128, 59, 59];

        assert_eq!(
            decode(&rlp).unwrap(),
            RlpItem::List(vec![
                bytes(&[59]),
                bytes(&[59]),
                bytes(&[59]),
                bytes(&[59]),
                bytes(&[0]),
                bytes(&[0]),
                bytes(&[]),
                bytes(&[59]),
                bytes(&[59]),
            ])
        );
    }

    #[test]
    fn array_with_trailing() {
        let rlp = [205, 128, 59, 128, 59, 132, 0, 59, 59, 201, 128, 59, 59, 128];

        assert_eq!(
            decode(&rlp).unwrap(),
            RlpItem::List(vec![
                bytes(&[]),
                bytes(&[59]),
                bytes(&[]),
                bytes(&[59]),
                bytes(&[0, 59, 59, 201]),
                bytes(&[]),
                bytes(&[59]),
                bytes(&[59]),
                bytes(&[]),
            ])
        );
    }

    #[test]
    fn headers() {
        assert_eq!(
            item_header(&[0x05]).unwrap(),
            ItemHeader {
                prefix_len: 0,
                payload_len: 1
            }
        );
        assert_eq!(
            item_header(&[0x83, b'd', b'o', b'g', 0xff]).unwrap(),
            ItemHeader {
                prefix_len: 1,
                payload_len: 3
            }
        );
        assert_eq!(
            item_header(&[0xb9, 0x01, 0x00]).unwrap(),
            ItemHeader {
                prefix_len: 3,
                payload_len: 256
            }
        );
        assert_eq!(
            item_header(&[0xf8, 0x38]).unwrap(),
            ItemHeader {
                prefix_len: 2,
                payload_len: 56
            }
        );
        assert_eq!(item_header(&[0xc8]).unwrap().total(), Ok(9));
        assert_eq!(item_header(&[]), Err(RlpError::InputEmpty));
        assert_eq!(item_header(&[0xba, 0x01]), Err(RlpError::InputBad));

        assert_eq!(short_item_header(&[0xc1]).unwrap().total(), Ok(2));
        assert_eq!(short_item_header(&[0xb8, 0x38]), Err(RlpError::InputBad));
        assert_eq!(short_item_header(&[]), Err(RlpError::InputEmpty));
    }

    #[test]
    fn length_of_length_bounds() {
        assert_eq!(parse_be_len(&[0x01, 0x00]), Ok(256));
        assert_eq!(parse_be_len(&[0xff; 9]), Err(RlpError::InputTooLong));
        assert_eq!(parse_be_len(&[0x00; 9]), Err(RlpError::InputTooLong));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn declared_length_overflows() {
        // usize::MAX payload, the prefix pushes the total past usize::MAX
        let rlp = [0xbf, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
        assert_eq!(decode(&rlp), Err(RlpError::InputTooLong));
        assert_eq!(
            item_header(&rlp).unwrap().total(),
            Err(RlpError::InputTooLong)
        );

        let rlp = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
        assert_eq!(decode(&rlp), Err(RlpError::InputTooLong));

        // representable but absurdly long, fails on the length check
        let rlp = [0xbf, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x00];
        assert_eq!(decode(&rlp), Err(RlpError::InputBad));
    }

    #[test]
    fn depth_limit() {
        // [[[]]]
        let rlp = [0xc2, 0xc1, 0xc0];

        let decoder = Decoder::new(DecoderConfig::default().with_max_depth(3));
        assert!(decoder.decode(&rlp).is_ok());

        let decoder = Decoder::new(DecoderConfig::default().with_max_depth(2));
        assert_eq!(decoder.decode(&rlp), Err(RlpError::DepthLimit { max: 2 }));

        let decoder = Decoder::new(DecoderConfig::default().with_max_depth(0));
        assert_eq!(decoder.decode(&[0x80]), Ok(bytes(&[])));
        assert_eq!(decoder.decode(&[0xc0]), Err(RlpError::DepthLimit { max: 0 }));
    }

    #[test]
    fn deep_nesting() {
        // 1100 nested single element lists around an empty one
        let depth = 1100;
        let mut rlp = vec![0xc0];
        for _ in 0..depth {
            let len = rlp.len();
            let mut outer = if len <= 55 {
                vec![0xc0 + len as u8]
            } else if len <= 0xff {
                vec![0xf8, len as u8]
            } else {
                vec![0xf9, (len >> 8) as u8, len as u8]
            };
            outer.append(&mut rlp);
            rlp = outer;
        }

        assert_eq!(
            decode(&rlp),
            Err(RlpError::DepthLimit {
                max: DEFAULT_MAX_DEPTH
            })
        );

        let mut item = Decoder::new(DecoderConfig::unbounded())
            .decode(&rlp)
            .unwrap();
        for _ in 0..depth {
            item = item.into_list().unwrap().remove(0);
        }
        assert_eq!(item, RlpItem::empty_list());
    }

    #[test]
    fn size_limit() {
        let decoder = Decoder::new(DecoderConfig::default().with_max_input_len(4));
        assert_eq!(decoder.decode(&[0x83, b'd', b'o', b'g']), Ok(bytes(b"dog")));
        assert_eq!(
            decoder.decode(&[0x84, b'd', b'o', b'g', b's']),
            Err(RlpError::SizeLimit { len: 5, max: 4 })
        );
    }

    #[test]
    fn decoding_is_deterministic() {
        let rlp = [0xc7, 0xc0, 0xc1, 0xc0, 0xc3, 0xc0, 0xc1, 0xc0];
        assert_eq!(decode(&rlp), decode(&rlp));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_from_json() {
        let config: DecoderConfig = serde_json::from_str(r#"{"max_input_len":1024}"#).unwrap();
        assert_eq!(
            config,
            DecoderConfig {
                max_depth: Some(DEFAULT_MAX_DEPTH),
                max_input_len: Some(1024),
            }
        );
    }
}
