//! Cosmos SDK transaction envelope decoding.
//!
//! A raw transaction off the wire is base64 text wrapping a serialized
//! `TxRaw`: body bytes, auth info bytes, and signatures. The raw envelope and
//! the auth info section pass through the strict unknown-field gate before
//! being decoded — the gate descends into auth info's nested messages, since
//! prost would otherwise skip an unknown nested field without complaint. The
//! body is decoded directly and its message order is preserved as encoded.

use crate::error::ExtractError;
use crate::strict::{StrictField, StrictSchema, reject_unknown_fields};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use prost::Message;

/// A protobuf `Any`: a type URL naming the payload schema plus the payload
/// bytes themselves.
#[derive(Clone, PartialEq, Message)]
pub struct Any {
    #[prost(string, tag = "1")]
    pub type_url: String,
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
}

/// Outer signed envelope as it appears on the wire.
#[derive(Clone, PartialEq, Message)]
pub struct TxRaw {
    #[prost(bytes = "vec", tag = "1")]
    pub body_bytes: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub auth_info_bytes: Vec<u8>,
    #[prost(bytes = "vec", repeated, tag = "3")]
    pub signatures: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, Message)]
pub struct TxBody {
    #[prost(message, repeated, tag = "1")]
    pub messages: Vec<Any>,
    #[prost(string, tag = "2")]
    pub memo: String,
    #[prost(uint64, tag = "3")]
    pub timeout_height: u64,
    #[prost(message, repeated, tag = "1023")]
    pub extension_options: Vec<Any>,
    #[prost(message, repeated, tag = "2047")]
    pub non_critical_extension_options: Vec<Any>,
}

#[derive(Clone, PartialEq, Message)]
pub struct AuthInfo {
    #[prost(message, repeated, tag = "1")]
    pub signer_infos: Vec<SignerInfo>,
    #[prost(message, optional, tag = "2")]
    pub fee: Option<Fee>,
}

#[derive(Clone, PartialEq, Message)]
pub struct SignerInfo {
    #[prost(message, optional, tag = "1")]
    pub public_key: Option<Any>,
    #[prost(message, optional, tag = "2")]
    pub mode_info: Option<ModeInfo>,
    #[prost(uint64, tag = "3")]
    pub sequence: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct ModeInfo {
    #[prost(oneof = "mode_info::Sum", tags = "1, 2")]
    pub sum: Option<mode_info::Sum>,
}

pub mod mode_info {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Sum {
        #[prost(message, tag = "1")]
        Single(super::ModeInfoSingle),
        #[prost(message, tag = "2")]
        Multi(super::ModeInfoMulti),
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct ModeInfoSingle {
    #[prost(int32, tag = "1")]
    pub mode: i32,
}

#[derive(Clone, PartialEq, Message)]
pub struct ModeInfoMulti {
    #[prost(message, optional, tag = "1")]
    pub bitarray: Option<CompactBitArray>,
    #[prost(message, repeated, tag = "2")]
    pub mode_infos: Vec<ModeInfo>,
}

#[derive(Clone, PartialEq, Message)]
pub struct CompactBitArray {
    #[prost(uint32, tag = "1")]
    pub extra_bits_stored: u32,
    #[prost(bytes = "vec", tag = "2")]
    pub elems: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Fee {
    #[prost(message, repeated, tag = "1")]
    pub amount: Vec<Coin>,
    #[prost(uint64, tag = "2")]
    pub gas_limit: u64,
    #[prost(string, tag = "3")]
    pub payer: String,
    #[prost(string, tag = "4")]
    pub granter: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct Coin {
    #[prost(string, tag = "1")]
    pub denom: String,
    #[prost(string, tag = "2")]
    pub amount: String,
}

// Schemas for the strict gate. TxRaw's fields are all bytes: body and auth
// info are separate serialized messages, checked at their own decode step,
// the same split the wire format itself makes.
static TX_RAW_SCHEMA: StrictSchema = StrictSchema {
    container: "TxRaw",
    fields: &[
        StrictField { number: 1, nested: None },
        StrictField { number: 2, nested: None },
        StrictField { number: 3, nested: None },
    ],
};

static AUTH_INFO_SCHEMA: StrictSchema = StrictSchema {
    container: "AuthInfo",
    fields: &[
        StrictField { number: 1, nested: Some(&SIGNER_INFO_SCHEMA) },
        StrictField { number: 2, nested: Some(&FEE_SCHEMA) },
    ],
};

static SIGNER_INFO_SCHEMA: StrictSchema = StrictSchema {
    container: "SignerInfo",
    fields: &[
        StrictField { number: 1, nested: Some(&ANY_SCHEMA) },
        StrictField { number: 2, nested: Some(&MODE_INFO_SCHEMA) },
        StrictField { number: 3, nested: None },
    ],
};

// Any.value holds a schema only known through the type URL; the gate treats
// it as opaque bytes and the payload decoders validate it.
static ANY_SCHEMA: StrictSchema = StrictSchema {
    container: "Any",
    fields: &[
        StrictField { number: 1, nested: None },
        StrictField { number: 2, nested: None },
    ],
};

static MODE_INFO_SCHEMA: StrictSchema = StrictSchema {
    container: "ModeInfo",
    fields: &[
        StrictField { number: 1, nested: Some(&MODE_INFO_SINGLE_SCHEMA) },
        StrictField { number: 2, nested: Some(&MODE_INFO_MULTI_SCHEMA) },
    ],
};

static MODE_INFO_SINGLE_SCHEMA: StrictSchema = StrictSchema {
    container: "ModeInfo.Single",
    fields: &[StrictField { number: 1, nested: None }],
};

static MODE_INFO_MULTI_SCHEMA: StrictSchema = StrictSchema {
    container: "ModeInfo.Multi",
    fields: &[
        StrictField { number: 1, nested: Some(&COMPACT_BIT_ARRAY_SCHEMA) },
        StrictField { number: 2, nested: Some(&MODE_INFO_SCHEMA) },
    ],
};

static COMPACT_BIT_ARRAY_SCHEMA: StrictSchema = StrictSchema {
    container: "CompactBitArray",
    fields: &[
        StrictField { number: 1, nested: None },
        StrictField { number: 2, nested: None },
    ],
};

static FEE_SCHEMA: StrictSchema = StrictSchema {
    container: "Fee",
    fields: &[
        StrictField { number: 1, nested: Some(&COIN_SCHEMA) },
        StrictField { number: 2, nested: None },
        StrictField { number: 3, nested: None },
        StrictField { number: 4, nested: None },
    ],
};

static COIN_SCHEMA: StrictSchema = StrictSchema {
    container: "Coin",
    fields: &[
        StrictField { number: 1, nested: None },
        StrictField { number: 2, nested: None },
    ],
};

/// Decoded transaction: body, auth info, and the untouched signatures.
#[derive(Debug, Clone, PartialEq)]
pub struct Tx {
    pub body: TxBody,
    pub auth_info: AuthInfo,
    pub signatures: Vec<Vec<u8>>,
}

fn decode_err(container: &str) -> impl FnOnce(prost::DecodeError) -> ExtractError + '_ {
    move |source| ExtractError::Decode {
        container: container.to_string(),
        source,
    }
}

/// Decode one base64 raw transaction into a [`Tx`].
///
/// Fails with `Encoding` on invalid base64, `UnknownField` if the raw
/// envelope or auth info carry a field outside their schema at any depth,
/// and `Decode` on any schema mismatch.
pub fn decode_tx(raw_base64: &str) -> Result<Tx, ExtractError> {
    let tx_bytes = STANDARD.decode(raw_base64)?;

    reject_unknown_fields(&TX_RAW_SCHEMA, &tx_bytes)?;
    let raw = TxRaw::decode(tx_bytes.as_slice()).map_err(decode_err("TxRaw"))?;

    let body = TxBody::decode(raw.body_bytes.as_slice()).map_err(decode_err("TxBody"))?;

    reject_unknown_fields(&AUTH_INFO_SCHEMA, &raw.auth_info_bytes)?;
    let auth_info =
        AuthInfo::decode(raw.auth_info_bytes.as_slice()).map_err(decode_err("AuthInfo"))?;

    Ok(Tx {
        body,
        auth_info,
        signatures: raw.signatures,
    })
}
