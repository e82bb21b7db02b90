//! Classification and decoding of recognized message payloads.
//!
//! Exactly three Babylon message schemas are recognized; everything else is
//! [`DecodedMsg::Unrecognized`]. Dispatch goes through [`DECODERS`], a fixed
//! tag-to-decoder table, so supporting a fourth schema is a table edit rather
//! than a control-flow change.
//!
//! Rendered payloads serialize byte fields as base64 strings with keys in
//! struct declaration order, so dumps are diffable across runs.

use crate::consts::{MSG_ADD_COVENANT_SIGS, MSG_ADD_FINALITY_SIG, MSG_CREATE_BTC_DELEGATION};
use crate::envelope::Any;
use crate::error::ExtractError;
use prost::Message;
use serde::Serialize;

mod base64_bytes {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use serde::Serializer;
    use serde::ser::SerializeSeq;

    pub fn serialize<S: Serializer>(bytes: &Vec<u8>, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn serialize_repeated<S: Serializer>(
        items: &Vec<Vec<u8>>,
        ser: S,
    ) -> Result<S::Ok, S::Error> {
        let mut seq = ser.serialize_seq(Some(items.len()))?;
        for item in items {
            seq.serialize_element(&STANDARD.encode(item))?;
        }
        seq.end()
    }
}

/// Covenant committee member adding its signatures over a delegation's
/// slashing and unbonding transactions.
#[derive(Clone, PartialEq, Message, Serialize)]
pub struct MsgAddCovenantSigs {
    #[prost(string, tag = "1")]
    pub signer: String,
    #[prost(bytes = "vec", tag = "2")]
    #[serde(serialize_with = "base64_bytes::serialize")]
    pub pk: Vec<u8>,
    #[prost(string, tag = "3")]
    pub staking_tx_hash: String,
    #[prost(bytes = "vec", repeated, tag = "4")]
    #[serde(serialize_with = "base64_bytes::serialize_repeated")]
    pub slashing_tx_sigs: Vec<Vec<u8>>,
    #[prost(bytes = "vec", tag = "5")]
    #[serde(serialize_with = "base64_bytes::serialize")]
    pub unbonding_tx_sig: Vec<u8>,
    #[prost(bytes = "vec", repeated, tag = "6")]
    #[serde(serialize_with = "base64_bytes::serialize_repeated")]
    pub slashing_unbonding_tx_sigs: Vec<Vec<u8>>,
}

/// Finality provider voting on a block.
#[derive(Clone, PartialEq, Message, Serialize)]
pub struct MsgAddFinalitySig {
    #[prost(string, tag = "1")]
    pub signer: String,
    #[prost(bytes = "vec", tag = "2")]
    #[serde(serialize_with = "base64_bytes::serialize")]
    pub fp_btc_pk: Vec<u8>,
    #[prost(uint64, tag = "3")]
    pub block_height: u64,
    #[prost(bytes = "vec", tag = "4")]
    #[serde(serialize_with = "base64_bytes::serialize")]
    pub pub_rand: Vec<u8>,
    #[prost(message, optional, tag = "5")]
    pub proof: Option<Proof>,
    #[prost(bytes = "vec", tag = "6")]
    #[serde(serialize_with = "base64_bytes::serialize")]
    pub block_app_hash: Vec<u8>,
    #[prost(bytes = "vec", tag = "7")]
    #[serde(serialize_with = "base64_bytes::serialize")]
    pub finality_sig: Vec<u8>,
}

/// Merkle inclusion proof for a public randomness commitment.
#[derive(Clone, PartialEq, Message, Serialize)]
pub struct Proof {
    #[prost(int64, tag = "1")]
    pub total: i64,
    #[prost(int64, tag = "2")]
    pub index: i64,
    #[prost(bytes = "vec", tag = "3")]
    #[serde(serialize_with = "base64_bytes::serialize")]
    pub leaf_hash: Vec<u8>,
    #[prost(bytes = "vec", repeated, tag = "4")]
    #[serde(serialize_with = "base64_bytes::serialize_repeated")]
    pub aunts: Vec<Vec<u8>>,
}

/// Staker registering a new BTC delegation.
#[derive(Clone, PartialEq, Message, Serialize)]
pub struct MsgCreateBTCDelegation {
    #[prost(string, tag = "1")]
    pub signer: String,
    #[prost(message, optional, tag = "2")]
    pub pop: Option<ProofOfPossession>,
    #[prost(bytes = "vec", tag = "3")]
    #[serde(serialize_with = "base64_bytes::serialize")]
    pub btc_pk: Vec<u8>,
    #[prost(bytes = "vec", repeated, tag = "4")]
    #[serde(serialize_with = "base64_bytes::serialize_repeated")]
    pub fp_btc_pk_list: Vec<Vec<u8>>,
    #[prost(uint32, tag = "5")]
    pub staking_time: u32,
    #[prost(int64, tag = "6")]
    pub staking_value: i64,
    #[prost(bytes = "vec", tag = "7")]
    #[serde(serialize_with = "base64_bytes::serialize")]
    pub staking_tx: Vec<u8>,
    #[prost(bytes = "vec", tag = "8")]
    #[serde(serialize_with = "base64_bytes::serialize")]
    pub slashing_tx: Vec<u8>,
    #[prost(bytes = "vec", tag = "9")]
    #[serde(serialize_with = "base64_bytes::serialize")]
    pub delegator_slashing_sig: Vec<u8>,
    #[prost(uint32, tag = "10")]
    pub unbonding_time: u32,
    #[prost(bytes = "vec", tag = "11")]
    #[serde(serialize_with = "base64_bytes::serialize")]
    pub unbonding_tx: Vec<u8>,
    #[prost(int64, tag = "12")]
    pub unbonding_value: i64,
    #[prost(bytes = "vec", tag = "13")]
    #[serde(serialize_with = "base64_bytes::serialize")]
    pub unbonding_slashing_tx: Vec<u8>,
    #[prost(bytes = "vec", tag = "14")]
    #[serde(serialize_with = "base64_bytes::serialize")]
    pub delegator_unbonding_slashing_sig: Vec<u8>,
}

/// Proof that the staker controls the BTC key it delegates with.
#[derive(Clone, PartialEq, Message, Serialize)]
pub struct ProofOfPossession {
    #[prost(int32, tag = "1")]
    pub btc_sig_type: i32,
    #[prost(bytes = "vec", tag = "2")]
    #[serde(serialize_with = "base64_bytes::serialize")]
    pub btc_sig: Vec<u8>,
}

/// A classified message payload.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedMsg {
    CovenantSigs(MsgAddCovenantSigs),
    FinalitySig(MsgAddFinalitySig),
    CreateDelegation(MsgCreateBTCDelegation),
    Unrecognized,
}

type PayloadDecoder = fn(&[u8]) -> Result<DecodedMsg, prost::DecodeError>;

/// Registry of recognized type URLs and their payload decoders.
const DECODERS: &[(&str, PayloadDecoder)] = &[
    (MSG_ADD_COVENANT_SIGS, |b| {
        MsgAddCovenantSigs::decode(b).map(DecodedMsg::CovenantSigs)
    }),
    (MSG_ADD_FINALITY_SIG, |b| {
        MsgAddFinalitySig::decode(b).map(DecodedMsg::FinalitySig)
    }),
    (MSG_CREATE_BTC_DELEGATION, |b| {
        MsgCreateBTCDelegation::decode(b).map(DecodedMsg::CreateDelegation)
    }),
];

/// Dispatch a message on its type URL.
///
/// Unknown tags are not an error: they classify as `Unrecognized` and carry
/// no payload. A recognized tag whose bytes do not match the schema fails the
/// enclosing height with `Decode`.
pub fn classify(msg: &Any) -> Result<DecodedMsg, ExtractError> {
    match DECODERS.iter().find(|(tag, _)| *tag == msg.type_url) {
        Some((tag, decode)) => {
            decode(&msg.value).map_err(|source| ExtractError::Decode {
                container: (*tag).to_string(),
                source,
            })
        }
        None => Ok(DecodedMsg::Unrecognized),
    }
}

impl DecodedMsg {
    /// Render the payload as indented JSON, or `None` for unrecognized types.
    pub fn render(&self) -> Result<Option<String>, ExtractError> {
        let rendered = match self {
            DecodedMsg::CovenantSigs(m) => serde_json::to_string_pretty(m),
            DecodedMsg::FinalitySig(m) => serde_json::to_string_pretty(m),
            DecodedMsg::CreateDelegation(m) => serde_json::to_string_pretty(m),
            DecodedMsg::Unrecognized => return Ok(None),
        };
        rendered.map(Some).map_err(ExtractError::Render)
    }
}
