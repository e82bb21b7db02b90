//! Strict unknown-field gate for protobuf envelopes.
//!
//! Walks the wire format of a serialized message against a [`StrictSchema`]
//! and hard-fails on any field number the schema does not list, recursing
//! into message-typed fields so an unknown field buried inside a nested
//! container is caught too. This matters because prost itself skips
//! unrecognized fields silently; without the recursion a tampered nested
//! section would decode cleanly. This is a security and compatibility gate
//! over the signed envelope sections, not a best-effort parse.

use crate::error::ExtractError;
use bytes::Buf;
use prost::encoding::{DecodeContext, WireType, decode_key, decode_varint, skip_field};

/// Expected field layout of one message type.
pub struct StrictSchema {
    pub container: &'static str,
    pub fields: &'static [StrictField],
}

/// One known field: its number, and the schema to descend into when the
/// field is itself a message. Scalar and bytes fields leave `nested` unset
/// and are skipped, not decoded.
pub struct StrictField {
    pub number: u32,
    pub nested: Option<&'static StrictSchema>,
}

impl StrictSchema {
    fn field(&self, number: u32) -> Option<&StrictField> {
        self.fields.iter().find(|f| f.number == number)
    }

    fn decode_err(&self, source: prost::DecodeError) -> ExtractError {
        ExtractError::Decode {
            container: self.container.to_string(),
            source,
        }
    }
}

/// Scan `buf` as a serialized message and reject any field number `schema`
/// does not know about, at any depth reachable through message-typed fields.
pub fn reject_unknown_fields(schema: &StrictSchema, buf: &[u8]) -> Result<(), ExtractError> {
    let mut buf = buf;
    while buf.has_remaining() {
        let (number, wire_type) = decode_key(&mut buf).map_err(|e| schema.decode_err(e))?;

        let Some(field) = schema.field(number) else {
            return Err(ExtractError::UnknownField {
                container: schema.container,
                field: number,
            });
        };

        match (wire_type, field.nested) {
            (WireType::LengthDelimited, Some(nested)) => {
                let len = decode_varint(&mut buf).map_err(|e| schema.decode_err(e))? as usize;
                if buf.remaining() < len {
                    return Err(
                        schema.decode_err(prost::DecodeError::new("buffer underflow"))
                    );
                }
                reject_unknown_fields(nested, &buf[..len])?;
                buf.advance(len);
            }
            _ => skip_field(wire_type, number, &mut buf, DecodeContext::default())
                .map_err(|e| schema.decode_err(e))?,
        }
    }

    Ok(())
}
