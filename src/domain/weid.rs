//! Identity creation: builds the `createWeId` registry call from a public key.

use chrono::{DateTime, Utc};
use primitive_types::U512;
use serde_json::Value;

use crate::error::GatewayError;
use crate::shared::Address;
use crate::tx::abi::{encode_call, Token};
use crate::tx::keccak256;

pub const CREATE_WEID_SIGNATURE: &str = "createWeId(address,bytes,bytes,int256)";

/// Separator between the public key and the address in the auth blob.
const AUTH_SEPARATOR: char = '/';

/// Derive the account address of an uncompressed public key given as a
/// decimal integer: the trailing 20 bytes of Keccak-256 over its 64 bytes.
pub fn address_from_public_key(public_key: &str) -> Result<Address, GatewayError> {
    let key = U512::from_dec_str(public_key.trim())
        .map_err(|_| GatewayError::Input("publicKey is not a decimal integer".into()))?;
    if key.is_zero() {
        return Err(GatewayError::Input("publicKey is invalid".into()));
    }
    let mut bytes = [0u8; 64];
    key.to_big_endian(&mut bytes);
    Ok(Address::from_digest(&keccak256(&bytes)))
}

/// Build the call payload from a `{"publicKey": "<decimal>"}` argument.
///
/// `now` is truncated to whole seconds; the creation time is sent both as a
/// millisecond string and as an integer.
pub fn create_weid_payload(arg: &Value, now: DateTime<Utc>) -> Result<Vec<u8>, GatewayError> {
    let public_key = arg
        .get("publicKey")
        .and_then(Value::as_str)
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| GatewayError::Input("publicKey is required".into()))?;
    let address = address_from_public_key(public_key)?;

    let auth = format!("{}{}{}", public_key.trim(), AUTH_SEPARATOR, address);
    let created = i128::from(now.timestamp()) * 1000;

    tracing::debug!(address = %address, created, "Encoding createWeId call");

    Ok(encode_call(
        CREATE_WEID_SIGNATURE,
        &[
            Token::Address(address),
            Token::Bytes(auth.into_bytes()),
            Token::Bytes(created.to_string().into_bytes()),
            Token::Int(created),
        ],
    ))
}
