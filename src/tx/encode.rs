//! Canonical RLP encoding of transaction envelopes.
//!
//! Field order is fixed and shared with the ledger:
//!
//! ```text
//! [nonce, gasPrice, gasLimit, blockLimit, to, value, data,
//!  chainId, groupId, extraData, (v | publicKey), r, s]
//! ```
//!
//! Integers use the minimal big-endian form (zero is the empty string).
//! `to` and `extraData` are byte strings: when absent they are the empty string,
//! and a present address keeps all 20 bytes including leading zeros.

use rlp::RlpStream;

use super::signature::{trim_leading_zeroes, CryptoMode, SignatureData};
use super::RawTransaction;
use crate::error::CodecError;

/// Number of list items in an unsigned encoding.
pub const UNSIGNED_FIELD_COUNT: usize = 10;

/// Number of list items a signature appends.
pub const SIGNATURE_FIELD_COUNT: usize = 3;

pub fn encode_unsigned(tx: &RawTransaction) -> Vec<u8> {
    let mut stream = RlpStream::new_list(UNSIGNED_FIELD_COUNT);
    append_fields(&mut stream, tx);
    stream.out().to_vec()
}

pub fn encode_signed(
    tx: &RawTransaction,
    signature: &SignatureData,
    mode: CryptoMode,
) -> Result<Vec<u8>, CodecError> {
    let mut stream = RlpStream::new_list(UNSIGNED_FIELD_COUNT + SIGNATURE_FIELD_COUNT);
    append_fields(&mut stream, tx);
    match mode {
        CryptoMode::Ecdsa => {
            // v travels as a one-byte string, so v = 0 encodes as 0x00, not 0x80.
            stream.append(&vec![signature.v]);
        }
        CryptoMode::Sm2 => {
            let public_key = signature
                .public_key
                .as_deref()
                .ok_or(CodecError::MissingPublicKey)?;
            stream.append(&trim_leading_zeroes(public_key).to_vec());
        }
    }
    stream.append(&trim_leading_zeroes(&signature.r).to_vec());
    stream.append(&trim_leading_zeroes(&signature.s).to_vec());
    Ok(stream.out().to_vec())
}

fn append_fields(stream: &mut RlpStream, tx: &RawTransaction) {
    stream.append(&tx.nonce);
    stream.append(&tx.gas_price);
    stream.append(&tx.gas_limit);
    stream.append(&tx.block_limit);
    match &tx.to {
        Some(address) => stream.append(&address.as_bytes().to_vec()),
        None => stream.append_empty_data(),
    };
    stream.append(&tx.value);
    stream.append(&tx.data);
    stream.append(&tx.chain_id);
    stream.append(&tx.group_id);
    match &tx.extra_data {
        Some(extra) => stream.append(extra),
        None => stream.append_empty_data(),
    };
}
