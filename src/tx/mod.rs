//! Transaction envelopes: construction, signing round-trip, canonical encoding.
//!
//! The protocol runs in three phases:
//!
//! 1. [`EnvelopeBuilder`] assembles an unsigned [`RawTransaction`] and
//!    [`RawTransaction::encode`] produces the bytes the client signs.
//! 2. The client signs offline and returns a 65-byte compact signature
//!    ([`SignatureData::from_compact`]).
//! 3. [`RawTransaction::attach_signature`] yields a separate
//!    [`SignedTransaction`] whose encoding is submitted to the node.

pub mod abi;
pub mod builder;
pub mod encode;
pub mod signature;

pub use builder::{random_token, EnvelopeBuilder, GAS_LIMIT, GAS_PRICE};
pub use signature::{CryptoMode, SignatureData, COMPACT_SIGNATURE_LEN};

use primitive_types::U256;
use sha3::{Digest, Keccak256};

use crate::shared::Address;

/// An unsigned transaction envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTransaction {
    /// Anti-replay token.
    pub nonce: U256,
    pub gas_price: U256,
    pub gas_limit: U256,
    /// Height after which the ledger rejects the transaction.
    pub block_limit: U256,
    /// `None` means contract creation and encodes as an empty string, never as 0.
    pub to: Option<Address>,
    pub value: U256,
    pub data: Vec<u8>,
    pub chain_id: U256,
    pub group_id: U256,
    pub extra_data: Option<Vec<u8>>,
}

impl RawTransaction {
    /// Canonical encoding of the unsigned fields.
    pub fn encode(&self) -> Vec<u8> {
        encode::encode_unsigned(self)
    }

    /// Keccak-256 of the unsigned encoding; the digest an ECDSA client signs.
    pub fn signing_hash(&self) -> [u8; 32] {
        keccak256(&self.encode())
    }

    /// Produce a new signed envelope. `self` is left untouched.
    pub fn attach_signature(&self, signature: SignatureData) -> SignedTransaction {
        SignedTransaction {
            raw: self.clone(),
            signature,
        }
    }
}

/// A transaction envelope carrying its signature, ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub raw: RawTransaction,
    pub signature: SignatureData,
}

impl SignedTransaction {
    pub fn encode(&self, mode: CryptoMode) -> Result<Vec<u8>, crate::error::CodecError> {
        encode::encode_signed(&self.raw, &self.signature, mode)
    }

    /// Keccak-256 of the signed encoding, matching the node's hash in ECDSA mode.
    pub fn hash(&self, mode: CryptoMode) -> Result<[u8; 32], crate::error::CodecError> {
        Ok(keccak256(&self.encode(mode)?))
    }
}

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawTransaction {
        RawTransaction {
            nonce: U256::from(1u64),
            gas_price: GAS_PRICE.into(),
            gas_limit: GAS_LIMIT.into(),
            block_limit: U256::from(700u64),
            to: None,
            value: U256::zero(),
            data: vec![0xde, 0xad],
            chain_id: U256::one(),
            group_id: U256::one(),
            extra_data: None,
        }
    }

    #[test]
    fn test_attach_signature_leaves_original_untouched() {
        let unsigned = raw();
        let before = unsigned.encode();
        let signed = unsigned.attach_signature(SignatureData::new(27, [1; 32], [2; 32]));
        assert_eq!(unsigned.encode(), before);
        assert_eq!(signed.raw, unsigned);
    }

    #[test]
    fn test_keccak256_empty() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_signed_hash_differs_from_signing_hash() {
        let unsigned = raw();
        let signed = unsigned.attach_signature(SignatureData::new(27, [1; 32], [2; 32]));
        assert_ne!(signed.hash(CryptoMode::Ecdsa).unwrap(), unsigned.signing_hash());
    }
}
