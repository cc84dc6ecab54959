//! Signature triple and its 65-byte compact wire form.
//!
//! Layout of the compact form:
//!
//! ```text
//! offset 0       v   (recovery indicator)
//! offset 1..33   r   (32-byte big-endian scalar)
//! offset 33..65  s   (32-byte big-endian scalar)
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Length of the compact signature blob.
pub const COMPACT_SIGNATURE_LEN: usize = 65;

/// Which signature wire-encoding the ledger expects.
///
/// Fixed for the lifetime of a deployment; never chosen per request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CryptoMode {
    /// secp256k1: signature fields are `v, r, s`.
    #[default]
    Ecdsa,
    /// National-standard mode: signature fields are `public key, r, s`.
    Sm2,
}

/// A signature produced by the client over the unsigned encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureData {
    pub v: u8,
    pub r: [u8; 32],
    pub s: [u8; 32],
    /// Signer public key; only consulted under [`CryptoMode::Sm2`].
    pub public_key: Option<Vec<u8>>,
}

impl SignatureData {
    pub fn new(v: u8, r: [u8; 32], s: [u8; 32]) -> Self {
        Self {
            v,
            r,
            s,
            public_key: None,
        }
    }

    pub fn with_public_key(mut self, public_key: Vec<u8>) -> Self {
        self.public_key = Some(public_key);
        self
    }

    /// Pack into the fixed 65-byte compact form.
    pub fn to_compact(&self) -> [u8; COMPACT_SIGNATURE_LEN] {
        let mut out = [0u8; COMPACT_SIGNATURE_LEN];
        out[0] = self.v;
        out[1..33].copy_from_slice(&self.r);
        out[33..65].copy_from_slice(&self.s);
        out
    }

    /// Unpack the 65-byte compact form. Any other length is rejected.
    pub fn from_compact(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() != COMPACT_SIGNATURE_LEN {
            return Err(CodecError::MalformedSignature {
                actual: bytes.len(),
            });
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[1..33]);
        s.copy_from_slice(&bytes[33..65]);
        Ok(Self::new(bytes[0], r, s))
    }
}

/// Strip leading zero bytes; an all-zero input becomes empty.
pub fn trim_leading_zeroes(data: &[u8]) -> &[u8] {
    let start = data.iter().position(|b| *b != 0).unwrap_or(data.len());
    &data[start..]
}
