//! Envelope construction from request inputs and chain metadata.

use primitive_types::U256;
use rand::rngs::OsRng;
use rand::RngCore;

use super::RawTransaction;
use crate::chain::ChainMetadata;
use crate::error::GatewayError;
use crate::shared::Address;

/// Gas price ceiling. The ledger profile is effectively unmetered.
pub const GAS_PRICE: u64 = 99_999_999_999;

/// Gas limit. See [`GAS_PRICE`].
pub const GAS_LIMIT: u64 = 99_999_999_999;

/// Bit width of generated anti-replay tokens.
const TOKEN_BITS: usize = 250;

/// Draw a fresh 250-bit anti-replay token from the OS CSPRNG.
///
/// No cross-request coordination is needed: collisions are negligible.
pub fn random_token() -> U256 {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    // Clear the top 6 bits so the token fits in 250 bits.
    bytes[0] &= 0xff >> (256 - TOKEN_BITS);
    U256::from_big_endian(&bytes)
}

/// Builds unsigned envelopes, pulling chain id and block limit from the node.
#[derive(Clone)]
pub struct EnvelopeBuilder {
    metadata: ChainMetadata,
}

impl EnvelopeBuilder {
    pub fn new(metadata: ChainMetadata) -> Self {
        Self { metadata }
    }

    pub fn metadata(&self) -> &ChainMetadata {
        &self.metadata
    }

    /// Assemble an envelope with a freshly fetched block limit and chain id.
    ///
    /// Fails with [`GatewayError::BlockLimitUnavailable`] when the node cannot
    /// report its height; nothing is serialized in that case.
    pub async fn build(
        &self,
        token: U256,
        group_id: u64,
        payload: Vec<u8>,
        to: Option<Address>,
    ) -> Result<RawTransaction, GatewayError> {
        self.build_echoed(token, group_id, payload, to, None, None)
            .await
    }

    /// Like [`build`](Self::build), but reuses `block_limit` and `chain_id`
    /// when given.
    ///
    /// The send phase passes the values the client signed over so the
    /// rebuilt envelope is byte-identical to the signed one, even if the
    /// node's answers changed in between.
    pub async fn build_echoed(
        &self,
        token: U256,
        group_id: u64,
        payload: Vec<u8>,
        to: Option<Address>,
        block_limit: Option<U256>,
        chain_id: Option<U256>,
    ) -> Result<RawTransaction, GatewayError> {
        let block_limit = match block_limit {
            Some(limit) => limit,
            None => self
                .metadata
                .block_limit()
                .await
                .ok_or(GatewayError::BlockLimitUnavailable)?,
        };
        let chain_id = match chain_id {
            Some(id) => id,
            None => self.metadata.chain_id().await,
        };

        Ok(RawTransaction {
            nonce: token,
            gas_price: U256::from(GAS_PRICE),
            gas_limit: U256::from(GAS_LIMIT),
            block_limit,
            to,
            value: U256::zero(),
            data: payload,
            chain_id,
            group_id: U256::from(group_id),
            extra_data: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_token_fits_250_bits() {
        for _ in 0..64 {
            assert!(random_token().bits() <= TOKEN_BITS);
        }
    }

    #[test]
    fn test_random_tokens_differ() {
        assert_ne!(random_token(), random_token());
    }
}
