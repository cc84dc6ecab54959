//! Minimal contract-call encoding: selector plus head/tail argument layout.

use primitive_types::U256;

use super::keccak256;
use crate::shared::Address;

const WORD: usize = 32;

/// One call argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Address(Address),
    Uint(U256),
    /// Signed 256-bit integer; encoded in two's complement.
    Int(i128),
    /// Dynamic `bytes`.
    Bytes(Vec<u8>),
}

impl Token {
    fn head_word(&self) -> [u8; WORD] {
        let mut word = [0u8; WORD];
        match self {
            Token::Address(addr) => word[WORD - Address::LEN..].copy_from_slice(addr.as_bytes()),
            Token::Uint(v) => v.to_big_endian(&mut word),
            Token::Int(v) => {
                let fill = if *v < 0 { 0xff } else { 0x00 };
                word[..WORD - 16].fill(fill);
                word[WORD - 16..].copy_from_slice(&v.to_be_bytes());
            }
            Token::Bytes(_) => {}
        }
        word
    }
}

/// First four bytes of the Keccak-256 of a canonical function signature.
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Encode a full call: selector, one head word per argument, then the tails
/// of dynamic arguments in order.
pub fn encode_call(signature: &str, tokens: &[Token]) -> Vec<u8> {
    let mut head = Vec::with_capacity(tokens.len() * WORD);
    let mut tail = Vec::new();
    let head_len = tokens.len() * WORD;

    for token in tokens {
        match token {
            Token::Bytes(bytes) => {
                head.extend_from_slice(&uint_word(head_len + tail.len()));
                tail.extend_from_slice(&uint_word(bytes.len()));
                tail.extend_from_slice(&pad_right(bytes));
            }
            _ => head.extend_from_slice(&token.head_word()),
        }
    }

    let mut data = Vec::with_capacity(4 + head.len() + tail.len());
    data.extend_from_slice(&function_selector(signature));
    data.extend_from_slice(&head);
    data.extend_from_slice(&tail);
    data
}

fn uint_word(value: usize) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    U256::from(value).to_big_endian(&mut word);
    word
}

fn pad_right(value: &[u8]) -> Vec<u8> {
    let padded = value.len().div_ceil(WORD) * WORD;
    let mut out = value.to_vec();
    out.resize(padded, 0);
    out
}
