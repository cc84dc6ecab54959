//! Domain modules and the request shape they receive.
//!
//! - `function`: the operation catalogue and per-operation capabilities
//! - `asset`: asset argument types and the [`asset::AssetService`] contract
//! - `weid`: the built-in identity-creation call encoder

pub mod asset;
pub mod function;
pub mod weid;

pub use function::{Capabilities, FunctionName};

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shared::serde_util::dec_u256;
use crate::shared::Address;

/// Transaction-specific request fields.
///
/// The encode phase only reads `nonce`; the send phase echoes back what the
/// encode phase returned together with the client's signature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionArg {
    /// Anti-replay token as a decimal string. Generated when absent in the
    /// encode phase; required in the send phase.
    #[serde(default, with = "dec_u256::option", skip_serializing_if = "Option::is_none")]
    pub nonce: Option<U256>,
    /// Hex call payload returned by the encode phase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Base64 of the 65-byte compact signature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_message: Option<String>,
    /// Block limit the client signed over.
    #[serde(default, with = "dec_u256::option", skip_serializing_if = "Option::is_none")]
    pub block_limit: Option<U256>,
    /// Chain id the client signed over.
    #[serde(default, with = "dec_u256::option", skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<U256>,
    /// Hex public key; required when the deployment signs with sm2.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    /// Explicit destination, overriding the one derived from the function arg.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    /// Opaque value echoed back in the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loopback: Option<Value>,
}

/// A decoded request handed to a domain service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReqInput<T> {
    pub function_arg: T,
    pub transaction_arg: TransactionArg,
    pub function_name: FunctionName,
    pub v: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_arg_from_client_json() {
        let json = r#"{
            "nonce": "1474800601011307365506121304576347479508653499989424346408870777580045262325",
            "data": "0xabcd",
            "signedMessage": "AAEC",
            "blockLimit": 1600,
            "chainId": "20200",
            "loopback": {"traceId": 7}
        }"#;
        let arg: TransactionArg = serde_json::from_str(json).unwrap();
        assert!(arg.nonce.unwrap() > U256::from(u64::MAX));
        assert_eq!(arg.block_limit, Some(U256::from(1600u64)));
        assert_eq!(arg.chain_id, Some(U256::from(20200u64)));
        assert_eq!(arg.data.as_deref(), Some("0xabcd"));
        assert_eq!(arg.loopback, Some(serde_json::json!({"traceId": 7})));
        assert!(arg.public_key.is_none());
        assert!(arg.to.is_none());
    }

    #[test]
    fn test_transaction_arg_rejects_bad_nonce() {
        let json = r#"{"nonce": "12ab"}"#;
        assert!(serde_json::from_str::<TransactionArg>(json).is_err());
    }

    #[test]
    fn test_empty_transaction_arg() {
        let arg: TransactionArg = serde_json::from_str("{}").unwrap();
        assert_eq!(arg, TransactionArg::default());
        assert_eq!(serde_json::to_string(&arg).unwrap(), "{}");
    }
}
