//! Asset domain: non-fungible asset arguments and the service contract.
//!
//! The gateway never interprets asset semantics itself. It decodes the
//! request into one of the argument shapes below and hands it to an
//! [`AssetService`], which owns contract ABIs and business rules.

use async_trait::async_trait;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ReqInput;
use crate::error::ServiceError;
use crate::node::TransactionReceipt;
use crate::shared::serde_util::dec_u256;
use crate::shared::Address;

// ─── Argument shapes ─────────────────────────────────────────────────────────

/// Just the asset contract address; every other argument shape extends it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseAsset {
    #[serde(default)]
    pub asset_address: Option<Address>,
}

/// A single asset, used to construct, issue, transfer or look one up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bac005Info {
    #[serde(default)]
    pub asset_address: Option<Address>,
    #[serde(default, with = "dec_u256::option", skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_uri: Option<String>,
    /// Identity of the receiving party.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    /// Only meaningful for `construct`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    /// Only meaningful for `construct`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One entry of a batch operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bac005Item {
    #[serde(default, with = "dec_u256::option", skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// Many assets against the same contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bac005BatchInfo {
    #[serde(default)]
    pub asset_address: Option<Address>,
    #[serde(default)]
    pub object_list: Vec<Bac005Item>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// Paged listing, optionally scoped to one identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    #[serde(default)]
    pub asset_address: Option<Address>,
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub num: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub we_id: Option<String>,
}

/// Per-identity lookup on one contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseQuery {
    #[serde(default)]
    pub asset_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub we_id: Option<String>,
}

/// Several asset contracts at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAddressList {
    #[serde(default)]
    pub asset_address_list: Vec<Address>,
}

// ─── Service contract ────────────────────────────────────────────────────────

/// Business operations on assets.
///
/// Encoders return the contract call payload the gateway wraps into an
/// envelope. Decoders turn a settled receipt into the response body. Direct
/// invokers answer synchronously. Any [`ServiceError`] is surfaced to the
/// client with its own code and message.
#[async_trait]
pub trait AssetService: Send + Sync {
    // Encoders

    fn construct_encoder(&self, req: &ReqInput<Bac005Info>) -> Result<Vec<u8>, ServiceError>;
    fn issue_encoder(&self, req: &ReqInput<Bac005Info>) -> Result<Vec<u8>, ServiceError>;
    fn batch_issue_encoder(&self, req: &ReqInput<Bac005BatchInfo>) -> Result<Vec<u8>, ServiceError>;
    fn send_encoder(&self, req: &ReqInput<Bac005Info>) -> Result<Vec<u8>, ServiceError>;
    fn batch_send_encoder(&self, req: &ReqInput<Bac005BatchInfo>) -> Result<Vec<u8>, ServiceError>;

    // Receipt decoders

    fn construct_decoder(&self, receipt: &TransactionReceipt) -> Result<Value, ServiceError>;
    fn issue_decoder(&self, receipt: &TransactionReceipt) -> Result<Value, ServiceError>;
    fn batch_issue_decoder(&self, receipt: &TransactionReceipt) -> Result<Value, ServiceError>;
    fn send_decoder(&self, receipt: &TransactionReceipt) -> Result<Value, ServiceError>;
    fn batch_send_decoder(&self, receipt: &TransactionReceipt) -> Result<Value, ServiceError>;

    // Direct invokers

    async fn construct(&self, req: ReqInput<Bac005Info>) -> Result<Value, ServiceError>;
    async fn issue(&self, req: ReqInput<Bac005Info>) -> Result<Value, ServiceError>;
    async fn construct_and_issue(&self, req: ReqInput<Bac005Info>) -> Result<Value, ServiceError>;
    async fn batch_issue(&self, req: ReqInput<Bac005BatchInfo>) -> Result<Value, ServiceError>;
    async fn construct_and_batch_issue(
        &self,
        req: ReqInput<Bac005BatchInfo>,
    ) -> Result<Value, ServiceError>;
    async fn query_asset_owner(&self, req: ReqInput<Bac005Info>) -> Result<Value, ServiceError>;
    async fn query_asset_num(&self, req: ReqInput<BaseAsset>) -> Result<Value, ServiceError>;
    async fn query_asset_list(&self, req: ReqInput<PageQuery>) -> Result<Value, ServiceError>;
    async fn query_owned_asset_num(&self, req: ReqInput<BaseQuery>) -> Result<Value, ServiceError>;
    async fn query_owned_asset_list(&self, req: ReqInput<PageQuery>) -> Result<Value, ServiceError>;
    async fn send(&self, req: ReqInput<Bac005Info>) -> Result<Value, ServiceError>;
    async fn batch_send(&self, req: ReqInput<Bac005BatchInfo>) -> Result<Value, ServiceError>;
    async fn query_base_info(&self, req: ReqInput<AssetAddressList>) -> Result<Value, ServiceError>;
    async fn query_base_info_by_we_id(
        &self,
        req: ReqInput<PageQuery>,
    ) -> Result<Value, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bac005_info_camel_case() {
        let json = r#"{
            "assetAddress": "0x5a0b54d5dc17e0aadc383d2db43b0a0d3e029c4c",
            "assetId": "1001",
            "assetUri": "https://assets.example/1001",
            "recipient": "did:weid:1:0xabc",
            "remark": "first"
        }"#;
        let info: Bac005Info = serde_json::from_str(json).unwrap();
        assert_eq!(info.asset_id, Some(U256::from(1001u64)));
        assert_eq!(info.recipient.as_deref(), Some("did:weid:1:0xabc"));
        assert!(info.asset_address.is_some());
        assert!(info.short_name.is_none());
    }

    #[test]
    fn test_base_asset_ignores_other_fields() {
        let json = r#"{
            "assetAddress": "0x5a0b54d5dc17e0aadc383d2db43b0a0d3e029c4c",
            "objectList": [{"assetId": 1}, {"assetId": 2}]
        }"#;
        let base: BaseAsset = serde_json::from_str(json).unwrap();
        assert_eq!(
            base.asset_address.unwrap().to_string(),
            "0x5a0b54d5dc17e0aadc383d2db43b0a0d3e029c4c"
        );
        let batch: Bac005BatchInfo = serde_json::from_str(json).unwrap();
        assert_eq!(batch.object_list.len(), 2);
    }

    #[test]
    fn test_bad_address_is_rejected() {
        let json = r#"{"assetAddress": "0x1234"}"#;
        assert!(serde_json::from_str::<BaseAsset>(json).is_err());
    }

    #[test]
    fn test_page_query_defaults() {
        let q: PageQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.index, 0);
        assert_eq!(q.num, 0);
        assert!(q.we_id.is_none());
    }
}
