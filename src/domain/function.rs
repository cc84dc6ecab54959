//! The operation catalogue and what each operation supports.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::GatewayError;

/// Every operation a request may name.
///
/// Serializes to the camelCase name clients send in `functionName`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FunctionName {
    Construct,
    Issue,
    ConstructAndIssue,
    BatchIssue,
    ConstructAndBatchIssue,
    QueryAssetOwner,
    QueryAssetNum,
    QueryAssetList,
    QueryOwnedAssetNum,
    QueryOwnedAssetList,
    Send,
    BatchSend,
    GetBaseInfo,
    GetBaseInfoByWeId,
    CreateWeId,
}

/// Which dispatch phases an operation participates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Produces a signable envelope in the encode phase.
    pub encode: bool,
    /// Decodes a receipt in the send phase.
    pub decode: bool,
    /// Answers synchronously through the direct-invoke entry.
    pub invoke: bool,
}

impl FunctionName {
    pub const ALL: [FunctionName; 15] = [
        FunctionName::Construct,
        FunctionName::Issue,
        FunctionName::ConstructAndIssue,
        FunctionName::BatchIssue,
        FunctionName::ConstructAndBatchIssue,
        FunctionName::QueryAssetOwner,
        FunctionName::QueryAssetNum,
        FunctionName::QueryAssetList,
        FunctionName::QueryOwnedAssetNum,
        FunctionName::QueryOwnedAssetList,
        FunctionName::Send,
        FunctionName::BatchSend,
        FunctionName::GetBaseInfo,
        FunctionName::GetBaseInfoByWeId,
        FunctionName::CreateWeId,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionName::Construct => "construct",
            FunctionName::Issue => "issue",
            FunctionName::ConstructAndIssue => "constructAndIssue",
            FunctionName::BatchIssue => "batchIssue",
            FunctionName::ConstructAndBatchIssue => "constructAndBatchIssue",
            FunctionName::QueryAssetOwner => "queryAssetOwner",
            FunctionName::QueryAssetNum => "queryAssetNum",
            FunctionName::QueryAssetList => "queryAssetList",
            FunctionName::QueryOwnedAssetNum => "queryOwnedAssetNum",
            FunctionName::QueryOwnedAssetList => "queryOwnedAssetList",
            FunctionName::Send => "send",
            FunctionName::BatchSend => "batchSend",
            FunctionName::GetBaseInfo => "getBaseInfo",
            FunctionName::GetBaseInfoByWeId => "getBaseInfoByWeId",
            FunctionName::CreateWeId => "createWeId",
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        use FunctionName::*;
        match self {
            Construct | Issue | BatchIssue | Send | BatchSend => Capabilities {
                encode: true,
                decode: true,
                invoke: true,
            },
            CreateWeId => Capabilities {
                encode: true,
                decode: true,
                invoke: false,
            },
            ConstructAndIssue
            | ConstructAndBatchIssue
            | QueryAssetOwner
            | QueryAssetNum
            | QueryAssetList
            | QueryOwnedAssetNum
            | QueryOwnedAssetList
            | GetBaseInfo
            | GetBaseInfoByWeId => Capabilities {
                encode: false,
                decode: false,
                invoke: true,
            },
        }
    }

    /// Whether the envelope is addressed to an existing asset contract taken
    /// from `functionArg.assetAddress`. `construct` deploys a new one.
    pub fn targets_existing_asset(&self) -> bool {
        matches!(
            self,
            FunctionName::Issue
                | FunctionName::BatchIssue
                | FunctionName::Send
                | FunctionName::BatchSend
        )
    }
}

impl std::fmt::Display for FunctionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FunctionName {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FunctionName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| GatewayError::FunctionUndefined(s.to_string()))
    }
}
