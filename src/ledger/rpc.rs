//! Solana JSON-RPC ledger client.
//!
//! Speaks the `getTransaction` method at "confirmed" commitment. Responses
//! are reduced to [`LedgerTransaction`]; anything the verifier cannot use
//! (unknown signature, missing `meta`, truncated balance arrays) is reported
//! as absent rather than as a transport error.

use super::{LedgerClient, LedgerError, LedgerTransaction};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

/// JSON-RPC client for a Solana-compatible node.
#[derive(Clone)]
pub struct RpcLedgerClient {
    http: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<RpcTransaction>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcTransaction {
    meta: Option<RpcMeta>,
    transaction: Option<RpcInnerTransaction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcMeta {
    pre_balances: Vec<u64>,
    post_balances: Vec<u64>,
}

#[derive(Debug, Deserialize)]
struct RpcInnerTransaction {
    message: RpcMessage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcMessage {
    account_keys: Vec<String>,
}

impl RpcLedgerClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    fn reduce(body: RpcResponse) -> Result<Option<LedgerTransaction>, LedgerError> {
        if let Some(err) = body.error {
            return Err(LedgerError::Rpc(format!("{} (code {})", err.message, err.code)));
        }

        let Some(result) = body.result else {
            return Ok(None);
        };

        // A transaction without meta carries no balance data to verify
        let (Some(meta), Some(transaction)) = (result.meta, result.transaction) else {
            return Ok(None);
        };

        Ok(Some(LedgerTransaction {
            account_keys: transaction.message.account_keys,
            pre_balances: meta.pre_balances,
            post_balances: meta.post_balances,
        }))
    }
}

#[async_trait]
impl LedgerClient for RpcLedgerClient {
    async fn get_transaction(
        &self,
        signature: &str,
    ) -> Result<Option<LedgerTransaction>, LedgerError> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getTransaction",
            "params": [
                signature,
                {
                    "commitment": "confirmed",
                    "encoding": "json",
                    "maxSupportedTransactionVersion": 0
                }
            ]
        });

        let response = self.http.post(&self.url).json(&request).send().await?;

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| LedgerError::Malformed(e.to_string()))?;

        Self::reduce(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<Option<LedgerTransaction>, LedgerError> {
        let body: RpcResponse = serde_json::from_str(raw).unwrap();
        RpcLedgerClient::reduce(body)
    }

    #[test]
    fn test_reduce_full_response() {
        let raw = r#"{
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "slot": 430,
                "meta": {
                    "err": null,
                    "fee": 5000,
                    "preBalances": [500000000, 26858640],
                    "postBalances": [499895000, 26958640]
                },
                "transaction": {
                    "message": {
                        "accountKeys": ["BuyerWallet", "CreatorWallet", "11111111111111111111111111111111"],
                        "recentBlockhash": "G2cY..."
                    },
                    "signatures": ["5VER..."]
                }
            }
        }"#;

        let tx = parse(raw).unwrap().unwrap();
        assert_eq!(tx.fee_payer(), Some("BuyerWallet"));
        assert!(tx.involves("CreatorWallet"));
        assert_eq!(tx.pre_balances, vec![500_000_000, 26_858_640]);
        assert_eq!(tx.post_balances, vec![499_895_000, 26_958_640]);
    }

    #[test]
    fn test_reduce_null_result_is_absent() {
        let raw = r#"{"jsonrpc": "2.0", "id": 1, "result": null}"#;
        assert!(parse(raw).unwrap().is_none());
    }

    #[test]
    fn test_reduce_missing_meta_is_absent() {
        let raw = r#"{
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "slot": 430,
                "meta": null,
                "transaction": {
                    "message": { "accountKeys": ["BuyerWallet"] },
                    "signatures": ["5VER..."]
                }
            }
        }"#;
        assert!(parse(raw).unwrap().is_none());
    }

    #[test]
    fn test_reduce_rpc_error() {
        let raw = r#"{
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32004, "message": "Block not available" }
        }"#;
        let err = parse(raw).unwrap_err();
        assert!(matches!(err, LedgerError::Rpc(ref msg) if msg.contains("Block not available")));
    }
}
