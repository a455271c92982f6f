//! Ledger access: the four JSON-RPC calls a mint creation needs.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tracing::debug;

use crate::error::LedgerError;
use crate::types::Commitment;

/// Confirmation state of a submitted signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureStatus {
    /// `None` once the slot is rooted and the node no longer reports a level.
    pub confirmation: Option<Commitment>,
    /// Execution error, if the transaction failed on chain.
    pub err: Option<String>,
}

impl SignatureStatus {
    /// Whether the status has reached at least `commitment`.
    pub fn satisfies(&self, commitment: Commitment) -> bool {
        match self.confirmation {
            None => true,
            Some(level) => level >= commitment,
        }
    }
}

#[async_trait]
pub trait Ledger: Send + Sync {
    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64, LedgerError>;

    async fn latest_blockhash(&self) -> Result<[u8; 32], LedgerError>;

    /// Broadcast a fully signed transaction, returning its signature.
    async fn send_raw_transaction(&self, raw_tx: &[u8]) -> Result<String, LedgerError>;

    /// `None` if the ledger has not seen the signature yet.
    async fn signature_status(&self, signature: &str) -> Result<Option<SignatureStatus>, LedgerError>;
}

// ---------------------------------------------------------------------------
// JSON-RPC client
// ---------------------------------------------------------------------------

/// [`Ledger`] over Solana's HTTP JSON-RPC API.
#[derive(Debug)]
pub struct RpcLedger {
    client: reqwest::Client,
    url: String,
    commitment: Commitment,
    id: AtomicU64,
}

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Deserialize)]
struct BlockhashValue {
    blockhash: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcSignatureStatus {
    confirmation_status: Option<Commitment>,
    err: Option<JsonValue>,
}

impl RpcLedger {
    pub fn new(client: reqwest::Client, url: impl Into<String>, commitment: Commitment) -> Self {
        Self {
            client,
            url: url.into(),
            commitment,
            id: AtomicU64::new(0),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn next_id(&self) -> u64 {
        self.id.fetch_add(1, Ordering::Relaxed)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: JsonValue,
    ) -> Result<T, LedgerError> {
        let req = json!({
            "jsonrpc": "2.0",
            "id": self.next_id(),
            "method": method,
            "params": params,
        });
        debug!(method, "rpc request");

        let resp = self
            .client
            .post(&self.url)
            .json(&req)
            .send()
            .await?
            .error_for_status()?
            .json::<RpcResponse<T>>()
            .await?;

        if let Some(err) = resp.error {
            return Err(LedgerError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        resp.result
            .ok_or_else(|| LedgerError::InvalidResponse(format!("{method}: missing result")))
    }
}

#[async_trait]
impl Ledger for RpcLedger {
    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64, LedgerError> {
        self.call(
            "getMinimumBalanceForRentExemption",
            json!([data_len, { "commitment": self.commitment.as_str() }]),
        )
        .await
    }

    async fn latest_blockhash(&self) -> Result<[u8; 32], LedgerError> {
        let resp: WithContext<BlockhashValue> = self
            .call(
                "getLatestBlockhash",
                json!([{ "commitment": self.commitment.as_str() }]),
            )
            .await?;
        chain_sol::address_to_pubkey(&resp.value.blockhash)
            .map_err(|e| LedgerError::InvalidResponse(format!("blockhash: {e}")))
    }

    async fn send_raw_transaction(&self, raw_tx: &[u8]) -> Result<String, LedgerError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(raw_tx);
        self.call(
            "sendTransaction",
            json!([encoded, {
                "encoding": "base64",
                "preflightCommitment": self.commitment.as_str(),
            }]),
        )
        .await
    }

    async fn signature_status(&self, signature: &str) -> Result<Option<SignatureStatus>, LedgerError> {
        let resp: WithContext<Vec<Option<RpcSignatureStatus>>> = self
            .call("getSignatureStatuses", json!([[signature]]))
            .await?;
        let status = resp.value.into_iter().next().ok_or_else(|| {
            LedgerError::InvalidResponse("getSignatureStatuses: empty value".into())
        })?;
        Ok(status.map(|s| SignatureStatus {
            confirmation: s.confirmation_status,
            err: s.err.map(|e| e.to_string()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rooted_status_satisfies_everything() {
        let status = SignatureStatus {
            confirmation: None,
            err: None,
        };
        assert!(status.satisfies(Commitment::Finalized));
    }

    #[test]
    fn processed_does_not_satisfy_confirmed() {
        let status = SignatureStatus {
            confirmation: Some(Commitment::Processed),
            err: None,
        };
        assert!(!status.satisfies(Commitment::Confirmed));
        assert!(status.satisfies(Commitment::Processed));
    }

    #[test]
    fn parses_signature_status_response() {
        let raw = r#"{
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "context": { "slot": 82 },
                "value": [
                    { "slot": 72, "confirmations": 10, "err": null, "confirmationStatus": "confirmed" }
                ]
            }
        }"#;
        let resp: RpcResponse<WithContext<Vec<Option<RpcSignatureStatus>>>> =
            serde_json::from_str(raw).unwrap();
        let value = resp.result.unwrap().value;
        let status = value[0].as_ref().unwrap();
        assert_eq!(status.confirmation_status, Some(Commitment::Confirmed));
        assert!(status.err.is_none());
    }

    #[test]
    fn parses_unknown_signature() {
        let raw = r#"{"jsonrpc":"2.0","id":1,"result":{"context":{"slot":1},"value":[null]}}"#;
        let resp: RpcResponse<WithContext<Vec<Option<RpcSignatureStatus>>>> =
            serde_json::from_str(raw).unwrap();
        assert!(resp.result.unwrap().value[0].is_none());
    }

    #[test]
    fn parses_rpc_error() {
        let raw = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32602,"message":"invalid params"}}"#;
        let resp: RpcResponse<u64> = serde_json::from_str(raw).unwrap();
        assert!(resp.result.is_none());
        assert_eq!(resp.error.unwrap().code, -32602);
    }

    #[test]
    fn parses_blockhash() {
        let raw = r#"{"jsonrpc":"2.0","id":1,"result":{"context":{"slot":1},"value":{"blockhash":"EkSnNWid2cvwEVnVx9aBqawnmiCNiDgp3gUdkDPTKN1N","lastValidBlockHeight":3090}}}"#;
        let resp: RpcResponse<WithContext<BlockhashValue>> = serde_json::from_str(raw).unwrap();
        let hash = resp.result.unwrap().value.blockhash;
        assert_eq!(chain_sol::address_to_pubkey(&hash).unwrap().len(), 32);
    }
}
