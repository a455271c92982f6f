//! In-memory collaborators shared by the integration tests.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chain_sol::{transaction_signature, Rent, SolKeypair, SolTransaction};
use token_creator::{
    Commitment, Ledger, LedgerError, PinError, PinnedFile, PinningService, SignatureStatus,
    TokenForm, UrlProbe, WalletAdapter, WalletError,
};

pub const BLOCKHASH: [u8; 32] = [0x5B; 32];

/// How the mock ledger answers signature-status polls.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// `processed` first, then `confirmed`.
    Confirm,
    /// Never seen, forever.
    Pending,
    /// Landed with an execution error.
    Fail(String),
}

pub struct MockLedger {
    pub outcome: Outcome,
    pub rent_unavailable: bool,
    pub rent_requests: Mutex<Vec<usize>>,
    pub sent: Mutex<Vec<Vec<u8>>>,
    polls: Mutex<u32>,
}

impl MockLedger {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            rent_unavailable: false,
            rent_requests: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            polls: Mutex::new(0),
        }
    }

    pub fn without_rent() -> Self {
        Self {
            rent_unavailable: true,
            ..Self::new(Outcome::Confirm)
        }
    }

    pub fn rent_requests(&self) -> Vec<usize> {
        self.rent_requests.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Ledger for MockLedger {
    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64, LedgerError> {
        if self.rent_unavailable {
            return Err(LedgerError::Transport("connection refused".into()));
        }
        self.rent_requests.lock().unwrap().push(data_len);
        Ok(Rent::default().minimum_balance(data_len))
    }

    async fn latest_blockhash(&self) -> Result<[u8; 32], LedgerError> {
        Ok(BLOCKHASH)
    }

    async fn send_raw_transaction(&self, raw_tx: &[u8]) -> Result<String, LedgerError> {
        self.sent.lock().unwrap().push(raw_tx.to_vec());
        transaction_signature(raw_tx).map_err(|e| LedgerError::InvalidResponse(e.to_string()))
    }

    async fn signature_status(&self, _signature: &str) -> Result<Option<SignatureStatus>, LedgerError> {
        let mut polls = self.polls.lock().unwrap();
        *polls += 1;
        Ok(match &self.outcome {
            Outcome::Pending => None,
            Outcome::Fail(reason) => Some(SignatureStatus {
                confirmation: Some(Commitment::Processed),
                err: Some(reason.clone()),
            }),
            Outcome::Confirm if *polls == 1 => Some(SignatureStatus {
                confirmation: Some(Commitment::Processed),
                err: None,
            }),
            Outcome::Confirm => Some(SignatureStatus {
                confirmation: Some(Commitment::Confirmed),
                err: None,
            }),
        })
    }
}

/// A wallet with no account connected.
pub struct DisconnectedWallet;

#[async_trait]
impl WalletAdapter for DisconnectedWallet {
    fn public_key(&self) -> Option<[u8; 32]> {
        None
    }

    async fn send_transaction(
        &self,
        _tx: &SolTransaction,
        _ledger: &dyn Ledger,
        _signers: &[&SolKeypair],
    ) -> Result<String, WalletError> {
        Err(WalletError::NotConnected)
    }
}

pub struct MockPinning {
    pub cid: String,
    pub uploads: Mutex<Vec<(String, String, usize)>>,
}

impl MockPinning {
    pub fn new(cid: &str) -> Self {
        Self {
            cid: cid.to_string(),
            uploads: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PinningService for MockPinning {
    async fn pin(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<PinnedFile, PinError> {
        self.uploads.lock().unwrap().push((
            file_name.to_string(),
            content_type.to_string(),
            bytes.len(),
        ));
        Ok(PinnedFile {
            cid: self.cid.clone(),
        })
    }
}

pub struct MockProbe {
    pub reachable: bool,
}

#[async_trait]
impl UrlProbe for MockProbe {
    async fn probe(&self, url: &str) -> Result<(), PinError> {
        if self.reachable {
            Ok(())
        } else {
            Err(PinError::NotRetrievable {
                url: url.to_string(),
            })
        }
    }
}

pub fn wallet_keypair() -> SolKeypair {
    SolKeypair::from_seed(&[0x42; 32])
}

pub fn scenario_form(description: &str) -> TokenForm {
    TokenForm {
        name: "My Token".into(),
        symbol: "MTK".into(),
        uri: "https://x/y.json".into(),
        decimals: 6,
        description: description.into(),
    }
}

/// The `index`-th account key of a legacy wire transaction.
pub fn account_key(raw_tx: &[u8], index: usize) -> [u8; 32] {
    let num_sigs = raw_tx[0] as usize;
    // signatures, 3 header bytes, 1-byte compact key count
    let start = 1 + num_sigs * 64 + 3 + 1 + index * 32;
    raw_tx[start..start + 32].try_into().unwrap()
}

pub fn num_signatures(raw_tx: &[u8]) -> usize {
    raw_tx[0] as usize
}
