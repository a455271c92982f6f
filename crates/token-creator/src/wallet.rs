//! The wallet capability: who pays, and who approves and signs.

use async_trait::async_trait;
use chain_sol::{sign_transaction, SolKeypair, SolTransaction};
use tracing::{info, warn};

use crate::error::WalletError;
use crate::ledger::Ledger;

/// A connected (or disconnected) wallet.
#[async_trait]
pub trait WalletAdapter: Send + Sync {
    /// The wallet's public key, `None` while disconnected.
    fn public_key(&self) -> Option<[u8; 32]>;

    /// Sign `tx` with the wallet key plus `signers`, broadcast it through
    /// `ledger`, and return the transaction signature.
    ///
    /// Returns [`WalletError::Rejected`] when the user declines.
    async fn send_transaction(
        &self,
        tx: &SolTransaction,
        ledger: &dyn Ledger,
        signers: &[&SolKeypair],
    ) -> Result<String, WalletError>;
}

type ApprovalHook = Box<dyn Fn(&SolTransaction) -> bool + Send + Sync>;

/// Wallet backed by a local keypair.
///
/// An approval hook stands in for the user's confirmation prompt.
pub struct KeypairWallet {
    keypair: SolKeypair,
    approval: Option<ApprovalHook>,
}

impl KeypairWallet {
    pub fn new(keypair: SolKeypair) -> Self {
        Self {
            keypair,
            approval: None,
        }
    }

    /// Ask `approve` before every signature. Returning `false` rejects.
    pub fn with_approval<F>(mut self, approve: F) -> Self
    where
        F: Fn(&SolTransaction) -> bool + Send + Sync + 'static,
    {
        self.approval = Some(Box::new(approve));
        self
    }

    pub fn address(&self) -> String {
        self.keypair.address()
    }
}

impl std::fmt::Debug for KeypairWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeypairWallet")
            .field("keypair", &self.keypair)
            .field("approval", &self.approval.is_some())
            .finish()
    }
}

#[async_trait]
impl WalletAdapter for KeypairWallet {
    fn public_key(&self) -> Option<[u8; 32]> {
        Some(self.keypair.pubkey())
    }

    async fn send_transaction(
        &self,
        tx: &SolTransaction,
        ledger: &dyn Ledger,
        signers: &[&SolKeypair],
    ) -> Result<String, WalletError> {
        if let Some(approve) = &self.approval {
            if !approve(tx) {
                warn!(wallet = %self.keypair.address(), "transaction rejected");
                return Err(WalletError::Rejected);
            }
        }

        let mut all: Vec<&SolKeypair> = signers.to_vec();
        all.push(&self.keypair);
        let raw = sign_transaction(tx, &all)?;

        let signature = ledger
            .send_raw_transaction(&raw)
            .await
            .map_err(|e| WalletError::SendFailed(e.to_string()))?;
        info!(%signature, "transaction sent");
        Ok(signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keypair_wallet_is_connected() {
        let kp = SolKeypair::from_seed(&[3u8; 32]);
        let pubkey = kp.pubkey();
        let wallet = KeypairWallet::new(kp);
        assert_eq!(wallet.public_key(), Some(pubkey));
    }

    #[test]
    fn debug_reports_hook_presence_only() {
        let wallet = KeypairWallet::new(SolKeypair::from_seed(&[3u8; 32])).with_approval(|_| true);
        let debug = format!("{wallet:?}");
        assert!(debug.contains("approval: true"));
        assert!(debug.contains(&wallet.address()));
    }
}
