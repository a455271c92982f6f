//! Submission of an assembled creation and the bounded confirmation wait.

use std::time::Duration;

use chain_sol::compile_transaction;
use tracing::{debug, info, warn};

use crate::assembler::{assemble, plan_creation, AssembledCreation};
use crate::error::CreatorError;
use crate::ledger::Ledger;
use crate::sizing::rent_lamports;
use crate::types::{Commitment, CreationOptions, TokenForm};
use crate::wallet::WalletAdapter;

/// How long, and for what, to wait after broadcasting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationSettings {
    pub commitment: Commitment,
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ConfirmationSettings {
    fn default() -> Self {
        Self {
            commitment: Commitment::Confirmed,
            timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// A confirmed mint creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationReceipt {
    pub mint: String,
    pub signature: String,
}

/// Run one full creation attempt: validate, check the transaction fits in
/// one packet, look up rent, assemble, send through the wallet, and wait for
/// confirmation.
///
/// Nothing touches the network before the form validates. No retries.
pub async fn create_token(
    form: &TokenForm,
    options: &CreationOptions,
    wallet: &dyn WalletAdapter,
    ledger: &dyn Ledger,
    settings: &ConfirmationSettings,
) -> Result<CreationReceipt, CreatorError> {
    let payer = wallet.public_key().ok_or(CreatorError::WalletUnavailable)?;
    let plan = plan_creation(form, payer, options)?;
    plan.check_transaction_size()?;

    let lamports = rent_lamports(ledger, &plan.sizing)
        .await
        .map_err(CreatorError::RentLookup)?;
    let assembled = assemble(plan, lamports)?;

    submit(&assembled, wallet, ledger, settings).await
}

/// Compile `assembled`, hand it to the wallet with the mint as co-signer,
/// and wait for `settings.commitment`.
pub async fn submit(
    assembled: &AssembledCreation,
    wallet: &dyn WalletAdapter,
    ledger: &dyn Ledger,
    settings: &ConfirmationSettings,
) -> Result<CreationReceipt, CreatorError> {
    let blockhash = ledger
        .latest_blockhash()
        .await
        .map_err(|e| CreatorError::Broadcast(format!("blockhash: {e}")))?;
    let tx = compile_transaction(&assembled.instructions(), &assembled.payer, &blockhash)?;

    let mint = assembled.mint_address();
    info!(%mint, instructions = assembled.steps.len(), "submitting mint creation");

    let signature = wallet
        .send_transaction(&tx, ledger, &[&assembled.mint])
        .await
        .inspect_err(|e| warn!(%mint, error = %e, "wallet did not send transaction"))?;

    wait_for_confirmation(ledger, &signature, settings).await?;
    info!(%mint, %signature, commitment = settings.commitment.as_str(), "mint created");

    Ok(CreationReceipt { mint, signature })
}

/// Poll the ledger until `signature` reaches `settings.commitment`.
///
/// Transient lookup errors are logged and polling continues. Running out of
/// time yields [`CreatorError::ConfirmationTimeout`]: the transaction may
/// still land.
pub async fn wait_for_confirmation(
    ledger: &dyn Ledger,
    signature: &str,
    settings: &ConfirmationSettings,
) -> Result<(), CreatorError> {
    let poll = async {
        loop {
            match ledger.signature_status(signature).await {
                Ok(Some(status)) => {
                    if let Some(reason) = &status.err {
                        return Err(CreatorError::TransactionFailed {
                            signature: signature.to_string(),
                            reason: reason.clone(),
                        });
                    }
                    if status.satisfies(settings.commitment) {
                        return Ok(());
                    }
                    debug!(signature, level = ?status.confirmation, "not yet at commitment");
                }
                Ok(None) => debug!(signature, "signature not yet seen"),
                Err(e) => warn!(signature, error = %e, "signature status lookup failed"),
            }
            tokio::time::sleep(settings.poll_interval).await;
        }
    };

    match tokio::time::timeout(settings.timeout, poll).await {
        Ok(result) => result,
        Err(_) => {
            warn!(signature, timeout = ?settings.timeout, "confirmation timed out");
            Err(CreatorError::ConfirmationTimeout {
                signature: signature.to_string(),
            })
        }
    }
}
