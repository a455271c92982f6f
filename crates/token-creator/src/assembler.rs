//! Turn a validated form into the ordered instruction sequence that creates
//! a Token-2022 mint with on-mint metadata.
//!
//! ```text
//!   1. System CreateAccount          payer -> mint, space = mint_len
//!   2. MetadataPointer Initialize    pointer -> mint itself
//!   3. InitializeMint                decimals, mint authority, no freeze
//!   4. TokenMetadata Initialize      name, symbol, uri
//!   5. TokenMetadata UpdateField     one per additional metadata entry
//!   6. ATA CreateIdempotent + MintTo only with an initial supply
//! ```
//!
//! The pointer must be initialized before the mint, and metadata only after
//! the mint exists. Any other order fails on chain.

use std::fmt;

use chain_sol::token_metadata::{self, Field, TokenMetadata};
use chain_sol::{
    compile_transaction, create_account, create_associated_token_account_idempotent,
    initialize_metadata_pointer, initialize_mint, mint_to, wire_len, SolInstruction, SolKeypair,
    PACKET_DATA_SIZE, TOKEN_2022_PROGRAM_ID,
};
use tracing::{debug, warn};

use crate::error::{CreatorError, ValidationError};
use crate::metadata::build_metadata;
use crate::sizing::MintSizing;
use crate::types::{Authorities, CreationOptions, TokenForm};
use crate::validation::validate_form;

/// Which step of the creation sequence an instruction performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationStep {
    CreateAccount,
    InitializeMetadataPointer,
    InitializeMint,
    InitializeMetadata,
    UpdateField { key: String },
    CreateTokenAccount,
    MintTo { amount: u64 },
}

impl fmt::Display for CreationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreationStep::CreateAccount => write!(f, "create-account"),
            CreationStep::InitializeMetadataPointer => write!(f, "metadata-pointer-init"),
            CreationStep::InitializeMint => write!(f, "mint-init"),
            CreationStep::InitializeMetadata => write!(f, "metadata-init"),
            CreationStep::UpdateField { key } => write!(f, "update-field({key})"),
            CreationStep::CreateTokenAccount => write!(f, "create-token-account"),
            CreationStep::MintTo { amount } => write!(f, "mint-to({amount})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledInstruction {
    pub step: CreationStep,
    pub instruction: SolInstruction,
}

/// Everything known about a creation attempt before the rent lookup.
#[derive(Debug)]
pub struct CreationPlan {
    pub mint: SolKeypair,
    pub payer: [u8; 32],
    pub authorities: Authorities,
    pub decimals: u8,
    pub metadata: TokenMetadata,
    pub sizing: MintSizing,
    pub initial_supply: Option<u64>,
}

/// Validate `form` and derive the plan for a brand-new mint.
///
/// A fresh mint keypair is generated on every call.
pub fn plan_creation(
    form: &TokenForm,
    payer: [u8; 32],
    options: &CreationOptions,
) -> Result<CreationPlan, ValidationError> {
    validate_form(form)?;
    let decimals = u8::try_from(form.decimals).map_err(|_| ValidationError::DecimalsOutOfRange)?;

    let mint = SolKeypair::generate();
    let authorities = Authorities::wallet(payer);
    let metadata = build_metadata(form, &mint.pubkey(), &authorities, options)?;
    let sizing = MintSizing::for_metadata(&metadata);

    Ok(CreationPlan {
        mint,
        payer,
        authorities,
        decimals,
        metadata,
        sizing,
        initial_supply: options.initial_supply.filter(|amount| *amount > 0),
    })
}

/// The assembled instruction sequence plus the mint keypair that must
/// co-sign it.
#[derive(Debug)]
pub struct AssembledCreation {
    pub mint: SolKeypair,
    pub payer: [u8; 32],
    pub lamports: u64,
    pub sizing: MintSizing,
    pub steps: Vec<AssembledInstruction>,
}

impl AssembledCreation {
    pub fn mint_address(&self) -> String {
        self.mint.address()
    }

    pub fn instructions(&self) -> Vec<SolInstruction> {
        self.steps.iter().map(|s| s.instruction.clone()).collect()
    }

    pub fn step_labels(&self) -> Vec<&CreationStep> {
        self.steps.iter().map(|s| &s.step).collect()
    }
}

impl CreationPlan {
    /// Serialized size of the signed creation transaction.
    ///
    /// Neither the funding amount nor the blockhash changes the size, so
    /// this is exact before the rent lookup.
    pub fn transaction_len(&self) -> Result<usize, CreatorError> {
        let instructions: Vec<SolInstruction> = self
            .steps(0)?
            .into_iter()
            .map(|s| s.instruction)
            .collect();
        let tx = compile_transaction(&instructions, &self.payer, &[0u8; 32])?;
        Ok(wire_len(&tx)?)
    }

    /// Fail with [`ValidationError::TransactionTooLarge`] when the creation
    /// cannot fit in one packet.
    pub fn check_transaction_size(&self) -> Result<(), CreatorError> {
        let size = self.transaction_len()?;
        if size > PACKET_DATA_SIZE {
            warn!(size, limit = PACKET_DATA_SIZE, "creation transaction too large");
            return Err(ValidationError::TransactionTooLarge {
                size,
                limit: PACKET_DATA_SIZE,
            }
            .into());
        }
        Ok(())
    }

    fn steps(&self, lamports: u64) -> Result<Vec<AssembledInstruction>, CreatorError> {
        let mint_key = self.mint.pubkey();
        let payer = &self.payer;
        let authorities = &self.authorities;

        let mut steps = vec![
            AssembledInstruction {
                step: CreationStep::CreateAccount,
                instruction: create_account(
                    payer,
                    &mint_key,
                    lamports,
                    self.sizing.mint_len as u64,
                    &TOKEN_2022_PROGRAM_ID,
                ),
            },
            AssembledInstruction {
                step: CreationStep::InitializeMetadataPointer,
                instruction: initialize_metadata_pointer(
                    &mint_key,
                    Some(&authorities.update_authority),
                    Some(&mint_key),
                ),
            },
            AssembledInstruction {
                step: CreationStep::InitializeMint,
                instruction: initialize_mint(
                    &mint_key,
                    &authorities.mint_authority,
                    None,
                    self.decimals,
                ),
            },
            AssembledInstruction {
                step: CreationStep::InitializeMetadata,
                instruction: token_metadata::initialize(
                    &mint_key,
                    &authorities.update_authority,
                    &mint_key,
                    &authorities.mint_authority,
                    &self.metadata.name,
                    &self.metadata.symbol,
                    &self.metadata.uri,
                ),
            },
        ];

        for (key, value) in &self.metadata.additional_metadata {
            steps.push(AssembledInstruction {
                step: CreationStep::UpdateField { key: key.clone() },
                instruction: token_metadata::update_field(
                    &mint_key,
                    &authorities.update_authority,
                    Field::Key(key.clone()),
                    value,
                ),
            });
        }

        if let Some(amount) = self.initial_supply {
            let ata = chain_sol::derive_associated_token_address(payer, &mint_key)?;
            steps.push(AssembledInstruction {
                step: CreationStep::CreateTokenAccount,
                instruction: create_associated_token_account_idempotent(payer, payer, &mint_key)?,
            });
            steps.push(AssembledInstruction {
                step: CreationStep::MintTo { amount },
                instruction: mint_to(&mint_key, &ata, &authorities.mint_authority, amount)?,
            });
        }

        Ok(steps)
    }
}

/// Build the instruction sequence for `plan`, funding the mint with
/// `lamports`.
pub fn assemble(plan: CreationPlan, lamports: u64) -> Result<AssembledCreation, CreatorError> {
    let steps = plan.steps(lamports)?;
    let CreationPlan { mint, payer, sizing, .. } = plan;

    debug!(
        mint = %mint.address(),
        lamports,
        space = sizing.mint_len,
        instructions = steps.len(),
        "assembled mint creation"
    );

    Ok(AssembledCreation {
        mint,
        payer,
        lamports,
        sizing,
        steps,
    })
}
