//! Create SPL Token-2022 mints with on-mint metadata.
//!
//! A creation attempt validates a [`TokenForm`], sizes and funds the mint
//! account, assembles one transaction (create account, metadata pointer,
//! initialize mint, initialize metadata, optional field updates) and submits
//! it through a [`WalletAdapter`], waiting a bounded time for confirmation.
//! [`CreatorController`] wraps that workflow with front-end state.

pub mod assembler;
pub mod config;
pub mod controller;
pub mod error;
pub mod explorer;
pub mod ledger;
pub mod metadata;
pub mod pinning;
pub mod sizing;
pub mod submit;
pub mod types;
pub mod validation;
pub mod wallet;

pub use assembler::{assemble, plan_creation, AssembledCreation, CreationPlan, CreationStep};
pub use crate::config::CreatorConfig;
pub use controller::{BusyFlag, CreatorController, Notification, NotificationKind};
pub use error::{
    ConfigError, CreatorError, FailureCategory, LedgerError, PinError, ValidationError,
    WalletError,
};
pub use explorer::Explorer;
pub use ledger::{Ledger, RpcLedger, SignatureStatus};
pub use pinning::{Gateway, ImageUploader, PinataClient, PinnedFile, PinningService, UrlProbe};
pub use submit::{create_token, submit, ConfirmationSettings, CreationReceipt};
pub use types::{
    Authorities, Cluster, Commitment, CreationOptions, DuplicateKeyPolicy, FormField, TokenForm,
};
pub use validation::validate_form;
pub use wallet::{KeypairWallet, WalletAdapter};

pub use chain_sol::{ellipsify, SolKeypair};
