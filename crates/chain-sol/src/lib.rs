//! Solana wire primitives for creating Token-2022 mints.
//!
//! Covers addresses, Ed25519 keypairs, the legacy transaction wire format,
//! and the System, Token-2022, Associated Token Account and token-metadata
//! instructions a mint needs. Everything is encoded by hand on top of
//! `ed25519-dalek` and `bs58` rather than through `solana-sdk`.

pub mod address;
pub mod error;
pub mod keypair;
pub mod rent;
pub mod system;
pub mod token_2022;
pub mod token_metadata;
pub mod transaction;

// Re-export key public types for ergonomic imports.
pub use address::{address_to_pubkey, ellipsify, is_on_curve, pubkey_to_address};
pub use error::SolError;
pub use keypair::SolKeypair;
pub use rent::Rent;
pub use system::{create_account, SYSTEM_PROGRAM_ID};
pub use token_2022::{
    create_associated_token_account_idempotent, derive_associated_token_address, get_mint_len,
    initialize_metadata_pointer, initialize_mint, mint_to, ExtensionType,
    ASSOCIATED_TOKEN_PROGRAM_ID, LENGTH_SIZE, SYSVAR_RENT_ID, TOKEN_2022_PROGRAM_ID, TYPE_SIZE,
};
pub use token_metadata::{Field, TokenMetadata, TokenMetadataInstruction};
pub use transaction::{
    compile_transaction, decode_compact_u16, encode_compact_u16, missing_signers, partial_sign,
    serialize_message, serialize_unsigned, sign_transaction, transaction_signature, wire_len,
    CompiledInstruction, SolAccountMeta, SolInstruction, SolTransaction, PACKET_DATA_SIZE,
};
