//! Token-2022 program: mint sizing and the instructions needed to stand up
//! a mint with mint-resident metadata.
//!
//! Everything is encoded by hand against the program's documented layouts;
//! the `spl-token-2022` crate is not pulled in.

use sha2::{Digest, Sha256};

use crate::address::is_on_curve;
use crate::error::SolError;
use crate::system::SYSTEM_PROGRAM_ID;
use crate::transaction::{SolAccountMeta, SolInstruction};

// ---------------------------------------------------------------------------
// Well-known program IDs
// ---------------------------------------------------------------------------

/// Token-2022 Program ID: `TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb`
pub const TOKEN_2022_PROGRAM_ID: [u8; 32] = [
    0x06, 0xdd, 0xf6, 0xe1, 0xee, 0x75, 0x8f, 0xde, 0x18, 0x42, 0x5d, 0xbc, 0xe4, 0x6c, 0xcd, 0xda,
    0xb6, 0x1a, 0xfc, 0x4d, 0x83, 0xb9, 0x0d, 0x27, 0xfe, 0xbd, 0xf9, 0x28, 0xd8, 0xa1, 0x8b, 0xfc,
];

/// Associated Token Account Program ID: `ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL`
pub const ASSOCIATED_TOKEN_PROGRAM_ID: [u8; 32] = [
    0x8c, 0x97, 0x25, 0x8f, 0x4e, 0x24, 0x89, 0xf1, 0xbb, 0x3d, 0x10, 0x29, 0x14, 0x8e, 0x0d, 0x83,
    0x0b, 0x5a, 0x13, 0x99, 0xda, 0xff, 0x10, 0x84, 0x04, 0x8e, 0x7b, 0xd8, 0xdb, 0xe9, 0xf8, 0x59,
];

/// Rent sysvar: `SysvarRent111111111111111111111111111111111`
pub const SYSVAR_RENT_ID: [u8; 32] = [
    0x06, 0xa7, 0xd5, 0x17, 0x19, 0x2c, 0x5c, 0x51, 0x21, 0x8c, 0xc9, 0x4c, 0x3d, 0x4a, 0xf1, 0x7f,
    0x58, 0xda, 0xee, 0x08, 0x9b, 0xa1, 0xfd, 0x44, 0xe3, 0xdb, 0xd9, 0x8a, 0x00, 0x00, 0x00, 0x00,
];

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

// ---------------------------------------------------------------------------
// Account sizing
// ---------------------------------------------------------------------------

/// Size of a mint without extensions.
pub const MINT_SIZE: usize = 82;
/// Extended mints are padded to the token-account length before the
/// account-type byte so that the two layouts can never be confused.
pub const BASE_ACCOUNT_LENGTH: usize = 165;
/// Bytes of the TLV type tag.
pub const TYPE_SIZE: usize = 2;
/// Bytes of the TLV length field.
pub const LENGTH_SIZE: usize = 2;

/// Fixed-size mint extensions set up at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ExtensionType {
    MetadataPointer = 18,
}

impl ExtensionType {
    /// Payload length (without the TLV header).
    pub fn payload_len(&self) -> usize {
        match self {
            ExtensionType::MetadataPointer => 64,
        }
    }
}

/// Account length of a mint carrying `extensions`.
///
/// No extensions means a plain 82-byte mint, otherwise base length +
/// account type + one TLV entry per extension. (The program also bumps a
/// length of exactly 355, the multisig size, but every TLV entry here is
/// even-sized so that total is unreachable.)
pub fn get_mint_len(extensions: &[ExtensionType]) -> usize {
    if extensions.is_empty() {
        return MINT_SIZE;
    }

    let tlv: usize = extensions
        .iter()
        .map(|e| TYPE_SIZE + LENGTH_SIZE + e.payload_len())
        .sum();
    BASE_ACCOUNT_LENGTH + 1 + tlv
}

// ---------------------------------------------------------------------------
// Mint instructions
// ---------------------------------------------------------------------------

const INITIALIZE_MINT_IX: u8 = 0;
const MINT_TO_IX: u8 = 7;
const METADATA_POINTER_EXTENSION_IX: u8 = 39;
const METADATA_POINTER_INITIALIZE: u8 = 0;

/// Build `MetadataPointerExtension::Initialize`.
///
/// Must run before `InitializeMint`. `None` fields are encoded as 32 zero
/// bytes (the program's optional-non-zero-pubkey layout).
///
/// Data: `[39, 0] | authority [32] | metadata_address [32]`.
pub fn initialize_metadata_pointer(
    mint: &[u8; 32],
    authority: Option<&[u8; 32]>,
    metadata_address: Option<&[u8; 32]>,
) -> SolInstruction {
    let mut data = Vec::with_capacity(66);
    data.push(METADATA_POINTER_EXTENSION_IX);
    data.push(METADATA_POINTER_INITIALIZE);
    data.extend_from_slice(authority.unwrap_or(&[0u8; 32]));
    data.extend_from_slice(metadata_address.unwrap_or(&[0u8; 32]));

    SolInstruction {
        program_id: TOKEN_2022_PROGRAM_ID,
        accounts: vec![SolAccountMeta::writable(*mint, false)],
        data,
    }
}

/// Build `InitializeMint`.
///
/// Data: `[0] | decimals | mint_authority [32] | freeze COption`, where the
/// COption is a single `0` byte for `None` or `1` followed by the key.
pub fn initialize_mint(
    mint: &[u8; 32],
    mint_authority: &[u8; 32],
    freeze_authority: Option<&[u8; 32]>,
    decimals: u8,
) -> SolInstruction {
    let mut data = Vec::with_capacity(67);
    data.push(INITIALIZE_MINT_IX);
    data.push(decimals);
    data.extend_from_slice(mint_authority);
    match freeze_authority {
        Some(key) => {
            data.push(1);
            data.extend_from_slice(key);
        }
        None => data.push(0),
    }

    SolInstruction {
        program_id: TOKEN_2022_PROGRAM_ID,
        accounts: vec![
            SolAccountMeta::writable(*mint, false),
            SolAccountMeta::readonly(SYSVAR_RENT_ID, false),
        ],
        data,
    }
}

/// Build `MintTo`: mint `amount` base units into `destination`.
pub fn mint_to(
    mint: &[u8; 32],
    destination: &[u8; 32],
    mint_authority: &[u8; 32],
    amount: u64,
) -> Result<SolInstruction, SolError> {
    if amount == 0 {
        return Err(SolError::TransactionBuildError(
            "mint amount must be > 0".into(),
        ));
    }

    let mut data = Vec::with_capacity(9);
    data.push(MINT_TO_IX);
    data.extend_from_slice(&amount.to_le_bytes());

    Ok(SolInstruction {
        program_id: TOKEN_2022_PROGRAM_ID,
        accounts: vec![
            SolAccountMeta::writable(*mint, false),
            SolAccountMeta::writable(*destination, false),
            SolAccountMeta::readonly(*mint_authority, true),
        ],
        data,
    })
}

// ---------------------------------------------------------------------------
// Associated token accounts
// ---------------------------------------------------------------------------

/// Associated Token Account program `CreateIdempotent` discriminator.
const ATA_CREATE_IDEMPOTENT_IX: u8 = 1;

/// Build the ATA program's `CreateIdempotent` for `wallet`'s Token-2022
/// account of `mint`. Succeeds as a no-op if the account already exists.
pub fn create_associated_token_account_idempotent(
    payer: &[u8; 32],
    wallet: &[u8; 32],
    mint: &[u8; 32],
) -> Result<SolInstruction, SolError> {
    let ata = derive_associated_token_address(wallet, mint)?;

    Ok(SolInstruction {
        program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
        accounts: vec![
            SolAccountMeta::writable(*payer, true),
            SolAccountMeta::writable(ata, false),
            SolAccountMeta::readonly(*wallet, false),
            SolAccountMeta::readonly(*mint, false),
            SolAccountMeta::readonly(SYSTEM_PROGRAM_ID, false),
            SolAccountMeta::readonly(TOKEN_2022_PROGRAM_ID, false),
        ],
        data: vec![ATA_CREATE_IDEMPOTENT_IX],
    })
}

/// Derive the Token-2022 associated token account address for a wallet +
/// mint pair.
///
/// Seeds: `[wallet, token_2022_program_id, mint]` under the ATA program.
pub fn derive_associated_token_address(
    wallet: &[u8; 32],
    mint: &[u8; 32],
) -> Result<[u8; 32], SolError> {
    find_program_address(
        &[wallet.as_ref(), &TOKEN_2022_PROGRAM_ID, mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .map(|(address, _bump)| address)
}

/// Search bump seeds from 255 down for the first hash that is off-curve.
fn find_program_address(
    seeds: &[&[u8]],
    program_id: &[u8; 32],
) -> Result<([u8; 32], u8), SolError> {
    (0u8..=255)
        .rev()
        .find_map(|bump| {
            try_create_program_address(seeds, &[bump], program_id).map(|addr| (addr, bump))
        })
        .ok_or_else(|| SolError::InvalidAddress("could not find valid PDA bump seed".into()))
}

fn try_create_program_address(
    seeds: &[&[u8]],
    bump_seed: &[u8],
    program_id: &[u8; 32],
) -> Option<[u8; 32]> {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update(bump_seed);
    hasher.update(program_id);
    hasher.update(PDA_MARKER);

    let hash: [u8; 32] = hasher.finalize().into();
    (!is_on_curve(&hash)).then_some(hash)
}
