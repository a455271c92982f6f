//! Legacy Solana transaction wire format and multi-signer signing.
//!
//! The layout is built by hand:
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message:
//!     num_required_sigs     u8
//!     num_readonly_signed   u8
//!     num_readonly_unsigned u8
//!     num_accounts          compact-u16
//!     account_keys          32 bytes * num_accounts
//!     recent_blockhash      32 bytes
//!     num_instructions      compact-u16
//!     instructions[]        (see below)
//!
//! Instruction:
//!   program_id_index        u8
//!   num_accounts            compact-u16
//!   account_indices         u8 * num_accounts
//!   data_len                compact-u16
//!   data                    u8 * data_len
//! ```
//!
//! A mint-creation transaction needs two signatures (the fee-paying wallet
//! and the new mint account), so signing works slot by slot: the unsigned
//! wire form carries zeroed signature slots and each signer fills its own
//! with [`partial_sign`].

use crate::error::SolError;
use crate::keypair::SolKeypair;

const SIGNATURE_LEN: usize = 64;

/// Solana caps legacy transactions at this many serialized bytes.
pub const PACKET_DATA_SIZE: usize = 1232;

// ---------------------------------------------------------------------------
// Compact-u16 encoding
// ---------------------------------------------------------------------------

/// Encode a `u16` value in Solana's compact-u16 format.
///
/// - Values 0..0x7f       -> 1 byte
/// - Values 0x80..0x3fff  -> 2 bytes
/// - Values 0x4000..      -> 3 bytes
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut val = value as u32;
    let mut out = Vec::with_capacity(3);

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

/// Decode a compact-u16 value from a byte slice.
///
/// Returns `(value, bytes_consumed)`.
pub fn decode_compact_u16(data: &[u8]) -> Result<(u16, usize), SolError> {
    let mut value: u32 = 0;
    let mut shift = 0u32;
    let mut consumed = 0usize;

    loop {
        let byte = *data.get(consumed).ok_or_else(|| {
            SolError::SerializationError("unexpected end of data while decoding compact-u16".into())
        })?;
        consumed += 1;

        value |= ((byte & 0x7f) as u32) << shift;
        shift += 7;

        if byte & 0x80 == 0 || consumed >= 3 {
            break;
        }
    }

    if value > u16::MAX as u32 {
        return Err(SolError::SerializationError(
            "compact-u16 value overflow".into(),
        ));
    }

    Ok((value as u16, consumed))
}

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// A single account reference in a Solana instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolAccountMeta {
    pub pubkey: [u8; 32],
    pub is_signer: bool,
    pub is_writable: bool,
}

impl SolAccountMeta {
    /// A writable account reference.
    pub fn writable(pubkey: [u8; 32], is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    /// A read-only account reference.
    pub fn readonly(pubkey: [u8; 32], is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

/// A Solana instruction (before it is compiled into a transaction).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolInstruction {
    pub program_id: [u8; 32],
    pub accounts: Vec<SolAccountMeta>,
    pub data: Vec<u8>,
}

/// A compiled legacy transaction message.
#[derive(Debug, Clone)]
pub struct SolTransaction {
    /// All account keys referenced by this transaction, in canonical order:
    ///   1. writable signers (fee payer first)
    ///   2. read-only signers
    ///   3. writable non-signers
    ///   4. read-only non-signers
    pub account_keys: Vec<[u8; 32]>,

    /// Number of required signatures (first N accounts are signers).
    pub num_required_signatures: u8,
    /// How many of the signing accounts are read-only.
    pub num_readonly_signed: u8,
    /// How many of the non-signing accounts are read-only.
    pub num_readonly_unsigned: u8,

    pub recent_blockhash: [u8; 32],

    pub compiled_instructions: Vec<CompiledInstruction>,
}

impl SolTransaction {
    /// Public keys whose signatures this transaction requires, in slot order.
    pub fn signer_keys(&self) -> &[[u8; 32]] {
        &self.account_keys[..self.num_required_signatures as usize]
    }

    /// The fee payer (always the first signer).
    pub fn fee_payer(&self) -> &[u8; 32] {
        &self.account_keys[0]
    }
}

/// A compiled instruction where account references are replaced by u8 indices
/// into the transaction's `account_keys` array.
#[derive(Debug, Clone)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub account_indices: Vec<u8>,
    pub data: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Compilation
// ---------------------------------------------------------------------------

/// Compile a set of instructions into a transaction with a single fee payer.
///
/// The fee payer is always the first signer and sits at index 0 of the
/// account keys. Accounts referenced by several instructions are merged and
/// their signer / writable flags OR-ed together.
pub fn compile_transaction(
    instructions: &[SolInstruction],
    fee_payer: &[u8; 32],
    recent_blockhash: &[u8; 32],
) -> Result<SolTransaction, SolError> {
    if instructions.is_empty() {
        return Err(SolError::TransactionBuildError(
            "transaction needs at least one instruction".into(),
        ));
    }

    struct AccountEntry {
        pubkey: [u8; 32],
        is_signer: bool,
        is_writable: bool,
    }

    let mut entries: Vec<AccountEntry> = Vec::new();

    let mut upsert = |pubkey: [u8; 32], signer: bool, writable: bool| {
        if let Some(entry) = entries.iter_mut().find(|e| e.pubkey == pubkey) {
            entry.is_signer |= signer;
            entry.is_writable |= writable;
        } else {
            entries.push(AccountEntry {
                pubkey,
                is_signer: signer,
                is_writable: writable,
            });
        }
    };

    upsert(*fee_payer, true, true);

    for ix in instructions {
        for meta in &ix.accounts {
            upsert(meta.pubkey, meta.is_signer, meta.is_writable);
        }
        upsert(ix.program_id, false, false);
    }

    // Stable sort keeps insertion order inside each class, so the fee payer
    // (inserted first as a writable signer) stays at index 0.
    entries.sort_by_key(|e| match (e.is_signer, e.is_writable) {
        (true, true) => 0u8,
        (true, false) => 1,
        (false, true) => 2,
        (false, false) => 3,
    });

    if entries.len() > u8::MAX as usize {
        return Err(SolError::TransactionBuildError(format!(
            "too many accounts: {}",
            entries.len()
        )));
    }

    let count = |pred: fn(&AccountEntry) -> bool| entries.iter().filter(|e| pred(e)).count() as u8;
    let num_signers = count(|e| e.is_signer);
    let num_readonly_signed = count(|e| e.is_signer && !e.is_writable);
    let num_readonly_unsigned = count(|e| !e.is_signer && !e.is_writable);

    let account_keys: Vec<[u8; 32]> = entries.iter().map(|e| e.pubkey).collect();
    let index_of = |key: &[u8; 32]| -> Result<u8, SolError> {
        account_keys
            .iter()
            .position(|k| k == key)
            .map(|i| i as u8)
            .ok_or_else(|| SolError::TransactionBuildError("account not in account keys".into()))
    };

    let mut compiled = Vec::with_capacity(instructions.len());
    for ix in instructions {
        let account_indices = ix
            .accounts
            .iter()
            .map(|meta| index_of(&meta.pubkey))
            .collect::<Result<Vec<_>, _>>()?;

        compiled.push(CompiledInstruction {
            program_id_index: index_of(&ix.program_id)?,
            account_indices,
            data: ix.data.clone(),
        });
    }

    Ok(SolTransaction {
        account_keys,
        num_required_signatures: num_signers,
        num_readonly_signed,
        num_readonly_unsigned,
        recent_blockhash: *recent_blockhash,
        compiled_instructions: compiled,
    })
}

/// Serialize the transaction message (the bytes that get signed).
pub fn serialize_message(tx: &SolTransaction) -> Result<Vec<u8>, SolError> {
    let mut buf = Vec::with_capacity(512);

    buf.push(tx.num_required_signatures);
    buf.push(tx.num_readonly_signed);
    buf.push(tx.num_readonly_unsigned);

    buf.extend_from_slice(&encode_compact_u16(tx.account_keys.len() as u16));
    for key in &tx.account_keys {
        buf.extend_from_slice(key);
    }

    buf.extend_from_slice(&tx.recent_blockhash);

    buf.extend_from_slice(&encode_compact_u16(
        tx.compiled_instructions.len() as u16
    ));
    for ix in &tx.compiled_instructions {
        buf.push(ix.program_id_index);

        buf.extend_from_slice(&encode_compact_u16(ix.account_indices.len() as u16));
        buf.extend_from_slice(&ix.account_indices);

        let data_len = u16::try_from(ix.data.len()).map_err(|_| {
            SolError::SerializationError(format!("instruction data too long: {}", ix.data.len()))
        })?;
        buf.extend_from_slice(&encode_compact_u16(data_len));
        buf.extend_from_slice(&ix.data);
    }

    Ok(buf)
}

/// Size in bytes of the signed wire form, without enforcing
/// [`PACKET_DATA_SIZE`].
pub fn wire_len(tx: &SolTransaction) -> Result<usize, SolError> {
    let num_sigs = tx.num_required_signatures as usize;
    Ok(encode_compact_u16(num_sigs as u16).len()
        + num_sigs * SIGNATURE_LEN
        + serialize_message(tx)?.len())
}

/// Serialize the transaction with every signature slot zeroed.
///
/// This is the form handed from signer to signer; see [`partial_sign`].
pub fn serialize_unsigned(tx: &SolTransaction) -> Result<Vec<u8>, SolError> {
    let message = serialize_message(tx)?;
    let num_sigs = tx.num_required_signatures as usize;

    let mut wire = Vec::with_capacity(3 + num_sigs * SIGNATURE_LEN + message.len());
    wire.extend_from_slice(&encode_compact_u16(num_sigs as u16));
    wire.resize(wire.len() + num_sigs * SIGNATURE_LEN, 0);
    wire.extend_from_slice(&message);

    if wire.len() > PACKET_DATA_SIZE {
        return Err(SolError::SerializationError(format!(
            "transaction is {} bytes, limit is {PACKET_DATA_SIZE}",
            wire.len()
        )));
    }

    Ok(wire)
}

/// Sign a transaction with every required signer and return wire bytes.
///
/// Fails if any required signature has no matching keypair in `signers`.
pub fn sign_transaction(tx: &SolTransaction, signers: &[&SolKeypair]) -> Result<Vec<u8>, SolError> {
    let mut wire = serialize_unsigned(tx)?;
    for signer in signers {
        wire = partial_sign(&wire, signer)?;
    }

    let missing = missing_signers(&wire)?;
    if !missing.is_empty() {
        let names: Vec<String> = missing
            .iter()
            .map(crate::address::pubkey_to_address)
            .collect();
        return Err(SolError::SigningError(format!(
            "missing signatures for {}",
            names.join(", ")
        )));
    }

    Ok(wire)
}

// ---------------------------------------------------------------------------
// Raw wire-format signing
// ---------------------------------------------------------------------------

/// Parsed view over a wire-format transaction.
struct WireLayout<'a> {
    sigs_start: usize,
    num_sigs: usize,
    message: &'a [u8],
    signer_keys: Vec<[u8; 32]>,
}

fn parse_wire(raw_tx: &[u8]) -> Result<WireLayout<'_>, SolError> {
    let (num_sigs, compact_len) = decode_compact_u16(raw_tx)?;
    if num_sigs == 0 {
        return Err(SolError::TransactionBuildError(
            "transaction has zero signatures".into(),
        ));
    }

    let sigs_start = compact_len;
    let sigs_end = sigs_start + num_sigs as usize * SIGNATURE_LEN;
    if sigs_end > raw_tx.len() {
        return Err(SolError::SerializationError(
            "transaction too short: signature slots exceed length".into(),
        ));
    }

    let message = &raw_tx[sigs_end..];
    if message.len() < 4 {
        return Err(SolError::SerializationError(
            "transaction message too short".into(),
        ));
    }

    let num_required_sigs = message[0] as usize;
    let (num_accounts, accounts_compact_len) = decode_compact_u16(&message[3..])?;
    let accounts_start = 3 + accounts_compact_len;
    let accounts_end = accounts_start + num_accounts as usize * 32;
    if accounts_end > message.len() {
        return Err(SolError::SerializationError(
            "transaction message too short for account keys".into(),
        ));
    }

    let signer_keys = message[accounts_start..accounts_end]
        .chunks_exact(32)
        .take(num_required_sigs.min(num_sigs as usize))
        .map(|chunk| {
            let mut key = [0u8; 32];
            key.copy_from_slice(chunk);
            key
        })
        .collect();

    Ok(WireLayout {
        sigs_start,
        num_sigs: num_sigs as usize,
        message,
        signer_keys,
    })
}

/// Sign a wire-format transaction with one keypair, writing its signature
/// into the slot that belongs to its public key.
///
/// Other slots are left untouched, so a transaction can be passed through
/// several signers in any order.
pub fn partial_sign(raw_tx: &[u8], keypair: &SolKeypair) -> Result<Vec<u8>, SolError> {
    let layout = parse_wire(raw_tx)?;
    let our_pubkey = keypair.pubkey();

    let slot = layout
        .signer_keys
        .iter()
        .position(|k| *k == our_pubkey)
        .ok_or_else(|| {
            SolError::SigningError(format!(
                "{} not found in transaction signers",
                keypair.address()
            ))
        })?;

    let signature = keypair.sign(layout.message);

    let mut signed_tx = raw_tx.to_vec();
    let offset = layout.sigs_start + slot * SIGNATURE_LEN;
    signed_tx[offset..offset + SIGNATURE_LEN].copy_from_slice(&signature);

    Ok(signed_tx)
}

/// Public keys whose signature slot is still all zeros.
pub fn missing_signers(raw_tx: &[u8]) -> Result<Vec<[u8; 32]>, SolError> {
    let layout = parse_wire(raw_tx)?;
    Ok(layout
        .signer_keys
        .iter()
        .enumerate()
        .filter(|(slot, _)| {
            let offset = layout.sigs_start + slot * SIGNATURE_LEN;
            raw_tx[offset..offset + SIGNATURE_LEN].iter().all(|b| *b == 0)
        })
        .map(|(_, key)| *key)
        .collect())
}

/// The transaction id: Base58 of the first (fee payer's) signature.
pub fn transaction_signature(raw_tx: &[u8]) -> Result<String, SolError> {
    let layout = parse_wire(raw_tx)?;
    debug_assert!(layout.num_sigs > 0);
    let first = &raw_tx[layout.sigs_start..layout.sigs_start + SIGNATURE_LEN];
    Ok(bs58::encode(first).into_string())
}
