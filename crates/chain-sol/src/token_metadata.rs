//! Token-metadata interface as implemented by Token-2022 for mint-resident
//! metadata.
//!
//! The metadata record and the instruction payloads use Borsh layouts
//! (`u32` little-endian length prefixes for strings and vectors). Each
//! instruction is prefixed with an 8-byte discriminator: the first 8 bytes
//! of `SHA-256("spl_token_metadata_interface:<name>")`.

use sha2::{Digest, Sha256};

use crate::error::SolError;
use crate::token_2022::TOKEN_2022_PROGRAM_ID;
use crate::transaction::{SolAccountMeta, SolInstruction};

const NAMESPACE: &str = "spl_token_metadata_interface";
const INITIALIZE_NAME: &str = "initialize_account";
const UPDATE_FIELD_NAME: &str = "updating_field";

/// Discriminator for an interface instruction or record.
pub fn discriminator(name: &str) -> [u8; 8] {
    let hash = Sha256::digest(format!("{NAMESPACE}:{name}").as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&hash[..8]);
    out
}

// ---------------------------------------------------------------------------
// Metadata record
// ---------------------------------------------------------------------------

/// Metadata stored in the mint's TLV area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    /// `None` is stored as 32 zero bytes.
    pub update_authority: Option<[u8; 32]>,
    pub mint: [u8; 32],
    pub name: String,
    pub symbol: String,
    pub uri: String,
    /// Ordered key/value pairs. Keys must be unique.
    pub additional_metadata: Vec<(String, String)>,
}

impl TokenMetadata {
    /// Borsh-serialize the record (without the TLV type/length header).
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.packed_len());
        buf.extend_from_slice(self.update_authority.as_ref().unwrap_or(&[0u8; 32]));
        buf.extend_from_slice(&self.mint);
        write_string(&mut buf, &self.name);
        write_string(&mut buf, &self.symbol);
        write_string(&mut buf, &self.uri);
        buf.extend_from_slice(&(self.additional_metadata.len() as u32).to_le_bytes());
        for (key, value) in &self.additional_metadata {
            write_string(&mut buf, key);
            write_string(&mut buf, value);
        }
        buf
    }

    /// Length of [`pack`](Self::pack) without serializing.
    pub fn packed_len(&self) -> usize {
        let string_len = |s: &str| 4 + s.len();
        32 + 32
            + string_len(&self.name)
            + string_len(&self.symbol)
            + string_len(&self.uri)
            + 4
            + self
                .additional_metadata
                .iter()
                .map(|(k, v)| string_len(k) + string_len(v))
                .sum::<usize>()
    }
}

// ---------------------------------------------------------------------------
// Instructions
// ---------------------------------------------------------------------------

/// A metadata field addressed by `UpdateField`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Name,
    Symbol,
    Uri,
    /// A user-defined key in `additional_metadata`.
    Key(String),
}

impl Field {
    fn pack_into(&self, buf: &mut Vec<u8>) {
        match self {
            Field::Name => buf.push(0),
            Field::Symbol => buf.push(1),
            Field::Uri => buf.push(2),
            Field::Key(key) => {
                buf.push(3);
                write_string(buf, key);
            }
        }
    }
}

/// Decoded token-metadata instruction payloads this crate produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenMetadataInstruction {
    Initialize {
        name: String,
        symbol: String,
        uri: String,
    },
    UpdateField {
        field: Field,
        value: String,
    },
}

impl TokenMetadataInstruction {
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        match self {
            Self::Initialize { name, symbol, uri } => {
                buf.extend_from_slice(&discriminator(INITIALIZE_NAME));
                write_string(&mut buf, name);
                write_string(&mut buf, symbol);
                write_string(&mut buf, uri);
            }
            Self::UpdateField { field, value } => {
                buf.extend_from_slice(&discriminator(UPDATE_FIELD_NAME));
                field.pack_into(&mut buf);
                write_string(&mut buf, value);
            }
        }
        buf
    }

    pub fn unpack(data: &[u8]) -> Result<Self, SolError> {
        if data.len() < 8 {
            return Err(SolError::InvalidInstructionData(
                "shorter than discriminator".into(),
            ));
        }
        let (disc, rest) = data.split_at(8);
        let mut reader = Reader { data: rest };

        let ix = if disc == discriminator(INITIALIZE_NAME) {
            Self::Initialize {
                name: reader.string()?,
                symbol: reader.string()?,
                uri: reader.string()?,
            }
        } else if disc == discriminator(UPDATE_FIELD_NAME) {
            let field = match reader.u8()? {
                0 => Field::Name,
                1 => Field::Symbol,
                2 => Field::Uri,
                3 => Field::Key(reader.string()?),
                tag => {
                    return Err(SolError::InvalidInstructionData(format!(
                        "unknown field tag {tag}"
                    )))
                }
            };
            Self::UpdateField {
                field,
                value: reader.string()?,
            }
        } else {
            return Err(SolError::InvalidInstructionData(
                "unknown discriminator".into(),
            ));
        };

        if !reader.data.is_empty() {
            return Err(SolError::InvalidInstructionData(format!(
                "{} trailing bytes",
                reader.data.len()
            )));
        }
        Ok(ix)
    }
}

/// Build the metadata `Initialize` instruction against Token-2022.
///
/// Accounts: metadata (w), update authority, mint, mint authority (s).
pub fn initialize(
    metadata: &[u8; 32],
    update_authority: &[u8; 32],
    mint: &[u8; 32],
    mint_authority: &[u8; 32],
    name: &str,
    symbol: &str,
    uri: &str,
) -> SolInstruction {
    let data = TokenMetadataInstruction::Initialize {
        name: name.to_string(),
        symbol: symbol.to_string(),
        uri: uri.to_string(),
    }
    .pack();

    SolInstruction {
        program_id: TOKEN_2022_PROGRAM_ID,
        accounts: vec![
            SolAccountMeta::writable(*metadata, false),
            SolAccountMeta::readonly(*update_authority, false),
            SolAccountMeta::readonly(*mint, false),
            SolAccountMeta::readonly(*mint_authority, true),
        ],
        data,
    }
}

/// Build the metadata `UpdateField` instruction against Token-2022.
///
/// Accounts: metadata (w), update authority (s).
pub fn update_field(
    metadata: &[u8; 32],
    update_authority: &[u8; 32],
    field: Field,
    value: &str,
) -> SolInstruction {
    let data = TokenMetadataInstruction::UpdateField {
        field,
        value: value.to_string(),
    }
    .pack();

    SolInstruction {
        program_id: TOKEN_2022_PROGRAM_ID,
        accounts: vec![
            SolAccountMeta::writable(*metadata, false),
            SolAccountMeta::readonly(*update_authority, true),
        ],
        data,
    }
}

// ---------------------------------------------------------------------------
// Borsh helpers
// ---------------------------------------------------------------------------

fn write_string(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u32).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

struct Reader<'a> {
    data: &'a [u8],
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], SolError> {
        if self.data.len() < n {
            return Err(SolError::InvalidInstructionData(
                "unexpected end of data".into(),
            ));
        }
        let (head, tail) = self.data.split_at(n);
        self.data = tail;
        Ok(head)
    }

    fn u8(&mut self) -> Result<u8, SolError> {
        Ok(self.take(1)?[0])
    }

    fn string(&mut self) -> Result<String, SolError> {
        let mut len = [0u8; 4];
        len.copy_from_slice(self.take(4)?);
        let bytes = self.take(u32::from_le_bytes(len) as usize)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| SolError::InvalidInstructionData(format!("invalid utf-8: {e}")))
    }
}
