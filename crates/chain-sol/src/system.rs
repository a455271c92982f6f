//! System program instructions.

use crate::transaction::{SolAccountMeta, SolInstruction};

/// The Solana System Program public key: 32 zero bytes.
/// Base58: `11111111111111111111111111111111`
pub const SYSTEM_PROGRAM_ID: [u8; 32] = [0u8; 32];

/// System Program `CreateAccount` instruction index (little-endian u32).
const SYSTEM_CREATE_ACCOUNT_IX_INDEX: u32 = 0;

/// Build a System Program `CreateAccount` instruction.
///
/// Allocates `space` bytes for `new_account`, funds it with `lamports` taken
/// from `payer` and assigns it to `owner`. Both `payer` and `new_account`
/// must sign.
///
/// # Wire format
///
/// `u32 LE index (0) | u64 LE lamports | u64 LE space | owner [32]` = 52 bytes.
pub fn create_account(
    payer: &[u8; 32],
    new_account: &[u8; 32],
    lamports: u64,
    space: u64,
    owner: &[u8; 32],
) -> SolInstruction {
    let mut data = Vec::with_capacity(52);
    data.extend_from_slice(&SYSTEM_CREATE_ACCOUNT_IX_INDEX.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());
    data.extend_from_slice(&space.to_le_bytes());
    data.extend_from_slice(owner);

    SolInstruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![
            SolAccountMeta::writable(*payer, true),
            SolAccountMeta::writable(*new_account, true),
        ],
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_account_data_layout() {
        let owner = [0xEE; 32];
        let ix = create_account(&[1u8; 32], &[2u8; 32], 5_000_000, 234, &owner);

        assert_eq!(ix.program_id, SYSTEM_PROGRAM_ID);
        assert_eq!(ix.data.len(), 52);
        assert_eq!(&ix.data[..4], &[0, 0, 0, 0]);
        assert_eq!(&ix.data[4..12], &5_000_000u64.to_le_bytes());
        assert_eq!(&ix.data[12..20], &234u64.to_le_bytes());
        assert_eq!(&ix.data[20..], &owner);
    }

    #[test]
    fn create_account_requires_both_signatures() {
        let ix = create_account(&[1u8; 32], &[2u8; 32], 1, 1, &[0xEE; 32]);

        assert_eq!(ix.accounts.len(), 2);
        assert_eq!(ix.accounts[0].pubkey, [1u8; 32]);
        assert_eq!(ix.accounts[1].pubkey, [2u8; 32]);
        assert!(ix.accounts.iter().all(|a| a.is_signer && a.is_writable));
    }
}
