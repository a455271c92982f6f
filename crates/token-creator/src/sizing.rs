//! Mint account sizing and rent.
//!
//! The mint account is allocated at the size of the base mint plus the
//! metadata-pointer extension. Token-2022 grows it when metadata is
//! initialized, so the rent deposit must already cover the metadata TLV
//! entry.

use chain_sol::{get_mint_len, ExtensionType, TokenMetadata, LENGTH_SIZE, TYPE_SIZE};
use tracing::debug;

use crate::error::LedgerError;
use crate::ledger::Ledger;

/// Byte sizes involved in funding a new mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintSizing {
    /// Space allocated by `CreateAccount`.
    pub mint_len: usize,
    /// TLV header of the metadata entry.
    pub metadata_extension_len: usize,
    /// Packed metadata record.
    pub metadata_len: usize,
}

impl MintSizing {
    pub fn for_metadata(metadata: &TokenMetadata) -> Self {
        Self {
            mint_len: get_mint_len(&[ExtensionType::MetadataPointer]),
            metadata_extension_len: TYPE_SIZE + LENGTH_SIZE,
            metadata_len: metadata.packed_len(),
        }
    }

    /// Size the rent deposit must cover.
    pub fn total(&self) -> usize {
        self.mint_len + self.metadata_extension_len + self.metadata_len
    }
}

/// Ask the ledger for the rent-exempt balance of the fully-grown mint.
pub async fn rent_lamports(ledger: &dyn Ledger, sizing: &MintSizing) -> Result<u64, LedgerError> {
    let total = sizing.total();
    let lamports = ledger.minimum_balance_for_rent_exemption(total).await?;
    debug!(
        mint_len = sizing.mint_len,
        metadata_len = sizing.metadata_len,
        total,
        lamports,
        "rent-exempt balance"
    );
    Ok(lamports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chain_sol::Rent;

    fn metadata(description: Option<&str>) -> TokenMetadata {
        TokenMetadata {
            update_authority: Some([1u8; 32]),
            mint: [2u8; 32],
            name: "My Token".into(),
            symbol: "MTK".into(),
            uri: "https://x/y.json".into(),
            additional_metadata: description
                .map(|d| vec![("description".to_string(), d.to_string())])
                .unwrap_or_default(),
        }
    }

    #[test]
    fn mint_len_with_metadata_pointer() {
        let sizing = MintSizing::for_metadata(&metadata(None));
        assert_eq!(sizing.mint_len, 234);
        assert_eq!(sizing.metadata_extension_len, 4);
        assert_eq!(sizing.metadata_len, 107);
        assert_eq!(sizing.total(), 345);
    }

    #[test]
    fn description_grows_total() {
        let without = MintSizing::for_metadata(&metadata(None));
        let with = MintSizing::for_metadata(&metadata(Some("demo")));
        assert_eq!(with.mint_len, without.mint_len);
        assert_eq!(with.total() - without.total(), 4 + 11 + 4 + 4);
    }

    #[test]
    fn rent_is_monotonic_in_metadata_length() {
        let rent = Rent::default();
        let mut previous = 0;
        for len in 0..64 {
            let description = "x".repeat(len);
            let md = metadata((len > 0).then_some(description.as_str()));
            let lamports = rent.minimum_balance(MintSizing::for_metadata(&md).total());
            assert!(lamports >= previous);
            previous = lamports;
        }
    }
}
