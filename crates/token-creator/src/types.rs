use serde::{Deserialize, Serialize};

/// Default number of decimals for a new mint.
pub const DEFAULT_DECIMALS: i64 = 9;

/// User-editable token form.
///
/// `decimals` is signed so out-of-range input survives until validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenForm {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub decimals: i64,
    pub description: String,
}

impl Default for TokenForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            symbol: String::new(),
            uri: String::new(),
            decimals: DEFAULT_DECIMALS,
            description: String::new(),
        }
    }
}

/// A single input of [`TokenForm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Symbol,
    Uri,
    Decimals,
    Description,
}

impl TokenForm {
    /// Apply raw input text to one field.
    ///
    /// Symbols are upper-cased. Decimals keep their leading integer
    /// (`"6.5"` is 6); input with no leading digits becomes 0.
    pub fn apply(&mut self, field: FormField, value: &str) {
        match field {
            FormField::Name => self.name = value.to_string(),
            FormField::Symbol => self.symbol = value.to_uppercase(),
            FormField::Uri => self.uri = value.to_string(),
            FormField::Decimals => self.decimals = leading_integer(value),
            FormField::Description => self.description = value.to_string(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Optional sign and leading digits of `value`, ignoring anything after.
/// Overflow saturates so that it stays out of range for validation.
fn leading_integer(value: &str) -> i64 {
    let trimmed = value.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut n: i64 = 0;
    for digit in rest.bytes().take_while(u8::is_ascii_digit) {
        let d = i64::from(digit - b'0');
        n = n.saturating_mul(10).saturating_add(d);
    }
    if negative {
        -n
    } else {
        n
    }
}

/// Solana cluster the creator talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cluster {
    #[default]
    Devnet,
    Testnet,
    MainnetBeta,
    Custom,
}

impl Cluster {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cluster::Devnet => "devnet",
            Cluster::Testnet => "testnet",
            Cluster::MainnetBeta => "mainnet-beta",
            Cluster::Custom => "custom",
        }
    }

    /// Public RPC endpoint. `Custom` has none.
    pub fn default_rpc_url(&self) -> Option<&'static str> {
        match self {
            Cluster::Devnet => Some("https://api.devnet.solana.com"),
            Cluster::Testnet => Some("https://api.testnet.solana.com"),
            Cluster::MainnetBeta => Some("https://api.mainnet-beta.solana.com"),
            Cluster::Custom => None,
        }
    }
}

/// Ledger confirmation level, ordered weakest first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

/// The two authorities of a new mint. They are independent identifiers even
/// though creation currently sets both to the connected wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authorities {
    pub mint_authority: [u8; 32],
    pub update_authority: [u8; 32],
}

impl Authorities {
    pub fn wallet(pubkey: [u8; 32]) -> Self {
        Self {
            mint_authority: pubkey,
            update_authority: pubkey,
        }
    }
}

/// What to do when two additional-metadata entries share a key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateKeyPolicy {
    /// Fail the attempt with a validation error.
    #[default]
    Reject,
    /// Replace the earlier value, keeping its position.
    Overwrite,
}

/// Optional extras for a creation attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreationOptions {
    /// Additional metadata written after `description`, in order.
    pub extra_fields: Vec<(String, String)>,
    /// Base units minted to the creator's associated token account.
    pub initial_supply: Option<u64>,
    pub duplicate_keys: DuplicateKeyPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_defaults() {
        let form = TokenForm::default();
        assert!(form.name.is_empty());
        assert!(form.symbol.is_empty());
        assert!(form.uri.is_empty());
        assert!(form.description.is_empty());
        assert_eq!(form.decimals, 9);
    }

    #[test]
    fn symbol_is_uppercased() {
        let mut form = TokenForm::default();
        form.apply(FormField::Symbol, "mtk");
        assert_eq!(form.symbol, "MTK");
    }

    #[test]
    fn decimals_parse_or_zero() {
        let mut form = TokenForm::default();
        form.apply(FormField::Decimals, "6");
        assert_eq!(form.decimals, 6);
        form.apply(FormField::Decimals, "abc");
        assert_eq!(form.decimals, 0);
        form.apply(FormField::Decimals, "-3");
        assert_eq!(form.decimals, -3);
        form.apply(FormField::Decimals, "12");
        assert_eq!(form.decimals, 12);
        form.apply(FormField::Decimals, "");
        assert_eq!(form.decimals, 0);
    }

    #[test]
    fn decimals_keep_leading_integer() {
        let mut form = TokenForm::default();
        form.apply(FormField::Decimals, "6.5");
        assert_eq!(form.decimals, 6);
        form.apply(FormField::Decimals, " 3px");
        assert_eq!(form.decimals, 3);
        form.apply(FormField::Decimals, "+4");
        assert_eq!(form.decimals, 4);
        form.apply(FormField::Decimals, "-");
        assert_eq!(form.decimals, 0);
    }

    #[test]
    fn overflowing_decimals_stay_out_of_range() {
        let mut form = TokenForm {
            name: "My Token".into(),
            symbol: "MTK".into(),
            uri: "https://x/y.json".into(),
            ..Default::default()
        };
        form.apply(FormField::Decimals, "99999999999999999999");
        assert_eq!(form.decimals, i64::MAX);
        assert_eq!(
            crate::validation::validate_form(&form),
            Err(crate::error::ValidationError::DecimalsOutOfRange)
        );

        form.apply(FormField::Decimals, "-99999999999999999999");
        assert!(form.decimals < 0);
        assert!(crate::validation::validate_form(&form).is_err());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut form = TokenForm::default();
        form.apply(FormField::Name, "My Token");
        form.apply(FormField::Decimals, "2");
        form.reset();
        assert_eq!(form, TokenForm::default());
    }

    #[test]
    fn commitment_ordering() {
        assert!(Commitment::Processed < Commitment::Confirmed);
        assert!(Commitment::Confirmed < Commitment::Finalized);
        assert_eq!(Commitment::default(), Commitment::Confirmed);
    }

    #[test]
    fn cluster_serde_names() {
        let c: Cluster = serde_json::from_str("\"mainnet-beta\"").unwrap();
        assert_eq!(c, Cluster::MainnetBeta);
        assert_eq!(c.as_str(), "mainnet-beta");
        assert!(Cluster::Custom.default_rpc_url().is_none());
    }

    #[test]
    fn authorities_from_wallet() {
        let a = Authorities::wallet([4u8; 32]);
        assert_eq!(a.mint_authority, a.update_authority);
    }
}
