//! Rent-exemption arithmetic.
//!
//! The authoritative number always comes from the cluster
//! (`getMinimumBalanceForRentExemption`); this model mirrors the default
//! cluster parameters for offline estimates.

/// Bytes of per-account overhead the runtime charges for on top of data.
pub const ACCOUNT_STORAGE_OVERHEAD: u64 = 128;

/// Default rent parameters of mainnet, devnet and testnet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rent {
    pub lamports_per_byte_year: u64,
    pub exemption_threshold: f64,
}

impl Default for Rent {
    fn default() -> Self {
        Self {
            lamports_per_byte_year: 3480,
            exemption_threshold: 2.0,
        }
    }
}

impl Rent {
    /// Minimum balance for an account holding `data_len` bytes to be exempt.
    pub fn minimum_balance(&self, data_len: usize) -> u64 {
        let bytes = ACCOUNT_STORAGE_OVERHEAD + data_len as u64;
        ((bytes * self.lamports_per_byte_year) as f64 * self.exemption_threshold) as u64
    }
}
