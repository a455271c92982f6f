//! Solana address encoding.
//!
//! A Solana address is the Base58 encoding of a raw 32-byte Ed25519 public
//! key (or of a program-derived address, which is 32 bytes that are
//! deliberately *off* the curve).

use crate::error::SolError;

/// Encode a 32-byte public key as a Base58 Solana address.
pub fn pubkey_to_address(pubkey: &[u8; 32]) -> String {
    bs58::encode(pubkey).into_string()
}

/// Decode a Base58 Solana address into its 32 raw bytes.
///
/// Fails if the string is not Base58 or does not decode to exactly 32 bytes.
pub fn address_to_pubkey(address: &str) -> Result<[u8; 32], SolError> {
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|e| SolError::InvalidAddress(format!("base58 decode failed: {e}")))?;

    bytes.try_into().map_err(|v: Vec<u8>| {
        SolError::InvalidAddress(format!("expected 32 bytes, got {}", v.len()))
    })
}

/// Check if 32 bytes decompress to a valid Ed25519 point.
pub fn is_on_curve(bytes: &[u8; 32]) -> bool {
    curve25519_dalek::edwards::CompressedEdwardsY(*bytes)
        .decompress()
        .is_some()
}

/// Shorten an address for display: `"7xKX..sAsU"`.
///
/// Strings shorter than `2 * len + 2` characters are returned unchanged.
pub fn ellipsify(s: &str, len: usize) -> String {
    const DELIMITER: &str = "..";
    let chars: Vec<char> = s.chars().collect();
    if chars.len() < len * 2 + DELIMITER.len() {
        return s.to_string();
    }
    let head: String = chars[..len].iter().collect();
    let tail: String = chars[chars.len() - len..].iter().collect();
    format!("{head}{DELIMITER}{tail}")
}
