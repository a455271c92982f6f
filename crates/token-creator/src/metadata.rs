//! Derive the mint-resident metadata record from a validated form.

use chain_sol::TokenMetadata;

use crate::error::ValidationError;
use crate::types::{Authorities, CreationOptions, DuplicateKeyPolicy, TokenForm};

/// Additional-metadata key holding the form's description.
pub const DESCRIPTION_KEY: &str = "description";

/// Build the ordered `additional_metadata` list: `description` when
/// non-empty, then the configured extra fields.
pub fn additional_fields(
    form: &TokenForm,
    options: &CreationOptions,
) -> Result<Vec<(String, String)>, ValidationError> {
    let description = (!form.description.is_empty())
        .then(|| (DESCRIPTION_KEY.to_string(), form.description.clone()));

    let mut fields: Vec<(String, String)> = Vec::new();
    for (key, value) in description.into_iter().chain(options.extra_fields.iter().cloned()) {
        if key.is_empty() {
            return Err(ValidationError::EmptyMetadataKey);
        }
        match fields.iter_mut().find(|(k, _)| *k == key) {
            None => fields.push((key, value)),
            Some(existing) => match options.duplicate_keys {
                DuplicateKeyPolicy::Reject => {
                    return Err(ValidationError::DuplicateMetadataKey(key))
                }
                DuplicateKeyPolicy::Overwrite => existing.1 = value,
            },
        }
    }
    Ok(fields)
}

/// Metadata record for `mint` as it will exist after creation.
pub fn build_metadata(
    form: &TokenForm,
    mint: &[u8; 32],
    authorities: &Authorities,
    options: &CreationOptions,
) -> Result<TokenMetadata, ValidationError> {
    Ok(TokenMetadata {
        update_authority: Some(authorities.update_authority),
        mint: *mint,
        name: form.name.clone(),
        symbol: form.symbol.clone(),
        uri: form.uri.clone(),
        additional_metadata: additional_fields(form, options)?,
    })
}
