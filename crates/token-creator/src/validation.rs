//! Form validation. Pure, first failing rule wins.

use crate::error::ValidationError;
use crate::types::TokenForm;

pub const MAX_NAME_CHARS: usize = 32;
pub const MAX_SYMBOL_CHARS: usize = 10;
pub const MAX_URI_CHARS: usize = 200;
pub const MAX_DESCRIPTION_CHARS: usize = 200;
pub const MAX_DECIMALS: i64 = 9;

/// Check `form` against the creation rules, in order: name, symbol, URI,
/// decimals, description.
pub fn validate_form(form: &TokenForm) -> Result<(), ValidationError> {
    if form.name.trim().is_empty() {
        return Err(ValidationError::NameRequired);
    }
    if char_len(&form.name) > MAX_NAME_CHARS {
        return Err(ValidationError::NameTooLong);
    }
    if form.symbol.trim().is_empty() {
        return Err(ValidationError::SymbolRequired);
    }
    if char_len(&form.symbol) > MAX_SYMBOL_CHARS {
        return Err(ValidationError::SymbolTooLong);
    }
    if form.uri.trim().is_empty() {
        return Err(ValidationError::UriRequired);
    }
    if char_len(&form.uri) > MAX_URI_CHARS {
        return Err(ValidationError::UriTooLong);
    }
    if !(0..=MAX_DECIMALS).contains(&form.decimals) {
        return Err(ValidationError::DecimalsOutOfRange);
    }
    if char_len(&form.description) > MAX_DESCRIPTION_CHARS {
        return Err(ValidationError::DescriptionTooLong);
    }
    Ok(())
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
