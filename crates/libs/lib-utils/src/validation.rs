//! # Validation Utilities
//!
//! Input validation helpers.

/// Length in bytes of a decoded Solana public key.
const PUBKEY_LEN: usize = 32;

/// Validate that a string is not empty.
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate a Solana address (base58 encoding of a 32-byte public key).
pub fn validate_solana_address(value: &str, field_name: &str) -> Result<(), String> {
    validate_not_empty(value, field_name)?;

    let bytes = bs58::decode(value.trim())
        .into_vec()
        .map_err(|_| format!("{} is not valid base58", field_name))?;

    if bytes.len() != PUBKEY_LEN {
        return Err(format!(
            "{} must decode to {} bytes, got {}",
            field_name,
            PUBKEY_LEN,
            bytes.len()
        ));
    }

    Ok(())
}
