//! Phone number normalisation for profile validation and WhatsApp delivery.

use crate::error::CoreError;

/// Profiles store a bare 10-digit mobile number.
pub fn is_valid_profile_phone(phone: &str) -> bool {
    phone.len() == 10 && phone.bytes().all(|b| b.is_ascii_digit())
}

/// Normalise a number to `+<digits>`.
///
/// Spaces, dashes, and parentheses are dropped. A leading `+` is kept;
/// otherwise one is prepended. No country code is inferred.
pub fn to_e164(raw: &str) -> Result<String, CoreError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);

    if !(7..=15).contains(&digits.len()) || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::Validation(format!(
            "Invalid WhatsApp number '{raw}'"
        )));
    }
    Ok(format!("+{digits}"))
}

/// Address form expected by the WhatsApp provider: `whatsapp:+<digits>`.
pub fn whatsapp_address(raw: &str) -> Result<String, CoreError> {
    Ok(format!("whatsapp:{}", to_e164(raw)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_phone_requires_ten_digits() {
        assert!(is_valid_profile_phone("9876543210"));
        assert!(!is_valid_profile_phone("987654321"));
        assert!(!is_valid_profile_phone("98765432100"));
        assert!(!is_valid_profile_phone("98765-4321"));
    }

    #[test]
    fn prefixes_plus_when_missing() {
        assert_eq!(to_e164("919876543210").unwrap(), "+919876543210");
        assert_eq!(to_e164("+919876543210").unwrap(), "+919876543210");
    }

    #[test]
    fn strips_formatting_characters() {
        assert_eq!(to_e164("+91 98765-43210").unwrap(), "+919876543210");
        assert_eq!(to_e164("(91) 98765 43210").unwrap(), "+919876543210");
    }

    #[test]
    fn rejects_non_numeric_or_short_numbers() {
        assert!(to_e164("abc").is_err());
        assert!(to_e164("+12").is_err());
        assert!(to_e164("").is_err());
    }

    #[test]
    fn whatsapp_address_has_channel_prefix() {
        assert_eq!(
            whatsapp_address("919876543210").unwrap(),
            "whatsapp:+919876543210"
        );
    }
}
