//! User profile validation and completeness.

use crate::error::CoreError;
use crate::phone::is_valid_profile_phone;

/// Validate the fields an owner submits when saving their profile.
pub fn validate_profile(name: &str, phone: &str, college_name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() || phone.trim().is_empty() || college_name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Please fill all required fields".to_string(),
        ));
    }
    if !is_valid_profile_phone(phone) {
        return Err(CoreError::Validation(
            "Please enter a valid 10-digit phone number".to_string(),
        ));
    }
    Ok(())
}

/// A profile is complete once saved by its owner with every contact field set.
pub fn is_profile_complete(
    profile_completed: bool,
    name: &str,
    phone: &str,
    college_name: &str,
) -> bool {
    profile_completed
        && !name.trim().is_empty()
        && !phone.trim().is_empty()
        && !college_name.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn valid_profile_passes() {
        assert!(validate_profile("Asha", "9876543210", "IIT").is_ok());
    }

    #[test]
    fn missing_field_fails() {
        assert_matches!(
            validate_profile("Asha", "9876543210", " "),
            Err(CoreError::Validation(msg)) if msg.contains("required")
        );
    }

    #[test]
    fn bad_phone_fails() {
        assert_matches!(
            validate_profile("Asha", "12345", "IIT"),
            Err(CoreError::Validation(msg)) if msg.contains("10-digit")
        );
    }

    #[test]
    fn completeness_needs_flag_and_fields() {
        assert!(is_profile_complete(true, "Asha", "9876543210", "IIT"));
        assert!(!is_profile_complete(false, "Asha", "9876543210", "IIT"));
        assert!(!is_profile_complete(true, "", "9876543210", "IIT"));
    }
}
