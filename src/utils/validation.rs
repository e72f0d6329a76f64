use crate::api::error::AppError;

/// Characters that satisfy the "special character" class of the password policy.
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*()_+{}[]|:;<>,.?/~";

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MIN_USERNAME_LENGTH: usize = 3;

/// A password is acceptable when it is at least six characters long and
/// contains an uppercase letter, a lowercase letter, a digit and one of
/// [`SPECIAL_CHARACTERS`].
pub fn password_is_valid(password: &str) -> bool {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return false;
    }

    let has_upper = password.chars().any(char::is_uppercase);
    let has_lower = password.chars().any(char::is_lowercase);
    let has_digit = password.chars().any(char::is_numeric);
    let has_special = password.chars().any(|c| SPECIAL_CHARACTERS.contains(c));

    has_upper && has_lower && has_digit && has_special
}

/// Case-folds a username for storage and lookup.
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn validate_username(username: &str) -> Result<(), AppError> {
    if username.chars().count() < MIN_USERNAME_LENGTH {
        return Err(AppError::Validation(format!(
            "Username must be at least {} characters long",
            MIN_USERNAME_LENGTH
        )));
    }
    Ok(())
}

/// Rejects blank or non-http(s) URLs supplied for items and cover images.
pub fn validate_url(field: &str, value: &str) -> Result<(), AppError> {
    let value = value.trim();
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{} must be an http(s) URL",
            field
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_policy() {
        assert!(!password_is_valid("abc123"));
        assert!(password_is_valid("Abc123!"));
        // All four classes but only five characters
        assert!(!password_is_valid("Ab1!c"));
        assert!(!password_is_valid("ABC123!"));
        assert!(!password_is_valid("abc123!"));
        assert!(!password_is_valid("Abcdef!"));
        assert!(!password_is_valid("Abc1234"));
        assert!(password_is_valid("xY9~xx"));
    }

    #[test]
    fn test_special_character_set() {
        for c in SPECIAL_CHARACTERS.chars() {
            let password = format!("Abc12{}", c);
            assert!(password_is_valid(&password), "{} should count as special", c);
        }
        // Characters outside the set do not count
        assert!(!password_is_valid("Abc12-"));
        assert!(!password_is_valid("Abc12 "));
    }

    #[test]
    fn test_normalize_username() {
        assert_eq!(normalize_username("  AliCe "), "alice");
        assert_eq!(normalize_username("bob"), "bob");
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username("abc").is_ok());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("url", "https://example.com").is_ok());
        assert!(validate_url("url", "http://example.com/a?b=c").is_ok());
        assert!(validate_url("url", "javascript:alert(1)").is_err());
        assert!(validate_url("url", "").is_err());
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(!is_blank(" a "));
    }
}
