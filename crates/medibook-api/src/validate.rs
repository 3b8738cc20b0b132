//! Small input validation helpers shared by the handlers.

/// Treat `None` and empty or whitespace-only strings alike as missing.
pub fn present(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Cheap structural email check: one `@` with a non-empty local part and
/// a dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || email.contains(char::is_whitespace) {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty()
}

/// Minimum length applied to every new password.
pub fn is_strong_password(password: &str) -> bool {
    password.len() >= 8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_rejects_empty_and_blank() {
        assert_eq!(present(&None), None);
        assert_eq!(present(&Some(String::new())), None);
        assert_eq!(present(&Some("   ".to_owned())), None);
        assert_eq!(present(&Some(" x ".to_owned())), Some("x"));
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("jan@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
        assert!(!is_valid_email("janexample.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jan@"));
        assert!(!is_valid_email("jan@example"));
        assert!(!is_valid_email("jan doe@example.com"));
    }

    #[test]
    fn test_password_strength() {
        assert!(is_strong_password("12345678"));
        assert!(!is_strong_password("1234567"));
    }
}
