/// Validate an email: must contain '@' and '.', max 254 chars.
pub fn validate_email(email: &str) -> Option<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Some("Notification email is required".to_string());
    }
    if trimmed.len() > 254 {
        return Some("Notification email must be at most 254 characters".to_string());
    }
    if !trimmed.contains('@') || !trimmed.contains('.') {
        return Some("Notification email must be a valid address (contain '@' and '.')".to_string());
    }
    None
}

/// Validate a required text field with a max length.
pub fn validate_required(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    if trimmed.len() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Validate an optional text field with a max length (empty is OK).
pub fn validate_optional(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if !trimmed.is_empty() && trimmed.len() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_and_presence() {
        assert_eq!(validate_required("  ", "Name", 10), Some("Name is required".to_string()));
        assert_eq!(validate_required("Contact", "Name", 3), Some("Name must be at most 3 characters".to_string()));
        assert_eq!(validate_optional("", "Menu name", 3), None);
        assert!(validate_email("nobody").is_some());
        assert_eq!(validate_email("a@example.com"), None);
    }
}
