pub const LOCATION_MAX: usize = 200;
pub const SHOP_NAME_MAX: usize = 200;
pub const REVIEW_TEXT_MAX: usize = 5000;

/// Validate a required text field with a max length (in characters).
pub fn validate_required(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    if trimmed.chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Validate a star rating sent by the rating select.
pub fn validate_rating(value: &str) -> Option<String> {
    match value.trim().parse::<u8>() {
        Ok(1..=5) => None,
        _ => Some("Rating must be between 1 and 5 stars".to_string()),
    }
}

/// Only local paths may be used as a post-login destination.
pub fn safe_next(next: &str) -> Option<&str> {
    if next.starts_with('/') && !next.starts_with("//") && !next.starts_with("/\\") {
        Some(next)
    } else {
        None
    }
}
