//! Field validators shared by every admin vertical.
//!
//! Slugs are lowercase ASCII alphanumerics joined by single hyphens.

use crate::errors::ModelError;

pub const MAX_SLUG_LEN: usize = 120;
pub const MAX_NAME_LEN: usize = 200;
pub const MAX_URL_LEN: usize = 1024;

/// Derive a slug from a display name: ASCII letters and digits are kept, every other
/// run of characters collapses into one `-`.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out.truncate(MAX_SLUG_LEN);
    while out.ends_with('-') {
        out.pop();
    }
    out
}

pub fn validate_slug(slug: &str) -> Result<(), ModelError> {
    if slug.is_empty() || slug.len() > MAX_SLUG_LEN {
        return Err(ModelError::Validation(format!("slug must be 1..={MAX_SLUG_LEN} characters")));
    }
    let well_formed = slug.split('-').all(|part| {
        !part.is_empty() && part.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
    });
    if !well_formed {
        return Err(ModelError::Validation("slug must be lowercase letters and digits separated by single '-'".into()));
    }
    Ok(())
}

/// Use the supplied slug when present, otherwise derive one from `name`.
pub fn resolve_slug(slug: Option<&str>, name: &str) -> Result<String, ModelError> {
    let slug = match slug.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => slugify(name),
    };
    validate_slug(&slug)?;
    Ok(slug)
}

pub fn validate_name(field: &str, value: &str) -> Result<String, ModelError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModelError::Validation(format!("{field} required")));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ModelError::Validation(format!("{field} must be at most {MAX_NAME_LEN} characters")));
    }
    Ok(trimmed.to_string())
}

/// Accepts absolute http(s) URLs and server-relative paths such as `/media/abc.png`.
pub fn validate_url(field: &str, value: &str) -> Result<(), ModelError> {
    if value.len() > MAX_URL_LEN {
        return Err(ModelError::Validation(format!("{field} too long")));
    }
    if !(value.starts_with("https://") || value.starts_with("http://") || value.starts_with('/')) {
        return Err(ModelError::Validation(format!("{field} must be an http(s) URL or start with '/'")));
    }
    Ok(())
}

pub fn validate_price(price_cents: i64) -> Result<(), ModelError> {
    if price_cents < 0 {
        return Err(ModelError::Validation("price must not be negative".into()));
    }
    Ok(())
}

pub fn validate_stock(stock: i32) -> Result<(), ModelError> {
    if stock < 0 {
        return Err(ModelError::Validation("stock must not be negative".into()));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ModelError::Validation("invalid email".into()));
    };
    if local.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

/// Phone numbers: optional leading `+`, then 6..=15 digits; spaces and dashes are ignored.
pub fn normalize_phone(phone: &str) -> Result<String, ModelError> {
    let trimmed = phone.trim();
    let (plus, rest) = match trimmed.strip_prefix('+') {
        Some(r) => ("+", r),
        None => ("", trimmed),
    };
    let digits: String = rest.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
    if !(6..=15).contains(&digits.len()) || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ModelError::Validation("invalid phone number".into()));
    }
    Ok(format!("{plus}{digits}"))
}

/// Blank optional strings are stored as NULL.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("  Home Cleaning & Repair!! "), "home-cleaning-repair");
        assert_eq!(slugify("AC--Service 2024"), "ac-service-2024");
        assert_eq!(slugify("বাংলা"), "");
    }

    #[test]
    fn slug_rules() {
        assert!(validate_slug("deep-cleaning").is_ok());
        assert!(validate_slug("Deep-cleaning").is_err());
        assert!(validate_slug("deep--cleaning").is_err());
        assert!(validate_slug("-deep").is_err());
        assert!(validate_slug("").is_err());
        assert!(validate_slug(&"a".repeat(MAX_SLUG_LEN + 1)).is_err());
    }

    #[test]
    fn resolve_slug_prefers_explicit_value() {
        assert_eq!(resolve_slug(Some("custom"), "Some Name").unwrap(), "custom");
        assert_eq!(resolve_slug(Some("  "), "Some Name").unwrap(), "some-name");
        assert_eq!(resolve_slug(None, "Plumbing").unwrap(), "plumbing");
        assert!(resolve_slug(None, "!!!").is_err());
    }

    #[test]
    fn urls_and_prices() {
        assert!(validate_url("image_url", "https://cdn.example.com/a.png").is_ok());
        assert!(validate_url("image_url", "/media/a.png").is_ok());
        assert!(validate_url("image_url", "ftp://x").is_err());
        assert!(validate_price(0).is_ok());
        assert!(validate_price(-1).is_err());
        assert!(validate_stock(-5).is_err());
    }

    #[test]
    fn phone_normalization() {
        assert_eq!(normalize_phone("+880 1711-000000").unwrap(), "+8801711000000");
        assert!(normalize_phone("12ab45").is_err());
        assert!(normalize_phone("123").is_err());
    }

    #[test]
    fn email_and_blank_helpers() {
        assert!(validate_email("a@b.co").is_ok());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("@b.co").is_err());
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" x ".into())), Some("x".into()));
    }
}
