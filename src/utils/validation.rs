use crate::utils::error::{DashError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: &str, reason: impl Into<String>) -> DashError {
    DashError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// 只接受 http/https 的絕對網址
pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.trim().is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("Invalid URL format: {}", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field_name,
            url_str,
            format!("Unsupported URL scheme: {}", url.scheme()),
        ));
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    let reason = if path.trim().is_empty() {
        "Path cannot be empty"
    } else if path.contains('\0') {
        "Path contains null bytes"
    } else {
        return Ok(());
    };
    Err(invalid(field_name, path, reason))
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            &value.to_string(),
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(invalid(
        field_name,
        value,
        format!("Expected one of: {}", allowed.join(", ")),
    ))
}

/// 上傳用的分隔字元必須是單一 ASCII 字元
pub fn validate_delimiter(field_name: &str, value: &str) -> Result<u8> {
    match value.as_bytes() {
        [b] if b.is_ascii() && *b != b'"' && *b != b'\n' && *b != b'\r' => Ok(*b),
        _ => Err(invalid(
            field_name,
            value,
            "Delimiter must be a single ASCII character other than quote or newline",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("source.endpoint", "https://example.com").is_ok());
        assert!(validate_url("source.endpoint", "http://example.com").is_ok());
        assert!(validate_url("source.endpoint", "").is_err());
        assert!(validate_url("source.endpoint", "  ").is_err());
        assert!(validate_url("source.endpoint", "invalid-url").is_err());
        assert!(validate_url("source.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("source.timeout_seconds", 10, 1, 300).is_ok());
        assert!(validate_range("source.timeout_seconds", 0, 1, 300).is_err());
        assert!(validate_range("source.timeout_seconds", 301, 1, 300).is_err());
    }

    #[test]
    fn test_validate_one_of() {
        assert!(validate_one_of("navigation.default", "Home", &["Home", "About"]).is_ok());
        assert!(validate_one_of("navigation.default", "Blog", &["Home", "About"]).is_err());
    }

    #[test]
    fn test_validate_delimiter() {
        assert_eq!(validate_delimiter("delimiter", ";").unwrap(), b';');
        assert_eq!(validate_delimiter("delimiter", "\t").unwrap(), b'\t');
        assert!(validate_delimiter("delimiter", "").is_err());
        assert!(validate_delimiter("delimiter", ";;").is_err());
        assert!(validate_delimiter("delimiter", "\"").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("assets.base_path", "./media").is_ok());
        assert!(validate_path("assets.base_path", "").is_err());
        assert!(validate_path("assets.base_path", "   ").is_err());
        assert!(validate_path("assets.base_path", "bad\0path").is_err());
    }
}
