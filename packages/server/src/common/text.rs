/// Pure string helpers for user input
///
/// No I/O here; everything is covered by the unit tests below.
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Email pattern - RFC 5322 simplified
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$"
    ).unwrap();

    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();
}

/// Agency slug: lowercased, whitespace runs collapsed to `-`.
pub fn slugify(name: &str) -> String {
    WHITESPACE_REGEX
        .replace_all(name.trim(), "-")
        .to_lowercase()
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email.trim())
}

/// Trimmed value, or `None` when blank.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Human-readable file size ("0 Bytes", "1.5 KB", "12 MB").
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let exponent = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    let rounded = (value * 100.0).round() / 100.0;

    // Drop trailing zeros the way toFixed + parseFloat would
    let formatted = format!("{:.2}", rounded);
    let formatted = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", formatted, UNITS[exponent])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Acme Digital"), "acme-digital");
        assert_eq!(slugify("  North   Star  Studio "), "north-star-studio");
        assert_eq!(slugify("solo"), "solo");
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("owner@agency.ca"));
        assert!(is_valid_email(" Owner@Agency.CA "));
        assert!(!is_valid_email("owner@agency"));
        assert!(!is_valid_email("not an email"));
        assert_eq!(normalize_email(" Owner@Agency.CA "), "owner@agency.ca");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  hi ")), Some("hi".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(50 * 1024 * 1024), "50 MB");
    }
}
