use std::sync::OnceLock;

use regex::Regex;

/// Ghanaian mobile numbers as customers type them: a leading zero and nine digits.
pub fn is_valid_msisdn(phone: &str) -> bool {
    static MSISDN: OnceLock<Regex> = OnceLock::new();
    let re = MSISDN.get_or_init(|| Regex::new(r"^0\d{9}$").expect("hardcoded regex is valid"));
    re.is_match(phone)
}

/// Paystack requires an email for every charge. Customers buying data bundles often don't have (or won't give)
/// one, so we derive a routable-looking placeholder from the phone number.
pub fn email_or_placeholder(email: Option<&str>, phone: &str) -> String {
    match email {
        Some(e) if !e.trim().is_empty() => e.trim().to_string(),
        _ => format!("{phone}@customers.dataplug.shop"),
    }
}

#[cfg(test)]
mod test {
    use super::{email_or_placeholder, is_valid_msisdn};

    #[test]
    fn msisdn_validation() {
        assert!(is_valid_msisdn("0551234567"));
        assert!(is_valid_msisdn("0240000000"));
        assert!(!is_valid_msisdn("551234567"));
        assert!(!is_valid_msisdn("+233551234567"));
        assert!(!is_valid_msisdn("05512345678"));
        assert!(!is_valid_msisdn("055123456a"));
    }

    #[test]
    fn placeholder_email() {
        assert_eq!(email_or_placeholder(Some("kofi@example.com"), "0551234567"), "kofi@example.com");
        assert_eq!(email_or_placeholder(Some("  "), "0551234567"), "0551234567@customers.dataplug.shop");
        assert_eq!(email_or_placeholder(None, "0551234567"), "0551234567@customers.dataplug.shop");
    }
}
