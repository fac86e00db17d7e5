pub mod http;
#[cfg(test)]
pub mod test;

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").unwrap());

// base58 alphabet, no 0 O I l
static SOLANA_ADDRESS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{32,44}$").unwrap());

static TX_SIGNATURE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{64,90}$").unwrap());

static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]{3,32}$").unwrap());

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn validate_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

pub fn validate_username(username: &str) -> bool {
    USERNAME_REGEX.is_match(username)
}

pub fn validate_solana_address(address: &str) -> bool {
    SOLANA_ADDRESS_REGEX.is_match(address)
}

pub fn validate_tx_signature(signature: &str) -> bool {
    TX_SIGNATURE_REGEX.is_match(signature)
}

/// `EPjFWdd5...wyTDt1v` style abbreviation for long addresses.
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 16 {
        return address.to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 8..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_regex() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("first.last+tag@sub.domain.io"));

        assert!(!validate_email(""));
        assert!(!validate_email("user@example"));
        assert!(!validate_email("user example.com"));
        assert!(!validate_email("user@@example.com"));
        assert!(!validate_email("user@example."));
        assert!(!validate_email("user @example.com"));
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("MySecurePass123"));
        assert!(validate_password("123456"));
        assert!(!validate_password("12345"));
        assert!(!validate_password(""));
    }

    #[test]
    fn test_username_regex() {
        assert!(validate_username("johndoe"));
        assert!(validate_username("john_doe.99"));
        assert!(!validate_username("jo"));
        assert!(!validate_username("john doe"));
        assert!(!validate_username("john@doe"));
    }

    #[test]
    fn test_solana_address_regex() {
        assert!(validate_solana_address("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"));
        assert!(validate_solana_address("So11111111111111111111111111111111111111112"));

        assert!(!validate_solana_address("not-an-address"));
        assert!(!validate_solana_address("EPjFWdd5AufqSSqeM2qN1xzybapC8G4")); // 31 chars
        assert!(!validate_solana_address("0PjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v")); // 0 is not base58
        assert!(!validate_solana_address("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1vEPjF")); // too long
    }

    #[test]
    fn test_shorten_address() {
        assert_eq!(
            shorten_address("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"),
            "EPjFWdd5...ZwyTDt1v"
        );
        assert_eq!(shorten_address("short"), "short");
    }
}
