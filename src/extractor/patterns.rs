// file: src/extractor/patterns.rs
// description: compiled regex patterns for indicator extraction
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;
use std::net::Ipv4Addr;

lazy_static! {
    // Network indicators, strict octets and every defang separator we refang
    pub static ref GENERAL_IPV4: Regex = Regex::new(
        r"(?i)\b(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)(?:\[\.\]|\(\.\)|\{\.\}|\[dot\]|\(dot\)|\{dot\}|\.)){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\b"
    ).expect("GENERAL_IPV4 regex is valid");

    // Loose dotted quad used on PDF text, octets are not range checked
    pub static ref IP_ONLY_IPV4: Regex = Regex::new(
        r"\b(?:[0-9]{1,3}(?:\.|\[\.\])){3}[0-9]{1,3}\b"
    ).expect("IP_ONLY_IPV4 regex is valid");

    pub static ref URL: Regex = Regex::new(
        r#"(?i)\b(?:hxxps?|https?|fxp|ftps?|sftp)(?:\[:\]|:)//[^\s"'<>]+"#
    ).expect("URL regex is valid");

    pub static ref EMAIL: Regex = Regex::new(
        r"(?i)\b[a-z0-9._%+-]+(?:@|\[@\]|\[at\])[a-z0-9.-]+(?:\.|\[\.\])[a-z]{2,}\b"
    ).expect("EMAIL regex is valid");

    // File hashes
    pub static ref MD5_HASH: Regex = Regex::new(
        r"\b[a-fA-F0-9]{32}\b"
    ).expect("MD5_HASH regex is valid");

    pub static ref SHA1_HASH: Regex = Regex::new(
        r"\b[a-fA-F0-9]{40}\b"
    ).expect("SHA1_HASH regex is valid");

    pub static ref SHA256_HASH: Regex = Regex::new(
        r"\b[a-fA-F0-9]{64}\b"
    ).expect("SHA256_HASH regex is valid");

    // Refang helpers
    pub static ref DEFANG_DOT: Regex = Regex::new(
        r"(?i)\s*(?:\[\.\]|\(\.\)|\{\.\}|\[dot\]|\(dot\)|\{dot\})\s*"
    ).expect("DEFANG_DOT regex is valid");

    pub static ref DOT_WORD: Regex = Regex::new(
        r"(?i)\s*[\[\(\{]dot[\]\)\}]\s*"
    ).expect("DOT_WORD regex is valid");

    pub static ref DEFANG_SCHEME: Regex = Regex::new(
        r"(?i)^(?:hxxp(s?)|fxp(s?))"
    ).expect("DEFANG_SCHEME regex is valid");

    pub static ref DEFANG_AT: Regex = Regex::new(
        r"(?i)\[@\]|\[at\]"
    ).expect("DEFANG_AT regex is valid");
}

pub fn is_private_ip(ip: &str) -> bool {
    match ip.parse::<Ipv4Addr>() {
        Ok(addr) => addr.is_private() || addr.is_loopback() || addr.is_link_local(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_ip_pattern() {
        assert!(GENERAL_IPV4.is_match("192.168.1.1"));
        assert!(GENERAL_IPV4.is_match("8[.]8[.]8[.]8"));
        assert!(GENERAL_IPV4.is_match("8(.)8(.)8(.)8"));
        assert!(GENERAL_IPV4.is_match("8[DOT]8[dot]8[dot]8"));
        assert!(!GENERAL_IPV4.is_match("999.999.999.999"));
    }

    #[test]
    fn test_ip_only_pattern_is_loose() {
        assert!(IP_ONLY_IPV4.is_match("999.999.999.999"));
        assert!(IP_ONLY_IPV4.is_match("1[.]2[.]3[.]4"));
        assert!(!IP_ONLY_IPV4.is_match("1(.)2(.)3(.)4"));
    }

    #[test]
    fn test_url_pattern() {
        assert!(URL.is_match("hxxp://evil[.]example/payload"));
        assert!(URL.is_match("https[:]//evil.example"));
        assert!(!URL.is_match("evil.example/payload"));
    }

    #[test]
    fn test_hash_patterns_do_not_overlap() {
        let sha256 = "a".repeat(64);
        assert!(SHA256_HASH.is_match(&sha256));
        assert!(!MD5_HASH.is_match(&sha256));
        assert!(!SHA1_HASH.is_match(&sha256));
    }

    #[test]
    fn test_private_ip_detection() {
        assert!(is_private_ip("192.168.1.1"));
        assert!(is_private_ip("10.0.0.1"));
        assert!(is_private_ip("172.20.0.1"));
        assert!(is_private_ip("127.0.0.1"));
        assert!(!is_private_ip("172.32.0.1"));
        assert!(!is_private_ip("8.8.8.8"));
        assert!(!is_private_ip("999.1.1.1"));
    }
}
