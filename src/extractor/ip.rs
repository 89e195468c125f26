// file: src/extractor/ip.rs
// description: ip-only extraction used on pdf text
// reference: dotted quad matching without octet range checks

use crate::extractor::normalizer::{detect_form, normalize_candidate};
use crate::extractor::patterns::{IP_ONLY_IPV4, is_private_ip};
use crate::extractor::scanner::IndicatorScanner;
use crate::models::{IndicatorCandidate, IndicatorSet};

/// Kept separate from [`GeneralIocScanner`](crate::extractor::GeneralIocScanner): it accepts any
/// one-to-three digit octets and only the `.` / `[.]` separators.
#[derive(Debug, Clone, Default)]
pub struct IpOnlyScanner {
    exclude_private: bool,
}

impl IpOnlyScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_private_filter(mut self, exclude_private: bool) -> Self {
        self.exclude_private = exclude_private;
        self
    }

    pub fn candidates<'a>(&self, text: &'a str) -> impl Iterator<Item = IndicatorCandidate<'a>> {
        IP_ONLY_IPV4.find_iter(text).map(|m| IndicatorCandidate {
            raw: m.as_str(),
            form: detect_form(m.as_str()),
        })
    }
}

impl IndicatorScanner for IpOnlyScanner {
    fn name(&self) -> &'static str {
        "ip-only"
    }

    fn scan(&self, text: &str) -> IndicatorSet {
        self.candidates(text)
            .map(|candidate| normalize_candidate(&candidate))
            .filter(|indicator| !(self.exclude_private && is_private_ip(indicator.as_str())))
            .collect()
    }
}
