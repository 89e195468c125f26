// file: src/extractor/ioc.rs
// description: general-purpose ioc extraction with refanging, used on rendered web pages
// reference: threat intelligence ioc standards

use crate::extractor::normalizer::{detect_form, normalize, refang};
use crate::extractor::patterns::{
    EMAIL, GENERAL_IPV4, MD5_HASH, SHA1_HASH, SHA256_HASH, URL, is_private_ip,
};
use crate::extractor::scanner::{IndicatorScanner, ScanOutput};
use crate::models::{IndicatorCandidate, IndicatorSet, Ioc, IocType};
use std::collections::BTreeSet;
use tracing::trace;

/// Strict octet validation, every known defang separator, and opaque pass-through
/// of URLs, e-mail addresses and file hashes.
#[derive(Debug, Clone, Default)]
pub struct GeneralIocScanner {
    exclude_private: bool,
}

impl GeneralIocScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_private_filter(mut self, exclude_private: bool) -> Self {
        self.exclude_private = exclude_private;
        self
    }

    fn scan_ips(&self, text: &str) -> IndicatorSet {
        let mut indicators = IndicatorSet::new();

        for capture in GENERAL_IPV4.find_iter(text) {
            let candidate = IndicatorCandidate {
                raw: capture.as_str(),
                form: detect_form(capture.as_str()),
            };
            if candidate.form.is_defanged() {
                trace!("Refanging {} candidate {}", candidate.form.as_str(), candidate.raw);
            }
            let indicator = normalize(candidate.raw, candidate.form);

            if self.exclude_private && is_private_ip(indicator.as_str()) {
                continue;
            }
            indicators.insert(indicator);
        }

        indicators
    }

    fn scan_passthrough(&self, text: &str) -> BTreeSet<Ioc> {
        let mut iocs = BTreeSet::new();

        for capture in URL.find_iter(text) {
            let url = trim_url_tail(capture.as_str());
            iocs.insert(Ioc::new(IocType::Url, refang(url)));
        }

        for capture in EMAIL.find_iter(text) {
            iocs.insert(Ioc::new(IocType::Email, refang(capture.as_str()).to_lowercase()));
        }

        // SHA256 first, the word boundaries keep shorter patterns out of longer digests
        for pattern in [&*SHA256_HASH, &*SHA1_HASH, &*MD5_HASH] {
            for capture in pattern.find_iter(text) {
                iocs.insert(Ioc::new(IocType::Hash, capture.as_str().to_lowercase()));
            }
        }

        iocs
    }
}

impl IndicatorScanner for GeneralIocScanner {
    fn name(&self) -> &'static str {
        "general"
    }

    fn scan(&self, text: &str) -> IndicatorSet {
        self.scan_ips(text)
    }

    fn scan_with_passthrough(&self, text: &str) -> ScanOutput {
        ScanOutput {
            indicators: self.scan_ips(text),
            passthrough: self.scan_passthrough(text),
        }
    }
}

fn trim_url_tail(url: &str) -> &str {
    let mut url = url.trim_end_matches(['.', ',', ';', ':', '!', '?', ')', '"', '\'']);

    // keep the `]` of a trailing `[.]`, drop an unbalanced closing bracket
    while url.ends_with(']') && url.matches(']').count() > url.matches('[').count() {
        url = &url[..url.len() - 1];
    }

    url
}
