// file: src/extractor/scanner.rs
// description: indicator scanner capability and per-track strategy selection
// reference: strategy selection over trait objects

use crate::config::ScanConfig;
use crate::extractor::{GeneralIocScanner, IpOnlyScanner};
use crate::models::{IndicatorSet, Ioc, Track};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default)]
pub struct ScanOutput {
    pub indicators: IndicatorSet,
    pub passthrough: BTreeSet<Ioc>,
}

/// Scanning is total: no matches is an empty set, never an error.
pub trait IndicatorScanner: Send + Sync {
    fn name(&self) -> &'static str;

    fn scan(&self, text: &str) -> IndicatorSet;

    fn scan_with_passthrough(&self, text: &str) -> ScanOutput {
        ScanOutput {
            indicators: self.scan(text),
            passthrough: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanStrategy {
    General,
    IpOnly,
}

impl ScanStrategy {
    pub fn for_track(track: Track) -> Self {
        match track {
            Track::Html => ScanStrategy::General,
            Track::Pdf => ScanStrategy::IpOnly,
        }
    }

    pub fn build(&self, config: &ScanConfig) -> Box<dyn IndicatorScanner> {
        match self {
            ScanStrategy::General => Box::new(
                GeneralIocScanner::new().with_private_filter(config.exclude_private_ips),
            ),
            ScanStrategy::IpOnly => {
                Box::new(IpOnlyScanner::new().with_private_filter(config.exclude_private_ips))
            }
        }
    }
}

impl fmt::Display for ScanStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanStrategy::General => f.write_str("general"),
            ScanStrategy::IpOnly => f.write_str("ip-only"),
        }
    }
}

impl FromStr for ScanStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" => Ok(ScanStrategy::General),
            "ip-only" | "ip_only" | "ip" => Ok(ScanStrategy::IpOnly),
            other => Err(format!("unknown scan strategy: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_per_track() {
        assert_eq!(ScanStrategy::for_track(Track::Html), ScanStrategy::General);
        assert_eq!(ScanStrategy::for_track(Track::Pdf), ScanStrategy::IpOnly);
    }

    #[test]
    fn test_strategies_stay_distinct() {
        let config = ScanConfig::default();
        let general = ScanStrategy::General.build(&config);
        let ip_only = ScanStrategy::IpOnly.build(&config);
        let text = "a 1(.)2(.)3(.)4 b 300.1.1.1";

        assert!(general.scan(text).contains("1.2.3.4"));
        assert!(!general.scan(text).contains("300.1.1.1"));
        assert!(ip_only.scan(text).contains("300.1.1.1"));
        assert!(!ip_only.scan(text).contains("1.2.3.4"));
        assert_eq!(general.name(), "general");
        assert_eq!(ip_only.name(), "ip-only");
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("ip-only".parse::<ScanStrategy>(), Ok(ScanStrategy::IpOnly));
        assert_eq!("General".parse::<ScanStrategy>(), Ok(ScanStrategy::General));
        assert!("domains".parse::<ScanStrategy>().is_err());
    }

    #[test]
    fn test_default_scan_has_no_passthrough() {
        let scanner = IpOnlyScanner::new();
        let output = scanner.scan_with_passthrough("http://1.2.3.4/x");
        assert!(output.passthrough.is_empty());
        assert_eq!(output.indicators.len(), 1);
    }
}
