// file: src/extractor/mod.rs
// description: indicator extraction module exports
// reference: internal module structure

pub mod ioc;
pub mod ip;
pub mod normalizer;
pub mod patterns;
pub mod scanner;

pub use ioc::GeneralIocScanner;
pub use ip::IpOnlyScanner;
pub use normalizer::{detect_form, normalize, normalize_str, refang};
pub use scanner::{IndicatorScanner, ScanOutput, ScanStrategy};
