// file: src/exporter/merge.rs
// description: merges per-track indicator sets and deduplicates indicator files
// reference: ordered set union

use crate::error::Result;
use crate::exporter::artifacts::{read_lines, write_lines};
use crate::extractor::normalize_str;
use crate::models::{Indicator, IndicatorSet, Ioc, TrackResult};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::info;

/// Union of every track's indicators, ascending and unique.
pub fn merge(results: &[TrackResult]) -> Vec<Indicator> {
    merge_sets(results.iter().map(|r| &r.indicators))
}

pub fn merge_sets<'a, I>(sets: I) -> Vec<Indicator>
where
    I: IntoIterator<Item = &'a IndicatorSet>,
{
    let mut merged = IndicatorSet::new();
    for set in sets {
        merged.extend_from(set);
    }
    merged.into_sorted_vec()
}

pub fn merge_passthrough(results: &[TrackResult]) -> Vec<Ioc> {
    results
        .iter()
        .flat_map(|r| r.passthrough_iocs.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Normalizes each non-blank line and returns the sorted unique result.
pub fn dedup_lines<I, S>(lines: I) -> Vec<Indicator>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| {
            let line = line.as_ref().trim();
            (!line.is_empty()).then(|| normalize_str(line))
        })
        .collect::<IndicatorSet>()
        .into_sorted_vec()
}

/// Rewrites an indicator file in place. Returns the number of lines kept.
pub fn dedup_file(path: &Path) -> Result<usize> {
    let lines = read_lines(path)?;
    let before = lines.len();
    let unique = dedup_lines(&lines);

    let kept = write_lines(path, unique.iter().map(Indicator::as_str))?;
    info!(
        "Deduplicated {}: {} lines in, {} lines out",
        path.display(),
        before,
        kept
    );
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IocType, Track};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn result(track: Track, values: &[&str]) -> TrackResult {
        let mut r = TrackResult::new(track);
        r.indicators = values.iter().map(|v| normalize_str(v)).collect();
        r
    }

    fn strings(values: &[Indicator]) -> Vec<&str> {
        values.iter().map(Indicator::as_str).collect()
    }

    #[test]
    fn test_merge_unions_and_sorts() {
        let html = result(Track::Html, &["5.6.7.8", "1.2.3.4"]);
        let pdf = result(Track::Pdf, &["1.2.3.4", "10.0.0.1"]);

        let merged = merge(&[html, pdf]);
        assert_eq!(strings(&merged), vec!["1.2.3.4", "10.0.0.1", "5.6.7.8"]);
    }

    #[test]
    fn test_merge_is_commutative() {
        let a = result(Track::Html, &["1.1.1.1", "2.2.2.2"]);
        let b = result(Track::Pdf, &["2.2.2.2", "3.3.3.3"]);

        assert_eq!(merge(&[a.clone(), b.clone()]), merge(&[b, a]));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let a = result(Track::Html, &["1.1.1.1", "2.2.2.2"]);
        assert_eq!(merge(&[a.clone(), a.clone()]), merge(&[a]));
    }

    #[test]
    fn test_remerging_an_input_changes_nothing() {
        let a = result(Track::Html, &["1.1.1.1", "2.2.2.2"]);
        let b = result(Track::Pdf, &["2.2.2.2", "3.3.3.3"]);

        let ab = merge(&[a.clone(), b]);
        let ab_set: IndicatorSet = ab.iter().cloned().collect();

        assert_eq!(merge_sets([&ab_set, &a.indicators]), ab);
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge(&[]).is_empty());
        assert!(merge(&[TrackResult::new(Track::Html)]).is_empty());
    }

    #[test]
    fn test_merge_passthrough() {
        let mut html = TrackResult::new(Track::Html);
        html.passthrough_iocs
            .insert(Ioc::new(IocType::Url, "http://a.example".to_string()));
        let mut pdf = TrackResult::new(Track::Pdf);
        pdf.passthrough_iocs
            .insert(Ioc::new(IocType::Url, "http://a.example".to_string()));

        assert_eq!(merge_passthrough(&[html, pdf]).len(), 1);
    }

    #[test]
    fn test_dedup_lines_normalizes_and_drops_blanks() {
        let lines = vec!["5.6.7.8", "", "1[.]2[.]3[.]4", "  ", "1.2.3.4", "5.6.7.8"];
        assert_eq!(strings(&dedup_lines(lines)), vec!["1.2.3.4", "5.6.7.8"]);
    }

    #[test]
    fn test_dedup_file_is_stable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ips.txt");
        fs::write(&path, "9.9.9.9\n1.2.3.4\n\n9.9.9.9\n1.2.3.4").unwrap();

        assert_eq!(dedup_file(&path).unwrap(), 2);
        let first = fs::read(&path).unwrap();
        assert_eq!(first, b"1.2.3.4\n9.9.9.9\n");

        dedup_file(&path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), first);
    }
}
