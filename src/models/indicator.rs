// file: src/models/indicator.rs
// description: canonical indicator values, syntactic forms and indicator sets
// reference: defanged ioc notation conventions

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

/// How a matched IPv4 substring was written in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntacticForm {
    /// `1.2.3.4`
    Plain,
    /// `1[.]2[.]3[.]4`
    Bracketed,
    /// `1(.)2(.)3(.)4`
    Parenthesized,
    /// `1{.}2{.}3{.}4`
    Braced,
    /// `1[dot]2[dot]3[dot]4` and the `(dot)` / `{dot}` variants
    DotWord,
}

impl SyntacticForm {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyntacticForm::Plain => "plain",
            SyntacticForm::Bracketed => "bracketed",
            SyntacticForm::Parenthesized => "parenthesized",
            SyntacticForm::Braced => "braced",
            SyntacticForm::DotWord => "dot_word",
        }
    }

    pub fn is_defanged(&self) -> bool {
        !matches!(self, SyntacticForm::Plain)
    }
}

/// A raw match found by a scanner, before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorCandidate<'a> {
    pub raw: &'a str,
    pub form: SyntacticForm,
}

/// Canonical dotted-decimal form of an IP address.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Indicator(String);

impl Indicator {
    /// Callers outside the normalizer should go through `normalize` instead.
    pub(crate) fn from_canonical(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Indicator {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Indicator {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorSet {
    values: BTreeSet<Indicator>,
}

impl IndicatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the indicator was not already present.
    pub fn insert(&mut self, indicator: Indicator) -> bool {
        self.values.insert(indicator)
    }

    pub fn extend_from(&mut self, other: &IndicatorSet) {
        self.values.extend(other.values.iter().cloned());
    }

    pub fn contains(&self, indicator: &str) -> bool {
        self.values.contains(indicator)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Ascending lexicographic order of the canonical strings.
    pub fn iter(&self) -> impl Iterator<Item = &Indicator> {
        self.values.iter()
    }

    pub fn into_sorted_vec(self) -> Vec<Indicator> {
        self.values.into_iter().collect()
    }
}

impl FromIterator<Indicator> for IndicatorSet {
    fn from_iter<T: IntoIterator<Item = Indicator>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl Extend<Indicator> for IndicatorSet {
    fn extend<T: IntoIterator<Item = Indicator>>(&mut self, iter: T) {
        self.values.extend(iter);
    }
}

impl IntoIterator for IndicatorSet {
    type Item = Indicator;
    type IntoIter = std::collections::btree_set::IntoIter<Indicator>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ind(value: &str) -> Indicator {
        Indicator::from_canonical(value.to_string())
    }

    #[test]
    fn test_set_collapses_duplicates() {
        let mut set = IndicatorSet::new();
        assert!(set.insert(ind("1.2.3.4")));
        assert!(!set.insert(ind("1.2.3.4")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_set_lookup_by_str() {
        let set: IndicatorSet = ["1.2.3.4", "10.0.0.1"].into_iter().map(ind).collect();

        assert!(set.contains("10.0.0.1"));
        assert!(!set.contains("10.0.0.2"));
    }

    #[test]
    fn test_set_orders_lexicographically() {
        let set: IndicatorSet = ["9.9.9.9", "10.0.0.1", "1.2.3.4"]
            .into_iter()
            .map(ind)
            .collect();

        let ordered: Vec<&str> = set.iter().map(Indicator::as_str).collect();
        assert_eq!(ordered, vec!["1.2.3.4", "10.0.0.1", "9.9.9.9"]);
    }

    #[test]
    fn test_indicator_serializes_as_plain_string() {
        let json = serde_json::to_string(&ind("8.8.8.8")).unwrap();
        assert_eq!(json, "\"8.8.8.8\"");
    }
}
