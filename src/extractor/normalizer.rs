// file: src/extractor/normalizer.rs
// description: refanging and canonicalization of matched indicator text
// reference: defanged ioc notation conventions

use crate::extractor::patterns::{DEFANG_AT, DEFANG_DOT, DEFANG_SCHEME, DOT_WORD};
use crate::models::{Indicator, IndicatorCandidate, SyntacticForm};
use std::borrow::Cow;

pub fn detect_form(raw: &str) -> SyntacticForm {
    if raw.contains("[.]") {
        SyntacticForm::Bracketed
    } else if raw.contains("(.)") {
        SyntacticForm::Parenthesized
    } else if raw.contains("{.}") {
        SyntacticForm::Braced
    } else if DOT_WORD.is_match(raw) {
        SyntacticForm::DotWord
    } else {
        SyntacticForm::Plain
    }
}

/// Total and pure. Feeding the result back in as `Plain` returns it unchanged.
pub fn normalize(candidate: &str, form: SyntacticForm) -> Indicator {
    let dotted: Cow<'_, str> = match form {
        SyntacticForm::Plain => Cow::Borrowed(candidate),
        SyntacticForm::Bracketed => Cow::Owned(candidate.replace("[.]", ".")),
        SyntacticForm::Parenthesized => Cow::Owned(candidate.replace("(.)", ".")),
        SyntacticForm::Braced => Cow::Owned(candidate.replace("{.}", ".")),
        SyntacticForm::DotWord => DOT_WORD.replace_all(candidate, "."),
    };

    // Mixed separators such as `1[.]2.3(.)4` only get their first marker handled above.
    let dotted = DEFANG_DOT.replace_all(&dotted, ".");

    Indicator::from_canonical(canonical_octets(&dotted))
}

pub fn normalize_candidate(candidate: &IndicatorCandidate<'_>) -> Indicator {
    normalize(candidate.raw, candidate.form)
}

pub fn normalize_str(raw: &str) -> Indicator {
    normalize(raw, detect_form(raw))
}

/// Refangs URLs and e-mail addresses. Used for pass-through IOCs, which are not canonicalized.
pub fn refang(value: &str) -> String {
    let value = value.trim();
    let value = DEFANG_SCHEME.replace(value, |caps: &regex::Captures<'_>| {
        if caps.get(1).is_some() {
            format!("http{}", &caps[1])
        } else {
            format!("ftp{}", caps.get(2).map_or("", |m| m.as_str()))
        }
    });
    let value = value.replace("[:]", ":");
    let value = DEFANG_AT.replace_all(&value, "@");
    DEFANG_DOT.replace_all(&value, ".").into_owned()
}

fn canonical_octets(dotted: &str) -> String {
    dotted
        .trim()
        .split('.')
        .map(|part| {
            let part = part.trim();
            if !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) {
                let stripped = part.trim_start_matches('0');
                if stripped.is_empty() { "0" } else { stripped }
            } else {
                part
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}
