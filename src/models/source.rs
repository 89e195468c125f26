// file: src/models/source.rs
// description: source references, content tracks and link classification
// reference: suffix-based link routing

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    Html,
    Pdf,
}

impl Track {
    pub fn as_str(&self) -> &'static str {
        match self {
            Track::Html => "html",
            Track::Pdf => "pdf",
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One input document. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceRef {
    Url(String),
    File { path: PathBuf, origin: String },
}

impl SourceRef {
    pub fn url(url: impl Into<String>) -> Self {
        SourceRef::Url(url.into())
    }

    /// The originating URL, also for downloaded files.
    pub fn origin(&self) -> &str {
        match self {
            SourceRef::Url(url) => url,
            SourceRef::File { origin, .. } => origin,
        }
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRef::Url(url) => f.write_str(url),
            SourceRef::File { path, origin } => write!(f, "{} ({})", origin, path.display()),
        }
    }
}

/// Search results split into the two content tracks, input order kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedLinks {
    pub html: Vec<SourceRef>,
    pub pdf: Vec<SourceRef>,
}

impl ClassifiedLinks {
    pub fn total(&self) -> usize {
        self.html.len() + self.pdf.len()
    }
}

pub fn classify_link(url: &str) -> Track {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url)
        .trim_end_matches('/');

    if path.to_ascii_lowercase().ends_with(".pdf") {
        Track::Pdf
    } else {
        Track::Html
    }
}

pub fn classify_links<I, S>(links: I) -> ClassifiedLinks
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut classified = ClassifiedLinks::default();

    for link in links {
        let link = link.as_ref().trim();
        if link.is_empty() {
            continue;
        }

        let source = SourceRef::url(link);
        match classify_link(link) {
            Track::Html => classified.html.push(source),
            Track::Pdf => classified.pdf.push(source),
        }
    }

    classified
}
