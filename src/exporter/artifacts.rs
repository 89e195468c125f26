// file: src/exporter/artifacts.rs
// description: line-oriented and corpus artifact writers
// reference: atomic replace through a sibling temp file

use crate::config::CorpusFormat;
use crate::error::{PipelineError, Result};
use crate::models::{CorpusEntry, Track};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Separates the html entries from the pdf entries in the legacy corpus.
pub const PDF_SENTINEL: &str = "PDFS!~89723";

const ENTRY_RULE: &str = "---------";

/// Writes `contents` next to `path` first so readers never see a half-written file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| PipelineError::file(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| PipelineError::file(dir, e))?;
    tmp.write_all(contents)
        .map_err(|e| PipelineError::file(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| PipelineError::file(path, e.error))?;

    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

/// One value per line, each line newline-terminated.
pub fn write_lines<I, S>(path: &Path, lines: I) -> Result<usize>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut buffer = String::new();
    let mut count = 0;
    for line in lines {
        buffer.push_str(line.as_ref());
        buffer.push('\n');
        count += 1;
    }

    write_atomic(path, buffer.as_bytes())?;
    Ok(count)
}

pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| PipelineError::file(path, e))?;
    Ok(content.lines().map(str::to_string).collect())
}

#[derive(Serialize)]
struct CorpusRecord<'a> {
    track: Track,
    source: &'a str,
    text: &'a str,
}

pub fn render_corpus(html: &[CorpusEntry], pdf: &[CorpusEntry], format: CorpusFormat) -> Result<String> {
    let mut out = String::new();

    match format {
        CorpusFormat::Legacy => {
            for entry in html {
                push_legacy_entry(&mut out, entry);
            }
            if !pdf.is_empty() {
                out.push_str(PDF_SENTINEL);
                out.push('\n');
                for entry in pdf {
                    push_legacy_entry(&mut out, entry);
                }
            }
        }
        CorpusFormat::Jsonl => {
            let tagged = html
                .iter()
                .map(|e| (Track::Html, e))
                .chain(pdf.iter().map(|e| (Track::Pdf, e)));

            for (track, entry) in tagged {
                let record = CorpusRecord {
                    track,
                    source: &entry.source,
                    text: &entry.text,
                };
                out.push_str(&serde_json::to_string(&record)?);
                out.push('\n');
            }
        }
    }

    Ok(out)
}

pub fn write_corpus(
    path: &Path,
    html: &[CorpusEntry],
    pdf: &[CorpusEntry],
    format: CorpusFormat,
) -> Result<()> {
    let rendered = render_corpus(html, pdf, format)?;
    write_atomic(path, rendered.as_bytes())
}

fn push_legacy_entry(out: &mut String, entry: &CorpusEntry) {
    out.push_str(&entry.source);
    out.push('\n');
    out.push_str(ENTRY_RULE);
    out.push('\n');
    out.push_str(&entry.text);
    out.push_str("\n\n");
}
