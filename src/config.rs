// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    pub api_key: Option<String>,
    pub cse_id: Option<String>,
    pub api_key_file: Option<PathBuf>,
    pub cse_id_file: Option<PathBuf>,
    pub endpoint: String,
    /// `{query}` is replaced by the operator's search terms.
    pub query_template: String,
    pub num_results: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Delay between consecutive page renders.
    pub pacing_delay_ms: u64,
    pub navigation_timeout_secs: u64,
    pub download_timeout_secs: u64,
    pub max_download_mb: usize,
    pub pdf_workers: usize,
    pub scratch_root: Option<PathBuf>,
    pub user_agent: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    pub exclude_private_ips: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CorpusFormat {
    /// `source\n---------\n` delimited entries with the PDF sentinel line.
    #[default]
    Legacy,
    Jsonl,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub links_file: String,
    pub corpus_file: String,
    pub iocs_file: String,
    pub ips_file: String,
    pub report_file: String,
    pub write_corpus: bool,
    pub corpus_format: CorpusFormat,
    pub show_progress: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            cse_id: None,
            api_key_file: Some(PathBuf::from("api_key.txt")),
            cse_id_file: Some(PathBuf::from("cse_id.txt")),
            endpoint: "https://www.googleapis.com/customsearch/v1".to_string(),
            query_template: "allintext:\"IP address\" {query}".to_string(),
            num_results: 100,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            pacing_delay_ms: 1000,
            navigation_timeout_secs: 30,
            download_timeout_secs: 60,
            max_download_mb: 50,
            pdf_workers: 4,
            scratch_root: None,
            user_agent: format!("ioc_harvest/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./output"),
            links_file: "links.txt".to_string(),
            corpus_file: "text_output.txt".to_string(),
            iocs_file: "iocs_output.txt".to_string(),
            ips_file: "ips_output.txt".to_string(),
            report_file: "report.json".to_string(),
            write_corpus: true,
            corpus_format: CorpusFormat::Legacy,
            show_progress: true,
        }
    }
}

/// Search credentials resolved from inline values or their backing files.
#[derive(Debug, Clone)]
pub struct SearchCredentials {
    pub api_key: String,
    pub cse_id: String,
}

impl SearchConfig {
    pub fn credentials(&self) -> Result<SearchCredentials> {
        let api_key = resolve_secret("api_key", &self.api_key, &self.api_key_file)?;
        let cse_id = resolve_secret("cse_id", &self.cse_id, &self.cse_id_file)?;
        Ok(SearchCredentials { api_key, cse_id })
    }

    pub fn render_query(&self, query: &str) -> String {
        self.query_template.replace("{query}", query.trim())
    }
}

impl FetchConfig {
    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    pub fn max_download_bytes(&self) -> u64 {
        (self.max_download_mb as u64) * 1_048_576
    }
}

impl OutputConfig {
    pub fn links_path(&self) -> PathBuf {
        self.directory.join(&self.links_file)
    }

    pub fn corpus_path(&self) -> PathBuf {
        self.directory.join(&self.corpus_file)
    }

    pub fn iocs_path(&self) -> PathBuf {
        self.directory.join(&self.iocs_file)
    }

    pub fn ips_path(&self) -> PathBuf {
        self.directory.join(&self.ips_file)
    }

    pub fn report_path(&self) -> PathBuf {
        self.directory.join(&self.report_file)
    }
}

fn resolve_secret(name: &str, inline: &Option<String>, file: &Option<PathBuf>) -> Result<String> {
    if let Some(value) = inline.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        return Ok(value.to_string());
    }

    let Some(path) = file else {
        return Err(PipelineError::Config(format!("search.{} is not set", name)));
    };

    let value = fs::read_to_string(path).map_err(|e| {
        PipelineError::Config(format!(
            "cannot read search.{} from {}: {}",
            name,
            path.display(),
            e
        ))
    })?;

    let value = value.trim();
    if value.is_empty() {
        return Err(PipelineError::Config(format!(
            "search.{} file {} is empty",
            name,
            path.display()
        )));
    }

    Ok(value.to_string())
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(
                config::File::from(Path::new("config/default.toml")).required(false),
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix("IOC_HARVEST")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.fetch.pdf_workers == 0 {
            return Err(PipelineError::Config(
                "pdf_workers must be greater than 0".to_string(),
            ));
        }

        if self.fetch.navigation_timeout_secs == 0 || self.fetch.download_timeout_secs == 0 {
            return Err(PipelineError::Config(
                "fetch timeouts must be greater than 0".to_string(),
            ));
        }

        if self.search.num_results == 0 {
            return Err(PipelineError::Config(
                "num_results must be greater than 0".to_string(),
            ));
        }

        if !self.search.query_template.contains("{query}") {
            return Err(PipelineError::Config(
                "query_template must contain {query}".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.fetch.pacing_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = Config::default_config();
        config.fetch.pdf_workers = 0;
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_inline_credentials_win() {
        let search = SearchConfig {
            api_key: Some(" key ".to_string()),
            cse_id: Some("cse".to_string()),
            api_key_file: None,
            cse_id_file: None,
            ..SearchConfig::default()
        };

        let creds = search.credentials().unwrap();
        assert_eq!(creds.api_key, "key");
        assert_eq!(creds.cse_id, "cse");
    }

    #[test]
    fn test_credentials_from_files() {
        let dir = TempDir::new().unwrap();
        let key_path = dir.path().join("api_key.txt");
        let cse_path = dir.path().join("cse_id.txt");
        fs::write(&key_path, "abc123\n").unwrap();
        fs::write(&cse_path, "engine\n").unwrap();

        let search = SearchConfig {
            api_key_file: Some(key_path),
            cse_id_file: Some(cse_path),
            ..SearchConfig::default()
        };

        let creds = search.credentials().unwrap();
        assert_eq!(creds.api_key, "abc123");
        assert_eq!(creds.cse_id, "engine");
    }

    #[test]
    fn test_missing_credentials_is_config_error() {
        let dir = TempDir::new().unwrap();
        let search = SearchConfig {
            api_key_file: Some(dir.path().join("missing.txt")),
            ..SearchConfig::default()
        };

        assert!(matches!(search.credentials(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_load_from_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(
            &path,
            r#"
[fetch]
pacing_delay_ms = 250
pdf_workers = 2

[output]
corpus_format = "jsonl"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.fetch.pacing_delay_ms, 250);
        assert_eq!(config.fetch.pdf_workers, 2);
        assert_eq!(config.output.corpus_format, CorpusFormat::Jsonl);
        assert_eq!(config.output.ips_file, "ips_output.txt");
    }

    #[test]
    fn test_render_query() {
        let search = SearchConfig::default();
        assert_eq!(
            search.render_query(" emotet "),
            "allintext:\"IP address\" emotet"
        );
    }
}
