// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use ioc_harvest::exporter::{self, read_lines};
use ioc_harvest::models::Indicator;
use ioc_harvest::pipeline::ProgressBoard;
use ioc_harvest::utils::logging::{
    format_error, format_step, format_success, format_track_summary, format_warning,
};
use ioc_harvest::{
    ChromiumRenderer, Collaborators, Config, GoogleSearchClient, HttpDownloader,
    PdfExtractReader, PipelineOrchestrator, RunSummary, ScanStrategy, SearchClient, scan_file,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "ioc_harvest")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Harvest IP indicators of compromise from web pages and PDFs", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search, fetch both tracks and write the merged indicator list
    Run {
        /// Search query, wrapped by the configured query template
        #[arg(short, long, conflicts_with = "links", required_unless_present = "links")]
        query: Option<String>,

        /// Existing link list, one URL per line, used instead of searching
        #[arg(short, long, value_name = "FILE")]
        links: Option<PathBuf>,

        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Normalize, sort and deduplicate an indicator file in place
    Dedup {
        file: PathBuf,
    },

    /// Scan an existing text file for indicators
    Scan {
        input: PathBuf,

        #[arg(short, long, default_value = "general")]
        strategy: ScanStrategy,

        /// Defaults to printing indicators on stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    colored::control::set_override(cli.color);
    ioc_harvest::utils::logging::init_logger(cli.color, cli.verbose);

    info!("IOC Harvest");
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using defaults and environment",
            cli.config.display()
        );
        Config::load(None).context("Failed to load configuration")?
    };

    match cli.command {
        Commands::Run {
            query,
            links,
            output_dir,
        } => {
            cmd_run(config, query, links, output_dir, cli.color).await?;
        }
        Commands::Dedup { file } => {
            cmd_dedup(&file)?;
        }
        Commands::Scan {
            input,
            strategy,
            output,
        } => {
            cmd_scan(&config, &input, strategy, output)?;
        }
    }

    Ok(())
}

async fn cmd_run(
    mut config: Config,
    query: Option<String>,
    links: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    color: bool,
) -> Result<()> {
    let start_time = Instant::now();

    if let Some(dir) = output_dir {
        config.output.directory = dir;
    }

    let search: Option<Arc<dyn SearchClient>> = match &query {
        Some(_) => {
            let credentials = config
                .search
                .credentials()
                .context("Search credentials are required for --query")?;
            let client: Arc<dyn SearchClient> =
                Arc::new(GoogleSearchClient::new(config.search.clone(), credentials));
            Some(client)
        }
        None => None,
    };

    let collaborators = Collaborators {
        search,
        renderer: Arc::new(ChromiumRenderer::new(config.fetch.navigation_timeout())),
        downloader: Arc::new(
            HttpDownloader::new(&config.fetch).context("Failed to build HTTP client")?,
        ),
        pdf_reader: Arc::new(PdfExtractReader),
    };

    let progress = if config.output.show_progress {
        ProgressBoard::new(color)
    } else {
        ProgressBoard::hidden()
    };

    let orchestrator = PipelineOrchestrator::new(config, collaborators)
        .context("Invalid configuration")?
        .with_progress(progress);

    let cancel = orchestrator.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing the current items before stopping");
            cancel.cancel();
        }
    });

    let summary = match (query, links) {
        (Some(query), _) => {
            println!("{}", format_step(1, 2, &format!("Searching for \"{}\"", query)));
            let summary = orchestrator.run(&query).await.context("Harvest run failed")?;
            println!("{}", format_step(2, 2, "Fetched and scanned all links"));
            summary
        }
        (None, Some(path)) => {
            let links = read_lines(&path)
                .with_context(|| format!("Failed to read link list {}", path.display()))?;
            println!(
                "{}",
                format_step(1, 1, &format!("Harvesting {} links from {}", links.len(), path.display()))
            );
            orchestrator
                .run_links(links, None)
                .await
                .context("Harvest run failed")?
        }
        (None, None) => bail!("either --query or --links is required"),
    };

    print_summary(&summary);
    info!(
        "Run complete in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    summary.check()?;
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!();
    for track in &summary.tracks {
        println!("{}", format_track_summary(track));
    }
    for e in &summary.track_errors {
        println!("{}", format_error(&format!("{} track failed: {}", e.track, e.message)));
    }
    if summary.cancelled() {
        println!("{}", format_warning("Run was interrupted, results are partial"));
    }

    println!(
        "{}",
        format_success(&format!(
            "{} unique IPs, {} other IOCs",
            summary.indicators.len(),
            summary.iocs.len()
        ))
    );
    for path in &summary.outputs {
        println!("  {}", path.display());
    }
}

fn cmd_dedup(file: &Path) -> Result<()> {
    let kept = exporter::dedup_file(file)
        .with_context(|| format!("Failed to deduplicate {}", file.display()))?;
    println!(
        "{}",
        format_success(&format!("{} unique indicators in {}", kept, file.display()))
    );
    Ok(())
}

fn cmd_scan(
    config: &Config,
    input: &Path,
    strategy: ScanStrategy,
    output: Option<PathBuf>,
) -> Result<()> {
    let found = scan_file(input, strategy, &config.scan)
        .with_context(|| format!("Failed to scan {}", input.display()))?;
    let indicators = found.indicators.into_sorted_vec();

    match output {
        Some(path) => {
            exporter::write_lines(&path, indicators.iter().map(Indicator::as_str))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{}",
                format_success(&format!("{} indicators written to {}", indicators.len(), path.display()))
            );
        }
        None => {
            for indicator in &indicators {
                println!("{}", indicator);
            }
        }
    }

    if !found.passthrough.is_empty() {
        info!("{} non-IP IOCs seen", found.passthrough.len());
    }

    Ok(())
}
