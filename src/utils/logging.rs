// file: src/utils/logging.rs
// description: tracing subscriber setup and colored console summary lines

use crate::models::TrackResult;
use colored::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// `RUST_LOG` wins over the verbosity flag when set.
pub fn init_logger(colored_output: bool, verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact()
        .with_ansi(colored_output);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

pub fn format_success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg.green())
}

pub fn format_error(msg: &str) -> String {
    format!("{} {}", "✗".red().bold(), msg.red())
}

pub fn format_warning(msg: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), msg.yellow())
}

pub fn format_step(step: usize, total: usize, msg: &str) -> String {
    format!("{} {}", format!("[{}/{}]", step, total).cyan().bold(), msg)
}

pub fn format_track_summary(result: &TrackResult) -> String {
    let line = format!(
        "{:<4} {} attempted, {} failed ({:.1}% ok), {} unique IPs{}",
        result.track.as_str().to_uppercase(),
        result.documents_attempted,
        result.documents_failed,
        result.success_rate(),
        result.indicators.len(),
        if result.cancelled { ", cancelled" } else { "" }
    );

    if result.documents_failed == 0 && !result.cancelled {
        format_success(&line)
    } else {
        format_warning(&line)
    }
}
