//! Batch processing command for multiple OCR text files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt, TryStreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use invscan_core::invoice::{InvoiceParser, KeyValueParser, RegexInvoiceParser};
use invscan_core::models::config::ParserKind;

use super::{is_text_file, load_config};
use crate::output::{render, Extracted, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching input text files
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Use the flat key/value parser
    #[arg(long)]
    flat: bool,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    outcome: Result<Extracted, String>,
    processed_at: DateTime<Utc>,
    processing_time_ms: u64,
}

/// Parser shared by all workers.
enum SharedParser {
    Structured(RegexInvoiceParser),
    Flat(KeyValueParser),
}

impl SharedParser {
    fn parse(&self, text: &str) -> Extracted {
        match self {
            SharedParser::Structured(parser) => Extracted::Structured(parser.parse(text)),
            SharedParser::Flat(parser) => Extracted::Flat(parser.parse(text)),
        }
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file() && is_text_file(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let parser = Arc::new(
        if args.flat || config.extraction.parser == ParserKind::Flat {
            SharedParser::Flat(KeyValueParser::new())
        } else {
            SharedParser::Structured(RegexInvoiceParser::from_config(&config.extraction))
        },
    );
    let continue_on_error = args.continue_on_error;

    let results: Vec<ProcessResult> = stream::iter(files)
        .map(|path| {
            let parser = Arc::clone(&parser);
            let pb = pb.clone();
            async move {
                let file_start = Instant::now();
                let task_path = path.clone();
                let outcome = tokio::task::spawn_blocking(move || process_single_file(&task_path, &parser))
                    .await
                    .map_err(anyhow::Error::from)
                    .and_then(|r| r)
                    .map_err(|e| e.to_string());
                pb.inc(1);

                if let Err(message) = &outcome {
                    if continue_on_error {
                        warn!("Failed to process {}: {}", path.display(), message);
                    } else {
                        error!("Failed to process {}: {}", path.display(), message);
                        anyhow::bail!("Processing failed: {}: {}", path.display(), message);
                    }
                }

                Ok(ProcessResult {
                    path,
                    outcome,
                    processed_at: Utc::now(),
                    processing_time_ms: file_start.elapsed().as_millis() as u64,
                })
            }
        })
        .buffered(args.jobs.max(1))
        .try_collect()
        .await?;

    pb.finish_with_message("Complete");

    let format = args.format.unwrap_or_else(|| config.output.format.into());

    if let Some(output_dir) = &args.output_dir {
        for result in &results {
            if let Ok(extracted) = &result.outcome {
                let output_path = output_path_for(&result.path, output_dir, format);
                if output_path == result.path {
                    warn!("Skipping {}: output would overwrite the input", output_path.display());
                    continue;
                }
                fs::write(&output_path, render(extracted, format, config.output.pretty)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.outcome.is_err()).collect();
    let successful = results.len() - failed.len();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            if let Err(message) = &result.outcome {
                println!("  - {}: {}", result.path.display(), message);
            }
        }
    }

    Ok(())
}

fn process_single_file(path: &Path, parser: &SharedParser) -> anyhow::Result<Extracted> {
    let text = fs::read_to_string(path)?;
    if text.trim().is_empty() {
        anyhow::bail!("File contains no text");
    }
    Ok(parser.parse(&text))
}

fn output_path_for(input: &Path, output_dir: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("invoice");
    output_dir.join(format!("{}.{}", stem, format.extension()))
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "invoice_number",
        "line_items",
        "total",
        "processed_at",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let processed_at = result.processed_at.to_rfc3339();
        let time_ms = result.processing_time_ms.to_string();

        match &result.outcome {
            Ok(extracted) => {
                let line_items = extracted
                    .line_item_count()
                    .map(|n| n.to_string())
                    .unwrap_or_default();
                wtr.write_record([
                    filename,
                    "success",
                    extracted.invoice_number().unwrap_or_default(),
                    line_items.as_str(),
                    extracted.total().unwrap_or_default(),
                    processed_at.as_str(),
                    time_ms.as_str(),
                    "",
                ])?;
            }
            Err(message) => {
                wtr.write_record([
                    filename,
                    "error",
                    "",
                    "",
                    "",
                    processed_at.as_str(),
                    time_ms.as_str(),
                    message.as_str(),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
