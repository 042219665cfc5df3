//! Parse command - extract data from a single OCR text file.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use invscan_core::invoice::{ExtractionResult, InvoiceParser, KeyValueParser, RegexInvoiceParser};
use invscan_core::models::config::{ParserKind, ScanConfig};

use super::{extract_with_ai, is_text_file, load_config, TEXT_EXTENSIONS};
use crate::output::{render, Extracted, OutputFormat};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input text file, or `-` for stdin
    #[arg(required = true)]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Use the flat key/value parser
    #[arg(long, conflicts_with = "ai")]
    flat: bool,

    /// Try remote AI extraction first
    #[arg(long)]
    ai: bool,

    /// Show extraction source, timing and warnings
    #[arg(long)]
    stats: bool,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let text = read_input(&args.input)?;
    if text.trim().is_empty() {
        warn!("Input contains no text");
    }

    let flat = args.flat || config.extraction.parser == ParserKind::Flat;
    let (extracted, report) = if flat {
        info!("Parsing {} with the flat parser", args.input);
        let fields = KeyValueParser::new().parse(&text);
        (Extracted::Flat(fields), None)
    } else {
        let report = extract_structured(&text, &config, args.ai).await?;
        (Extracted::Structured(report.invoice.clone()), Some(report))
    };

    let format = args.format.unwrap_or_else(|| config.output.format.into());
    let output = render(&extracted, format, config.output.pretty)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        print!("{}", output);
        if !output.ends_with('\n') {
            println!();
        }
    }

    if args.stats {
        print_stats(report.as_ref());
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    let path = PathBuf::from(input);
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    if path.extension().is_some() && !is_text_file(&path) {
        anyhow::bail!(
            "Unsupported file format: {} (expected {})",
            path.display(),
            TEXT_EXTENSIONS.join(", ")
        );
    }

    info!("Reading {}", path.display());
    Ok(fs::read_to_string(&path)?)
}

async fn extract_structured(
    text: &str,
    config: &ScanConfig,
    use_ai: bool,
) -> anyhow::Result<ExtractionResult> {
    let parser = RegexInvoiceParser::from_config(&config.extraction);

    if !(use_ai || config.ai.enabled) {
        return Ok(parser.parse_with_report(text));
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message("Requesting AI extraction...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = extract_with_ai(text, config, &parser).await;
    spinner.finish_and_clear();

    result
}

fn print_stats(report: Option<&ExtractionResult>) {
    let Some(report) = report else {
        eprintln!("{} Flat parser: no extraction report", style("ℹ").blue());
        return;
    };

    eprintln!(
        "{} Source: {:?}, {} line items in {}ms",
        style("ℹ").blue(),
        report.source,
        report.invoice.line_items.len(),
        report.processing_time_ms
    );
    for warning in &report.warnings {
        eprintln!("  {} {}", style("!").yellow(), warning);
    }
}
