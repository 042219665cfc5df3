pub mod batch;
pub mod config;
pub mod parse;

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use invscan_core::ai::AiExtractor;
use invscan_core::invoice::{ExtractionResult, ExtractionSource, RegexInvoiceParser};
use invscan_core::models::config::ScanConfig;
use invscan_core::ParsedInvoice;

/// File extensions accepted as OCR text input.
pub const TEXT_EXTENSIONS: [&str; 2] = ["txt", "text"];

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invscan")
        .join("config.json")
}

/// Resolve the config file: explicit path, else the per-user default.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration; defaults apply when no file exists at the default
/// location. An explicit path must exist.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<ScanConfig> {
    if let Some(path) = explicit {
        let path = Path::new(path);
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        return Ok(ScanConfig::from_file(path)?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading config from {}", path.display());
        Ok(ScanConfig::from_file(&path)?)
    } else {
        Ok(ScanConfig::default())
    }
}

pub fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| TEXT_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Run the remote extractor, falling back to the rule parser on failure
/// when the config allows it.
pub async fn extract_with_ai(
    text: &str,
    config: &ScanConfig,
    parser: &RegexInvoiceParser,
) -> anyhow::Result<ExtractionResult> {
    let start = Instant::now();

    let attempt = match AiExtractor::from_config(&config.ai) {
        Ok(extractor) => extractor.extract(text).await,
        Err(e) => Err(e),
    };

    match attempt {
        Ok(ai) => {
            info!("AI extraction succeeded with {} line items", ai.line_items.len());
            Ok(ExtractionResult::new(
                ParsedInvoice::from(&ai),
                ExtractionSource::Ai,
                text,
                start.elapsed().as_millis() as u64,
            ))
        }
        Err(e) if config.ai.fallback_to_rules => {
            warn!("AI extraction failed [{}]: {}; using rule-based parser", e.code(), e);
            let mut result = parser.parse_with_report(text);
            result
                .warnings
                .insert(0, format!("AI extraction failed: {}", e));
            Ok(result)
        }
        Err(e) => Err(anyhow::anyhow!("AI extraction failed [{}]: {}", e.code(), e)),
    }
}

