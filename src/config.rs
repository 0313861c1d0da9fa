//! Pipeline configuration.
//!
//! Handles loading, validating, and merging `avatar-press.toml`. Stock
//! defaults are overridden by whatever keys the user file sets; a missing
//! file means stock defaults.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [compression]
//! max_width = 800           # Bounding box width (px)
//! max_height = 800          # Bounding box height (px)
//! quality = 85              # Lossy quality (1-100)
//! format = "jpeg"           # jpeg | png | webp
//!
//! [limits]
//! max_payload_mb = 5.0      # Largest accepted decoded payload
//! min_dimension = 50        # Smallest accepted side (px)
//! max_dimension = 10000     # Largest accepted side (px)
//! max_artifact_bytes = 524288  # Ceiling on the output data URI
//! fallback_passthrough_mb = 0.2
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse, so override just the values you want:
//!
//! ```toml
//! [compression]
//! format = "webp"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::Quality;
use crate::types::{CompressionOptions, Limits, OutputFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "avatar-press.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `avatar-press.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PressConfig {
    /// Default compression options for calls that do not pass their own.
    pub compression: CompressionOptions,
    /// Safety bounds.
    pub limits: Limits,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl PressConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.compression;
        let l = &self.limits;

        if !(1..=100).contains(&c.quality.value()) {
            return Err(ConfigError::Validation(
                "compression.quality must be 1-100".into(),
            ));
        }
        if c.max_width == 0 || c.max_height == 0 {
            return Err(ConfigError::Validation(
                "compression.max_width and max_height must be non-zero".into(),
            ));
        }
        if c.max_width > l.max_dimension || c.max_height > l.max_dimension {
            return Err(ConfigError::Validation(format!(
                "compression.max_width and max_height must not exceed limits.max_dimension ({})",
                l.max_dimension
            )));
        }
        if l.min_dimension == 0 || l.min_dimension > l.max_dimension {
            return Err(ConfigError::Validation(
                "limits.min_dimension must be between 1 and limits.max_dimension".into(),
            ));
        }
        if l.max_payload_mb <= 0.0 || l.fallback_passthrough_mb <= 0.0 {
            return Err(ConfigError::Validation(
                "limits.max_payload_mb and fallback_passthrough_mb must be positive".into(),
            ));
        }
        if l.max_artifact_bytes == 0 {
            return Err(ConfigError::Validation(
                "limits.max_artifact_bytes must be positive".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Apply per-run overrides to `[compression]` and re-validate.
    ///
    /// Overrides face the same bounds as the config file, so a zero or
    /// oversized bounding box and an out-of-range quality are errors.
    pub fn apply_overrides(&mut self, overrides: &CompressionOverrides) -> Result<(), ConfigError> {
        let c = &mut self.compression;
        if let Some(w) = overrides.max_width {
            c.max_width = w;
        }
        if let Some(h) = overrides.max_height {
            c.max_height = h;
        }
        if let Some(q) = overrides.quality {
            c.quality = Quality(q);
        }
        if let Some(f) = &overrides.format {
            c.format = OutputFormat::parse(f);
        }
        self.validate()
    }
}

/// Per-run replacements for `[compression]` values, e.g. from CLI flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompressionOverrides {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub quality: Option<u32>,
    pub format: Option<String>,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel compression workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Stock defaults as a TOML value, the base layer for merging.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(PressConfig::default())?)
}

/// Recursively merge `overlay` onto `base`. Tables merge key by key; any
/// other value in the overlay replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<PressConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PressConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a file path.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(path: &Path) -> Result<PressConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `avatar-press.toml` with all keys and
/// explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# avatar-press configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Compression defaults (overridable per call / on the command line)
# ---------------------------------------------------------------------------
[compression]
# Bounding box. Larger images are shrunk to fit, keeping aspect ratio.
# Smaller images are never enlarged.
max_width = 800
max_height = 800

# Lossy quality, 1 (smallest) to 100 (best).
# For PNG this sets the palette size (16-256 colors).
quality = 85

# Output format: "jpeg", "png" or "webp". Anything else means jpeg.
format = "jpeg"

# ---------------------------------------------------------------------------
# Safety limits
# ---------------------------------------------------------------------------
[limits]
# Largest accepted payload, estimated from the base64 length (MB).
max_payload_mb = 5.0

# Accepted width and height range (px), checked from the image header
# before any pixels are decoded.
min_dimension = 50
max_dimension = 10000

# Ceiling on the final data URI (bytes). A larger result is rejected,
# never silently re-encoded.
max_artifact_bytes = 524288

# The fallback path returns payloads unchanged. At or below this size (MB)
# that is expected; above it a warning is logged.
fallback_passthrough_mb = 0.2

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for batch runs.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
