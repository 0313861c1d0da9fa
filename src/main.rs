use avatar_press::output::{self, CompressionReport};
use avatar_press::{Pipeline, config, naming};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "avatar-press")]
#[command(about = "Validate untrusted profile pictures and shrink them into bounded data URIs")]
#[command(long_about = "\
Validate untrusted profile pictures and shrink them into bounded data URIs

Every input goes through the same steps:

  1. validate   data:image/<jpeg|jpg|png|gif|webp>;base64,... prefix,
                base64 alphabet, estimated size <= 5 MB
  2. probe      header-only width/height, each side within 50..=10000 px
  3. compress   decode, apply EXIF orientation, drop all metadata,
                fit inside the bounding box, encode once, reject if the
                data URI is over 512 KiB

Inputs may be files holding a data URI, or raw .jpg/.png/.gif/.webp images.

Run 'avatar-press gen-config' to generate a documented avatar-press.toml.")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./avatar-press.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log every pipeline step to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Per-run overrides of the `[compression]` config section.
#[derive(clap::Args)]
struct CompressArgs {
    /// Files holding a data URI or a raw image
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_width: Option<u32>,

    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_height: Option<u32>,

    /// Lossy quality, 1-100
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    quality: Option<u32>,

    /// Output format: jpeg, png or webp
    #[arg(long)]
    format: Option<String>,

    /// Validate only and pass the payload through unchanged
    #[arg(long)]
    fallback: bool,

    /// Print a JSON report instead of text
    #[arg(long)]
    json: bool,

    /// Include the resulting data URIs in the report
    #[arg(long)]
    print_uri: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Compress one or more images into data URIs
    Compress(CompressArgs),
    /// Print a filename with disallowed characters replaced
    SanitizeName { name: String },
    /// Print a fresh collision-resistant filename for a user's upload
    SecureName { user_id: String, extension: String },
    /// Print a stock avatar-press.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Compress(args) => {
            let mut press_config = load_config(cli.config.as_deref())?;
            press_config.apply_overrides(&overrides(&args))?;
            init_thread_pool(&press_config.processing);
            let options = press_config.compression;
            let pipeline = Pipeline::new().limits(press_config.limits);

            let reports = args
                .inputs
                .par_iter()
                .map(|path| -> std::io::Result<CompressionReport> {
                    let payload = read_submission(path)?;
                    let result = if args.fallback {
                        pipeline.compress_profile_image_fallback(&payload, &options)
                    } else {
                        pipeline.compress_profile_image(&payload, &options)
                    };
                    Ok(CompressionReport::new(
                        path.display().to_string(),
                        payload.len(),
                        result,
                        args.print_uri,
                    ))
                })
                .collect::<std::io::Result<Vec<_>>>()?;

            if args.json {
                output::print_json(&reports)?;
            } else {
                output::print_reports(&reports);
            }
            if reports.iter().any(CompressionReport::is_rejected) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::SanitizeName { name } => {
            println!("{}", naming::sanitize_filename(&name));
        }
        Command::SecureName { user_id, extension } => {
            println!("{}", naming::generate_secure_filename(&user_id, &extension));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Logs go to stderr so stdout stays clean for reports and data URIs.
/// `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// An explicit `--config` must exist; the default file is optional.
fn load_config(path: Option<&Path>) -> Result<config::PressConfig, Box<dyn std::error::Error>> {
    match path {
        Some(p) if !p.exists() => Err(format!("config file not found: {}", p.display()).into()),
        Some(p) => Ok(config::load_config(p)?),
        None => Ok(config::load_config(Path::new(config::DEFAULT_CONFIG_FILE))?),
    }
}

fn overrides(args: &CompressArgs) -> config::CompressionOverrides {
    config::CompressionOverrides {
        max_width: args.max_width,
        max_height: args.max_height,
        quality: args.quality,
        format: args.format.clone(),
    }
}

/// Read an input file as a submission.
///
/// Text starting with `data:` is used as-is; anything else is treated as a
/// raw image and wrapped using the file extension as the declared type.
fn read_submission(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    if bytes.starts_with(b"data:") {
        return Ok(String::from_utf8_lossy(&bytes).trim().to_string());
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    Ok(format!("data:image/{ext};base64,{}", STANDARD.encode(&bytes)))
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
