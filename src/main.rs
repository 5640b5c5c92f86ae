use clap::{Parser, Subcommand};
use rayon::prelude::*;
use renditions::config::{self, UploaderConfig};
use renditions::imaging::{Dimensions, plan_variant, read_descriptor};
use renditions::output;
use renditions::types::VariantResult;
use renditions::upload::Uploader;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

fn version_string() -> &'static str {
    let revision = env!("RENDITIONS_REVISION");
    if revision.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        // Leaked once at startup, called exactly once
        Box::leak(format!("{}@{revision}", env!("CARGO_PKG_VERSION")).into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "renditions")]
#[command(about = "Produce resized and cropped renditions of uploaded images")]
#[command(long_about = "\
Produce resized and cropped renditions of uploaded images

Every upload is identified by its leading bytes (PNG, JPEG or GIF), measured
from its header and checked against the pixel budget before it is decoded.
One variant is then written per configured image version:

  <upload_dir>/<name><name_suffix>.<ext>

Variants keep the upload's format. Existing files are never overwritten.

Run 'renditions gen-config' to generate a documented renditions.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (stock defaults are used when it does not exist)
    #[arg(long, default_value = "renditions.toml", global = true)]
    config: PathBuf,

    /// Log each pipeline step (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Produce every configured variant of one upload
    Produce {
        file: PathBuf,
        /// Main name of the variants (defaults to the file stem)
        #[arg(long)]
        name: Option<String>,
        /// Print the variant results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Produce variants for every file under a directory, in parallel
    Batch {
        dir: PathBuf,
        /// Print per-upload results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Report format and dimensions from the header, without decoding
    Identify {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Show how a source size would be transformed into a bounding box
    Plan {
        /// Source size, e.g. 1200x400
        #[arg(long, value_parser = parse_dimensions)]
        source: Dimensions,
        /// Bounding box, e.g. 400x400
        #[arg(long, value_parser = parse_dimensions)]
        bounds: Dimensions,
        /// Fill the box and crop instead of fitting inside it
        #[arg(long)]
        crop: bool,
    },
    /// Print a stock renditions.toml with all options documented
    GenConfig,
}

/// Outcome of one upload in a batch, as reported with `--json`.
#[derive(Serialize)]
struct BatchEntry {
    source: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    variants: Option<Vec<VariantResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Produce { file, name, json } => {
            let uploader = build_uploader(&cli.config)?;
            let name = match name {
                Some(name) => name,
                None => main_name(&file)?,
            };

            if json {
                let results = uploader.produce_variants(&file, &name)?;
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                let (tx, rx) = std::sync::mpsc::channel();
                let printer = std::thread::spawn(move || {
                    for event in rx {
                        for line in output::format_upload_event(&event) {
                            println!("{}", line);
                        }
                    }
                });
                let result = uploader.produce_variants_with_events(&file, &name, Some(tx));
                printer.join().ok();
                result?;
            }
        }
        Command::Batch { dir, json } => {
            let uploader = build_uploader(&cli.config)?;
            let files: Vec<PathBuf> = WalkDir::new(&dir)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .collect();

            let entries: Vec<(BatchEntry, Vec<String>)> = files
                .par_iter()
                .map(|file| batch_one(&uploader, file))
                .collect();

            let failed: Vec<(String, String)> = entries
                .iter()
                .filter_map(|(entry, _)| {
                    entry
                        .error
                        .as_ref()
                        .map(|e| (entry.source.display().to_string(), e.clone()))
                })
                .collect();
            let succeeded = entries.len() - failed.len();

            if json {
                let report: Vec<&BatchEntry> = entries.iter().map(|(entry, _)| entry).collect();
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for line in entries.iter().flat_map(|(_, lines)| lines) {
                    println!("{}", line);
                }
                output::print_batch_summary(succeeded, &failed);
            }

            if !failed.is_empty() {
                std::process::exit(1);
            }
        }
        Command::Identify { file, json } => {
            let descriptor = read_descriptor(&file)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&descriptor)?);
            } else {
                output::print_descriptor(&file, &descriptor);
            }
        }
        Command::Plan {
            source,
            bounds,
            crop,
        } => {
            let plan = plan_variant(source, bounds, crop);
            output::print_plan(source, bounds, crop, &plan);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise warnings only, or debug with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "renditions=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config and make sure every upload directory exists.
fn build_uploader(config_path: &Path) -> Result<Uploader, Box<dyn std::error::Error>> {
    let config: UploaderConfig = config::load_config_or_default(config_path)?;
    for spec in &config.image_versions {
        std::fs::create_dir_all(&spec.upload_dir)?;
    }
    Ok(Uploader::new(config))
}

fn main_name(file: &Path) -> Result<String, Box<dyn std::error::Error>> {
    file.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| format!("cannot derive a name from {}", file.display()).into())
}

/// Run one batch upload, returning its report entry and display lines.
fn batch_one(uploader: &Uploader, file: &Path) -> (BatchEntry, Vec<String>) {
    let (tx, rx) = std::sync::mpsc::channel();
    let outcome = main_name(file)
        .map_err(|e| e.to_string())
        .and_then(|name| {
            uploader
                .produce_variants_with_events(file, &name, Some(tx))
                .map_err(|e| e.to_string())
        });
    let lines = rx
        .iter()
        .flat_map(|event| output::format_upload_event(&event))
        .collect();

    let entry = match outcome {
        Ok(variants) => BatchEntry {
            source: file.to_path_buf(),
            variants: Some(variants),
            error: None,
        },
        Err(error) => {
            tracing::warn!("{}: {error}", file.display());
            BatchEntry {
                source: file.to_path_buf(),
                variants: None,
                error: Some(error),
            }
        }
    };
    (entry, lines)
}

/// Parse non-zero `WIDTHxHEIGHT`, e.g. `1200x400`.
fn parse_dimensions(s: &str) -> Result<Dimensions, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid width '{w}': {e}"))?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid height '{h}': {e}"))?;
    if width == 0 || height == 0 {
        return Err(format!("dimensions must be non-zero, got '{s}'"));
    }
    Ok(Dimensions::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_dimensions_accepts_both_separators() {
        assert_eq!(parse_dimensions("1200x400"), Ok(Dimensions::new(1200, 400)));
        assert_eq!(parse_dimensions("10X20"), Ok(Dimensions::new(10, 20)));
    }

    #[test]
    fn parse_dimensions_rejects_garbage() {
        assert!(parse_dimensions("1200").is_err());
        assert!(parse_dimensions("ax400").is_err());
        assert!(parse_dimensions("10x-1").is_err());
        assert!(parse_dimensions("0x400").is_err());
    }

    #[test]
    fn main_name_is_file_stem() {
        assert_eq!(main_name(Path::new("/in/photo.final.jpg")).unwrap(), "photo.final");
    }
}
