use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use curve_tracer::{Editor, ExportFormat, FileStore, SettingUpdate};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// SVG document with one path per group
    Svg,
    /// JSON coordinates relative to the origin point
    Json,
    /// JSON angle/distance pairs around the origin point
    Polar,
}

impl From<Format> for ExportFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Svg => ExportFormat::Svg,
            Format::Json => ExportFormat::Coordinates,
            Format::Polar => ExportFormat::Polar,
        }
    }
}

/// Export curves from a saved curve-tracer snapshot
#[derive(Debug, Parser)]
#[command(name = "curve-tracer", version)]
struct Args {
    /// Directory of the editor's snapshot store
    #[arg(long, default_value = ".curve-tracer")]
    store_dir: PathBuf,

    /// Read this snapshot JSON file instead of the store
    #[arg(long)]
    snapshot: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Svg)]
    format: Format,

    /// Override the saved output precision (0-100 decimals)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    precision: Option<u8>,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut editor = Editor::new();

    let loaded = match &args.snapshot {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("Error reading snapshot '{}': {}", path.display(), e))
            .and_then(|json| {
                editor
                    .load_str(&json)
                    .map_err(|e| format!("Error parsing snapshot '{}': {}", path.display(), e))
            })
            .map(|_| true),
        None => editor
            .load(&FileStore::new(&args.store_dir))
            .map_err(|e| format!("Error reading store '{}': {}", args.store_dir.display(), e)),
    };

    match loaded {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("No saved state in '{}'", args.store_dir.display());
            process::exit(1);
        }
        Err(e) => {
            eprintln!("{}", e);
            process::exit(2);
        }
    }

    if let Some(precision) = args.precision {
        editor
            .helper
            .settings
            .apply(SettingUpdate::OutputPrecision(usize::from(precision)));
    }

    let output = match editor.export(args.format.into()) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Error exporting curves: {}", e);
            process::exit(3);
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, &output) {
                eprintln!("Error writing output file '{}': {}", path.display(), e);
                process::exit(4);
            }
            tracing::info!("Wrote {}", path.display());
        }
        None => println!("{}", output),
    }
}
