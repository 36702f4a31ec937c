mod app;
mod canvas;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use app::CurveEditorApp;

/// Interactive Bezier curve tracing editor
#[derive(Debug, Parser)]
#[command(name = "curve-editor", version)]
struct Args {
    /// Directory of the snapshot store (defaults to ./.curve-tracer)
    #[arg(long)]
    store_dir: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1320.0, 860.0])
            .with_min_inner_size([1100.0, 820.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Curve Editor",
        options,
        Box::new(|cc| Ok(Box::new(CurveEditorApp::new(cc, args.store_dir)))),
    )
}
