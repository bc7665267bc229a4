// Draws the transaction scaling chart of the itemset miner.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use scaling_plot::{PlotSurface, ScalingPlotRenderer, SurfaceConfig, SurfaceKind};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Png,
    Svg,
}

/// Renders the published timings against linear scaling on log-log axes.
#[derive(Parser)]
#[command(about, long_about = None)]
struct Args {
    /// Where to write the chart
    #[arg(long, default_value = "scaling.png")]
    output: PathBuf,

    /// Output format; guessed from the file extension if omitted
    #[arg(long, value_enum)]
    format: Option<Format>,

    #[arg(long, default_value_t = 1024)]
    width: u32,

    #[arg(long, default_value_t = 768)]
    height: u32,
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let kind = match args.format {
        Some(Format::Png) => SurfaceKind::Bitmap,
        Some(Format::Svg) => SurfaceKind::Svg,
        None => SurfaceKind::from_path(&args.output).unwrap_or_default(),
    };

    let mut surface = PlotSurface::new(SurfaceConfig {
        path: args.output,
        size: (args.width, args.height),
        kind,
    });

    ScalingPlotRenderer::default()
        .render(&mut surface)
        .map_err(|e| e.to_string())
}
