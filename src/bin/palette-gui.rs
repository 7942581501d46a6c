use anyhow::{Result, anyhow};
use clap::Parser;
use palette_extractor::{ColorSpace, ExtractOptions, MAX_COLORS, gui::PaletteApp, logging};

/// Pick dominant colors out of images in a desktop window.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Number of colors to extract on upload
    #[arg(short = 'k', long, default_value_t = MAX_COLORS)]
    n_colors: usize,

    /// Cluster in CIE Lab instead of sRGB
    #[arg(long)]
    lab: bool,
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();
    let options = ExtractOptions {
        n_colors: args.n_colors,
        color_space: if args.lab { ColorSpace::Lab } else { ColorSpace::Rgb },
        ..Default::default()
    };
    options.validate()?;
    tracing::info!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    PaletteApp::run(options).map_err(|e| anyhow!("window closed with error: {e}"))
}
