use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use palette_extractor::{
    ColorSpace, ExportFormat, ExtractOptions, MAX_COLORS, Palette, PaletteOrder, export, extract,
    logging,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Text,
}

impl From<Format> for ExportFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Json => ExportFormat::Json,
            Format::Text => ExportFormat::Text,
        }
    }
}

/// Extract dominant-color palettes from images.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required_unless_present_any = ["random", "load"])]
    inputs: Vec<PathBuf>,

    /// Number of colors to extract
    #[arg(short = 'k', long, default_value_t = MAX_COLORS)]
    n_colors: usize,

    /// Side of the square grid the image is resampled to before clustering
    #[arg(long, default_value_t = 150)]
    sample_size: u32,

    /// Seed for k-means initialization
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Cluster in CIE Lab instead of sRGB
    #[arg(long)]
    lab: bool,

    /// Order colors by share of pixels, largest first
    #[arg(long)]
    by_dominance: bool,

    /// Print the share of sampled pixels next to each color
    #[arg(long, conflicts_with = "output")]
    shares: bool,

    /// Leave fully transparent pixels out of the sample
    #[arg(long)]
    skip_transparent: bool,

    /// Generate a random palette instead of reading images
    #[arg(long, conflicts_with_all = ["inputs", "load"])]
    random: bool,

    /// Re-read a previously exported palette
    #[arg(long, conflicts_with = "inputs")]
    load: Option<PathBuf>,

    /// Output file, or output directory when several inputs are given
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format. Defaults to the output file's extension.
    #[arg(short, long, value_enum)]
    format: Option<Format>,
}

impl Args {
    fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            n_colors: self.n_colors,
            sample_size: self.sample_size,
            seed: self.seed,
            color_space: if self.lab { ColorSpace::Lab } else { ColorSpace::Rgb },
            order: if self.by_dominance {
                PaletteOrder::Dominance
            } else {
                PaletteOrder::Cluster
            },
            skip_transparent: self.skip_transparent,
            ..Default::default()
        }
    }

    fn selected_format(&self) -> Option<ExportFormat> {
        self.format.map(ExportFormat::from)
    }
}

/// Palette that needs no image: `--random` or `--load`.
fn standalone_palette(args: &Args) -> Result<Option<Palette>> {
    if args.random {
        return Ok(Some(Palette::random(&mut rand::rng())));
    }
    match &args.load {
        Some(path) => export::read_palette(path)
            .map(Some)
            .with_context(|| format!("failed to read palette {}", path.display())),
        None => Ok(None),
    }
}

/// Where the palette of `input` goes. Several inputs share `output` as a
/// directory and are written as `<stem>.<ext>`; `None` means stdout.
fn output_path(
    input: &Path,
    output: Option<&Path>,
    many: bool,
    selected: Option<ExportFormat>,
) -> Option<PathBuf> {
    match output {
        Some(dir) if many => {
            let stem = input.file_stem().unwrap_or_default().to_string_lossy();
            let ext = selected.unwrap_or_default().extension();
            Some(dir.join(format!("{stem}.{ext}")))
        }
        other => other.map(Path::to_path_buf),
    }
}

/// Stdout rendering: text unless another format is asked for, always
/// newline-terminated.
fn stdout_text(palette: &Palette, selected: Option<ExportFormat>) -> Result<String> {
    let mut out = export::render(palette, selected.unwrap_or_default())?;
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

fn emit(palette: &Palette, out: Option<&Path>, selected: Option<ExportFormat>) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let format = ExportFormat::detect(path, selected);
            export::write_palette(palette, path, format)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Saved → {}", path.display());
        }
        None => print!("{}", stdout_text(palette, selected)?),
    }
    Ok(())
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();
    let selected = args.selected_format();

    if let Some(palette) = standalone_palette(&args)? {
        return emit(&palette, args.output.as_deref(), selected);
    }

    let opts = args.extract_options();
    opts.validate()?;

    let many = args.inputs.len() > 1;
    if many && args.output.as_ref().is_some_and(|o| o.is_file()) {
        bail!("--output must be a directory when several inputs are given");
    }

    for input in &args.inputs {
        let img = extract::load_image(input)
            .with_context(|| format!("failed to open {}", input.display()))?;
        let colors = extract::extract_dominant_colors(&img, &opts)
            .context("palette extraction failed")?;

        if args.shares {
            println!("{}:", input.display());
            for d in &colors {
                println!("  {}  {:5.1}%", d.color, d.share * 100.0);
            }
            continue;
        }

        let palette = Palette::new(colors.into_iter().map(|d| d.color).collect())?;
        let out_path = output_path(input, args.output.as_deref(), many, selected);
        if many && out_path.is_none() {
            println!("{}:", input.display());
        }
        emit(&palette, out_path.as_deref(), selected)?;
    }

    Ok(())
}
