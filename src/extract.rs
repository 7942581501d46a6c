use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use image::{DynamicImage, GenericImageView, RgbaImage, imageops::FilterType};
use kmeans_colors::{Calculate, Kmeans, get_kmeans};
use palette::{FromColor, Lab, Srgb};
use tracing::debug;

use crate::color::HexColor;
use crate::error::{Error, Result};
use crate::swatches::{MAX_COLORS, Palette};

/// Bounding box of the preview shown next to the swatches.
pub const PREVIEW_WIDTH: u32 = 400;
pub const PREVIEW_HEIGHT: u32 = 250;

/// Largest accepted sample grid side.
pub const MAX_SAMPLE_SIZE: u32 = 4096;

/// Space the clustering runs in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorSpace {
    /// Plain sRGB components. Centroids are channel means.
    #[default]
    Rgb,
    /// CIE Lab, perceptually closer distances.
    Lab,
}

/// Order of the colors in the returned palette.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaletteOrder {
    /// Whatever order k-means leaves the centroids in.
    #[default]
    Cluster,
    /// Largest share of sampled pixels first.
    Dominance,
}

/// Knobs for [`extract_dominant_colors`].
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractOptions {
    /// Number of clusters, `1..=MAX_COLORS`.
    pub n_colors: usize,
    /// The image is resized to `sample_size × sample_size` before sampling.
    pub sample_size: u32,
    pub max_iter: usize,
    pub converge: f32,
    pub seed: u64,
    pub color_space: ColorSpace,
    pub order: PaletteOrder,
    /// Leave fully transparent pixels out of the sample.
    pub skip_transparent: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            n_colors: MAX_COLORS,
            sample_size: 150,
            max_iter: 20,
            converge: 1e-4,
            seed: 0,
            color_space: ColorSpace::default(),
            order: PaletteOrder::default(),
            skip_transparent: false,
        }
    }
}

impl ExtractOptions {
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_COLORS).contains(&self.n_colors) {
            return Err(Error::InvalidOptions(format!(
                "n_colors must be between 1 and {MAX_COLORS}, got {}",
                self.n_colors
            )));
        }
        if !(1..=MAX_SAMPLE_SIZE).contains(&self.sample_size) {
            return Err(Error::InvalidOptions(format!(
                "sample_size must be between 1 and {MAX_SAMPLE_SIZE}, got {}",
                self.sample_size
            )));
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidOptions("max_iter must be positive".into()));
        }
        Ok(())
    }
}

/// A cluster centroid and the fraction of sampled pixels assigned to it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DominantColor {
    pub color: HexColor,
    pub share: f32,
}

pub fn load_image(path: &Path) -> Result<DynamicImage> {
    Ok(image::open(path)?)
}

/// Scale `img` down to fit inside `max_w × max_h`, keeping the aspect ratio.
/// Images that already fit are returned unscaled.
pub fn thumbnail(img: &DynamicImage, max_w: u32, max_h: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    if w <= max_w && h <= max_h {
        return img.to_rgba8();
    }
    img.thumbnail(max_w, max_h).to_rgba8()
}

/// Resize to a `size × size` grid and collect the RGB of every pixel, alpha
/// discarded. With `skip_transparent`, pixels with zero alpha are left out.
/// Grayscale input comes out as equal channels.
pub fn sample_pixels(img: &DynamicImage, size: u32, skip_transparent: bool) -> Vec<Srgb<u8>> {
    let resized = img.resize_exact(size, size, FilterType::Nearest);
    resized
        .to_rgba8()
        .into_raw()
        .chunks_exact(4)
        .filter(|px| !skip_transparent || px[3] != 0)
        .map(|px| Srgb::new(px[0], px[1], px[2]))
        .collect()
}

/// Cluster the sampled pixels of `img` and return one color per cluster.
///
/// Fewer than `n_colors` entries come back when the sample holds fewer
/// distinct colors than requested.
pub fn extract_dominant_colors(
    img: &DynamicImage,
    opts: &ExtractOptions,
) -> Result<Vec<DominantColor>> {
    opts.validate()?;
    let started = Instant::now();

    let pixels = sample_pixels(img, opts.sample_size, opts.skip_transparent);
    if pixels.is_empty() {
        return Err(Error::NoPixels);
    }

    let distinct = pixels
        .iter()
        .map(|c| (c.red, c.green, c.blue))
        .collect::<HashSet<_>>()
        .len();
    let k = opts.n_colors.min(distinct);

    let (centroids, indices) = match opts.color_space {
        ColorSpace::Rgb => {
            let buf: Vec<Srgb> = pixels.iter().map(|c| c.into_format::<f32>()).collect();
            let kmeans = run_kmeans(k, &buf, opts);
            let centroids = kmeans
                .centroids
                .iter()
                .map(|c| HexColor::from(c.into_format::<u8>()))
                .collect::<Vec<_>>();
            (centroids, kmeans.indices)
        }
        ColorSpace::Lab => {
            let buf: Vec<Lab> = pixels
                .iter()
                .map(|c| Lab::from_color(c.into_format::<f32>()))
                .collect();
            let kmeans = run_kmeans(k, &buf, opts);
            let centroids = kmeans
                .centroids
                .iter()
                .map(|&lab| HexColor::from(Srgb::<f32>::from_color(lab).into_format::<u8>()))
                .collect::<Vec<_>>();
            (centroids, kmeans.indices)
        }
    };

    let mut counts = vec![0usize; centroids.len()];
    for &idx in &indices {
        counts[idx as usize] += 1;
    }
    let total = indices.len() as f32;

    let mut colors: Vec<DominantColor> = centroids
        .into_iter()
        .zip(counts)
        .map(|(color, count)| DominantColor {
            color,
            share: count as f32 / total,
        })
        .collect();

    if opts.order == PaletteOrder::Dominance {
        colors.sort_by(|a, b| b.share.total_cmp(&a.share));
    }

    debug!(
        pixels = pixels.len(),
        distinct,
        k,
        space = ?opts.color_space,
        elapsed = ?started.elapsed(),
        "extracted dominant colors"
    );

    Ok(colors)
}

fn run_kmeans<C: Calculate + Clone>(k: usize, buf: &[C], opts: &ExtractOptions) -> Kmeans<C> {
    get_kmeans(k, opts.max_iter, opts.converge, false, buf, opts.seed)
}

pub fn extract_palette(img: &DynamicImage, opts: &ExtractOptions) -> Result<Palette> {
    let colors = extract_dominant_colors(img, opts)?;
    Palette::new(colors.into_iter().map(|d| d.color).collect())
}

pub fn extract_palette_bytes(input: &[u8], opts: &ExtractOptions) -> Result<Palette> {
    let img = image::load_from_memory(input)?;
    extract_palette(&img, opts)
}

pub fn extract_palette_path(path: &Path, opts: &ExtractOptions) -> Result<Palette> {
    extract_palette(&load_image(path)?, opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgba};

    const STRIPES: [[u8; 3]; 5] = [
        [0xff, 0x00, 0x00],
        [0x00, 0xff, 0x00],
        [0x00, 0x00, 0xff],
        [0x20, 0x20, 0x20],
        [0xf0, 0xe0, 0x10],
    ];

    /// Vertical stripes; stripe `i` is `widths[i]` pixels wide.
    fn striped(widths: &[u32]) -> DynamicImage {
        let width: u32 = widths.iter().sum();
        let img = RgbaImage::from_fn(width, 60, |x, _| {
            let mut edge = 0;
            for (i, w) in widths.iter().enumerate() {
                edge += w;
                if x < edge {
                    let [r, g, b] = STRIPES[i];
                    return Rgba([r, g, b, 255]);
                }
            }
            unreachable!()
        });
        DynamicImage::ImageRgba8(img)
    }

    fn hexes(colors: &[DominantColor]) -> Vec<String> {
        let mut out: Vec<String> = colors.iter().map(|d| d.color.to_hex()).collect();
        out.sort();
        out
    }

    #[test]
    fn recovers_planted_colors_in_rgb() {
        let img = striped(&[60, 60, 60, 60, 60]);
        let colors = extract_dominant_colors(&img, &ExtractOptions::default()).unwrap();
        assert_eq!(
            hexes(&colors),
            vec!["#0000ff", "#00ff00", "#202020", "#f0e010", "#ff0000"]
        );
        let total: f32 = colors.iter().map(|d| d.share).sum();
        assert!((total - 1.0).abs() < 1e-4);
    }

    #[test]
    fn dominance_order_puts_largest_cluster_first() {
        let img = striped(&[20, 200]);
        let opts = ExtractOptions {
            n_colors: 2,
            order: PaletteOrder::Dominance,
            ..Default::default()
        };
        let colors = extract_dominant_colors(&img, &opts).unwrap();
        assert_eq!(colors[0].color.to_hex(), "#00ff00");
        assert_eq!(colors[1].color.to_hex(), "#ff0000");
        assert!(colors[0].share > colors[1].share);
    }

    #[test]
    fn lab_clustering_lands_near_planted_colors() {
        let img = striped(&[50, 50]);
        let opts = ExtractOptions {
            n_colors: 2,
            color_space: ColorSpace::Lab,
            order: PaletteOrder::Dominance,
            ..Default::default()
        };
        let colors = extract_dominant_colors(&img, &opts).unwrap();
        assert_eq!(colors.len(), 2);
        for d in &colors {
            let (r, g, b) = d.color.rgb();
            let near_red = r >= 250 && g <= 5 && b <= 5;
            let near_green = r <= 5 && g >= 250 && b <= 5;
            assert!(near_red || near_green, "unexpected centroid {}", d.color);
        }
    }

    #[test]
    fn flat_image_yields_single_color() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(10, 10, Luma([0x40])));
        let palette = extract_palette(&img, &ExtractOptions::default()).unwrap();
        assert_eq!(palette.to_hex_strings(), vec!["#404040"]);
    }

    #[test]
    fn transparent_pixels_keep_their_rgb() {
        let img = RgbaImage::from_fn(40, 40, |x, _| {
            if x < 20 { Rgba([0, 0, 0, 0]) } else { Rgba([10, 20, 30, 255]) }
        });
        let colors =
            extract_dominant_colors(&DynamicImage::ImageRgba8(img), &ExtractOptions::default())
                .unwrap();
        assert_eq!(hexes(&colors), vec!["#000000", "#0a141e"]);

        let clear = RgbaImage::from_pixel(20, 20, Rgba([200, 10, 10, 0]));
        let palette = extract_palette(&DynamicImage::ImageRgba8(clear), &ExtractOptions::default())
            .unwrap();
        assert_eq!(palette.to_hex_strings(), vec!["#c80a0a"]);
    }

    #[test]
    fn skip_transparent_filters_zero_alpha() {
        let opts = ExtractOptions {
            skip_transparent: true,
            ..Default::default()
        };
        let img = RgbaImage::from_fn(40, 40, |x, _| {
            if x < 20 { Rgba([0, 0, 0, 0]) } else { Rgba([10, 20, 30, 255]) }
        });
        let palette = extract_palette(&DynamicImage::ImageRgba8(img), &opts).unwrap();
        assert_eq!(palette.to_hex_strings(), vec!["#0a141e"]);

        let clear = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 0]));
        let err = extract_palette(&DynamicImage::ImageRgba8(clear), &opts).unwrap_err();
        assert!(matches!(err, Error::NoPixels));
    }

    #[test]
    fn rejects_out_of_range_options() {
        let img = striped(&[10]);
        for opts in [
            ExtractOptions { n_colors: 0, ..Default::default() },
            ExtractOptions { n_colors: 6, ..Default::default() },
            ExtractOptions { sample_size: 0, ..Default::default() },
            ExtractOptions { sample_size: MAX_SAMPLE_SIZE + 1, ..Default::default() },
            ExtractOptions { sample_size: u32::MAX, ..Default::default() },
        ] {
            assert!(matches!(
                extract_dominant_colors(&img, &opts),
                Err(Error::InvalidOptions(_))
            ));
        }
    }

    #[test]
    fn largest_sample_size_is_accepted() {
        let opts = ExtractOptions {
            sample_size: MAX_SAMPLE_SIZE,
            ..Default::default()
        };
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn undecodable_bytes_are_an_image_error() {
        let err = extract_palette_bytes(b"definitely not a png", &ExtractOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Image(_)));
    }

    #[test]
    fn thumbnail_fits_preview_box() {
        let big = DynamicImage::ImageRgba8(RgbaImage::new(1600, 500));
        let thumb = thumbnail(&big, PREVIEW_WIDTH, PREVIEW_HEIGHT);
        assert!(thumb.width() <= PREVIEW_WIDTH && thumb.height() <= PREVIEW_HEIGHT);
        assert_eq!(thumb.width(), PREVIEW_WIDTH);

        let small = DynamicImage::ImageRgba8(RgbaImage::new(30, 20));
        assert_eq!(thumbnail(&small, PREVIEW_WIDTH, PREVIEW_HEIGHT).dimensions(), (30, 20));
    }
}
