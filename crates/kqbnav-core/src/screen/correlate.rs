//! Normalised cross-correlation template search
//!
//! Score is the zero-mean normalised cross-correlation (CCOEFF_NORMED):
//! 1.0 for an exact match, ~0 for unrelated content, negative for inverted
//! content. Full-screen search at native resolution is too slow, so large
//! templates are first located on a downscaled pair and the hit is refined at
//! full resolution in a small window around it.

use image::imageops::{self, FilterType};
use image::GrayImage;

/// Downscaled templates keep at least this many pixels per side
const MIN_COARSE_SIDE: u32 = 12;
/// Largest pyramid reduction tried
const MAX_FACTOR: u32 = 4;
const EPSILON: f64 = 1e-9;

/// Best template placement. `x`/`y` are the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correlation {
    pub x: u32,
    pub y: u32,
    pub score: f32,
}

/// Summed-area tables of a haystack image
struct Integral {
    stride: usize,
    sum: Vec<f64>,
    sq_sum: Vec<f64>,
}

impl Integral {
    fn new(image: &GrayImage) -> Self {
        let (w, h) = (image.width() as usize, image.height() as usize);
        let stride = w + 1;
        let mut sum = vec![0.0; stride * (h + 1)];
        let mut sq_sum = vec![0.0; stride * (h + 1)];
        let raw = image.as_raw();
        for y in 0..h {
            let mut row = 0.0;
            let mut row_sq = 0.0;
            for x in 0..w {
                let v = raw[y * w + x] as f64;
                row += v;
                row_sq += v * v;
                let idx = (y + 1) * stride + (x + 1);
                sum[idx] = sum[idx - stride] + row;
                sq_sum[idx] = sq_sum[idx - stride] + row_sq;
            }
        }
        Self { stride, sum, sq_sum }
    }

    fn rect(table: &[f64], stride: usize, x: usize, y: usize, w: usize, h: usize) -> f64 {
        let a = table[y * stride + x];
        let b = table[y * stride + x + w];
        let c = table[(y + h) * stride + x];
        let d = table[(y + h) * stride + x + w];
        d - b - c + a
    }

    /// Sum and sum of squares over a window
    fn window(&self, x: usize, y: usize, w: usize, h: usize) -> (f64, f64) {
        (
            Self::rect(&self.sum, self.stride, x, y, w, h),
            Self::rect(&self.sq_sum, self.stride, x, y, w, h),
        )
    }
}

/// Zero-mean template pixels plus their energy
struct Needle {
    width: usize,
    height: usize,
    deviations: Vec<f64>,
    energy: f64,
}

impl Needle {
    fn new(image: &GrayImage) -> Self {
        let raw = image.as_raw();
        let n = raw.len().max(1) as f64;
        let mean = raw.iter().map(|&v| v as f64).sum::<f64>() / n;
        let deviations: Vec<f64> = raw.iter().map(|&v| v as f64 - mean).collect();
        let energy = deviations.iter().map(|d| d * d).sum();
        Self {
            width: image.width() as usize,
            height: image.height() as usize,
            deviations,
            energy,
        }
    }
}

fn score_at(haystack: &GrayImage, integral: &Integral, needle: &Needle, x: usize, y: usize) -> f64 {
    let n = (needle.width * needle.height) as f64;
    let (sum, sq_sum) = integral.window(x, y, needle.width, needle.height);
    let variance = sq_sum - sum * sum / n;
    let denom = (variance * needle.energy).sqrt();
    if denom < EPSILON {
        return 0.0;
    }

    let hw = haystack.width() as usize;
    let raw = haystack.as_raw();
    let mut numerator = 0.0;
    for j in 0..needle.height {
        let row = &raw[(y + j) * hw + x..(y + j) * hw + x + needle.width];
        let dev = &needle.deviations[j * needle.width..(j + 1) * needle.width];
        numerator += row
            .iter()
            .zip(dev)
            .map(|(&h, &t)| h as f64 * t)
            .sum::<f64>();
    }
    numerator / denom
}

/// Evaluate every placement inside `[x0, x1] × [y0, y1]`
fn search(
    haystack: &GrayImage,
    integral: &Integral,
    needle: &Needle,
    (x0, x1): (usize, usize),
    (y0, y1): (usize, usize),
) -> Option<Correlation> {
    let mut best: Option<Correlation> = None;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let score = score_at(haystack, integral, needle, x, y) as f32;
            if best.map_or(true, |b| score > b.score) {
                best = Some(Correlation {
                    x: x as u32,
                    y: y as u32,
                    score,
                });
            }
        }
    }
    best
}

fn exhaustive(haystack: &GrayImage, needle: &GrayImage) -> Option<Correlation> {
    let max_x = haystack.width().checked_sub(needle.width())? as usize;
    let max_y = haystack.height().checked_sub(needle.height())? as usize;
    let integral = Integral::new(haystack);
    search(haystack, &integral, &Needle::new(needle), (0, max_x), (0, max_y))
}

/// Largest reduction that keeps the template recognisable
fn pyramid_factor(needle: &GrayImage) -> u32 {
    let mut factor = MAX_FACTOR;
    while factor > 1 {
        if needle.width() / factor >= MIN_COARSE_SIDE && needle.height() / factor >= MIN_COARSE_SIDE {
            return factor;
        }
        factor /= 2;
    }
    1
}

fn downscale(image: &GrayImage, factor: u32) -> GrayImage {
    imageops::resize(
        image,
        (image.width() / factor).max(1),
        (image.height() / factor).max(1),
        FilterType::Triangle,
    )
}

/// Best placement of `needle` inside `haystack`, or `None` when it cannot fit.
pub fn best_match(haystack: &GrayImage, needle: &GrayImage) -> Option<Correlation> {
    if needle.width() == 0 || needle.height() == 0 {
        return None;
    }
    if needle.width() > haystack.width() || needle.height() > haystack.height() {
        return None;
    }

    let factor = pyramid_factor(needle);
    if factor == 1 {
        return exhaustive(haystack, needle);
    }

    let coarse = exhaustive(&downscale(haystack, factor), &downscale(needle, factor))?;

    let max_x = (haystack.width() - needle.width()) as usize;
    let max_y = (haystack.height() - needle.height()) as usize;
    let (cx, cy, f) = (
        (coarse.x * factor) as usize,
        (coarse.y * factor) as usize,
        factor as usize,
    );
    let x_range = (cx.saturating_sub(f).min(max_x), (cx + f).min(max_x));
    let y_range = (cy.saturating_sub(f).min(max_y), (cy + f).min(max_y));

    let integral = Integral::new(haystack);
    search(haystack, &integral, &Needle::new(needle), x_range, y_range)
}
