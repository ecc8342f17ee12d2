use image::{Rgb, RgbImage};
use ndarray::Array2;

/// Maps score values to colors and paints whole buffers. Score `0.0` is the
/// never-escaped sentinel and always paints black, whatever the colormap.
pub trait Painter {
    fn score_color(&self, score: f64) -> Rgb<u8>;

    fn paint(&self, scores: &Array2<f64>) -> RgbImage {
        let width: u32 = scores.ncols().try_into().unwrap();
        let height: u32 = scores.nrows().try_into().unwrap();

        let mut img = RgbImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let score = scores[[y as usize, x as usize]];
                let color = if score == 0.0 {
                    Rgb([0, 0, 0])
                } else {
                    self.score_color(score)
                };
                img.put_pixel(x, y, color);
            }
        }
        img
    }
}

/// Looks a painter up by colormap name. `max_score` is the top of the score
/// range, `iterations / 5`.
pub fn by_name(name: &str, max_score: f64) -> Option<Box<dyn Painter>> {
    match name {
        "brbg" => Some(Box::new(BrownBlue::new(max_score))),
        "greyscale" | "grayscale" => Some(Box::new(Greyscale::new(max_score))),
        "rainbow" => Some(Box::new(Rainbow::new(max_score))),
        _ => None,
    }
}

fn mix(a: u8, b: u8, frac: f64) -> u8 {
    let m = f64::from(a) * (1.0 - frac) + f64::from(b) * frac;
    m.round() as u8
}

/// Piecewise-linear interpolation through evenly spaced color stops.
/// A NaN score falls through the saturating casts to the first stop pair
/// with NaN channel math, which collapses to black.
fn blend(stops: &[[u8; 3]], t: f64) -> Rgb<u8> {
    let last = stops.len() - 1;
    let pos = t.clamp(0.0, 1.0) * last as f64;
    let lo = (pos as usize).min(last);
    let hi = (lo + 1).min(last);
    let frac = pos - lo as f64;
    let (a, b) = (stops[lo], stops[hi]);
    Rgb([
        mix(a[0], b[0], frac),
        mix(a[1], b[1], frac),
        mix(a[2], b[2], frac),
    ])
}

pub struct Greyscale {
    max_score: f64,
}

impl Greyscale {
    pub fn new(max_score: f64) -> Self {
        Self { max_score }
    }
}

impl Painter for Greyscale {
    /// Low scores paint near white, high scores near black.
    fn score_color(&self, score: f64) -> Rgb<u8> {
        let frac = (score / self.max_score).clamp(0.0, 1.0);
        let v = 255 - (frac * 255.0).round() as u8;
        Rgb([v, v, v])
    }
}

/// Brown-to-blue-green diverging map, after the BrBG palette.
const BRBG: [[u8; 3]; 9] = [
    [84, 48, 5],
    [140, 81, 10],
    [191, 129, 45],
    [223, 194, 125],
    [245, 245, 245],
    [199, 234, 229],
    [128, 205, 193],
    [53, 151, 143],
    [1, 102, 94],
];

pub struct BrownBlue {
    max_score: f64,
}

impl BrownBlue {
    pub fn new(max_score: f64) -> Self {
        Self { max_score }
    }
}

impl Painter for BrownBlue {
    fn score_color(&self, score: f64) -> Rgb<u8> {
        blend(&BRBG, score / self.max_score)
    }
}

const RAINBOW: [[u8; 3]; 7] = [
    [255, 0, 0],
    [255, 165, 0],
    [255, 255, 0],
    [0, 200, 0],
    [0, 220, 220],
    [0, 0, 255],
    [148, 0, 211],
];

pub struct Rainbow {
    max_score: f64,
}

impl Rainbow {
    pub fn new(max_score: f64) -> Self {
        Self { max_score }
    }
}

impl Painter for Rainbow {
    fn score_color(&self, score: f64) -> Rgb<u8> {
        blend(&RAINBOW, score / self.max_score)
    }
}
