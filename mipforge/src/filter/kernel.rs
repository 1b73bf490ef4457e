//! Windowed filter functions and sample-weight integration.

use std::f32::consts::PI;

/// A resampling filter, evaluated at an offset from the filter center.
///
/// The variants form a closed set; each carries its own parameters and
/// is dispatched through [`Filter::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filter {
    /// Unit pulse over `[-width, width]`.
    Box { width: f32 },
    /// Kaiser-windowed sinc. See
    /// <https://en.wikipedia.org/wiki/Kaiser_window>.
    Kaiser { width: f32, alpha: f32, stretch: f32 },
    /// Lanczos window. See
    /// <https://en.wikipedia.org/wiki/Lanczos_resampling>.
    Lanczos { width: f32 },
}

impl Filter {
    /// Box filter with the conventional 0.5 half-width.
    pub fn box_filter() -> Self {
        Filter::Box { width: 0.5 }
    }

    /// Kaiser filter with the default alpha (4.0) and stretch (1.0).
    pub fn kaiser(width: f32) -> Self {
        Filter::Kaiser {
            width,
            alpha: 4.0,
            stretch: 1.0,
        }
    }

    /// Lanczos filter with the conventional width of 3.
    pub fn lanczos() -> Self {
        Filter::Lanczos { width: 3.0 }
    }

    /// The filter's native half-width.
    pub fn width(&self) -> f32 {
        match *self {
            Filter::Box { width } => width,
            Filter::Kaiser { width, .. } => width,
            Filter::Lanczos { width } => width,
        }
    }

    /// Evaluate the filter at offset `x`.
    pub fn evaluate(&self, x: f32) -> f32 {
        match *self {
            Filter::Box { width } => {
                if x.abs() <= width {
                    1.0
                } else {
                    0.0
                }
            }
            Filter::Kaiser {
                width,
                alpha,
                stretch,
            } => {
                let t = x / width;
                let omtt = 1.0 - t * t;
                if omtt >= 0.0 {
                    sinc(PI * x * stretch) * bessel_i0(alpha * omtt.sqrt()) / bessel_i0(alpha)
                } else {
                    0.0
                }
            }
            Filter::Lanczos { width } => {
                let a = x.abs();
                if a < width {
                    sinc(PI * a) * sinc(PI * a / width)
                } else {
                    0.0
                }
            }
        }
    }
}

/// `sin(x) / x`, with a Taylor expansion near zero to avoid the
/// cancellation at `x == 0`.
pub fn sinc(x: f32) -> f32 {
    if x.abs() < f32::EPSILON {
        1.0 + x * x * (-1.0 / 6.0 + x * x * (1.0 / 120.0))
    } else {
        x.sin() / x
    }
}

/// Modified Bessel function of the first kind, order zero.
///
/// The power series is summed until a term drops below `1e-6` of the
/// running sum.
pub fn bessel_i0(x: f32) -> f32 {
    let xh = 0.5 * x;
    let mut sum = 1.0f32;
    let mut power = 1.0f32;
    let mut term = 1.0f32;
    let mut k = 0;
    while term > sum * 1e-6 {
        k += 1;
        power *= xh / k as f32;
        term = power * power;
        sum += term;
    }
    sum
}

/// Point-sample a filter at the center of the destination pixel.
pub fn sample_delta(x: f32, scale: f32, filter: &Filter) -> f32 {
    filter.evaluate((x + 0.5) * scale)
}

/// Box-integrate a filter across the destination pixel's footprint.
///
/// Averages `sample_count` evenly spaced sub-samples instead of
/// point-sampling, which anti-aliases the computed weights.
pub fn sample_box(x: f32, scale: f32, sample_count: usize, filter: &Filter) -> f32 {
    let norm = 1.0 / sample_count as f32;
    let mut sum = 0.0;
    for i in 0..sample_count {
        let p = (x + (i as f32 + 0.5) * norm) * scale;
        sum += filter.evaluate(p);
    }
    sum * norm
}

/// Triangle-weighted integration across the destination pixel footprint.
pub fn sample_triangle(x: f32, scale: f32, sample_count: usize, filter: &Filter) -> f32 {
    let norm = 1.0 / sample_count as f32;
    let mut sum = 0.0;
    for i in 0..sample_count {
        let offset = (2.0 * i as f32 + 1.0) * norm;
        let p = (x + offset - 0.5) * scale;
        let weight = if offset > 1.0 { 2.0 - offset } else { offset };
        sum += weight * filter.evaluate(p);
    }
    sum * norm * 2.0
}
