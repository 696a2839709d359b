//! Numeric primitives: descriptive statistics, circular statistics on
//! clock-hour data, OLS slope, the log-normal CDF used by the ranking
//! module, and the crate-wide rounding helpers.
//!
//! Everything here is pure and deterministic; callers pre-filter their
//! inputs, these functions only guard against empty slices.

use std::f64::consts::PI;

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median over a copy of the input; 0 for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Mean after dropping the top and bottom `trim` fraction (e.g. 0.05).
/// Falls back to the plain mean when trimming would drop everything.
pub fn trimmed_mean(values: &[f64], trim: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let cut = (sorted.len() as f64 * trim).floor() as usize;
    if sorted.len() <= 2 * cut {
        return mean(&sorted);
    }
    mean(&sorted[cut..sorted.len() - cut])
}

/// Population standard deviation; 0 for fewer than two values.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Percentile in `0..=100` with linear interpolation between closest ranks.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Circular midpoint of a 24-bin hourly histogram.
///
/// Maps hour `h` to angle `2πh/24`, weights by the bin count, and converts
/// the resultant vector's argument back to hours in `[0, 24)`. A histogram
/// with no directional mass (empty, or perfectly uniform) has no defined
/// midpoint; the sentinel convention is `12.0`.
pub fn circular_midpoint(histogram: &[f64; 24]) -> f64 {
    let total: f64 = histogram.iter().sum();
    if total <= 0.0 {
        return 12.0;
    }

    let mut sin_sum = 0.0;
    let mut cos_sum = 0.0;
    for (hour, &count) in histogram.iter().enumerate() {
        let angle = 2.0 * PI * hour as f64 / 24.0;
        sin_sum += count * angle.sin();
        cos_sum += count * angle.cos();
    }

    let resultant = (sin_sum * sin_sum + cos_sum * cos_sum).sqrt() / total;
    if resultant < 1e-9 {
        return 12.0;
    }

    let angle = sin_sum.atan2(cos_sum);
    let hours = angle / (2.0 * PI) * 24.0;
    (hours + 24.0) % 24.0
}

/// Shortest distance between two clock hours on the 24-hour circle.
pub fn circular_delta(a: f64, b: f64) -> f64 {
    let d = (a - b).abs();
    d.min(24.0 - d)
}

/// OLS slope over `(index, value)` pairs.
///
/// Non-finite values are filtered before fitting. Returns exactly 0 for
/// fewer than two usable points or zero x-variance.
pub fn linear_slope(values: &[f64]) -> f64 {
    let points: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, &v)| (i as f64, v))
        .collect();
    if points.len() < 2 {
        return 0.0;
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let ss_xx: f64 = points.iter().map(|(x, _)| (x - mean_x) * (x - mean_x)).sum();
    if ss_xx == 0.0 {
        return 0.0;
    }
    let ss_xy: f64 = points
        .iter()
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();
    ss_xy / ss_xx
}

/// Error function, Abramowitz–Stegun 7.1.26 series (|ε| ≤ 1.5e-7).
fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();
    sign * y
}

/// Standard normal CDF.
fn phi(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

/// CDF of a log-normal distribution parameterised by its median and the
/// log-space sigma, as a percentile in `0..=100`.
pub fn log_normal_percentile(value: f64, median: f64, sigma: f64) -> f64 {
    if value <= 0.0 {
        return 0.0;
    }
    let z = (value.ln() - median.ln()) / sigma;
    (phi(z) * 100.0).clamp(0.0, 100.0)
}

// ============================================================================
// Rounding (applied before clamps, crate-wide)
// ============================================================================

/// Integer percentage: `round(x · 100)`.
pub fn round_pct(fraction: f64) -> i64 {
    (fraction * 100.0).round() as i64
}

/// One-decimal rate: `round(x · 10) / 10`.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Two-decimal score: `round(x · 100) / 100`.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
