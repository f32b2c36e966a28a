//! PCHIP knot slopes (Fritsch-Carlson with Brodlie's weighted harmonic mean).

use super::secants;

/// Knot slopes for a shape-preserving piecewise cubic Hermite curve.
///
/// Interior slopes are the weighted harmonic mean of the adjacent secants, or
/// zero where the secants disagree in sign or either one is flat. End slopes
/// use a one-sided three-point estimate, limited so they cannot overshoot.
pub(super) fn slopes(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    let delta = secants(xs, ys);

    if n == 2 {
        return vec![delta[0], delta[0]];
    }

    let mut d = vec![0.0; n];
    for k in 1..n - 1 {
        let (prev, next) = (delta[k - 1], delta[k]);
        if sign(prev) * sign(next) <= 0.0 {
            continue;
        }
        let w1 = 2.0 * h[k] + h[k - 1];
        let w2 = h[k] + 2.0 * h[k - 1];
        d[k] = (w1 + w2) / (w1 / prev + w2 / next);
    }

    d[0] = end_slope(h[0], h[1], delta[0], delta[1]);
    d[n - 1] = end_slope(h[n - 2], h[n - 3], delta[n - 2], delta[n - 3]);
    d
}

/// One-sided slope at an end knot. `h0`/`m0` belong to the end interval.
fn end_slope(h0: f64, h1: f64, m0: f64, m1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * m0 - h0 * m1) / (h0 + h1);
    if sign(d) != sign(m0) {
        0.0
    } else if sign(m0) != sign(m1) && d.abs() > 3.0 * m0.abs() {
        3.0 * m0
    } else {
        d
    }
}

/// Sign with a true zero, unlike `f64::signum`.
fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}
