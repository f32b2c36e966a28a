//! Akima knot slopes.

use super::secants;

/// Knot slopes from Akima's locally weighted secant average.
///
/// The slope at knot `i` blends the secants on either side, `m_{i-1}` and
/// `m_i`. Each one is weighted by how much the secants on the *opposite* side
/// differ from each other, which damps the influence of a single outlier.
/// Two virtual secants are extrapolated linearly past each end so the
/// weights exist at the end knots. Two knots give a straight line.
pub(super) fn slopes(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let inner = secants(xs, ys);
    if n == 2 {
        return vec![inner[0], inner[0]];
    }

    // Extended secants: m[k + 2] is the secant of interval k.
    let last = inner.len() - 1;
    let mut m = Vec::with_capacity(n + 3);
    m.push(3.0 * inner[0] - 2.0 * inner[1]);
    m.push(2.0 * inner[0] - inner[1]);
    m.extend_from_slice(&inner);
    m.push(2.0 * inner[last] - inner[last - 1]);
    m.push(3.0 * inner[last] - 2.0 * inner[last - 1]);

    let diff: Vec<f64> = m.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
    let weight_sums: Vec<f64> = (0..n).map(|i| diff[i + 2] + diff[i]).collect();
    // Weight sums this small relative to the largest count as a collinear
    // neighbourhood, where the formula degenerates to 0/0.
    let threshold = 1e-9 * weight_sums.iter().copied().fold(0.0, f64::max);

    (0..n)
        .map(|i| {
            let (left, right) = (m[i + 1], m[i + 2]);
            let w_left = diff[i + 2];
            let w_right = diff[i];
            let sum = weight_sums[i];
            if sum > threshold {
                (w_left * left + w_right * right) / sum
            } else {
                0.5 * (left + right)
            }
        })
        .collect()
}
