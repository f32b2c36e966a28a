//! Natural cubic spline.
//!
//! Second derivatives `M_i` at the knots solve the tridiagonal system
//!
//! `h_{i-1} M_{i-1} + 2 (h_{i-1} + h_i) M_i + h_i M_{i+1} = 6 (s_i - s_{i-1})`
//!
//! for the interior knots, with `M_0 = M_{n-1} = 0`. The system is strictly
//! diagonally dominant, so the Thomas algorithm needs no pivoting.

use super::{CubicSegment, secants};

#[allow(clippy::many_single_char_names)] // Standard spline notation
pub(super) fn segments(xs: &[f64], ys: &[f64]) -> Vec<CubicSegment> {
    let n = xs.len();
    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    let s = secants(xs, ys);
    let m = second_derivatives(&h, &s);

    (0..n - 1)
        .map(|i| CubicSegment {
            a: ys[i],
            b: s[i] - h[i] * (2.0 * m[i] + m[i + 1]) / 6.0,
            c: m[i] / 2.0,
            d: (m[i + 1] - m[i]) / (6.0 * h[i]),
        })
        .collect()
}

/// Solve for the knot second derivatives. Two knots give a straight line.
fn second_derivatives(h: &[f64], s: &[f64]) -> Vec<f64> {
    let n = h.len() + 1;
    let mut m = vec![0.0; n];
    if n < 3 {
        return m;
    }

    // Row r holds the equation of interior knot r + 1.
    let rows = n - 2;
    let mut upper = vec![0.0; rows];
    let mut rhs = vec![0.0; rows];

    for r in 0..rows {
        let i = r + 1;
        let lower = if r == 0 { 0.0 } else { h[i - 1] };
        let (prev_upper, prev_rhs) = if r == 0 { (0.0, 0.0) } else { (upper[r - 1], rhs[r - 1]) };

        let pivot = 2.0 * (h[i - 1] + h[i]) - lower * prev_upper;
        upper[r] = h[i] / pivot;
        rhs[r] = (6.0 * (s[i] - s[i - 1]) - lower * prev_rhs) / pivot;
    }

    m[rows] = rhs[rows - 1];
    for r in (0..rows - 1).rev() {
        m[r + 1] = rhs[r] - upper[r] * m[r + 2];
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    fn second_derivative(seg: &CubicSegment, t: f64) -> f64 {
        2.0 * seg.c + 6.0 * seg.d * t
    }

    #[test]
    fn test_natural_boundary_and_c2_continuity() {
        let xs = [0.0, 0.5, 1.5, 2.0, 3.5];
        let ys = [1.0, 2.0, 0.5, 1.5, 1.0];
        let segs = segments(&xs, &ys);
        assert_eq!(segs.len(), 4);

        assert!(second_derivative(&segs[0], 0.0).abs() < 1e-12);
        let last_h = xs[4] - xs[3];
        assert!(second_derivative(&segs[3], last_h).abs() < 1e-9);

        for i in 0..segs.len() - 1 {
            let h = xs[i + 1] - xs[i];
            let left = &segs[i];
            let right = &segs[i + 1];
            assert!((left.value(h) - right.value(0.0)).abs() < 1e-9, "C0 at knot {}", i + 1);
            assert!((left.slope(h) - right.slope(0.0)).abs() < 1e-9, "C1 at knot {}", i + 1);
            assert!(
                (second_derivative(left, h) - second_derivative(right, 0.0)).abs() < 1e-9,
                "C2 at knot {}",
                i + 1
            );
        }
    }

    #[test]
    fn test_three_knots_known_solution() {
        // Symmetric tent: M_1 = 6 (s_1 - s_0) / (2 (h_0 + h_1)) = 6 * -2 / 4 = -3
        let m = second_derivatives(&[1.0, 1.0], &[1.0, -1.0]);
        assert_eq!(m.len(), 3);
        assert_eq!(m[0], 0.0);
        assert!((m[1] + 3.0).abs() < 1e-12);
        assert_eq!(m[2], 0.0);
    }

    #[test]
    fn test_reproduces_line() {
        let xs = [0.0, 1.0, 3.0, 4.0];
        let ys = [1.0, 3.0, 7.0, 9.0];
        for seg in segments(&xs, &ys) {
            assert!((seg.b - 2.0).abs() < 1e-12);
            assert!(seg.c.abs() < 1e-12);
            assert!(seg.d.abs() < 1e-12);
        }
    }
}
