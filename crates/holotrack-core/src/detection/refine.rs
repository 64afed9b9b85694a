use crate::consts::{MIN_REFINE_POINTS, REFINE_HALF_WINDOW, REFINE_RESAMPLE_COUNT};

/// Least-squares parabola `a*x^2 + b*x + c` through the given points.
///
/// Returns `[a, b, c]`, or `None` when fewer than [`MIN_REFINE_POINTS`]
/// points are given or the normal equations are singular.
pub fn fit_quadratic(xs: &[f64], ys: &[f64]) -> Option<[f64; 3]> {
    if xs.len() != ys.len() || xs.len() < MIN_REFINE_POINTS {
        return None;
    }

    // Centre the abscissa for conditioning; shift back afterwards.
    let mean = xs.iter().sum::<f64>() / xs.len() as f64;
    let mut s = [0.0f64; 5];
    let mut t = [0.0f64; 3];
    for (&x, &y) in xs.iter().zip(ys) {
        let u = x - mean;
        let mut p = 1.0;
        for (k, sk) in s.iter_mut().enumerate() {
            *sk += p;
            if k < 3 {
                t[k] += y * p;
            }
            p *= u;
        }
    }

    let m = [[s[4], s[3], s[2]], [s[3], s[2], s[1]], [s[2], s[1], s[0]]];
    let rhs = [t[2], t[1], t[0]];
    let det = det3(&m);
    if det.abs() <= f64::EPSILON * s[4].abs().max(1.0) {
        return None;
    }

    let mut coeffs = [0.0f64; 3];
    for (col, coeff) in coeffs.iter_mut().enumerate() {
        let mut mc = m;
        for row in 0..3 {
            mc[row][col] = rhs[row];
        }
        *coeff = det3(&mc) / det;
    }

    // a*(x - mean)^2 + b*(x - mean) + c expanded in x.
    let [a, b, c] = coeffs;
    Some([a, b - 2.0 * a * mean, a * mean * mean - b * mean + c])
}

/// Sub-plane depth of the profile maximum near `coarse`.
///
/// Fits a parabola to the `2 * REFINE_HALF_WINDOW + 1` samples around
/// `coarse` (zero outside the profile), resamples it densely over the
/// window and returns the first position of the largest fitted value.
/// Returns `None` for profiles shorter than [`MIN_REFINE_POINTS`] planes or
/// degenerate fits.
pub fn refine_depth(profile: &[f64], coarse: usize) -> Option<f64> {
    if profile.len() < MIN_REFINE_POINTS || coarse >= profile.len() {
        return None;
    }

    let half = REFINE_HALF_WINDOW as isize;
    let center = coarse as isize;
    let xs: Vec<f64> = (center - half..=center + half).map(|i| i as f64).collect();
    let ys: Vec<f64> = (center - half..=center + half)
        .map(|i| {
            usize::try_from(i)
                .ok()
                .and_then(|i| profile.get(i))
                .copied()
                .unwrap_or(0.0)
        })
        .collect();

    let [a, b, c] = fit_quadratic(&xs, &ys)?;

    let start = xs[0];
    let span = xs[xs.len() - 1] - start;
    let step = span / (REFINE_RESAMPLE_COUNT - 1) as f64;
    let mut best_z = start;
    let mut best_val = f64::NEG_INFINITY;
    for k in 0..REFINE_RESAMPLE_COUNT {
        let z = start + step * k as f64;
        let v = (a * z + b) * z + c;
        if v > best_val {
            best_val = v;
            best_z = z;
        }
    }
    Some(best_z)
}

fn det3(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}
