// ---------------------------------------------------------------------------
// Scalar statistics: means, quartiles, Pearson correlation, OLS fit
// ---------------------------------------------------------------------------

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Round to two decimal places (for display tables).
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Five-number summary plus the 1.5×IQR whisker fences.
#[derive(Debug, Clone, PartialEq)]
pub struct Quartiles {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Values outside `[lower_fence, upper_fence]` count as outliers.
    pub lower_fence: f64,
    pub upper_fence: f64,
}

/// Compute quartiles of a sample; `None` for an empty slice.
/// Q1/Q3 use linear interpolation between order statistics, so a
/// singleton sample yields a degenerate box (all five numbers equal).
pub fn quartiles(values: &[f64]) -> Option<Quartiles> {
    if values.is_empty() {
        return None;
    }
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = percentile(&sorted, 0.25);
    let median = percentile(&sorted, 0.5);
    let q3 = percentile(&sorted, 0.75);
    let iqr = q3 - q1;

    Some(Quartiles {
        min: sorted[0],
        q1,
        median,
        q3,
        max: sorted[sorted.len() - 1],
        lower_fence: q1 - 1.5 * iqr,
        upper_fence: q3 + 1.5 * iqr,
    })
}

/// Linearly interpolated percentile of an already sorted, non-empty slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = pos - lo as f64;
        sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    }
}

/// Pearson correlation coefficient. Returns `f64::NAN` when either column
/// has zero variance or fewer than two points (undefined, not an error).
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return f64::NAN;
    }
    let mx = xs[..n].iter().sum::<f64>() / n as f64;
    let my = ys[..n].iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = xs[i] - mx;
        let dy = ys[i] - my;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

/// Ordinary-least-squares line through `(x, y)` pairs.
/// `None` when there are fewer than two points or x has zero variance.
pub fn ols_fit(points: &[[f64; 2]]) -> Option<(f64, f64)> {
    let n = points.len();
    if n < 2 {
        return None;
    }
    let mx = points.iter().map(|p| p[0]).sum::<f64>() / n as f64;
    let my = points.iter().map(|p| p[1]).sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    for p in points {
        cov += (p[0] - mx) * (p[1] - my);
        var_x += (p[0] - mx) * (p[0] - mx);
    }
    if var_x == 0.0 {
        return None;
    }
    let slope = cov / var_x;
    Some((slope, my - slope * mx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quartiles_of_singleton_are_degenerate() {
        let q = quartiles(&[7.5]).unwrap();
        assert_eq!(q.min, 7.5);
        assert_eq!(q.q1, 7.5);
        assert_eq!(q.median, 7.5);
        assert_eq!(q.q3, 7.5);
        assert_eq!(q.max, 7.5);
        assert_eq!(q.lower_fence, 7.5);
        assert_eq!(q.upper_fence, 7.5);
    }

    #[test]
    fn quartiles_interpolate() {
        // 1..=5: Q1 = 2, median = 3, Q3 = 4
        let q = quartiles(&[5.0, 1.0, 3.0, 2.0, 4.0]).unwrap();
        assert_eq!(q.q1, 2.0);
        assert_eq!(q.median, 3.0);
        assert_eq!(q.q3, 4.0);
        assert_eq!(q.lower_fence, -1.0);
        assert_eq!(q.upper_fence, 7.0);
    }

    #[test]
    fn quartiles_of_empty_is_none() {
        assert!(quartiles(&[]).is_none());
    }

    #[test]
    fn pearson_perfect_correlation() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        assert!((pearson(&x, &y) - 1.0).abs() < 1e-12);
        let neg: Vec<f64> = y.iter().map(|v| -v).collect();
        assert!((pearson(&x, &neg) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_zero_variance_is_nan() {
        let x = [3.0, 3.0, 3.0];
        let y = [1.0, 2.0, 3.0];
        assert!(pearson(&x, &y).is_nan());
    }

    #[test]
    fn ols_recovers_exact_line() {
        let pts = [[0.0, 1.0], [1.0, 3.0], [2.0, 5.0]];
        let (slope, intercept) = ols_fit(&pts).unwrap();
        assert!((slope - 2.0).abs() < 1e-12);
        assert!((intercept - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ols_needs_two_points_and_x_spread() {
        assert!(ols_fit(&[[1.0, 2.0]]).is_none());
        assert!(ols_fit(&[[1.0, 2.0], [1.0, 5.0]]).is_none());
    }
}
