//! Numeric helpers behind the draw instructions.

/// Samples whose depth lies strictly inside `(start, end)`, returned as
/// `(values, depths)`.
///
/// `depth` must be strictly increasing: the scan stops at the first depth
/// `>= end`.
pub fn dots_range(dots: &[f64], depth: &[f64], start: f64, end: f64) -> (Vec<f64>, Vec<f64>) {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for (&d, &v) in depth.iter().zip(dots) {
        if start < d {
            if d < end {
                xs.push(v);
                ys.push(d);
            } else {
                break;
            }
        }
    }
    (xs, ys)
}

/// Splits `(x, y)` into maximal runs without NaN in `x`. Empty runs are dropped.
pub fn split_mass_nan(x: &[f64], y: &[f64]) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    let mut xx: Vec<Vec<f64>> = Vec::new();
    let mut yy: Vec<Vec<f64>> = Vec::new();
    let mut in_run = false;
    for (&xv, &yv) in x.iter().zip(y) {
        if xv.is_nan() {
            in_run = false;
            continue;
        }
        if !in_run {
            in_run = true;
            xx.push(Vec::new());
            yy.push(Vec::new());
        }
        if let (Some(xs), Some(ys)) = (xx.last_mut(), yy.last_mut()) {
            xs.push(xv);
            ys.push(yv);
        }
    }
    (xx, yy)
}

/// Decimal places for labels of a range with magnitude `z`: two digits
/// below the leading one. Gives up with 10 places for tiny or zero ranges.
pub fn n_round(z: f64) -> usize {
    let mut n: i32 = -2;
    while (z / 10f64.powi(-n)).floor() == 0.0 {
        n += 1;
        if n > 6 {
            return 10;
        }
    }
    (n + 2) as usize
}

pub fn round_to(value: f64, places: usize) -> f64 {
    let factor = 10f64.powi(places as i32);
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() {
        rounded
    } else {
        value
    }
}

/// Minimum and maximum ignoring NaN. `None` when nothing is left.
pub fn nan_min_max(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// `x_range` with a 2 % margin, or one unit around a single value.
pub fn padded_range(lo: f64, hi: f64) -> (f64, f64) {
    if lo == hi {
        (lo - 1.0, hi + 1.0)
    } else {
        let margin = (hi - lo).abs() * 0.02;
        (lo - margin, hi + margin)
    }
}

/// Logarithmic counterpart of [`padded_range`]: the 2 % margin is applied as
/// a factor so the range stays positive. Expects `0 < lo <= hi`.
pub fn padded_log_range(lo: f64, hi: f64) -> (f64, f64) {
    if lo == hi {
        (lo / 10.0, hi * 10.0)
    } else {
        (lo / 1.02, hi * 1.02)
    }
}

/// Min and max of the strictly positive values, the only ones a log axis shows.
pub fn positive_min_max(values: &[f64]) -> Option<(f64, f64)> {
    let positive: Vec<f64> = values.iter().copied().filter(|v| *v > 0.0).collect();
    nan_min_max(&positive)
}

/// `count` positions evenly dividing `(x0, x1)`.
pub fn grid_positions((x0, x1): (f64, f64), count: u32) -> Vec<f64> {
    let step = (x1 - x0) / (count as f64 + 1.0);
    (1..=count).map(|i| x0 + step * i as f64).collect()
}

/// Like [`grid_positions`], evenly spaced on a log axis.
pub fn log_grid_positions((x0, x1): (f64, f64), count: u32) -> Vec<f64> {
    grid_positions((x0.log10(), x1.log10()), count)
        .into_iter()
        .map(|e| 10f64.powf(e))
        .collect()
}
