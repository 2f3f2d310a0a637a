// Trailing-window indicators over a plain slice of closes.

/// Simple moving average over a trailing window.
/// Returns a vector aligned with `values`: `None` until `window` values exist.
pub fn moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, mean)
}

/// Sample standard deviation (divisor `window - 1`) over a trailing window.
/// Same alignment as [`moving_average`]. A window below 2 yields no values.
pub fn rolling_volatility(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window < 2 {
        return vec![None; values.len()];
    }
    rolling(values, window, sample_std_dev)
}

/// Applies `f` to every full trailing window. Each window is summed from
/// scratch so results do not depend on evaluation order.
fn rolling(values: &[f64], window: usize, f: fn(&[f64]) -> f64) -> Vec<Option<f64>> {
    if window == 0 || values.len() < window {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    out.resize(window - 1, None);
    out.extend(values.windows(window).map(|w| Some(f(w))));
    out
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_std_dev(values: &[f64]) -> f64 {
    let avg = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - avg).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}
