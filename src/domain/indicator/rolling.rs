/// Rolling minimum over a trailing window including the current value.
pub fn rolling_min(values: &[f64], period: usize) -> Vec<Option<f64>> {
    rolling_with(values, period, |window| {
        window.iter().copied().fold(f64::INFINITY, f64::min)
    })
}

/// Rolling maximum over a trailing window including the current value.
pub fn rolling_max(values: &[f64], period: usize) -> Vec<Option<f64>> {
    rolling_with(values, period, |window| {
        window.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    })
}

fn rolling_with(values: &[f64], period: usize, f: impl Fn(&[f64]) -> f64) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }
    for i in (period - 1)..values.len() {
        out[i] = Some(f(&values[i + 1 - period..=i]));
    }
    out
}
