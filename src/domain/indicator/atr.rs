use crate::domain::ohlcv::Bar;

/// Average True Range with Wilder smoothing, seeded from the simple mean
/// of the first `period` true ranges. The first bar's true range falls
/// back to its high-low span.
pub fn atr(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; bars.len()];
    if period == 0 || bars.len() < period {
        return out;
    }

    let tr: Vec<f64> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                bar.high - bar.low
            } else {
                bar.true_range(bars[i - 1].close)
            }
        })
        .collect();

    let n = period as f64;
    let mut current: f64 = tr[..period].iter().sum::<f64>() / n;
    out[period - 1] = Some(current);
    for i in period..bars.len() {
        current = (current * (n - 1.0) + tr[i]) / n;
        out[i] = Some(current);
    }
    out
}
