use super::ema::ema;

/// MACD line, signal line and histogram, aligned to the input closes.
pub struct MacdSeries {
    pub line: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

/// MACD(fast, slow, signal): fast EMA minus slow EMA, with an EMA of the
/// line as the signal. The line appears once the slow EMA is live; the
/// signal needs `signal_period` line values on top of that.
pub fn macd(
    closes: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> MacdSeries {
    let n = closes.len();
    let fast = ema(closes, fast_period);
    let slow = ema(closes, slow_period);

    let mut line = vec![None; n];
    for i in 0..n {
        if let (Some(f), Some(s)) = (fast[i], slow[i]) {
            line[i] = Some(f - s);
        }
    }

    // Signal EMA runs over the defined stretch of the line only.
    let start = line.iter().position(Option::is_some).unwrap_or(n);
    let defined: Vec<f64> = line[start..].iter().map(|v| v.unwrap_or(0.0)).collect();
    let signal_defined = ema(&defined, signal_period);

    let mut signal = vec![None; n];
    let mut histogram = vec![None; n];
    for (offset, value) in signal_defined.into_iter().enumerate() {
        let i = start + offset;
        signal[i] = value;
        if let (Some(l), Some(s)) = (line[i], value) {
            histogram[i] = Some(l - s);
        }
    }

    MacdSeries {
        line,
        signal,
        histogram,
    }
}
