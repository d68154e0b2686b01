use crate::domain::ohlcv::Bar;

/// Average Directional Index (Wilder). Directional movement and true
/// range are Wilder-smoothed into DI+/DI-, their spread becomes DX, and
/// ADX is the Wilder average of DX. First value at index `2 * period - 1`.
pub fn adx(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    let len = bars.len();
    let mut out = vec![None; len];
    if period == 0 || len < 2 * period {
        return out;
    }

    let mut plus_dm = vec![0.0; len];
    let mut minus_dm = vec![0.0; len];
    let mut tr = vec![0.0; len];
    for i in 1..len {
        let up = bars[i].high - bars[i - 1].high;
        let down = bars[i - 1].low - bars[i].low;
        if up > down && up > 0.0 {
            plus_dm[i] = up;
        }
        if down > up && down > 0.0 {
            minus_dm[i] = down;
        }
        tr[i] = bars[i].true_range(bars[i - 1].close);
    }

    let n = period as f64;
    let mut s_plus: f64 = plus_dm[1..=period].iter().sum();
    let mut s_minus: f64 = minus_dm[1..=period].iter().sum();
    let mut s_tr: f64 = tr[1..=period].iter().sum();

    let mut dx = vec![0.0; len];
    dx[period] = dx_value(s_plus, s_minus, s_tr);
    for i in period + 1..len {
        s_plus = s_plus - s_plus / n + plus_dm[i];
        s_minus = s_minus - s_minus / n + minus_dm[i];
        s_tr = s_tr - s_tr / n + tr[i];
        dx[i] = dx_value(s_plus, s_minus, s_tr);
    }

    let mut current: f64 = dx[period..2 * period].iter().sum::<f64>() / n;
    out[2 * period - 1] = Some(current);
    for i in 2 * period..len {
        current = (current * (n - 1.0) + dx[i]) / n;
        out[i] = Some(current);
    }
    out
}

fn dx_value(s_plus: f64, s_minus: f64, s_tr: f64) -> f64 {
    if s_tr <= 0.0 {
        return 0.0;
    }
    let di_plus = 100.0 * s_plus / s_tr;
    let di_minus = 100.0 * s_minus / s_tr;
    let di_sum = di_plus + di_minus;
    if di_sum > 0.0 {
        100.0 * (di_plus - di_minus).abs() / di_sum
    } else {
        0.0
    }
}
