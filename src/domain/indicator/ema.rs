/// Exponential moving average, seeded with the SMA of the first `period`
/// values, smoothing factor 2 / (period + 1).
pub fn ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut current: f64 = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(current);
    for i in period..values.len() {
        current = (values[i] - current) * k + current;
        out[i] = Some(current);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_with_sma() {
        let values = [2.0, 4.0, 6.0, 8.0];
        let out = ema(&values, 3);
        assert_eq!(out[1], None);
        assert!((out[2].unwrap() - 4.0).abs() < f64::EPSILON);
        // k = 0.5: (8 - 4) * 0.5 + 4 = 6
        assert!((out[3].unwrap() - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn constant_series_stays_constant() {
        let out = ema(&[5.0; 10], 4);
        for value in out.iter().skip(3) {
            assert!((value.unwrap() - 5.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn short_input_is_all_none() {
        assert!(ema(&[1.0], 3).iter().all(Option::is_none));
    }
}
