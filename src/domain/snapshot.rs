//! Per-bar metrics record consumed by the signal engine.
//!
//! The feed computes every field once at the boundary; downstream code reads
//! typed fields instead of string-keyed lookups.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Bullish,
    Bearish,
    Sideways,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Bullish => write!(f, "Bullish"),
            TrendDirection::Bearish => write!(f, "Bearish"),
            TrendDirection::Sideways => write!(f, "Sideways"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TrendStrength {
    Weak,
    Medium,
    Strong,
    VeryStrong,
}

impl TrendStrength {
    /// ADX buckets: >50 very strong, >25 strong, >20 medium, else weak.
    pub fn from_adx(adx: f64) -> Self {
        if adx > 50.0 {
            TrendStrength::VeryStrong
        } else if adx > 25.0 {
            TrendStrength::Strong
        } else if adx > 20.0 {
            TrendStrength::Medium
        } else {
            TrendStrength::Weak
        }
    }

    pub fn is_strong(&self) -> bool {
        matches!(self, TrendStrength::Strong | TrendStrength::VeryStrong)
    }
}

impl fmt::Display for TrendStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendStrength::Weak => write!(f, "Weak"),
            TrendStrength::Medium => write!(f, "Medium"),
            TrendStrength::Strong => write!(f, "Strong"),
            TrendStrength::VeryStrong => write!(f, "Very Strong"),
        }
    }
}

/// One bar's worth of price plus derived indicators.
///
/// Optional fields are unavailable during the indicator warm-up window; the
/// scoring rules that read them are skipped when absent.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub close: f64,
    pub volume: f64,
    pub vol_sma: Option<f64>,
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
    pub ema_50: Option<f64>,
    pub ema_200: Option<f64>,
    pub atr: f64,
    pub trend_direction: TrendDirection,
    pub trend_strength: TrendStrength,
    pub support: Option<f64>,
    pub resistance: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adx_buckets() {
        assert_eq!(TrendStrength::from_adx(10.0), TrendStrength::Weak);
        assert_eq!(TrendStrength::from_adx(20.0), TrendStrength::Weak);
        assert_eq!(TrendStrength::from_adx(21.0), TrendStrength::Medium);
        assert_eq!(TrendStrength::from_adx(25.0), TrendStrength::Medium);
        assert_eq!(TrendStrength::from_adx(30.0), TrendStrength::Strong);
        assert_eq!(TrendStrength::from_adx(50.0), TrendStrength::Strong);
        assert_eq!(TrendStrength::from_adx(60.0), TrendStrength::VeryStrong);
    }

    #[test]
    fn strong_predicate() {
        assert!(!TrendStrength::Weak.is_strong());
        assert!(!TrendStrength::Medium.is_strong());
        assert!(TrendStrength::Strong.is_strong());
        assert!(TrendStrength::VeryStrong.is_strong());
    }

    #[test]
    fn display_strings() {
        assert_eq!(TrendStrength::VeryStrong.to_string(), "Very Strong");
        assert_eq!(TrendDirection::Sideways.to_string(), "Sideways");
    }
}
