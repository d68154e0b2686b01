//! Confluence signal engine.
//!
//! `analyze` is a pure function of one [`MetricsSnapshot`]: an additive score
//! built from trend, regime, momentum, MACD, support/resistance and volume
//! rules, normalized into a 0-100 probability. Rule order is significant:
//! later rules read the running score's sign, and the factor list is emitted
//! in evaluation order. Do not reorder.

use std::fmt;

use super::snapshot::{MetricsSnapshot, TrendDirection, TrendStrength};

/// Probability at or above which a BUY is emitted.
pub const BUY_THRESHOLD: i32 = 75;
/// Probability at or below which a SELL is emitted.
pub const SELL_THRESHOLD: i32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Hold => write!(f, "HOLD"),
        }
    }
}

/// Directional decision with calibrated confidence and the contributing
/// factors, in scoring order.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub signal: Signal,
    pub reason: String,
    pub probability: i32,
    pub confidence: i32,
    pub factors: Vec<String>,
}

/// Entry, stop-loss and take-profit levels for one trade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeSetup {
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
}

impl TradeSetup {
    pub fn none() -> Self {
        TradeSetup {
            entry: 0.0,
            stop_loss: 0.0,
            take_profit: 0.0,
        }
    }
}

pub fn analyze(m: &MetricsSnapshot) -> Decision {
    let mut score: i32 = 0;
    let mut factors: Vec<String> = Vec::new();

    // 1. Trend direction, confirmed by price vs the fast EMA.
    match m.trend_direction {
        TrendDirection::Bullish => {
            score += 15;
            factors.push("Bullish Trend (EMA50 > EMA200)".to_string());
            if let Some(ema_50) = m.ema_50 {
                if m.close > ema_50 {
                    score += 10;
                    factors.push("Price above EMA50 (Strong Momentum)".to_string());
                }
            }
        }
        TrendDirection::Bearish => {
            score -= 15;
            factors.push("Bearish Trend (EMA50 < EMA200)".to_string());
            if let Some(ema_50) = m.ema_50 {
                if m.close < ema_50 {
                    score -= 10;
                    factors.push("Price below EMA50 (Strong Momentum)".to_string());
                }
            }
        }
        TrendDirection::Sideways => {}
    }

    // Market regime from the slow EMA. Neither flag is set while EMA200 is
    // still warming up, which also disables the RSI rules below.
    let is_bull_regime = m.ema_200.is_some_and(|ema| m.close > ema);
    let is_bear_regime = m.ema_200.is_some_and(|ema| m.close <= ema);

    if m.trend_strength == TrendStrength::Weak {
        // Choppy, low-ADX market: cash is a position. The score is forced
        // neutral here; MACD/volume/S-R rules still run afterwards.
        factors.push("Strategy: HOLD (Sideways/Weak Trend)".to_string());
        score = 0;
        factors.push("Action: Waiting for clearer trend (ADX > 25)".to_string());
    } else {
        factors.push(format!(
            "Strategy: Trend Following ({} Trend)",
            m.trend_strength
        ));

        // Only trade in the direction of the major trend: boost aligned
        // scores, kill counter-trend ones.
        if is_bull_regime {
            if score > 0 {
                score += 15;
            } else if score < 0 {
                score = 0;
            }
            factors.push("Bullish Regime (Price > EMA200)".to_string());
        } else if is_bear_regime {
            if score < 0 {
                score -= 15;
            } else if score > 0 {
                score = 0;
            }
            factors.push("Bearish Regime (Price < EMA200)".to_string());
        }

        if m.trend_strength.is_strong() {
            if score > 0 {
                score += 10;
            } else if score < 0 {
                score -= 10;
            }
            factors.push(format!("{} Trend Bonus", m.trend_strength));
        }

        // 2. RSI, regime-dependent thresholds.
        let rsi = m.rsi;
        if is_bull_regime {
            if rsi < 40.0 {
                score += 20;
                factors.push(format!("RSI Dip in Bull Trend ({:.2})", rsi));
            } else if rsi > 70.0 {
                if m.trend_strength == TrendStrength::VeryStrong {
                    score += 5;
                    factors.push("RSI Overbought (Ignored - Super Trend)".to_string());
                } else {
                    score -= 10;
                    factors.push(format!("RSI Overbought ({:.2})", rsi));
                }
            } else if rsi > 50.0 {
                score += 10;
            }
        } else if is_bear_regime {
            if rsi > 60.0 {
                score -= 20;
                factors.push(format!("RSI Spike in Bear Trend ({:.2})", rsi));
            } else if rsi < 30.0 {
                if m.trend_strength == TrendStrength::VeryStrong {
                    score -= 5;
                    factors.push("RSI Oversold (Ignored - Super Trend)".to_string());
                } else {
                    score += 10;
                    factors.push(format!("RSI Oversold ({:.2})", rsi));
                }
            } else if rsi < 50.0 {
                score -= 10;
            }
        }
    }

    // 3. MACD histogram sign. Applies even after the weak-trend reset.
    if m.macd_hist > 0.0 {
        score += 10;
        factors.push("MACD Histogram Positive".to_string());
    } else {
        score -= 10;
        factors.push("MACD Histogram Negative".to_string());
    }

    // 4. Proximity to dynamic support/resistance (1% band, both may fire).
    if let Some(support) = m.support {
        if m.close <= support * 1.01 {
            score += 15;
            factors.push("Price near Support Level".to_string());
        }
    }
    if let Some(resistance) = m.resistance {
        if m.close >= resistance * 0.99 {
            score -= 15;
            factors.push("Price near Resistance Level".to_string());
        }
    }

    // 5. Volume confirmation in the direction of the current score.
    if let Some(vol_sma) = m.vol_sma {
        if vol_sma > 0.0 && m.volume > 0.0 {
            let vol_ratio = m.volume / vol_sma;
            if vol_ratio > 2.0 {
                if score > 0 {
                    score += 20;
                    factors.push(format!("Extreme Volume Spike ({:.1}x) - Bullish", vol_ratio));
                } else if score < 0 {
                    score -= 20;
                    factors.push(format!("Extreme Volume Spike ({:.1}x) - Bearish", vol_ratio));
                }
            } else if vol_ratio > 1.2 {
                if score > 0 {
                    score += 10;
                    factors.push(format!("High Volume ({:.1}x) - Bullish", vol_ratio));
                } else if score < 0 {
                    score -= 10;
                    factors.push(format!("High Volume ({:.1}x) - Bearish", vol_ratio));
                }
            } else if vol_ratio < 0.6 {
                if score > 0 {
                    score -= 5;
                    factors.push("Low Volume (Weakens Bullish Signal)".to_string());
                } else if score < 0 {
                    score += 5;
                    factors.push("Low Volume (Weakens Bearish Signal)".to_string());
                }
            }
        }
    }

    // Neutral base is 50; clamp into [0, 100].
    let probability = (50 + score).clamp(0, 100);

    let (signal, reason) = if probability >= BUY_THRESHOLD {
        (Signal::Buy, "Strong Bullish Confluence")
    } else if probability <= SELL_THRESHOLD {
        (Signal::Sell, "Strong Bearish Confluence")
    } else {
        (Signal::Hold, "Market Indecisive")
    };

    let confidence = (probability - 50).abs() * 2;

    Decision {
        signal,
        reason: reason.to_string(),
        probability,
        confidence,
        factors,
    }
}

/// Stop-loss/take-profit distances as ATR multiples, widened with trend
/// strength so winners get room to run.
pub fn entry_levels(
    signal: Signal,
    price: f64,
    atr: f64,
    trend_strength: TrendStrength,
) -> TradeSetup {
    let (sl_mult, tp_mult) = match trend_strength {
        TrendStrength::Strong | TrendStrength::VeryStrong => (2.0, 4.0),
        TrendStrength::Weak => (1.5, 2.0),
        TrendStrength::Medium => (1.8, 3.0),
    };

    match signal {
        Signal::Buy => TradeSetup {
            entry: price,
            stop_loss: price - sl_mult * atr,
            take_profit: price + tp_mult * atr,
        },
        Signal::Sell => TradeSetup {
            entry: price,
            stop_loss: price + sl_mult * atr,
            take_profit: price - tp_mult * atr,
        },
        Signal::Hold => TradeSetup::none(),
    }
}
