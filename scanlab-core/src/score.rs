//! Gating, scoring, and Buy/Sell/Hold classification.
//!
//! A pure function from (latest indicator row, live quote) to a
//! [`ScoreRecord`]. All thresholds live in [`ScoreConfig`]; every comparison
//! with an undefined operand evaluates to false — a ticker with thin history
//! or a missing quote degrades gracefully instead of erroring.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::QuoteRecord;
use crate::indicators::IndicatorRecord;

/// Thresholds for gates, score rules, and classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    /// Market-cap ceiling for the microcap gate.
    pub micro_cap_max: f64,
    /// Minimum 20-day average volume for the liquidity gate.
    pub liquidity_floor: f64,
    /// Minimum close for the price gate (sub-20-cent names are excluded).
    pub price_floor: f64,
    /// 5-day return threshold for the momentum rule.
    pub momentum_min: f64,
    /// RSI band lower bound (shared by both RSI rules).
    pub rsi_lower: f64,
    /// RSI band upper bound for the "not extreme" rule.
    pub rsi_upper: f64,
    /// RSI band upper bound for the extra-headroom rule. The band nests
    /// inside the wider one on purpose: mid-band RSI earns two points.
    pub rsi_headroom_upper: f64,
    /// Snapshot volume must exceed this multiple of avgvol20 to count as a surge.
    pub volume_surge: f64,
    /// Drawdown from the 10-day high at or below this triggers a sell.
    pub drawdown_sell: f64,
    /// RSI above this triggers a sell.
    pub rsi_overbought: f64,
    /// Minimum score for a buy.
    pub min_buy_score: u8,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            micro_cap_max: 300_000_000.0,
            liquidity_floor: 10_000.0,
            price_floor: 0.20,
            momentum_min: 0.02,
            rsi_lower: 30.0,
            rsi_upper: 70.0,
            rsi_headroom_upper: 60.0,
            volume_surge: 1.5,
            drawdown_sell: -0.10,
            rsi_overbought: 75.0,
            min_buy_score: 3,
        }
    }
}

/// Classification outcome, computed in one step: sell conditions are
/// evaluated first and a sell can never be overridden by buy conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::Buy => write!(f, "buy"),
            Signal::Sell => write!(f, "sell"),
            Signal::Hold => write!(f, "hold"),
        }
    }
}

/// The full audit row for one ticker: latest indicators, quote fields,
/// gates, score, and the classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub ticker: String,
    /// Date of the latest bar the indicators were computed on.
    pub date: NaiveDate,
    pub close: f64,
    pub ret_5d: Option<f64>,
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
    pub avgvol20: Option<f64>,
    pub rsi14: Option<f64>,
    pub rolling_max_10: Option<f64>,
    pub drawdown_10: Option<f64>,
    /// Live quote fields; all `None` when the ticker was absent from the snapshot.
    pub price: Option<f64>,
    pub volume: Option<f64>,
    pub market_cap: Option<f64>,
    pub is_microcap: bool,
    pub valid_liquidity: bool,
    pub price_gate: bool,
    pub score: u8,
    pub signal: Signal,
}

impl ScoreRecord {
    pub fn is_buy(&self) -> bool {
        self.signal == Signal::Buy
    }

    pub fn is_sell(&self) -> bool {
        self.signal == Signal::Sell
    }
}

/// Score one ticker from its latest indicator row and (optional) quote.
///
/// Pure: same inputs, same output, no I/O, no state.
pub fn score_ticker(
    ticker: &str,
    latest: &IndicatorRecord,
    quote: Option<&QuoteRecord>,
    cfg: &ScoreConfig,
) -> ScoreRecord {
    let price = quote.and_then(|q| q.price);
    let quote_volume = quote.and_then(|q| q.volume);
    let market_cap = quote.and_then(|q| q.market_cap);

    let is_microcap = lt(market_cap, cfg.micro_cap_max);
    let valid_liquidity = gt(latest.avgvol20, cfg.liquidity_floor);
    let price_gate = latest.close > cfg.price_floor;

    let mut score = 0u8;
    // 1. short-term trend above long-term trend
    score += u8::from(gt_pair(latest.sma20, latest.sma50));
    // 2. positive 5-day momentum
    score += u8::from(gt(latest.ret_5d, cfg.momentum_min));
    // 3. RSI not extreme
    score += u8::from(in_band(latest.rsi14, cfg.rsi_lower, cfg.rsi_upper));
    // 4. live volume surge vs trailing average
    score += u8::from(gt_pair(
        quote_volume,
        latest.avgvol20.map(|v| v * cfg.volume_surge),
    ));
    // 5. extra headroom point — overlaps rule 3 by design
    score += u8::from(in_band(latest.rsi14, cfg.rsi_lower, cfg.rsi_headroom_upper));

    let sell = le(latest.drawdown_10, cfg.drawdown_sell)
        || score == 0
        || gt(latest.rsi14, cfg.rsi_overbought);
    let signal = if sell {
        Signal::Sell
    } else if score >= cfg.min_buy_score && is_microcap && valid_liquidity && price_gate {
        Signal::Buy
    } else {
        Signal::Hold
    };

    ScoreRecord {
        ticker: ticker.to_string(),
        date: latest.date,
        close: latest.close,
        ret_5d: latest.ret_5d,
        sma20: latest.sma20,
        sma50: latest.sma50,
        avgvol20: latest.avgvol20,
        rsi14: latest.rsi14,
        rolling_max_10: latest.rolling_max_10,
        drawdown_10: latest.drawdown_10,
        price,
        volume: quote_volume,
        market_cap,
        is_microcap,
        valid_liquidity,
        price_gate,
        score,
        signal,
    }
}

// Null-safe comparisons: an undefined operand makes the comparison false.

fn gt(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v > threshold)
}

fn lt(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v < threshold)
}

fn le(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v <= threshold)
}

fn gt_pair(a: Option<f64>, b: Option<f64>) -> bool {
    a.zip(b).is_some_and(|(x, y)| x > y)
}

fn in_band(value: Option<f64>, lower: f64, upper: f64) -> bool {
    value.is_some_and(|v| v > lower && v < upper)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defined_record() -> IndicatorRecord {
        IndicatorRecord {
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            close: 4.50,
            volume: 180_000,
            ret_5d: Some(0.05),
            sma20: Some(4.20),
            sma50: Some(3.90),
            avgvol20: Some(120_000.0),
            rsi14: Some(55.0),
            rolling_max_10: Some(4.60),
            drawdown_10: Some(4.50 / 4.60 - 1.0),
        }
    }

    fn microcap_quote() -> QuoteRecord {
        QuoteRecord {
            ticker: "ABEO".into(),
            price: Some(4.52),
            volume: Some(300_000.0),
            market_cap: Some(150_000_000.0),
            previous_close: Some(4.40),
        }
    }

    #[test]
    fn full_buy_setup_scores_five() {
        let rec = score_ticker("ABEO", &defined_record(), Some(&microcap_quote()), &ScoreConfig::default());
        // trend + momentum + rsi band + surge + headroom
        assert_eq!(rec.score, 5);
        assert!(rec.is_microcap && rec.valid_liquidity && rec.price_gate);
        assert_eq!(rec.signal, Signal::Buy);
    }

    #[test]
    fn rsi_bands_overlap_for_two_points() {
        let mut latest = defined_record();
        // 65 is inside (30, 70) but outside (30, 60): exactly one RSI point
        latest.rsi14 = Some(65.0);
        let rec = score_ticker("ABEO", &latest, Some(&microcap_quote()), &ScoreConfig::default());
        assert_eq!(rec.score, 4);

        // 55 is inside both bands: two RSI points
        latest.rsi14 = Some(55.0);
        let rec = score_ticker("ABEO", &latest, Some(&microcap_quote()), &ScoreConfig::default());
        assert_eq!(rec.score, 5);
    }

    #[test]
    fn large_cap_never_buys() {
        let mut quote = microcap_quote();
        quote.market_cap = Some(5_000_000_000.0);
        let rec = score_ticker("BBB", &defined_record(), Some(&quote), &ScoreConfig::default());
        assert_eq!(rec.score, 5);
        assert!(!rec.is_microcap);
        assert_eq!(rec.signal, Signal::Hold);
    }

    #[test]
    fn deep_drawdown_sells_unconditionally() {
        let mut latest = defined_record();
        latest.drawdown_10 = Some(-0.12);
        let rec = score_ticker("CCC", &latest, Some(&microcap_quote()), &ScoreConfig::default());
        assert_eq!(rec.score, 5);
        assert_eq!(rec.signal, Signal::Sell);
        assert!(!rec.is_buy());
    }

    #[test]
    fn drawdown_exactly_at_threshold_sells() {
        let mut latest = defined_record();
        latest.drawdown_10 = Some(-0.10);
        let rec = score_ticker("CCC", &latest, Some(&microcap_quote()), &ScoreConfig::default());
        assert_eq!(rec.signal, Signal::Sell);
    }

    #[test]
    fn overbought_rsi_sells() {
        let mut latest = defined_record();
        latest.rsi14 = Some(80.0);
        let rec = score_ticker("HOT", &latest, Some(&microcap_quote()), &ScoreConfig::default());
        assert_eq!(rec.signal, Signal::Sell);
    }

    #[test]
    fn zero_score_sells() {
        let latest = IndicatorRecord {
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            close: 1.0,
            volume: 500,
            ret_5d: Some(-0.05),
            sma20: Some(1.1),
            sma50: Some(1.2),
            avgvol20: Some(400.0),
            rsi14: Some(20.0),
            rolling_max_10: Some(1.05),
            drawdown_10: Some(-0.047),
        };
        // quiet tape: no surge
        let quote = QuoteRecord {
            ticker: "DUD".into(),
            price: Some(1.0),
            volume: Some(350.0),
            market_cap: Some(40_000_000.0),
            previous_close: Some(1.02),
        };
        let rec = score_ticker("DUD", &latest, Some(&quote), &ScoreConfig::default());
        assert_eq!(rec.score, 0);
        assert_eq!(rec.signal, Signal::Sell);
    }

    #[test]
    fn missing_quote_fails_gates_and_surge() {
        let rec = score_ticker("GHST", &defined_record(), None, &ScoreConfig::default());
        assert!(!rec.is_microcap);
        assert!(rec.market_cap.is_none());
        // surge rule lost its operand: one point less than the full setup
        assert_eq!(rec.score, 4);
        assert_ne!(rec.signal, Signal::Buy);
    }

    #[test]
    fn undefined_indicators_score_zero_and_sell() {
        let latest = IndicatorRecord {
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            close: 2.0,
            volume: 1_000,
            ret_5d: None,
            sma20: None,
            sma50: None,
            avgvol20: None,
            rsi14: None,
            rolling_max_10: None,
            drawdown_10: None,
        };
        let rec = score_ticker("NEW", &latest, Some(&microcap_quote()), &ScoreConfig::default());
        assert_eq!(rec.score, 0);
        assert!(!rec.valid_liquidity);
        // score == 0 is a sell condition in its own right
        assert_eq!(rec.signal, Signal::Sell);
    }

    #[test]
    fn flags_are_mutually_exclusive() {
        let records = [
            score_ticker("A", &defined_record(), Some(&microcap_quote()), &ScoreConfig::default()),
            score_ticker("B", &defined_record(), None, &ScoreConfig::default()),
        ];
        for rec in &records {
            assert!(!(rec.is_buy() && rec.is_sell()));
        }
    }
}
