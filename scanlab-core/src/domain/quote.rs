//! QuoteRecord — same-day snapshot quote for one ticker.

use serde::{Deserialize, Serialize};

/// Live quote snapshot as of report time, one per ticker.
///
/// Every numeric field is nullable: snapshot providers routinely return
/// partial rows, and a ticker may be missing from the snapshot entirely.
/// A `None` field fails every gate it participates in — it never errors
/// and never coerces to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub ticker: String,
    pub price: Option<f64>,
    pub volume: Option<f64>,
    pub market_cap: Option<f64>,
    pub previous_close: Option<f64>,
}

impl QuoteRecord {
    /// True if the snapshot carried at least one populated field.
    pub fn has_market_data(&self) -> bool {
        self.price.is_some()
            || self.volume.is_some()
            || self.market_cap.is_some()
            || self.previous_close.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_quote_has_no_market_data() {
        let q = QuoteRecord {
            ticker: "XXII".into(),
            ..Default::default()
        };
        assert!(!q.has_market_data());
    }

    #[test]
    fn partial_quote_has_market_data() {
        let q = QuoteRecord {
            ticker: "XXII".into(),
            market_cap: Some(120_000_000.0),
            ..Default::default()
        };
        assert!(q.has_market_data());
    }

    #[test]
    fn quote_serialization_roundtrip() {
        let q = QuoteRecord {
            ticker: "ABEO".into(),
            price: Some(4.31),
            volume: Some(180_500.0),
            market_cap: Some(215_000_000.0),
            previous_close: None,
        };
        let json = serde_json::to_string(&q).unwrap();
        let deser: QuoteRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(q, deser);
    }
}
