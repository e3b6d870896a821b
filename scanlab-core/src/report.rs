//! ReportModel — ranked Buy/Sell/Hold partitions.

use serde::{Deserialize, Serialize};

use crate::score::{ScoreRecord, Signal};

/// Three disjoint, ordered lists of scored tickers.
///
/// Ordering: Buys descending by score, Sells ascending (worst first),
/// Holds descending. Ties preserve input order (stable sorts), so the
/// assembly step's deterministic ticker order carries through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportModel {
    pub buys: Vec<ScoreRecord>,
    pub sells: Vec<ScoreRecord>,
    pub holds: Vec<ScoreRecord>,
}

impl ReportModel {
    /// Partition and rank scored records.
    pub fn build(records: &[ScoreRecord]) -> Self {
        let mut buys: Vec<ScoreRecord> = Vec::new();
        let mut sells: Vec<ScoreRecord> = Vec::new();
        let mut holds: Vec<ScoreRecord> = Vec::new();

        for rec in records {
            match rec.signal {
                Signal::Buy => buys.push(rec.clone()),
                Signal::Sell => sells.push(rec.clone()),
                Signal::Hold => holds.push(rec.clone()),
            }
        }

        buys.sort_by_key(|r| std::cmp::Reverse(r.score));
        sells.sort_by_key(|r| r.score);
        holds.sort_by_key(|r| std::cmp::Reverse(r.score));

        Self { buys, sells, holds }
    }

    /// Total tickers across all three partitions.
    pub fn len(&self) -> usize {
        self.buys.len() + self.sells.len() + self.holds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
