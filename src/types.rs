use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// A market listed by a venue, carrying the raw record it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Market {
    /// Venue identifier (Kalshi ticker, Gamma market id). Empty if the record had none.
    pub id: String,
    pub title: Option<String>,
    pub active: bool,
    pub closed: bool,
    pub raw: Value,
}

impl Market {
    /// Build a market from a venue record.
    ///
    /// `id_keys` and `title_keys` are tried in order; the first present value wins.
    /// Without explicit `active`/`closed` flags, only an `active` or `open` status
    /// (or no status at all) counts as open.
    pub fn from_record(raw: Value, id_keys: &[&str], title_keys: &[&str]) -> Self {
        let id = id_keys
            .iter()
            .find_map(|k| raw.get(*k).and_then(scalar_to_string))
            .unwrap_or_default();
        let title = title_keys
            .iter()
            .find_map(|k| raw.get(*k).and_then(|v| v.as_str()))
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let status = raw.get("status").and_then(|v| v.as_str());

        let active = match raw.get("active").and_then(|v| v.as_bool()) {
            Some(flag) => flag,
            None => matches!(status, None | Some("active" | "open")),
        };
        let closed = match raw.get("closed").and_then(|v| v.as_bool()) {
            Some(flag) => flag,
            None => matches!(
                status,
                Some("closed" | "settled" | "finalized" | "determined" | "disputed" | "amended")
            ),
        };

        Self {
            id,
            title,
            active,
            closed,
            raw,
        }
    }

    /// Active and not closed.
    pub fn is_open(&self) -> bool {
        self.active && !self.closed
    }

    /// Identifier for log lines; never empty.
    pub fn label(&self) -> &str {
        if self.id.is_empty() {
            "<no id>"
        } else {
            &self.id
        }
    }
}

fn scalar_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// One outcome of a market and its current price (0-1).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomePrice {
    pub label: String,
    pub price: f64,
}

/// Ordered outcome prices for one market at one observation instant.
#[derive(Debug, Clone)]
pub struct OutcomePriceSet {
    pub outcomes: Vec<OutcomePrice>,
    pub observed_at: DateTime<Utc>,
}

impl OutcomePriceSet {
    pub fn new(outcomes: Vec<OutcomePrice>) -> Self {
        Self {
            outcomes,
            observed_at: Utc::now(),
        }
    }

    /// The "no data" set.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn from_pairs<L: Into<String>>(pairs: impl IntoIterator<Item = (L, f64)>) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(label, price)| OutcomePrice {
                    label: label.into(),
                    price,
                })
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Cost of buying one unit of every outcome.
    pub fn total(&self) -> f64 {
        self.outcomes.iter().map(|o| o.price).sum()
    }
}

/// Per-market arbitrage decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub market_id: String,
    pub title: Option<String>,
    pub total_cost: f64,
    pub is_arbitrage: bool,
}

impl Verdict {
    /// Guaranteed profit per unit of full coverage (negative when overpriced).
    pub fn edge(&self) -> f64 {
        1.0 - self.total_cost
    }
}

/// Emitted once per arbitrage opportunity.
#[derive(Debug, Clone, Serialize)]
pub struct OpportunityEvent {
    pub timestamp: String,
    pub venue: String,
    pub market_id: String,
    pub title: Option<String>,
    pub outcomes: Vec<OutcomePrice>,
    pub total_cost: f64,
    pub edge: f64,
}

/// Counts accumulated over one scan run.
#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary {
    pub venue: String,
    pub scanned: u64,
    pub processed: u64,
    pub skipped: u64,
    pub opportunities: u64,
    /// Skipped markets broken down by `SkipReason::kind()`.
    pub skip_reasons: BTreeMap<String, u64>,
    pub started_at: String,
    pub finished_at: Option<String>,
}

impl ScanSummary {
    pub fn new(venue: &str) -> Self {
        Self {
            venue: venue.to_string(),
            scanned: 0,
            processed: 0,
            skipped: 0,
            opportunities: 0,
            skip_reasons: BTreeMap::new(),
            started_at: Utc::now().to_rfc3339(),
            finished_at: None,
        }
    }

    pub fn record_processed(&mut self, verdict: &Verdict) {
        self.scanned += 1;
        self.processed += 1;
        if verdict.is_arbitrage {
            self.opportunities += 1;
        }
    }

    pub fn record_skipped(&mut self, kind: &str) {
        self.scanned += 1;
        self.skipped += 1;
        *self.skip_reasons.entry(kind.to_string()).or_insert(0) += 1;
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now().to_rfc3339());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn market_from_kalshi_record() {
        let m = Market::from_record(
            json!({"ticker": "KXHIGHNY-25", "title": "High temp in NYC?", "status": "active"}),
            &["ticker"],
            &["title"],
        );
        assert_eq!(m.id, "KXHIGHNY-25");
        assert_eq!(m.title.as_deref(), Some("High temp in NYC?"));
        assert!(m.is_open());
    }

    #[test]
    fn market_id_falls_back_and_accepts_numbers() {
        let m = Market::from_record(
            json!({"conditionId": "0xabc", "question": ""}),
            &["id", "conditionId"],
            &["question"],
        );
        assert_eq!(m.id, "0xabc");
        assert!(m.title.is_none());

        let m = Market::from_record(json!({"id": 512}), &["id"], &[]);
        assert_eq!(m.id, "512");
    }

    #[test]
    fn market_status_flags() {
        let closed = Market::from_record(json!({"id": "a", "closed": true}), &["id"], &[]);
        assert!(!closed.is_open());

        let settled = Market::from_record(json!({"ticker": "b", "status": "settled"}), &["ticker"], &[]);
        assert!(!settled.active);
        assert!(settled.closed);

        let explicit = Market::from_record(
            json!({"id": "c", "active": false, "closed": false}),
            &["id"],
            &[],
        );
        assert!(!explicit.is_open());

        for status in ["initialized", "unopened", "inactive"] {
            let m = Market::from_record(json!({"ticker": "x", "status": status}), &["ticker"], &[]);
            assert!(!m.active, "{status} should not be active");
            assert!(!m.is_open(), "{status} should not be open");
        }
        for status in ["determined", "disputed", "amended", "finalized", "closed"] {
            let m = Market::from_record(json!({"ticker": "x", "status": status}), &["ticker"], &[]);
            assert!(m.closed, "{status} should be closed");
            assert!(!m.is_open(), "{status} should not be open");
        }
        for status in ["active", "open"] {
            let m = Market::from_record(json!({"ticker": "x", "status": status}), &["ticker"], &[]);
            assert!(m.is_open(), "{status} should be open");
        }
        let bare = Market::from_record(json!({"ticker": "x"}), &["ticker"], &[]);
        assert!(bare.is_open());
    }

    #[test]
    fn market_without_id_has_placeholder_label() {
        let m = Market::from_record(json!({"title": "x"}), &["ticker"], &["title"]);
        assert!(m.id.is_empty());
        assert_eq!(m.label(), "<no id>");
    }

    #[test]
    fn price_set_total() {
        let set = OutcomePriceSet::from_pairs([("Yes", 0.4), ("No", 0.55)]);
        assert_eq!(set.outcomes.len(), 2);
        assert!((set.total() - 0.95).abs() < 1e-9);
        assert!(OutcomePriceSet::empty().is_empty());
    }

    #[test]
    fn summary_counts() {
        let mut s = ScanSummary::new("test");
        let arb = Verdict {
            market_id: "a".into(),
            title: None,
            total_cost: 0.9,
            is_arbitrage: true,
        };
        let fair = Verdict {
            total_cost: 1.02,
            is_arbitrage: false,
            ..arb.clone()
        };
        s.record_processed(&arb);
        s.record_processed(&fair);
        s.record_skipped("no_data");
        s.record_skipped("no_data");
        s.record_skipped("non_numeric");

        assert_eq!(s.scanned, 5);
        assert_eq!(s.processed, 2);
        assert_eq!(s.skipped, 3);
        assert_eq!(s.opportunities, 1);
        assert_eq!(s.skip_reasons.get("no_data"), Some(&2));
        assert_eq!(s.skip_reasons.values().sum::<u64>(), s.skipped);
        assert!((arb.edge() - 0.1).abs() < 1e-9);
    }
}
