use crate::types::{Market, OutcomePriceSet, Verdict};

/// Guaranteed payout of a fully covered market. Buying every outcome for less is an arbitrage.
pub const ARBITRAGE_THRESHOLD: f64 = 1.0;

/// Apply the full-coverage rule to one market's prices.
///
/// Returns `None` for an empty set so "no data" is never mistaken for a zero-cost market.
/// The comparison is strict: a total of exactly 1.0 is not an opportunity.
pub fn evaluate(market: &Market, prices: &OutcomePriceSet) -> Option<Verdict> {
    if prices.is_empty() {
        return None;
    }

    let total_cost = prices.total();
    Some(Verdict {
        market_id: market.id.clone(),
        title: market.title.clone(),
        total_cost,
        is_arbitrage: total_cost < ARBITRAGE_THRESHOLD,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn make_market(id: &str) -> Market {
        Market::from_record(json!({ "id": id, "question": "Will it rain?" }), &["id"], &["question"])
    }

    #[test]
    fn empty_set_is_skipped() {
        assert!(evaluate(&make_market("m1"), &OutcomePriceSet::empty()).is_none());
    }

    #[test]
    fn under_one_is_arbitrage() {
        let set = OutcomePriceSet::from_pairs([("Yes", 0.4), ("No", 0.55)]);
        let v = evaluate(&make_market("m1"), &set).unwrap();
        assert!(v.is_arbitrage);
        assert!(approx_eq(v.total_cost, 0.95));
        assert_eq!(v.market_id, "m1");
        assert_eq!(v.title.as_deref(), Some("Will it rain?"));
    }

    #[test]
    fn over_one_is_not_arbitrage() {
        let set = OutcomePriceSet::from_pairs([("yes", 0.45), ("no", 0.60)]);
        let v = evaluate(&make_market("m2"), &set).unwrap();
        assert!(!v.is_arbitrage);
        assert!(approx_eq(v.total_cost, 1.05));
    }

    #[test]
    fn exactly_one_is_not_arbitrage() {
        let set = OutcomePriceSet::from_pairs([("yes", 0.5), ("no", 0.5)]);
        let v = evaluate(&make_market("m3"), &set).unwrap();
        assert_eq!(v.total_cost, 1.0);
        assert!(!v.is_arbitrage);
    }

    #[test]
    fn multi_outcome_sum() {
        let set = OutcomePriceSet::from_pairs([("A", 0.2), ("B", 0.3), ("C", 0.25), ("D", 0.2)]);
        let v = evaluate(&make_market("m4"), &set).unwrap();
        assert!(v.is_arbitrage);
        assert!(approx_eq(v.edge(), 0.05));
    }

    #[test]
    fn single_outcome_set_is_evaluated() {
        let set = OutcomePriceSet::from_pairs([("Yes", 1.0)]);
        let v = evaluate(&make_market("m5"), &set).unwrap();
        assert!(!v.is_arbitrage);
    }

    #[test]
    fn deterministic() {
        let set = OutcomePriceSet::from_pairs([("Yes", 0.33), ("No", 0.66)]);
        let m = make_market("m6");
        assert_eq!(evaluate(&m, &set), evaluate(&m, &set));
    }
}
