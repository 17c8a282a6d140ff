//! Conversion of raw venue payloads into `OutcomePriceSet`s.
//!
//! Every malformed shape the venues are known to produce maps to a `SkipReason`
//! so the scanner can count and log it without aborting the run.

use serde_json::Value;
use thiserror::Error;

use crate::types::{OutcomePrice, OutcomePriceSet};

/// Why a market was left out of evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkipReason {
    #[error("no price data")]
    NoData,
    #[error("empty outcomes or prices")]
    Empty,
    #[error("outcome/price length mismatch ({outcomes} outcomes, {prices} prices)")]
    LengthMismatch { outcomes: usize, prices: usize },
    #[error("could not decode `{field}`: {detail}")]
    Undecodable { field: &'static str, detail: String },
    #[error("non-numeric price {value} at index {index}")]
    NonNumeric { index: usize, value: String },
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("price lookup failed: {0}")]
    Fetch(String),
}

impl SkipReason {
    /// Stable key used in the summary's skip breakdown.
    pub fn kind(&self) -> &'static str {
        match self {
            SkipReason::NoData => "no_data",
            SkipReason::Empty => "empty",
            SkipReason::LengthMismatch { .. } => "length_mismatch",
            SkipReason::Undecodable { .. } => "undecodable",
            SkipReason::NonNumeric { .. } => "non_numeric",
            SkipReason::MissingField(_) => "missing_field",
            SkipReason::Fetch(_) => "fetch",
        }
    }

    /// True for the expected "nothing to price yet" case, as opposed to bad data.
    pub fn is_no_data(&self) -> bool {
        matches!(self, SkipReason::NoData)
    }
}

/// Decode a collection that may arrive as a JSON list or as a string holding one.
///
/// A missing or null field decodes to an empty list.
pub fn decode_list(field: &'static str, value: Option<&Value>) -> Result<Vec<Value>, SkipReason> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(Value::String(s)) => {
            serde_json::from_str::<Vec<Value>>(s).map_err(|e| SkipReason::Undecodable {
                field,
                detail: e.to_string(),
            })
        }
        Some(other) => Err(SkipReason::Undecodable {
            field,
            detail: format!("expected list, got {other}"),
        }),
    }
}

/// Coerce a price entry to a finite float. Numeric strings are accepted.
pub fn coerce_price(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    price.is_finite().then_some(price)
}

fn outcome_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Normalize an embedded outcome/price vector pair.
pub fn normalize_vector(
    outcomes: Option<&Value>,
    prices: Option<&Value>,
) -> Result<OutcomePriceSet, SkipReason> {
    let outcomes = decode_list("outcomes", outcomes)?;
    let prices = decode_list("outcomePrices", prices)?;

    if outcomes.is_empty() || prices.is_empty() {
        return Err(SkipReason::Empty);
    }
    if outcomes.len() != prices.len() {
        return Err(SkipReason::LengthMismatch {
            outcomes: outcomes.len(),
            prices: prices.len(),
        });
    }

    let pairs = outcomes
        .iter()
        .zip(&prices)
        .enumerate()
        .map(|(index, (label, raw))| {
            coerce_price(raw)
                .map(|price| OutcomePrice {
                    label: outcome_label(label),
                    price,
                })
                .ok_or_else(|| SkipReason::NonNumeric {
                    index,
                    value: raw.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(OutcomePriceSet::new(pairs))
}

/// Pick the most recent trade from a trade-history response.
///
/// Looks at `items`, then `data`, then `trades`; an absent or empty collection
/// falls through to the next key.
pub fn latest_trade(response: &Value) -> Option<&Value> {
    ["items", "data", "trades"]
        .iter()
        .filter_map(|key| response.get(*key).and_then(|v| v.as_array()))
        .find(|items| !items.is_empty())
        .and_then(|items| items.first())
}

/// Normalize a single trade quoted in cents into a yes/no set.
///
/// `None` means the market has not traded and yields the empty set.
pub fn normalize_trade(trade: Option<&Value>) -> Result<OutcomePriceSet, SkipReason> {
    let Some(trade) = trade else {
        return Ok(OutcomePriceSet::empty());
    };

    let yes = cents_field(trade, "yes_price", 0)?;
    let no = cents_field(trade, "no_price", 1)?;
    Ok(OutcomePriceSet::from_pairs([("yes", yes), ("no", no)]))
}

fn cents_field(trade: &Value, field: &'static str, index: usize) -> Result<f64, SkipReason> {
    let raw = trade.get(field).ok_or(SkipReason::MissingField(field))?;
    let cents = coerce_price(raw).ok_or_else(|| SkipReason::NonNumeric {
        index,
        value: raw.to_string(),
    })?;
    Ok(cents / 100.0)
}
