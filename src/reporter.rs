//! Machine-readable scan output. Stdout carries only these JSON documents;
//! progress logs go to stderr through `tracing`, so output can be piped to `jq`.

use crate::types::{OpportunityEvent, ScanSummary};

/// Emit an arbitrage opportunity as a single JSON line to stdout.
pub fn report_opportunity(event: &OpportunityEvent) {
    if let Ok(json) = serde_json::to_string(event) {
        println!("{json}");
    }
}

/// Emit the scan summary as pretty-printed JSON to stdout.
pub fn report_summary(summary: &ScanSummary) {
    if let Ok(json) = serde_json::to_string_pretty(summary) {
        println!("{json}");
    }
}
