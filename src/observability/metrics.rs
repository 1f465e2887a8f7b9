//! Metrics collection.
//!
//! # Metrics
//! - `reader_decode_total` (counter): decode calls by outcome
//! - `reader_no_reader_total` (counter): typed decodes with no matching decoder
//! - `reader_extract_total` (counter): typed extractions by outcome
//!
//! # Design Decisions
//! - Uses the `metrics` facade; the host application installs the recorder
//! - Without a recorder every call is a no-op

use metrics::counter;

/// Record a finished `decode` call.
/// Outcomes: `no_entity`, `empty_body`, `decoded`, `error`.
pub fn record_decode(outcome: &'static str) {
    counter!("reader_decode_total", "outcome" => outcome).increment(1);
}

pub fn record_no_reader() {
    counter!("reader_no_reader_total").increment(1);
}

/// Record a finished `extract_entity` call.
/// Outcomes: `absent`, `decoded`, `error`.
pub fn record_extract(outcome: &'static str) {
    counter!("reader_extract_total", "outcome" => outcome).increment(1);
}
