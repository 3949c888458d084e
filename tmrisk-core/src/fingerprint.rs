//! Content hashes of tabular inputs.
//!
//! The same tickers, dates and bit-identical values always hash the same, so a
//! run manifest can tell whether two runs priced the same returns.

use crate::data::TickerFrame;

/// BLAKE3 hex digest over tickers, dates and the raw bits of every value.
pub fn frame_hash(frame: &TickerFrame) -> String {
    let mut hasher = blake3::Hasher::new();
    for ticker in frame.tickers() {
        hasher.update(ticker.as_bytes());
        hasher.update(&[0]);
    }
    for (date, row) in frame.dates().iter().zip(frame.rows()) {
        hasher.update(date.format("%Y-%m-%d").to_string().as_bytes());
        for v in row {
            hasher.update(&v.to_bits().to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}
