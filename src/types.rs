//! Core domain types for trade-log records.

use chrono::NaiveDate;
use std::fmt;

/// Literal prefix that marks a stock trade line in a TLG file.
pub const TRADE_MARKER: &str = "STK_TRD";

/// Output date layout (MM/DD/YYYY).
pub const OUTPUT_DATE_FORMAT: &str = "%m/%d/%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
    Unknown,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "Buy",
            Side::Sell => "Sell",
            Side::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One executed stock trade taken from a `STK_TRD` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeRecord {
    pub date: NaiveDate,
    pub time: String,   // verbatim, e.g. "09:30:00"
    pub symbol: String, // verbatim
    pub quantity: u64,  // |qty| truncated to whole units
    pub price: String,  // verbatim, never parsed
    pub side: Side,
}

impl TradeRecord {
    pub fn formatted_date(&self) -> String {
        self.date.format(OUTPUT_DATE_FORMAT).to_string()
    }
}

/// Counters for a single conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Every line pulled from the input.
    pub lines_read: usize,
    /// Rows written after the header.
    pub records_written: usize,
    /// Marker lines dropped because a field could not be decoded.
    pub lines_skipped: usize,
    /// Lines without the trade marker.
    pub lines_ignored: usize,
}
