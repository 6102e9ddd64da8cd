//! Parse stock trades out of TLG trade-log lines.
//! Supported: the pipe-delimited `STK_TRD` record. Every other line is ignored.

use crate::error::LineError;
use crate::types::{ConversionSummary, Side, TradeRecord, TRADE_MARKER};
use chrono::NaiveDate;
use regex::Regex;
use std::io::{self, BufRead, Lines};
use std::sync::OnceLock;
use tracing::warn;

// Fixed field positions inside a `STK_TRD` line.
const SYMBOL_IDX: usize = 2;
const ACTION_IDX: usize = 5;
const DATE_IDX: usize = 7;
const TIME_IDX: usize = 8;
const QUANTITY_IDX: usize = 10;
const PRICE_IDX: usize = 12;

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{8}$").expect("static date pattern"))
}

/// Decode a single line.
///
/// Returns `None` when the line is not a trade record at all, otherwise the
/// decoded record or the reason the line has to be skipped.
pub fn parse_line(line: &str) -> Option<Result<TradeRecord, LineError>> {
    if !line.starts_with(TRADE_MARKER) {
        return None;
    }
    let fields: Vec<&str> = line.trim().split('|').collect();
    Some(decode_fields(&fields))
}

fn decode_fields(fields: &[&str]) -> Result<TradeRecord, LineError> {
    let symbol = field(fields, SYMBOL_IDX)?;
    let action = field(fields, ACTION_IDX)?;
    let date_raw = field(fields, DATE_IDX)?;
    let time = field(fields, TIME_IDX)?;
    let quantity = parse_quantity(field(fields, QUANTITY_IDX)?)?;
    let price = field(fields, PRICE_IDX)?;
    let date = parse_date(date_raw)?;

    Ok(TradeRecord {
        date,
        time: time.to_string(),
        symbol: symbol.to_string(),
        quantity,
        price: price.to_string(),
        side: classify_side(action),
    })
}

fn field<'a>(fields: &[&'a str], index: usize) -> Result<&'a str, LineError> {
    fields.get(index).copied().ok_or(LineError::MissingField {
        index,
        found: fields.len(),
    })
}

/// Strict YYYYMMDD: exactly eight digits forming a real calendar date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, LineError> {
    if !date_re().is_match(raw) {
        return Err(LineError::InvalidDate(raw.to_string()));
    }
    NaiveDate::parse_from_str(raw, "%Y%m%d").map_err(|_| LineError::InvalidDate(raw.to_string()))
}

/// Signed decimal -> absolute whole units. Fractions are truncated, not rounded.
pub fn parse_quantity(raw: &str) -> Result<u64, LineError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| LineError::InvalidQuantity(raw.to_string()))?;
    let whole = value.abs().trunc();
    // 2^64 and above do not fit a u64.
    if !whole.is_finite() || whole >= u64::MAX as f64 {
        return Err(LineError::InvalidQuantity(raw.to_string()));
    }
    Ok(whole as u64)
}

/// Case-insensitive. SELL is checked before BUY, so an action carrying both is a sell.
pub fn classify_side(action: &str) -> Side {
    let a = action.to_uppercase();
    if a.contains("SELL") {
        Side::Sell
    } else if a.contains("BUY") {
        Side::Buy
    } else {
        Side::Unknown
    }
}

/// Lazy stream of trade records over a buffered reader.
///
/// Bad trade lines are logged and skipped. Reader failures (including
/// invalid UTF-8) are yielded as `Err` and should end the conversion.
pub struct TradeRecords<R> {
    lines: Lines<R>,
    summary: ConversionSummary,
}

impl<R: BufRead> TradeRecords<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            summary: ConversionSummary::default(),
        }
    }

    /// Counters so far. `records_written` is left for the renderer to fill.
    pub fn summary(&self) -> ConversionSummary {
        self.summary
    }
}

impl<R: BufRead> Iterator for TradeRecords<R> {
    type Item = io::Result<TradeRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(l) => l,
                Err(e) => return Some(Err(e)),
            };
            self.summary.lines_read += 1;

            match parse_line(&line) {
                None => self.summary.lines_ignored += 1,
                Some(Ok(rec)) => return Some(Ok(rec)),
                Some(Err(e)) => {
                    self.summary.lines_skipped += 1;
                    warn!(
                        line_no = self.summary.lines_read,
                        "Skipping invalid line: {} - {}",
                        line.trim(),
                        e
                    );
                }
            }
        }
    }
}
