//! CSV output for trade records.

use crate::error::ConvertError;
use crate::types::TradeRecord;
use std::io::{self, Write};

pub const CSV_HEADER: [&str; 6] = ["Date", "Time", "Symbol", "Quantity", "Price", "Side"];

/// Record terminator. Files on disk get CRLF, text returned over HTTP gets LF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Crlf,
    Lf,
}

impl LineEnding {
    fn terminator(self) -> csv::Terminator {
        match self {
            LineEnding::Crlf => csv::Terminator::CRLF,
            LineEnding::Lf => csv::Terminator::Any(b'\n'),
        }
    }
}

/// Writes the header, then one row per record in arrival order.
/// Returns the number of data rows written.
///
/// Stops at the first `Err` from `records`; whatever was written so far is
/// not meant to be used.
pub fn write_csv<W, I>(records: I, out: W, ending: LineEnding) -> Result<usize, ConvertError>
where
    W: Write,
    I: IntoIterator<Item = io::Result<TradeRecord>>,
{
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(ending.terminator())
        .from_writer(out);

    wtr.write_record(CSV_HEADER)?;

    let mut rows = 0usize;
    for rec in records {
        let rec = rec?;
        let quantity = rec.quantity.to_string();
        let date = rec.formatted_date();
        wtr.write_record([
            date.as_str(),
            rec.time.as_str(),
            rec.symbol.as_str(),
            quantity.as_str(),
            rec.price.as_str(),
            rec.side.as_str(),
        ])?;
        rows += 1;
    }

    wtr.flush()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;
    use chrono::NaiveDate;

    fn rec(symbol: &str, qty: u64, side: Side) -> TradeRecord {
        TradeRecord {
            date: NaiveDate::from_ymd_opt(2024, 12, 18).unwrap(),
            time: "09:30:00".into(),
            symbol: symbol.into(),
            quantity: qty,
            price: "150.25".into(),
            side,
        }
    }

    fn render(records: Vec<TradeRecord>) -> String {
        render_with(records, LineEnding::Crlf)
    }

    fn render_with(records: Vec<TradeRecord>, ending: LineEnding) -> String {
        let mut buf = Vec::new();
        write_csv(records.into_iter().map(Ok), &mut buf, ending).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn header_only_for_no_records() {
        assert_eq!(render(vec![]), "Date,Time,Symbol,Quantity,Price,Side\r\n");
    }

    #[test]
    fn rows_follow_header_in_order() {
        let out = render(vec![rec("AAPL", 100, Side::Buy), rec("TSLA", 5, Side::Sell)]);
        assert_eq!(
            out,
            "Date,Time,Symbol,Quantity,Price,Side\r\n\
             12/18/2024,09:30:00,AAPL,100,150.25,Buy\r\n\
             12/18/2024,09:30:00,TSLA,5,150.25,Sell\r\n"
        );
    }

    #[test]
    fn lf_ending_uses_bare_newlines() {
        let out = render_with(vec![rec("AAPL", 100, Side::Buy)], LineEnding::Lf);
        assert_eq!(
            out,
            "Date,Time,Symbol,Quantity,Price,Side\n12/18/2024,09:30:00,AAPL,100,150.25,Buy\n"
        );
    }

    #[test]
    fn fields_with_delimiters_or_quotes_are_quoted() {
        let out = render(vec![rec("A,B", 1, Side::Unknown), rec("say \"hi\"", 2, Side::Buy)]);
        let lines: Vec<&str> = out.split("\r\n").collect();
        assert_eq!(lines[1], "12/18/2024,09:30:00,\"A,B\",1,150.25,Unknown");
        assert_eq!(lines[2], "12/18/2024,09:30:00,\"say \"\"hi\"\"\",2,150.25,Buy");
    }

    #[test]
    fn reader_error_aborts_rendering() {
        let items = vec![
            Ok(rec("AAPL", 1, Side::Buy)),
            Err(io::Error::new(io::ErrorKind::InvalidData, "bad bytes")),
        ];
        let mut buf = Vec::new();
        let err = write_csv(items, &mut buf, LineEnding::Crlf).unwrap_err();
        assert!(err.to_string().contains("bad bytes"));
    }
}
