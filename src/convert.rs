//! TLG -> CSV conversion. Stateless: output depends only on the input bytes.

use crate::error::ConvertError;
use crate::parser::TradeRecords;
use crate::render::{write_csv, LineEnding};
use crate::types::ConversionSummary;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

pub fn convert<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    ending: LineEnding,
) -> Result<ConversionSummary, ConvertError> {
    let mut records = TradeRecords::new(reader);
    let written = write_csv(&mut records, writer, ending)?;

    let mut summary = records.summary();
    summary.records_written = written;
    info!(
        "Converted {} lines: {} trades written, {} skipped, {} ignored",
        summary.lines_read, summary.records_written, summary.lines_skipped, summary.lines_ignored
    );
    Ok(summary)
}

/// Converts into an in-memory CSV string with LF line endings.
pub fn convert_to_string<R: BufRead>(reader: R) -> Result<(String, ConversionSummary), ConvertError> {
    let mut out = Vec::new();
    let summary = convert(reader, &mut out, LineEnding::Lf)?;
    // every field came out of a `String` line, so this only fails on a csv bug
    let text = String::from_utf8(out)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    Ok((text, summary))
}

pub fn convert_str(input: &str) -> Result<(String, ConversionSummary), ConvertError> {
    convert_to_string(input.as_bytes())
}

/// File-to-file conversion with CRLF line endings. `output` is created or truncated.
pub fn convert_file(input: &Path, output: &Path) -> Result<ConversionSummary, ConvertError> {
    let reader = BufReader::new(File::open(input)?);
    let mut writer = BufWriter::new(File::create(output)?);
    let summary = convert(reader, &mut writer, LineEnding::Crlf)?;
    writer.flush()?;
    Ok(summary)
}

/// `trades.tlg` -> `trades.csv`. Names without `from_ext` just get `to_ext` appended.
pub fn output_filename(name: &str, from_ext: &str, to_ext: &str) -> String {
    let stem = name.strip_suffix(from_ext).unwrap_or(name);
    format!("{stem}{to_ext}")
}
