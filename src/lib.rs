//! TLG trade-log to CSV conversion, plus the HTTP service that exposes it.

pub mod config;
pub mod convert;
pub mod error;
pub mod parser;
pub mod render;
pub mod server;
pub mod types;

pub use convert::{convert, convert_file, convert_str};
pub use types::{ConversionSummary, Side, TradeRecord};
