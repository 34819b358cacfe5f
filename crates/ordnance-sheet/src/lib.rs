//! Stats-sheet reader for Ordnance.
//!
//! Fetches CSV exports of the upstream spreadsheets and turns them into
//! [`ordnance_core`] weapons and version markers. Sheets are transposed: the
//! first column holds row labels and every further column is one weapon.
//!
//! # Quick start
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use ordnance_core::upstream::TableParser as _;
//! use ordnance_sheet::{HttpTableReader, SheetTableParser};
//!
//! # async fn run() -> ordnance_sheet::Result<()> {
//! let reader = HttpTableReader::new(Duration::from_secs(10))?;
//! let parser = SheetTableParser::new(reader);
//! let weapons = parser.parse("aam-ir", "https://sheets.example/export?format=csv").await?;
//! println!("{} weapons", weapons.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
mod mapper;
mod parser;
mod reader;

pub use error::{Error, Result};
pub use mapper::{NAME_KEY, NOTES_KEY, column_key, map_column};
pub use parser::{
  MARKER_ROW, SheetMarkerSource, SheetTableParser, parse_marker, weapons_from_rows,
};
pub use reader::{HttpTableReader, Rows, TableReader, parse_csv};
