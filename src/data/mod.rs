//! Data sources for the sales sheet.

pub mod sheet;

pub use sheet::{DataSource, SheetClient, SHEET_URL_ENV};
