//! Core library for the hsn-summary command line application.
//!
//! The library turns a tax-filing spreadsheet export into an HSN/SAC summary
//! workbook. Responsibilities are kept narrow and composable: spreadsheet
//! adapters live under [`io`], table types inside [`model`], header discovery
//! and cleanup in [`normalize`], grouping in [`aggregate`], and the end-to-end
//! orchestration under [`pipeline`].

pub mod aggregate;
pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod normalize;
pub mod pipeline;

pub use error::{Result, ToolError};
