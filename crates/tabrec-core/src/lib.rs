//! Core library for reconstructing sales line items from OCR'd report text.
//!
//! This crate provides:
//! - Loose tokenization of scanned tabular report text
//! - Digit-shape token classification (barcode, product, invoice, document)
//! - Windowed row assembly with numeric normalization
//! - Cross-field consistency reconciliation (tax / net derivation)
//! - Header extraction (vendor identity, Thai-calendar reporting periods)
//!
//! Rendering pages and running OCR are external collaborators; the pipeline
//! consumes ordered page texts and a document identifier, and emits one
//! [`SalesDocument`].

pub mod error;
pub mod models;
pub mod report;

pub use error::{ExtractionError, Result, TabrecError};
pub use models::config::TabrecConfig;
pub use models::document::{LineItem, ReportHeader, SalesDocument};
pub use report::rules::{TokenShapes, tokenize};
pub use report::{ExtractionResult, ReportParser, SalesReportParser};
