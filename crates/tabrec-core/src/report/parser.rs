//! Report parser: orchestrates the reconstruction pipeline.

use std::time::Instant;

use tracing::{debug, info};

use super::assembler::{AssembledRow, RowAssembler};
use super::reconcile::Reconciler;
use super::rules::period::PeriodResolver;
use super::rules::tokens::{TokenShapes, tokenize};
use super::rules::vendor::extract_vendor;
use crate::error::{ExtractionError, Result};
use crate::models::config::TabrecConfig;
use crate::models::document::{LineItem, ReportHeader, SalesDocument};

/// Result of reconstructing one document.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// The reconstructed document.
    pub document: SalesDocument,
    /// Candidate rows dropped for missing required fields.
    pub rejected_rows: usize,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for report reconstruction.
pub trait ReportParser {
    /// Reconstruct a document from ordered page texts.
    fn process(&self, pages: &[String], document_id: &str) -> Result<ExtractionResult>;
}

/// Token-stream parser for the supplier sales-report format family.
pub struct SalesReportParser {
    config: TabrecConfig,
    shapes: TokenShapes,
    periods: PeriodResolver,
    reconciler: Reconciler,
}

impl SalesReportParser {
    /// Create a parser with the default configuration.
    pub fn new() -> Self {
        let config = TabrecConfig::default();
        let periods = PeriodResolver::from_config(&config.header);
        let reconciler = Reconciler::from_config(&config.reconcile);
        Self {
            shapes: TokenShapes::default(),
            periods,
            reconciler,
            config,
        }
    }

    /// Create a parser from configuration.
    ///
    /// Fails when a configured token shape pattern does not compile.
    pub fn from_config(config: TabrecConfig) -> Result<Self> {
        let shapes = TokenShapes::from_config(&config.tokens)?;
        let periods = PeriodResolver::from_config(&config.header);
        let reconciler = Reconciler::from_config(&config.reconcile);
        Ok(Self {
            config,
            shapes,
            periods,
            reconciler,
        })
    }

    fn extract_header(
        &self,
        text: &str,
        document_id: &str,
        warnings: &mut Vec<String>,
    ) -> ReportHeader {
        let vendor = extract_vendor(text);
        if vendor.is_none() {
            warnings.push("could not extract vendor identity".to_string());
        }

        let period = self.periods.extract(text).or_else(|| {
            let fallback = self.periods.from_document_id(document_id);
            match fallback {
                Some(_) => {
                    warnings.push("reporting period derived from the document id".to_string())
                }
                None => warnings.push("could not resolve the reporting period".to_string()),
            }
            fallback
        });

        let (vendor_id, vendor_name) = vendor.map(|v| (v.id, v.name)).unwrap_or_default();
        ReportHeader {
            vendor_id,
            vendor_name,
            period_start_date: period.map(|p| p.start),
            period_end_date: period.map(|p| p.end),
        }
    }
}

impl Default for SalesReportParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportParser for SalesReportParser {
    fn process(&self, pages: &[String], document_id: &str) -> Result<ExtractionResult> {
        let start = Instant::now();

        let full_text = pages.join("\n");
        if full_text.trim().is_empty() {
            return Err(ExtractionError::NoText.into());
        }

        info!(
            pages = pages.len(),
            document_id, "reconstructing sales report"
        );
        let mut warnings = Vec::new();

        let header = self.extract_header(&full_text, document_id, &mut warnings);

        let tokens = tokenize(&full_text);
        debug!(tokens = tokens.len(), "tokenized OCR text");

        let assembler = RowAssembler::new(
            &self.shapes,
            &self.config.assembler,
            self.config.reconcile.tax_rate,
        );
        let mut scan = assembler.scan(&tokens);
        self.reconciler.reconcile_all(&mut scan.rows);

        let mut rejected = scan.rejected;
        let items = build_items(scan.rows, &header, &mut rejected);
        if items.is_empty() {
            warnings.push("no line items could be reconstructed".to_string());
        }

        debug!(items = items.len(), rejected, "assembled line items");

        Ok(ExtractionResult {
            document: SalesDocument { header, items },
            rejected_rows: rejected,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Stamp header metadata onto accepted rows and assign sequence numbers.
fn build_items(
    rows: Vec<AssembledRow>,
    header: &ReportHeader,
    rejected: &mut usize,
) -> Vec<LineItem> {
    let mut items = Vec::with_capacity(rows.len());

    for row in rows {
        // Reconciliation cannot invent a row's core numerics; a row missing
        // any of the first three slots is dropped, not reported.
        let (Some(unit_price), Some(quantity_sold), Some(amount)) =
            (row.unit_price, row.quantity_sold, row.amount)
        else {
            *rejected += 1;
            continue;
        };

        items.push(LineItem {
            no: items.len() as u32 + 1,
            product_code: row.product_code,
            barcode: row.barcode,
            product_name: row.product_name,
            invoice_no: row.invoice_no,
            document: row.document_no,
            unit_price: unit_price.value,
            quantity_sold: quantity_sold.value,
            amount: amount.value,
            tax: row.tax.map(|t| t.value).unwrap_or(0.0),
            net_amount: row.net_amount.map(|n| n.value).unwrap_or(0.0),
            vendor_id: header.vendor_id.clone(),
            vendor_name: header.vendor_name.clone(),
            period_start_date: header.period_start_date,
            period_end_date: header.period_end_date,
        });
    }

    items
}
