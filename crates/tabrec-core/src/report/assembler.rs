//! Row assembly: a windowed scan that rebuilds line items from loose tokens.
//!
//! OCR output for these reports has no reliable column alignment, so rows are
//! rebuilt from the flat token stream instead: every barcode-shaped token
//! anchors a candidate row, the nearest preceding product code is picked up
//! within a bounded look-back window, and a forward scan claims the row's
//! invoice/document identifiers and numeric block.

use tracing::debug;

use super::rules::Sourced;
use super::rules::numeric::{parse_numeric_token, round2};
use super::rules::patterns::{CONTAINS_DIGIT, PURE_NUMERIC};
use super::rules::tokens::TokenShapes;
use crate::models::config::AssemblerConfig;

/// A provisional line item produced by the scan.
///
/// The five numeric slots map positionally to
/// `[unit_price, quantity_sold, amount, tax, net_amount]`; slots beyond the
/// collected count stay `None` (absent, never zero).
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledRow {
    pub product_code: String,
    pub barcode: String,
    pub product_name: String,
    pub invoice_no: String,
    pub document_no: String,
    pub unit_price: Option<Sourced>,
    pub quantity_sold: Option<Sourced>,
    pub amount: Option<Sourced>,
    pub tax: Option<Sourced>,
    pub net_amount: Option<Sourced>,
}

/// Outcome of one scan over a token sequence.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Accepted rows in stream order.
    pub rows: Vec<AssembledRow>,
    /// Barcode anchors that failed the minimal-field check.
    pub rejected: usize,
}

/// Scans a token stream and assembles candidate rows around barcode anchors.
pub struct RowAssembler<'a> {
    shapes: &'a TokenShapes,
    config: &'a AssemblerConfig,
    tax_rate: f64,
}

impl<'a> RowAssembler<'a> {
    pub fn new(shapes: &'a TokenShapes, config: &'a AssemblerConfig, tax_rate: f64) -> Self {
        Self {
            shapes,
            config,
            tax_rate,
        }
    }

    /// Walk the stream once with a single forward cursor, no backtracking.
    ///
    /// An accepted row advances the cursor past its forward window, so row
    /// spans never overlap; a rejected anchor advances by a single token and
    /// its span is not reused.
    pub fn scan(&self, tokens: &[String]) -> ScanReport {
        let mut report = ScanReport::default();
        let mut i = 0;

        while i < tokens.len() {
            if !self.shapes.is_barcode(&tokens[i]) {
                i += 1;
                continue;
            }

            let (candidate, scan_end) = self.assemble_at(tokens, i);
            match candidate {
                Some(row) => {
                    report.rows.push(row);
                    i = scan_end;
                }
                None => {
                    report.rejected += 1;
                    i += 1;
                }
            }
        }

        debug!(
            rows = report.rows.len(),
            rejected = report.rejected,
            "row scan complete"
        );
        report
    }

    /// Assemble one candidate around the barcode at `anchor`.
    ///
    /// Returns the row when it passes the minimal-field check, along with the
    /// forward scan's end position.
    fn assemble_at(&self, tokens: &[String], anchor: usize) -> (Option<AssembledRow>, usize) {
        // Nearest product code in the bounded look-back window. Unbounded
        // look-back would merge rows on dense OCR noise.
        let window_start = anchor.saturating_sub(self.config.product_lookback);
        let product_code = tokens[window_start..anchor]
            .iter()
            .rev()
            .find(|t| self.shapes.is_product_code(t));

        let mut invoice_no: Option<&str> = None;
        let mut document_no: Option<&str> = None;
        let mut name_tokens: Vec<&str> = Vec::new();
        let mut numbers: Vec<f64> = Vec::new();

        let mut k = anchor + 1;
        while k < tokens.len() && numbers.len() < self.config.numeric_block_len {
            let token = tokens[k].as_str();
            k += 1;

            // Identifier roles claim their first match; everything after
            // falls through to numeric/name classification.
            if invoice_no.is_none() && self.shapes.is_invoice_no(token) {
                invoice_no = Some(token);
                continue;
            }
            if document_no.is_none() && self.shapes.is_document_no(token) {
                document_no = Some(token);
                continue;
            }

            match parse_numeric_token(token) {
                Some(value) => numbers.push(value),
                // Bare digit runs are column debris, not name words.
                None if !PURE_NUMERIC.is_match(token) => name_tokens.push(token),
                None => {}
            }
        }

        let (Some(product_code), Some(invoice_no), Some(document_no)) =
            (product_code, invoice_no, document_no)
        else {
            return (None, k);
        };
        if numbers.len() < self.config.min_numeric_fields {
            return (None, k);
        }

        let mut slots = numbers.into_iter().map(Sourced::scanned);
        let unit_price = slots.next();
        let quantity_sold = slots.next();
        let amount = slots.next();
        let mut tax = slots.next();
        let mut net_amount = slots.next();

        // A missing trailing tax or net is recoverable from the amount.
        if tax.is_none() {
            if let Some(amount) = amount {
                tax = Some(Sourced::derived(round2(amount.value * self.tax_rate)));
            }
        }
        if net_amount.is_none() {
            if let (Some(amount), Some(tax)) = (amount, tax) {
                net_amount = Some(Sourced::derived(round2(amount.value + tax.value)));
            }
        }

        let row = AssembledRow {
            product_code: product_code.clone(),
            barcode: tokens[anchor].clone(),
            product_name: self.assemble_name(&name_tokens),
            invoice_no: invoice_no.to_string(),
            document_no: document_no.to_string(),
            unit_price,
            quantity_sold,
            amount,
            tax,
            net_amount,
        };
        (Some(row), k)
    }

    /// Join the digit-free name tokens with single spaces.
    ///
    /// A result shorter than the configured minimum means OCR lost the name;
    /// the configured product description stands in.
    fn assemble_name(&self, name_tokens: &[&str]) -> String {
        let name = name_tokens
            .iter()
            .filter(|t| !CONTAINS_DIGIT.is_match(t))
            .copied()
            .collect::<Vec<_>>()
            .join(" ");

        if name.chars().count() < self.config.min_name_len {
            self.config.fallback_product_name.clone()
        } else {
            name
        }
    }
}
