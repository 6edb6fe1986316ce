//! Loose tokenization and token shape classification.

use regex::Regex;

use super::patterns::{BARCODE, COLUMN_NOISE, DOCUMENT_NO, INVOICE_NO, PRODUCT_CODE};
use crate::error::TabrecError;
use crate::models::config::TokenShapeConfig;

/// Split raw OCR text into whitespace-delimited tokens.
///
/// Column-separator glyphs become token boundaries first, so a row survives
/// even when OCR scatters its fields across misaligned text fragments. Order
/// follows the approximate reading order of the scanned page.
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned = COLUMN_NOISE.replace_all(text, " ");
    cleaned.split_whitespace().map(str::to_string).collect()
}

/// Shape predicates deciding which identifier role a token can play.
///
/// All four patterns match the whole token. In practice the shapes are
/// mutually exclusive, except that document numbers also fall inside the
/// product-code digit range; callers check the more specific shapes first.
#[derive(Debug, Clone)]
pub struct TokenShapes {
    barcode: Regex,
    product_code: Regex,
    invoice_no: Regex,
    document_no: Regex,
}

impl TokenShapes {
    /// Compile shape patterns from configuration.
    pub fn from_config(config: &TokenShapeConfig) -> Result<Self, TabrecError> {
        Ok(Self {
            barcode: compile_anchored("tokens.barcode", &config.barcode)?,
            product_code: compile_anchored("tokens.product_code", &config.product_code)?,
            invoice_no: compile_anchored("tokens.invoice", &config.invoice)?,
            document_no: compile_anchored("tokens.document", &config.document)?,
        })
    }

    /// 13-digit barcode.
    pub fn is_barcode(&self, token: &str) -> bool {
        self.barcode.is_match(token)
    }

    /// Internal product code, 6 to 12 digits.
    pub fn is_product_code(&self, token: &str) -> bool {
        self.product_code.is_match(token)
    }

    /// Tax-invoice number.
    pub fn is_invoice_no(&self, token: &str) -> bool {
        self.invoice_no.is_match(token)
    }

    /// Posting-document number.
    pub fn is_document_no(&self, token: &str) -> bool {
        self.document_no.is_match(token)
    }
}

impl Default for TokenShapes {
    fn default() -> Self {
        Self {
            barcode: BARCODE.clone(),
            product_code: PRODUCT_CODE.clone(),
            invoice_no: INVOICE_NO.clone(),
            document_no: DOCUMENT_NO.clone(),
        }
    }
}

fn compile_anchored(field: &str, pattern: &str) -> Result<Regex, TabrecError> {
    Regex::new(&format!("^(?:{pattern})$"))
        .map_err(|e| TabrecError::Config(format!("invalid pattern for {field}: {e}")))
}
