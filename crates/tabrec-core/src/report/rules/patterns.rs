//! Common regex patterns for sales-report extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Column-separator glyphs OCR sprinkles between fields; every run of
    // them becomes a single token boundary.
    pub static ref COLUMN_NOISE: Regex = Regex::new(
        r"[|/•·—–_()\[\]{}]+"
    ).unwrap();

    // Default identifier shapes, anchored to the whole token.
    pub static ref BARCODE: Regex = Regex::new(r"^8\d{12}$").unwrap();

    pub static ref PRODUCT_CODE: Regex = Regex::new(r"^\d{6,12}$").unwrap();

    pub static ref INVOICE_NO: Regex = Regex::new(r"^20\d{8}$").unwrap();

    pub static ref DOCUMENT_NO: Regex = Regex::new(r"^510\d{7}$").unwrap();

    // "Vendor 2040334 / <name> (2040334)". The regex crate has no
    // backreferences, so the repeated-id check happens in code.
    pub static ref VENDOR_LINE: Regex = Regex::new(
        r"(?i)Vendor\s+(\d+)\s*/\s*(.+?)\s*\((\d+)\)"
    ).unwrap();

    // "รอบวันที่ 1 - 31 ธันวาคม 2567", tolerant of stray OCR spacing.
    pub static ref PERIOD_LINE: Regex = Regex::new(
        r"รอบวันที่\s*([0-9]{1,2})\s*-\s*([0-9]{1,2})\s*([^\s0-9]+)\s*([12][0-9]{3,4})"
    ).unwrap();

    // Six digits before "H" in document ids like SALE_2040334_202501H02-2.
    pub static ref FILE_PERIOD: Regex = Regex::new(r"(\d{6})H").unwrap();

    // Digit-run tokens that must never land in a product name.
    pub static ref PURE_NUMERIC: Regex = Regex::new(r"^\d+[.,]?\d*$").unwrap();

    pub static ref CONTAINS_DIGIT: Regex = Regex::new(r"\d").unwrap();
}
