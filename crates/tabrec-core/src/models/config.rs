//! Configuration structures for the reconstruction pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for the tabrec pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TabrecConfig {
    /// Token shape patterns for identifier classification.
    pub tokens: TokenShapeConfig,

    /// Row assembly tuning.
    pub assembler: AssemblerConfig,

    /// Cross-field reconciliation constants.
    pub reconcile: ReconcileConfig,

    /// Header extraction tables.
    pub header: HeaderConfig,
}

impl Default for TabrecConfig {
    fn default() -> Self {
        Self {
            tokens: TokenShapeConfig::default(),
            assembler: AssemblerConfig::default(),
            reconcile: ReconcileConfig::default(),
            header: HeaderConfig::default(),
        }
    }
}

/// Digit-shape patterns for identifier classification.
///
/// The defaults are tuned to one vendor's report layout. The real invariant
/// is "structurally distinguishable identifier classes", so alternative
/// layouts swap these patterns instead of the code. Each pattern matches the
/// whole token, not a substring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenShapeConfig {
    /// 13-digit barcode; leading 8 in the observed data.
    pub barcode: String,

    /// Internal product code, 6 to 12 digits.
    pub product_code: String,

    /// Tax-invoice number: 10 digits starting "20".
    pub invoice: String,

    /// Posting-document number: 10 digits starting "510".
    pub document: String,
}

impl Default for TokenShapeConfig {
    fn default() -> Self {
        Self {
            barcode: r"8\d{12}".to_string(),
            product_code: r"\d{6,12}".to_string(),
            invoice: r"20\d{8}".to_string(),
            document: r"510\d{7}".to_string(),
        }
    }
}

/// Row assembly configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblerConfig {
    /// How many tokens before a barcode may hold its product code.
    pub product_lookback: usize,

    /// Numeric values collected per row before the forward scan stops.
    pub numeric_block_len: usize,

    /// Minimum numeric values a row needs to be accepted.
    pub min_numeric_fields: usize,

    /// Names shorter than this many characters are treated as OCR losses.
    pub min_name_len: usize,

    /// Stand-in description when OCR fails to recover the product name.
    ///
    /// The source reports carry a single recurring product, so a lost name is
    /// overwhelmingly this one. Override per data set.
    pub fallback_product_name: String,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            product_lookback: 5,
            numeric_block_len: 5,
            min_numeric_fields: 3,
            min_name_len: 6,
            fallback_product_name: "ผลิตภัณฑ์เสริมอาหาร ตรา คิงคอง 2 แคปซูล".to_string(),
        }
    }
}

/// Cross-field reconciliation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// VAT rate used to derive a missing tax from the amount.
    pub tax_rate: f64,

    /// Absolute tolerance when comparing unit price x quantity to the
    /// scanned amount. Wide enough to absorb a single OCR digit error.
    pub amount_tolerance: f64,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            tax_rate: 0.07,
            amount_tolerance: 1.0,
        }
    }
}

/// Header extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// Month-name table for period resolution, in priority order.
    pub months: Vec<MonthEntry>,

    /// Years at or above this value are Buddhist era.
    pub buddhist_year_min: i32,

    /// Offset subtracted from Buddhist-era years.
    pub buddhist_era_offset: i32,
}

/// One month-name table entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthEntry {
    pub name: String,
    pub number: u32,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        let months = [
            ("มกราคม", 1),
            ("กุมภาพันธ์", 2),
            ("มีนาคม", 3),
            ("เมษายน", 4),
            ("พฤษภาคม", 5),
            ("มิถุนายน", 6),
            ("กรกฎาคม", 7),
            ("สิงหาคม", 8),
            ("กันยายน", 9),
            ("ตุลาคม", 10),
            ("พฤศจิกายน", 11),
            ("ธันวาคม", 12),
            // Truncations OCR produces for the longer names.
            ("กุมภา", 2),
            ("มีค", 3),
            ("เมย", 4),
            ("มิย", 6),
            ("กค", 7),
            ("สค", 8),
            ("กย", 9),
            ("ตค", 10),
            ("พย", 11),
            ("ธค", 12),
        ];

        Self {
            months: months
                .iter()
                .map(|(name, number)| MonthEntry {
                    name: (*name).to_string(),
                    number: *number,
                })
                .collect(),
            buddhist_year_min: 2400,
            buddhist_era_offset: 543,
        }
    }
}

impl TabrecConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_constants() {
        let config = TabrecConfig::default();
        assert_eq!(config.reconcile.tax_rate, 0.07);
        assert_eq!(config.reconcile.amount_tolerance, 1.0);
        assert_eq!(config.assembler.product_lookback, 5);
        assert_eq!(config.assembler.numeric_block_len, 5);
        assert_eq!(config.assembler.min_numeric_fields, 3);
        assert_eq!(config.header.buddhist_era_offset, 543);
        assert_eq!(config.header.months.len(), 22);
    }

    #[test]
    fn test_json_round_trip() {
        let config = TabrecConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: TabrecConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tokens.barcode, config.tokens.barcode);
        assert_eq!(back.header.months.len(), config.header.months.len());
    }

    #[test]
    fn test_partial_config_takes_defaults() {
        let config: TabrecConfig =
            serde_json::from_str(r#"{"reconcile": {"tax_rate": 0.1}}"#).unwrap();
        assert_eq!(config.reconcile.tax_rate, 0.1);
        // Unspecified sections and fields keep their defaults.
        assert_eq!(config.reconcile.amount_tolerance, 1.0);
        assert_eq!(config.assembler.product_lookback, 5);
    }
}
