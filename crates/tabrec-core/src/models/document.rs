//! Output data model for reconstructed sales documents.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A fully reconstructed sales report.
///
/// The sole persisted artifact: created once per input document and never
/// mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesDocument {
    /// Report-level metadata shared by every line item.
    pub header: ReportHeader,

    /// Reconstructed line items in emission order.
    pub items: Vec<LineItem>,
}

/// Vendor identity and reporting period for one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportHeader {
    /// Numeric vendor id, empty when the header pattern was not found.
    pub vendor_id: String,

    /// Vendor display name, formatted as `"<name> (<vendor_id>)"`.
    pub vendor_name: String,

    /// First day of the reporting period.
    #[serde(with = "date_string")]
    pub period_start_date: Option<NaiveDate>,

    /// Last day of the reporting period.
    #[serde(with = "date_string")]
    pub period_end_date: Option<NaiveDate>,
}

/// One reconstructed sales line item.
///
/// Monetary and quantity fields are plain floats; identifier fields are
/// strings. Header metadata is denormalized onto every item so each record
/// stands alone downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// Sequence number, `1..=N` in emission order with no gaps.
    pub no: u32,

    /// Internal product code found near the barcode.
    pub product_code: String,

    /// 13-digit barcode the row was anchored on.
    pub barcode: String,

    /// Product description recovered from the surrounding tokens.
    pub product_name: String,

    /// Tax-invoice number.
    pub invoice_no: String,

    /// Posting-document number.
    pub document: String,

    pub unit_price: f64,
    pub quantity_sold: f64,
    pub amount: f64,
    pub tax: f64,
    pub net_amount: f64,

    pub vendor_id: String,
    pub vendor_name: String,

    #[serde(with = "date_string")]
    pub period_start_date: Option<NaiveDate>,

    #[serde(with = "date_string")]
    pub period_end_date: Option<NaiveDate>,
}

impl SalesDocument {
    /// Validate the reconstructed document and return any issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.header.vendor_id.is_empty() {
            issues.push("Missing vendor identity".to_string());
        }

        if self.header.period_start_date.is_none() || self.header.period_end_date.is_none() {
            issues.push("Missing reporting period".to_string());
        } else if self.header.period_start_date > self.header.period_end_date {
            issues.push("Reporting period is inverted".to_string());
        }

        if self.items.is_empty() {
            issues.push("No line items".to_string());
        }

        for item in &self.items {
            if (item.net_amount - (item.amount + item.tax)).abs() > 0.05 {
                issues.push(format!(
                    "Item {}: net amount {} differs from amount + tax ({})",
                    item.no,
                    item.net_amount,
                    item.amount + item.tax
                ));
            }
        }

        let in_sequence = self
            .items
            .iter()
            .enumerate()
            .all(|(idx, item)| item.no == idx as u32 + 1);
        if !in_sequence {
            issues.push("Line item numbering has gaps".to_string());
        }

        issues
    }
}

/// Dates travel as `YYYY-MM-DD` strings in the JSON contract, with `""`
/// standing in for an unresolved period.
mod date_string {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_item(no: u32) -> LineItem {
        LineItem {
            no,
            product_code: "123456".to_string(),
            barcode: "8851234567890".to_string(),
            product_name: "Test product".to_string(),
            invoice_no: "2012345678".to_string(),
            document: "5101234567".to_string(),
            unit_price: 10.5,
            quantity_sold: 3.0,
            amount: 31.5,
            tax: 2.2,
            net_amount: 33.7,
            vendor_id: "2040334".to_string(),
            vendor_name: "Vendor (2040334)".to_string(),
            period_start_date: NaiveDate::from_ymd_opt(2024, 12, 1),
            period_end_date: NaiveDate::from_ymd_opt(2024, 12, 31),
        }
    }

    #[test]
    fn test_dates_serialize_as_plain_strings() {
        let header = ReportHeader {
            vendor_id: "2040334".to_string(),
            vendor_name: "Vendor (2040334)".to_string(),
            period_start_date: NaiveDate::from_ymd_opt(2024, 12, 1),
            period_end_date: NaiveDate::from_ymd_opt(2024, 12, 31),
        };

        let json = serde_json::to_value(&header).unwrap();
        assert_eq!(json["period_start_date"], "2024-12-01");
        assert_eq!(json["period_end_date"], "2024-12-31");
    }

    #[test]
    fn test_missing_dates_serialize_as_empty_strings() {
        let header = ReportHeader::default();
        let json = serde_json::to_value(&header).unwrap();
        assert_eq!(json["period_start_date"], "");
        assert_eq!(json["period_end_date"], "");

        let back: ReportHeader = serde_json::from_value(json).unwrap();
        assert_eq!(back.period_start_date, None);
    }

    #[test]
    fn test_validate_clean_document() {
        let document = SalesDocument {
            header: ReportHeader {
                vendor_id: "2040334".to_string(),
                vendor_name: "Vendor (2040334)".to_string(),
                period_start_date: NaiveDate::from_ymd_opt(2024, 12, 1),
                period_end_date: NaiveDate::from_ymd_opt(2024, 12, 31),
            },
            items: vec![sample_item(1), sample_item(2)],
        };

        assert_eq!(document.validate(), Vec::<String>::new());
    }

    #[test]
    fn test_validate_flags_sequence_gap_and_bad_net() {
        let mut second = sample_item(3);
        second.net_amount = 99.0;

        let document = SalesDocument {
            header: ReportHeader {
                vendor_id: "2040334".to_string(),
                vendor_name: "Vendor (2040334)".to_string(),
                period_start_date: NaiveDate::from_ymd_opt(2024, 12, 1),
                period_end_date: NaiveDate::from_ymd_opt(2024, 12, 31),
            },
            items: vec![sample_item(1), second],
        };

        let issues = document.validate();
        assert!(issues.iter().any(|i| i.contains("numbering")));
        assert!(issues.iter().any(|i| i.contains("net amount")));
    }
}
