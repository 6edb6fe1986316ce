//! Vendor identity extraction from the report header.

use super::patterns::VENDOR_LINE;

/// Vendor identity as printed in the report header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorIdentity {
    /// Numeric vendor id.
    pub id: String,
    /// Display name, formatted as `"<name> (<id>)"`.
    pub name: String,
}

/// Match `Vendor <id> / <name> (<id>)` where both id groups agree.
///
/// The repeated id acts as a checksum against OCR noise; lines where the two
/// digit groups differ are skipped.
pub fn extract_vendor(text: &str) -> Option<VendorIdentity> {
    VENDOR_LINE.captures_iter(text).find_map(|caps| {
        if caps[1] != caps[3] {
            return None;
        }
        let id = caps[1].to_string();
        let name = format!("{} ({})", caps[2].trim(), id);
        Some(VendorIdentity { id, name })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_vendor() {
        let text = "รายงานการขายสินค้า\nVendor 2040334 / คิงคองคือป (2040334)\n";
        let vendor = extract_vendor(text).unwrap();
        assert_eq!(vendor.id, "2040334");
        assert_eq!(vendor.name, "คิงคองคือป (2040334)");
    }

    #[test]
    fn test_vendor_is_case_insensitive() {
        let vendor = extract_vendor("VENDOR 77 / Acme (77)").unwrap();
        assert_eq!(vendor.id, "77");
        assert_eq!(vendor.name, "Acme (77)");
    }

    #[test]
    fn test_mismatched_ids_are_skipped() {
        assert_eq!(extract_vendor("Vendor 2040334 / คิงคองคือป (9999999)"), None);
    }

    #[test]
    fn test_no_vendor_line() {
        assert_eq!(extract_vendor("no header here"), None);
    }
}
