//! Cross-field consistency reconciliation over assembled rows.

use super::assembler::AssembledRow;
use super::rules::Sourced;
use super::rules::numeric::round2;
use crate::models::config::ReconcileConfig;

/// Repairs OCR-damaged monetary fields using numeric plausibility.
///
/// `unit_price * quantity_sold` is the strongest cross-check the rows offer:
/// when it lands within the tolerance of the scanned amount, the computed
/// product is taken as the truth and the dependent tax/net values follow.
/// Corrections are silent and deterministic; provenance flags record them.
#[derive(Debug, Clone)]
pub struct Reconciler {
    tax_rate: f64,
    tolerance: f64,
}

impl Reconciler {
    pub fn from_config(config: &ReconcileConfig) -> Self {
        Self {
            tax_rate: config.tax_rate,
            tolerance: config.amount_tolerance,
        }
    }

    /// Reconcile every row in place.
    pub fn reconcile_all(&self, rows: &mut [AssembledRow]) {
        for row in rows {
            self.reconcile(row);
        }
    }

    /// Cross-check one row and rebuild its dependent fields.
    ///
    /// Applying the pass twice changes nothing: a replaced amount equals its
    /// own recomputation, and derived tax/net values recompute to themselves.
    pub fn reconcile(&self, row: &mut AssembledRow) {
        if let (Some(unit), Some(qty)) = (row.unit_price, row.quantity_sold) {
            let calc = round2(unit.value * qty.value);
            let close = row
                .amount
                .is_some_and(|amount| (calc - amount.value).abs() <= self.tolerance);
            if close {
                row.amount = Some(Sourced::derived(calc));
                // Only derived values may be rewritten; a scanned tax or net
                // outranks the recomputation.
                if row.tax.is_none_or(|tax| tax.is_derived()) {
                    row.tax = Some(Sourced::derived(round2(calc * self.tax_rate)));
                }
                if row.net_amount.is_none_or(|net| net.is_derived()) {
                    if let Some(tax) = row.tax {
                        row.net_amount = Some(Sourced::derived(round2(calc + tax.value)));
                    }
                }
            }
        }

        // Negative tax is an OCR artifact, never a legitimate value.
        if row.tax.is_none_or(|tax| tax.value < 0.0) {
            if let Some(amount) = row.amount {
                row.tax = Some(Sourced::derived(round2(amount.value * self.tax_rate)));
            }
        }

        if row.net_amount.is_none() {
            row.net_amount = Some(match (row.amount, row.tax) {
                (Some(amount), Some(tax)) => Sourced::derived(round2(amount.value + tax.value)),
                _ => Sourced::derived(0.0),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn reconciler() -> Reconciler {
        Reconciler::from_config(&ReconcileConfig::default())
    }

    fn row(
        unit_price: Option<Sourced>,
        quantity_sold: Option<Sourced>,
        amount: Option<Sourced>,
        tax: Option<Sourced>,
        net_amount: Option<Sourced>,
    ) -> AssembledRow {
        AssembledRow {
            product_code: "123456".to_string(),
            barcode: "8851234567890".to_string(),
            product_name: "Test product".to_string(),
            invoice_no: "2012345678".to_string(),
            document_no: "5101234567".to_string(),
            unit_price,
            quantity_sold,
            amount,
            tax,
            net_amount,
        }
    }

    #[test]
    fn test_amount_within_tolerance_is_replaced() {
        // calc = 30.00, scanned amount off by exactly the tolerance.
        let mut r = row(
            Some(Sourced::scanned(10.0)),
            Some(Sourced::scanned(3.0)),
            Some(Sourced::scanned(31.0)),
            Some(Sourced::derived(2.17)),
            Some(Sourced::derived(33.17)),
        );
        reconciler().reconcile(&mut r);

        assert_eq!(r.amount, Some(Sourced::derived(30.0)));
        assert_eq!(r.tax, Some(Sourced::derived(2.1)));
        assert_eq!(r.net_amount, Some(Sourced::derived(32.1)));
    }

    #[test]
    fn test_amount_outside_tolerance_is_kept() {
        let mut r = row(
            Some(Sourced::scanned(10.0)),
            Some(Sourced::scanned(3.0)),
            Some(Sourced::scanned(32.01)),
            Some(Sourced::scanned(2.24)),
            Some(Sourced::scanned(34.25)),
        );
        reconciler().reconcile(&mut r);

        assert_eq!(r.amount, Some(Sourced::scanned(32.01)));
        assert_eq!(r.tax, Some(Sourced::scanned(2.24)));
        assert_eq!(r.net_amount, Some(Sourced::scanned(34.25)));
    }

    #[test]
    fn test_scanned_tax_survives_amount_correction() {
        let mut r = row(
            Some(Sourced::scanned(10.0)),
            Some(Sourced::scanned(3.0)),
            Some(Sourced::scanned(30.5)),
            Some(Sourced::scanned(2.13)),
            None,
        );
        reconciler().reconcile(&mut r);

        assert_eq!(r.amount, Some(Sourced::derived(30.0)));
        // Scanned tax outranks the 7% recomputation.
        assert_eq!(r.tax, Some(Sourced::scanned(2.13)));
        assert_eq!(r.net_amount, Some(Sourced::derived(32.13)));
    }

    #[test]
    fn test_negative_tax_is_recomputed() {
        let mut r = row(
            Some(Sourced::scanned(10.0)),
            Some(Sourced::scanned(3.0)),
            Some(Sourced::scanned(30.0)),
            Some(Sourced::scanned(-4.2)),
            Some(Sourced::scanned(32.1)),
        );
        reconciler().reconcile(&mut r);

        assert_eq!(r.tax, Some(Sourced::derived(2.1)));
    }

    #[test]
    fn test_missing_everything_defaults_net_to_zero() {
        let mut r = row(None, None, None, None, None);
        reconciler().reconcile(&mut r);

        assert_eq!(r.amount, None);
        assert_eq!(r.tax, None);
        assert_eq!(r.net_amount, Some(Sourced::derived(0.0)));
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut first = row(
            Some(Sourced::scanned(10.0)),
            Some(Sourced::scanned(3.0)),
            Some(Sourced::scanned(31.0)),
            None,
            None,
        );
        reconciler().reconcile(&mut first);

        let mut second = first.clone();
        reconciler().reconcile(&mut second);

        assert_eq!(first, second);
    }
}
