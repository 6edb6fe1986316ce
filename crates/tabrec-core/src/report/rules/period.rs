//! Reporting-period extraction: Thai month names and Buddhist-era years.

use chrono::{Datelike, NaiveDate};

use super::patterns::{FILE_PERIOD, PERIOD_LINE};
use crate::models::config::HeaderConfig;

/// Inclusive reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Resolves the reporting period from header text or the document id.
#[derive(Debug, Clone)]
pub struct PeriodResolver {
    months: Vec<(String, u32)>,
    buddhist_year_min: i32,
    buddhist_era_offset: i32,
}

impl PeriodResolver {
    pub fn from_config(config: &HeaderConfig) -> Self {
        Self {
            months: config
                .months
                .iter()
                .map(|m| (m.name.clone(), m.number))
                .collect(),
            buddhist_year_min: config.buddhist_year_min,
            buddhist_era_offset: config.buddhist_era_offset,
        }
    }

    /// Extract `รอบวันที่ D1 - D2 <month> <year>` from the raw text.
    ///
    /// Day values are clamped to the resolved month's length and ordered, so
    /// OCR digit damage cannot produce an impossible or inverted period.
    pub fn extract(&self, text: &str) -> Option<ReportPeriod> {
        let caps = PERIOD_LINE.captures(text)?;
        let d1: u32 = caps[1].parse().ok()?;
        let d2: u32 = caps[2].parse().ok()?;
        let month = self.resolve_month(caps[3].trim())?;
        let year = self.resolve_year(caps[4].parse().ok()?);

        let last_day = last_day_of_month(year, month)?;
        let d1 = d1.clamp(1, last_day);
        let d2 = d2.clamp(1, last_day);
        let (d1, d2) = (d1.min(d2), d1.max(d2));

        Some(ReportPeriod {
            start: NaiveDate::from_ymd_opt(year, month, d1)?,
            end: NaiveDate::from_ymd_opt(year, month, d2)?,
        })
    }

    /// Derive the period from a `YYYYMM` run preceding "H" in the document
    /// id, covering that whole calendar month.
    pub fn from_document_id(&self, document_id: &str) -> Option<ReportPeriod> {
        let caps = FILE_PERIOD.captures(document_id)?;
        let yyyymm = &caps[1];
        let year: i32 = yyyymm[..4].parse().ok()?;
        let month: u32 = yyyymm[4..].parse().ok()?;
        let last_day = last_day_of_month(year, month)?;

        Some(ReportPeriod {
            start: NaiveDate::from_ymd_opt(year, month, 1)?,
            end: NaiveDate::from_ymd_opt(year, month, last_day)?,
        })
    }

    fn resolve_year(&self, year: i32) -> i32 {
        if year >= self.buddhist_year_min {
            year - self.buddhist_era_offset
        } else {
            year
        }
    }

    fn resolve_month(&self, name: &str) -> Option<u32> {
        self.months
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, month)| *month)
            .or_else(|| self.fuzzy_month(name))
    }

    /// Best character-overlap match against the month table, for OCR output
    /// that mangles a character or two ("ธนวาคม" for "ธันวาคม"). Ties keep
    /// the earliest table entry.
    fn fuzzy_month(&self, name: &str) -> Option<u32> {
        let mut best: Option<(usize, u32)> = None;
        for (candidate, month) in &self.months {
            let score = name.chars().filter(|c| candidate.contains(*c)).count();
            if best.is_none_or(|(top, _)| score > top) {
                best = Some((score, *month));
            }
        }
        best.map(|(_, month)| month)
    }
}

/// Day count of the given month.
fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()
        .map(|d| d.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resolver() -> PeriodResolver {
        PeriodResolver::from_config(&HeaderConfig::default())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_buddhist_era_period() {
        let period = resolver().extract("รอบวันที่ 1 - 31 ธันวาคม 2567").unwrap();
        assert_eq!(period.start, date(2024, 12, 1));
        assert_eq!(period.end, date(2024, 12, 31));
    }

    #[test]
    fn test_gregorian_year_passes_through() {
        let period = resolver().extract("รอบวันที่ 1 - 15 มกราคม 2024").unwrap();
        assert_eq!(period.start, date(2024, 1, 1));
        assert_eq!(period.end, date(2024, 1, 15));
    }

    #[test]
    fn test_fuzzy_month_match() {
        // OCR dropped the vowel mark: ธนวาคม instead of ธันวาคม.
        let period = resolver().extract("รอบวันที่ 1 - 31 ธนวาคม 2567").unwrap();
        assert_eq!(period.start, date(2024, 12, 1));
        assert_eq!(period.end, date(2024, 12, 31));
    }

    #[test]
    fn test_days_clamped_to_month_length() {
        let period = resolver()
            .extract("รอบวันที่ 1 - 31 กุมภาพันธ์ 2567")
            .unwrap();
        // 2567 BE is the leap year 2024.
        assert_eq!(period.end, date(2024, 2, 29));
    }

    #[test]
    fn test_swapped_days_are_reordered() {
        let period = resolver().extract("รอบวันที่ 31 - 1 ธันวาคม 2567").unwrap();
        assert_eq!(period.start, date(2024, 12, 1));
        assert_eq!(period.end, date(2024, 12, 31));
    }

    #[test]
    fn test_document_id_fallback() {
        let period = resolver()
            .from_document_id("SALE_2040334_202501H02-2")
            .unwrap();
        assert_eq!(period.start, date(2025, 1, 1));
        assert_eq!(period.end, date(2025, 1, 31));
    }

    #[test]
    fn test_document_id_without_marker() {
        assert!(resolver().from_document_id("report-december").is_none());
        // A six-digit run with an impossible month resolves to nothing.
        assert!(resolver().from_document_id("SALE_209913H1").is_none());
    }

    #[test]
    fn test_missing_period_line() {
        assert!(resolver().extract("no period here").is_none());
    }
}
