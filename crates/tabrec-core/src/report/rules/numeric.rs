//! Best-effort normalization of OCR numeric tokens.

/// Parse an OCR numeric token into a float.
///
/// Keeps only digits and separator characters, then disambiguates "." vs ","
/// by count: two or more dots with no comma means dotted thousands
/// ("1.800.000" is 1800000), otherwise commas are thousands separators and
/// the dot is the decimal point ("110,340.00" is 110340.0). Lossy by design;
/// returns `None` for anything unparsable instead of failing.
pub fn parse_numeric_token(token: &str) -> Option<f64> {
    let cleaned: String = token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let dots = cleaned.matches('.').count();
    let commas = cleaned.matches(',').count();
    let normalized = if dots >= 2 && commas == 0 {
        cleaned.replace('.', "")
    } else {
        cleaned.replace(',', "")
    };

    normalized.parse::<f64>().ok()
}

/// Round to two decimal places, the precision of every monetary field.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
