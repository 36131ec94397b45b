use crate::schema::{CellStatus, CellValue};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Stand-in for an exact-zero denominator in growth and composition shares.
pub const DIVISION_EPSILON: f64 = 1e-9;

/// Divides, substituting `epsilon` when the denominator is exactly zero.
///
/// The substitution only keeps the division defined; for any realistic
/// non-zero denominator the result is the plain quotient.
pub fn safe_divide(numerator: f64, denominator: f64, epsilon: f64) -> f64 {
    let divisor = if denominator == 0.0 { epsilon } else { denominator };
    numerator / divisor
}

/// Saturates an overflowed result at `±f64::MAX`; NaN becomes zero.
pub fn clamp_finite(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-f64::MAX, f64::MAX)
    }
}

/// A cell after numeric coercion. `value` is always finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coerced {
    pub value: f64,
    pub status: CellStatus,
}

impl Coerced {
    fn numeric(value: f64) -> Self {
        Self {
            value,
            status: CellStatus::Numeric,
        }
    }

    fn zero(status: CellStatus) -> Self {
        Self { value: 0.0, status }
    }
}

/// Coerces a raw cell to a number. Anything that is not a finite number becomes zero.
pub fn coerce_cell(cell: &CellValue) -> Coerced {
    match cell {
        CellValue::Number(v) if v.is_finite() => Coerced::numeric(*v),
        CellValue::Number(_) => Coerced::zero(CellStatus::Unparseable),
        CellValue::Empty => Coerced::zero(CellStatus::Blank),
        CellValue::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Coerced::zero(CellStatus::Blank);
            }
            match trimmed.parse::<f64>() {
                Ok(v) if v.is_finite() => Coerced::numeric(v),
                _ => Coerced::zero(CellStatus::Unparseable),
            }
        }
    }
}

/// Folds a label for matching: NFKC, lowercase, diacritics stripped, whitespace collapsed.
pub fn fold_label(label: &str) -> String {
    let lowered = label.nfkc().collect::<String>().to_lowercase();
    let stripped: String = lowered
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| if c == 'đ' { 'd' } else { c })
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Formats a value with no decimals and comma thousands separators.
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value < 0.0 && digits != "0" {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Two decimals with a percent suffix.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}
