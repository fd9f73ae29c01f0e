use thiserror::Error;

use crate::fetcher::{Record, FIELD_DEBT, FIELD_GROSS_PROFIT};

#[derive(Debug, Error)]
pub enum CalculationError {
    #[error("field '{field}' does not parse to an amount: '{value}'")]
    Unparseable { field: &'static str, value: String },

    #[error("gross profit is zero, margin is undefined")]
    ZeroGrossProfit,
}

/// Parses a currency-formatted string into an amount.
///
/// Everything that is not a digit, comma, or period is stripped first.
/// The decimal separator is then resolved:
/// - both separators present: the rightmost one is the decimal separator,
///   the other marks thousands ("1.234,56" and "1,234.56" both work);
/// - one separator kind, repeated: thousands marks ("1.000.000");
/// - one separator, single occurrence: decimal separator ("12,5", "12.5").
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    if cleaned.is_empty() || !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(comma), Some(dot)) => {
            if comma > dot {
                cleaned.replace('.', "").replace(',', ".")
            } else {
                cleaned.replace(',', "")
            }
        }
        (Some(_), None) => {
            if cleaned.matches(',').count() > 1 {
                cleaned.replace(',', "")
            } else {
                cleaned.replace(',', ".")
            }
        }
        (None, Some(_)) => {
            if cleaned.matches('.').count() > 1 {
                cleaned.replace('.', "")
            } else {
                cleaned
            }
        }
        (None, None) => cleaned,
    };

    normalized.parse::<f64>().ok()
}

/// `(gross - debt) / gross * 100`, rounded to one decimal place.
/// Deterministic and recomputed on every render; never persisted.
pub fn margin(record: &Record) -> Result<f64, CalculationError> {
    let gross = parse_amount(&record.gross_profit).ok_or_else(|| {
        CalculationError::Unparseable {
            field: FIELD_GROSS_PROFIT,
            value: record.gross_profit.clone(),
        }
    })?;
    let debt = parse_amount(&record.debt).ok_or_else(|| CalculationError::Unparseable {
        field: FIELD_DEBT,
        value: record.debt.clone(),
    })?;

    if gross == 0.0 {
        return Err(CalculationError::ZeroGrossProfit);
    }

    let pct = (gross - debt) / gross * 100.0;
    Ok((pct * 10.0).round() / 10.0)
}
