use std::fmt;

use super::date;
use crate::errors::{LedgerError, Result};

/// Field delimiter shared by row and file encodings.
pub const DELIMITER: char = '\t';

/// Number of fields a row encodes to.
pub const FIELD_COUNT: usize = 4;

/// A single dated, categorised money movement.
///
/// All fields are kept as the text the user entered. Rows are replaced rather
/// than edited in place, so accessors never mutate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    date: String,
    category: String,
    name: String,
    amount: String,
}

impl Row {
    pub fn new(
        date: impl Into<String>,
        category: impl Into<String>,
        name: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            category: category.into(),
            name: name.into(),
            amount: amount.into(),
        }
    }

    /// Validates raw host input and builds a row from it.
    ///
    /// The amount text is stripped of everything but digits, sign and decimal
    /// point before being checked, mirroring what a numeric text field keeps.
    pub fn from_input(date: &str, category: &str, name: &str, amount: &str) -> Result<Self> {
        for (label, value) in [
            ("date", date),
            ("category", category),
            ("name", name),
            ("amount", amount),
        ] {
            if value.contains([DELIMITER, '\n', '\r']) {
                return Err(LedgerError::InvalidInput(format!(
                    "{label} may not contain a tab or line break"
                )));
            }
        }
        if date::parse_day(date).is_none() {
            return Err(LedgerError::InvalidInput(format!(
                "date `{date}` has no day of month"
            )));
        }
        let amount = clean_amount(amount);
        parse_amount(&amount)?;
        Ok(Self::new(date.trim(), category.trim(), name.trim(), amount))
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The amount exactly as stored.
    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn amount_value(&self) -> Result<f64> {
        parse_amount(&self.amount)
    }

    pub fn day(&self) -> Option<u32> {
        date::parse_day(&self.date)
    }

    /// Copy of this row filed under another category.
    pub fn with_category(&self, category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..self.clone()
        }
    }

    pub fn encode(&self) -> String {
        [
            self.date.as_str(),
            self.category.as_str(),
            self.name.as_str(),
            self.amount.as_str(),
        ]
        .join(DELIMITER.to_string().as_str())
    }

    pub fn decode(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split(DELIMITER).collect();
        match fields.as_slice() {
            [date, category, name, amount] => Ok(Self::new(*date, *category, *name, *amount)),
            _ => Err(LedgerError::MalformedRow {
                expected: FIELD_COUNT,
                found: fields.len(),
            }),
        }
    }
}

impl Default for Row {
    fn default() -> Self {
        Self::new(date::today(), "", "New", "0")
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {}",
            self.date, self.category, self.name, self.amount
        )
    }
}

fn parse_amount(text: &str) -> Result<f64> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| LedgerError::InvalidAmount(text.to_string()))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LedgerError::InvalidAmount(text.to_string()))
    }
}

fn clean_amount(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.'))
        .collect()
}
