//! Text encoding of a ledger (`.mbf`).
//!
//! ```text
//! <budget>
//! <category>\t<category>\t...\t
//! fixed\t<date>\t<category>\t<name>\t<amount>
//! variable\t<date>\t<category>\t<name>\t<amount>
//! ```
//!
//! Decoding is forgiving: a corrupt budget line reads as 0, rows that do not
//! split into four fields are dropped, and lines with an unknown tag are
//! ignored. None of these stop the rest of the file from loading.

use std::fmt;

use tracing::{debug, warn};

use crate::{
    errors::LedgerError,
    ledger::{row::DELIMITER, CategoryList, Ledger, Partition, Row},
};

const LINE_SEPARATOR: &str = "\n";

/// A problem recovered from while decoding.
#[derive(Debug)]
pub struct LoadWarning {
    /// 1-based line number in the decoded text.
    pub line: usize,
    pub error: LedgerError,
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.error)
    }
}

/// Outcome of decoding a ledger.
#[derive(Debug)]
pub struct LoadReport {
    pub ledger: Ledger,
    pub warnings: Vec<LoadWarning>,
    /// Row-section lines ignored because of an unrecognised tag.
    pub skipped_lines: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    ExpectBudget,
    ExpectCategories,
    ExpectRows,
}

pub fn encode(ledger: &Ledger) -> String {
    let mut out = String::new();
    push_line(&mut out, &ledger.budget().to_string());

    let mut categories = String::new();
    for name in ledger.categories().iter() {
        let cleaned: String = name
            .chars()
            .filter(|c| !matches!(c, '\t' | '\r' | '\n'))
            .collect();
        if cleaned.is_empty() {
            continue;
        }
        categories.push_str(&cleaned);
        categories.push(DELIMITER);
    }
    if categories.is_empty() {
        // a lone tab keeps the line from reading as blank
        categories.push(DELIMITER);
    }
    push_line(&mut out, &categories);

    for (partition, row) in ledger.iter_rows() {
        push_line(&mut out, &format!("{}{}{}", partition.tag(), DELIMITER, row.encode()));
    }
    out
}

/// Decodes `text`, falling back to the built-in default categories when the
/// text has no category line.
pub fn decode(text: &str) -> Ledger {
    decode_with_report(text, &CategoryList::with_defaults()).ledger
}

pub fn decode_with_report(text: &str, defaults: &CategoryList) -> LoadReport {
    let mut state = DecodeState::ExpectBudget;
    let mut budget = 0.0;
    let mut categories = defaults.clone();
    let mut fixed = Vec::new();
    let mut variable = Vec::new();
    let mut warnings = Vec::new();
    let mut skipped_lines = 0;

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        if is_blank(line) {
            continue;
        }
        match state {
            DecodeState::ExpectBudget => {
                budget = match parse_budget(line) {
                    Ok(value) => value,
                    Err(error) => {
                        warn!(line = line_no, %error, "budget line unreadable; using 0");
                        warnings.push(LoadWarning {
                            line: line_no,
                            error,
                        });
                        0.0
                    }
                };
                state = DecodeState::ExpectCategories;
            }
            DecodeState::ExpectCategories => {
                categories = CategoryList::from_names(line.split(DELIMITER));
                state = DecodeState::ExpectRows;
            }
            DecodeState::ExpectRows => {
                let (tag, rest) = match line.split_once(DELIMITER) {
                    Some((tag, rest)) => (tag, Some(rest)),
                    None => (line, None),
                };
                let Some(partition) = Partition::from_tag(tag) else {
                    debug!(line = line_no, tag, "skipping line with unknown tag");
                    skipped_lines += 1;
                    continue;
                };
                let decoded = match rest {
                    Some(rest) => Row::decode(rest),
                    None => Err(LedgerError::MalformedRow {
                        expected: crate::ledger::row::FIELD_COUNT,
                        found: 0,
                    }),
                };
                match decoded {
                    Ok(row) => match partition {
                        Partition::Fixed => fixed.push(row),
                        Partition::Variable => variable.push(row),
                    },
                    Err(error) => {
                        warn!(line = line_no, %partition, %error, "dropping malformed row");
                        warnings.push(LoadWarning {
                            line: line_no,
                            error,
                        });
                    }
                }
            }
        }
    }

    LoadReport {
        ledger: Ledger::from_parts(budget, categories, fixed, variable),
        warnings,
        skipped_lines,
    }
}

fn parse_budget(line: &str) -> Result<f64, LedgerError> {
    let trimmed = line.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value.abs()),
        _ => Err(LedgerError::InvalidBudgetLine(trimmed.to_string())),
    }
}

/// Empty, or only whitespace other than the delimiter.
fn is_blank(line: &str) -> bool {
    line.chars().all(|c| c != DELIMITER && c.is_whitespace())
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push_str(LINE_SEPARATOR);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_do_not_advance_state() {
        let text = "\n   \n120.5\n\nRent\tFood\t\n\nfixed\tMay 1\tRent\tRent\t-100\n";
        let report = decode_with_report(text, &CategoryList::with_defaults());
        assert!(report.warnings.is_empty());
        assert_eq!(report.ledger.budget(), 120.5);
        assert_eq!(report.ledger.categories().to_vec(), vec!["Rent", "Food"]);
        assert_eq!(report.ledger.rows(Partition::Fixed).len(), 1);
    }

    #[test]
    fn lone_tab_category_line_is_an_empty_list() {
        let mut ledger = Ledger::with_categories(CategoryList::new());
        ledger.add_row(Partition::Fixed, Row::new("May 1", "", "x", "-1"));
        let text = encode(&ledger);
        assert_eq!(text, "0\n\t\nfixed\tMay 1\t\tx\t-1\n");
        let decoded = decode(&text);
        assert!(decoded.categories().is_empty());
        assert_eq!(decoded.rows(Partition::Fixed).len(), 1);
    }

    #[test]
    fn truncated_input_keeps_defaults() {
        let defaults = CategoryList::from_names(["Misc."]);
        let report = decode_with_report("75\n", &defaults);
        assert_eq!(report.ledger.budget(), 75.0);
        assert_eq!(report.ledger.categories(), &defaults);

        let report = decode_with_report("", &defaults);
        assert_eq!(report.ledger.budget(), 0.0);
        assert_eq!(report.ledger.categories(), &defaults);
    }

    #[test]
    fn negative_budget_is_made_positive() {
        assert_eq!(decode("-40\nA\t\n").budget(), 40.0);
    }

    #[test]
    fn unknown_tags_are_skipped_quietly() {
        let text = "10\nA\t\n@\nfixed\tMay 1\tA\tx\t-1\n!\nincome\tMay 2\tA\ty\t5\nvariable\tMay 3\tA\tz\t-2\n@\n";
        let report = decode_with_report(text, &CategoryList::new());
        assert!(report.warnings.is_empty());
        assert_eq!(report.skipped_lines, 4);
        assert_eq!(report.ledger.row_count(), 2);
    }

    #[test]
    fn bare_partition_tag_is_malformed() {
        let report = decode_with_report("10\nA\t\nfixed\n", &CategoryList::new());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].line, 3);
        assert!(report.ledger.is_empty());
    }

    #[test]
    fn category_tabs_are_stripped_on_write() {
        let mut ledger = Ledger::with_categories(CategoryList::from_names(["Eat\tOut", "Rent"]));
        ledger.set_budget(1.0);
        let text = encode(&ledger);
        assert_eq!(text.lines().nth(1), Some("EatOut\tRent\t"));
    }

    #[test]
    fn crlf_input_decodes() {
        let text = "50\r\nRent\t\r\nfixed\tMay 1\tRent\tRent\t-10\r\n";
        let ledger = decode(text);
        assert_eq!(ledger.budget(), 50.0);
        assert_eq!(ledger.rows(Partition::Fixed)[0].amount(), "-10");
    }
}
