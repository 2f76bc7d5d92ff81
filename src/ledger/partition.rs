use std::{fmt, str::FromStr};

use crate::errors::LedgerError;

/// One of the two named row groupings of a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Partition {
    Fixed,
    Variable,
}

impl Partition {
    pub const ALL: [Partition; 2] = [Partition::Fixed, Partition::Variable];

    /// Tag written in front of each row line of a `.mbf` file.
    pub fn tag(self) -> &'static str {
        match self {
            Partition::Fixed => "fixed",
            Partition::Variable => "variable",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "fixed" => Some(Partition::Fixed),
            "variable" => Some(Partition::Variable),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Partition::Fixed => "Fixed",
            Partition::Variable => "Variable",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Partition {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Partition::from_tag(value.trim().to_ascii_lowercase().as_str()).ok_or_else(|| {
            LedgerError::InvalidInput(format!(
                "unknown partition `{value}` (expected fixed or variable)"
            ))
        })
    }
}
