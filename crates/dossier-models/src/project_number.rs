//! Month-scoped project identifiers.
//!
//! A project number has the form `P_{YY}{MM}_{SEQ}`: two-digit year,
//! zero-padded month and a three-digit sequence that restarts at `001`
//! every calendar month.

use std::fmt;
use std::str::FromStr;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Largest sequence that fits the fixed three-digit field.
pub const MAX_SEQUENCE: u16 = 999;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectNumberError {
    #[error("Invalid project number format: {0}")]
    Format(String),

    #[error("Invalid month: {0}")]
    Month(u8),

    #[error("Sequence out of range (1-{max}): {0}", max = MAX_SEQUENCE)]
    Sequence(u16),
}

/// A calendar month in which project numbers share a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthScope {
    year: u8,
    month: u8,
}

impl MonthScope {
    pub fn new(year: u8, month: u8) -> Result<Self, ProjectNumberError> {
        if year > 99 {
            return Err(ProjectNumberError::Format(format!("year {} is not two digits", year)));
        }
        if !(1..=12).contains(&month) {
            return Err(ProjectNumberError::Month(month));
        }
        Ok(Self { year, month })
    }

    /// Scope containing the given date.
    pub fn of<D: Datelike>(date: &D) -> Self {
        Self {
            year: date.year().rem_euclid(100) as u8,
            month: date.month() as u8,
        }
    }

    pub fn year(&self) -> u8 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    /// Text every number in this scope starts with, e.g. `P_2401_`.
    pub fn prefix(&self) -> String {
        format!("P_{:02}{:02}_", self.year, self.month)
    }
}

/// A parsed `P_YYMM_SSS` project number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectNumber {
    scope: MonthScope,
    sequence: u16,
}

impl ProjectNumber {
    pub fn new(scope: MonthScope, sequence: u16) -> Result<Self, ProjectNumberError> {
        if sequence == 0 || sequence > MAX_SEQUENCE {
            return Err(ProjectNumberError::Sequence(sequence));
        }
        Ok(Self { scope, sequence })
    }

    /// The first number issued in a month.
    pub fn first_in(scope: MonthScope) -> Self {
        Self { scope, sequence: 1 }
    }

    pub fn scope(&self) -> MonthScope {
        self.scope
    }

    pub fn sequence(&self) -> u16 {
        self.sequence
    }

    /// Following number in the same month, `None` once the field is full.
    pub fn next(&self) -> Option<Self> {
        if self.sequence >= MAX_SEQUENCE {
            return None;
        }
        Some(Self {
            scope: self.scope,
            sequence: self.sequence + 1,
        })
    }
}

impl fmt::Display for ProjectNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.scope.prefix(), self.sequence)
    }
}

impl FromStr for ProjectNumber {
    type Err = ProjectNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_err = || ProjectNumberError::Format(s.to_string());

        let rest = s.strip_prefix("P_").ok_or_else(format_err)?;
        let (scope_part, seq_part) = rest.split_once('_').ok_or_else(format_err)?;

        if scope_part.len() != 4 || !scope_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format_err());
        }
        if seq_part.len() != 3 || !seq_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format_err());
        }

        let year: u8 = scope_part[..2].parse().map_err(|_| format_err())?;
        let month: u8 = scope_part[2..].parse().map_err(|_| format_err())?;
        let sequence: u16 = seq_part.parse().map_err(|_| format_err())?;

        Self::new(MonthScope::new(year, month)?, sequence)
    }
}
