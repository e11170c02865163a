//! Core type definitions for study-tracker

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Timestamp layout used in the store and in every export
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Store-assigned identifier of a subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(pub i64);

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SubjectId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(SubjectId)
    }
}

/// Start month of a subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

const PT_NAMES: [&str; 12] = [
    "janeiro", "fevereiro", "março", "abril", "maio", "junho", "julho", "agosto", "setembro",
    "outubro", "novembro", "dezembro",
];

const EN_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

impl Month {
    /// All months in calendar order
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// 1-based month number
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    /// Month from a 1-based number
    pub fn from_number(n: u32) -> Option<Self> {
        Self::ALL.get(n.checked_sub(1)? as usize).copied()
    }

    /// Canonical (stored) name: lower-case Portuguese
    pub fn canonical(self) -> &'static str {
        PT_NAMES[self as usize]
    }

    /// English lower-case name
    pub fn english(self) -> &'static str {
        EN_NAMES[self as usize]
    }

    /// Parse a month name, case-insensitive. Accepts Portuguese names (with or
    /// without the cedilla in "março"), English names and numbers 1-12.
    pub fn parse(input: &str) -> Option<Self> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        if let Ok(n) = needle.parse::<u32>() {
            return Self::from_number(n);
        }
        let needle = if needle == "marco" { "março".to_string() } else { needle };
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.canonical() == needle || m.english() == needle)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical())
    }
}

impl FromStr for Month {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Month::parse(s).ok_or_else(|| format!("Unknown month: {}", s.trim()))
    }
}

/// A set of months picked by the user, e.g. `janeiro,fevereiro` or `março-junho`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSelection(Vec<Month>);

impl MonthSelection {
    /// Parse a comma list or an inclusive range. Ranges must go forward in the year.
    pub fn parse(input: &str) -> Result<Self, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err("Empty month selection".to_string());
        }

        if let Some((start, end)) = input.split_once('-') {
            let start: Month = start.parse()?;
            let end: Month = end.parse()?;
            if start > end {
                return Err(format!("Range {} - {} runs backwards", start, end));
            }
            let months = Month::ALL
                .iter()
                .copied()
                .filter(|m| *m >= start && *m <= end)
                .collect();
            return Ok(Self(months));
        }

        let mut months = Vec::new();
        for part in input.split(',') {
            let month: Month = part.parse()?;
            if !months.contains(&month) {
                months.push(month);
            }
        }
        Ok(Self(months))
    }

    pub fn contains(&self, month: Month) -> bool {
        self.0.contains(&month)
    }

    pub fn months(&self) -> &[Month] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_parse_case_insensitive() {
        assert_eq!(Month::parse("Janeiro"), Some(Month::January));
        assert_eq!(Month::parse("  MARÇO "), Some(Month::March));
        assert_eq!(Month::parse("marco"), Some(Month::March));
        assert_eq!(Month::parse("December"), Some(Month::December));
        assert_eq!(Month::parse("7"), Some(Month::July));
    }

    #[test]
    fn test_month_parse_rejects_unknown() {
        assert_eq!(Month::parse(""), None);
        assert_eq!(Month::parse("13"), None);
        assert_eq!(Month::parse("0"), None);
        assert_eq!(Month::parse("smarch"), None);
    }

    #[test]
    fn test_month_canonical_roundtrip() {
        for month in Month::ALL {
            assert_eq!(Month::parse(month.canonical()), Some(month));
            assert_eq!(Month::from_number(month.number()), Some(month));
        }
    }

    #[test]
    fn test_selection_list() {
        let sel = MonthSelection::parse("janeiro, fevereiro,janeiro").unwrap();
        assert_eq!(sel.months(), &[Month::January, Month::February]);
    }

    #[test]
    fn test_selection_range() {
        let sel = MonthSelection::parse("março-junho").unwrap();
        assert_eq!(
            sel.months(),
            &[Month::March, Month::April, Month::May, Month::June]
        );
        assert!(!sel.contains(Month::July));
    }

    #[test]
    fn test_selection_errors() {
        assert!(MonthSelection::parse("").is_err());
        assert!(MonthSelection::parse("junho-março").is_err());
        assert!(MonthSelection::parse("janeiro,nope").is_err());
    }

    #[test]
    fn test_subject_id_parse() {
        assert_eq!("17".parse::<SubjectId>().unwrap(), SubjectId(17));
        assert!("x".parse::<SubjectId>().is_err());
    }
}
