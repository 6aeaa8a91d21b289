// src/common/period.rs

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::common::error::AppError;

/// A billing period: one calendar month, rendered as `YYYY-MM`.
///
/// The zero-padded text form is what gets persisted, so lexicographic
/// comparison of the stored strings equals chronological comparison. The
/// derived `Ord` on (year, month) agrees with that string ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self, AppError> {
        if !(1..=12).contains(&month) || !(1000..=9999).contains(&year) {
            return Err(AppError::bad_request("Invalid period format"));
        }
        Ok(Self { year, month })
    }

    /// Current month on the local clock.
    pub fn current() -> Self {
        let now = Local::now();
        Self {
            year: now.year(),
            month: now.month(),
        }
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// All periods from `from` to `to`, inclusive. Empty when `from > to`.
    pub fn range_inclusive(from: Period, to: Period) -> Vec<Period> {
        let mut out = Vec::new();
        let mut p = from;
        while p <= to {
            out.push(p);
            p = p.next();
        }
        out
    }

    /// The last `n` periods ending at the current month, oldest first.
    pub fn last_n_months(n: u32) -> Vec<Period> {
        let mut p = Period::current();
        let mut out = Vec::new();
        for _ in 0..n {
            out.push(p);
            p = p.prev();
        }
        out.reverse();
        out
    }

    /// Invoice number for the `seq`-th invoice of this period:
    /// `INV-YYYYMM-NNNN`.
    pub fn invoice_no(&self, seq: i64) -> String {
        format!("INV-{:04}{:02}-{:04}", self.year, self.month, seq)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = AppError;

    // Exactly `YYYY-MM`, MM in 01..=12. No day, no timezone, no slack.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(AppError::bad_request("Invalid period format"));
        }
        if !bytes[..4].iter().all(u8::is_ascii_digit)
            || !bytes[5..].iter().all(u8::is_ascii_digit)
        {
            return Err(AppError::bad_request("Invalid period format"));
        }
        let year: i32 = s[..4]
            .parse()
            .map_err(|_| AppError::bad_request("Invalid period format"))?;
        let month: u32 = s[5..7]
            .parse()
            .map_err(|_| AppError::bad_request("Invalid period format"))?;
        Self::new(year, month)
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_periods() {
        let p: Period = "2025-01".parse().unwrap();
        assert_eq!(p.to_string(), "2025-01");
        assert!("2024-12".parse::<Period>().is_ok());
        assert!("1999-06".parse::<Period>().is_ok());
    }

    #[test]
    fn rejects_malformed_periods() {
        for bad in [
            "2025-1", "2025-00", "2025-13", "2025/01", "2025-011", "25-01", "2025-01-15", "",
            "abcd-ef", "2025-aa", "2025 01",
        ] {
            assert!(bad.parse::<Period>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn rolls_year_at_boundaries() {
        let jan: Period = "2025-01".parse().unwrap();
        assert_eq!(jan.prev().to_string(), "2024-12");
        let dec: Period = "2024-12".parse().unwrap();
        assert_eq!(dec.next().to_string(), "2025-01");
        let jun: Period = "2025-06".parse().unwrap();
        assert_eq!(jun.prev().to_string(), "2025-05");
        assert_eq!(jun.next().to_string(), "2025-07");
    }

    #[test]
    fn ordering_matches_string_ordering() {
        let mut periods: Vec<Period> = ["2025-02", "2024-12", "2025-01", "2024-02", "2024-11"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        periods.sort();
        let as_strings: Vec<String> = periods.iter().map(|p| p.to_string()).collect();
        let mut sorted_strings = as_strings.clone();
        sorted_strings.sort();
        assert_eq!(as_strings, sorted_strings);
    }

    #[test]
    fn range_walks_months_inclusive() {
        let from: Period = "2024-11".parse().unwrap();
        let to: Period = "2025-02".parse().unwrap();
        let range: Vec<String> = Period::range_inclusive(from, to)
            .iter()
            .map(|p| p.to_string())
            .collect();
        assert_eq!(range, vec!["2024-11", "2024-12", "2025-01", "2025-02"]);
        assert!(Period::range_inclusive(to, from).is_empty());
    }

    #[test]
    fn invoice_no_format() {
        let p: Period = "2025-01".parse().unwrap();
        assert_eq!(p.invoice_no(3), "INV-202501-0003");
        assert_eq!(p.invoice_no(12), "INV-202501-0012");
    }

    #[test]
    fn serde_round_trip_is_the_string_form() {
        let p: Period = "2025-03".parse().unwrap();
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"2025-03\"");
        let back: Period = serde_json::from_str("\"2025-03\"").unwrap();
        assert_eq!(back, p);
        assert!(serde_json::from_str::<Period>("\"2025-3\"").is_err());
    }
}
