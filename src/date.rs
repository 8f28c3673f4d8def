//! Calendar dates as written in import files and stored on records.

use crate::schema::split_date;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A day/month/year triple.
///
/// Import files use `DD/MM/YYYY`; records store and serialize `YYYY-MM-DD`.
/// Only the shape is checked, so a value such as `31/02/2024` is kept as
/// written; [`RecordDate::to_naive`] tells whether it is a real calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordDate {
    year: u16,
    month: u8,
    day: u8,
}

impl RecordDate {
    pub const fn new(year: u16, month: u8, day: u8) -> Self {
        RecordDate { year, month, day }
    }

    /// Reads the `DD/MM/YYYY` import form.
    pub fn from_display(raw: &str) -> Option<Self> {
        let (day, month, year) = split_date(raw)?;
        Some(RecordDate {
            year: year.parse().ok()?,
            month: month.parse().ok()?,
            day: day.parse().ok()?,
        })
    }

    /// Reads the `YYYY-MM-DD` storage form.
    pub fn from_iso(raw: &str) -> Option<Self> {
        let mut parts = raw.split('-');
        let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
        let digits = |s: &str, n: usize| s.len() == n && s.bytes().all(|b| b.is_ascii_digit());
        if parts.next().is_some() || !digits(year, 4) || !digits(month, 2) || !digits(day, 2) {
            return None;
        }
        Some(RecordDate {
            year: year.parse().ok()?,
            month: month.parse().ok()?,
            day: day.parse().ok()?,
        })
    }

    /// The `DD/MM/YYYY` import form.
    pub fn to_display(&self) -> String {
        format!("{:02}/{:02}/{:04}", self.day, self.month, self.year)
    }

    /// The calendar day, if the triple names one.
    pub fn to_naive(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(i32::from(self.year), u32::from(self.month), u32::from(self.day))
    }
}

impl From<NaiveDate> for RecordDate {
    fn from(date: NaiveDate) -> Self {
        use chrono::Datelike;
        RecordDate {
            year: date.year() as u16,
            month: date.month() as u8,
            day: date.day() as u8,
        }
    }
}

impl fmt::Display for RecordDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl Serialize for RecordDate {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RecordDate {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RecordDate::from_iso(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_to_iso() {
        let d = RecordDate::from_display("01/03/2024").unwrap();
        assert_eq!(d.to_string(), "2024-03-01");
        assert_eq!(d.to_display(), "01/03/2024");
    }

    #[test]
    fn test_format_only_dates_survive() {
        let d = RecordDate::from_display("31/02/2024").unwrap();
        assert_eq!(d.to_string(), "2024-02-31");
        assert!(d.to_naive().is_none());
    }

    #[test]
    fn test_rejects_wrong_shape() {
        assert!(RecordDate::from_display("2024-03-01").is_none());
        assert!(RecordDate::from_iso("01/03/2024").is_none());
        assert!(RecordDate::from_iso("2024-3-1").is_none());
    }

    #[test]
    fn test_iso_round_trip() {
        let d = RecordDate::from_iso("2023-12-25").unwrap();
        assert_eq!(d.to_string(), "2023-12-25");
        assert_eq!(
            d.to_naive(),
            NaiveDate::from_ymd_opt(2023, 12, 25)
        );
    }

    #[test]
    fn test_serde_uses_iso() {
        let d = RecordDate::from_display("05/06/2024").unwrap();
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"2024-06-05\"");
    }
}
