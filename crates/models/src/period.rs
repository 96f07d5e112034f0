//! Calendar-month periods exchanged as `MM-YYYY` and stored as the first day of the month.

use chrono::{Datelike, NaiveDate};

use crate::errors::ModelError;

/// Textual layout accepted on the wire.
pub const MONTH_FORMAT: &str = "MM-YYYY";

/// Parse a strict `MM-YYYY` string (two-digit month, four-digit year).
pub fn parse_month(s: &str) -> Result<NaiveDate, ModelError> {
    let invalid = || ModelError::Validation(format!("`{s}` is not a {MONTH_FORMAT} month"));
    let bytes = s.as_bytes();
    if bytes.len() != 7 || bytes[2] != b'-' {
        return Err(invalid());
    }
    let (mm, yyyy) = (&s[..2], &s[3..]);
    if !mm.bytes().chain(yyyy.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let month: u32 = mm.parse().map_err(|_| invalid())?;
    let year: i32 = yyyy.parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)
}

pub fn format_month(date: NaiveDate) -> String {
    format!("{:02}-{:04}", date.month(), date.year())
}

/// Serde adapter for a required month column.
pub mod month {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_month(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_month(&raw).map_err(D::Error::custom)
    }
}

/// Serde adapter for an optional month column; `null` and `""` both mean absent.
pub mod month_opt {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&super::format_month(*d)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(raw) if !raw.is_empty() => super::parse_month(&raw).map(Some).map_err(D::Error::custom),
            _ => Ok(None),
        }
    }
}
