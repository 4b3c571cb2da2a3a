//! Spreadsheet cells, rows and the header aliases the extractor understands.
//!
//! Exports come from several scheduling systems and UI languages, so every
//! logical field is looked up through an ordered list of header spellings and
//! the first present, non-empty value wins.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.trim().is_empty(),
            CellValue::Number(value) => value.is_nan(),
            CellValue::DateTime(_) => false,
        }
    }

    /// Trimmed textual rendering; `None` for empty cells.
    pub fn as_text(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        match self {
            CellValue::Empty => None,
            CellValue::Text(text) => Some(text.trim().to_string()),
            CellValue::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                Some(format!("{}", *value as i64))
            }
            CellValue::Number(value) => Some(value.to_string()),
            CellValue::DateTime(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }

    /// Numeric value of the cell, parsing numeric text.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) if value.is_finite() => Some(*value),
            CellValue::Text(text) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite()),
            _ => None,
        }
    }

    /// Date/time value of the cell, parsing common textual layouts.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::DateTime(dt) => Some(*dt),
            CellValue::Text(text) => parse_datetime_text(text.trim()),
            _ => None,
        }
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

fn parse_datetime_text(text: &str) -> Option<NaiveDateTime> {
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return Some(dt);
    }
    // Bare times only make sense relative to each other; anchor them on a fixed day.
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(text, format).ok())
        .and_then(|time| NaiveDate::from_ymd_opt(1970, 1, 1).map(|day| day.and_time(time)))
}

/// One decoded spreadsheet row: header -> cell.
pub type RawSpreadsheetRow = HashMap<String, CellValue>;

pub mod aliases {
    pub const STAFF_RESOURCE: &[&str] = &[
        "משאב",
        "משאבים",
        "מטפל",
        "שם מטפל",
        "Resource",
        "Resources",
        "Therapist",
    ];
    pub const STAFF_CREATOR: &[&str] =
        &["שם היוצר", "נוצר על ידי", "יוצר", "Creator Name", "Created By"];
    pub const TITLE: &[&str] = &["כותרת", "שם מלא", "נושא", "Title", "Full Name", "Subject"];
    pub const SERVICE_TYPE: &[&str] = &[
        "סוג שירות",
        "סוג פגישה",
        "שירות",
        "Service Type",
        "Meeting Type",
        "Service",
    ];
    pub const STATUS: &[&str] = &["סטטוס", "מצב", "סטטוס פגישה", "Status", "Meeting Status"];
    pub const DURATION: &[&str] = &[
        "משך",
        "משך (דקות)",
        "משך בדקות",
        "Duration",
        "Duration (min)",
        "Minutes",
    ];
    pub const START_TIME: &[&str] = &["שעת התחלה", "התחלה", "מועד התחלה", "Start", "Start Time"];
    pub const END_TIME: &[&str] = &["שעת סיום", "סיום", "מועד סיום", "End", "End Time"];
}

/// First present, non-empty value among `headers`, as trimmed text.
pub fn first_text(row: &RawSpreadsheetRow, headers: &[&str]) -> Option<String> {
    headers
        .iter()
        .filter_map(|header| row.get(*header))
        .find_map(CellValue::as_text)
}

/// First numeric value among `headers` that `accept` allows; rejected
/// columns fall through to the next alias.
pub fn first_number_where(
    row: &RawSpreadsheetRow,
    headers: &[&str],
    accept: impl Fn(f64) -> bool,
) -> Option<f64> {
    headers
        .iter()
        .filter_map(|header| row.get(*header))
        .filter_map(CellValue::as_number)
        .find(|value| accept(*value))
}

/// First cell among `headers` that parses as a date/time.
pub fn first_datetime(row: &RawSpreadsheetRow, headers: &[&str]) -> Option<NaiveDateTime> {
    headers
        .iter()
        .filter_map(|header| row.get(*header))
        .find_map(CellValue::as_datetime)
}
