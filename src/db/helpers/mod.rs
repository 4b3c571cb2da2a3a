use std::convert::TryFrom;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};

use crate::db::models::{ClinicType, MeetingType, ServiceAgeGroup, ShowStatus};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn to_u32(value: i64, field: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| anyhow!("{field} contains out-of-range value {value}"))
}

pub fn to_i32(value: i64, field: &str) -> Result<i32> {
    i32::try_from(value).map_err(|_| anyhow!("{field} contains out-of-range value {value}"))
}

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).with_context(|| format!("failed to parse {field}"))
}

pub fn parse_clinic_type(value: &str) -> Result<ClinicType> {
    ClinicType::ALL
        .into_iter()
        .find(|clinic| clinic.as_str() == value)
        .ok_or_else(|| anyhow!("unknown clinic type {value}"))
}

pub fn parse_meeting_type(value: &str) -> Result<MeetingType> {
    match value {
        "intake" => Ok(MeetingType::Intake),
        "follow_up" => Ok(MeetingType::FollowUp),
        other => Err(anyhow!("unknown meeting type {other}")),
    }
}

pub fn parse_show_status(value: &str) -> Result<ShowStatus> {
    match value {
        "show" => Ok(ShowStatus::Show),
        "no_show" => Ok(ShowStatus::NoShow),
        other => Err(anyhow!("unknown show status {other}")),
    }
}

pub fn parse_age_group(value: &str) -> Result<ServiceAgeGroup> {
    match value {
        "adult" => Ok(ServiceAgeGroup::Adult),
        "child" => Ok(ServiceAgeGroup::Child),
        other => Err(anyhow!("unknown service age group {other}")),
    }
}
