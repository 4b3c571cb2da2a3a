//! Clinical session data models.
//!
//! - `SessionCandidate`: one spreadsheet row after extraction (count is always 1).
//! - `ClinicalSession`: the canonical, count-aggregated record that is priced and stored.
//! - `ClinicalSessionRecord`: a stored session read back with its id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Clinic a session was held at, parsed from the appointment title.
///
/// Declaration order matters: the extractor maps captured codes to the first
/// variant whose code matches, and `Tlv` is the fallback.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClinicType {
    Tlv,
    Jlm,
    Hfa,
    Bsh,
    Ntn,
    Rhv,
    Ptk,
    Onl,
}

impl ClinicType {
    pub const ALL: [ClinicType; 8] = [
        ClinicType::Tlv,
        ClinicType::Jlm,
        ClinicType::Hfa,
        ClinicType::Bsh,
        ClinicType::Ntn,
        ClinicType::Rhv,
        ClinicType::Ptk,
        ClinicType::Onl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClinicType::Tlv => "TLV",
            ClinicType::Jlm => "JLM",
            ClinicType::Hfa => "HFA",
            ClinicType::Bsh => "BSH",
            ClinicType::Ntn => "NTN",
            ClinicType::Rhv => "RHV",
            ClinicType::Ptk => "PTK",
            ClinicType::Onl => "ONL",
        }
    }
}

impl Default for ClinicType {
    fn default() -> Self {
        ClinicType::ALL[0]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MeetingType {
    Intake,
    FollowUp,
}

impl MeetingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingType::Intake => "intake",
            MeetingType::FollowUp => "follow_up",
        }
    }
}

impl Default for MeetingType {
    fn default() -> Self {
        MeetingType::FollowUp
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ShowStatus {
    Show,
    NoShow,
}

impl ShowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShowStatus::Show => "show",
            ShowStatus::NoShow => "no_show",
        }
    }
}

impl Default for ShowStatus {
    fn default() -> Self {
        ShowStatus::Show
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ServiceAgeGroup {
    Adult,
    Child,
}

impl ServiceAgeGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceAgeGroup::Adult => "adult",
            ServiceAgeGroup::Child => "child",
        }
    }
}

impl Default for ServiceAgeGroup {
    fn default() -> Self {
        ServiceAgeGroup::Adult
    }
}

/// A session extracted from a single spreadsheet row, before aggregation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionCandidate {
    pub staff_id: String,
    pub clinic_type: ClinicType,
    pub meeting_type: MeetingType,
    pub show_status: ShowStatus,
    pub service_age_group: ServiceAgeGroup,
    pub count: i64,
    pub duration_minutes: u32,
    pub month: u32,
    pub year: i32,
}

/// Canonical session: identical candidates merged with their counts summed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalSession {
    pub staff_id: String,
    pub clinic_type: ClinicType,
    pub meeting_type: MeetingType,
    pub show_status: ShowStatus,
    /// Absent in older rows; treated as adult.
    #[serde(default)]
    pub service_age_group: ServiceAgeGroup,
    pub count: i64,
    pub duration_minutes: u32,
    pub month: u32,
    pub year: i32,
}

impl From<SessionCandidate> for ClinicalSession {
    fn from(candidate: SessionCandidate) -> Self {
        Self {
            staff_id: candidate.staff_id,
            clinic_type: candidate.clinic_type,
            meeting_type: candidate.meeting_type,
            show_status: candidate.show_status,
            service_age_group: candidate.service_age_group,
            count: candidate.count,
            duration_minutes: candidate.duration_minutes,
            month: candidate.month,
            year: candidate.year,
        }
    }
}

/// A clinical session as stored, with the id assigned on insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalSessionRecord {
    pub id: String,
    #[serde(flatten)]
    pub session: ClinicalSession,
    pub created_at: DateTime<Utc>,
}
