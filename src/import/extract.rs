//! Row extraction: one spreadsheet row -> one session candidate.
//!
//! The detection pass and the commit pass share `run_pass`; they only differ in
//! what they keep, so the two can never disagree about which rows resolve.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::db::models::{
    ClinicType, MeetingType, ServiceAgeGroup, SessionCandidate, ShowStatus, StaffDirectoryEntry,
};
use crate::import::columns::{
    aliases, first_datetime, first_number_where, first_text, RawSpreadsheetRow,
};
use crate::import::config::ImportConfig;
use crate::log_debug;
use crate::matching::{resolve, NameVariationIndex};

const ENABLE_LOGS: bool = true;

/// `M`/`H` prefix, separator, 2–5 letter clinic code, separator.
static CLINIC_CODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[MH]{1,2}(?:\s*[-–_/|.:]\s*|\s+)([A-Z]{2,5})(?:\s*[-–_/|.:]\s*|\s+)")
        .expect("valid clinic code regex")
});

const INTAKE_KEYWORDS: &[&str] = &[
    "אינטייק",
    "אינטק",
    "קליטה",
    "הערכה ראשונית",
    "פגישה ראשונה",
    "intake",
    "initial",
    "first session",
];

const NO_SHOW_KEYWORDS: &[&str] = &[
    "לא הגיע",
    "לא הגיעה",
    "לא הופיע",
    "לא הופיעה",
    "ביטול",
    "בוטל",
    "בוטלה",
    "no show",
    "no-show",
    "noshow",
    "cancel",
    "missed",
];

/// Everything a row needs to be turned into a candidate.
pub struct ExtractionContext<'a> {
    pub directory: &'a [StaffDirectoryEntry],
    pub index: &'a NameVariationIndex,
    pub config: &'a ImportConfig,
    /// Raw spreadsheet name -> staff id, consulted before the matcher.
    pub overrides: Option<&'a HashMap<String, String>>,
    pub month: u32,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Extracted(SessionCandidate),
    Unresolved(String),
    MissingStaff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    /// Only collect staff names that could not be resolved.
    Detect,
    /// Collect candidates for aggregation.
    Commit,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionPass {
    pub candidates: Vec<SessionCandidate>,
    /// Distinct unresolved raw names, in first-seen order.
    pub unresolved: Vec<String>,
    pub rows_seen: usize,
    pub rows_skipped: usize,
}

/// Extract a candidate from one row, or `None` when the row has no resolvable
/// staff member.
pub fn extract_candidate(
    row: &RawSpreadsheetRow,
    ctx: &ExtractionContext<'_>,
) -> Option<SessionCandidate> {
    match classify_row(row, ctx) {
        RowOutcome::Extracted(candidate) => Some(candidate),
        RowOutcome::Unresolved(_) | RowOutcome::MissingStaff => None,
    }
}

pub fn classify_row(row: &RawSpreadsheetRow, ctx: &ExtractionContext<'_>) -> RowOutcome {
    let raw_name = match first_text(row, aliases::STAFF_RESOURCE)
        .or_else(|| first_text(row, aliases::STAFF_CREATOR))
    {
        Some(name) => name,
        None => return RowOutcome::MissingStaff,
    };

    let Some(staff_id) = resolve_staff(&raw_name, ctx) else {
        return RowOutcome::Unresolved(raw_name);
    };

    let title = first_text(row, aliases::TITLE).unwrap_or_default();
    let service = first_text(row, aliases::SERVICE_TYPE).unwrap_or_default();
    let status = first_text(row, aliases::STATUS).unwrap_or_default();

    RowOutcome::Extracted(SessionCandidate {
        staff_id,
        clinic_type: clinic_type_from_title(&title),
        meeting_type: meeting_type_from_label(&service),
        show_status: show_status_from_label(&status),
        service_age_group: ServiceAgeGroup::Adult,
        count: 1,
        duration_minutes: duration_minutes(row, ctx.config.default_duration_minutes),
        month: ctx.month,
        year: ctx.year,
    })
}

fn resolve_staff(raw_name: &str, ctx: &ExtractionContext<'_>) -> Option<String> {
    if let Some(staff_id) = ctx.overrides.and_then(|overrides| overrides.get(raw_name)) {
        log_debug!("Staff name '{raw_name}' mapped manually to {staff_id}");
        return Some(staff_id.clone());
    }
    resolve(raw_name, ctx.directory, ctx.index, &ctx.config.matcher).map(|found| found.staff_id)
}

/// Run extraction over every row.
pub fn run_pass(
    rows: &[RawSpreadsheetRow],
    ctx: &ExtractionContext<'_>,
    mode: ExtractionMode,
) -> ExtractionPass {
    let mut pass = ExtractionPass::default();
    let mut seen_unresolved = HashSet::new();

    for (row_number, row) in rows.iter().enumerate() {
        pass.rows_seen += 1;
        match classify_row(row, ctx) {
            RowOutcome::Extracted(candidate) => {
                if mode == ExtractionMode::Commit {
                    pass.candidates.push(candidate);
                }
            }
            RowOutcome::Unresolved(name) => {
                pass.rows_skipped += 1;
                if seen_unresolved.insert(name.clone()) {
                    log_debug!("Row {row_number}: unresolved staff name '{name}'");
                    pass.unresolved.push(name);
                }
            }
            RowOutcome::MissingStaff => {
                pass.rows_skipped += 1;
                log_debug!("Row {row_number}: no staff column, skipped");
            }
        }
    }

    pass
}

pub fn clinic_type_from_title(title: &str) -> ClinicType {
    CLINIC_CODE_RE
        .captures(title)
        .and_then(|captures| captures.get(1))
        .and_then(|code| {
            let code = code.as_str().to_uppercase();
            ClinicType::ALL
                .into_iter()
                .find(|clinic| code.contains(clinic.as_str()) || clinic.as_str().contains(&code))
        })
        .unwrap_or_default()
}

fn contains_any(label: &str, keywords: &[&str]) -> bool {
    let label = label.to_lowercase();
    keywords.iter().any(|keyword| label.contains(keyword))
}

pub fn meeting_type_from_label(label: &str) -> MeetingType {
    if contains_any(label, INTAKE_KEYWORDS) {
        MeetingType::Intake
    } else {
        MeetingType::FollowUp
    }
}

pub fn show_status_from_label(label: &str) -> ShowStatus {
    if contains_any(label, NO_SHOW_KEYWORDS) {
        ShowStatus::NoShow
    } else {
        ShowStatus::Show
    }
}

/// Duration column first, then end − start, then the configured default.
pub fn duration_minutes(row: &RawSpreadsheetRow, default_minutes: u32) -> u32 {
    if let Some(minutes) = first_number_where(row, aliases::DURATION, |value| {
        let minutes = value.round();
        minutes >= 1.0 && minutes <= u32::MAX as f64
    }) {
        return minutes.round() as u32;
    }

    let start = first_datetime(row, aliases::START_TIME);
    let end = first_datetime(row, aliases::END_TIME);
    if let (Some(start), Some(end)) = (start, end) {
        let minutes = ((end - start).num_seconds() as f64 / 60.0).round();
        if minutes >= 1.0 {
            return minutes as u32;
        }
    }

    default_minutes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::columns::CellValue;
    use crate::matching::build_index;

    fn directory() -> Vec<StaffDirectoryEntry> {
        vec![
            StaffDirectoryEntry { id: "s1".into(), display_name: "Dana Cohen".into() },
            StaffDirectoryEntry { id: "s2".into(), display_name: "ד״ר שרה לוי".into() },
        ]
    }

    fn row(cells: &[(&str, CellValue)]) -> RawSpreadsheetRow {
        cells
            .iter()
            .map(|(header, value)| (header.to_string(), value.clone()))
            .collect()
    }

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    fn with_context<T>(
        overrides: Option<&HashMap<String, String>>,
        f: impl FnOnce(&ExtractionContext<'_>) -> T,
    ) -> T {
        let directory = directory();
        let config = ImportConfig::default();
        let index = build_index(&directory, &config.matcher);
        let ctx = ExtractionContext {
            directory: &directory,
            index: &index,
            config: &config,
            overrides,
            month: 3,
            year: 2024,
        };
        f(&ctx)
    }

    #[test]
    fn extracts_a_fully_populated_row() {
        let r = row(&[
            ("משאב", text("Dana Cohen")),
            ("כותרת", text("MH - JLM - מטופל חדש")),
            ("סוג שירות", text("פגישת אינטייק")),
            ("סטטוס", text("לא הגיע")),
            ("משך", CellValue::Number(45.0)),
        ]);

        let candidate = with_context(None, |ctx| extract_candidate(&r, ctx)).unwrap();
        assert_eq!(
            candidate,
            SessionCandidate {
                staff_id: "s1".into(),
                clinic_type: ClinicType::Jlm,
                meeting_type: MeetingType::Intake,
                show_status: ShowStatus::NoShow,
                service_age_group: ServiceAgeGroup::Adult,
                count: 1,
                duration_minutes: 45,
                month: 3,
                year: 2024,
            }
        );
    }

    #[test]
    fn defaults_apply_when_labels_are_absent() {
        let r = row(&[("Therapist", text("Dana Cohen"))]);

        let candidate = with_context(None, |ctx| extract_candidate(&r, ctx)).unwrap();
        assert_eq!(candidate.clinic_type, ClinicType::Tlv);
        assert_eq!(candidate.meeting_type, MeetingType::FollowUp);
        assert_eq!(candidate.show_status, ShowStatus::Show);
        assert_eq!(candidate.duration_minutes, 60);
    }

    #[test]
    fn resource_column_wins_over_creator() {
        let r = row(&[
            ("שם היוצר", text("Dana Cohen")),
            ("מטפל", text("שרה לוי")),
        ]);
        let candidate = with_context(None, |ctx| extract_candidate(&r, ctx)).unwrap();
        assert_eq!(candidate.staff_id, "s2");

        let r = row(&[("Created By", text("Dana Cohen"))]);
        let candidate = with_context(None, |ctx| extract_candidate(&r, ctx)).unwrap();
        assert_eq!(candidate.staff_id, "s1");
    }

    #[test]
    fn rows_without_resolvable_staff_are_skipped() {
        let missing = row(&[("Title", text("MH - TLV - x"))]);
        let unknown = row(&[("Resource", text("Zzz Qqq"))]);

        with_context(None, |ctx| {
            assert_eq!(classify_row(&missing, ctx), RowOutcome::MissingStaff);
            assert_eq!(classify_row(&unknown, ctx), RowOutcome::Unresolved("Zzz Qqq".into()));
            assert!(extract_candidate(&unknown, ctx).is_none());
        });
    }

    #[test]
    fn override_map_bypasses_the_matcher() {
        let r = row(&[("Resource", text("Zzz Qqq"))]);
        let overrides = HashMap::from([("Zzz Qqq".to_string(), "s2".to_string())]);

        let candidate = with_context(Some(&overrides), |ctx| extract_candidate(&r, ctx)).unwrap();
        assert_eq!(candidate.staff_id, "s2");
    }

    #[test]
    fn clinic_codes_map_by_containment() {
        assert_eq!(clinic_type_from_title("M-HFA-Initial"), ClinicType::Hfa);
        assert_eq!(clinic_type_from_title("hm / bsh / follow"), ClinicType::Bsh);
        assert_eq!(clinic_type_from_title("H ONLN | video"), ClinicType::Onl);
        assert_eq!(clinic_type_from_title("MM_RH_"), ClinicType::Rhv);
        assert_eq!(clinic_type_from_title("no code here"), ClinicType::Tlv);
        assert_eq!(clinic_type_from_title("M - XYZ - unknown"), ClinicType::Tlv);
        assert_eq!(clinic_type_from_title(""), ClinicType::Tlv);
    }

    #[test]
    fn meeting_and_status_keywords() {
        assert_eq!(meeting_type_from_label("Initial Intake"), MeetingType::Intake);
        assert_eq!(meeting_type_from_label("קליטה"), MeetingType::Intake);
        assert_eq!(meeting_type_from_label("טיפול שבועי"), MeetingType::FollowUp);

        assert_eq!(show_status_from_label("No-Show"), ShowStatus::NoShow);
        assert_eq!(show_status_from_label("Cancelled by client"), ShowStatus::NoShow);
        assert_eq!(show_status_from_label("בוטלה"), ShowStatus::NoShow);
        assert_eq!(show_status_from_label("הגיע"), ShowStatus::Show);
        assert_eq!(show_status_from_label(""), ShowStatus::Show);
    }

    #[test]
    fn duration_falls_back_to_start_and_end() {
        let r = row(&[
            ("משך", CellValue::Number(0.0)),
            ("Start", text("2024-03-05 09:00")),
            ("End", text("2024-03-05 09:50:20")),
        ]);
        assert_eq!(duration_minutes(&r, 60), 50);

        let r = row(&[("שעת התחלה", text("10:00")), ("שעת סיום", text("10:45"))]);
        assert_eq!(duration_minutes(&r, 60), 45);
    }

    #[test]
    fn malformed_durations_use_the_default() {
        let r = row(&[
            ("Duration", text("about an hour")),
            ("Start", text("soon")),
            ("End", text("2024-03-05 09:50")),
        ]);
        assert_eq!(duration_minutes(&r, 60), 60);

        let r = row(&[("Start", text("2024-03-05 10:00")), ("End", text("2024-03-05 09:00"))]);
        assert_eq!(duration_minutes(&r, 55), 55);
    }

    #[test]
    fn unusable_duration_columns_fall_through_to_the_next_alias() {
        let r = row(&[
            ("משך", CellValue::Number(-5.0)),
            ("Duration", CellValue::Number(45.0)),
        ]);
        assert_eq!(duration_minutes(&r, 60), 45);

        let r = row(&[
            ("משך", CellValue::Number(0.3)),
            ("משך (דקות)", CellValue::Text("50".into())),
        ]);
        assert_eq!(duration_minutes(&r, 60), 50);
    }

    #[test]
    fn detect_pass_collects_distinct_unresolved_names() {
        let rows = vec![
            row(&[("Resource", text("Zzz Qqq"))]),
            row(&[("Resource", text("Dana Cohen"))]),
            row(&[("Resource", text("Zzz Qqq"))]),
            row(&[("Resource", text("Xxx Www"))]),
            row(&[("Title", text("orphan"))]),
        ];

        let (detect, commit) = with_context(None, |ctx| {
            (
                run_pass(&rows, ctx, ExtractionMode::Detect),
                run_pass(&rows, ctx, ExtractionMode::Commit),
            )
        });

        assert_eq!(detect.unresolved, vec!["Zzz Qqq".to_string(), "Xxx Www".to_string()]);
        assert!(detect.candidates.is_empty());
        assert_eq!(detect.rows_seen, 5);
        assert_eq!(detect.rows_skipped, 4);

        assert_eq!(commit.unresolved, detect.unresolved);
        assert_eq!(commit.candidates.len(), 1);
    }
}
