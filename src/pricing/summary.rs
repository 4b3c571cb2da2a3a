//! Monthly financial summary over stored sessions.
//!
//! The pricer itself never reports missing rates; this is the caller that turns
//! "no rate row for staff X" into a data-quality warning.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::db::models::{ClinicalSession, ClinicalStaffRates, ShowStatus, StaffDirectoryEntry};
use crate::log_warn;
use crate::pricing::cost::session_cost;

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StaffCostLine {
    pub staff_id: String,
    pub display_name: Option<String>,
    pub session_count: i64,
    pub no_show_count: i64,
    pub total_cost: f64,
    pub rates_missing: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub month: u32,
    pub year: i32,
    pub session_count: i64,
    pub total_cost: f64,
    pub lines: Vec<StaffCostLine>,
    pub warnings: Vec<String>,
}

/// Current rate row per staff member: the one with the latest effective date.
/// On equal dates the row listed later wins.
pub fn select_current_rates(rows: &[ClinicalStaffRates]) -> HashMap<String, ClinicalStaffRates> {
    let mut current: HashMap<String, ClinicalStaffRates> = HashMap::new();
    for row in rows {
        let replace = current
            .get(&row.staff_id)
            .map(|existing| row.effective_date >= existing.effective_date)
            .unwrap_or(true);
        if replace {
            current.insert(row.staff_id.clone(), row.clone());
        }
    }
    current
}

/// Price every session of `month`/`year` and total it per staff member.
pub fn summarize_period(
    sessions: &[ClinicalSession],
    rate_rows: &[ClinicalStaffRates],
    directory: &[StaffDirectoryEntry],
    month: u32,
    year: i32,
) -> FinancialSummary {
    let current_rates = select_current_rates(rate_rows);
    let names: HashMap<&str, &str> = directory
        .iter()
        .map(|entry| (entry.id.as_str(), entry.display_name.as_str()))
        .collect();

    let mut lines: BTreeMap<&str, StaffCostLine> = BTreeMap::new();
    for session in sessions
        .iter()
        .filter(|session| session.month == month && session.year == year)
    {
        let rates = current_rates.get(&session.staff_id);
        let line = lines
            .entry(session.staff_id.as_str())
            .or_insert_with(|| StaffCostLine {
                staff_id: session.staff_id.clone(),
                display_name: names.get(session.staff_id.as_str()).map(|n| n.to_string()),
                session_count: 0,
                no_show_count: 0,
                total_cost: 0.0,
                rates_missing: rates.is_none(),
            });

        let count = session.count.max(0);
        line.session_count += count;
        if session.show_status == ShowStatus::NoShow {
            line.no_show_count += count;
        }
        line.total_cost += session_cost(session, rates);
    }

    let mut warnings = Vec::new();
    for line in lines.values().filter(|line| line.rates_missing) {
        let who = line.display_name.as_deref().unwrap_or(line.staff_id.as_str());
        log_warn!("Rates missing for staff {who} ({month}/{year})");
        warnings.push(format!("rates missing for staff {who}"));
    }

    let lines: Vec<StaffCostLine> = lines.into_values().collect();
    FinancialSummary {
        month,
        year,
        session_count: lines.iter().map(|line| line.session_count).sum(),
        total_cost: lines.iter().map(|line| line.total_cost).sum(),
        lines,
        warnings,
    }
}
