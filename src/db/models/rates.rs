//! Staff rate table.
//!
//! Field names follow the `clinical_staff_rates` columns. The `adult_*` and
//! `child_*` fields superseded the four age-agnostic legacy fields, which are
//! still read as a fallback for staff whose rates predate the split.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClinicalStaffRates {
    #[serde(default)]
    pub id: Option<String>,
    pub staff_id: String,

    #[serde(default)]
    pub adult_intake_rate: Option<f64>,
    #[serde(default)]
    pub adult_follow_up_rate: Option<f64>,
    #[serde(default)]
    pub adult_no_show_intake_rate: Option<f64>,
    #[serde(default)]
    pub adult_no_show_follow_up_rate: Option<f64>,
    #[serde(default)]
    pub child_intake_rate: Option<f64>,
    #[serde(default)]
    pub child_follow_up_rate: Option<f64>,
    #[serde(default)]
    pub child_no_show_intake_rate: Option<f64>,
    #[serde(default)]
    pub child_no_show_follow_up_rate: Option<f64>,

    // Legacy, age-agnostic
    #[serde(default)]
    pub intake_session_rate: Option<f64>,
    #[serde(default)]
    pub follow_up_session_rate: Option<f64>,
    #[serde(default)]
    pub no_show_intake_rate: Option<f64>,
    #[serde(default)]
    pub no_show_follow_up_rate: Option<f64>,

    #[serde(default)]
    pub admin_rate: Option<f64>,
    #[serde(default)]
    pub training_rate: Option<f64>,
    #[serde(default)]
    pub availability_retainer_rate: Option<f64>,

    pub effective_date: NaiveDate,
    #[serde(default)]
    pub contract_type_identifier: Option<String>,
}
