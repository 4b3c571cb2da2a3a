use anyhow::{anyhow, Result};
use chrono::Utc;
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::{
    connection::Database,
    helpers::{parse_date, DATE_FORMAT},
    models::ClinicalStaffRates,
};

const RATE_COLUMNS: &str = "id, staff_id,
    adult_intake_rate, adult_follow_up_rate, adult_no_show_intake_rate, adult_no_show_follow_up_rate,
    child_intake_rate, child_follow_up_rate, child_no_show_intake_rate, child_no_show_follow_up_rate,
    intake_session_rate, follow_up_session_rate, no_show_intake_rate, no_show_follow_up_rate,
    admin_rate, training_rate, availability_retainer_rate,
    effective_date, contract_type_identifier";

fn row_to_rates(row: &Row) -> Result<ClinicalStaffRates> {
    let effective_date: String = row.get("effective_date")?;

    Ok(ClinicalStaffRates {
        id: row.get("id")?,
        staff_id: row.get("staff_id")?,
        adult_intake_rate: row.get("adult_intake_rate")?,
        adult_follow_up_rate: row.get("adult_follow_up_rate")?,
        adult_no_show_intake_rate: row.get("adult_no_show_intake_rate")?,
        adult_no_show_follow_up_rate: row.get("adult_no_show_follow_up_rate")?,
        child_intake_rate: row.get("child_intake_rate")?,
        child_follow_up_rate: row.get("child_follow_up_rate")?,
        child_no_show_intake_rate: row.get("child_no_show_intake_rate")?,
        child_no_show_follow_up_rate: row.get("child_no_show_follow_up_rate")?,
        intake_session_rate: row.get("intake_session_rate")?,
        follow_up_session_rate: row.get("follow_up_session_rate")?,
        no_show_intake_rate: row.get("no_show_intake_rate")?,
        no_show_follow_up_rate: row.get("no_show_follow_up_rate")?,
        admin_rate: row.get("admin_rate")?,
        training_rate: row.get("training_rate")?,
        availability_retainer_rate: row.get("availability_retainer_rate")?,
        effective_date: parse_date(&effective_date, "effective_date")?,
        contract_type_identifier: row.get("contract_type_identifier")?,
    })
}

impl Database {
    /// Store a rate row. A missing id is generated; the stored id is returned.
    pub async fn insert_rates(&self, rates: &ClinicalStaffRates) -> Result<String> {
        if rates.staff_id.trim().is_empty() {
            return Err(anyhow!("rate row has no staff_id"));
        }

        let mut record = rates.clone();
        let id = record
            .id
            .take()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let stored_id = id.clone();

        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO clinical_staff_rates (
                    id, staff_id,
                    adult_intake_rate, adult_follow_up_rate, adult_no_show_intake_rate, adult_no_show_follow_up_rate,
                    child_intake_rate, child_follow_up_rate, child_no_show_intake_rate, child_no_show_follow_up_rate,
                    intake_session_rate, follow_up_session_rate, no_show_intake_rate, no_show_follow_up_rate,
                    admin_rate, training_rate, availability_retainer_rate,
                    effective_date, contract_type_identifier, created_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
                params![
                    id,
                    record.staff_id,
                    record.adult_intake_rate,
                    record.adult_follow_up_rate,
                    record.adult_no_show_intake_rate,
                    record.adult_no_show_follow_up_rate,
                    record.child_intake_rate,
                    record.child_follow_up_rate,
                    record.child_no_show_intake_rate,
                    record.child_no_show_follow_up_rate,
                    record.intake_session_rate,
                    record.follow_up_session_rate,
                    record.no_show_intake_rate,
                    record.no_show_follow_up_rate,
                    record.admin_rate,
                    record.training_rate,
                    record.availability_retainer_rate,
                    record.effective_date.format(DATE_FORMAT).to_string(),
                    record.contract_type_identifier,
                    Utc::now().to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await?;

        Ok(stored_id)
    }

    /// Every rate row, oldest effective date first within each staff member.
    pub async fn list_rates(&self) -> Result<Vec<ClinicalStaffRates>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {RATE_COLUMNS}
                 FROM clinical_staff_rates
                 ORDER BY staff_id, effective_date, created_at"
            ))?;

            let mut rows = stmt.query([])?;
            let mut rates = Vec::new();
            while let Some(row) = rows.next()? {
                rates.push(row_to_rates(row)?);
            }

            Ok(rates)
        })
        .await
    }

    pub async fn list_rates_for_staff(&self, staff_id: &str) -> Result<Vec<ClinicalStaffRates>> {
        let staff_id = staff_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {RATE_COLUMNS}
                 FROM clinical_staff_rates
                 WHERE staff_id = ?1
                 ORDER BY effective_date, created_at"
            ))?;

            let mut rows = stmt.query(params![staff_id])?;
            let mut rates = Vec::new();
            while let Some(row) = rows.next()? {
                rates.push(row_to_rates(row)?);
            }

            Ok(rates)
        })
        .await
    }
}
