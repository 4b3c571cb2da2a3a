use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::{
    connection::Database,
    helpers::{
        parse_age_group, parse_clinic_type, parse_datetime, parse_meeting_type, parse_show_status,
        to_i32, to_u32,
    },
    models::{ClinicalSession, ClinicalSessionRecord},
    store::SessionStore,
};

fn row_to_session(row: &Row) -> Result<ClinicalSessionRecord> {
    let clinic_type: String = row.get("clinic_type")?;
    let meeting_type: String = row.get("meeting_type")?;
    let show_status: String = row.get("show_status")?;
    let service_age_group: String = row.get("service_age_group")?;
    let duration_minutes: i64 = row.get("duration_minutes")?;
    let month: i64 = row.get("month")?;
    let year: i64 = row.get("year")?;
    let created_at: String = row.get("created_at")?;

    Ok(ClinicalSessionRecord {
        id: row.get("id")?,
        session: ClinicalSession {
            staff_id: row.get("staff_id")?,
            clinic_type: parse_clinic_type(&clinic_type)?,
            meeting_type: parse_meeting_type(&meeting_type)?,
            show_status: parse_show_status(&show_status)?,
            service_age_group: parse_age_group(&service_age_group)?,
            count: row.get("count")?,
            duration_minutes: to_u32(duration_minutes, "duration_minutes")?,
            month: to_u32(month, "month")?,
            year: to_i32(year, "year")?,
        },
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    /// Store one canonical session and return its new id.
    pub async fn insert_clinical_session(&self, session: &ClinicalSession) -> Result<String> {
        let record = session.clone();
        let id = Uuid::new_v4().to_string();
        let stored_id = id.clone();

        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO clinical_sessions (id, staff_id, clinic_type, meeting_type, show_status, service_age_group, count, duration_minutes, month, year, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    id,
                    record.staff_id,
                    record.clinic_type.as_str(),
                    record.meeting_type.as_str(),
                    record.show_status.as_str(),
                    record.service_age_group.as_str(),
                    record.count,
                    record.duration_minutes,
                    record.month,
                    record.year,
                    Utc::now().to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await?;

        Ok(stored_id)
    }

    pub async fn list_sessions_for_period(
        &self,
        month: u32,
        year: i32,
    ) -> Result<Vec<ClinicalSessionRecord>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, staff_id, clinic_type, meeting_type, show_status, service_age_group, count, duration_minutes, month, year, created_at
                 FROM clinical_sessions
                 WHERE month = ?1 AND year = ?2
                 ORDER BY staff_id, created_at, id",
            )?;

            let mut rows = stmt.query(params![month, year])?;
            let mut sessions = Vec::new();
            while let Some(row) = rows.next()? {
                sessions.push(row_to_session(row)?);
            }

            Ok(sessions)
        })
        .await
    }

    /// Returns `false` when the session did not exist.
    pub async fn delete_session(&self, session_id: &str) -> Result<bool> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "DELETE FROM clinical_sessions WHERE id = ?1",
                params![session_id],
            )?;
            Ok(rows_affected > 0)
        })
        .await
    }
}

impl SessionStore for Database {
    async fn insert_clinical_session(&self, session: &ClinicalSession) -> Result<String> {
        Database::insert_clinical_session(self, session).await
    }
}
