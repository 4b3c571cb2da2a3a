use anyhow::{anyhow, Result};
use chrono::Utc;
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::{connection::Database, models::StaffDirectoryEntry};

fn row_to_staff(row: &Row) -> Result<StaffDirectoryEntry> {
    Ok(StaffDirectoryEntry {
        id: row.get("id")?,
        display_name: row.get("display_name")?,
    })
}

impl Database {
    pub async fn insert_staff(&self, display_name: &str) -> Result<StaffDirectoryEntry> {
        let display_name = display_name.trim().to_string();
        if display_name.is_empty() {
            return Err(anyhow!("staff display name must not be empty"));
        }

        let entry = StaffDirectoryEntry {
            id: Uuid::new_v4().to_string(),
            display_name,
        };
        let record = entry.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO staff (id, display_name, created_at) VALUES (?1, ?2, ?3)",
                params![record.id, record.display_name, Utc::now().to_rfc3339()],
            )?;
            Ok(())
        })
        .await?;

        Ok(entry)
    }

    /// The canonical staff directory, ordered by display name.
    pub async fn list_staff_directory(&self) -> Result<Vec<StaffDirectoryEntry>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, display_name
                 FROM staff
                 ORDER BY display_name COLLATE NOCASE, id",
            )?;

            let mut rows = stmt.query([])?;
            let mut staff = Vec::new();
            while let Some(row) = rows.next()? {
                staff.push(row_to_staff(row)?);
            }

            Ok(staff)
        })
        .await
    }

    /// Remove a staff member together with their sessions and rates.
    /// Returns `false` when no such staff member exists.
    pub async fn delete_staff(&self, staff_id: &str) -> Result<bool> {
        let staff_id = staff_id.to_string();
        self.execute(move |conn| {
            let rows_affected =
                conn.execute("DELETE FROM staff WHERE id = ?1", params![staff_id])?;
            Ok(rows_affected > 0)
        })
        .await
    }
}
