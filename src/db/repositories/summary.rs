use anyhow::Result;

use crate::db::connection::Database;
use crate::pricing::{summarize_period, FinancialSummary};

impl Database {
    /// Price every stored session of a month against each staff member's
    /// current rates.
    pub async fn financial_summary(&self, month: u32, year: i32) -> Result<FinancialSummary> {
        let sessions: Vec<_> = self
            .list_sessions_for_period(month, year)
            .await?
            .into_iter()
            .map(|record| record.session)
            .collect();
        let rates = self.list_rates().await?;
        let directory = self.list_staff_directory().await?;

        Ok(summarize_period(&sessions, &rates, &directory, month, year))
    }
}
