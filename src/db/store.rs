use anyhow::Result;

use crate::db::models::ClinicalSession;

/// Where confirmed sessions are written. Each call stores one session and
/// returns its id; failures are independent of one another.
#[allow(async_fn_in_trait)]
pub trait SessionStore {
    async fn insert_clinical_session(&self, session: &ClinicalSession) -> Result<String>;
}
