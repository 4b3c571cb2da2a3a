use std::{collections::HashMap, sync::Arc};

use anyhow::anyhow;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::{
    db::{
        models::{ClinicalSession, StaffDirectoryEntry, StaffNameMapping},
        SessionStore,
    },
    matching::{build_index, NameVariationIndex},
};

use super::{
    aggregate::aggregate,
    config::ImportConfig,
    decoder::SpreadsheetDecoder,
    error::ImportError,
    extract::{run_pass, ExtractionContext, ExtractionMode},
    state::{ImportPhase, ImportState},
};

use crate::{log_info, log_warn};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommitFailure {
    pub index: usize,
    pub staff_id: String,
    pub error: String,
}

/// Result of submitting every staged session once.
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommitSummary {
    pub attempted: usize,
    /// (position in the staged list, stored id)
    pub committed: Vec<(usize, String)>,
    pub failed: Vec<CommitFailure>,
}

impl CommitSummary {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Drives one spreadsheet import from file bytes to stored sessions.
///
/// The staff directory is snapshotted at construction and the name index is
/// built from it once per run.
#[derive(Clone)]
pub struct ImportController<S: SessionStore> {
    state: Arc<Mutex<ImportState>>,
    store: S,
    directory: Arc<Vec<StaffDirectoryEntry>>,
    index: Arc<NameVariationIndex>,
    config: ImportConfig,
    month: u32,
    year: i32,
}

impl<S: SessionStore> ImportController<S> {
    pub fn new(
        store: S,
        directory: Vec<StaffDirectoryEntry>,
        config: ImportConfig,
        month: u32,
        year: i32,
    ) -> Self {
        let index = build_index(&directory, &config.matcher);
        Self {
            state: Arc::new(Mutex::new(ImportState::new())),
            store,
            directory: Arc::new(directory),
            index: Arc::new(index),
            config,
            month,
            year,
        }
    }

    pub async fn phase(&self) -> ImportPhase {
        self.state.lock().await.phase
    }

    pub async fn unresolved_names(&self) -> Vec<String> {
        self.state.lock().await.unresolved.clone()
    }

    pub async fn sessions(&self) -> Vec<ClinicalSession> {
        self.state.lock().await.sessions.clone()
    }

    /// Decode a file and run the detection pass. Parks in
    /// `AwaitingManualMapping` when names are unresolved, otherwise goes
    /// straight to `AwaitingConfirmation`.
    pub async fn load(
        &self,
        bytes: &[u8],
        decoder: &impl SpreadsheetDecoder,
    ) -> Result<ImportPhase, ImportError> {
        let mut state = self.state.lock().await;
        if state.phase != ImportPhase::Idle {
            return Err(ImportError::InvalidPhase(state.phase));
        }

        if !(1..=12).contains(&self.month) {
            return Err(ImportError::Processing(anyhow!(
                "month must be between 1 and 12, got {}",
                self.month
            )));
        }

        let rows = match decoder.decode(bytes) {
            Ok(rows) => rows,
            Err(err) => {
                log_warn!("Spreadsheet decode failed: {err:#}");
                state.reset();
                return Err(ImportError::Decode(err));
            }
        };

        log_info!("Decoded {} spreadsheet rows", rows.len());
        state.begin(rows);

        let pass = run_pass(&state.rows, &self.context(None), ExtractionMode::Detect);
        if !pass.unresolved.is_empty() {
            log_info!(
                "{} staff name(s) need manual mapping",
                pass.unresolved.len()
            );
            state.park_for_mapping(pass.unresolved);
            return Ok(state.phase);
        }

        self.extract_final(&mut state)?;
        Ok(state.phase)
    }

    /// Accept operator mappings for the unresolved names. An incomplete or
    /// invalid mapping leaves the run parked.
    pub async fn submit_mappings(
        &self,
        mappings: &[StaffNameMapping],
    ) -> Result<ImportPhase, ImportError> {
        let mut state = self.state.lock().await;
        if state.phase != ImportPhase::AwaitingManualMapping {
            return Err(ImportError::InvalidPhase(state.phase));
        }

        let mut overrides = HashMap::new();
        for mapping in mappings {
            let staff_id = mapping.system_staff_id.trim();
            if staff_id.is_empty() {
                continue;
            }
            if !self.directory.iter().any(|entry| entry.id == staff_id) {
                return Err(ImportError::UnknownStaffId(staff_id.to_string()));
            }
            overrides.insert(mapping.excel_name.trim().to_string(), staff_id.to_string());
        }

        let missing: Vec<String> = state
            .unresolved
            .iter()
            .filter(|name| !overrides.contains_key(name.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::IncompleteMapping(missing));
        }

        state.overrides = overrides;
        self.extract_final(&mut state)?;
        Ok(state.phase)
    }

    /// Submit every staged session to the store. Each submission is
    /// independent; failures are reported without undoing earlier inserts.
    pub async fn confirm(&self) -> Result<CommitSummary, ImportError> {
        let mut state = self.state.lock().await;
        if state.phase != ImportPhase::AwaitingConfirmation {
            return Err(ImportError::InvalidPhase(state.phase));
        }

        let mut summary = CommitSummary {
            attempted: state.sessions.len(),
            ..CommitSummary::default()
        };

        for (index, session) in state.sessions.iter().enumerate() {
            match self.store.insert_clinical_session(session).await {
                Ok(id) => summary.committed.push((index, id)),
                Err(err) => {
                    log_warn!(
                        "Failed to store session {index} for staff {}: {err:#}",
                        session.staff_id
                    );
                    summary.failed.push(CommitFailure {
                        index,
                        staff_id: session.staff_id.clone(),
                        error: format!("{err:#}"),
                    });
                }
            }
        }

        log_info!(
            "Import committed: {}/{} sessions stored",
            summary.committed.len(),
            summary.attempted
        );
        state.mark_committed();
        Ok(summary)
    }

    pub async fn reset(&self) {
        self.state.lock().await.reset();
    }

    fn context<'a>(
        &'a self,
        overrides: Option<&'a HashMap<String, String>>,
    ) -> ExtractionContext<'a> {
        ExtractionContext {
            directory: &self.directory,
            index: &self.index,
            config: &self.config,
            overrides,
            month: self.month,
            year: self.year,
        }
    }

    fn extract_final(&self, state: &mut ImportState) -> Result<(), ImportError> {
        state.phase = ImportPhase::ExtractingFinal;

        let overrides = (!state.overrides.is_empty()).then_some(&state.overrides);
        let pass = run_pass(&state.rows, &self.context(overrides), ExtractionMode::Commit);
        let sessions = aggregate(pass.candidates);

        if sessions.is_empty() {
            log_warn!("No sessions found in {} rows", pass.rows_seen);
            state.reset();
            return Err(ImportError::NoSessionsFound);
        }

        log_info!(
            "Extracted {} sessions ({} rows skipped)",
            sessions.len(),
            pass.rows_skipped
        );
        state.stage(sessions);
        Ok(())
    }
}
