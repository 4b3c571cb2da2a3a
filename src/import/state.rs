use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::db::models::ClinicalSession;
use crate::import::columns::RawSpreadsheetRow;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ImportPhase {
    Idle,
    ExtractingRaw,
    AwaitingManualMapping,
    ExtractingFinal,
    AwaitingConfirmation,
    Committed,
}

impl Default for ImportPhase {
    fn default() -> Self {
        ImportPhase::Idle
    }
}

impl ImportPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportPhase::Idle => "idle",
            ImportPhase::ExtractingRaw => "extracting raw",
            ImportPhase::AwaitingManualMapping => "awaiting manual mapping",
            ImportPhase::ExtractingFinal => "extracting final",
            ImportPhase::AwaitingConfirmation => "awaiting confirmation",
            ImportPhase::Committed => "committed",
        }
    }
}

impl fmt::Display for ImportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable state of one import run.
#[derive(Debug, Clone, Default)]
pub struct ImportState {
    pub phase: ImportPhase,
    /// Decoded rows, kept until the run is committed or reset.
    pub rows: Vec<RawSpreadsheetRow>,
    /// Distinct spreadsheet names the matcher could not resolve.
    pub unresolved: Vec<String>,
    /// Operator overrides: spreadsheet name -> staff id.
    pub overrides: HashMap<String, String>,
    pub sessions: Vec<ClinicalSession>,
}

impl ImportState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, rows: Vec<RawSpreadsheetRow>) {
        *self = Self {
            phase: ImportPhase::ExtractingRaw,
            rows,
            ..Self::default()
        };
    }

    pub fn park_for_mapping(&mut self, unresolved: Vec<String>) {
        self.unresolved = unresolved;
        self.phase = ImportPhase::AwaitingManualMapping;
    }

    pub fn stage(&mut self, sessions: Vec<ClinicalSession>) {
        self.sessions = sessions;
        self.phase = ImportPhase::AwaitingConfirmation;
    }

    pub fn mark_committed(&mut self) {
        self.rows.clear();
        self.phase = ImportPhase::Committed;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
