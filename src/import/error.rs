use thiserror::Error;

use crate::import::state::ImportPhase;

/// Outcomes of an import run that the operator must see and tell apart.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The file could not be read as a spreadsheet; nothing was extracted.
    #[error("failed to decode spreadsheet: {0:#}")]
    Decode(anyhow::Error),

    #[error("operation not allowed while the import is {0}")]
    InvalidPhase(ImportPhase),

    /// Some unresolved names still have no staff member assigned.
    #[error("{} staff name(s) still unmapped: {}", .0.len(), .0.join(", "))]
    IncompleteMapping(Vec<String>),

    #[error("manual mapping refers to unknown staff id '{0}'")]
    UnknownStaffId(String),

    /// Every row was processed and none produced a session.
    #[error("no sessions found in spreadsheet")]
    NoSessionsFound,

    #[error("failed to process spreadsheet: {0:#}")]
    Processing(anyhow::Error),
}
