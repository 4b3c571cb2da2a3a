pub mod aggregate;
pub mod columns;
pub mod config;
pub mod controller;
pub mod decoder;
pub mod error;
pub mod extract;
pub mod state;

pub use aggregate::aggregate;
pub use columns::{CellValue, RawSpreadsheetRow};
pub use config::ImportConfig;
pub use controller::{CommitFailure, CommitSummary, ImportController};
pub use decoder::{SpreadsheetDecoder, WorkbookDecoder};
pub use error::ImportError;
pub use extract::{extract_candidate, run_pass, ExtractionContext, ExtractionMode, ExtractionPass};
pub use state::{ImportPhase, ImportState};
