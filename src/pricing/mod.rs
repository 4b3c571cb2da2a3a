pub mod cost;
pub mod summary;

pub use cost::{session_cost, unit_rate};
pub use summary::{select_current_rates, summarize_period, FinancialSummary, StaffCostLine};
