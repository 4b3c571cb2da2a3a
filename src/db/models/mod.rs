pub mod rates;
pub mod session;
pub mod staff;

pub use rates::ClinicalStaffRates;
pub use session::{
    ClinicType, ClinicalSession, ClinicalSessionRecord, MeetingType, ServiceAgeGroup,
    SessionCandidate, ShowStatus,
};
pub use staff::{StaffDirectoryEntry, StaffNameMapping};
