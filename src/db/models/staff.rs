use serde::{Deserialize, Serialize};

/// One entry of the canonical staff directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StaffDirectoryEntry {
    pub id: String,
    pub display_name: String,
}

/// Operator override pairing a spreadsheet name with a directory id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StaffNameMapping {
    pub excel_name: String,
    pub system_staff_id: String,
}
