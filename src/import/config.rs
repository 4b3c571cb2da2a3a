use serde::{Deserialize, Serialize};

use crate::matching::MatcherConfig;

/// Tunables for a spreadsheet import run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportConfig {
    /// Used when a row has neither a duration nor a usable start/end pair.
    pub default_duration_minutes: u32,

    pub matcher: MatcherConfig,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            default_duration_minutes: 60,
            matcher: MatcherConfig::default(),
        }
    }
}
