use serde::{Deserialize, Serialize};

/// Length thresholds (in characters) for the staff-name matcher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MatcherConfig {
    /// Index variations shorter than this are never registered.
    pub min_index_token_chars: usize,

    /// Index tokens shorter than this are skipped by the substring strategy.
    pub min_substring_token_chars: usize,

    /// Word-level matching ignores tokens shorter than this on either side.
    pub min_word_token_chars: usize,

    /// Both consonant skeletons must be longer than this to be compared.
    pub min_skeleton_chars: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_index_token_chars: 2,
            min_substring_token_chars: 3,
            min_word_token_chars: 2,
            min_skeleton_chars: 3,
        }
    }
}
