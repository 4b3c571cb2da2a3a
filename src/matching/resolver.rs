//! Staff-name resolution as an ordered list of strategies.
//!
//! The order below decides which of several plausible staff members wins on
//! ambiguous input; the first strategy returning an id short-circuits the rest.
//!
//! 1. `Exact`: normalized name is an index key.
//! 2. `Honorific`: normalized name without its honorific is an index key.
//! 3. `Substring`: an index key (3+ chars) contains, or is contained in, the name.
//! 4. `Token`: a word of the name and a word of a directory name contain one another.
//! 5. `Transliteration`: consonant skeletons contain one another.

use std::fmt;

use serde::Serialize;

use crate::db::models::StaffDirectoryEntry;
use crate::log_debug;
use crate::matching::config::MatcherConfig;
use crate::matching::index::NameVariationIndex;
use crate::matching::normalize::{
    consonant_skeleton, normalize, strip_honorific, strip_quotes, tokens,
};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MatchRule {
    Exact,
    Honorific,
    Substring,
    Token,
    Transliteration,
}

impl MatchRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchRule::Exact => "exact",
            MatchRule::Honorific => "honorific",
            MatchRule::Substring => "substring",
            MatchRule::Token => "token",
            MatchRule::Transliteration => "transliteration",
        }
    }
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved staff id and the rule that produced it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StaffMatch {
    pub staff_id: String,
    pub rule: MatchRule,
}

/// A raw name prepared once for every strategy.
struct Candidate {
    normalized: String,
    stripped: String,
}

struct MatchContext<'a> {
    directory: &'a [StaffDirectoryEntry],
    index: &'a NameVariationIndex,
    config: &'a MatcherConfig,
}

type Strategy = fn(&Candidate, &MatchContext<'_>) -> Option<String>;

const STRATEGIES: [(MatchRule, Strategy); 5] = [
    (MatchRule::Exact, match_exact),
    (MatchRule::Honorific, match_without_honorific),
    (MatchRule::Substring, match_substring),
    (MatchRule::Token, match_tokens),
    (MatchRule::Transliteration, match_transliteration),
];

/// Resolve a free-text staff name to a directory id.
///
/// `None` means the name is unmapped; callers surface it to the operator
/// rather than treating it as an error.
pub fn resolve(
    raw_name: &str,
    directory: &[StaffDirectoryEntry],
    index: &NameVariationIndex,
    config: &MatcherConfig,
) -> Option<StaffMatch> {
    let normalized = normalize(&strip_quotes(raw_name));
    if normalized.is_empty() {
        return None;
    }
    let candidate = Candidate {
        stripped: strip_honorific(&normalized).to_string(),
        normalized,
    };
    let ctx = MatchContext {
        directory,
        index,
        config,
    };

    for (rule, strategy) in STRATEGIES {
        if let Some(staff_id) = strategy(&candidate, &ctx) {
            log_debug!("Resolved staff name '{raw_name}' -> {staff_id} ({rule})");
            return Some(StaffMatch { staff_id, rule });
        }
    }

    log_debug!("No staff match for '{raw_name}'");
    None
}

fn match_exact(candidate: &Candidate, ctx: &MatchContext<'_>) -> Option<String> {
    ctx.index.get(&candidate.normalized).map(str::to_string)
}

fn match_without_honorific(candidate: &Candidate, ctx: &MatchContext<'_>) -> Option<String> {
    ctx.index.get(&candidate.stripped).map(str::to_string)
}

fn match_substring(candidate: &Candidate, ctx: &MatchContext<'_>) -> Option<String> {
    let name = candidate.normalized.as_str();
    ctx.index
        .iter()
        .filter(|(token, _)| token.chars().count() >= ctx.config.min_substring_token_chars)
        .find(|(token, _)| name.contains(token) || token.contains(name))
        .map(|(_, id)| id.to_string())
}

fn match_tokens(candidate: &Candidate, ctx: &MatchContext<'_>) -> Option<String> {
    let min = ctx.config.min_word_token_chars;
    let words = tokens(&candidate.stripped, min);
    if words.is_empty() {
        return None;
    }

    ctx.directory
        .iter()
        .find(|entry| {
            let staff_name = normalize(&entry.display_name);
            // Staff words are compared without the honorific as well: a bare
            // "dr" word would contain-match any input word holding "dr".
            tokens(strip_honorific(&staff_name), min)
                .iter()
                .any(|staff_word| {
                    words
                        .iter()
                        .any(|word| word.contains(staff_word) || staff_word.contains(word))
                })
        })
        .map(|entry| entry.id.clone())
}

fn match_transliteration(candidate: &Candidate, ctx: &MatchContext<'_>) -> Option<String> {
    let min = ctx.config.min_skeleton_chars;
    let skeleton = consonant_skeleton(&candidate.normalized);
    if skeleton.chars().count() <= min {
        return None;
    }

    ctx.directory
        .iter()
        .find(|entry| {
            let staff_skeleton = consonant_skeleton(&normalize(&entry.display_name));
            staff_skeleton.chars().count() > min
                && (skeleton.contains(&staff_skeleton) || staff_skeleton.contains(&skeleton))
        })
        .map(|entry| entry.id.clone())
}
