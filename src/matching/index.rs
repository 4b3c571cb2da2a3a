use std::collections::{HashMap, HashSet};

use crate::db::models::StaffDirectoryEntry;
use crate::matching::config::MatcherConfig;
use crate::matching::normalize::{normalize, split_honorific, Honorific};

/// Normalized name variation -> staff id.
///
/// Rebuilt from the directory snapshot on every import run. A full-name
/// variation always belongs to the entry it names; a first or last token never
/// replaces one. Otherwise the later entry wins. Iteration follows the order in
/// which keys were first registered.
#[derive(Debug, Clone, Default)]
pub struct NameVariationIndex {
    ids: HashMap<String, String>,
    order: Vec<String>,
    full_names: HashSet<String>,
}

impl NameVariationIndex {
    pub fn get(&self, token: &str) -> Option<&str> {
        self.ids.get(token).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .filter_map(move |key| self.ids.get(key).map(|id| (key.as_str(), id.as_str())))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn register(&mut self, token: &str, staff_id: &str, min_chars: usize) {
        if token.chars().count() < min_chars || self.full_names.contains(token) {
            return;
        }
        self.insert(token, staff_id);
    }

    fn register_full(&mut self, name: &str, staff_id: &str, min_chars: usize) {
        if name.chars().count() < min_chars {
            return;
        }
        self.insert(name, staff_id);
        self.full_names.insert(name.to_string());
    }

    fn insert(&mut self, key: &str, staff_id: &str) {
        if !self.ids.contains_key(key) {
            self.order.push(key.to_string());
        }
        self.ids.insert(key.to_string(), staff_id.to_string());
    }
}

/// Build the variation index for a directory snapshot.
///
/// Per entry: full name, name without honorific, the same name under the other
/// script's honorific, first token, and last token when there are several.
pub fn build_index(directory: &[StaffDirectoryEntry], config: &MatcherConfig) -> NameVariationIndex {
    let mut index = NameVariationIndex::default();
    let min = config.min_index_token_chars;

    for entry in directory {
        let full = normalize(&entry.display_name);
        if full.is_empty() {
            continue;
        }
        index.register_full(&full, &entry.id, min);

        let (stripped, honorific) = split_honorific(&full);
        index.register_full(stripped, &entry.id, min);

        if let Some(honorific) = honorific {
            let translated = match honorific {
                Honorific::Latin => format!("ד״ר {stripped}"),
                Honorific::Hebrew => format!("Dr. {stripped}"),
            };
            index.register_full(&normalize(&translated), &entry.id, min);
        }

        let parts: Vec<&str> = stripped.split_whitespace().collect();
        if let Some(first) = parts.first() {
            index.register(first, &entry.id, min);
        }
        if parts.len() > 1 {
            if let Some(last) = parts.last() {
                index.register(last, &entry.id, min);
            }
        }
    }

    index
}
