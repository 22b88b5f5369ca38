//! Free-form species lookup.
//!
//! Players type species names however they like ("Mr. Mime", "mr mime",
//! "Alolan Vulpix", "vulpix alola"). The index maps every reasonable spelling
//! of a species to its canonical key.

use indexmap::IndexMap;
use schema::SpeciesRecord;
use std::collections::HashMap;
use unicode_normalization::UnicodeNormalization;

/// Words accepted as a regional form prefix or suffix.
pub const REGIONAL_PREFIXES: [&str; 4] = ["alolan", "hisuian", "galarian", "paldean"];

/// Aliases offered in the species suggestion list even when the table has no
/// dedicated form entry. They resolve to the base species.
pub const FRIENDLY_ALIASES: [&str; 2] = ["alolan vulpix", "hisuian growlithe"];

// Lowercase, decompose, drop combining marks, spell out the gender symbols.
fn fold(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .nfkd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .map(|c| match c {
            '♀' => 'f',
            '♂' => 'm',
            other => other,
        })
        .collect()
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

/// Index key for a species spelling: folded, with everything but `[a-z0-9]`
/// removed. "Mr. Mime" and "mr-mime" both become `mrmime`.
pub fn normalize_lookup_key(value: &str) -> String {
    fold(value).chars().filter(|c| is_key_char(*c)).collect()
}

/// Folded words of a species spelling; any run of other characters splits.
pub fn split_lookup_words(value: &str) -> Vec<String> {
    let spaced: String = fold(value)
        .chars()
        .map(|c| if is_key_char(c) { c } else { ' ' })
        .collect();
    spaced.split_whitespace().map(str::to_string).collect()
}

/// Name shown for a species: regional forms read "alolan Vulpix" unless the
/// name already carries the form.
pub fn display_name(key: &str, species: &SpeciesRecord) -> String {
    let name = if species.name.trim().is_empty() {
        if species.id.trim().is_empty() {
            key.trim()
        } else {
            species.id.trim()
        }
    } else {
        species.name.trim()
    };

    match species.form_label() {
        Some(form) if !name.to_lowercase().contains(&form.to_lowercase()) => {
            format!("{} {}", form.to_lowercase(), name)
        }
        _ => name.to_string(),
    }
}

/// Species suggestions in dex order (entries without a dex number last,
/// ties by name), followed by the friendly regional aliases.
pub fn suggestion_list(species: &IndexMap<String, SpeciesRecord>) -> Vec<String> {
    let mut entries: Vec<(&String, &SpeciesRecord)> = species.iter().collect();
    entries.sort_by(|(_, a), (_, b)| {
        let a_dex = a.dex.unwrap_or(u32::MAX);
        let b_dex = b.dex.unwrap_or(u32::MAX);
        a_dex.cmp(&b_dex).then_with(|| a.name.cmp(&b.name))
    });

    entries
        .into_iter()
        .map(|(key, record)| display_name(key, record))
        .chain(FRIENDLY_ALIASES.iter().map(|alias| alias.to_string()))
        .collect()
}

/// Normalized spelling → canonical species id.
#[derive(Debug, Clone, Default)]
pub struct SpeciesIndex {
    entries: HashMap<String, String>,
}

impl SpeciesIndex {
    pub fn build(species: &IndexMap<String, SpeciesRecord>) -> Self {
        let mut index = Self::default();

        for (key, record) in species {
            let id = if record.id.is_empty() {
                key.clone()
            } else {
                record.id.clone()
            };

            index.add(key, &id);
            index.add(&id, &id);
            index.add(&record.name, &id);

            if let Some(form) = record.form_label() {
                index.add(&format!("{} {}", form, record.name), &id);
                index.add(&format!("{} {}", record.name, form), &id);
                index.add(&format!("{}{}", form, record.name), &id);
            }
        }

        index
    }

    // First registration wins.
    fn add(&mut self, alias: &str, id: &str) {
        let key = normalize_lookup_key(alias);
        if key.is_empty() {
            return;
        }
        self.entries.entry(key).or_insert_with(|| id.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, spelling: &str) -> Option<&String> {
        let key = normalize_lookup_key(spelling);
        if key.is_empty() {
            return None;
        }
        self.entries.get(&key)
    }

    /// Resolve free-form species text to a canonical key.
    ///
    /// Tries an exact (case-insensitive) table key, then the normalized
    /// index, then regional-form handling: with a known regional word at the
    /// start or end, the form entry is preferred in either word order and the
    /// base species is the fallback.
    pub fn resolve(&self, raw: &str, species: &IndexMap<String, SpeciesRecord>) -> Option<String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let direct_key = raw.to_lowercase();
        if species.contains_key(&direct_key) {
            return Some(direct_key);
        }

        if let Some(id) = self.lookup(raw) {
            return Some(id.clone());
        }

        let words = split_lookup_words(raw);
        if words.len() < 2 {
            return None;
        }

        let first = words[0].as_str();
        let last = words[words.len() - 1].as_str();

        if REGIONAL_PREFIXES.contains(&first) {
            if let Some(id) = self.resolve_regional(first, &words[1..]) {
                return Some(id);
            }
        }
        if REGIONAL_PREFIXES.contains(&last) {
            if let Some(id) = self.resolve_regional(last, &words[..words.len() - 1]) {
                return Some(id);
            }
        }

        None
    }

    fn resolve_regional(&self, form: &str, remainder: &[String]) -> Option<String> {
        let remainder = remainder.join(" ");

        self.lookup(&format!("{} {}", form, remainder))
            .or_else(|| self.lookup(&format!("{} {}", remainder, form)))
            .or_else(|| self.lookup(&remainder))
            .cloned()
    }
}
