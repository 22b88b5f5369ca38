//! The four static rule tables (species, moves, abilities, roles).
//!
//! Tables are read once at startup and never mutated afterwards. A table
//! that fails to load is logged and left empty, so every capability that
//! depends on it reads as unavailable instead of failing the session.

use crate::errors::{RuleDataError, RuleDataResult};
use crate::lookup::SpeciesIndex;
use indexmap::IndexMap;
use schema::{AbilityRecord, MoveRecord, RoleRecord, SpeciesRecord};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const SPECIES_TABLE: &str = "pokemon";
pub const MOVES_TABLE: &str = "moves";
pub const ABILITIES_TABLE: &str = "abilities";
pub const ROLES_TABLE: &str = "roles";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableFormat {
    Json,
    Ron,
}

/// Read-only rule data plus the species lookup index built from it.
#[derive(Debug, Clone, Default)]
pub struct RuleTables {
    species: IndexMap<String, SpeciesRecord>,
    moves: IndexMap<String, MoveRecord>,
    abilities: IndexMap<String, AbilityRecord>,
    roles: IndexMap<String, RoleRecord>,
    species_index: SpeciesIndex,
}

impl RuleTables {
    /// Assemble tables from already-parsed maps. Records without an `id`
    /// take their map key.
    pub fn new(
        mut species: IndexMap<String, SpeciesRecord>,
        mut moves: IndexMap<String, MoveRecord>,
        mut abilities: IndexMap<String, AbilityRecord>,
        mut roles: IndexMap<String, RoleRecord>,
    ) -> Self {
        for (key, record) in species.iter_mut() {
            if record.id.is_empty() {
                record.id = key.clone();
            }
        }
        for (key, record) in moves.iter_mut() {
            if record.id.is_empty() {
                record.id = key.clone();
            }
        }
        for (key, record) in abilities.iter_mut() {
            if record.id.is_empty() {
                record.id = key.clone();
            }
        }
        for (key, record) in roles.iter_mut() {
            if record.id.is_empty() {
                record.id = key.clone();
            }
        }

        let species_index = SpeciesIndex::build(&species);
        tracing::debug!(
            species = species.len(),
            moves = moves.len(),
            abilities = abilities.len(),
            roles = roles.len(),
            aliases = species_index.len(),
            "Rule tables ready"
        );

        Self {
            species,
            moves,
            abilities,
            roles,
            species_index,
        }
    }

    /// Load all four tables from `data_dir`, one after another.
    pub fn load_dir(data_dir: &Path) -> Self {
        Self::new(
            or_empty(SPECIES_TABLE, read_table(data_dir, SPECIES_TABLE)),
            or_empty(MOVES_TABLE, read_table(data_dir, MOVES_TABLE)),
            or_empty(ABILITIES_TABLE, read_table(data_dir, ABILITIES_TABLE)),
            or_empty(ROLES_TABLE, read_table(data_dir, ROLES_TABLE)),
        )
    }

    /// Load all four tables from `data_dir` concurrently.
    pub async fn load_dir_async(data_dir: &Path) -> Self {
        let (species, moves, abilities, roles) = tokio::join!(
            read_table_async(data_dir, SPECIES_TABLE),
            read_table_async(data_dir, MOVES_TABLE),
            read_table_async(data_dir, ABILITIES_TABLE),
            read_table_async(data_dir, ROLES_TABLE),
        );

        Self::new(
            or_empty(SPECIES_TABLE, species),
            or_empty(MOVES_TABLE, moves),
            or_empty(ABILITIES_TABLE, abilities),
            or_empty(ROLES_TABLE, roles),
        )
    }

    pub fn species_table(&self) -> &IndexMap<String, SpeciesRecord> {
        &self.species
    }

    /// Species by table key, falling back to a record whose `id` matches.
    pub fn species(&self, key: &str) -> Option<&SpeciesRecord> {
        self.species
            .get(key)
            .or_else(|| self.species.values().find(|record| record.id == key))
    }

    /// Canonical species key for free-form text, if any.
    pub fn resolve_species(&self, raw: &str) -> Option<String> {
        self.species_index.resolve(raw, &self.species)
    }

    /// Resolve free-form text straight to its record.
    pub fn species_for_text(&self, raw: &str) -> Option<&SpeciesRecord> {
        self.resolve_species(raw).and_then(|key| self.species(&key))
    }

    pub fn move_record(&self, id: &str) -> Option<&MoveRecord> {
        self.moves.get(id)
    }

    /// Moves in table order.
    pub fn moves(&self) -> impl Iterator<Item = &MoveRecord> {
        self.moves.values()
    }

    pub fn ability(&self, id: &str) -> Option<&AbilityRecord> {
        self.abilities.get(id)
    }

    /// Abilities in table order.
    pub fn abilities(&self) -> impl Iterator<Item = &AbilityRecord> {
        self.abilities.values()
    }

    pub fn role(&self, id: &str) -> Option<&RoleRecord> {
        self.roles.get(id)
    }

    pub fn roles(&self) -> impl Iterator<Item = &RoleRecord> {
        self.roles.values()
    }

    /// Role display name, or the capitalized id when the role is unknown.
    pub fn role_name(&self, id: &str) -> String {
        match self.role(id) {
            Some(role) if !role.name.is_empty() => role.name.clone(),
            _ => capitalize_word(id),
        }
    }
}

/// "striker" → "Striker", "MYSTIC" → "Mystic".
pub fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn or_empty<T>(table: &str, loaded: RuleDataResult<IndexMap<String, T>>) -> IndexMap<String, T> {
    match loaded {
        Ok(records) => {
            tracing::info!(table, records = records.len(), "Loaded rule table");
            records
        }
        Err(err) => {
            tracing::error!(table, error = %err, "Failed to load rule table");
            IndexMap::new()
        }
    }
}

fn locate_table(data_dir: &Path, table: &str) -> RuleDataResult<(PathBuf, TableFormat)> {
    let json = data_dir.join(format!("{}.json", table));
    if json.is_file() {
        return Ok((json, TableFormat::Json));
    }

    let ron = data_dir.join(format!("{}.ron", table));
    if ron.is_file() {
        return Ok((ron, TableFormat::Ron));
    }

    Err(RuleDataError::TableNotFound {
        table: table.to_string(),
        dir: data_dir.to_path_buf(),
    })
}

// The file must parse as a map; each record inside it is converted on its
// own so one malformed entry only drops itself.
fn parse_table<T: DeserializeOwned>(
    path: &Path,
    format: TableFormat,
    content: &str,
) -> RuleDataResult<IndexMap<String, T>> {
    let raw: IndexMap<String, Value> = match format {
        TableFormat::Json => serde_json::from_str(content).map_err(|source| RuleDataError::Json {
            path: path.to_path_buf(),
            source,
        })?,
        TableFormat::Ron => ron::from_str(content).map_err(|source| RuleDataError::Ron {
            path: path.to_path_buf(),
            source,
        })?,
    };
    Ok(convert_records(path, raw))
}

fn convert_records<T: DeserializeOwned>(
    path: &Path,
    raw: IndexMap<String, Value>,
) -> IndexMap<String, T> {
    raw.into_iter()
        .filter_map(|(key, value)| match serde_json::from_value(value) {
            Ok(record) => Some((key, record)),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    record = %key,
                    error = %err,
                    "Skipping malformed rule record"
                );
                None
            }
        })
        .collect()
}

fn read_table<T: DeserializeOwned>(
    data_dir: &Path,
    table: &str,
) -> RuleDataResult<IndexMap<String, T>> {
    let (path, format) = locate_table(data_dir, table)?;
    let content = std::fs::read_to_string(&path).map_err(|source| RuleDataError::Io {
        path: path.clone(),
        source,
    })?;
    parse_table(&path, format, &content)
}

async fn read_table_async<T: DeserializeOwned>(
    data_dir: &Path,
    table: &str,
) -> RuleDataResult<IndexMap<String, T>> {
    let (path, format) = locate_table(data_dir, table)?;
    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| RuleDataError::Io {
            path: path.clone(),
            source,
        })?;
    parse_table(&path, format, &content)
}
