use crate::lenient::{lenient_stat, null_as_default};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// The six sheet stats, spelled the way the rule files and stat boost
/// tables spell them (`atk`, `def`, `spAtk`, `spDef`, `man`, `spd`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum StatName {
    Atk,
    Def,
    SpAtk,
    SpDef,
    Man,
    Spd,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BaseStats {
    #[serde(deserialize_with = "lenient_stat")]
    pub atk: i32,
    #[serde(deserialize_with = "lenient_stat")]
    pub def: i32,
    #[serde(deserialize_with = "lenient_stat")]
    pub sp_atk: i32,
    #[serde(deserialize_with = "lenient_stat")]
    pub sp_def: i32,
    #[serde(deserialize_with = "lenient_stat")]
    pub man: i32,
    #[serde(deserialize_with = "lenient_stat")]
    pub spd: i32,
}

impl BaseStats {
    pub fn get(&self, stat: StatName) -> i32 {
        match stat {
            StatName::Atk => self.atk,
            StatName::Def => self.def,
            StatName::SpAtk => self.sp_atk,
            StatName::SpDef => self.sp_def,
            StatName::Man => self.man,
            StatName::Spd => self.spd,
        }
    }

    pub fn get_mut(&mut self, stat: StatName) -> &mut i32 {
        match stat {
            StatName::Atk => &mut self.atk,
            StatName::Def => &mut self.def,
            StatName::SpAtk => &mut self.sp_atk,
            StatName::SpDef => &mut self.sp_def,
            StatName::Man => &mut self.man,
            StatName::Spd => &mut self.spd,
        }
    }
}

/// Moves a species knows natively. `native` is the canonical list; the
/// optional per-tier lists are native as well and are appended after it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeMoves {
    #[serde(deserialize_with = "null_as_default")]
    pub native: Vec<String>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub nest: Vec<String>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub great: Vec<String>,
}

impl NativeMoves {
    /// All native move ids in file order, first occurrence kept.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for id in self.native.iter().chain(&self.nest).chain(&self.great) {
            if !id.is_empty() && !ids.contains(&id.as_str()) {
                ids.push(id);
            }
        }
        ids
    }

    pub fn contains(&self, move_id: &str) -> bool {
        self.native.iter().chain(&self.nest).chain(&self.great).any(|id| id == move_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dex: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub base_stats: BaseStats,
    #[serde(default, deserialize_with = "null_as_default")]
    pub moves: NativeMoves,
    /// Native ability ids, always a flat ordered list once loaded.
    #[serde(default, deserialize_with = "deserialize_abilities")]
    pub abilities: Vec<String>,
}

impl SpeciesRecord {
    /// Regional form label, ignoring blank values.
    pub fn form_label(&self) -> Option<&str> {
        self.form
            .as_deref()
            .map(str::trim)
            .filter(|form| !form.is_empty())
    }
}

/// Ability lists show up in three shapes in species files: a plain list, a
/// map of source name to list, or a single id.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAbilities {
    List(Vec<String>),
    Grouped(IndexMap<String, Vec<String>>),
    Single(String),
}

fn deserialize_abilities<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawAbilities>::deserialize(deserializer)?;
    let ids = match raw {
        None => Vec::new(),
        Some(RawAbilities::List(ids)) => ids,
        Some(RawAbilities::Grouped(groups)) => groups.into_values().flatten().collect(),
        Some(RawAbilities::Single(id)) => vec![id],
    };
    Ok(ids.into_iter().filter(|id| !id.is_empty()).collect())
}
