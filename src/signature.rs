//! Signature moves: a known move re-flavored by the trainer's bond.
//!
//! The state keeps only the base move id and a set of field overrides. The
//! playable move is composed on demand and the move table is never touched.

use crate::errors::{OverrideError, OverrideResult};
use crate::rules::RuleTables;
use schema::{BuffDebuff, DiceCount, MoveCategory, MoveRecord, StatusInfliction};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString};

const BOND_PREFIX: &str = "This move has been altered by your bond. ";

/// Fields a player may override, spelled as in the saved sheet. Anything
/// else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum OverrideKey {
    Name,
    Element,
    Category,
    BaseDice,
    DescriptionPrefix,
    DescriptionSuffix,
    Range,
    Target,
    Economy,
    Tags,
    Status,
    BuffDebuff,
}

/// A value pushed into an override field. Blank values clear the override.
#[derive(Debug, Clone, PartialEq)]
pub enum OverrideValue {
    Clear,
    Text(String),
    Dice(DiceCount),
    Tags(Vec<String>),
    Status(StatusInfliction),
    BuffDebuff(BuffDebuff),
}

impl OverrideValue {
    fn kind(&self) -> &'static str {
        match self {
            OverrideValue::Clear => "nothing",
            OverrideValue::Text(_) => "text",
            OverrideValue::Dice(_) => "a dice count",
            OverrideValue::Tags(_) => "a tag list",
            OverrideValue::Status(_) => "a status",
            OverrideValue::BuffDebuff(_) => "a buff or debuff",
        }
    }

    // Empty text, empty tag lists and non-finite dice mean "inherit".
    fn is_blank(&self) -> bool {
        match self {
            OverrideValue::Clear => true,
            OverrideValue::Text(text) => text.is_empty(),
            OverrideValue::Dice(DiceCount::Number(n)) => !n.is_finite(),
            OverrideValue::Dice(DiceCount::Text(text)) => text.is_empty(),
            OverrideValue::Tags(tags) => tags.is_empty(),
            OverrideValue::Status(status) => status.inflicts.is_empty(),
            OverrideValue::BuffDebuff(buff) => buff.stat.is_empty(),
        }
    }
}

/// Per-field replacements for the base move. `None` inherits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignatureOverrides {
    pub name: Option<String>,
    pub element: Option<String>,
    pub category: Option<MoveCategory>,
    pub base_dice: Option<DiceCount>,
    pub description_prefix: Option<String>,
    pub description_suffix: Option<String>,
    pub range: Option<String>,
    pub target: Option<String>,
    pub economy: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<StatusInfliction>,
    pub buff_debuff: Option<BuffDebuff>,
}

impl SignatureOverrides {
    /// Overrides seeded when a base move is picked with bond defaults on.
    pub fn bond_defaults() -> Self {
        Self {
            element: Some("fire".to_string()),
            base_dice: Some(DiceCount::Number(3.0)),
            description_prefix: Some(BOND_PREFIX.to_string()),
            ..Self::default()
        }
    }

    fn text_slot(&mut self, key: OverrideKey) -> Option<&mut Option<String>> {
        match key {
            OverrideKey::Name => Some(&mut self.name),
            OverrideKey::Element => Some(&mut self.element),
            OverrideKey::DescriptionPrefix => Some(&mut self.description_prefix),
            OverrideKey::DescriptionSuffix => Some(&mut self.description_suffix),
            OverrideKey::Range => Some(&mut self.range),
            OverrideKey::Target => Some(&mut self.target),
            OverrideKey::Economy => Some(&mut self.economy),
            _ => None,
        }
    }

    pub fn clear(&mut self, key: OverrideKey) {
        match key {
            OverrideKey::Category => self.category = None,
            OverrideKey::BaseDice => self.base_dice = None,
            OverrideKey::Tags => self.tags = None,
            OverrideKey::Status => self.status = None,
            OverrideKey::BuffDebuff => self.buff_debuff = None,
            text => {
                if let Some(slot) = self.text_slot(text) {
                    *slot = None;
                }
            }
        }
    }

    /// Store `value` under `key`, or clear it when the value is blank.
    pub fn assign(&mut self, key: OverrideKey, value: OverrideValue) -> OverrideResult<()> {
        if value.is_blank() {
            self.clear(key);
            return Ok(());
        }

        let mismatch = |expected: &'static str| OverrideError::ValueMismatch {
            key: key.to_string(),
            expected,
        };

        match (key, value) {
            (OverrideKey::Category, OverrideValue::Text(text)) => {
                let category = MoveCategory::from_str(text.trim())
                    .map_err(|_| mismatch("physical, special, healing or other"))?;
                self.category = Some(category);
            }
            (OverrideKey::BaseDice, OverrideValue::Dice(dice)) => self.base_dice = Some(dice),
            (OverrideKey::BaseDice, OverrideValue::Text(text)) => {
                self.base_dice = Some(DiceCount::Text(text))
            }
            (OverrideKey::Tags, OverrideValue::Tags(tags)) => self.tags = Some(tags),
            (OverrideKey::Status, OverrideValue::Status(status)) => self.status = Some(status),
            (OverrideKey::Status, OverrideValue::Text(inflicts)) => {
                self.status = Some(StatusInfliction { inflicts })
            }
            (OverrideKey::BuffDebuff, OverrideValue::BuffDebuff(buff)) => {
                self.buff_debuff = Some(buff)
            }
            (key, OverrideValue::Text(text)) => match self.text_slot(key) {
                Some(slot) => *slot = Some(text),
                None => return Err(mismatch(expected_kind(key))),
            },
            (key, other) => {
                tracing::debug!(key = %key, value = other.kind(), "Override value has the wrong shape");
                return Err(mismatch(expected_kind(key)));
            }
        }
        Ok(())
    }

    /// Apply the non-empty overrides onto a copy of `base`.
    pub fn apply_to(&self, base: &MoveRecord) -> MoveRecord {
        let mut resolved = base.clone();
        if let Some(name) = &self.name {
            resolved.name = name.clone();
        }
        if let Some(element) = &self.element {
            resolved.element = Some(element.clone());
        }
        if let Some(category) = self.category {
            resolved.category = category;
        }
        if let Some(dice) = &self.base_dice {
            resolved.base_dice = Some(dice.clone());
        }
        if let Some(prefix) = &self.description_prefix {
            resolved.description_prefix = Some(prefix.clone());
        }
        if let Some(suffix) = &self.description_suffix {
            resolved.description_suffix = Some(suffix.clone());
        }
        if let Some(range) = &self.range {
            resolved.range = Some(range.clone());
        }
        if let Some(target) = &self.target {
            resolved.target = Some(target.clone());
        }
        if let Some(economy) = &self.economy {
            resolved.economy = Some(economy.clone());
        }
        if let Some(tags) = &self.tags {
            resolved.tags = tags.clone();
        }
        if let Some(status) = &self.status {
            resolved.status = Some(status.clone());
        }
        if let Some(buff) = &self.buff_debuff {
            resolved.buff_debuff = Some(buff.clone());
        }
        resolved
    }
}

fn expected_kind(key: OverrideKey) -> &'static str {
    match key {
        OverrideKey::Category => "a category name",
        OverrideKey::BaseDice => "a dice count",
        OverrideKey::Tags => "a tag list",
        OverrideKey::Status => "a status",
        OverrideKey::BuffDebuff => "a buff or debuff",
        _ => "text",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureUses {
    pub max: i32,
    pub used: i32,
}

impl Default for SignatureUses {
    fn default() -> Self {
        Self { max: 1, used: 0 }
    }
}

/// A slot's signature move: which known move it is built on and how it
/// differs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignatureMoveState {
    pub base_move_id: Option<String>,
    pub overrides: SignatureOverrides,
    pub uses: SignatureUses,
}

impl SignatureMoveState {
    /// The empty state: no base move, nothing overridden.
    pub fn template() -> Self {
        Self::default()
    }

    /// Fresh state built on `move_id`.
    pub fn with_base(move_id: &str, seed_bond_defaults: bool) -> Self {
        let overrides = if seed_bond_defaults {
            SignatureOverrides::bond_defaults()
        } else {
            SignatureOverrides::default()
        };

        Self {
            base_move_id: Some(move_id.to_string()),
            overrides,
            uses: SignatureUses::default(),
        }
    }

    pub fn is_selected(&self) -> bool {
        self.base_move_id.is_some()
    }

    /// Set one override by its saved-sheet name. Unknown names are rejected
    /// and leave the state unchanged.
    pub fn set_override(&mut self, key: &str, value: OverrideValue) -> OverrideResult<()> {
        let parsed = match OverrideKey::from_str(key) {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!(key, "Blocked invalid signature override");
                return Err(OverrideError::UnknownKey(key.to_string()));
            }
        };

        self.overrides.assign(parsed, value).map_err(|err| {
            tracing::warn!(key, error = %err, "Rejected signature override");
            err
        })
    }

    /// The playable move: a copy of the base move with overrides applied.
    /// `None` when no base move is chosen or it is missing from the table.
    pub fn compose(&self, tables: &RuleTables) -> Option<MoveRecord> {
        let base_id = self.base_move_id.as_deref()?;
        let base = tables.move_record(base_id)?;
        Some(self.overrides.apply_to(base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_tables;
    use pretty_assertions::assert_eq;
    use schema::MoveTier;
    use strum::IntoEnumIterator;

    #[test]
    fn test_override_keys_match_saved_names() {
        let names: Vec<String> = OverrideKey::iter().map(|key| key.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "name",
                "element",
                "category",
                "baseDice",
                "descriptionPrefix",
                "descriptionSuffix",
                "range",
                "target",
                "economy",
                "tags",
                "status",
                "buffDebuff"
            ]
        );
    }

    #[test]
    fn test_compose_applies_overrides_without_touching_table() {
        let tables = sample_tables();
        let before = tables.move_record("thunderbolt").cloned();

        let mut state = SignatureMoveState::with_base("thunderbolt", false);
        state
            .set_override("name", OverrideValue::Text("Bond Bolt".into()))
            .unwrap();
        state
            .set_override("baseDice", OverrideValue::Dice(DiceCount::Number(5.0)))
            .unwrap();
        state
            .set_override("category", OverrideValue::Text("Physical".into()))
            .unwrap();

        let composed = state.compose(&tables).unwrap();
        assert_eq!(composed.name, "Bond Bolt");
        assert_eq!(composed.base_dice, Some(DiceCount::Number(5.0)));
        assert_eq!(composed.category, MoveCategory::Physical);
        assert_eq!(composed.tier, MoveTier::Great);
        assert_eq!(composed.element.as_deref(), Some("electric"));

        // Composing twice gives the same move and the table is unchanged.
        assert_eq!(state.compose(&tables), Some(composed));
        assert_eq!(tables.move_record("thunderbolt").cloned(), before);
    }

    #[test]
    fn test_compose_without_base_move() {
        let tables = sample_tables();
        assert_eq!(SignatureMoveState::template().compose(&tables), None);
        assert_eq!(
            SignatureMoveState::with_base("missing_move", false).compose(&tables),
            None
        );
    }

    #[test]
    fn test_unknown_key_is_rejected_and_state_unchanged() {
        let mut state = SignatureMoveState::with_base("ember", false);
        let before = state.clone();

        let err = state
            .set_override("tier", OverrideValue::Text("signature".into()))
            .unwrap_err();

        assert_eq!(err, OverrideError::UnknownKey("tier".into()));
        assert_eq!(state, before);
    }

    #[test]
    fn test_blank_values_clear_overrides() {
        let mut state = SignatureMoveState::with_base("ember", true);
        assert_eq!(state.overrides.element.as_deref(), Some("fire"));

        state.set_override("element", OverrideValue::Text(String::new())).unwrap();
        state.set_override("baseDice", OverrideValue::Dice(DiceCount::Number(f64::NAN))).unwrap();
        state.set_override("tags", OverrideValue::Tags(Vec::new())).unwrap();

        assert_eq!(state.overrides.element, None);
        assert_eq!(state.overrides.base_dice, None);
        assert_eq!(state.overrides.tags, None);
        assert!(state.overrides.description_prefix.is_some());
    }

    #[test]
    fn test_mismatched_value_is_rejected() {
        let mut state = SignatureMoveState::with_base("ember", false);
        let err = state
            .set_override("tags", OverrideValue::Dice(DiceCount::Number(2.0)))
            .unwrap_err();
        assert!(matches!(err, OverrideError::ValueMismatch { .. }));

        let err = state
            .set_override("category", OverrideValue::Text("psychic".into()))
            .unwrap_err();
        assert!(matches!(err, OverrideError::ValueMismatch { .. }));
        assert_eq!(state.overrides, SignatureOverrides::default());
    }

    #[test]
    fn test_template_and_bond_defaults() {
        let template = SignatureMoveState::template();
        assert_eq!(template.base_move_id, None);
        assert_eq!(template.uses, SignatureUses { max: 1, used: 0 });

        let seeded = SignatureMoveState::with_base("ember", true);
        assert_eq!(seeded.overrides.base_dice, Some(DiceCount::Number(3.0)));
        assert_eq!(
            seeded.overrides.description_prefix.as_deref(),
            Some("This move has been altered by your bond. ")
        );
    }

    #[test]
    fn test_state_serializes_with_saved_field_names() {
        let state = SignatureMoveState::with_base("ember", false);
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["baseMoveId"], "ember");
        assert_eq!(value["overrides"]["buffDebuff"], serde_json::Value::Null);
        assert_eq!(value["uses"]["max"], 1);
    }
}
