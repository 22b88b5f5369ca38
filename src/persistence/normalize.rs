//! Lenient reading of saved payloads.
//!
//! Saves are hand-editable JSON, so every field is coerced rather than
//! strictly deserialized: numbers may arrive as strings, maps may be
//! missing, and arrays may be short. Only `validate_payload` can reject.

use super::{
    slot_key, PokemonEntry, SheetSnapshot, SlotMap, TrainerSnapshot, STORAGE_VERSION,
};
use crate::errors::{RestoreError, RestoreResult};
use crate::party::{GREAT_MOVE_SLOTS, PARTY_SIZE};
use crate::pools::UsagePool;
use crate::signature::{OverrideKey, SignatureMoveState, SignatureOverrides, SignatureUses};
use crate::trainer::{TrainerNotes, ROLE_SELECTOR_COUNT};
use schema::{BuffDebuff, DiceCount, MoveCategory, StatusInfliction};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Numeric reading of a JSON value. Null, false and blank strings read
/// as zero; anything unparseable reads as `None`.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok().filter(|n| !n.is_nan())
            }
        }
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Truncated integer, or `fallback` when missing or not a finite number.
pub fn safe_int(value: Option<&Value>, fallback: i32) -> i32 {
    value
        .and_then(coerce_number)
        .filter(|n| n.is_finite())
        .map(|n| n.trunc().clamp(i32::MIN as f64, i32::MAX as f64) as i32)
        .unwrap_or(fallback)
}

/// String form of a loose value. Empty for null, false, zero and
/// containers.
pub fn loose_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) if number.as_f64() != Some(0.0) => number.to_string(),
        Some(Value::Bool(true)) => "true".to_string(),
        _ => String::new(),
    }
}

fn optional_id(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Free text stored per slot. Non-string values keep their JSON text.
fn scalar_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

fn object_at<'a>(parent: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    parent.get(key).and_then(Value::as_object)
}

fn slot_entry<'a>(map: Option<&'a Map<String, Value>>, slot: usize) -> Option<&'a Value> {
    map.and_then(|map| map.get(&slot_key(slot)))
}

fn id_list(value: Option<&Value>, exact_len: Option<usize>) -> Vec<Option<String>> {
    let mut list: Vec<Option<String>> = match value {
        Some(Value::Array(items)) => items.iter().map(optional_id).collect(),
        _ => Vec::new(),
    };
    if let Some(len) = exact_len {
        list.resize(len, None);
    }
    list
}

fn usage_pool(value: Option<&Value>) -> UsagePool {
    let used = value.and_then(Value::as_object).and_then(|pool| pool.get("used"));
    UsagePool::new(safe_int(used, 0))
}

fn normalize_trainer(trainer: Option<&Map<String, Value>>) -> TrainerSnapshot {
    let empty = Map::new();
    let trainer = trainer.unwrap_or(&empty);
    let selections = object_at(trainer, "roleSelections");
    let levels = object_at(trainer, "roleLevels");
    let textareas = object_at(trainer, "textareas");
    let text = |key: &str| loose_string(textareas.and_then(|areas| areas.get(key)));

    let mut snapshot = TrainerSnapshot {
        player_name: loose_string(trainer.get("playerName")),
        trainer_name: loose_string(trainer.get("trainerName")),
        role_selections: SlotMap::new(),
        role_levels: SlotMap::new(),
        textareas: TrainerNotes {
            trainer_actions: text("trainerActions"),
            trainer_features: text("trainerFeatures"),
            bag: text("bag"),
        },
    };

    for selector in 1..=ROLE_SELECTOR_COUNT {
        let key = slot_key(selector);
        snapshot
            .role_selections
            .insert(key.clone(), loose_string(slot_entry(selections, selector)));
        snapshot
            .role_levels
            .insert(key, safe_int(slot_entry(levels, selector), 0));
    }
    snapshot
}

fn normalize_pokemon(pokemon: Option<&Map<String, Value>>) -> SlotMap<PokemonEntry> {
    (1..=PARTY_SIZE)
        .map(|slot| {
            let entry = slot_entry(pokemon, slot).and_then(Value::as_object);
            let field = |key: &str| {
                loose_string(entry.and_then(|entry| entry.get(key)))
                    .trim()
                    .to_string()
            };
            (
                slot_key(slot),
                PokemonEntry {
                    species: field("species"),
                    nickname: field("nickname"),
                },
            )
        })
        .collect()
}

fn override_text(value: &Value) -> Option<String> {
    value.as_str().filter(|text| !text.is_empty()).map(str::to_string)
}

/// Read each allow-listed override. Unknown keys and unreadable values
/// are dropped.
fn normalize_overrides(raw: Option<&Map<String, Value>>) -> SignatureOverrides {
    let mut overrides = SignatureOverrides::default();
    let Some(raw) = raw else {
        return overrides;
    };

    for (name, value) in raw {
        let Ok(key) = OverrideKey::from_str(name) else {
            tracing::warn!(key = %name, "Dropping unknown signature override from save");
            continue;
        };
        if value.is_null() {
            continue;
        }

        match key {
            OverrideKey::Name => overrides.name = override_text(value),
            OverrideKey::Element => overrides.element = override_text(value),
            OverrideKey::DescriptionPrefix => overrides.description_prefix = override_text(value),
            OverrideKey::DescriptionSuffix => overrides.description_suffix = override_text(value),
            OverrideKey::Range => overrides.range = override_text(value),
            OverrideKey::Target => overrides.target = override_text(value),
            OverrideKey::Economy => overrides.economy = override_text(value),
            OverrideKey::Category => {
                overrides.category = value
                    .as_str()
                    .and_then(|text| MoveCategory::from_str(text.trim()).ok())
            }
            OverrideKey::BaseDice => {
                overrides.base_dice = match value {
                    Value::Number(number) => number.as_f64().map(DiceCount::Number),
                    Value::String(text) if !text.is_empty() => Some(DiceCount::Text(text.clone())),
                    _ => None,
                }
            }
            OverrideKey::Tags => {
                overrides.tags = value.as_array().map(|tags| {
                    tags.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
            }
            OverrideKey::Status => {
                overrides.status = serde_json::from_value::<StatusInfliction>(value.clone()).ok()
            }
            OverrideKey::BuffDebuff => {
                overrides.buff_debuff = serde_json::from_value::<BuffDebuff>(value.clone()).ok()
            }
        }
    }
    overrides
}

fn normalize_signature(raw: Option<&Value>) -> SignatureMoveState {
    let Some(raw) = raw.and_then(Value::as_object) else {
        return SignatureMoveState::template();
    };
    let uses = object_at(raw, "uses");
    let defaults = SignatureUses::default();

    SignatureMoveState {
        base_move_id: raw.get("baseMoveId").and_then(optional_id),
        overrides: normalize_overrides(object_at(raw, "overrides")),
        uses: SignatureUses {
            max: safe_int(uses.and_then(|uses| uses.get("max")), defaults.max),
            used: safe_int(uses.and_then(|uses| uses.get("used")), defaults.used),
        },
    }
}

fn per_slot<T>(
    payload: &Map<String, Value>,
    key: &str,
    read: impl Fn(Option<&Value>) -> T,
) -> SlotMap<T> {
    let map = object_at(payload, key);
    (1..=PARTY_SIZE)
        .map(|slot| (slot_key(slot), read(slot_entry(map, slot))))
        .collect()
}

/// Coerce a validated payload into a snapshot.
pub fn normalize_payload(payload: &Value) -> RestoreResult<SheetSnapshot> {
    let payload = payload.as_object().ok_or(RestoreError::NotAnObject)?;

    Ok(SheetSnapshot {
        version: safe_int(payload.get("version"), STORAGE_VERSION as i32).max(0) as u32,
        saved_at: loose_string(payload.get("savedAt")),
        trainer: normalize_trainer(object_at(payload, "trainer")),
        pokemon: normalize_pokemon(object_at(payload, "pokemon")),
        pokemon_role_progression: per_slot(payload, "pokemonRoleProgression", |v| id_list(v, None)),
        known_nest_moves: per_slot(payload, "knownNestMoves", |v| id_list(v, None)),
        known_great_moves: per_slot(payload, "knownGreatMoves", |v| {
            id_list(v, Some(GREAT_MOVE_SLOTS))
        }),
        great_move_uses: per_slot(payload, "greatMoveUses", usage_pool),
        selected_ability_by_slot: per_slot(payload, "selectedAbilityBySlot", |v| {
            v.and_then(optional_id)
        }),
        trainer_action_move_by_slot: per_slot(payload, "trainerActionMoveBySlot", |v| {
            v.and_then(optional_id)
        }),
        trainer_action_uses: usage_pool(payload.get("trainerActionUses")),
        signature_move_by_slot: per_slot(payload, "signatureMoveBySlot", normalize_signature),
        signature_move_uses_by_slot: per_slot(payload, "signatureMoveUsesBySlot", usage_pool),
        status_by_slot: per_slot(payload, "statusBySlot", scalar_text),
        hp_by_slot: per_slot(payload, "hpBySlot", scalar_text),
    })
}
