//! Saving and restoring the sheet.
//!
//! The payload keeps the field names of the browser save format so old
//! saves and exports keep loading. Restores are all-or-nothing: a payload
//! that fails validation leaves the party untouched.

pub mod normalize;
pub mod store;

use crate::errors::{RestoreError, RestoreResult, SheetResult};
use crate::party::{PartyState, PARTY_SIZE};
use crate::pools::UsagePool;
use crate::progression::ProgressionTrack;
use crate::rules::RuleTables;
use crate::signature::SignatureMoveState;
use crate::trainer::{TrainerInputs, TrainerNotes, ROLE_SELECTOR_COUNT};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

pub use normalize::normalize_payload;
pub use store::{
    export_file_name, import_sheet, sanitize_export_filename, unwrap_import, write_export,
    ExportEnvelope, SheetStore, EXPORT_FORMAT, EXPORT_FORMAT_VERSION,
};

pub const STORAGE_KEY: &str = "pokemon_trainer_sheet_v1";
pub const STORAGE_VERSION: u32 = 1;

/// Per-slot values keyed `"1"` through `"4"`.
pub type SlotMap<T> = BTreeMap<String, T>;

pub(crate) fn slot_key(slot: usize) -> String {
    slot.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerSnapshot {
    pub player_name: String,
    pub trainer_name: String,
    pub role_selections: SlotMap<String>,
    pub role_levels: SlotMap<i32>,
    pub textareas: TrainerNotes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PokemonEntry {
    pub species: String,
    pub nickname: String,
}

/// The saved sheet, version 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetSnapshot {
    pub version: u32,
    pub saved_at: String,
    pub trainer: TrainerSnapshot,
    pub pokemon: SlotMap<PokemonEntry>,
    pub pokemon_role_progression: SlotMap<Vec<Option<String>>>,
    pub known_nest_moves: SlotMap<Vec<Option<String>>>,
    pub known_great_moves: SlotMap<Vec<Option<String>>>,
    pub great_move_uses: SlotMap<UsagePool>,
    pub selected_ability_by_slot: SlotMap<Option<String>>,
    pub trainer_action_move_by_slot: SlotMap<Option<String>>,
    pub trainer_action_uses: UsagePool,
    pub signature_move_by_slot: SlotMap<SignatureMoveState>,
    pub signature_move_uses_by_slot: SlotMap<UsagePool>,
    pub status_by_slot: SlotMap<String>,
    pub hp_by_slot: SlotMap<String>,
}

/// Reject payloads that cannot be a version-1 sheet. Nothing is read past
/// this point unless it passes.
pub fn validate_payload(payload: &Value) -> RestoreResult<()> {
    let Some(object) = payload.as_object() else {
        return Err(RestoreError::NotAnObject);
    };

    let version = match object.get("version") {
        None | Some(Value::Null) => return Err(RestoreError::MissingVersion),
        Some(version) => version,
    };
    if normalize::coerce_number(version) != Some(STORAGE_VERSION as f64) {
        return Err(RestoreError::VersionMismatch {
            found: version.to_string(),
            expected: STORAGE_VERSION,
        });
    }

    for section in ["trainer", "pokemon"] {
        if !object.get(section).is_some_and(Value::is_object) {
            return Err(RestoreError::MissingSection(section));
        }
    }
    Ok(())
}

impl PartyState {
    pub fn snapshot(&self) -> SheetSnapshot {
        self.snapshot_at(Utc::now())
    }

    pub fn snapshot_at(&self, saved_at: DateTime<Utc>) -> SheetSnapshot {
        let trainer = &self.trainer;
        let mut snapshot = SheetSnapshot {
            version: STORAGE_VERSION,
            saved_at: saved_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            trainer: TrainerSnapshot {
                player_name: trainer.player_name.clone(),
                trainer_name: trainer.trainer_name.clone(),
                role_selections: SlotMap::new(),
                role_levels: SlotMap::new(),
                textareas: trainer.notes.clone(),
            },
            pokemon: SlotMap::new(),
            pokemon_role_progression: SlotMap::new(),
            known_nest_moves: SlotMap::new(),
            known_great_moves: SlotMap::new(),
            great_move_uses: SlotMap::new(),
            selected_ability_by_slot: SlotMap::new(),
            trainer_action_move_by_slot: SlotMap::new(),
            trainer_action_uses: self.trainer_action_uses,
            signature_move_by_slot: SlotMap::new(),
            signature_move_uses_by_slot: SlotMap::new(),
            status_by_slot: SlotMap::new(),
            hp_by_slot: SlotMap::new(),
        };

        for index in 0..ROLE_SELECTOR_COUNT {
            let key = slot_key(index + 1);
            snapshot
                .trainer
                .role_selections
                .insert(key.clone(), trainer.role_selections[index].clone());
            snapshot.trainer.role_levels.insert(key, trainer.role_levels[index]);
        }

        for (slot, state) in self.slots() {
            let key = slot_key(slot);
            snapshot.pokemon.insert(
                key.clone(),
                PokemonEntry {
                    species: state.species_text.trim().to_string(),
                    nickname: state.nickname.trim().to_string(),
                },
            );
            snapshot
                .pokemon_role_progression
                .insert(key.clone(), state.progression.entries().to_vec());
            snapshot.known_nest_moves.insert(key.clone(), state.nest_moves.clone());
            snapshot.known_great_moves.insert(key.clone(), state.great_moves.clone());
            snapshot.great_move_uses.insert(key.clone(), state.great_uses);
            snapshot
                .selected_ability_by_slot
                .insert(key.clone(), state.selected_ability.clone());
            snapshot
                .trainer_action_move_by_slot
                .insert(key.clone(), state.trainer_action_move.clone());
            snapshot
                .signature_move_by_slot
                .insert(key.clone(), state.signature.clone());
            snapshot
                .signature_move_uses_by_slot
                .insert(key.clone(), state.signature_uses);
            snapshot.status_by_slot.insert(key.clone(), state.status.clone());
            snapshot.hp_by_slot.insert(key, state.hp.clone());
        }

        snapshot
    }

    /// Replace the whole sheet with a saved payload. On any validation
    /// error the current state is kept as it was.
    pub fn restore(&mut self, payload: &Value, tables: &RuleTables) -> SheetResult<()> {
        if let Err(err) = validate_payload(payload) {
            tracing::warn!(error = %err, "Rejected saved sheet");
            return Err(err.into());
        }
        let snapshot = normalize_payload(payload)?;

        let mut next = PartyState::new();
        next.restoring = true;
        next.trainer = trainer_from_snapshot(&snapshot.trainer);
        next.trainer_action_uses = snapshot.trainer_action_uses;

        for slot in 1..=PARTY_SIZE {
            let key = slot_key(slot);
            let state = next.slot_mut(slot)?;

            if let Some(entries) = snapshot.pokemon_role_progression.get(&key) {
                state.progression = ProgressionTrack::from_entries(entries.clone());
            }
            state.nest_moves = snapshot.known_nest_moves.get(&key).cloned().unwrap_or_default();
            if let Some(great) = snapshot.known_great_moves.get(&key) {
                state.great_moves = great.clone();
            }
            state.great_uses = snapshot.great_move_uses.get(&key).copied().unwrap_or_default();
            state.selected_ability = snapshot
                .selected_ability_by_slot
                .get(&key)
                .cloned()
                .flatten();
            state.trainer_action_move = snapshot
                .trainer_action_move_by_slot
                .get(&key)
                .cloned()
                .flatten();
            state.signature = snapshot
                .signature_move_by_slot
                .get(&key)
                .cloned()
                .unwrap_or_default();
            state.signature_uses = snapshot
                .signature_move_uses_by_slot
                .get(&key)
                .copied()
                .unwrap_or_default();
            state.status = snapshot.status_by_slot.get(&key).cloned().unwrap_or_default();
            state.hp = snapshot.hp_by_slot.get(&key).cloned().unwrap_or_default();
        }

        next.sync_tracks();

        for slot in 1..=PARTY_SIZE {
            let entry = snapshot.pokemon.get(&slot_key(slot)).cloned().unwrap_or_default();
            next.set_species_text(slot, &entry.species, tables)?;
            next.slot_mut(slot)?.nickname = entry.nickname;
        }

        next.restoring = false;
        next.refresh(tables);
        next.clamp_pools();

        *self = next;
        tracing::debug!(level = self.pokemon_level(), "Restored saved sheet");
        Ok(())
    }
}

fn trainer_from_snapshot(snapshot: &TrainerSnapshot) -> TrainerInputs {
    let mut trainer = TrainerInputs {
        player_name: snapshot.player_name.clone(),
        trainer_name: snapshot.trainer_name.clone(),
        notes: snapshot.textareas.clone(),
        ..TrainerInputs::default()
    };
    for index in 0..ROLE_SELECTOR_COUNT {
        let key = slot_key(index + 1);
        if let Some(role) = snapshot.role_selections.get(&key) {
            trainer.role_selections[index] = role.clone();
        }
        if let Some(level) = snapshot.role_levels.get(&key) {
            trainer.role_levels[index] = *level;
        }
    }
    trainer
}
