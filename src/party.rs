use crate::capabilities::SheetResolver;
use crate::eligibility::{max_great_slots, nest_move_limit};
use crate::errors::{SheetError, SheetResult};
use crate::pools::{
    great_move_capacity, signature_move_capacity, trainer_action_capacity, UsagePool,
};
use crate::progression::ProgressionTrack;
use crate::rules::RuleTables;
use crate::signature::{OverrideValue, SignatureMoveState};
use crate::trainer::{TrainerInputs, ROLE_SELECTOR_COUNT};

pub const PARTY_SIZE: usize = 4;
pub const GREAT_MOVE_SLOTS: usize = 4;

/// Everything the player has chosen for one party Pokemon.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotState {
    /// Species text exactly as entered, trimmed.
    pub species_text: String,
    /// Species key the text last resolved to. Partial text keeps the old key.
    pub resolved_species: Option<String>,
    pub nickname: String,
    pub progression: ProgressionTrack,
    pub nest_moves: Vec<Option<String>>,
    /// Always `GREAT_MOVE_SLOTS` long.
    pub great_moves: Vec<Option<String>>,
    pub great_uses: UsagePool,
    pub selected_ability: Option<String>,
    pub trainer_action_move: Option<String>,
    pub signature: SignatureMoveState,
    pub signature_uses: UsagePool,
    pub status: String,
    pub hp: String,
}

impl SlotState {
    pub fn new(pokemon_level: u8) -> Self {
        Self {
            species_text: String::new(),
            resolved_species: None,
            nickname: String::new(),
            progression: ProgressionTrack::new_for_level(pokemon_level),
            nest_moves: Vec::new(),
            great_moves: vec![None; GREAT_MOVE_SLOTS],
            great_uses: UsagePool::default(),
            selected_ability: None,
            trainer_action_move: None,
            signature: SignatureMoveState::template(),
            signature_uses: UsagePool::default(),
            status: String::new(),
            hp: String::new(),
        }
    }

    /// Clear every per-Pokemon choice. Species text and HP survive.
    fn reset(&mut self, pokemon_level: u8) {
        let species_text = std::mem::take(&mut self.species_text);
        let resolved_species = self.resolved_species.take();
        let hp = std::mem::take(&mut self.hp);

        *self = Self {
            species_text,
            resolved_species,
            hp,
            ..Self::new(pokemon_level)
        };
    }
}

impl Default for SlotState {
    fn default() -> Self {
        Self::new(1)
    }
}

/// The whole sheet: trainer inputs plus four party slots. Slots are
/// addressed 1 through 4.
#[derive(Debug, Clone, PartialEq)]
pub struct PartyState {
    pub trainer: TrainerInputs,
    pub(crate) slots: [SlotState; PARTY_SIZE],
    pub trainer_action_uses: UsagePool,
    pub(crate) restoring: bool,
}

impl Default for PartyState {
    fn default() -> Self {
        Self::new()
    }
}

impl PartyState {
    pub fn new() -> Self {
        Self {
            trainer: TrainerInputs::default(),
            slots: std::array::from_fn(|_| SlotState::new(1)),
            trainer_action_uses: UsagePool::default(),
            restoring: false,
        }
    }

    /// True while a saved sheet is being applied.
    pub fn is_restoring(&self) -> bool {
        self.restoring
    }

    pub fn slot(&self, slot: usize) -> SheetResult<&SlotState> {
        slot.checked_sub(1)
            .and_then(|index| self.slots.get(index))
            .ok_or(SheetError::InvalidSlot(slot))
    }

    pub fn slot_mut(&mut self, slot: usize) -> SheetResult<&mut SlotState> {
        slot.checked_sub(1)
            .and_then(|index| self.slots.get_mut(index))
            .ok_or(SheetError::InvalidSlot(slot))
    }

    pub fn slots(&self) -> impl Iterator<Item = (usize, &SlotState)> {
        self.slots.iter().enumerate().map(|(index, state)| (index + 1, state))
    }

    pub fn resolver<'a>(&'a self, tables: &'a RuleTables) -> SheetResolver<'a> {
        SheetResolver::new(tables, self)
    }

    pub fn pokemon_level(&self) -> u8 {
        self.trainer.pokemon_level()
    }

    // --- Species & identity ---

    /// Store the species text for a slot. When the text resolves to a
    /// different species than before, the slot's choices are reset (except
    /// while restoring). Returns the resolved key, if any.
    pub fn set_species_text(
        &mut self,
        slot: usize,
        raw: &str,
        tables: &RuleTables,
    ) -> SheetResult<Option<String>> {
        let resolved = tables.resolve_species(raw);
        let restoring = self.restoring;
        let level = self.pokemon_level();
        let state = self.slot_mut(slot)?;

        state.species_text = raw.trim().to_string();

        if !restoring && resolved.is_some() && resolved != state.resolved_species {
            tracing::debug!(
                slot,
                from = ?state.resolved_species,
                to = ?resolved,
                "Species changed, resetting slot"
            );
            state.reset(level);
        }

        if resolved.is_some() {
            state.resolved_species = resolved.clone();
        } else if state.species_text.is_empty() {
            state.resolved_species = None;
        }
        Ok(resolved)
    }

    /// Explicit reset of one slot's choices.
    pub fn reset_slot(&mut self, slot: usize) -> SheetResult<()> {
        let level = self.pokemon_level();
        self.slot_mut(slot)?.reset(level);
        Ok(())
    }

    /// Nickname with its first letter capitalized.
    pub fn set_nickname(&mut self, slot: usize, raw: &str) -> SheetResult<()> {
        let trimmed = raw.trim();
        let mut chars = trimmed.chars();
        let nickname = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        self.slot_mut(slot)?.nickname = nickname;
        Ok(())
    }

    pub fn set_status(&mut self, slot: usize, status: &str) -> SheetResult<()> {
        self.slot_mut(slot)?.status = status.to_string();
        Ok(())
    }

    pub fn set_hp(&mut self, slot: usize, hp: &str) -> SheetResult<()> {
        self.slot_mut(slot)?.hp = hp.to_string();
        Ok(())
    }

    // --- Trainer roles & progression ---

    fn selector_index(selector: usize) -> SheetResult<usize> {
        selector
            .checked_sub(1)
            .filter(|index| *index < ROLE_SELECTOR_COUNT)
            .ok_or(SheetError::InvalidRoleSelector(selector))
    }

    /// Set role selector `selector` (1-based). A blank role clears it.
    pub fn set_role_selection(
        &mut self,
        selector: usize,
        role: &str,
        tables: &RuleTables,
    ) -> SheetResult<()> {
        let index = Self::selector_index(selector)?;
        self.trainer.role_selections[index] = role.trim().to_string();
        self.refresh(tables);
        Ok(())
    }

    pub fn set_role_level(
        &mut self,
        selector: usize,
        level: i32,
        tables: &RuleTables,
    ) -> SheetResult<()> {
        let index = Self::selector_index(selector)?;
        self.trainer.role_levels[index] = level;
        self.refresh(tables);
        Ok(())
    }

    /// Resize every progression track to the current Pokemon level.
    pub fn sync_tracks(&mut self) {
        let level = self.pokemon_level();
        for state in self.slots.iter_mut() {
            state.progression.resize(level);
        }
    }

    /// Resize the tracks, then drop picks that are no longer eligible.
    pub(crate) fn refresh(&mut self, tables: &RuleTables) {
        self.sync_tracks();
        for slot in 1..=PARTY_SIZE {
            self.revalidate_selections(slot, tables);
        }
    }

    /// Step the role at track `index` through the trainer's selected roles.
    pub fn cycle_role(&mut self, slot: usize, index: usize, tables: &RuleTables) -> SheetResult<bool> {
        let available = self.trainer.selected_roles_in_order();
        let changed = self.slot_mut(slot)?.progression.cycle(index, &available);
        if changed {
            self.revalidate_selections(slot, tables);
        }
        Ok(changed)
    }

    /// Drop the ability and trainer-command picks that are missing from the
    /// slot's current eligibility lists.
    fn revalidate_selections(&mut self, slot: usize, tables: &RuleTables) {
        let (ability_ok, command_ok) = {
            let resolver = self.resolver(tables);
            let Ok(state) = self.slot(slot) else {
                return;
            };

            let ability_ok = match &state.selected_ability {
                Some(id) => resolver.eligible_ability_ids(slot).contains(id),
                None => true,
            };
            let command_ok = match &state.trainer_action_move {
                Some(id) => resolver.trainer_action_move_ids(slot).contains(id),
                None => true,
            };
            (ability_ok, command_ok)
        };

        if let Ok(state) = self.slot_mut(slot) {
            if !ability_ok {
                tracing::debug!(slot, ability = ?state.selected_ability, "Clearing ineligible ability");
                state.selected_ability = None;
            }
            if !command_ok {
                tracing::debug!(slot, command = ?state.trainer_action_move, "Clearing ineligible trainer command");
                state.trainer_action_move = None;
            }
        }
    }

    // --- Move and ability picks ---
    // Each returns Ok(false) when the pick is not among the slot's options.

    pub fn set_nest_move(
        &mut self,
        slot: usize,
        index: usize,
        move_id: Option<String>,
        tables: &RuleTables,
    ) -> SheetResult<bool> {
        self.slot(slot)?;
        if index >= nest_move_limit(self.pokemon_level()) {
            return Err(SheetError::InvalidMoveIndex(index));
        }

        let move_id = move_id.filter(|id| !id.is_empty());
        if let Some(id) = &move_id {
            let offered = self
                .resolver(tables)
                .nest_move_options(slot)
                .iter()
                .any(|option| &option.id == id);
            if !offered {
                tracing::debug!(slot, move_id = %id, "Nest move not available");
                return Ok(false);
            }
        }

        let state = self.slot_mut(slot)?;
        if state.nest_moves.len() <= index {
            state.nest_moves.resize(index + 1, None);
        }
        state.nest_moves[index] = move_id;
        Ok(true)
    }

    pub fn set_great_move(
        &mut self,
        slot: usize,
        index: usize,
        move_id: Option<String>,
        tables: &RuleTables,
    ) -> SheetResult<bool> {
        self.slot(slot)?;
        if index >= max_great_slots(self.pokemon_level()) {
            return Err(SheetError::InvalidMoveIndex(index));
        }

        let move_id = move_id.filter(|id| !id.is_empty());
        if let Some(id) = &move_id {
            let offered = self
                .resolver(tables)
                .great_move_options(slot, index)
                .iter()
                .any(|option| &option.id == id);
            if !offered {
                tracing::debug!(slot, index, move_id = %id, "Great move not available");
                return Ok(false);
            }
        }

        let state = self.slot_mut(slot)?;
        if state.great_moves.len() < GREAT_MOVE_SLOTS {
            state.great_moves.resize(GREAT_MOVE_SLOTS, None);
        }
        state.great_moves[index] = move_id;

        self.revalidate_selections(slot, tables);
        Ok(true)
    }

    pub fn select_ability(
        &mut self,
        slot: usize,
        ability_id: Option<String>,
        tables: &RuleTables,
    ) -> SheetResult<bool> {
        self.slot(slot)?;
        let ability_id = ability_id.filter(|id| !id.is_empty());
        if let Some(id) = &ability_id {
            let offered = self
                .resolver(tables)
                .ability_options(slot)
                .iter()
                .any(|option| &option.id == id);
            if !offered {
                return Ok(false);
            }
        }
        self.slot_mut(slot)?.selected_ability = ability_id;
        Ok(true)
    }

    pub fn select_trainer_action_move(
        &mut self,
        slot: usize,
        move_id: Option<String>,
        tables: &RuleTables,
    ) -> SheetResult<bool> {
        self.slot(slot)?;
        let move_id = move_id.filter(|id| !id.is_empty());
        if let Some(id) = &move_id {
            let offered = self
                .resolver(tables)
                .trainer_action_options(slot)
                .iter()
                .any(|option| &option.id == id);
            if !offered {
                return Ok(false);
            }
        }
        self.slot_mut(slot)?.trainer_action_move = move_id;
        Ok(true)
    }

    /// Pick the known move the signature is built on. Any pick, including
    /// clearing it, starts the signature over and refunds its uses.
    pub fn select_signature_move(
        &mut self,
        slot: usize,
        move_id: Option<String>,
        seed_bond_defaults: bool,
        tables: &RuleTables,
    ) -> SheetResult<bool> {
        self.slot(slot)?;
        let move_id = move_id.filter(|id| !id.is_empty());
        if let Some(id) = &move_id {
            if !self.resolver(tables).signature_candidates(slot).contains(id) {
                return Ok(false);
            }
        }

        let state = self.slot_mut(slot)?;
        state.signature = match &move_id {
            Some(id) => SignatureMoveState::with_base(id, seed_bond_defaults),
            None => SignatureMoveState::template(),
        };
        state.signature_uses = UsagePool::default();
        Ok(true)
    }

    pub fn set_signature_override(
        &mut self,
        slot: usize,
        key: &str,
        value: OverrideValue,
    ) -> SheetResult<()> {
        self.slot_mut(slot)?.signature.set_override(key, value)?;
        Ok(())
    }

    // --- Pools ---

    pub fn toggle_great_use(&mut self, slot: usize, unit: usize) -> SheetResult<()> {
        let capacity = great_move_capacity(self.pokemon_level());
        self.slot_mut(slot)?.great_uses.toggle(unit, capacity);
        Ok(())
    }

    pub fn toggle_signature_use(&mut self, slot: usize, unit: usize) -> SheetResult<()> {
        let capacity = signature_move_capacity(self.trainer.total_role_levels());
        self.slot_mut(slot)?.signature_uses.toggle(unit, capacity);
        Ok(())
    }

    pub fn toggle_trainer_action_use(&mut self, unit: usize) {
        let capacity = trainer_action_capacity(self.trainer.total_role_levels());
        self.trainer_action_uses.toggle(unit, capacity);
    }

    /// Clamp every pool into its current capacity.
    pub fn clamp_pools(&mut self) {
        let total = self.trainer.total_role_levels();
        let great = great_move_capacity(self.pokemon_level());
        let signature = signature_move_capacity(total);

        for state in self.slots.iter_mut() {
            state.great_uses.clamp_to(great);
            state.signature_uses.clamp_to(signature);
        }
        self.trainer_action_uses.clamp_to(trainer_action_capacity(total));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{assign_track, party_with_roles, sample_tables};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::{json, Value};

    #[test]
    fn test_tracks_follow_role_levels() {
        let tables = sample_tables();
        let mut party = party_with_roles(&tables, &[("striker", 2), ("mystic", 1)]);
        assert_eq!(party.pokemon_level(), 3);
        for (_, state) in party.slots() {
            assert_eq!(state.progression.len(), 3);
        }

        assign_track(&mut party, 1, &[Some("striker"), None, Some("mystic")]);
        party.set_role_level(2, 0, &tables).unwrap();
        assert_eq!(party.slot(1).unwrap().progression.len(), 2);

        party.set_role_level(2, 3, &tables).unwrap();
        let track = &party.slot(1).unwrap().progression;
        assert_eq!(track.len(), 5);
        assert_eq!(track.role_at(0), Some("striker"));
        assert_eq!(track.role_at(2), None);
    }

    #[test]
    fn test_species_change_resets_slot() {
        let tables = sample_tables();
        let mut party = party_with_roles(&tables, &[("striker", 1)]);
        party.set_species_text(1, "pikachu", &tables).unwrap();
        assign_track(&mut party, 1, &[Some("striker")]);
        party
            .set_nest_move(1, 0, Some("thunder_shock".into()), &tables)
            .unwrap();
        party.set_nickname(1, "sparky").unwrap();
        party.set_hp(1, "20").unwrap();
        party.toggle_great_use(1, 0).unwrap();

        // Same species, different spelling: nothing is lost.
        assert_eq!(
            party.set_species_text(1, "PIKACHU", &tables).unwrap(),
            Some("pikachu".to_string())
        );
        assert_eq!(party.slot(1).unwrap().nickname, "Sparky");

        // Partial text resolves to nothing and keeps the slot.
        assert_eq!(party.set_species_text(1, "vulp", &tables).unwrap(), None);
        assert_eq!(party.slot(1).unwrap().resolved_species.as_deref(), Some("pikachu"));

        party.set_species_text(1, "vulpix", &tables).unwrap();
        let state = party.slot(1).unwrap();
        assert_eq!(state.resolved_species.as_deref(), Some("vulpix"));
        assert!(state.nest_moves.is_empty());
        assert_eq!(state.great_moves, vec![None; GREAT_MOVE_SLOTS]);
        assert_eq!(state.progression.role_at(0), None);
        assert_eq!(state.nickname, "");
        assert_eq!(state.great_uses.used, 0);
        assert_eq!(state.hp, "20");
    }

    #[test]
    fn test_restoring_suppresses_reset() {
        let tables = sample_tables();
        let mut party = party_with_roles(&tables, &[("striker", 1)]);
        party.set_species_text(1, "pikachu", &tables).unwrap();
        party.set_nickname(1, "sparky").unwrap();

        party.restoring = true;
        party.set_species_text(1, "vulpix", &tables).unwrap();
        party.restoring = false;

        let state = party.slot(1).unwrap();
        assert_eq!(state.nickname, "Sparky");
        assert_eq!(state.resolved_species.as_deref(), Some("vulpix"));
    }

    #[test]
    fn test_clearing_species_text_clears_key() {
        let tables = sample_tables();
        let mut party = PartyState::new();
        party.set_species_text(2, "vulpix", &tables).unwrap();
        party.set_species_text(2, "   ", &tables).unwrap();
        assert_eq!(party.slot(2).unwrap().resolved_species, None);
        assert_eq!(party.slot(2).unwrap().species_text, "");
    }

    #[test]
    fn test_invalid_addresses() {
        let tables = sample_tables();
        let mut party = party_with_roles(&tables, &[("striker", 1)]);
        party.set_species_text(1, "pikachu", &tables).unwrap();

        assert!(matches!(party.slot(0), Err(SheetError::InvalidSlot(0))));
        assert!(matches!(
            party.set_role_level(5, 1, &tables),
            Err(SheetError::InvalidRoleSelector(5))
        ));
        assert!(matches!(
            party.set_great_move(1, 3, None, &tables),
            Err(SheetError::InvalidMoveIndex(3))
        ));
        assert!(matches!(
            party.set_nest_move(1, 3, None, &tables),
            Err(SheetError::InvalidMoveIndex(3))
        ));
    }

    #[test]
    fn test_picks_outside_options_are_refused() {
        let tables = sample_tables();
        let mut party = party_with_roles(&tables, &[("striker", 1)]);
        party.set_species_text(1, "pikachu", &tables).unwrap();

        assert!(!party.set_nest_move(1, 0, Some("ember".into()), &tables).unwrap());
        assert!(!party.set_great_move(1, 1, Some("fire_blast".into()), &tables).unwrap());
        assert!(!party.select_ability(1, Some("static".into()), &tables).unwrap());
        assert!(!party
            .select_signature_move(1, Some("thunder_shock".into()), false, &tables)
            .unwrap());
        assert_eq!(party.slot(1).unwrap().nest_moves, Vec::<Option<String>>::new());
    }

    #[test]
    fn test_cycle_clears_ineligible_ability() {
        let tables = sample_tables();
        let mut party = party_with_roles(&tables, &[("striker", 3), ("mystic", 1)]);
        party.set_species_text(1, "pikachu", &tables).unwrap();
        assign_track(&mut party, 1, &[None, None, None, Some("striker")]);

        assert!(party
            .select_ability(1, Some("adrenaline".into()), &tables)
            .unwrap());

        // striker -> mystic: adrenaline is no longer granted.
        assert!(party.cycle_role(1, 3, &tables).unwrap());
        let state = party.slot(1).unwrap();
        assert_eq!(state.progression.role_at(3), Some("mystic"));
        assert_eq!(state.selected_ability, None);
    }

    #[test]
    fn test_cycle_to_empty_keeps_native_ability() {
        let tables = sample_tables();
        let mut party = party_with_roles(&tables, &[("striker", 4)]);
        party.set_species_text(1, "pikachu", &tables).unwrap();
        assign_track(&mut party, 1, &[Some("striker"); 4]);
        assert!(party.select_ability(1, Some("static".into()), &tables).unwrap());

        // Only striker is selected, so the level-4 entry cycles to empty.
        assert!(party.cycle_role(1, 3, &tables).unwrap());
        let state = party.slot(1).unwrap();
        assert_eq!(state.progression.role_at(3), None);
        assert_eq!(party.resolver(&tables).eligible_ability_ids(1), vec!["static"]);
        assert_eq!(state.selected_ability.as_deref(), Some("static"));
    }

    // Track starts as striker at every level; the entry at `index` becomes
    // mystic.
    #[rstest]
    #[case::native_ability_survives_role_swap(3, "static", true, false)]
    #[case::role_ability_dropped(3, "adrenaline", false, false)]
    #[case::unrelated_entry(0, "adrenaline", true, true)]
    #[case::command_role_entry(2, "static", true, true)]
    fn test_cycle_revalidates_against_eligibility(
        #[case] index: usize,
        #[case] ability: &str,
        #[case] ability_kept: bool,
        #[case] command_kept: bool,
    ) {
        let tables = sample_tables();
        let mut party = party_with_roles(&tables, &[("striker", 3), ("mystic", 1)]);
        party.set_species_text(1, "pikachu", &tables).unwrap();
        assign_track(&mut party, 1, &[Some("striker"); 4]);
        assert!(party
            .set_great_move(1, 1, Some("volt_tackle".into()), &tables)
            .unwrap());
        assert!(party
            .select_trainer_action_move(1, Some("volt_tackle".into()), &tables)
            .unwrap());
        assert!(party.select_ability(1, Some(ability.into()), &tables).unwrap());

        assert!(party.cycle_role(1, index, &tables).unwrap());

        let state = party.slot(1).unwrap();
        assert_eq!(state.progression.role_at(index), Some("mystic"));
        assert_eq!(state.selected_ability.is_some(), ability_kept);
        assert_eq!(state.trainer_action_move.is_some(), command_kept);
    }

    #[rstest]
    #[case::native_ability_without_role(None, "static", true)]
    #[case::role_ability_without_role(None, "adrenaline", false)]
    #[case::role_ability_with_role(Some("striker"), "adrenaline", true)]
    #[case::other_roles_ability(Some("striker"), "clarity", false)]
    #[case::unknown_ability(Some("striker"), "levitate", false)]
    fn test_restore_drops_ineligible_ability(
        #[case] ability_role: Option<&str>,
        #[case] ability: &str,
        #[case] kept: bool,
    ) {
        let tables = sample_tables();
        let payload = json!({
            "version": 1,
            "trainer": {"roleSelections": {"1": "striker"}, "roleLevels": {"1": 4}},
            "pokemon": {"1": {"species": "pikachu", "nickname": ""}},
            "pokemonRoleProgression": {"1": ["striker", "striker", "striker", ability_role]},
            "selectedAbilityBySlot": {"1": ability}
        });

        let mut party = PartyState::new();
        party.restore(&payload, &tables).unwrap();

        let expected = if kept { Some(ability) } else { None };
        assert_eq!(party.slot(1).unwrap().selected_ability.as_deref(), expected);
    }

    #[rstest]
    #[case::known_role_move(json!([null, "volt_tackle", null, null]), "volt_tackle", true)]
    #[case::move_not_known(json!([null, null, null, null]), "volt_tackle", false)]
    #[case::move_for_other_role(json!([null, "psychic_wave", null, null]), "psychic_wave", false)]
    fn test_restore_drops_ineligible_trainer_command(
        #[case] great_moves: Value,
        #[case] command: &str,
        #[case] kept: bool,
    ) {
        let tables = sample_tables();
        let payload = json!({
            "version": 1,
            "trainer": {"roleSelections": {"1": "striker"}, "roleLevels": {"1": 3}},
            "pokemon": {"1": {"species": "pikachu", "nickname": ""}},
            "pokemonRoleProgression": {"1": ["striker", "striker", "striker"]},
            "knownGreatMoves": {"1": great_moves},
            "trainerActionMoveBySlot": {"1": command}
        });

        let mut party = PartyState::new();
        party.restore(&payload, &tables).unwrap();

        let expected = if kept { Some(command) } else { None };
        assert_eq!(party.slot(1).unwrap().trainer_action_move.as_deref(), expected);
    }

    #[test]
    fn test_cycle_without_roles_is_noop() {
        let tables = sample_tables();
        let mut party = PartyState::new();
        assert!(!party.cycle_role(1, 0, &tables).unwrap());
        assert_eq!(party.slot(1).unwrap().progression.role_at(0), None);
    }

    #[test]
    fn test_great_move_change_revalidates_trainer_command() {
        let tables = sample_tables();
        let mut party = party_with_roles(&tables, &[("striker", 3)]);
        party.set_species_text(1, "pikachu", &tables).unwrap();
        assign_track(&mut party, 1, &[None, None, Some("striker")]);
        party
            .set_great_move(1, 1, Some("volt_tackle".into()), &tables)
            .unwrap();
        assert!(party
            .select_trainer_action_move(1, Some("volt_tackle".into()), &tables)
            .unwrap());

        party.set_great_move(1, 1, None, &tables).unwrap();
        assert_eq!(party.slot(1).unwrap().trainer_action_move, None);
    }

    #[test]
    fn test_signature_selection_resets_uses() {
        let tables = sample_tables();
        let mut party = party_with_roles(&tables, &[("striker", 5)]);
        party.set_species_text(1, "pikachu", &tables).unwrap();
        assign_track(&mut party, 1, &[None, None, None, None, Some("striker")]);
        party
            .set_nest_move(1, 0, Some("thunder_shock".into()), &tables)
            .unwrap();

        assert!(party
            .select_signature_move(1, Some("thunder_shock".into()), true, &tables)
            .unwrap());
        party.toggle_signature_use(1, 0).unwrap();
        party.toggle_signature_use(1, 1).unwrap();
        assert_eq!(party.slot(1).unwrap().signature_uses.used, 2);
        assert_eq!(
            party.slot(1).unwrap().signature.overrides.element.as_deref(),
            Some("fire")
        );

        party
            .set_signature_override(1, "name", OverrideValue::Text("Spark Bond".into()))
            .unwrap();
        assert!(matches!(
            party.set_signature_override(1, "tier", OverrideValue::Text("great".into())),
            Err(SheetError::Override(_))
        ));

        party.select_signature_move(1, None, false, &tables).unwrap();
        let state = party.slot(1).unwrap();
        assert_eq!(state.signature, SignatureMoveState::template());
        assert_eq!(state.signature_uses.used, 0);
    }

    #[test]
    fn test_pools_clamp_to_capacity() {
        let tables = sample_tables();
        let mut party = party_with_roles(&tables, &[("striker", 1)]);
        for unit in 0..6 {
            party.toggle_trainer_action_use(unit);
            party.toggle_great_use(1, unit).unwrap();
        }
        assert_eq!(party.trainer_action_uses.used, 4);
        assert_eq!(party.slot(1).unwrap().great_uses.used, 3);

        party.slot_mut(2).unwrap().signature_uses = UsagePool::new(40);
        party.clamp_pools();
        assert_eq!(party.slot(2).unwrap().signature_uses.used, 4);
    }
}
