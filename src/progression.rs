use serde::{Deserialize, Serialize};

// Track positions with a fixed meaning. Index n holds the role chosen at
// Pokemon level n + 1.
pub const GREAT_MOVE_ROLE_INDEX: usize = 0;
pub const FEATURE_ROLE_INDEX: usize = 1;
pub const TRAINER_COMMAND_ROLE_INDEX: usize = 2;
pub const ABILITY_ROLE_INDEX: usize = 3;
pub const SIGNATURE_ROLE_INDEX: usize = 4;

pub const MAX_POKEMON_LEVEL: u8 = 5;

/// Role chosen at each level of one Pokemon. The length always matches the
/// Pokemon's level once synced; empty entries are levels with no choice yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressionTrack(Vec<Option<String>>);

impl ProgressionTrack {
    pub fn new_for_level(level: u8) -> Self {
        Self(vec![None; level as usize])
    }

    /// Build a track from stored entries. Blank role ids become empty entries.
    pub fn from_entries(entries: Vec<Option<String>>) -> Self {
        Self(
            entries
                .into_iter()
                .map(|entry| entry.filter(|role| !role.is_empty()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &[Option<String>] {
        &self.0
    }

    /// Trim the tail or pad with empty entries. Existing entries below the
    /// new length are left untouched.
    pub fn resize(&mut self, level: u8) {
        self.0.resize(level as usize, None);
    }

    pub fn role_at(&self, index: usize) -> Option<&str> {
        self.0.get(index).and_then(|entry| entry.as_deref())
    }

    /// Returns false when `index` is past the end of the track.
    pub fn set(&mut self, index: usize, role: Option<String>) -> bool {
        match self.0.get_mut(index) {
            Some(entry) => {
                *entry = role.filter(|r| !r.is_empty());
                true
            }
            None => false,
        }
    }

    /// Advance the entry at `index` through `available` roles and then
    /// empty. An entry holding a role outside `available` counts as empty.
    /// Does nothing when no roles are available or the index is out of range.
    pub fn cycle(&mut self, index: usize, available: &[String]) -> bool {
        if available.is_empty() || index >= self.0.len() {
            return false;
        }

        let next = match self.role_at(index) {
            Some(current) => match available.iter().position(|role| role == current) {
                Some(position) => available.get(position + 1).cloned(),
                None => available.first().cloned(),
            },
            None => available.first().cloned(),
        };

        self.0[index] = next;
        true
    }

    /// Distinct roles within the first `level` entries, first occurrence
    /// order.
    pub fn unlocked_roles(&self, level: u8) -> Vec<&str> {
        let mut roles: Vec<&str> = Vec::new();
        for role in self.0.iter().take(level as usize).flatten() {
            if !roles.contains(&role.as_str()) {
                roles.push(role);
            }
        }
        roles
    }
}
