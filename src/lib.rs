// In: src/lib.rs

//! Pokemon Trainer Sheet Engine
//!
//! Resolves what each party Pokemon can do from the trainer's role choices:
//! level, per-level role track, abilities, move slots, trainer commands,
//! signature moves and use pools. The rule tables are loaded once; every
//! derived value is a pure read of the party state.

// --- MODULE DECLARATIONS ---
// This declares the module hierarchy for the crate.
pub mod capabilities;
pub mod config;
pub mod eligibility;
pub mod errors;
pub mod lookup;
pub mod party;
pub mod persistence;
pub mod pools;
pub mod preview;
pub mod progression;
pub mod rules;
pub mod signature;
pub mod stats;
pub mod trainer;

#[cfg(test)]
mod test_support;

// --- PUBLIC API RE-EXPORTS ---
// This section defines the public-facing API of the `pokemon-sheet` crate,
// making it easy for users to import the most important types directly.

// --- From the `schema` crate ---
// Re-export the rule record types and their small enums.
pub use schema::{
    // Rule Records
    AbilityRecord,
    // Supporting Types & Enums
    AbilitySource,
    BaseStats,
    BuffDebuff,
    DiceCount,
    DiceProfile,
    DieSize,
    LevelKind,
    MoveCategory,
    MoveRecord,
    MoveTier,
    RoleRecord,
    SpeciesRecord,
    StatName,
    StatusInfliction,
};

// --- From this crate's modules (`src/`) ---

// Party state and the read-only resolver over it.
pub use capabilities::{AbilityOption, DerivedCapabilities, SheetResolver, TrainerCommand};
pub use party::{PartyState, SlotState};
pub use trainer::{TrainerInputs, TrainerNotes};

// Move slots, signature moves and pools.
pub use eligibility::{MoveOption, MoveSource};
pub use pools::UsagePool;
pub use preview::MovePreview;
pub use progression::ProgressionTrack;
pub use signature::{OverrideKey, OverrideValue, SignatureMoveState, SignatureOverrides};

// Loading and saving.
pub use config::SheetConfig;
pub use errors::{SheetError, SheetResult};
pub use persistence::{ExportEnvelope, SheetSnapshot, SheetStore};
pub use rules::RuleTables;
