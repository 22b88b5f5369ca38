// Trainer Sheet Schema - Rule record definitions
// This crate contains the read-only record types loaded from the rule tables
// (species, moves, abilities, roles) and the small enums shared between the
// tables and the resolution engine. Loose shapes found in hand-edited rule
// files are normalized here, at deserialization time.

// Re-export the main types
pub use ability_data::*;
pub use move_types::*;
pub use role_data::*;
pub use species_data::*;

pub mod ability_data;
pub mod lenient;
pub mod move_types;
pub mod role_data;
pub mod species_data;
