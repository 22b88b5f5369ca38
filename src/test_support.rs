//! Small rule tables shared by the unit tests.

use crate::party::PartyState;
use crate::rules::RuleTables;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;

pub const SPECIES_JSON: &str = r#"{
    "pikachu": {
        "id": "pikachu",
        "name": "Pikachu",
        "dex": 25,
        "baseStats": {"atk": 55, "def": 40, "spAtk": 50, "spDef": 50, "man": 60, "spd": 90},
        "moves": {"native": ["thunder_shock", "quick_attack", "thunderbolt", "volt_tackle"]},
        "abilities": ["static"]
    },
    "nidoranf": {
        "name": "Nidoran♀",
        "dex": 29,
        "baseStats": {"atk": 47, "def": 52, "spAtk": 40, "spDef": 40, "man": 45, "spd": 41},
        "moves": {"native": ["poison_sting"]},
        "abilities": {"native": ["poison_point"]}
    },
    "vulpix": {
        "name": "Vulpix",
        "dex": 37,
        "baseStats": {"atk": 41, "def": 40, "spAtk": 50, "spDef": 65, "man": 70, "spd": 65},
        "moves": {"native": ["ember"], "great": ["fire_blast"]},
        "abilities": "flash_fire"
    },
    "growlithe": {
        "name": "Growlithe",
        "dex": 58,
        "baseStats": {"atk": 70, "def": 45, "spAtk": 70, "spDef": 50, "man": 40, "spd": 60},
        "moves": {"native": ["ember", "bite"]},
        "abilities": ["flash_fire"]
    },
    "growlithe_hisui": {
        "id": "growlithe_hisui",
        "name": "Growlithe",
        "form": "Hisuian",
        "dex": 58,
        "baseStats": {"atk": 75, "def": 45, "spAtk": 65, "spDef": 50, "man": 40, "spd": 55},
        "moves": {"native": ["ember", "rock_slide"]},
        "abilities": ["flash_fire"]
    },
    "mrmime": {
        "name": "Mr. Mime",
        "dex": 122,
        "baseStats": {"atk": 45, "def": 65, "spAtk": 100, "spDef": 120, "man": 90, "spd": 90},
        "moves": {"native": ["confusion"]}
    }
}"#;

pub const MOVES_JSON: &str = r#"{
    "thunder_shock": {
        "name": "Thunder Shock", "tier": "nest", "category": "special", "element": "electric",
        "baseDice": 1, "description": "Deals {damage} electric damage.",
        "range": "30 ft", "target": "One creature", "economy": "Action",
        "tags": ["ranged"], "status": {"inflicts": "paralyzed"}
    },
    "quick_attack": {
        "name": "Quick Attack", "tier": "nest", "category": "physical", "element": "normal",
        "baseDice": 1, "description": "Dash in for {damage} damage.",
        "range": "Melee", "target": "One creature", "economy": "Bonus Action", "tags": ["contact"]
    },
    "ember": {
        "name": "Ember", "tier": "nest", "category": "special", "element": "fire",
        "baseDice": 1, "description": "Deals {damage} fire damage."
    },
    "poison_sting": {
        "name": "Poison Sting", "tier": "nest", "category": "physical", "element": "poison",
        "baseDice": 1, "description": "Deals {damage} poison damage."
    },
    "bite": {
        "name": "Bite", "tier": "nest", "category": "physical", "element": "dark",
        "baseDice": 1, "description": "Deals {damage} damage."
    },
    "confusion": {
        "name": "Confusion", "tier": "nest", "category": "special", "element": "psychic",
        "baseDice": 1, "description": "Deals {damage} psychic damage."
    },
    "soothing_mist": {
        "name": "Soothing Mist", "tier": "nest", "category": "healing", "element": "fairy",
        "HD": 2, "description": "Restore hit dice to an ally.",
        "range": "15 ft", "target": "One ally", "economy": "Action",
        "buffDebuff": {"stat": "spDef", "amount": 1}
    },
    "thunderbolt": {
        "name": "Thunderbolt", "tier": "great", "category": "special", "element": "electric",
        "baseDice": 3, "description": "Deals {damage} electric damage.",
        "roles": ["striker", "mystic"]
    },
    "volt_tackle": {
        "name": "Volt Tackle", "tier": "great", "category": "physical", "element": "electric",
        "baseDice": 4, "description": "Crash into the target for {damage} damage.",
        "grantableByRole": true, "roles": ["striker"]
    },
    "mega_punch": {
        "name": "Mega Punch", "tier": "great", "category": "physical", "element": "normal",
        "baseDice": "2d8", "description": "Deals {damage} damage.",
        "grantableByRole": true, "roles": ["striker"]
    },
    "focus_blast": {
        "name": "Focus Blast", "tier": "great", "category": "special", "element": "fighting",
        "baseDice": 3, "description": "Deals {damage} fighting damage.",
        "grantableByRole": true, "roles": ["striker", "mystic"]
    },
    "psychic_wave": {
        "name": "Psychic Wave", "tier": "great", "category": "special", "element": "psychic",
        "baseDice": 3, "description": "Deals {damage} psychic damage.",
        "grantableByRole": true, "roles": ["mystic"]
    },
    "fire_blast": {
        "name": "Fire Blast", "tier": "great", "category": "special", "element": "fire",
        "baseDice": 4, "description": "Deals {damage} fire damage.",
        "grantableByRole": true, "roles": ["striker"]
    },
    "rock_slide": {
        "name": "Rock Slide", "tier": "great", "category": "physical", "element": "rock",
        "baseDice": 3, "description": "Deals {damage} rock damage.",
        "grantableByRole": true, "roles": ["anchor"]
    },
    "iron_defense": {
        "name": "Iron Defense", "tier": "great", "category": "other", "element": "steel",
        "description": "Harden your body.",
        "grantableByRole": true, "roles": ["anchor"],
        "buffDebuff": {"stat": "def", "amount": 2, "duration": "2 rounds"}
    }
}"#;

pub const ABILITIES_JSON: &str = r#"{
    "static": {"name": "Static", "description": "Contact may paralyze.", "unlocksAt": 1, "sources": ["native"]},
    "poison_point": {"name": "Poison Point", "description": "Contact may poison.", "unlocksAt": 1, "sources": ["native"]},
    "flash_fire": {"name": "Flash Fire", "description": "Absorb fire.", "unlocksAt": 1, "sources": ["native"]},
    "sturdy": {"name": "Sturdy", "description": "Endure one hit.", "unlocksAt": 1, "sources": ["native"]},
    "adrenaline": {"name": "Adrenaline", "description": "Hit harder when hurt.", "unlocksAt": 4, "sources": ["role"], "roles": ["striker"]},
    "clarity": {"name": "Clarity", "description": "Resist confusion.", "unlocksAt": 4, "sources": ["role"], "roles": ["mystic"]},
    "last_stand": {"name": "Last Stand", "description": "Refuse to fall.", "unlocksAt": 5, "sources": ["role"], "roles": ["striker"]}
}"#;

pub const ROLES_JSON: &str = r#"{
    "striker": {
        "name": "Striker",
        "levels": {
            "2": {"type": "feature", "description": "Add your PB to one damage roll each round."},
            "3": {"type": "trainer_action", "grants": "command", "statBoost": {"stat": "atk", "amount": 2, "displayOnly": true}}
        },
        "dice": {"physical": "d10", "special": "d6", "healing": "d4"}
    },
    "mystic": {
        "name": "Mystic",
        "levels": {
            "2": {"type": "feature", "description": "Sense hidden auras."},
            "3": {"type": "feature"}
        },
        "statBoosts": {"level3": {"spAtk": 3, "hp": 5}},
        "dice": {"physical": "d4", "special": "d10", "healing": "d8"}
    },
    "anchor": {
        "name": "Anchor",
        "levels": {
            "3": {"type": "trainer_action"}
        },
        "dice": {"physical": "d8", "special": "d6", "healing": "d12"}
    },
    "reactor": {
        "name": "Reactor",
        "levels": {
            "2": {"type": "feature", "description": "Move when an ally is hit."},
            "dice": {"physical": "d8", "special": "d8", "healing": "d6"}
        }
    }
}"#;

fn parse<T: DeserializeOwned>(json: &str) -> IndexMap<String, T> {
    serde_json::from_str(json).expect("fixture table parses")
}

pub fn sample_tables() -> RuleTables {
    RuleTables::new(
        parse(SPECIES_JSON),
        parse(MOVES_JSON),
        parse(ABILITIES_JSON),
        parse(ROLES_JSON),
    )
}

/// A party whose trainer selectors hold `roles` in order, each with its level.
pub fn party_with_roles(tables: &RuleTables, roles: &[(&str, i32)]) -> PartyState {
    let mut party = PartyState::new();
    for (index, (role, level)) in roles.iter().enumerate() {
        party
            .set_role_selection(index + 1, role, tables)
            .expect("selector in range");
        party
            .set_role_level(index + 1, *level, tables)
            .expect("selector in range");
    }
    party
}

/// Fill a slot's progression track, one role per level.
pub fn assign_track(party: &mut PartyState, slot: usize, roles: &[Option<&str>]) {
    let track = &mut party.slot_mut(slot).expect("slot in range").progression;
    for (index, role) in roles.iter().enumerate() {
        track.set(index, role.map(str::to_string));
    }
}
