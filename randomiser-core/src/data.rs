use std::fmt;

use serde::{Deserialize, Serialize};

/// Secondary effect a move can inflict. `None` is the absence sentinel; the
/// six real effects are what the status randomisation picks from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Status {
    None,
    Poison,
    Paralysis,
    Sleep,
    Confusion,
    Stun,
    Doom,
}

impl Status {
    /// The non-`None` effects, in enum order. Uniform picks index into this.
    pub const EFFECTS: [Status; 6] = [
        Status::Poison,
        Status::Paralysis,
        Status::Sleep,
        Status::Confusion,
        Status::Stun,
        Status::Doom,
    ];
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::None => "None",
            Status::Poison => "Poison",
            Status::Paralysis => "Paralysis",
            Status::Sleep => "Sleep",
            Status::Confusion => "Confusion",
            Status::Stun => "Stun",
            Status::Doom => "Doom",
        };
        // pad() honours width/alignment flags so status names line up in
        // the fixed-width spoiler columns.
        f.pad(name)
    }
}

/// Skill category. Only `Attack` moves carry damage/cooldown/status data
/// worth randomising.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum MoveKind {
    Attack,
    Support,
    Recovery,
    Guard,
}

/// A learnable skill record. Tier 0 marks an unused slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub tier: u8,
    pub kind: MoveKind,
    pub learn_rate: f32,
    pub cooldown: u16,
    pub damage: u16,
    pub status: Status,
    pub status_chance: u8,
    pub mp_cost: u16,
}

/// A finisher move. Distinct record type from regular skills, with only
/// power and status data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Finisher {
    pub power: u16,
    pub status: Status,
    pub status_chance: u8,
}

/// The mutable game-data container the randomiser operates on. Loaded once,
/// mutated in place, written once; records are never added or removed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GameData {
    pub skills: Vec<Skill>,
    pub finishers: Vec<Finisher>,
}

/// Ordered display names looked up by 1-based id (record index + 1).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NameTable(pub Vec<String>);

impl NameTable {
    pub fn get(&self, id: usize) -> String {
        self.0
            .get(id.wrapping_sub(1))
            .cloned()
            .unwrap_or_else(|| format!("#{id}"))
    }
}

/// Read-only language tables used for spoiler-log display names.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageData {
    pub skill_names: NameTable,
    pub finisher_names: NameTable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_table_is_one_based() {
        let names = NameTable(vec!["Fire Tower".to_string(), "Spit Fire".to_string()]);
        assert_eq!(names.get(1), "Fire Tower");
        assert_eq!(names.get(2), "Spit Fire");
    }

    #[test]
    fn name_table_falls_back_to_id() {
        let names = NameTable(Vec::new());
        assert_eq!(names.get(7), "#7");
        assert_eq!(names.get(0), "#0");
    }
}
