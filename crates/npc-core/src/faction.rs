use serde::{Deserialize, Serialize};

/// The closed set of factions.
///
/// Which faction is hostile to which is a directed relation owned by
/// the perception crate's hostility matrix; the enum itself is just an
/// identity tag carried on entity descriptors and templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Faction {
    Neutral,
    Hostile,
    Friendly,
    Wildlife,
    Bandit,
    Undead,
    Demon,
    Alliance,
    Horde,
}

impl Faction {
    pub const COUNT: usize = 9;

    pub const ALL: [Faction; Faction::COUNT] = [
        Faction::Neutral,
        Faction::Hostile,
        Faction::Friendly,
        Faction::Wildlife,
        Faction::Bandit,
        Faction::Undead,
        Faction::Demon,
        Faction::Alliance,
        Faction::Horde,
    ];

    /// Dense index for matrix storage.
    pub fn index(self) -> usize {
        match self {
            Faction::Neutral => 0,
            Faction::Hostile => 1,
            Faction::Friendly => 2,
            Faction::Wildlife => 3,
            Faction::Bandit => 4,
            Faction::Undead => 5,
            Faction::Demon => 6,
            Faction::Alliance => 7,
            Faction::Horde => 8,
        }
    }
}
