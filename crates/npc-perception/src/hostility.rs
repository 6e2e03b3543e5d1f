//! The directed faction hostility relation.

use std::sync::{Arc, RwLock};

use npc_core::Faction;

/// Directed hostility: `is_hostile(from, to)` answers "does `from`
/// attack `to` on sight". The relation is not symmetric.
#[derive(Debug, Clone, Copy)]
pub struct HostilityMatrix {
    hostile: [[bool; Faction::COUNT]; Faction::COUNT],
}

impl Default for HostilityMatrix {
    fn default() -> Self {
        let mut m = Self {
            hostile: [[false; Faction::COUNT]; Faction::COUNT],
        };

        // Hostile mobs attack players.
        m.set_hostile(Faction::Hostile, Faction::Alliance, true);
        m.set_hostile(Faction::Hostile, Faction::Horde, true);

        // Bandits attack players and friendlies.
        m.set_hostile(Faction::Bandit, Faction::Alliance, true);
        m.set_hostile(Faction::Bandit, Faction::Horde, true);
        m.set_hostile(Faction::Bandit, Faction::Friendly, true);

        // Undead attack all the living.
        m.set_hostile(Faction::Undead, Faction::Alliance, true);
        m.set_hostile(Faction::Undead, Faction::Horde, true);
        m.set_hostile(Faction::Undead, Faction::Friendly, true);
        m.set_hostile(Faction::Undead, Faction::Neutral, true);

        // Demons attack everyone, wildlife included.
        m.set_hostile(Faction::Demon, Faction::Alliance, true);
        m.set_hostile(Faction::Demon, Faction::Horde, true);
        m.set_hostile(Faction::Demon, Faction::Friendly, true);
        m.set_hostile(Faction::Demon, Faction::Neutral, true);
        m.set_hostile(Faction::Demon, Faction::Wildlife, true);

        // Alliance vs Horde is a per-server PvP policy, off by default.

        m
    }
}

impl HostilityMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_hostile(&self, from: Faction, to: Faction) -> bool {
        self.hostile[from.index()][to.index()]
    }

    pub fn set_hostile(&mut self, from: Faction, to: Faction, hostile: bool) {
        self.hostile[from.index()][to.index()] = hostile;
    }
}

/// The process-wide hostility matrix, shared across agents.
///
/// Read-mostly: agents read it every perception pass; writes happen at
/// server configuration time. One reader/writer lock covers it.
#[derive(Debug, Clone, Default)]
pub struct SharedHostility {
    inner: Arc<RwLock<HostilityMatrix>>,
}

impl SharedHostility {
    pub fn new(matrix: HostilityMatrix) -> Self {
        Self {
            inner: Arc::new(RwLock::new(matrix)),
        }
    }

    pub fn is_hostile(&self, from: Faction, to: Faction) -> bool {
        self.inner
            .read()
            .expect("hostility matrix poisoned")
            .is_hostile(from, to)
    }

    pub fn set_hostile(&self, from: Faction, to: Faction, hostile: bool) {
        self.inner
            .write()
            .expect("hostility matrix poisoned")
            .set_hostile(from, to, hostile);
    }

    /// A by-value copy, for agents forking a private override.
    pub fn snapshot(&self) -> HostilityMatrix {
        *self.inner.read().expect("hostility matrix poisoned")
    }
}
