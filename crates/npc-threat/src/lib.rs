//! Threat/aggro ledgers.
//!
//! Each NPC owns one [`ThreatTable`] mapping source entities to a
//! non-negative threat value; the highest entry decides combat
//! targeting. A process-wide [`ThreatManager`] indexes the tables by
//! NPC id so damage events arriving from any thread can attribute
//! threat, and so player death can sweep an id out of every table at
//! once.
//!
//! Ordering is load-bearing: entries live in a `BTreeMap`, so equal
//! threat values tie-break to the lexicographically smaller id and
//! iteration is deterministic across runs.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};

use npc_core::EntityId;

/// Fixed threat amounts and scale factors per event category.
pub mod multipliers {
    /// Threat per point of damage dealt.
    pub const DAMAGE: f64 = 1.0;
    /// Healing draws half the threat of damage.
    pub const HEALING: f64 = 0.5;
    /// Flat threat for applying a buff.
    pub const BUFF: f64 = 5.0;
    /// Flat threat for applying a debuff.
    pub const DEBUFF: f64 = 10.0;
    /// Taunt pins the taunter above the current leader by this factor.
    pub const TAUNT_FACTOR: f64 = 1.1;
    /// Vanish drops threat entirely.
    pub const VANISH: f64 = 0.0;
    /// Initial aggro on pull.
    pub const AGGRO: f64 = 100.0;
    /// Resurrecting a player mid-fight.
    pub const RESURRECTION: f64 = 500.0;
}

/// Threat generated by a damage event, scaled by a per-source modifier.
pub fn damage_threat(damage: f64, threat_modifier: f64) -> f64 {
    damage * multipliers::DAMAGE * threat_modifier
}

/// Threat generated by a healing event. Healing threat is typically
/// split among every engaged NPC by the caller.
pub fn healing_threat(healing: f64, threat_modifier: f64) -> f64 {
    healing * multipliers::HEALING * threat_modifier
}

/// One ledger entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreatEntry {
    pub id: EntityId,
    pub value: f64,
}

/// The threat ledger of a single NPC.
///
/// Values are strictly positive; any operation that would leave an
/// entry at or below zero removes it instead.
#[derive(Debug, Default)]
pub struct ThreatTable {
    owner: EntityId,
    entries: BTreeMap<EntityId, f64>,
}

impl ThreatTable {
    pub fn new(owner: EntityId) -> Self {
        Self {
            owner,
            entries: BTreeMap::new(),
        }
    }

    pub fn owner(&self) -> &EntityId {
        &self.owner
    }

    /// Add threat from a source; negative amounts clamp to zero.
    /// Returns the new total for that source.
    pub fn add(&mut self, source: &EntityId, amount: f64) -> f64 {
        let amount = amount.max(0.0);
        let entry = self.entries.entry(source.clone()).or_insert(0.0);
        *entry += amount;
        debug_assert!(*entry >= 0.0, "threat ledger corrupted: negative value");
        *entry
    }

    /// Replace the stored value; `amount <= 0` removes the entry.
    pub fn set(&mut self, source: &EntityId, amount: f64) {
        if amount <= 0.0 {
            self.entries.remove(source);
        } else {
            self.entries.insert(source.clone(), amount);
        }
    }

    /// Zero if the source has no entry.
    pub fn get(&self, source: &EntityId) -> f64 {
        self.entries.get(source).copied().unwrap_or(0.0)
    }

    pub fn remove(&mut self, source: &EntityId) {
        self.entries.remove(source);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry with the greatest value. Equal values tie-break to the
    /// smaller id, which falls out of ascending key iteration.
    pub fn highest(&self) -> Option<ThreatEntry> {
        let mut best: Option<(&EntityId, f64)> = None;
        for (id, &value) in &self.entries {
            debug_assert!(value >= 0.0, "threat ledger corrupted: negative value");
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((id, value)),
            }
        }
        best.map(|(id, value)| ThreatEntry {
            id: id.clone(),
            value,
        })
    }

    /// All entries, descending by value, ascending by id on ties.
    pub fn sorted(&self) -> Vec<ThreatEntry> {
        let mut entries: Vec<ThreatEntry> = self
            .entries
            .iter()
            .map(|(id, &value)| ThreatEntry {
                id: id.clone(),
                value,
            })
            .collect();
        // The map iterates ascending by id, and the sort is stable.
        entries.sort_by(|a, b| b.value.total_cmp(&a.value));
        entries
    }

    /// Entries in id order, as `(id, value)` pairs.
    pub fn snapshot(&self) -> Vec<(EntityId, f64)> {
        self.entries
            .iter()
            .map(|(id, &value)| (id.clone(), value))
            .collect()
    }

    /// Multiply every entry by `1 - decay`; entries falling below 1.0
    /// are dropped entirely.
    pub fn decay(&mut self, decay: f64) {
        let factor = 1.0 - decay;
        self.entries.retain(|_, value| {
            *value *= factor;
            *value >= 1.0
        });
    }

    /// Multiply one entry, if present. Used by tank-style abilities.
    pub fn modifier(&mut self, source: &EntityId, factor: f64) {
        if let Some(value) = self.entries.get_mut(source) {
            *value *= factor;
            if *value <= 0.0 {
                self.entries.remove(source);
            }
        }
    }

    /// Move `percent` of `from`'s threat onto `to`. `from` is removed
    /// when nothing remains.
    pub fn transfer(&mut self, from: &EntityId, to: &EntityId, percent: f64) {
        let from_value = self.get(from);
        let moved = from_value * percent;
        if moved == 0.0 {
            return;
        }

        let remaining = from_value - moved;
        self.set(from, remaining);
        self.add(to, moved);
    }

    /// Taunt: pin `target` above the current leader.
    pub fn taunt(&mut self, target: &EntityId, current_highest: f64) {
        self.set(target, current_highest * multipliers::TAUNT_FACTOR);
    }
}

/// Process-wide index of threat ledgers, keyed by NPC id.
///
/// The index is guarded by a reader/writer lock and each ledger by its
/// own mutex, so damage events and agent ticks touching different NPCs
/// never contend.
#[derive(Debug, Default)]
pub struct ThreatManager {
    tables: RwLock<BTreeMap<EntityId, Arc<Mutex<ThreatTable>>>>,
}

impl ThreatManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&self, npc: &EntityId) -> Arc<Mutex<ThreatTable>> {
        if let Some(table) = self.table(npc) {
            return table;
        }

        let mut tables = self.tables.write().expect("threat index poisoned");
        tables
            .entry(npc.clone())
            .or_insert_with(|| Arc::new(Mutex::new(ThreatTable::new(npc.clone()))))
            .clone()
    }

    pub fn table(&self, npc: &EntityId) -> Option<Arc<Mutex<ThreatTable>>> {
        let tables = self.tables.read().expect("threat index poisoned");
        tables.get(npc).cloned()
    }

    pub fn remove_table(&self, npc: &EntityId) {
        let mut tables = self.tables.write().expect("threat index poisoned");
        tables.remove(npc);
    }

    /// Attribute threat to an NPC from a source; creates the ledger on
    /// first use. Returns the source's new total.
    pub fn add_threat(&self, npc: &EntityId, source: &EntityId, amount: f64) -> f64 {
        let table = self.get_or_create(npc);
        let mut table = table.lock().expect("threat ledger poisoned");
        table.add(source, amount)
    }

    /// Drop an entity from every ledger. Called when a player dies or
    /// leaves the area.
    pub fn remove_entity_from_all(&self, entity: &EntityId) {
        let tables = self.tables.read().expect("threat index poisoned");
        for table in tables.values() {
            table.lock().expect("threat ledger poisoned").remove(entity);
        }
    }

    pub fn clear_all(&self) {
        let tables = self.tables.read().expect("threat index poisoned");
        for table in tables.values() {
            table.lock().expect("threat ledger poisoned").clear();
        }
    }

    /// Id-ordered `(id, value)` pairs for an NPC; empty if it has no
    /// ledger. This is the read path behind the behavior tree's threat
    /// queries.
    pub fn snapshot(&self, npc: &EntityId) -> Vec<(EntityId, f64)> {
        match self.table(npc) {
            Some(table) => table.lock().expect("threat ledger poisoned").snapshot(),
            None => Vec::new(),
        }
    }
}
