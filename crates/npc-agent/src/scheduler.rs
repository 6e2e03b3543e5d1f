//! The population owner: registration, activation hysteresis, and the
//! per-tick update budget.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use npc_core::{CombatSink, ConfigError, EntityId, EntityKind, Position, WorldView};
use npc_perception::SharedHostility;
use npc_threat::ThreatManager;

use crate::agent::Agent;
use crate::template::NpcTemplate;

/// Scheduler tuning. The activation bands must nest:
/// `wake_distance < sleep_distance <= max_active_distance`, the gap
/// between wake and sleep providing the hysteresis that keeps agents
/// from flapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerConfig {
    /// Beyond this distance from every player an agent is never ticked.
    pub max_active_distance: f64,
    /// An active agent farther than this from every player goes to sleep.
    pub sleep_distance: f64,
    /// A sleeping agent closer than this to any player wakes up.
    pub wake_distance: f64,
    /// How often the activation pass runs.
    pub distance_check_interval_ms: i64,
    /// Cap on agents ticked per scheduler invocation; 0 means no cap.
    pub max_updates_per_tick: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_active_distance: 100.0,
            sleep_distance: 80.0,
            wake_distance: 60.0,
            distance_check_interval_ms: 1000,
            max_updates_per_tick: 100,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("max_active_distance", self.max_active_distance),
            ("sleep_distance", self.sleep_distance),
            ("wake_distance", self.wake_distance),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeDistance { field, value });
            }
        }
        if self.wake_distance >= self.sleep_distance {
            return Err(ConfigError::ActivationBands {
                wake: self.wake_distance,
                sleep: self.sleep_distance,
            });
        }
        if self.sleep_distance > self.max_active_distance {
            return Err(ConfigError::SleepBeyondActive {
                sleep: self.sleep_distance,
                max_active: self.max_active_distance,
            });
        }
        Ok(())
    }
}

/// Population counters, refreshed by the activation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub total: usize,
    pub active: usize,
    pub sleeping: usize,
    pub last_activation_ms: i64,
}

/// Owns every agent and drives their ticks.
///
/// Agents tick in registration order through a round-robin cursor, so
/// a throttled tick resumes where the previous one stopped and every
/// agent eventually runs.
pub struct Scheduler {
    config: SchedulerConfig,
    agents: BTreeMap<EntityId, Agent>,
    /// Registration order; the universe the cursor walks.
    order: Vec<EntityId>,
    cursor: usize,
    threat: Arc<ThreatManager>,
    hostility: SharedHostility,
    seed: u64,
    last_activation_ms: Option<i64>,
    stats: SchedulerStats,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            agents: BTreeMap::new(),
            order: Vec::new(),
            cursor: 0,
            threat: Arc::new(ThreatManager::new()),
            hostility: SharedHostility::default(),
            seed: 0,
            last_activation_ms: None,
            stats: SchedulerStats::default(),
        })
    }

    /// Seed for the deterministic per-agent RNG streams.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn threat_manager(&self) -> &Arc<ThreatManager> {
        &self.threat
    }

    pub fn hostility(&self) -> &SharedHostility {
        &self.hostility
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn get(&self, id: &EntityId) -> Option<&Agent> {
        self.agents.get(id)
    }

    pub fn get_mut(&mut self, id: &EntityId) -> Option<&mut Agent> {
        self.agents.get_mut(id)
    }

    /// Build and adopt an agent for a freshly spawned NPC.
    pub fn register(&mut self, id: EntityId, template: NpcTemplate, spawn: Position) -> &mut Agent {
        let ledger = self.threat.get_or_create(&id);
        let agent = Agent::new(
            id.clone(),
            template,
            spawn,
            ledger,
            self.hostility.clone(),
        );

        // Re-registering an id replaces the agent but keeps its slot in
        // the round-robin order.
        if self.agents.insert(id.clone(), agent).is_none() {
            self.order.push(id.clone());
        }
        self.agents.get_mut(&id).expect("agent was just inserted")
    }

    /// Drop an agent and its ledger. In-flight ticks complete first by
    /// construction: unregistration goes through the same `&mut self`.
    pub fn unregister(&mut self, id: &EntityId) {
        if self.agents.remove(id).is_none() {
            return;
        }
        if let Some(index) = self.order.iter().position(|o| o == id) {
            self.order.remove(index);
            if index < self.cursor {
                self.cursor -= 1;
            }
        }
        self.threat.remove_table(id);
    }

    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            total: self.agents.len(),
            ..self.stats
        }
    }

    /// One scheduler tick: maybe re-derive activation, then round-robin
    /// through the active population under the update budget.
    pub fn update(
        &mut self,
        now_ms: i64,
        dt_seconds: f64,
        world: &dyn WorldView,
        combat: &dyn CombatSink,
    ) {
        let due = match self.last_activation_ms {
            None => false,
            Some(last) => now_ms - last >= self.config.distance_check_interval_ms,
        };
        if self.last_activation_ms.is_none() {
            // First tick establishes the interval baseline; everyone
            // starts active, so there is nothing to re-derive yet.
            self.last_activation_ms = Some(now_ms);
        } else if due {
            self.refresh_activation(now_ms, world);
            self.last_activation_ms = Some(now_ms);
        }

        if self.order.is_empty() {
            return;
        }

        let budget = self.config.max_updates_per_tick;
        let len = self.order.len();
        self.cursor %= len;

        let mut updated = 0usize;
        for step in 0..len {
            let index = (self.cursor + step) % len;
            let id = self.order[index].clone();

            let Some(agent) = self.agents.get_mut(&id) else {
                continue;
            };
            if !agent.is_active() || agent.is_sleeping() {
                continue;
            }

            agent.update(now_ms, dt_seconds, world, combat, self.seed);
            updated += 1;

            if budget > 0 && updated >= budget {
                // Resume after the last serviced agent next invocation.
                self.cursor = (index + 1) % len;
                return;
            }
        }
        // A full pass was made; keep the cursor where it is.
    }

    /// Sleep agents that drifted out of player range; wake the ones a
    /// player came back for. The wake band sits inside the sleep band,
    /// so an agent in the gap holds its current state.
    fn refresh_activation(&mut self, now_ms: i64, world: &dyn WorldView) {
        let mut active = 0usize;
        let mut sleeping = 0usize;

        for agent in self.agents.values_mut() {
            let Some(pos) = world.position(agent.id()) else {
                // No position this pass: hold state.
                if agent.is_sleeping() {
                    sleeping += 1;
                } else {
                    active += 1;
                }
                continue;
            };

            let min_player_distance = world
                .entities_in_radius(pos, self.config.max_active_distance)
                .into_iter()
                .filter(|id| id != agent.id())
                .filter(|id| {
                    world
                        .descriptor(id)
                        .is_some_and(|d| d.kind == EntityKind::Player)
                })
                .filter_map(|id| world.position(&id))
                .map(|player| pos.distance(player))
                .fold(f64::INFINITY, f64::min);

            if agent.is_sleeping() {
                if min_player_distance < self.config.wake_distance {
                    agent.wake();
                    debug!(agent = %agent.id(), "agent woke up");
                }
            } else if min_player_distance > self.config.sleep_distance {
                agent.sleep();
                debug!(agent = %agent.id(), "agent went to sleep");
            }

            if agent.is_sleeping() {
                sleeping += 1;
            } else {
                active += 1;
            }
        }

        self.stats = SchedulerStats {
            total: self.agents.len(),
            active,
            sleeping,
            last_activation_ms: now_ms,
        };
    }
}
