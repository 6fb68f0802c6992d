//! Creature model — the player and every monster share this type, the
//! distinguishing behavior coming from `MonsterTypeId` lookups and the
//! `is_player` marker rather than separate player/monster structs.

use serde::{Deserialize, Serialize};

use crate::flags::{CreatureFlags, MonsterBehaviorFlags};
use crate::grid::Pos;
use crate::ids::{ArenaId, MonsterTypeId};

/// High-level disposition, checked before most AI and targeting logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreatureState {
    Sleeping,
    Wandering,
    Tracking,
    Fleeing,
    Guarding,
    /// Not taking turns (statue, altar guardian before trigger, etc.).
    Dormant,
    /// Friendly to the player; follows `leader` instead of hunting/fleeing.
    Ally,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusKind {
    Poisoned,
    Confused,
    Paralyzed,
    Hallucinating,
    Levitating,
    Invisible,
    Burning,
    Frozen,
    Nauseous,
    Slowed,
    Hasted,
    Immobilized,
    Discordant,
    Fearful,
    MagicalFear,
    Shielded,
    Entranced,
    Darkened,
    Lichenous,
    Sleepy,
}

/// A timed status effect instance (spec §3 "status array").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub kind: StatusKind,
    pub duration: i32,
}

/// Core stat block. Both the player and monsters read through these same
/// fields; a monster's baseline values come from its `MonsterTypeId`
/// catalog entry, the player's from class/level progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: i32,
    pub max_hp: i32,
    pub accuracy: i32,
    pub defense: i32,
    pub regen_rate: i32,
}

/// Shared representation for both the player and every monster instance.
///
/// `leader` and `vorpal_enemy` are weak references into the level's
/// creature arena: resolving them is always a presence lookup through
/// `ArenaId`, never a raw pointer, so a dead leader simply stops
/// resolving rather than dangling (Design Notes, cycles in ownership).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creature {
    pub is_player: bool,
    pub monster_type: Option<MonsterTypeId>,
    pub pos: Pos,
    pub stats: Stats,
    pub state: CreatureState,
    pub flags: CreatureFlags,
    pub behavior: MonsterBehaviorFlags,
    pub statuses: Vec<Status>,
    pub leader: Option<ArenaId>,
    pub vorpal_enemy: Option<ArenaId>,
    /// Absolute game-clock tick this creature last acted; drives turn
    /// ordering in the scheduler (spec §4.F).
    pub next_turn: u64,
    pub ticks_per_turn: u32,
}

impl Creature {
    pub fn status(&self, kind: StatusKind) -> Option<&Status> {
        self.statuses.iter().find(|s| s.kind == kind)
    }

    pub fn has_status(&self, kind: StatusKind) -> bool {
        self.status(kind).is_some()
    }

    /// Apply or extend a status; the spec leaves duration-stacking
    /// semantics to the caller, but the floor is "never shorten".
    pub fn apply_status(&mut self, kind: StatusKind, duration: i32) {
        if let Some(existing) = self.statuses.iter_mut().find(|s| s.kind == kind) {
            existing.duration = existing.duration.max(duration);
        } else {
            self.statuses.push(Status { kind, duration });
        }
    }

    /// Advance all status durations by one tick, dropping expired ones.
    pub fn tick_statuses(&mut self) {
        for status in self.statuses.iter_mut() {
            status.duration -= 1;
        }
        self.statuses.retain(|s| s.duration > 0);
    }

    pub fn is_dead(&self) -> bool {
        self.flags.contains(CreatureFlags::HAS_DIED) || self.stats.hp <= 0
    }

    pub fn is_incapacitated(&self) -> bool {
        self.has_status(StatusKind::Paralyzed)
            || self.has_status(StatusKind::Entranced)
            || self.flags.contains(CreatureFlags::IS_DORMANT)
    }
}
