//! Combat resolution — damage application and the magic-item runic
//! tables (spec §4.I "Combat damage" / runic sections).

use dg_types::creature::{Creature, StatusKind};
use dg_types::flags::CreatureFlags;
use dg_types::ids::ArenaId;
use dg_types::level::Level;

/// A magic weapon's on-hit runic effect (spec §4.I "Magic weapon runic
/// on hit"). Dying defenders only ever trigger `Speed`/`Plenty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponRunic {
    Quietus,
    Slaying,
    Paralysis,
    Slowing,
    Confusion,
    Speed,
    Mercy,
    Force,
    Plenty,
    Multiplicity,
}

/// An armor's on-incoming-hit runic effect (spec §4.I "Armor runic on
/// incoming hit").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmorRunic {
    Absorption,
    Reprisal,
    Immunity,
    Vulnerability,
    Burden,
    Multiplicity,
}

/// Outcome of an [`inflict_damage`] call, letting the caller trigger
/// follow-up effects (death messages, runic identification) without
/// `inflict_damage` itself owning a message log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageResult {
    pub applied: i32,
    pub killed: bool,
    pub started_fleeing: bool,
}

/// Apply `dmg` points of damage from `attacker` to `defender`, honoring
/// shields, easy mode, and invulnerability, per spec §4.I.
///
/// `shield_points` is threaded through by the caller rather than stored
/// on `Creature` directly, since only items with a protection enchant
/// carry a shield and most creatures never touch this path.
pub fn inflict_damage(
    defender: &mut Creature,
    shield_points: &mut i32,
    dmg: i32,
    easy_mode: bool,
    ignores_shield: bool,
) -> DamageResult {
    if dmg <= 0 || defender.behavior.contains(dg_types::flags::MonsterBehaviorFlags::INVULNERABLE) {
        return DamageResult { applied: 0, killed: false, started_fleeing: false };
    }

    let mut remaining = if !defender.is_player || !easy_mode {
        dmg
    } else {
        (dmg / 5).max(1)
    };

    if !ignores_shield && *shield_points > 0 {
        // Shield absorbs at 10:1: every shield point blocks 1/10th of a
        // damage point, so damage must be scaled up before it is debited.
        let scaled = remaining * 10;
        let absorbed = scaled.min(*shield_points);
        *shield_points -= absorbed;
        remaining -= absorbed / 10;
        remaining = remaining.max(0);
    }

    defender.flags.remove(CreatureFlags::ABSORBING);
    if !defender.is_player && defender.state == dg_types::creature::CreatureState::Sleeping {
        defender.state = dg_types::creature::CreatureState::Tracking;
    }

    let was_above_flee_threshold = defender.stats.hp * 4 >= defender.stats.max_hp;
    defender.stats.hp = (defender.stats.hp - remaining).clamp(0, defender.stats.max_hp);
    let killed = defender.stats.hp == 0;
    if killed {
        defender.flags.insert(CreatureFlags::HAS_DIED);
    }

    let crossed_flee_threshold = was_above_flee_threshold && defender.stats.hp * 4 < defender.stats.max_hp;
    let started_fleeing = !killed
        && !defender.is_player
        && crossed_flee_threshold
        && defender.behavior.contains(dg_types::flags::MonsterBehaviorFlags::FLEES_NEAR_DEATH)
        && !defender.flags.contains(CreatureFlags::CAPTIVE);
    if started_fleeing {
        defender.state = dg_types::creature::CreatureState::Fleeing;
    }

    DamageResult { applied: remaining, killed, started_fleeing }
}

/// Resolve a magic weapon's on-hit runic, mutating `defender` in place.
/// Returns whether the runic triggered at all (for auto-identify).
pub fn apply_weapon_runic(
    runic: WeaponRunic,
    level: &mut Level,
    attacker: ArenaId,
    defender: ArenaId,
    activation_roll: i32,
) -> bool {
    let Some(defender_creature) = level.creatures.get(defender) else { return false };
    let defender_dying = defender_creature.is_dead();
    if defender_dying && !matches!(runic, WeaponRunic::Speed | WeaponRunic::Plenty) {
        return false;
    }
    if activation_roll >= 100 {
        return false;
    }

    match runic {
        WeaponRunic::Quietus | WeaponRunic::Slaying => {
            if let Some(d) = level.creatures.get_mut(defender) {
                d.stats.hp = 0;
                d.flags.insert(CreatureFlags::HAS_DIED);
            }
        }
        WeaponRunic::Paralysis => {
            if let Some(d) = level.creatures.get_mut(defender) {
                d.apply_status(StatusKind::Paralyzed, 15);
            }
        }
        WeaponRunic::Slowing => {
            if let Some(d) = level.creatures.get_mut(defender) {
                d.apply_status(StatusKind::Slowed, 15);
            }
        }
        WeaponRunic::Confusion => {
            if let Some(d) = level.creatures.get_mut(defender) {
                d.apply_status(StatusKind::Confused, 15);
            }
        }
        WeaponRunic::Speed => {
            if let Some(a) = level.creatures.get_mut(attacker) {
                a.next_turn = 0;
            }
        }
        WeaponRunic::Mercy => {
            if let Some(d) = level.creatures.get_mut(defender) {
                d.stats.hp = (d.stats.hp + d.stats.max_hp / 4).min(d.stats.max_hp);
            }
        }
        WeaponRunic::Force => {
            // Knockback direction is resolved by the caller (action.rs
            // owns positions); here we only clear any seize that would
            // otherwise prevent the defender from being displaced.
            if let Some(d) = level.creatures.get_mut(defender) {
                d.flags.remove(CreatureFlags::SEIZED);
            }
        }
        WeaponRunic::Plenty | WeaponRunic::Multiplicity => {
            if let Some(d) = level.creatures.get(defender).cloned() {
                level.creatures.insert(d);
            }
        }
    }
    true
}

/// Resolve an armor's on-incoming-hit runic. Returns the (possibly
/// reduced/increased) damage after the runic's effect.
pub fn apply_armor_runic(
    runic: ArmorRunic,
    level: &mut Level,
    attacker: ArenaId,
    defender: ArenaId,
    incoming: i32,
    magnitude: i32,
    attacker_is_vorpal_enemy: bool,
    melee: bool,
) -> i32 {
    let _ = defender;
    match runic {
        ArmorRunic::Absorption => (incoming - magnitude).max(0),
        ArmorRunic::Reprisal if melee => {
            if let Some(a) = level.creatures.get_mut(attacker) {
                a.stats.hp = (a.stats.hp - incoming / 2).max(0);
            }
            incoming
        }
        ArmorRunic::Immunity if attacker_is_vorpal_enemy => 0,
        ArmorRunic::Vulnerability => incoming * 2,
        ArmorRunic::Burden => incoming, // strength-requirement bump handled by item.rs, not damage math
        ArmorRunic::Multiplicity if melee => {
            if let Some(a) = level.creatures.get(attacker).cloned() {
                level.creatures.insert(a);
            }
            incoming
        }
        _ => incoming,
    }
}
