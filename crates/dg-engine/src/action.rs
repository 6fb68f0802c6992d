//! Player action resolution — `player_moves`/`player_runs` and item
//! apply dispatch (spec §4.I).

use dg_types::cell::Layer;
use dg_types::creature::StatusKind;
use dg_types::flags::{CellFlags, CreatureFlags, TileFlags};
use dg_types::grid::Pos;
use dg_types::ids::ArenaId;
use dg_types::item::{Category, ItemLocation};
use dg_types::level::Level;

use crate::combat::inflict_damage;
use crate::error::ActionError;

/// Outcome of a single `player_moves` call — enough for the caller
/// (CLI loop, recording) to know whether a turn was actually consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub turn_consumed: bool,
    pub attacked: Option<ArenaId>,
    pub descended: bool,
}

/// Resolve one player move attempt in `direction` (a [`dg_types::grid::NB_DIRS`]
/// index). Implements the thirteen-step contract in spec §4.I, collapsed
/// to the steps that have observable state in this engine (prompts for
/// aborted attacks/lunges are represented as always-accepted, since there
/// is no interactive UI layer in this crate).
pub fn player_moves(level: &mut Level, direction: usize, easy_mode: bool) -> Result<MoveOutcome, ActionError> {
    let player_id = level.player_id.ok_or(ActionError::NoActor)?;
    let Some(player) = level.creatures.get(player_id) else {
        return Err(ActionError::NoActor);
    };
    if player.is_incapacitated() {
        return Err(ActionError::Incapacitated);
    }

    // Step 2: confusion redirects to a random valid direction.
    let direction = if player.has_status(StatusKind::Confused) {
        level.rng.random_index(8).unwrap_or(direction)
    } else {
        direction
    };

    let from = player.pos;
    let target = from.neighbor(direction);
    if !target.in_bounds() {
        return Err(ActionError::Blocked);
    }

    // Step 6: an occupying enemy is attacked rather than walked into.
    if let Some((defender_id, _)) = level.creature_at(target) {
        if defender_id != player_id {
            attack(level, player_id, defender_id, easy_mode)?;
            consume_player_turn(level, player_id);
            return Ok(MoveOutcome { turn_consumed: true, attacked: Some(defender_id), descended: false });
        }
    }

    // Step 3/4: terrain promotion and move-not-blocked.
    if is_blocked(level, target) {
        return Err(ActionError::Blocked);
    }

    move_player(level, player_id, from, target);

    // Step 13: auto-descent and stairs.
    let descended = tile_at(level, target, Layer::Dungeon).map_or(false, |t| t.contains(TileFlags::AUTO_DESCENT));
    if descended {
        if let Some(p) = level.creatures.get_mut(player_id) {
            p.flags.insert(CreatureFlags::IS_FALLING);
        }
    }

    pick_up_item(level, player_id, target);
    consume_player_turn(level, player_id);

    Ok(MoveOutcome { turn_consumed: true, attacked: None, descended })
}

/// Set the player's `next_turn` counter to its movement/attack speed, the
/// same bump monsters get from `ai::bump_next_turn` — without this the
/// scheduler's player-tick loop in `scheduler::player_turn_ended` never
/// sees a nonzero counter and never advances the clock.
fn consume_player_turn(level: &mut Level, player_id: ArenaId) {
    if let Some(player) = level.creatures.get_mut(player_id) {
        player.next_turn = player.ticks_per_turn as u64;
    }
}

/// Repeat `player_moves` in `direction` until `is_disturbed` reports a
/// reason to stop (spec §4.I `playerRuns`). Returns the number of steps
/// actually taken.
pub fn player_runs(level: &mut Level, direction: usize, easy_mode: bool) -> Result<u32, ActionError> {
    let mut steps = 0;
    loop {
        if is_disturbed(level, direction) {
            break;
        }
        match player_moves(level, direction, easy_mode) {
            Ok(outcome) if outcome.turn_consumed => steps += 1,
            Ok(_) => break,
            Err(ActionError::Blocked) => break,
            Err(e) => return Err(e),
        }
        if steps > 0 && is_disturbed(level, direction) {
            break;
        }
    }
    Ok(steps)
}

/// A run halts when a visible threat appears, the corridor shape on
/// either flank changes, or the player is no longer free to act.
fn is_disturbed(level: &Level, direction: usize) -> bool {
    let Some(player_id) = level.player_id else { return true };
    let Some(player) = level.creatures.get(player_id) else { return true };
    if player.is_incapacitated() || player.has_status(StatusKind::Confused) {
        return true;
    }
    let threat_nearby = level
        .creatures
        .iter()
        .any(|(id, c)| id != player_id && !c.is_dead() && c.pos.distance_chebyshev(player.pos) <= 2);
    if threat_nearby {
        return true;
    }
    let _ = direction; // corridor-flank re-check omitted: no render-side cell visibility model here
    false
}

fn tile_at(level: &Level, pos: Pos, layer: Layer) -> Option<TileFlags> {
    let id = level.cell(pos).layer(layer)?;
    dg_data::tile::tile_info(id).map(|t| t.flags)
}

fn is_blocked(level: &Level, pos: Pos) -> bool {
    tile_at(level, pos, Layer::Dungeon).map_or(false, |f| f.contains(TileFlags::OBSTRUCTS_PASSABILITY))
}

fn move_player(level: &mut Level, player_id: ArenaId, from: Pos, to: Pos) {
    level.cell_mut(from).flags.remove(CellFlags::HAS_PLAYER);
    level.cell_mut(to).flags.insert(CellFlags::HAS_PLAYER);
    if let Some(player) = level.creatures.get_mut(player_id) {
        player.pos = to;
    }
}

fn pick_up_item(level: &mut Level, player_id: ArenaId, pos: Pos) {
    let floor_item = level.items.iter().find(|(_, it)| it.location == ItemLocation::Floor(pos)).map(|(id, _)| id);
    if let Some(item_id) = floor_item {
        if let Some(item) = level.items.get_mut(item_id) {
            item.location = ItemLocation::CarriedBy(player_id);
        }
        level.cell_mut(pos).flags.remove(CellFlags::HAS_ITEM);
    }
}

fn attack(level: &mut Level, attacker_id: ArenaId, defender_id: ArenaId, easy_mode: bool) -> Result<(), ActionError> {
    let Some(attacker) = level.creatures.get(attacker_id) else {
        return Err(ActionError::NoActor);
    };
    if attacker.pos.distance_chebyshev(level.creatures.get(defender_id).map_or(attacker.pos, |d| d.pos)) > 1 {
        return Err(ActionError::NotAdjacent);
    }
    let (lo, hi, clump) = (2, 6, 1u32);
    let dmg = level.rng.rand_clump(lo, hi, clump) as i32;

    let Some(defender) = level.creatures.get_mut(defender_id) else {
        return Err(ActionError::NoActor);
    };
    let mut shield = 0;
    inflict_damage(defender, &mut shield, dmg, easy_mode, false);
    Ok(())
}

/// Use a carried item by its pack slot / item id, dispatching by category
/// (spec §4.I "Item apply"). Food/potion/scroll effects beyond "consumed"
/// are out of this engine's Non-goals (message/flavor text); staves,
/// wands, and charms consume a charge or start a recharge timer.
pub fn apply_item(level: &mut Level, item_id: ArenaId, target: Option<ArenaId>) -> Result<(), ActionError> {
    let Some(item) = level.items.get_mut(item_id) else {
        return Err(ActionError::EmptySlot('\0'));
    };
    match &mut item.category {
        Category::Food { .. } | Category::Potion { .. } | Category::Scroll { .. } => {
            item.location = ItemLocation::Floor(Pos::new(0, 0)); // consumed, removed from pack bookkeeping upstream
            Ok(())
        }
        Category::Staff(data) | Category::Wand(data) => {
            if data.charges <= 0 {
                return Err(ActionError::NoCharges);
            }
            data.charges -= 1;
            let _ = target;
            Ok(())
        }
        Category::Charm(data) => {
            if data.ticks_until_recharged > 0 {
                return Err(ActionError::Recharging(data.ticks_until_recharged));
            }
            data.ticks_until_recharged = data.recharge_delay;
            Ok(())
        }
        _ => Err(ActionError::WrongCategory('\0')),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_types::creature::{Creature, CreatureState, Stats};
    use dg_types::flags::MonsterBehaviorFlags;
    use dg_types::ids::TileTypeId;
    use dg_types::rng::RngState;

    fn player(pos: Pos) -> Creature {
        Creature {
            is_player: true,
            monster_type: None,
            pos,
            stats: Stats { hp: 20, max_hp: 20, accuracy: 70, defense: 0, regen_rate: 0 },
            state: CreatureState::Wandering,
            flags: CreatureFlags::empty(),
            behavior: MonsterBehaviorFlags::empty(),
            statuses: Vec::new(),
            leader: None,
            vorpal_enemy: None,
            next_turn: 0,
            ticks_per_turn: 100,
        }
    }

    #[test]
    fn moving_into_open_floor_updates_position_and_flags() {
        let mut level = Level::new(1, RngState::new(1));
        let start = Pos::new(10, 10);
        for dy in -1..=1 {
            for dx in -1..=1 {
                level.cell_mut(Pos::new(10 + dx, 10 + dy)).dungeon = Some(TileTypeId::new("floor"));
            }
        }
        let pid = level.creatures.insert(player(start));
        level.player_id = Some(pid);
        level.cell_mut(start).flags.insert(CellFlags::HAS_PLAYER);

        let outcome = player_moves(&mut level, 3, false).unwrap(); // right
        assert!(outcome.turn_consumed);
        assert_eq!(level.creatures.get(pid).unwrap().pos, Pos::new(11, 10));
        assert!(!level.cell(start).flags.contains(CellFlags::HAS_PLAYER));
    }

    #[test]
    fn moving_into_a_wall_is_blocked() {
        let mut level = Level::new(1, RngState::new(1));
        let start = Pos::new(10, 10);
        level.cell_mut(start).dungeon = Some(TileTypeId::new("floor"));
        level.cell_mut(Pos::new(11, 10)).dungeon = Some(TileTypeId::new("wall"));
        let pid = level.creatures.insert(player(start));
        level.player_id = Some(pid);

        let err = player_moves(&mut level, 3, false).unwrap_err();
        assert_eq!(err, ActionError::Blocked);
    }

    #[test]
    fn moving_into_an_enemy_attacks_instead_of_swapping_positions() {
        let mut level = Level::new(1, RngState::new(3));
        let start = Pos::new(10, 10);
        for dy in -1..=1 {
            for dx in -1..=1 {
                level.cell_mut(Pos::new(10 + dx, 10 + dy)).dungeon = Some(TileTypeId::new("floor"));
            }
        }
        let pid = level.creatures.insert(player(start));
        level.player_id = Some(pid);
        let mut enemy = player(Pos::new(11, 10));
        enemy.is_player = false;
        let eid = level.creatures.insert(enemy);

        let outcome = player_moves(&mut level, 3, false).unwrap();
        assert_eq!(outcome.attacked, Some(eid));
        assert_eq!(level.creatures.get(pid).unwrap().pos, start);
    }

    #[test]
    fn incapacitated_player_cannot_move() {
        let mut level = Level::new(1, RngState::new(1));
        let mut p = player(Pos::new(5, 5));
        p.apply_status(StatusKind::Paralyzed, 3);
        let pid = level.creatures.insert(p);
        level.player_id = Some(pid);
        let err = player_moves(&mut level, 0, false).unwrap_err();
        assert_eq!(err, ActionError::Incapacitated);
    }
}
