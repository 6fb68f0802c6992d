//! Monster AI — the state machine driving every non-player creature's
//! turn (spec §4.H).
//!
//! States map directly onto [`dg_types::creature::CreatureState`]:
//! `Sleeping` (wake check only), `Wandering` (waypoint/random walk),
//! `Tracking` (scent-gradient pursuit), `Fleeing` (safety-map descent),
//! `Guarding` (stationary, attacks in reach), `Ally` (follows `leader`
//! instead of hunting the player), `Dormant` (no turn at all, handled
//! upstream by the scheduler never selecting it).

use dg_data::monster::monster_info;
use dg_types::creature::{Creature, CreatureState, StatusKind};
use dg_types::grid::Pos;
use dg_types::ids::ArenaId;
use dg_types::level::Level;

use crate::dijkstra::{calculate_distances, PDS_INFINITY};

/// Drive one creature's turn to completion: wake check, state transition,
/// then the state's own movement/attack decision. Mutates `level` in
/// place; the scheduler calls this once per creature whose `next_turn`
/// counter reached zero.
pub fn monsters_turn(level: &mut Level, id: ArenaId) {
    let Some(player_pos) = level.player_id.and_then(|p| level.creatures.get(p)).map(|p| p.pos) else {
        return;
    };

    let Some(creature) = level.creatures.get(id) else { return };
    if creature.is_incapacitated() {
        bump_next_turn(level, id);
        return;
    }

    let mut state = creature.state;
    let pos = creature.pos;

    if state == CreatureState::Sleeping && should_wake(level, id, player_pos) {
        state = CreatureState::Tracking;
    }
    if state != CreatureState::Fleeing && should_flee(level, id) {
        state = CreatureState::Fleeing;
    }

    match state {
        CreatureState::Sleeping | CreatureState::Dormant => {}
        CreatureState::Guarding => try_attack_adjacent(level, id, player_pos),
        CreatureState::Fleeing => flee(level, id),
        CreatureState::Tracking => track_scent(level, id, player_pos),
        CreatureState::Wandering => wander(level, id, pos),
        CreatureState::Ally => follow_leader(level, id),
    }

    if let Some(creature) = level.creatures.get_mut(id) {
        creature.state = state;
    }
    bump_next_turn(level, id);
}

fn bump_next_turn(level: &mut Level, id: ArenaId) {
    if let Some(creature) = level.creatures.get_mut(id) {
        creature.next_turn = creature.ticks_per_turn as u64;
    }
}

/// A monster wakes when the player enters its perception range and it is
/// not already revealed as dormant; `NEVER_SLEEPS` monsters always count
/// as awake, so this only gates the `Sleeping` → `Tracking` transition.
fn should_wake(level: &Level, id: ArenaId, player_pos: Pos) -> bool {
    let Some(creature) = level.creatures.get(id) else { return false };
    if monster_behavior(creature).map_or(false, |b| b.contains(dg_types::flags::MonsterBehaviorFlags::NEVER_SLEEPS)) {
        return true;
    }
    const PERCEPTION_RADIUS: i32 = 6;
    creature.pos.distance_chebyshev(player_pos) <= PERCEPTION_RADIUS
}

fn monster_behavior(creature: &Creature) -> Option<dg_types::flags::MonsterBehaviorFlags> {
    creature.monster_type.as_ref().and_then(monster_info).map(|m| m.behavior)
}

/// Flee once HP drops below a third of max, for monsters flagged
/// `FLEES_NEAR_DEATH`.
fn should_flee(level: &Level, id: ArenaId) -> bool {
    let Some(creature) = level.creatures.get(id) else { return false };
    if !monster_behavior(creature).map_or(false, |b| b.contains(dg_types::flags::MonsterBehaviorFlags::FLEES_NEAR_DEATH)) {
        return false;
    }
    creature.stats.hp * 3 < creature.stats.max_hp
}

fn try_attack_adjacent(level: &mut Level, id: ArenaId, player_pos: Pos) {
    let Some(creature) = level.creatures.get(id) else { return };
    if creature.pos.distance_chebyshev(player_pos) != 1 {
        return;
    }
    let Some(attack) = creature.monster_type.as_ref().and_then(monster_info).map(|m| m.attack) else {
        return;
    };
    let dmg = level.rng.rand_clump(attack.lower, attack.upper, attack.clump_factor) as i32;

    let Some(player_id) = level.player_id else { return };
    let Some(player) = level.creatures.get_mut(player_id) else { return };
    let mut shield = 0;
    crate::combat::inflict_damage(player, &mut shield, dmg, false, false);
}

/// An ally with no living leader to follow just holds position rather than
/// reverting to any hunting/fleeing behavior (spec §4.H step 3).
fn follow_leader(level: &mut Level, id: ArenaId) {
    let Some(creature) = level.creatures.get(id) else { return };
    let Some(leader_id) = creature.leader else { return };
    let Some(leader_pos) = level.creatures.get(leader_id).map(|l| l.pos) else { return };
    if creature.pos.distance_chebyshev(leader_pos) <= 1 {
        return;
    }
    let distances = calculate_distances(leader_pos, |_| false, |_| false, |_| false, true);
    step_toward_lower_distance(level, id, &distances);
}

/// Step one cell down the scent gradient toward the player, the Dijkstra
/// distance map recomputed fresh each call: scent maps are cheap enough
/// at this grid size that lazy invalidation isn't worth the bookkeeping
/// (unlike the safety map used by `flee`, which is meaningfully more
/// expensive to recompute per-monster).
fn track_scent(level: &mut Level, id: ArenaId, player_pos: Pos) {
    let Some(creature) = level.creatures.get(id) else { return };
    if creature.pos.distance_chebyshev(player_pos) == 1 {
        try_attack_adjacent(level, id, player_pos);
        return;
    }
    let distances = calculate_distances(player_pos, |_| false, |_| false, |_| false, true);
    step_toward_lower_distance(level, id, &distances);
}

/// Flee along the ascending direction of a "safety map": a distance field
/// seeded at every currently-visible threat instead of a single
/// destination, so the gradient points away from danger rather than
/// toward a goal.
fn flee(level: &mut Level, id: ArenaId) {
    let Some(creature) = level.creatures.get(id) else { return };
    let threat_positions: Vec<Pos> = level
        .creatures
        .iter()
        .filter(|(other, c)| *other != id && !c.is_dead())
        .map(|(_, c)| c.pos)
        .collect();
    if threat_positions.is_empty() {
        return;
    }
    // Build a combined safety map by seeding distance 0 at every threat and
    // scanning once; the monster then walks toward the locally maximal
    // distance among its neighbors.
    let mut safety = dg_types::grid::Grid::alloc(PDS_INFINITY);
    for t in threat_positions {
        safety.set(t, 0);
    }
    let cost = open_passable_cost();
    crate::dijkstra::dijkstra_scan(&mut safety, &cost, true);

    let pos = creature.pos;
    let mut best = pos;
    let mut best_dist = safety.get(pos);
    for n in pos.neighbors8() {
        if n.in_bounds() && safety.get(n) > best_dist {
            best_dist = safety.get(n);
            best = n;
        }
    }
    move_creature(level, id, best);
}

fn open_passable_cost() -> dg_types::grid::Grid {
    let mut cost = dg_types::grid::Grid::alloc(1);
    for y in 0..dg_types::grid::DROWS as i32 {
        for x in 0..dg_types::grid::DCOLS as i32 {
            let pos = Pos::new(x, y);
            if pos.is_border() {
                cost.set(pos, crate::dijkstra::PDS_OBSTRUCTION);
            }
        }
    }
    cost
}

/// No destination in mind: a waypoint-free random walk among open
/// neighbors, matching the source's fallback behavior when a monster has
/// no assigned waypoint path.
fn wander(level: &mut Level, id: ArenaId, pos: Pos) {
    let candidates: Vec<Pos> = pos
        .neighbors8()
        .into_iter()
        .filter(|&n| n.in_bounds() && !n.is_border() && level.creature_at(n).is_none())
        .collect();
    if candidates.is_empty() {
        return;
    }
    let idx = level.rng.random_index(candidates.len()).unwrap();
    move_creature(level, id, candidates[idx]);
}

fn step_toward_lower_distance(level: &mut Level, id: ArenaId, distances: &dg_types::grid::Grid) {
    let Some(creature) = level.creatures.get(id) else { return };
    let pos = creature.pos;
    let mut best = pos;
    let mut best_dist = distances.get(pos);
    for n in pos.neighbors8() {
        if n.in_bounds() && level.creature_at(n).is_none() && distances.get(n) < best_dist {
            best_dist = distances.get(n);
            best = n;
        }
    }
    move_creature(level, id, best);
}

fn move_creature(level: &mut Level, id: ArenaId, dest: Pos) {
    if let Some(creature) = level.creatures.get_mut(id) {
        if creature.has_status(StatusKind::Immobilized) || creature.has_status(StatusKind::Entranced) {
            return;
        }
        creature.pos = dest;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_types::creature::Stats;
    use dg_types::flags::{CreatureFlags, MonsterBehaviorFlags};
    use dg_types::rng::RngState;

    fn monster_at(pos: Pos, state: CreatureState) -> Creature {
        Creature {
            is_player: false,
            monster_type: Some(dg_types::ids::MonsterTypeId::new("rat")),
            pos,
            stats: Stats { hp: 6, max_hp: 6, accuracy: 50, defense: 0, regen_rate: 0 },
            state,
            flags: CreatureFlags::empty(),
            behavior: MonsterBehaviorFlags::empty(),
            statuses: Vec::new(),
            leader: None,
            vorpal_enemy: None,
            next_turn: 0,
            ticks_per_turn: 100,
        }
    }

    fn player_at(pos: Pos) -> Creature {
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
    fn sleeping_monster_wakes_within_perception_radius() {
        let mut level = Level::new(1, RngState::new(1));
        let player = level.creatures.insert(player_at(Pos::new(10, 10)));
        level.player_id = Some(player);
        let rat = level.creatures.insert(monster_at(Pos::new(12, 10), CreatureState::Sleeping));
        monsters_turn(&mut level, rat);
        assert_eq!(level.creatures.get(rat).unwrap().state, CreatureState::Tracking);
    }

    #[test]
    fn incapacitated_monster_takes_no_action() {
        let mut level = Level::new(1, RngState::new(1));
        let player = level.creatures.insert(player_at(Pos::new(10, 10)));
        level.player_id = Some(player);
        let rat = level.creatures.insert(monster_at(Pos::new(11, 10), CreatureState::Wandering));
        level.creatures.get_mut(rat).unwrap().apply_status(StatusKind::Paralyzed, 3);
        let before = level.creatures.get(rat).unwrap().pos;
        monsters_turn(&mut level, rat);
        assert_eq!(level.creatures.get(rat).unwrap().pos, before);
    }

    #[test]
    fn tracking_monster_moves_closer_to_the_player() {
        let mut level = Level::new(1, RngState::new(1));
        let player = level.creatures.insert(player_at(Pos::new(40, 14)));
        level.player_id = Some(player);
        let rat = level.creatures.insert(monster_at(Pos::new(30, 14), CreatureState::Tracking));
        let before = level.creatures.get(rat).unwrap().pos.distance_chebyshev(Pos::new(40, 14));
        monsters_turn(&mut level, rat);
        let after = level.creatures.get(rat).unwrap().pos.distance_chebyshev(Pos::new(40, 14));
        assert!(after <= before);
    }

    #[test]
    fn wandering_monster_with_no_open_neighbors_stays_put() {
        let mut level = Level::new(1, RngState::new(1));
        let player = level.creatures.insert(player_at(Pos::new(1, 1)));
        level.player_id = Some(player);
        // surround (5,5) with creatures so every neighbor is occupied
        let center = Pos::new(5, 5);
        let rat = level.creatures.insert(monster_at(center, CreatureState::Wandering));
        for n in center.neighbors8() {
            level.creatures.insert(monster_at(n, CreatureState::Dormant));
        }
        monsters_turn(&mut level, rat);
        assert_eq!(level.creatures.get(rat).unwrap().pos, center);
    }

    #[test]
    fn guarding_monster_adjacent_to_the_player_deals_damage() {
        let mut level = Level::new(1, RngState::new(4));
        let player = level.creatures.insert(player_at(Pos::new(10, 10)));
        level.player_id = Some(player);
        let rat = level.creatures.insert(monster_at(Pos::new(11, 10), CreatureState::Guarding));
        let before = level.creatures.get(player).unwrap().stats.hp;
        monsters_turn(&mut level, rat);
        assert!(level.creatures.get(player).unwrap().stats.hp < before);
    }

    #[test]
    fn ally_follows_its_leader_toward_its_position() {
        let mut level = Level::new(1, RngState::new(1));
        let leader = level.creatures.insert(player_at(Pos::new(40, 14)));
        level.player_id = Some(leader);
        let mut escort = monster_at(Pos::new(30, 14), CreatureState::Ally);
        escort.leader = Some(leader);
        let rat = level.creatures.insert(escort);
        let before = level.creatures.get(rat).unwrap().pos.distance_chebyshev(Pos::new(40, 14));
        monsters_turn(&mut level, rat);
        let after = level.creatures.get(rat).unwrap().pos.distance_chebyshev(Pos::new(40, 14));
        assert!(after <= before);
    }

    #[test]
    fn ally_with_no_leader_holds_position() {
        let mut level = Level::new(1, RngState::new(1));
        let player = level.creatures.insert(player_at(Pos::new(1, 1)));
        level.player_id = Some(player);
        let rat = level.creatures.insert(monster_at(Pos::new(5, 5), CreatureState::Ally));
        monsters_turn(&mut level, rat);
        assert_eq!(level.creatures.get(rat).unwrap().pos, Pos::new(5, 5));
    }
}
