//! Monster population via horde rolling (spec §4.E step 8).

use dg_data::horde::{hordes_for_level, HordeInfo};
use dg_data::monster::monster_info;
use dg_types::creature::{Creature, CreatureState, Stats};
use dg_types::flags::{CreatureFlags, HordeFlags, MonsterBehaviorFlags};
use dg_types::grid::{Pos, DCOLS, DROWS};
use dg_types::ids::{ArenaId, MonsterTypeId};
use dg_types::level::Level;

/// Roll every horde eligible at `depth`; a hit spawns the leader plus
/// each member group at a clump-distributed count around the leader.
pub fn populate_monsters(level: &mut Level, depth: u32) {
    let hordes: Vec<&'static HordeInfo> = hordes_for_level(depth).collect();
    let player_id = level.player_id;
    for horde in hordes {
        if horde.flags.contains(HordeFlags::IS_SUMMONED) {
            continue;
        }
        if !level.rng.rand_percent(horde.frequency) {
            continue;
        }
        let Some(leader_pos) = random_open_floor(level) else { continue };
        let allied = horde.flags.contains(HordeFlags::ALLIED_WITH_PLAYER);
        let leader_id = spawn_monster(level, &horde.leader, leader_pos, allied);
        if allied {
            if let Some(leader) = level.creatures.get_mut(leader_id) {
                leader.leader = player_id;
            }
        }

        for member in horde.members {
            let count = level.rng.rand_clump(member.lower as i64, member.upper as i64, member.clump_factor);
            for _ in 0..count.max(0) {
                let Some(pos) = random_near(level, leader_pos) else { continue };
                let id = spawn_monster(level, &member.monster, pos, allied);
                if let Some(m) = level.creatures.get_mut(id) {
                    m.leader = Some(leader_id);
                }
            }
        }
    }
}

/// `allied` marks a horde spawned via `HordeFlags::ALLIED_WITH_PLAYER`:
/// it starts in `Ally` state (following its leader) rather than asleep.
fn spawn_monster(level: &mut Level, type_id: &MonsterTypeId, pos: Pos, allied: bool) -> ArenaId {
    let info = monster_info(type_id);
    let (max_hp, accuracy, defense, behavior, ticks_per_turn) = info
        .map(|m| (m.max_hp, m.accuracy, m.defense, m.behavior, m.movement_duration))
        .unwrap_or((10, 50, 0, MonsterBehaviorFlags::empty(), 100));
    level.creatures.insert(Creature {
        is_player: false,
        monster_type: Some(*type_id),
        pos,
        stats: Stats { hp: max_hp, max_hp, accuracy, defense, regen_rate: 0 },
        state: if allied { CreatureState::Ally } else { CreatureState::Sleeping },
        flags: CreatureFlags::empty(),
        behavior,
        statuses: Vec::new(),
        leader: None,
        vorpal_enemy: None,
        next_turn: 0,
        ticks_per_turn,
    })
}

fn random_open_floor(level: &mut Level) -> Option<Pos> {
    let candidates: Vec<Pos> = (0..DROWS as i32)
        .flat_map(|y| (0..DCOLS as i32).map(move |x| Pos::new(x, y)))
        .filter(|&p| level.cell(p).dungeon.is_some() && level.creature_at(p).is_none())
        .collect();
    let idx = level.rng.random_index(candidates.len())?;
    Some(candidates[idx])
}

fn random_near(level: &mut Level, center: Pos) -> Option<Pos> {
    let candidates: Vec<Pos> = center
        .neighbors8()
        .into_iter()
        .filter(|&p| p.in_bounds() && level.cell(p).dungeon.is_some() && level.creature_at(p).is_none())
        .collect();
    if candidates.is_empty() {
        return random_open_floor(level);
    }
    let idx = level.rng.random_index(candidates.len())?;
    Some(candidates[idx])
}
