//! Mutation catalog — modifiers applied to a horde's spawned monsters on
//! top of their base type (spec §4.D "mutation catalog").

use dg_types::MutationId;

pub struct MutationInfo {
    pub id: MutationId,
    pub hp_multiplier_percent: i32,
    pub accuracy_bonus: i32,
    pub defense_bonus: i32,
    pub description: &'static str,
}

pub static MUTATION_CATALOG: &[MutationInfo] = &[MutationInfo {
    id: MutationId::new("explosive_bloat"),
    hp_multiplier_percent: 150,
    accuracy_bonus: -10,
    defense_bonus: 0,
    description: "bursts into flame on death",
}];

pub fn mutation_info(id: &MutationId) -> Option<&'static MutationInfo> {
    MUTATION_CATALOG.iter().find(|m| &m.id == id)
}
