//! Monster class catalog — shared traits for a family of monster types
//! (spec §4.D "monster class catalog (dragon, goblinoid, …)").

use dg_types::MonsterClassId;

pub struct MonsterClassInfo {
    pub id: MonsterClassId,
    /// Flat to-hit bonus every member of this class gets against the
    /// player, layered on top of the individual monster's accuracy.
    pub class_accuracy_bonus: i32,
    pub description: &'static str,
}

pub static MONSTER_CLASS_CATALOG: &[MonsterClassInfo] = &[
    MonsterClassInfo {
        id: MonsterClassId::new("vermin"),
        class_accuracy_bonus: 0,
        description: "small, common, and individually weak",
    },
    MonsterClassInfo {
        id: MonsterClassId::new("aquatic"),
        class_accuracy_bonus: 0,
        description: "confined to liquid terrain",
    },
    MonsterClassInfo {
        id: MonsterClassId::new("goblinoid"),
        class_accuracy_bonus: 5,
        description: "organizes into warbands with a leader",
    },
    MonsterClassInfo {
        id: MonsterClassId::new("jelly"),
        class_accuracy_bonus: 0,
        description: "splits when struck",
    },
    MonsterClassInfo {
        id: MonsterClassId::new("spectral"),
        class_accuracy_bonus: 10,
        description: "incorporeal, flies, short-lived",
    },
    MonsterClassInfo {
        id: MonsterClassId::new("dragon"),
        class_accuracy_bonus: 15,
        description: "apex predators of the deepest levels",
    },
];

pub fn class_info(id: &MonsterClassId) -> Option<&'static MonsterClassInfo> {
    MONSTER_CLASS_CATALOG.iter().find(|c| &c.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dragon_class_has_highest_accuracy_bonus() {
        let max = MONSTER_CLASS_CATALOG
            .iter()
            .map(|c| c.class_accuracy_bonus)
            .max()
            .unwrap();
        let dragon = class_info(&MonsterClassId::new("dragon")).unwrap();
        assert_eq!(dragon.class_accuracy_bonus, max);
    }
}
