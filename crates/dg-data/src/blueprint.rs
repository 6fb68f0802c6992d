//! Blueprint (machine) catalog — the static definition of a machine: depth
//! range, room size, flags, and its ordered list of features (spec §3
//! "Blueprint", §4.E step 6, §7).

use dg_types::{BlueprintFlags, BlueprintId};

use crate::dungeon_feature::DungeonFeatureInfo;

pub struct BlueprintFeatureSlot {
    pub feature: &'static DungeonFeatureInfo,
    /// Evaluated in order; later slots may depend on earlier ones having
    /// already claimed candidate cells (spec §7's "ordered features").
    pub required: bool,
}

pub struct BlueprintInfo {
    pub id: BlueprintId,
    pub min_depth: u32,
    pub max_depth: u32,
    pub room_size: (i32, i32),
    pub flags: BlueprintFlags,
    pub features: &'static [BlueprintFeatureSlot],
}

pub fn blueprint_info(id: &BlueprintId) -> Option<&'static BlueprintInfo> {
    BLUEPRINT_CATALOG.iter().find(|b| &b.id == id)
}

use crate::dungeon_feature::DUNGEON_FEATURE_CATALOG;

pub static BLUEPRINT_CATALOG: &[BlueprintInfo] = &[BlueprintInfo {
    id: BlueprintId::new("guardian_vault"),
    min_depth: 5,
    max_depth: 20,
    room_size: (5, 9),
    flags: BlueprintFlags::BP_ROOM.union(BlueprintFlags::BP_REWARD),
    features: &[
        BlueprintFeatureSlot {
            feature: &DUNGEON_FEATURE_CATALOG[1], // statuary_guardian
            required: true,
        },
        BlueprintFeatureSlot {
            feature: &DUNGEON_FEATURE_CATALOG[2], // pressure_plate
            required: true,
        },
        BlueprintFeatureSlot {
            feature: &DUNGEON_FEATURE_CATALOG[0], // torch_wall_sconce
            required: false,
        },
    ],
}];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guardian_vault_is_reward_room() {
        let bp = blueprint_info(&BlueprintId::new("guardian_vault")).unwrap();
        assert!(bp.flags.contains(BlueprintFlags::BP_REWARD));
        assert_eq!(bp.features.len(), 3);
    }

    #[test]
    fn required_features_come_before_optional_in_declaration_order() {
        let bp = blueprint_info(&BlueprintId::new("guardian_vault")).unwrap();
        let first_optional = bp.features.iter().position(|f| !f.required);
        let last_required = bp.features.iter().rposition(|f| f.required);
        assert!(first_optional.unwrap() > last_required.unwrap());
    }
}
