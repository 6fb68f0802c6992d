//! `Pcell` — the four stacked terrain layers of a single map cell.

use serde::{Deserialize, Serialize};

use crate::flags::CellFlags;
use crate::ids::TileTypeId;

/// Which of the four stacked layers a terrain-affecting operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    Dungeon,
    Liquid,
    Surface,
    Gas,
}

impl Layer {
    pub const ALL: [Layer; 4] = [Layer::Dungeon, Layer::Liquid, Layer::Surface, Layer::Gas];
}

/// A snapshot of what a cell looked like the last time the player saw it,
/// for "last seen" rendering while out of the field of view. Rendering
/// itself is an external collaborator; this is just the data it reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RememberedAppearance {
    pub dungeon: Option<TileTypeId2>,
    pub liquid: Option<TileTypeId2>,
    pub surface: Option<TileTypeId2>,
}

/// A cheap `Copy` handle standing in for `TileTypeId` inside the
/// remembered-appearance snapshot, since `TileTypeId` itself wraps a
/// `Box<str>` and cells snapshot terrain by catalog index, not by name.
pub type TileTypeId2 = u16;

/// A single map cell: four stacked terrain layers, a flag word, gas
/// volume, machine membership, and a remembered appearance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pcell {
    pub dungeon: Option<TileTypeId>,
    pub liquid: Option<TileTypeId>,
    pub surface: Option<TileTypeId>,
    pub gas: Option<TileTypeId>,
    pub flags: CellFlags,
    /// Gas volume in `[0, 255]`.
    pub volume: u8,
    /// 0 = not part of a machine.
    pub machine_number: u32,
    pub remembered: RememberedAppearance,
}

impl Pcell {
    pub fn new() -> Self {
        Self {
            dungeon: None,
            liquid: None,
            surface: None,
            gas: None,
            flags: CellFlags::empty(),
            volume: 0,
            machine_number: 0,
            remembered: RememberedAppearance::default(),
        }
    }

    pub fn layer(&self, layer: Layer) -> Option<&TileTypeId> {
        match layer {
            Layer::Dungeon => self.dungeon.as_ref(),
            Layer::Liquid => self.liquid.as_ref(),
            Layer::Surface => self.surface.as_ref(),
            Layer::Gas => self.gas.as_ref(),
        }
    }

    pub fn set_layer(&mut self, layer: Layer, value: Option<TileTypeId>) {
        match layer {
            Layer::Dungeon => self.dungeon = value,
            Layer::Liquid => self.liquid = value,
            Layer::Surface => self.surface = value,
            Layer::Gas => {
                self.gas = value;
                if self.gas.is_none() {
                    self.volume = 0;
                }
            }
        }
    }

    pub fn is_in_machine(&self) -> bool {
        self.machine_number != 0
    }
}

impl Default for Pcell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_cell_has_no_layers_set() {
        let c = Pcell::new();
        for layer in Layer::ALL {
            assert!(c.layer(layer).is_none());
        }
    }

    #[test]
    fn clearing_gas_layer_zeros_volume() {
        let mut c = Pcell::new();
        c.set_layer(Layer::Gas, Some(TileTypeId::from("methane")));
        c.volume = 120;
        c.set_layer(Layer::Gas, None);
        assert_eq!(c.volume, 0);
    }

    #[test]
    fn machine_membership_reflects_machine_number() {
        let mut c = Pcell::new();
        assert!(!c.is_in_machine());
        c.machine_number = 3;
        assert!(c.is_in_machine());
    }

    #[test]
    fn has_player_and_has_monster_can_be_distinguished() {
        let mut c = Pcell::new();
        c.flags.insert(CellFlags::HAS_PLAYER);
        assert!(c.flags.contains(CellFlags::HAS_PLAYER));
        assert!(!c.flags.contains(CellFlags::HAS_MONSTER));
    }
}
