//! Flare/light catalog — transient visual light sources (spells,
//! explosions) distinct from a tile's steady `glow_light` (spec §4.D
//! "flare/light catalog").

use dg_types::Color;

use crate::colors::FIRE_LIGHT_COLOR;

pub struct FlareInfo {
    pub name: &'static str,
    pub color: Color,
    pub radius: i32,
    pub fade_ticks: i32,
}

pub static FLARE_CATALOG: &[FlareInfo] = &[FlareInfo {
    name: "explosion",
    color: FIRE_LIGHT_COLOR,
    radius: 5,
    fade_ticks: 15,
}];

pub fn flare_info(name: &str) -> Option<&'static FlareInfo> {
    FLARE_CATALOG.iter().find(|f| f.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explosion_flare_is_found() {
        assert!(flare_info("explosion").is_some());
    }
}
