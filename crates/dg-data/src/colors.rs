//! Color constants used by terrain and light catalogs (spec §4.D "color
//! constants").

use dg_types::Color;

pub const TORCH_LIGHT_COLOR: Color = Color::solid(150, 80, 20);
pub const MAGIC_GLOW_COLOR: Color = Color::solid(40, 120, 200);
pub const FIRE_LIGHT_COLOR: Color = Color::solid(255, 100, 0);
pub const GAS_GLOW_POISON: Color = Color::solid(0, 180, 0);
