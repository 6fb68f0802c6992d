//! Color — baseline plus per-channel random jitter.
//!
//! Colors are not "baked" into display values here; that composition step
//! belongs to the rendering layer, an external collaborator (spec §1).
//! This type only carries the inputs that layer needs.

use serde::{Deserialize, Serialize};

use crate::rng::CosmeticRng;

/// Eight-component color: a baseline `(r, g, b)` in `[-1000, 1000]`, a
/// per-channel random amplitude, a shared random draw, and a flag marking
/// colors whose random component must be re-rolled every frame rather
/// than baked once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: i32,
    pub g: i32,
    pub b: i32,
    pub r_rand: i32,
    pub g_rand: i32,
    pub b_rand: i32,
    pub rand: i32,
    pub color_dances: bool,
}

impl Color {
    pub const fn solid(r: i32, g: i32, b: i32) -> Self {
        Self {
            r,
            g,
            b,
            r_rand: 0,
            g_rand: 0,
            b_rand: 0,
            rand: 0,
            color_dances: false,
        }
    }

    /// Draw one instantiation of this color's per-channel jitter, clamped
    /// to the legal `[-1000, 1000]` range. The rendering layer bakes the
    /// result into a displayable value; this is as far as the core goes.
    pub fn jittered(self, rng: &mut CosmeticRng) -> (i32, i32, i32) {
        let shared = if self.rand != 0 {
            rng.rand_range(0, self.rand as i64) as i32
        } else {
            0
        };
        let chan = |base: i32, amp: i32| -> i32 {
            let draw = if amp != 0 {
                rng.rand_range(0, amp as i64) as i32
            } else {
                0
            };
            (base + draw + shared).clamp(-1000, 1000)
        };
        (
            chan(self.r, self.r_rand),
            chan(self.g, self.g_rand),
            chan(self.b, self.b_rand),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_color_has_no_jitter() {
        let c = Color::solid(100, 50, -50);
        let mut rng = CosmeticRng::new(1);
        assert_eq!(c.jittered(&mut rng), (100, 50, -50));
    }

    #[test]
    fn jitter_stays_in_bounds() {
        let c = Color {
            r: 900,
            g: -900,
            b: 0,
            r_rand: 500,
            g_rand: 500,
            b_rand: 500,
            rand: 200,
            color_dances: true,
        };
        let mut rng = CosmeticRng::new(3);
        for _ in 0..200 {
            let (r, g, b) = c.jittered(&mut rng);
            assert!((-1000..=1000).contains(&r));
            assert!((-1000..=1000).contains(&g));
            assert!((-1000..=1000).contains(&b));
        }
    }
}
