//! Platform archetypes (materials)
//!
//! The tower cycles through a fixed palette of materials, one per
//! 100-platform tier. Each material sets the jump power and an optional
//! special behaviour resolved by the collision pass.

use serde::{Deserialize, Serialize};

use crate::consts::PLATFORMS_PER_TIER;

/// Platform material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Stone,
    Wood,
    Ice,
    Metal,
    Glass,
}

/// Special behaviour attached to an archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Special {
    None,
    /// Lateral drift while standing on it
    Slippery,
    /// Spikes arm and then kill after a continuous dwell
    Spikes,
    /// Shatters after a dwell threshold
    Breakable,
}

impl Archetype {
    /// Palette order; the tower walks it one tier at a time and wraps
    pub const PALETTE: [Archetype; 5] = [
        Archetype::Stone,
        Archetype::Wood,
        Archetype::Ice,
        Archetype::Metal,
        Archetype::Glass,
    ];

    /// Archetype for the platform with the given ordinal
    pub fn for_platform(count: u32) -> Self {
        let tier = (count / PLATFORMS_PER_TIER) as usize;
        Self::PALETTE[tier % Self::PALETTE.len()]
    }

    /// Multiplier applied to the base jump power when jumping off this material
    pub fn jump_modifier(self) -> f32 {
        match self {
            Archetype::Stone => 1.0,
            Archetype::Wood => 0.85,
            Archetype::Ice => 0.9,
            Archetype::Metal => 1.5,
            Archetype::Glass => 1.2,
        }
    }

    pub fn special(self) -> Special {
        match self {
            Archetype::Ice => Special::Slippery,
            Archetype::Metal => Special::Spikes,
            Archetype::Glass => Special::Breakable,
            Archetype::Stone | Archetype::Wood => Special::None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Archetype::Stone => "stone",
            Archetype::Wood => "wood",
            Archetype::Ice => "ice",
            Archetype::Metal => "metal",
            Archetype::Glass => "glass",
        }
    }

    /// HUD readout for the current tier, e.g. `Platform: STONE`
    pub fn hud_label(self) -> String {
        format!("Platform: {}", self.name().to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_palette_cycles_every_hundred() {
        assert_eq!(Archetype::for_platform(0), Archetype::Stone);
        assert_eq!(Archetype::for_platform(99), Archetype::Stone);
        assert_eq!(Archetype::for_platform(100), Archetype::Wood);
        assert_eq!(Archetype::for_platform(250), Archetype::Ice);
        assert_eq!(Archetype::for_platform(399), Archetype::Metal);
        assert_eq!(Archetype::for_platform(450), Archetype::Glass);
        assert_eq!(Archetype::for_platform(500), Archetype::Stone);
    }

    #[test]
    fn test_specials() {
        assert_eq!(Archetype::Ice.special(), Special::Slippery);
        assert_eq!(Archetype::Metal.special(), Special::Spikes);
        assert_eq!(Archetype::Glass.special(), Special::Breakable);
        assert_eq!(Archetype::Wood.special(), Special::None);
        assert!(Archetype::Metal.jump_modifier() > Archetype::Stone.jump_modifier());
    }

    #[test]
    fn test_hud_label() {
        assert_eq!(Archetype::Stone.hud_label(), "Platform: STONE");
        assert_eq!(Archetype::for_platform(250).hud_label(), "Platform: ICE");
    }

    proptest! {
        #[test]
        fn prop_archetype_depends_only_on_tier(count in 0u32..1_000_000) {
            let tier = (count / 100) as usize % 5;
            prop_assert_eq!(Archetype::for_platform(count), Archetype::PALETTE[tier]);
        }
    }
}
