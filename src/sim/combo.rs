//! Combo streaks and the transient praise banner
//!
//! A streak counts consecutive jumps each within [`COMBO_WINDOW_MS`] of the
//! previous one. Longer streaks map to a score bonus (paid out on the next
//! first-touch landing) and a banner that disappears after [`BANNER_MS`].

use serde::{Deserialize, Serialize};

use crate::consts::{BANNER_MS, COMBO_WINDOW_MS};

/// One rung of the streak ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComboTier {
    pub min_streak: u32,
    pub bonus: u64,
    pub banner: &'static str,
}

/// Streak ladder, highest first
pub const COMBO_TIERS: [ComboTier; 4] = [
    ComboTier {
        min_streak: 6,
        bonus: 60,
        banner: "AMAZING!",
    },
    ComboTier {
        min_streak: 5,
        bonus: 30,
        banner: "GREAT!",
    },
    ComboTier {
        min_streak: 4,
        bonus: 15,
        banner: "VERY GOOD!",
    },
    ComboTier {
        min_streak: 3,
        bonus: 10,
        banner: "GOOD!",
    },
];

/// First tier the streak qualifies for
pub fn tier_for_streak(streak: u32) -> Option<&'static ComboTier> {
    COMBO_TIERS.iter().find(|t| streak >= t.min_streak)
}

pub fn bonus_for_streak(streak: u32) -> u64 {
    tier_for_streak(streak).map_or(0, |t| t.bonus)
}

/// Banner text with its expiry in simulated time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub text: String,
    pub expires_at_ms: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComboTracker {
    /// Consecutive jumps inside the window
    pub streak: u32,
    pub last_jump_ms: Option<f64>,
    /// Streak shown on the HUD; updated whenever a tier is reached
    pub display: u32,
    pub banner: Option<Banner>,
}

impl ComboTracker {
    /// Record a successful jump at `now_ms`
    ///
    /// Returns the tier reached, if any. Reaching a tier (re)arms the banner.
    pub fn register_jump(&mut self, now_ms: f64) -> Option<&'static ComboTier> {
        self.streak = match self.last_jump_ms {
            Some(last) if now_ms - last < COMBO_WINDOW_MS => self.streak + 1,
            _ => 1,
        };
        self.last_jump_ms = Some(now_ms);

        let tier = tier_for_streak(self.streak)?;
        self.display = self.streak;
        self.banner = Some(Banner {
            text: tier.banner.to_string(),
            expires_at_ms: now_ms + BANNER_MS,
        });
        Some(tier)
    }

    /// Bonus for the current streak
    pub fn bonus(&self) -> u64 {
        bonus_for_streak(self.streak)
    }

    /// Drop the banner once its time is up
    pub fn expire_banner(&mut self, now_ms: f64) {
        if self
            .banner
            .as_ref()
            .is_some_and(|b| now_ms >= b.expires_at_ms)
        {
            self.banner = None;
        }
    }

    pub fn banner_text(&self) -> Option<&str> {
        self.banner.as_ref().map(|b| b.text.as_str())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
