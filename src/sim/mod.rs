//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (platforms in creation order)
//! - No rendering or platform dependencies

pub mod archetype;
pub mod collision;
pub mod combo;
pub mod generator;
pub mod menu;
pub mod physics;
pub mod scroll;
pub mod state;
pub mod tick;

pub use archetype::{Archetype, Special};
pub use combo::{Banner, COMBO_TIERS, ComboTier, ComboTracker};
pub use menu::{MenuAnimation, MenuBall, MenuBounds};
pub use state::{
    Ball, DeathCause, GameEvent, GamePhase, GameState, Particle, Platform, Viewport,
};
pub use tick::{TickInput, kill, return_to_menu, start_session, tick};
