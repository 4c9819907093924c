//! Game state and core simulation types
//!
//! Everything a session mutates lives in [`GameState`]; each subsystem is a
//! function over it, so there is no hidden global state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::archetype::Archetype;
use super::combo::ComboTracker;
use crate::consts::*;
use crate::highscores::HighScore;
use crate::ticks_to_ms;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, decorative ball animation running
    Menu,
    /// Active gameplay
    Playing,
    /// Death burst playing out; gameplay frozen
    Dying,
    /// Run ended
    GameOver,
}

/// Why the ball died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Dropped below the bottom of the viewport
    FellBelow,
    /// Left the viewport through the top
    FlewAbove,
    /// Stood on armed metal spikes too long
    Spikes,
}

/// Notifications for the presentation layer (audio, HUD)
///
/// Drained by the frontend after each frame; never read back by the sim.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    SessionStarted,
    Jumped { air: bool, modifier: f32 },
    PlatformScored { platform_id: u32, points: u64 },
    Combo { streak: u32, bonus: u64, banner: &'static str },
    SpikesArmed { platform_id: u32 },
    PlatformBroken { platform_id: u32 },
    Died { cause: DeathCause },
    GameOver { score: u64, new_best: bool },
}

/// Size of the playfield in world units plus the global geometry scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 720.0,
            height: 960.0,
            scale: 1.0,
        }
    }
}

/// The player's ball. `pos` is the centre; y grows downward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Cosmetic spin (radians), driven by horizontal speed
    pub rotation: f32,
    pub grounded: bool,
    pub can_double_jump: bool,
    /// Wall-impact flattening (1 on impact, decays to 0)
    pub squash: f32,
    /// Take-off stretch (1 on jump, decays to 0)
    pub jump_anim: f32,
    /// Landing squash (1 on landing, decays to 0)
    pub bounce_anim: f32,
}

impl Ball {
    pub fn new(pos: Vec2, scale: f32) -> Self {
        let size = BALL_SIZE * scale;
        Self {
            pos,
            vel: Vec2::ZERO,
            size: Vec2::splat(size),
            rotation: 0.0,
            grounded: false,
            can_double_jump: false,
            squash: 0.0,
            jump_anim: 0.0,
            bounce_anim: 0.0,
        }
    }

    pub fn half_width(&self) -> f32 {
        self.size.x / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y / 2.0
    }

    pub fn left(&self) -> f32 {
        self.pos.x - self.size.x / 2.0
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }
}

/// A platform. `pos` is the top-left corner in world space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub archetype: Archetype,
    /// Set on first landing; gates scoring
    pub touched: bool,
    /// Seconds of dwell: ice drift ramp, glass break countdown or spike timer
    pub dwell: f32,
    /// Broken platforms take no part in collision
    pub broken: bool,
    /// Metal spikes extended
    pub spikes_up: bool,
    /// Checkpoint ordinal shown under every 10th platform
    pub marker: Option<u32>,
}

impl Platform {
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    /// Strict overlap of the horizontal extents with the ball
    pub fn overlaps_ball(&self, ball: &Ball) -> bool {
        ball.right() > self.left() && ball.left() < self.right()
    }
}

/// A death-burst particle (visual only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Hue in degrees
    pub hue: f32,
    /// 1 at spawn, removed at 0
    pub life: f32,
}

impl Particle {
    pub fn step(&mut self) {
        self.pos += self.vel;
        self.vel.y += PARTICLE_GRAVITY;
        self.life -= PARTICLE_DECAY;
    }
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub viewport: Viewport,
    pub ball: Ball,
    /// Platforms in creation order (bottom to top)
    pub platforms: Vec<Platform>,
    #[serde(skip)]
    pub particles: Vec<Particle>,
    /// Subtracted from world y to get screen y; only ever decreases
    pub camera: f32,
    pub scroll_speed: f32,
    /// Camera moves only once the player has climbed off the ground
    pub scrolling: bool,
    /// Platforms generated this session
    pub platform_count: u32,
    /// y of the most recently generated platform
    pub last_platform_y: f32,
    pub score: u64,
    pub combo: ComboTracker,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Tick at which `Dying` began
    pub dying_since_tick: Option<u64>,
    /// Best score across sessions (in memory only)
    pub high_score: HighScore,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a state sitting in the menu
    pub fn new(seed: u64, viewport: Viewport) -> Self {
        let ball_start = Vec2::new(
            viewport.width / 3.0,
            viewport.height - BALL_START_OFFSET,
        );
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            viewport,
            ball: Ball::new(ball_start, viewport.scale),
            platforms: Vec::new(),
            particles: Vec::new(),
            camera: 0.0,
            scroll_speed: BASE_SCROLL_SPEED,
            scrolling: false,
            platform_count: 0,
            last_platform_y: viewport.height - PLATFORM_CURSOR_OFFSET,
            score: 0,
            combo: ComboTracker::default(),
            time_ticks: 0,
            dying_since_tick: None,
            high_score: HighScore::default(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Simulated milliseconds since the session started
    pub fn now_ms(&self) -> f64 {
        ticks_to_ms(self.time_ticks)
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Project a world y onto the screen
    pub fn screen_y(&self, world_y: f32) -> f32 {
        world_y - self.camera
    }

    /// Archetype of the tier the generator is currently producing
    pub fn current_archetype(&self) -> Archetype {
        Archetype::for_platform(self.platform_count)
    }

    /// Resize the playfield; geometry already placed is kept as is
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.viewport != viewport {
            log::info!(
                "Viewport {}x{} scale {}",
                viewport.width,
                viewport.height,
                viewport.scale
            );
            self.viewport = viewport;
        }
    }

    /// Platform the ball is standing in, if any
    ///
    /// The ball's bottom edge must lie within the platform's thickness and
    /// the extents must overlap. Earlier platforms win.
    pub fn platform_under_ball(&self) -> Option<&Platform> {
        let bottom = self.ball.bottom();
        self.platforms.iter().find(|p| {
            !p.broken
                && bottom >= p.top()
                && bottom <= p.top() + p.size.y
                && p.overlaps_ball(&self.ball)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_menu() {
        let state = GameState::new(7, Viewport::default());
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.platforms.is_empty());
        assert_eq!(state.ball.size, Vec2::splat(48.0));
        assert_eq!(state.ball.pos, Vec2::new(240.0, 710.0));
    }

    #[test]
    fn test_ball_scales_with_viewport() {
        let viewport = Viewport {
            width: 400.0,
            height: 700.0,
            scale: 0.7,
        };
        let state = GameState::new(7, viewport);
        assert!((state.ball.size.x - 33.6).abs() < 1e-4);
    }

    #[test]
    fn test_particle_life_decreases() {
        let mut p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, -2.0),
            hue: 0.0,
            life: 1.0,
        };
        p.step();
        assert_eq!(p.pos, Vec2::new(1.0, -2.0));
        assert!((p.vel.y - (-1.7)).abs() < 1e-6);
        assert!(p.life < 1.0);
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut state = GameState::new(1, Viewport::default());
        state.emit(GameEvent::SessionStarted);
        assert_eq!(state.drain_events(), vec![GameEvent::SessionStarted]);
        assert!(state.drain_events().is_empty());
    }
}
