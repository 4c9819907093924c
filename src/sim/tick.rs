//! Fixed timestep simulation tick
//!
//! Drives the session state machine:
//! `Menu -> Playing -> Dying -> GameOver -> (Playing | Menu)`.
//! Each call to [`tick`] is atomic with respect to game state.

use glam::Vec2;
use rand::Rng;

use super::generator::seed_tower;
use super::state::{Ball, DeathCause, GameEvent, GamePhase, GameState, Particle};
use super::{collision, physics, scroll};
use crate::consts::*;
use crate::ms_to_ticks;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move left held
    pub left: bool,
    /// Move right held
    pub right: bool,
    /// Jump pressed since the last tick
    pub jump: bool,
    /// Start (or restart) a session from the menu or game-over screen
    pub start: bool,
    /// Leave the game-over screen for the menu
    pub menu: bool,
}

/// Reset every per-session field and lay a fresh tower
///
/// The seed, RNG stream, viewport and high score carry over. Pending
/// timers (banner, dying delay) are dropped with the old session.
pub fn start_session(state: &mut GameState) {
    let viewport = state.viewport;
    state.ball = Ball::new(
        Vec2::new(viewport.width / 3.0, viewport.height - BALL_START_OFFSET),
        viewport.scale,
    );
    state.platforms.clear();
    state.particles.clear();
    state.events.clear();
    state.camera = 0.0;
    state.scroll_speed = BASE_SCROLL_SPEED;
    state.scrolling = false;
    state.platform_count = 0;
    state.last_platform_y = viewport.height - PLATFORM_CURSOR_OFFSET;
    state.score = 0;
    state.combo.reset();
    state.time_ticks = 0;
    state.dying_since_tick = None;

    seed_tower(state);

    state.phase = GamePhase::Playing;
    state.emit(GameEvent::SessionStarted);
    log::info!(
        "Session started ({} platforms, best {})",
        state.platforms.len(),
        state.high_score.best()
    );
}

/// Back to the title screen
pub fn return_to_menu(state: &mut GameState) {
    state.phase = GamePhase::Menu;
    state.particles.clear();
    state.dying_since_tick = None;
    log::info!("Returned to menu");
}

/// End the run: burst the ball into particles and start the dying delay
pub fn kill(state: &mut GameState, cause: DeathCause) {
    let origin = state.ball.pos;
    for _ in 0..DEATH_PARTICLES {
        let vx = (state.rng.random::<f32>() - 0.5) * PARTICLE_SPREAD;
        let vy = (state.rng.random::<f32>() - 0.5) * PARTICLE_SPREAD - PARTICLE_LIFT;
        let hue = state.rng.random::<f32>() * 360.0;
        state.particles.push(Particle {
            pos: origin,
            vel: Vec2::new(vx, vy),
            hue,
            life: 1.0,
        });
    }

    state.phase = GamePhase::Dying;
    state.dying_since_tick = Some(state.time_ticks);
    state.emit(GameEvent::Died { cause });
    log::info!("Ball died ({:?}) with score {}", cause, state.score);
}

/// Commit the score and enter `GameOver`
fn finish_run(state: &mut GameState) {
    let score = state.score;
    let new_best = state.high_score.submit(score);
    state.phase = GamePhase::GameOver;
    state.dying_since_tick = None;
    state.emit(GameEvent::GameOver { score, new_best });
    if new_best {
        log::info!("New best score: {}", score);
    }
}

fn step_particles(state: &mut GameState) {
    for particle in state.particles.iter_mut() {
        particle.step();
    }
    state.particles.retain(|p| p.life > 0.0);
}

/// Ball left the visible band of the tower
fn out_of_bounds(state: &GameState) -> Option<DeathCause> {
    let y = state.screen_y(state.ball.pos.y);
    if y > state.viewport.height {
        Some(DeathCause::FellBelow)
    } else if y < -UPPER_DEATH_MARGIN {
        Some(DeathCause::FlewAbove)
    } else {
        None
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    match state.phase {
        GamePhase::Menu | GamePhase::GameOver => {
            if input.start {
                start_session(state);
            } else if input.menu && state.phase == GamePhase::GameOver {
                return_to_menu(state);
            }
        }

        GamePhase::Dying => {
            state.time_ticks += 1;
            let now = state.now_ms();
            state.combo.expire_banner(now);
            step_particles(state);

            let since = state.dying_since_tick.unwrap_or(state.time_ticks);
            if state.time_ticks - since >= ms_to_ticks(DYING_MS) {
                finish_run(state);
            }
        }

        GamePhase::Playing => {
            state.time_ticks += 1;
            let now = state.now_ms();
            state.combo.expire_banner(now);
            step_particles(state);

            if input.jump {
                physics::jump(state);
            }

            physics::integrate(&mut state.ball, input, &state.viewport);

            if let Some(cause) = collision::resolve(state) {
                kill(state, cause);
                return;
            }

            scroll::advance_camera(state);
            scroll::stream_platforms(state);

            if let Some(cause) = out_of_bounds(state) {
                kill(state, cause);
            }
        }
    }
}
