//! Decorative title-screen ball
//!
//! Runs only while the session is in the menu. Every so often a ball flies in
//! from the left, bounces along the title a couple of times, then speeds off
//! to the right. It never touches [`GameState`](super::GameState).

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::BALL_SIZE;

/// Frames spent waiting between passes
pub const MENU_WAIT_FRAMES: u32 = 120;
pub const MENU_GRAVITY: f32 = 0.6;
pub const MENU_RESTITUTION: f32 = 0.7;
pub const MENU_SQUASH_DECAY: f32 = 0.15;
pub const MENU_ENTRY_SPEED: f32 = 8.0;
pub const MENU_EXIT_SPEED: f32 = 12.0;
/// Entry height above the title
pub const MENU_ENTRY_RISE: f32 = 150.0;
/// Extra depth below the title text still counted as a bounce
pub const MENU_BOUNCE_SLACK: f32 = 20.0;

/// Geometry the menu ball bounces within
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuBounds {
    pub width: f32,
    pub ball_size: f32,
    /// y of the title's top edge
    pub title_y: f32,
    pub title_height: f32,
}

impl MenuBounds {
    pub fn new(width: f32, height: f32, scale: f32, title_height: f32) -> Self {
        Self {
            width,
            ball_size: BALL_SIZE * scale,
            title_y: height * 0.4,
            title_height,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MenuBall {
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub squash: f32,
    /// Hidden while waiting
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuPhase {
    Waiting { frames: u32 },
    Animating { bounces: u32, bounce_limit: u32 },
}

/// Title-screen ball state machine, stepped once per frame
#[derive(Debug, Clone)]
pub struct MenuAnimation {
    pub ball: MenuBall,
    pub bounds: MenuBounds,
    phase: MenuPhase,
    rng: Pcg32,
}

impl MenuAnimation {
    pub fn new(bounds: MenuBounds, seed: u64) -> Self {
        Self {
            ball: MenuBall::default(),
            bounds,
            phase: MenuPhase::Waiting { frames: 0 },
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Go back to waiting with the ball hidden
    pub fn reset(&mut self) {
        self.ball.active = false;
        self.phase = MenuPhase::Waiting { frames: 0 };
    }

    pub fn set_bounds(&mut self, bounds: MenuBounds) {
        self.bounds = bounds;
    }

    #[cfg(test)]
    fn is_waiting(&self) -> bool {
        matches!(self.phase, MenuPhase::Waiting { .. })
    }

    pub fn step(&mut self) {
        match self.phase {
            MenuPhase::Waiting { frames } => {
                let frames = frames + 1;
                if frames >= MENU_WAIT_FRAMES {
                    self.enter();
                } else {
                    self.phase = MenuPhase::Waiting { frames };
                }
            }
            MenuPhase::Animating {
                bounces,
                bounce_limit,
            } => self.animate(bounces, bounce_limit),
        }
    }

    fn enter(&mut self) {
        let b = self.bounds;
        self.ball = MenuBall {
            pos: Vec2::new(-b.ball_size, b.title_y - MENU_ENTRY_RISE),
            vel: Vec2::new(MENU_ENTRY_SPEED, 2.0),
            rotation: 0.0,
            squash: 0.0,
            active: true,
        };
        // Two or three bounces before speeding off
        let bounce_limit = self.rng.random_range(2..=3);
        self.phase = MenuPhase::Animating {
            bounces: 0,
            bounce_limit,
        };
    }

    fn animate(&mut self, mut bounces: u32, bounce_limit: u32) {
        let b = self.bounds;
        let ball = &mut self.ball;

        ball.vel.y += MENU_GRAVITY;
        ball.pos += ball.vel;
        ball.rotation += ball.vel.x * 0.05;
        ball.squash = (ball.squash - MENU_SQUASH_DECAY).max(0.0);

        let bottom = ball.pos.y + b.ball_size / 2.0;
        if ball.vel.y > 0.0
            && bottom >= b.title_y
            && bottom <= b.title_y + b.title_height + MENU_BOUNCE_SLACK
        {
            ball.pos.y = b.title_y - b.ball_size / 2.0;
            ball.vel.y = -ball.vel.y.abs() * MENU_RESTITUTION;
            ball.squash = 1.0;
            bounces += 1;
            if bounces >= bounce_limit {
                ball.vel.x = MENU_EXIT_SPEED;
            }
        }

        if ball.pos.x > b.width + b.ball_size {
            ball.active = false;
            self.phase = MenuPhase::Waiting { frames: 0 };
        } else {
            self.phase = MenuPhase::Animating {
                bounces,
                bounce_limit,
            };
        }
    }
}
