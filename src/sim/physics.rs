//! Ball integration and jumping

use super::state::{Ball, GameEvent, GameState, Viewport};
use super::tick::TickInput;
use crate::consts::*;

/// Advance the ball one tick under input and gravity
///
/// Left wins when both directions are held. Releasing both lets the ball
/// slide to a stop instead of halting.
pub fn integrate(ball: &mut Ball, input: &TickInput, viewport: &Viewport) {
    if input.left {
        ball.vel.x = -MOVE_SPEED;
    } else if input.right {
        ball.vel.x = MOVE_SPEED;
    } else {
        ball.vel.x *= HORIZONTAL_DECAY;
    }

    ball.vel.y += GRAVITY;
    ball.pos += ball.vel;

    if ball.vel.x.abs() > ROTATION_MIN_SPEED {
        ball.rotation += ball.vel.x * ROTATION_FACTOR;
    }

    decay_animations(ball);

    let half = ball.half_width();
    if ball.pos.x < half {
        ball.pos.x = half;
        ball.vel.x = 0.0;
        ball.squash = 1.0;
    } else if ball.pos.x > viewport.width - half {
        ball.pos.x = viewport.width - half;
        ball.vel.x = 0.0;
        ball.squash = 1.0;
    }
}

fn decay_animations(ball: &mut Ball) {
    ball.squash = (ball.squash - WALL_SQUASH_DECAY).max(0.0);
    ball.jump_anim = (ball.jump_anim - JUMP_ANIM_DECAY).max(0.0);
    ball.bounce_anim = (ball.bounce_anim - BOUNCE_ANIM_DECAY).max(0.0);
}

/// Jump power multiplier of the platform under the ball (1 if none)
pub fn jump_modifier_under_ball(state: &GameState) -> f32 {
    state
        .platform_under_ball()
        .map_or(1.0, |p| p.archetype.jump_modifier())
}

/// Try a ground jump, falling back to the double jump
///
/// Returns `true` when a jump happened. A successful jump also advances the
/// combo streak and may start the camera.
pub fn jump(state: &mut GameState) -> bool {
    let modifier = jump_modifier_under_ball(state);
    let ball = &mut state.ball;

    let air = if ball.grounded {
        ball.grounded = false;
        ball.can_double_jump = true;
        false
    } else if ball.can_double_jump {
        ball.can_double_jump = false;
        true
    } else {
        return false;
    };

    ball.vel.y = BASE_JUMP_POWER * modifier;
    ball.jump_anim = 1.0;

    if !air && !state.scrolling {
        let threshold = state.viewport.height - SCROLL_START_OFFSET;
        if state.ball.pos.y < threshold {
            state.scrolling = true;
            log::info!("Tower started scrolling");
        }
    }

    state.emit(GameEvent::Jumped { air, modifier });

    let now = state.now_ms();
    if let Some(tier) = state.combo.register_jump(now) {
        log::debug!("Combo x{}: {}", state.combo.streak, tier.banner);
        state.emit(GameEvent::Combo {
            streak: state.combo.streak,
            bonus: tier.bonus,
            banner: tier.banner,
        });
    }

    true
}
