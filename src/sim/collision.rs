//! Landing detection and platform effects
//!
//! Only one-way landings exist: the ball can pass up through platforms and
//! comes to rest on their top surface when falling. Material effects run on
//! every tick the ball stays grounded on a platform.

use rand::Rng;

use super::archetype::Special;
use super::state::{Ball, DeathCause, GameEvent, GameState, Platform};
use crate::consts::*;

/// Index of the platform the ball lands on this tick
///
/// Platforms are checked in creation order and the first match wins. The
/// landing band extends [`LANDING_TOLERANCE`] below the platform top so fast
/// falls are not missed between ticks.
pub fn find_landing(ball: &Ball, platforms: &[Platform]) -> Option<usize> {
    if ball.vel.y < 0.0 {
        return None;
    }
    let bottom = ball.bottom();
    platforms.iter().position(|p| {
        !p.broken
            && p.overlaps_ball(ball)
            && bottom >= p.top()
            && bottom <= p.top() + LANDING_TOLERANCE
    })
}

/// Reset per-visit timers on platforms the ball is not standing on
fn reset_idle_platforms(platforms: &mut [Platform], standing: Option<usize>) {
    for (i, platform) in platforms.iter_mut().enumerate() {
        if Some(i) == standing {
            continue;
        }
        match platform.archetype.special() {
            Special::Spikes => {
                platform.dwell = 0.0;
                platform.spikes_up = false;
            }
            Special::Slippery => platform.dwell = 0.0,
            // Cracks in glass persist between visits
            Special::Breakable | Special::None => {}
        }
    }
}

/// Resolve the ball against the tower for one tick
///
/// Returns a death cause when a hazard killed the ball.
pub fn resolve(state: &mut GameState) -> Option<DeathCause> {
    state.ball.grounded = false;

    let landing = find_landing(&state.ball, &state.platforms);
    reset_idle_platforms(&mut state.platforms, landing);
    let index = landing?;

    let ball = &mut state.ball;
    let platform = &mut state.platforms[index];
    let mut events = Vec::new();

    ball.pos.y = platform.top() - ball.size.y / 2.0;
    ball.vel.y = 0.0;
    ball.grounded = true;

    if platform.archetype.special() == Special::Spikes {
        platform.dwell += SIM_DT;
        if platform.dwell > SPIKE_ARM_SECS && !platform.spikes_up {
            platform.spikes_up = true;
            events.push(GameEvent::SpikesArmed {
                platform_id: platform.id,
            });
        }
        if platform.dwell > SPIKE_KILL_SECS {
            state.events.extend(events);
            return Some(DeathCause::Spikes);
        }
    }

    if ball.bounce_anim <= 0.0 {
        ball.bounce_anim = 1.0;
    }

    if !platform.touched {
        platform.touched = true;
        let points = BASE_PLATFORM_SCORE + state.combo.bonus();
        state.score += points;
        events.push(GameEvent::PlatformScored {
            platform_id: platform.id,
            points,
        });
    }

    match platform.archetype.special() {
        Special::Slippery => {
            platform.dwell += SIM_DT;
            let intensity = (platform.dwell / SLIP_RAMP_SECS).min(1.0);
            let drift = state.rng.random::<f32>() - SLIP_BIAS;
            ball.vel.x += drift * SLIP_STRENGTH * intensity;
        }
        Special::Breakable => {
            platform.dwell += SIM_DT;
            if platform.dwell > GLASS_BREAK_SECS {
                platform.broken = true;
                ball.grounded = false;
                log::debug!("Glass platform {} shattered", platform.id);
                events.push(GameEvent::PlatformBroken {
                    platform_id: platform.id,
                });
            }
        }
        Special::Spikes => {}
        Special::None => platform.dwell = 0.0,
    }

    state.events.extend(events);
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::archetype::Archetype;
    use crate::sim::state::Viewport;
    use glam::Vec2;

    fn platform(id: u32, x: f32, y: f32, archetype: Archetype) -> Platform {
        Platform {
            id,
            pos: Vec2::new(x, y),
            size: Vec2::new(120.0, 25.0),
            archetype,
            touched: false,
            dwell: 0.0,
            broken: false,
            spikes_up: false,
            marker: None,
        }
    }

    fn state_with(platforms: Vec<Platform>) -> GameState {
        let mut state = GameState::new(11, Viewport::default());
        state.platforms = platforms;
        state
    }

    #[test]
    fn test_landing_band() {
        let p = [platform(1, 100.0, 500.0, Archetype::Stone)];
        let mut ball = Ball::new(Vec2::new(160.0, 500.0 - 24.0 + 10.0), 1.0);
        ball.vel.y = 5.0;
        assert_eq!(find_landing(&ball, &p), Some(0));

        // Beyond the tolerance band
        ball.pos.y = 500.0 - 24.0 + 19.0;
        assert_eq!(find_landing(&ball, &p), None);

        // Above the surface
        ball.pos.y = 500.0 - 24.0 - 1.0;
        assert_eq!(find_landing(&ball, &p), None);
    }

    #[test]
    fn test_rising_ball_passes_through() {
        let p = [platform(1, 100.0, 500.0, Archetype::Stone)];
        let mut ball = Ball::new(Vec2::new(160.0, 480.0), 1.0);
        ball.vel.y = -4.0;
        assert_eq!(find_landing(&ball, &p), None);
    }

    #[test]
    fn test_horizontal_overlap_is_strict() {
        let p = [platform(1, 100.0, 500.0, Archetype::Stone)];
        // Ball right edge exactly at platform left edge
        let ball = Ball::new(Vec2::new(76.0, 480.0), 1.0);
        assert_eq!(find_landing(&ball, &p), None);
    }

    #[test]
    fn test_first_match_wins() {
        let p = [
            platform(1, 100.0, 500.0, Archetype::Stone),
            platform(2, 100.0, 505.0, Archetype::Wood),
        ];
        let ball = Ball::new(Vec2::new(160.0, 500.0 - 24.0 + 8.0), 1.0);
        assert_eq!(find_landing(&ball, &p), Some(0));
    }

    #[test]
    fn test_landing_snaps_and_scores_once() {
        let mut state = state_with(vec![platform(1, 100.0, 500.0, Archetype::Stone)]);
        state.ball.pos = Vec2::new(160.0, 480.0);
        state.ball.vel.y = 6.0;

        assert_eq!(resolve(&mut state), None);
        assert!(state.ball.grounded);
        assert_eq!(state.ball.vel.y, 0.0);
        assert_eq!(state.ball.bottom(), 500.0);
        assert_eq!(state.ball.bounce_anim, 1.0);
        assert_eq!(state.score, 10);
        assert!(state.platforms[0].touched);

        state.ball.vel.y = 0.72;
        resolve(&mut state);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_bounce_not_rearmed_while_decaying() {
        let mut state = state_with(vec![platform(1, 100.0, 500.0, Archetype::Stone)]);
        state.ball.pos = Vec2::new(160.0, 480.0);
        state.ball.vel.y = 6.0;
        resolve(&mut state);
        assert_eq!(state.ball.bounce_anim, 1.0);

        state.ball.bounce_anim -= BOUNCE_ANIM_DECAY;
        state.ball.vel.y = GRAVITY;
        resolve(&mut state);
        assert!(state.ball.grounded);
        assert!(state.ball.bounce_anim < 1.0);

        // Fully decayed, so the next landing arms it again
        state.ball.bounce_anim = 0.0;
        state.ball.vel.y = GRAVITY;
        resolve(&mut state);
        assert_eq!(state.ball.bounce_anim, 1.0);
    }

    #[test]
    fn test_first_touch_pays_combo_bonus() {
        let mut state = state_with(vec![platform(1, 100.0, 500.0, Archetype::Stone)]);
        for t in [0.0, 100.0, 200.0, 300.0] {
            state.combo.register_jump(t);
        }
        state.ball.pos = Vec2::new(160.0, 478.0);
        resolve(&mut state);
        assert_eq!(state.score, 25);
        assert!(state.events.contains(&GameEvent::PlatformScored {
            platform_id: 1,
            points: 25
        }));
    }

    #[test]
    fn test_broken_platform_is_skipped() {
        let mut p = platform(1, 100.0, 500.0, Archetype::Glass);
        p.broken = true;
        let ball = Ball::new(Vec2::new(160.0, 480.0), 1.0);
        assert_eq!(find_landing(&ball, &[p]), None);
    }

    #[test]
    fn test_ice_drifts_ball() {
        let mut state = state_with(vec![platform(1, 0.0, 500.0, Archetype::Ice)]);
        state.ball.pos = Vec2::new(60.0, 476.0);
        let mut drift = 0.0;
        for _ in 0..120 {
            state.ball.vel = glam::Vec2::ZERO;
            resolve(&mut state);
            drift += state.ball.vel.x;
        }
        assert!(state.platforms[0].dwell > 0.0);
        // Biased toward +x
        assert!(drift > 0.0);
    }

    #[test]
    fn test_stone_resets_dwell() {
        let mut state = state_with(vec![platform(1, 100.0, 500.0, Archetype::Stone)]);
        state.platforms[0].dwell = 0.4;
        state.ball.pos = Vec2::new(160.0, 476.0);
        resolve(&mut state);
        assert_eq!(state.platforms[0].dwell, 0.0);
    }

    #[test]
    fn test_spike_timer_resets_when_leaving() {
        let mut state = state_with(vec![platform(1, 100.0, 500.0, Archetype::Metal)]);
        state.platforms[0].dwell = 0.5;
        state.platforms[0].spikes_up = true;
        state.ball.pos = Vec2::new(160.0, 300.0);
        resolve(&mut state);
        assert!(!state.ball.grounded);
        assert_eq!(state.platforms[0].dwell, 0.0);
        assert!(!state.platforms[0].spikes_up);
    }

    #[test]
    fn test_glass_cracks_persist_between_visits() {
        let mut state = state_with(vec![platform(1, 100.0, 500.0, Archetype::Glass)]);
        state.platforms[0].dwell = 0.3;
        state.ball.pos = Vec2::new(160.0, 300.0);
        resolve(&mut state);
        assert_eq!(state.platforms[0].dwell, 0.3);
    }
}
