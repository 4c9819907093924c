//! Camera scrolling and platform streaming

use super::generator::push_platform;
use super::state::GameState;
use crate::consts::*;

/// Scroll speed for the tier reached by `platform_count`
///
/// Grows by [`SCROLL_TIER_GROWTH`] every [`PLATFORMS_PER_TIER`] platforms, in
/// steps rather than continuously.
pub fn scroll_speed_for(platform_count: u32) -> f32 {
    let tier = (platform_count / PLATFORMS_PER_TIER) as i32;
    BASE_SCROLL_SPEED * SCROLL_TIER_GROWTH.powi(tier)
}

/// Move the camera up, once scrolling has started
pub fn advance_camera(state: &mut GameState) {
    if !state.scrolling {
        return;
    }
    let speed = scroll_speed_for(state.platform_count);
    if speed != state.scroll_speed {
        log::info!("Scroll speed now {:.2}", speed);
    }
    state.scroll_speed = speed;
    state.camera -= speed;
}

/// Keep the tower filled above the viewport and drop what fell below it
pub fn stream_platforms(state: &mut GameState) {
    while state.screen_y(state.last_platform_y) > -STREAM_AHEAD_MARGIN {
        push_platform(state);
    }

    let cutoff = state.viewport.height + EVICT_MARGIN;
    let camera = state.camera;
    state.platforms.retain(|p| p.pos.y - camera < cutoff);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::generator::seed_tower;
    use crate::sim::state::Viewport;

    #[test]
    fn test_speed_steps_per_tier() {
        assert_eq!(scroll_speed_for(0), 3.0);
        assert_eq!(scroll_speed_for(99), 3.0);
        assert!((scroll_speed_for(100) - 3.6).abs() < 1e-5);
        assert!((scroll_speed_for(250) - 4.32).abs() < 1e-5);
    }

    #[test]
    fn test_camera_waits_for_start() {
        let mut state = GameState::new(1, Viewport::default());
        advance_camera(&mut state);
        assert_eq!(state.camera, 0.0);

        state.scrolling = true;
        advance_camera(&mut state);
        advance_camera(&mut state);
        assert_eq!(state.camera, -6.0);
    }

    #[test]
    fn test_streaming_generates_ahead() {
        let mut state = GameState::new(1, Viewport::default());
        seed_tower(&mut state);
        let before = state.platforms.len();

        // Not close to the top yet: nothing new
        stream_platforms(&mut state);
        assert_eq!(state.platforms.len(), before);

        // Camera catches up with the topmost platform
        state.camera = state.last_platform_y + 150.0;
        let count = state.platform_count;
        stream_platforms(&mut state);
        assert_eq!(state.platform_count, count + 1);
        assert!(state.screen_y(state.last_platform_y) <= -STREAM_AHEAD_MARGIN);
    }

    #[test]
    fn test_eviction_below_viewport() {
        let mut state = GameState::new(1, Viewport::default());
        seed_tower(&mut state);
        // Ground is at 740; pushing the camera up by 400 leaves it 1140 on screen
        state.camera = -400.0;
        stream_platforms(&mut state);
        assert!(state.platforms.iter().all(|p| p.pos.y - state.camera < 1060.0));
        assert_ne!(state.platforms[0].pos.y, 740.0);
    }
}
