//! Procedural tower generation
//!
//! Platforms are stacked a fixed gap apart, each above the previous one,
//! with random width and horizontal offset.

use glam::Vec2;
use rand::Rng;

use super::archetype::Archetype;
use super::state::{GameState, Platform};
use crate::consts::*;

/// Create the next platform above the last placed one
///
/// Advances the platform counter and the placement cursor. The caller
/// decides where the platform goes (normally [`push_platform`]).
pub fn generate_platform(state: &mut GameState) -> Platform {
    state.platform_count += 1;
    let count = state.platform_count;

    let scale = state.viewport.scale;
    let width = (PLATFORM_MIN_WIDTH + state.rng.random::<f32>() * PLATFORM_WIDTH_RANGE) * scale;
    let x = state.rng.random::<f32>() * (state.viewport.width - width).max(0.0);
    let y = state.last_platform_y - PLATFORM_GAP;
    state.last_platform_y = y;

    let archetype = Archetype::for_platform(count);
    let marker = (count % MARKER_INTERVAL == 0).then_some(count);

    if marker.is_some() {
        log::debug!("Checkpoint platform {} ({})", count, archetype.name());
    }

    Platform {
        id: state.next_entity_id(),
        pos: Vec2::new(x, y),
        size: Vec2::new(width, PLATFORM_HEIGHT * scale),
        archetype,
        touched: false,
        dwell: 0.0,
        broken: false,
        spikes_up: false,
        marker,
    }
}

/// Generate the next platform and append it to the tower
pub fn push_platform(state: &mut GameState) {
    let platform = generate_platform(state);
    state.platforms.push(platform);
}

/// Full-width stone floor the ball starts on
pub fn ground_platform(state: &mut GameState) -> Platform {
    let viewport = state.viewport;
    Platform {
        id: state.next_entity_id(),
        pos: Vec2::new(0.0, viewport.height - GROUND_OFFSET),
        size: Vec2::new(viewport.width, PLATFORM_HEIGHT * viewport.scale),
        archetype: Archetype::Stone,
        touched: false,
        dwell: 0.0,
        broken: false,
        spikes_up: false,
        marker: None,
    }
}

/// Lay the ground and the initial run of platforms
pub fn seed_tower(state: &mut GameState) {
    let ground = ground_platform(state);
    state.platforms.push(ground);
    for _ in 0..INITIAL_PLATFORMS {
        push_platform(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;

    #[test]
    fn test_platforms_stack_upward() {
        let mut state = GameState::new(42, Viewport::default());
        seed_tower(&mut state);
        assert_eq!(state.platforms.len(), 16);
        assert_eq!(state.platform_count, 15);

        // First generated platform sits one gap above the cursor start
        assert_eq!(state.platforms[1].pos.y, 960.0 - 200.0 - 120.0);
        for pair in state.platforms.windows(2) {
            assert!(pair[1].pos.y < pair[0].pos.y);
        }
        assert_eq!(state.last_platform_y, state.platforms[15].pos.y);
    }

    #[test]
    fn test_geometry_within_bounds() {
        let mut state = GameState::new(3, Viewport::default());
        for _ in 0..300 {
            let p = generate_platform(&mut state);
            assert!(p.size.x >= 80.0 && p.size.x < 140.0);
            assert!(p.pos.x >= 0.0);
            assert!(p.right() <= 720.0 + 1e-3);
            assert_eq!(p.size.y, 25.0);
        }
    }

    #[test]
    fn test_markers_every_tenth() {
        let mut state = GameState::new(5, Viewport::default());
        let platforms: Vec<_> = (0..30).map(|_| generate_platform(&mut state)).collect();
        let markers: Vec<u32> = platforms.iter().filter_map(|p| p.marker).collect();
        assert_eq!(markers, vec![10, 20, 30]);
    }

    #[test]
    fn test_archetype_follows_count() {
        let mut state = GameState::new(5, Viewport::default());
        state.platform_count = 249;
        assert_eq!(generate_platform(&mut state).archetype, Archetype::Ice);
        state.platform_count = 499;
        assert_eq!(generate_platform(&mut state).archetype, Archetype::Stone);
    }

    #[test]
    fn test_scale_shrinks_geometry() {
        let viewport = Viewport {
            width: 400.0,
            height: 700.0,
            scale: 0.7,
        };
        let mut state = GameState::new(9, viewport);
        let p = generate_platform(&mut state);
        assert!(p.size.x < 140.0 * 0.7);
        assert!((p.size.y - 17.5).abs() < 1e-4);
        let ground = ground_platform(&mut state);
        assert_eq!(ground.size.x, 400.0);
        assert_eq!(ground.pos.y, 480.0);
    }
}
