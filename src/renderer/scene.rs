//! Scene building: game state to triangles
//!
//! Pure function of the simulation state, so it can be tested without a GPU.
//! Output is in playfield pixels with the camera already applied.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::Settings;
use crate::consts::{GLASS_CRACK_SECS, MARKER_BOX_SIZE};
use crate::sim::{Archetype, Ball, GamePhase, GameState, MenuAnimation, Platform};

const BALL_SEGMENTS: u32 = 32;
const SPIKE_WIDTH: f32 = 12.0;
const SPIKE_HEIGHT: f32 = 14.0;
const PARTICLE_SIZE: f32 = 6.0;
const OUTLINE_WIDTH: f32 = 2.0;
/// Gap between a platform and its checkpoint box
const MARKER_OFFSET: f32 = 8.0;

/// Drawn size of the ball after squash, take-off stretch and landing squash
pub fn ball_extent(ball: &Ball, animate: bool) -> Vec2 {
    let base = ball.size;
    if !animate {
        return base;
    }
    if ball.jump_anim > 0.0 {
        let t = 1.0 - ball.jump_anim;
        Vec2::new(
            base.x * 0.69 + base.x * 0.17 * t,
            base.y * 1.31 - base.y * 0.17 * t,
        )
    } else if ball.bounce_anim > 0.0 {
        Vec2::new(
            base.x * (1.0 + 0.17 * ball.bounce_anim),
            base.y * (1.0 - 0.17 * ball.bounce_anim),
        )
    } else if ball.squash > 0.0 {
        Vec2::new(base.x * 0.4, base.y * 1.6)
    } else {
        base
    }
}

/// Build the full frame
pub fn build_scene(
    state: &GameState,
    menu: Option<&MenuAnimation>,
    settings: &Settings,
) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(4096);
    let viewport = state.viewport;

    shapes::gradient_rect(
        &mut out,
        Vec2::ZERO,
        Vec2::new(viewport.width, viewport.height),
        colors::BACKGROUND_TOP,
        colors::BACKGROUND_BOTTOM,
    );

    if state.phase == GamePhase::Menu {
        if let Some(menu) = menu.filter(|m| m.ball.active) {
            let ball = &menu.ball;
            let size = menu.bounds.ball_size;
            let extent = if ball.squash > 0.0 && settings.effective_ball_animation() {
                Vec2::new(size * (1.0 + 0.3 * ball.squash), size * (1.0 - 0.3 * ball.squash))
            } else {
                Vec2::splat(size)
            };
            draw_ball_body(&mut out, ball.pos, extent, ball.rotation);
        }
        return out;
    }

    for platform in state.platforms.iter().filter(|p| !p.broken) {
        let y = state.screen_y(platform.top());
        // Skip anything fully off screen
        if y > viewport.height || y + platform.size.y + MARKER_BOX_SIZE * 2.0 < 0.0 {
            continue;
        }
        draw_platform(&mut out, platform, y, viewport.scale);
    }

    if state.phase == GamePhase::Playing {
        draw_ball(&mut out, state, settings);
    }

    if settings.particles {
        for particle in &state.particles {
            let pos = Vec2::new(particle.pos.x, state.screen_y(particle.pos.y));
            let half = PARTICLE_SIZE / 2.0;
            shapes::rect(
                &mut out,
                pos - Vec2::splat(half),
                Vec2::splat(PARTICLE_SIZE),
                colors::hsl(particle.hue, 0.8, 0.6, particle.life.clamp(0.0, 1.0)),
            );
        }
    }

    out
}

fn draw_platform(out: &mut Vec<Vertex>, platform: &Platform, y: f32, scale: f32) {
    let pos = Vec2::new(platform.left(), y);
    let size = platform.size;
    shapes::rect(out, pos, size, colors::archetype(platform.archetype));

    if platform.spikes_up {
        let count = (size.x / SPIKE_WIDTH).floor() as u32;
        for i in 0..count {
            let sx = pos.x + i as f32 * SPIKE_WIDTH;
            shapes::triangle(
                out,
                Vec2::new(sx, y),
                Vec2::new(sx + SPIKE_WIDTH / 2.0, y - SPIKE_HEIGHT),
                Vec2::new(sx + SPIKE_WIDTH, y),
                colors::SPIKE,
            );
        }
    }

    match platform.archetype {
        Archetype::Stone => {
            // Speckles are keyed by id so they stay put between frames
            let mut rng = Pcg32::seed_from_u64(platform.id as u64);
            for _ in 0..(size.x / 2.4) as u32 {
                let px = pos.x + rng.random::<f32>() * (size.x - 4.0).max(0.0);
                let py = y + rng.random::<f32>() * (size.y - 4.0).max(0.0);
                shapes::rect(out, Vec2::new(px, py), Vec2::splat(4.0), colors::STONE_SPECK);
            }
        }
        Archetype::Wood => {
            for i in 1..=3 {
                let line_y = y + i as f32 * size.y / 4.0;
                shapes::line(
                    out,
                    Vec2::new(pos.x, line_y),
                    Vec2::new(pos.x + size.x, line_y),
                    1.0,
                    colors::WOOD_GRAIN,
                );
            }
            let mut rng = Pcg32::seed_from_u64(platform.id as u64);
            for i in 0..(size.x / 63.0).ceil() as u32 {
                let kx = pos.x + (i as f32 + 0.5) * 40.0 + (rng.random::<f32>() - 0.5) * 20.0;
                shapes::ellipse(
                    out,
                    Vec2::new(kx, y + size.y / 2.0),
                    Vec2::new(3.0, 2.0),
                    0.0,
                    colors::WOOD_KNOT,
                    colors::WOOD_KNOT,
                    8,
                );
            }
        }
        Archetype::Ice => {
            shapes::gradient_rect(out, pos, size, colors::ICE_FLAKE, colors::ICE_SHEEN);
            let cy = y + size.y / 2.0;
            for i in 0..(size.x / 24.0) as u32 {
                let cx = pos.x + i as f32 * 20.0 + 10.0;
                shapes::line(out, Vec2::new(cx - 4.0, cy), Vec2::new(cx + 4.0, cy), 1.0, colors::ICE_FLAKE);
                shapes::line(out, Vec2::new(cx, cy - 4.0), Vec2::new(cx, cy + 4.0), 1.0, colors::ICE_FLAKE);
            }
        }
        Archetype::Metal => {
            shapes::gradient_rect(out, pos, size, colors::METAL_TOP, colors::METAL_BOTTOM);
            for i in 0..(size.x / 25.0) as u32 {
                let rx = pos.x + 0.5 + i as f32 * 25.0;
                shapes::ellipse(
                    out,
                    Vec2::new(rx, y + size.y / 2.0),
                    Vec2::splat(2.0),
                    0.0,
                    colors::RIVET,
                    colors::RIVET,
                    8,
                );
            }
        }
        Archetype::Glass => {
            shapes::gradient_rect(out, pos, size, colors::GLASS_TOP, colors::GLASS_BOTTOM);
            shapes::rect(
                out,
                pos + Vec2::splat(2.0),
                Vec2::new(size.x * 0.3, 3.0),
                colors::GLASS_GLINT,
            );
            if platform.dwell > GLASS_CRACK_SECS {
                shapes::rect_outline(out, pos, size, OUTLINE_WIDTH, colors::GLASS_CRACK);
                let top = Vec2::new(pos.x + size.x / 2.0, y);
                let bottom = y + size.y;
                shapes::line(out, top, Vec2::new(top.x - 5.0, bottom), 2.0, colors::GLASS_CRACK);
                shapes::line(out, top, Vec2::new(top.x + 5.0, bottom), 2.0, colors::GLASS_CRACK);
            }
        }
    }

    shapes::rect_outline(out, pos, size, OUTLINE_WIDTH, colors::OUTLINE);

    if let Some(value) = platform.marker {
        let box_size = MARKER_BOX_SIZE * scale;
        let box_pos = Vec2::new(
            pos.x + size.x / 2.0 - box_size / 2.0,
            y + size.y + MARKER_OFFSET,
        );
        shapes::rect(out, box_pos, Vec2::splat(box_size), colors::MARKER);
        shapes::rect_outline(out, box_pos, Vec2::splat(box_size), OUTLINE_WIDTH, colors::MARKER_INK);
        shapes::number(
            out,
            value,
            box_pos + Vec2::splat(box_size / 2.0),
            16.0 * scale,
            colors::MARKER_INK,
        );
    }
}

fn draw_ball(out: &mut Vec<Vertex>, state: &GameState, settings: &Settings) {
    let ball = &state.ball;
    let animate = settings.effective_ball_animation();
    let extent = ball_extent(ball, animate);
    let center = Vec2::new(ball.pos.x, state.screen_y(ball.pos.y));

    shapes::ellipse(
        out,
        center + Vec2::new(0.0, extent.y / 2.0 + 4.0),
        Vec2::new(extent.x / 2.0, 4.0),
        0.0,
        colors::SHADOW,
        colors::SHADOW,
        BALL_SEGMENTS,
    );
    let rotation = if animate { ball.rotation } else { 0.0 };
    draw_ball_body(out, center, extent, rotation);
}

fn draw_ball_body(out: &mut Vec<Vertex>, center: Vec2, extent: Vec2, rotation: f32) {
    let radii = extent / 2.0;
    shapes::ellipse(
        out,
        center,
        radii,
        0.0,
        colors::BALL_HIGHLIGHT,
        colors::BALL,
        BALL_SEGMENTS,
    );
    shapes::ellipse(
        out,
        center - extent * 0.15,
        Vec2::new(extent.x * 0.25, extent.y * 0.2),
        0.0,
        colors::BALL_HIGHLIGHT,
        colors::BALL_HIGHLIGHT,
        BALL_SEGMENTS / 2,
    );

    // Cross marking shows the spin
    let arm = extent * 0.12;
    let rot = Vec2::from_angle(rotation);
    let h = rot.rotate(Vec2::new(arm.x, 0.0));
    let v = rot.rotate(Vec2::new(0.0, arm.y));
    shapes::line(out, center - h, center + h, 4.0, colors::BALL_CROSS);
    shapes::line(out, center - v, center + v, 4.0, colors::BALL_CROSS);
}
