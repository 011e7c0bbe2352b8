//! Shared collision and geometry helpers
//!
//! Every physics-based minigame resolves hits through these primitives.
//! All functions are pure and O(1); nothing here touches game state.

use glam::Vec2;

/// True if two circles overlap (strict Euclidean distance test).
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}

/// True if a circle of radius `r` centered at `pos` lies entirely inside
/// the `[0, w] x [0, h]` play field.
#[inline]
pub fn in_bounds(pos: Vec2, r: f32, w: f32, h: f32) -> bool {
    pos.x - r >= 0.0 && pos.x + r <= w && pos.y - r >= 0.0 && pos.y + r <= h
}

/// Wrap a position across a toroidal `[0, w) x [0, h)` play field.
///
/// An entity exiting one edge re-enters from the opposite edge. Handles
/// excursions larger than one field width via `rem_euclid`.
#[inline]
pub fn wrap_position(pos: Vec2, w: f32, h: f32) -> Vec2 {
    Vec2::new(pos.x.rem_euclid(w), pos.y.rem_euclid(h))
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Signed shortest angular difference `to - from`, in [-π, π).
#[inline]
pub fn angle_diff(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Heading unit vector for an angle.
#[inline]
pub fn heading_vec(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}
