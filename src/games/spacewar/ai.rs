//! The CPU pilot
//!
//! Two behaviors, picked by proximity to the sun. Inside the safety radius
//! the pilot turns tail and burns away; sun avoidance always pre-empts
//! combat. Otherwise it pursues: rotate toward a (velocity-led) bearing on
//! the player with a deadband, thrust only when burning would close toward
//! the preferred combat distance, and fire probabilistically while aligned.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::geom::angle_diff;

use super::state::{ShipCommand, SpaceWarConfig, SpaceWarState, SUN_POS};

/// Alignment required before the avoidance burn kicks in (radians).
const AVOID_ALIGN: f32 = 0.5;

fn steer_toward(heading: f32, target_bearing: f32, deadband: f32) -> (f32, f32) {
    let diff = angle_diff(heading, target_bearing);
    let turn = if diff.abs() <= deadband {
        0.0
    } else {
        diff.signum()
    };
    (turn, diff)
}

/// Decide the CPU ship's command for this tick from pre-move state.
pub fn cpu_command(
    state: &SpaceWarState,
    config: &SpaceWarConfig,
    rng: &mut Pcg32,
) -> ShipCommand {
    let cpu = &state.cpu;

    // Sun avoidance: heading directly away, burn once roughly aligned
    let from_sun = cpu.pos - SUN_POS;
    if from_sun.length() < config.sun_safety_radius {
        let escape_bearing = from_sun.y.atan2(from_sun.x);
        let (turn, diff) = steer_toward(cpu.heading, escape_bearing, config.deadband);
        return ShipCommand {
            turn,
            thrust: diff.abs() < AVOID_ALIGN,
            fire: false,
        };
    }

    // Pursuit: lead the player by a difficulty-scaled slice of their velocity
    let aim_point = state.player.pos + state.player.vel * config.lead_time;
    let to_target = aim_point - cpu.pos;
    let bearing = to_target.y.atan2(to_target.x);
    let (turn, diff) = steer_toward(cpu.heading, bearing, config.deadband);

    // Thrust only when a burn closes toward the combat distance instead of
    // overshooting: far and facing the target, or drifting away from it.
    let dist = to_target.length();
    let closing_speed = cpu.vel.dot(to_target / dist.max(1.0));
    let thrust = if dist > config.combat_distance {
        diff.abs() < AVOID_ALIGN
    } else {
        closing_speed < 0.0 && diff.abs() < AVOID_ALIGN
    };

    let fire = diff.abs() < config.fire_tolerance && rng.random::<f32>() < config.fire_probability;

    ShipCommand { turn, thrust, fire }
}
