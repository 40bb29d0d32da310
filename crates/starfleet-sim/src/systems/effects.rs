//! Timed presentation state owned by the simulation: hull breaches.

use starfleet_core::components::{HullBreach, PlayerShip};
use starfleet_core::constants::HULL_BREACH_SEAL_FRACTION;

/// Age hull breaches; they seal on expiry or once the hull is mostly repaired.
pub fn run_breaches(breaches: &mut Vec<HullBreach>, ship: &PlayerShip, dt_ms: f64) {
    let sealed = ship.hull >= ship.max_hull * HULL_BREACH_SEAL_FRACTION;
    for breach in breaches.iter_mut() {
        breach.life_ms -= dt_ms;
    }
    breaches.retain(|b| b.life_ms > 0.0 && !sealed);
}
