//! Wave formation layout: how many enemies, how many groups, where they
//! appear and where each wingman sits relative to its leader.

use std::f64::consts::TAU;

use glam::DVec3;
use rand::Rng;

use starfleet_core::constants::*;

/// Number of enemies in a wave: `floor((4 + 2 * wave) * difficulty)`.
pub fn enemy_count(wave: u32, difficulty: f64) -> u32 {
    let raw = (WAVE_BASE_ENEMIES + WAVE_ENEMIES_PER_WAVE * wave as f64) * difficulty;
    if raw.is_finite() && raw > 0.0 {
        raw.floor() as u32
    } else {
        0
    }
}

/// Formation groups for a wave: one more every other wave, at most three.
pub fn group_count(wave: u32) -> u32 {
    (1 + wave / 2).min(MAX_FORMATION_GROUPS)
}

/// Split `enemies` into `groups` groups of `ceil(enemies / groups)`, the last
/// group taking what is left. Empty groups are dropped.
pub fn group_sizes(enemies: u32, groups: u32) -> Vec<u32> {
    if enemies == 0 {
        return Vec::new();
    }
    let groups = groups.max(1);
    let per_group = enemies.div_ceil(groups);
    let mut remaining = enemies;
    let mut sizes = Vec::with_capacity(groups as usize);
    while remaining > 0 && sizes.len() < groups as usize {
        let size = per_group.min(remaining);
        sizes.push(size);
        remaining -= size;
    }
    sizes
}

/// Approach bearing for each group: a random base plus a fixed spread per group.
pub fn group_bearings<R: Rng + ?Sized>(groups: u32, rng: &mut R) -> Vec<f64> {
    (0..groups)
        .map(|g| rng.gen::<f64>() * TAU + g as f64 * GROUP_BEARING_SPREAD)
        .collect()
}

/// Where a group's leader appears, on the ring around the player.
pub fn leader_anchor(player: DVec3, bearing: f64) -> DVec3 {
    player
        + DVec3::new(
            bearing.cos() * GROUP_SPAWN_DISTANCE,
            0.0,
            bearing.sin() * GROUP_SPAWN_DISTANCE,
        )
}

/// V-formation slot for member `index` (0 is the leader) before rotation.
///
/// Members alternate sides and step back one row every two members.
pub fn v_offset(index: u32) -> DVec3 {
    if index == 0 {
        return DVec3::ZERO;
    }
    let row = (index / 2) as f64;
    let side = if index % 2 == 0 { 1.0 } else { -1.0 };
    DVec3::new(
        side * (row + 1.0) * FORMATION_SIDE_SPACING,
        0.0,
        row * FORMATION_ROW_SPACING,
    )
}

/// Rotate a formation offset about the vertical axis into a group bearing.
pub fn rotate_into_bearing(offset: DVec3, bearing: f64) -> DVec3 {
    let (sin, cos) = bearing.sin_cos();
    DVec3::new(
        offset.x * cos - offset.z * sin,
        offset.y,
        offset.x * sin + offset.z * cos,
    )
}

/// One member of a planned formation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotPlan {
    pub group_id: u32,
    pub is_leader: bool,
    /// Offset from the leader, rotated into the bearing. Zero for leaders.
    pub offset: DVec3,
    /// Spawn position before altitude jitter.
    pub position: DVec3,
}

/// Lay out a whole wave around `player`.
pub fn plan_wave<R: Rng + ?Sized>(
    wave: u32,
    difficulty: f64,
    player: DVec3,
    rng: &mut R,
) -> Vec<SlotPlan> {
    let sizes = group_sizes(enemy_count(wave, difficulty), group_count(wave));
    let bearings = group_bearings(sizes.len() as u32, rng);

    let mut plan = Vec::new();
    for (group_id, (&size, &bearing)) in sizes.iter().zip(&bearings).enumerate() {
        let anchor = leader_anchor(player, bearing);
        for index in 0..size {
            let offset = rotate_into_bearing(v_offset(index), bearing);
            plan.push(SlotPlan {
                group_id: group_id as u32,
                is_leader: index == 0,
                offset,
                position: anchor + offset,
            });
        }
    }
    plan
}
