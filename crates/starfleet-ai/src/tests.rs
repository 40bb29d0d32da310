#[cfg(test)]
mod tests {
    use glam::{DQuat, DVec3};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use starfleet_core::constants::*;
    use starfleet_core::types::forward;

    use crate::formation::*;
    use crate::steering::*;

    fn leader_at(distance: f64) -> EnemyContext {
        EnemyContext {
            role: EnemyRole::Leader,
            position: DVec3::new(0.0, 0.0, -distance),
            speed: 0.5,
            player_position: DVec3::ZERO,
            frames: 1.0,
        }
    }

    fn ally_context(nearest_enemy: Option<(DVec3, f64)>, position: DVec3) -> AllyContext {
        AllyContext {
            position,
            speed: 0.5,
            turn_speed: 0.02,
            nearest_enemy,
            player_position: DVec3::ZERO,
            player_orientation: DQuat::IDENTITY,
            formation_offset: DVec3::new(-30.0, 0.0, 30.0),
            frames: 1.0,
        }
    }

    // ---- Enemy steering ----

    #[test]
    fn test_leader_closes_at_full_speed_when_far() {
        let update = steer_enemy(&leader_at(400.0));
        assert_eq!(update.maneuver, EnemyManeuver::Close);
        assert!((update.displacement.length() - 0.5).abs() < 1e-9);
        // Toward the player at the origin.
        assert!(update.displacement.z > 0.0);
    }

    #[test]
    fn test_leader_halves_speed_in_approach_band() {
        let update = steer_enemy(&leader_at(120.0));
        assert_eq!(update.maneuver, EnemyManeuver::Approach);
        assert!((update.displacement.length() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_leader_orbits_at_right_angles_when_close() {
        let ctx = leader_at(50.0);
        let update = steer_enemy(&ctx);
        assert_eq!(update.maneuver, EnemyManeuver::Orbit);
        let to_player = ctx.player_position - ctx.position;
        assert!(update.displacement.dot(to_player).abs() < 1e-9);
        assert!((update.displacement.length() - 0.5 * ORBIT_SPEED_FACTOR).abs() < 1e-9);
    }

    #[test]
    fn test_displacement_scales_with_frames() {
        let mut ctx = leader_at(400.0);
        ctx.frames = 3.0;
        let update = steer_enemy(&ctx);
        assert!((update.displacement.length() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_wingman_tracks_leader_slot() {
        let ctx = EnemyContext {
            role: EnemyRole::Wingman {
                leader_position: Some(DVec3::new(100.0, 0.0, 0.0)),
                offset: DVec3::new(25.0, 0.0, 0.0),
            },
            position: DVec3::new(100.0, 0.0, 0.0),
            speed: 0.5,
            player_position: DVec3::new(0.0, 0.0, -600.0),
            frames: 1.0,
        };
        let update = steer_enemy(&ctx);
        assert_eq!(update.maneuver, EnemyManeuver::Regroup);
        assert!(update.displacement.x > 0.0);
        assert!((update.displacement.length() - 0.5 * WINGMAN_SPEED_FACTOR).abs() < 1e-9);

        let settled = EnemyContext {
            position: DVec3::new(123.0, 0.0, 0.0),
            ..ctx
        };
        let update = steer_enemy(&settled);
        assert_eq!(update.maneuver, EnemyManeuver::OnStation);
        assert_eq!(update.displacement, DVec3::ZERO);
    }

    #[test]
    fn test_leaderless_wingman_pursues_then_holds() {
        let mut ctx = EnemyContext {
            role: EnemyRole::Wingman {
                leader_position: None,
                offset: DVec3::new(25.0, 0.0, 0.0),
            },
            position: DVec3::new(0.0, 0.0, -300.0),
            speed: 0.5,
            player_position: DVec3::ZERO,
            frames: 1.0,
        };
        assert_eq!(steer_enemy(&ctx).maneuver, EnemyManeuver::Pursue);

        ctx.position = DVec3::new(0.0, 0.0, -60.0);
        let update = steer_enemy(&ctx);
        assert_eq!(update.maneuver, EnemyManeuver::Hold);
        assert_eq!(update.displacement, DVec3::ZERO);
    }

    #[test]
    fn test_enemy_facing_points_at_player() {
        let facing = enemy_facing(DVec3::new(0.0, 0.0, -100.0), DVec3::ZERO, 0.015).unwrap();
        assert_eq!(facing.rate, 0.015);
        assert!(forward(facing.target).distance(DVec3::Z) < 1e-9);
        assert!(enemy_facing(DVec3::ONE, DVec3::ONE, 0.015).is_none());
    }

    #[test]
    fn test_enemy_fire_gate() {
        assert!(enemy_should_fire(2000.0, 0.0, 1200.0, 300.0));
        // Cooldown not elapsed.
        assert!(!enemy_should_fire(1000.0, 0.0, 1200.0, 300.0));
        // Out of range.
        assert!(!enemy_should_fire(2000.0, 0.0, 1200.0, ENEMY_ENGAGE_RANGE));
    }

    // ---- Ally steering ----

    #[test]
    fn test_ally_engages_enemy_in_range() {
        let enemy = DVec3::new(0.0, 0.0, -150.0);
        let update = steer_ally(&ally_context(Some((enemy, 150.0)), DVec3::ZERO));
        assert_eq!(update.maneuver, AllyManeuver::Engage);
        assert!(update.is_engaging());
        assert!(update.in_fire_range);
        assert!(update.displacement.z < 0.0);
        let facing = update.facing.unwrap();
        assert!(forward(facing.target).distance(DVec3::NEG_Z) < 1e-9);
    }

    #[test]
    fn test_ally_strafes_close_enemy() {
        let enemy = DVec3::new(0.0, 0.0, -50.0);
        let update = steer_ally(&ally_context(Some((enemy, 50.0)), DVec3::ZERO));
        assert_eq!(update.maneuver, AllyManeuver::Strafe);
        assert!(update.displacement.dot(enemy).abs() < 1e-9);
    }

    #[test]
    fn test_ally_ignores_distant_enemy_and_regroups() {
        let far = Some((DVec3::new(0.0, 0.0, -400.0), 400.0));
        let update = steer_ally(&ally_context(far, DVec3::new(100.0, 0.0, 100.0)));
        assert_eq!(update.maneuver, AllyManeuver::Regroup);
        assert!(!update.is_engaging());
        assert!(!update.in_fire_range);
        // Capped at boosted cruise speed.
        assert!(update.displacement.length() <= 0.5 * ALLY_FORMATION_SPEED_FACTOR + 1e-9);
        assert_eq!(update.facing.unwrap().rate, 0.02 * ALLY_FORMATION_TURN_FACTOR);
    }

    #[test]
    fn test_ally_regroup_never_overshoots_station() {
        let mut ctx = ally_context(None, DVec3::new(-36.0, 0.0, 30.0));
        ctx.frames = 6.0;
        let update = steer_ally(&ctx);
        let arrived = ctx.position + update.displacement;
        assert!(arrived.distance(DVec3::new(-30.0, 0.0, 30.0)) < 6.0);
    }

    #[test]
    fn test_ally_station_rotates_with_player() {
        let mut ctx = ally_context(None, DVec3::ZERO);
        ctx.player_orientation = DQuat::from_rotation_y(std::f64::consts::PI);
        ctx.position = DVec3::new(30.0, 0.0, -30.0);
        let update = steer_ally(&ctx);
        assert_eq!(update.maneuver, AllyManeuver::OnStation);
        assert_eq!(update.facing.unwrap().target, ctx.player_orientation);
        assert_eq!(update.facing.unwrap().rate, ALLY_HEADING_MATCH_RATE);
    }

    // ---- Formation layout ----

    #[test]
    fn test_enemy_count_floors() {
        assert_eq!(enemy_count(1, 1.0), 6);
        assert_eq!(enemy_count(1, 1.5), 9);
        assert_eq!(enemy_count(2, 2.5), 20);
        assert_eq!(enemy_count(3, 0.5), 5);
        assert_eq!(enemy_count(1, f64::NAN), 0);
    }

    #[test]
    fn test_group_count_grows_with_wave_and_caps() {
        assert_eq!(group_count(1), 1);
        assert_eq!(group_count(2), 2);
        assert_eq!(group_count(3), 2);
        assert_eq!(group_count(4), 3);
        assert_eq!(group_count(20), 3);
    }

    #[test]
    fn test_group_sizes_cover_all_enemies() {
        assert_eq!(group_sizes(6, 1), vec![6]);
        assert_eq!(group_sizes(8, 2), vec![4, 4]);
        assert_eq!(group_sizes(10, 3), vec![4, 4, 2]);
        // Four enemies in three groups of two: only two groups get anyone.
        assert_eq!(group_sizes(4, 3), vec![2, 2]);
        assert!(group_sizes(0, 2).is_empty());
    }

    #[test]
    fn test_v_offsets_alternate_sides() {
        assert_eq!(v_offset(0), DVec3::ZERO);
        assert_eq!(v_offset(1), DVec3::new(-25.0, 0.0, 0.0));
        assert_eq!(v_offset(2), DVec3::new(50.0, 0.0, 35.0));
        assert_eq!(v_offset(3), DVec3::new(-50.0, 0.0, 35.0));
        assert_eq!(v_offset(4), DVec3::new(75.0, 0.0, 70.0));
    }

    #[test]
    fn test_rotation_preserves_length() {
        let offset = v_offset(3);
        let rotated = rotate_into_bearing(offset, 1.1);
        assert!((rotated.length() - offset.length()).abs() < 1e-9);
        let quarter = rotate_into_bearing(DVec3::new(1.0, 0.0, 0.0), std::f64::consts::FRAC_PI_2);
        assert!(quarter.distance(DVec3::new(0.0, 0.0, 1.0)) < 1e-9);
    }

    #[test]
    fn test_plan_wave_has_one_leader_per_group() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let player = DVec3::new(10.0, 0.0, -20.0);
        let plan = plan_wave(4, 2.0, player, &mut rng);
        assert_eq!(plan.len(), 24);
        for group in 0..3 {
            let leaders: Vec<_> = plan
                .iter()
                .filter(|s| s.group_id == group && s.is_leader)
                .collect();
            assert_eq!(leaders.len(), 1, "group {group}");
            let leader = leaders[0];
            assert!((leader.position.distance(player) - GROUP_SPAWN_DISTANCE).abs() < 1e-6);
            for wing in plan.iter().filter(|s| s.group_id == group && !s.is_leader) {
                assert!(wing.position.distance(leader.position + wing.offset) < 1e-9);
            }
        }
    }

    #[test]
    fn test_plan_wave_is_seeded() {
        let a = plan_wave(3, 1.0, DVec3::ZERO, &mut ChaCha8Rng::seed_from_u64(5));
        let b = plan_wave(3, 1.0, DVec3::ZERO, &mut ChaCha8Rng::seed_from_u64(5));
        assert_eq!(a, b);
    }
}
