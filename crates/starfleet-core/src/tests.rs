#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::commands::{PlayerCommand, PlayerInput};
    use crate::config::{ConfigError, Content};
    use crate::enums::*;
    use crate::registry::{EnemyRegistry, WeightedTable};
    use crate::state::GameStateSnapshot;

    #[test]
    fn test_player_command_tagged_json() {
        let cmd = PlayerCommand::StartMission {
            mission: "patrol".into(),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"type\":\"StartMission\""), "got {json}");
        let back: PlayerCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);

        let buy: PlayerCommand =
            serde_json::from_str(r#"{"type":"PurchaseUpgrade","upgrade":"HullPlating"}"#).unwrap();
        assert_eq!(
            buy,
            PlayerCommand::PurchaseUpgrade {
                upgrade: UpgradeKind::HullPlating
            }
        );
    }

    #[test]
    fn test_input_sanitized_clamps_axes() {
        let input = PlayerInput {
            yaw: 3.0,
            pitch: f64::NAN,
            aim_point: Some(glam::DVec3::new(f64::INFINITY, 0.0, 0.0)),
            ..Default::default()
        }
        .sanitized();
        assert_eq!(input.yaw, 1.0);
        assert_eq!(input.pitch, 0.0);
        assert!(input.aim_point.is_none());
    }

    #[test]
    fn test_default_snapshot_serializes() {
        let json = serde_json::to_string(&GameStateSnapshot::default()).unwrap();
        assert!(json.contains("\"phase\":\"MainMenu\""));
        assert!(json.contains("\"mission_phase\":\"Inactive\""));
    }

    #[test]
    fn test_weighted_table_distribution_is_seeded() {
        let table = WeightedTable::new(&[(EnemyClass::Gorn, 0.3), (EnemyClass::Klingon, 0.7)]);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let draws = 10_000;
        let gorn = (0..draws)
            .filter(|_| table.sample(&mut rng) == EnemyClass::Gorn)
            .count();
        let share = gorn as f64 / draws as f64;
        assert!((share - 0.3).abs() < 0.03, "gorn share {share}");

        // Same seed, same sequence.
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..100 {
            assert_eq!(table.sample(&mut a), table.sample(&mut b));
        }
    }

    #[test]
    fn test_weighted_table_ignores_zero_weights() {
        let table = WeightedTable::new(&[(EnemyClass::Borg, 0.0), (EnemyClass::Romulan, 1.0)]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..500 {
            assert_eq!(table.sample(&mut rng), EnemyClass::Romulan);
        }
    }

    #[test]
    fn test_tiers_gate_classes_by_wave() {
        let registry = EnemyRegistry::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for _ in 0..2000 {
            let class = registry.roll_class(1, &mut rng);
            assert!(matches!(class, EnemyClass::Gorn | EnemyClass::Klingon));
        }
        for _ in 0..2000 {
            let class = registry.roll_class(7, &mut rng);
            assert_ne!(class, EnemyClass::Borg, "no Borg before wave 8");
        }
        let borg_late = (0..5000)
            .filter(|_| registry.roll_class(9, &mut rng) == EnemyClass::Borg)
            .count();
        assert!(borg_late > 300 && borg_late < 700, "borg draws {borg_late}");
    }

    #[test]
    fn test_default_content_valid_and_patrol_roster() {
        let content = Content::default();
        content.validate().unwrap();
        let patrol = content.mission("patrol").unwrap();
        assert_eq!(patrol.waves, Some(5));
        assert_eq!(patrol.difficulty, 1.0);
        assert_eq!(content.mission("survival").unwrap().waves, None);
        assert_eq!(content.mission("fleet").unwrap().allies, 3);
        assert!(matches!(
            content.mission("nowhere"),
            Err(ConfigError::UnknownMission(_))
        ));
    }

    #[test]
    fn test_content_json_partial_document_uses_defaults() {
        let json = r#"{
            "missions": {
                "drill": { "name": "Drill", "description": "Target practice", "waves": 2, "difficulty": 0.5 }
            }
        }"#;
        let content = Content::from_json_str(json).unwrap();
        assert_eq!(content.missions.len(), 1);
        assert_eq!(content.mission("drill").unwrap().allies, 0);
        assert_eq!(content.enemies, EnemyRegistry::default());
        assert_eq!(content.upgrades.len(), UpgradeKind::ALL.len());
    }

    #[test]
    fn test_content_validation_rejects_bad_data() {
        let json = r#"{ "missions": { "x": { "name": "X", "description": "", "waves": 0, "difficulty": 1.0 } } }"#;
        assert!(matches!(
            Content::from_json_str(json),
            Err(ConfigError::BadMission { .. })
        ));

        let mut content = Content::default();
        content.enemies.tiers.retain(|t| t.min_wave > 1);
        assert!(matches!(content.validate(), Err(ConfigError::NoOpeningTier)));

        let mut content = Content::default();
        content.enemies.templates.remove(&EnemyClass::Gorn);
        assert!(matches!(
            content.validate(),
            Err(ConfigError::MissingTemplate(EnemyClass::Gorn))
        ));

        assert!(matches!(
            Content::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_upgrade_kinds_order_like_the_catalog() {
        let owned: std::collections::BTreeSet<UpgradeKind> =
            UpgradeKind::ALL.iter().rev().copied().collect();
        assert_eq!(owned.len(), UpgradeKind::ALL.len());
        assert!(owned.iter().copied().eq(UpgradeKind::ALL));
        assert!(UpgradeKind::HullPlating < UpgradeKind::EnergyCell);
    }
}
