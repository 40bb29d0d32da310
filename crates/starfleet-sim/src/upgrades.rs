//! One-time ship upgrades bought with credits.

use std::collections::BTreeSet;

use starfleet_core::components::PlayerShip;
use starfleet_core::enums::UpgradeKind;
use starfleet_core::registry::UpgradeSpec;

use crate::engine::CommandError;

/// Buy `spec` for `ship`. Upgrades raise the stat's maximum and top the
/// current value up by the same amount.
pub fn purchase(
    ship: &mut PlayerShip,
    owned: &mut BTreeSet<UpgradeKind>,
    spec: &UpgradeSpec,
) -> Result<(), CommandError> {
    if owned.contains(&spec.kind) {
        return Err(CommandError::AlreadyOwned(spec.kind));
    }
    if ship.credits < spec.cost {
        return Err(CommandError::InsufficientCredits {
            upgrade: spec.kind,
            cost: spec.cost,
            credits: ship.credits,
        });
    }
    ship.credits -= spec.cost;
    owned.insert(spec.kind);
    apply(ship, spec);
    Ok(())
}

fn apply(ship: &mut PlayerShip, spec: &UpgradeSpec) {
    let amount = spec.amount;
    match spec.kind {
        UpgradeKind::HullPlating => {
            ship.max_hull += amount;
            ship.hull += amount;
        }
        UpgradeKind::ShieldBoost => {
            ship.max_shields += amount;
            ship.shields += amount;
        }
        UpgradeKind::PhaserUpgrade => ship.weapons.phaser_damage += amount,
        UpgradeKind::TorpedoUpgrade => ship.weapons.torpedo_damage += amount,
        UpgradeKind::ExtraTorpedoes => {
            let extra = amount.max(0.0).round() as u32;
            ship.weapons.max_torpedoes += extra;
            ship.weapons.torpedoes += extra;
        }
        UpgradeKind::EngineBoost => ship.max_speed += amount,
        UpgradeKind::WarpCore => ship.max_warp += amount,
        UpgradeKind::EnergyCell => {
            ship.max_energy += amount;
            ship.energy += amount;
        }
    }
}
