//! Target motion, integration, boundary checks and the built-in ground plane.

use gallery_core::enums::LifecycleState;
use gallery_core::types::TargetId;

use crate::target::TargetPools;

/// Transitions that fired during one pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TargetTransitions {
    pub out_of_bounds: Vec<TargetId>,
    pub landed: Vec<TargetId>,
}

/// Step every checked-out target by `dt`.
///
/// Active targets that stray past their boundary go OutOfBounds. Falling
/// targets whose center reaches `ground_height` land.
pub fn run(targets: &mut TargetPools, dt: f64, ground_height: f64) -> TargetTransitions {
    let mut transitions = TargetTransitions::default();
    targets.for_each_mut(|id, target| {
        target.step(dt);
        let core = target.core_mut();
        if core.check_boundary() {
            transitions.out_of_bounds.push(id);
        }
        let falling = matches!(
            core.state(),
            LifecycleState::Destroyed | LifecycleState::OutOfBounds
        );
        if falling && core.body().linear_velocity.y <= 0.0 && core.body().position.y <= ground_height {
            core.body_mut().position.y = ground_height;
            if core.land() {
                transitions.landed.push(id);
            }
        }
    });
    transitions
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use gallery_core::config::{MotionConfig, PoolConfig, TargetConfig};
    use gallery_core::definitions::TargetDefinition;
    use gallery_core::enums::{MovementPattern, TargetKind};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const DT: f64 = 1.0 / 30.0;

    fn pools() -> TargetPools {
        TargetPools::new(
            &PoolConfig::default(),
            &TargetConfig::default(),
            &MotionConfig::default(),
            TargetDefinition::fallback_stationary(),
            TargetDefinition::fallback_moving(),
        )
    }

    #[test]
    fn test_standing_target_stays_put() {
        let mut t = pools();
        let id = t.spawn(TargetKind::Stationary, DVec3::new(0.0, 1.0, -10.0), MovementPattern::Horizontal);
        for _ in 0..90 {
            assert_eq!(run(&mut t, DT, 0.0), TargetTransitions::default());
        }
        assert_eq!(t.core(id).unwrap().body().position, DVec3::new(0.0, 1.0, -10.0));
    }

    #[test]
    fn test_destroyed_target_falls_and_lands_once() {
        let mut t = pools();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let id = t.spawn(TargetKind::Stationary, DVec3::new(0.0, 1.0, -10.0), MovementPattern::Horizontal);
        t.receiver_mut(id).unwrap().take_damage(10, &mut rng);

        let mut landed = Vec::new();
        for _ in 0..300 {
            landed.extend(run(&mut t, DT, 0.0).landed);
        }
        assert_eq!(landed, vec![id]);
        assert_eq!(t.state(id), Some(LifecycleState::PendingRemoval));
        assert_eq!(t.core(id).unwrap().body().position.y, 0.0);
    }

    #[test]
    fn test_pushed_target_goes_out_of_bounds_then_lands() {
        let mut t = pools();
        let id = t.spawn(TargetKind::Stationary, DVec3::new(0.0, 1.0, -10.0), MovementPattern::Horizontal);
        t.core_mut(id).unwrap().body_mut().position.z = -50.0;

        let first = run(&mut t, DT, 0.0);
        assert_eq!(first.out_of_bounds, vec![id]);

        let mut landed = Vec::new();
        for _ in 0..120 {
            let pass = run(&mut t, DT, 0.0);
            assert!(pass.out_of_bounds.is_empty());
            landed.extend(pass.landed);
        }
        assert_eq!(landed, vec![id]);
    }
}
