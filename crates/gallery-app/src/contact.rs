//! Stand-in physics layer: swept contact detection for projectiles.
//!
//! Each projectile's path over the next tick is swept against every target's
//! axis-aligned box, the ground plane and a backstop wall. The earliest
//! contact along the path is reported, so a projectile produces at most one
//! collision per tick. Target rotation is ignored.

use glam::DVec3;

use gallery_core::enums::{LifecycleState, TargetKind};
use gallery_core::state::SessionSnapshot;
use gallery_core::types::{CollisionEvent, EntityRef};
use gallery_sim::setup::ResolvedDefinitions;

/// Scenery id of the wall behind the target line.
pub const BACKSTOP_ID: u32 = 1;

const PARALLEL_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone)]
pub struct ContactDetector {
    stationary_half_extents: DVec3,
    moving_half_extents: DVec3,
    projectile_radius: f64,
    ground_height: f64,
    /// z of the backstop wall. Projectiles crossing it toward -z hit scenery.
    backstop_z: f64,
}

#[derive(Debug, Clone, Copy)]
struct Contact {
    /// Fraction of the swept path, 0..=1.
    t: f64,
    other: EntityRef,
    normal: DVec3,
}

impl ContactDetector {
    pub fn new(defs: &ResolvedDefinitions, ground_height: f64, backstop_z: f64) -> Self {
        Self {
            stationary_half_extents: defs.stationary_target.size / 2.0,
            moving_half_extents: defs.moving_target.size / 2.0,
            projectile_radius: defs.projectile.radius,
            ground_height,
            backstop_z,
        }
    }

    /// Contacts for every free projectile in `snapshot` over the next `dt`
    /// seconds of flight.
    pub fn detect(&self, snapshot: &SessionSnapshot, dt: f64) -> Vec<CollisionEvent> {
        let mut contacts = Vec::new();
        for projectile in snapshot.projectiles.iter().filter(|p| !p.embedded) {
            let start = projectile.position;
            let end = start + projectile.velocity * dt;
            if let Some(hit) = self.earliest_contact(snapshot, start, end) {
                contacts.push(CollisionEvent::new(
                    EntityRef::projectile(projectile.handle),
                    hit.other,
                    start.lerp(end, hit.t),
                    hit.normal,
                ));
            }
        }
        contacts
    }

    fn earliest_contact(&self, snapshot: &SessionSnapshot, start: DVec3, end: DVec3) -> Option<Contact> {
        let mut best: Option<Contact> = None;
        let mut consider = |candidate: Contact| {
            if best.map_or(true, |b| candidate.t < b.t) {
                best = Some(candidate);
            }
        };

        for target in &snapshot.targets {
            if target.state == LifecycleState::Inactive {
                continue;
            }
            let half = self.half_extents(target.id.kind) + DVec3::splat(self.projectile_radius);
            if let Some((t, normal)) = segment_aabb(start, end, target.position - half, target.position + half) {
                consider(Contact {
                    t,
                    other: EntityRef::target(target.id),
                    normal,
                });
            }
        }

        if let Some(t) = crossing(start.y, end.y, self.ground_height + self.projectile_radius) {
            consider(Contact {
                t,
                other: EntityRef::Ground,
                normal: DVec3::Y,
            });
        }
        if let Some(t) = crossing(start.z, end.z, self.backstop_z) {
            consider(Contact {
                t,
                other: EntityRef::Scenery { id: BACKSTOP_ID },
                normal: DVec3::Z,
            });
        }
        best
    }

    fn half_extents(&self, kind: TargetKind) -> DVec3 {
        match kind {
            TargetKind::Stationary => self.stationary_half_extents,
            TargetKind::Moving => self.moving_half_extents,
        }
    }
}

/// Fraction along a descending coordinate where it passes `plane`.
fn crossing(from: f64, to: f64, plane: f64) -> Option<f64> {
    if from >= plane && to < plane {
        Some((from - plane) / (from - to))
    } else {
        None
    }
}

/// Slab test of the segment `a..b` against the box `min..max`.
///
/// Returns the entry fraction and the outward normal of the entered face.
/// A segment starting inside the box reports `t = 0` and a normal facing
/// back along the segment.
pub fn segment_aabb(a: DVec3, b: DVec3, min: DVec3, max: DVec3) -> Option<(f64, DVec3)> {
    let d = b - a;
    let mut t_enter = 0.0_f64;
    let mut t_exit = 1.0_f64;
    let mut normal = DVec3::ZERO;

    for axis in 0..3 {
        let (origin, dir) = (a[axis], d[axis]);
        if dir.abs() < PARALLEL_EPSILON {
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }
        let mut t0 = (min[axis] - origin) / dir;
        let mut t1 = (max[axis] - origin) / dir;
        let mut face = -1.0;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
            face = 1.0;
        }
        if t0 > t_enter {
            t_enter = t0;
            normal = DVec3::ZERO;
            normal[axis] = face;
        }
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }

    if normal == DVec3::ZERO {
        normal = (-d).normalize_or_zero();
    }
    Some((t_enter, normal))
}
