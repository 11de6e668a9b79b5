//! Simulation engine: the session context.
//!
//! `SimulationEngine` owns the pools, the spawn coordinator, the session
//! clock, the weapon and the deferred-action scheduler. It processes player
//! commands and collision reports, runs the systems at a fixed tick and
//! produces `SessionSnapshot`s. Headless and deterministic for a given seed
//! and input sequence.

use std::collections::VecDeque;

use glam::DVec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use gallery_core::commands::PlayerCommand;
use gallery_core::config::{ConfigError, SimConfig};
use gallery_core::constants::DT;
use gallery_core::definitions::EntityDefinitions;
use gallery_core::enums::*;
use gallery_core::events::SimEvent;
use gallery_core::state::{AmmoView, SessionSnapshot};
use gallery_core::types::{CollisionEvent, EntityRef, PoolHandle, SimTime, TargetId};

use crate::projectile::{HitResolution, ProjectileSimulator};
use crate::scheduler::{DeferredAction, Scheduler};
use crate::session::SessionClock;
use crate::setup;
use crate::spawner::{SpawnCoordinator, SpawnReport};
use crate::systems;
use crate::target::{DamageOutcome, TargetPools};
use crate::weapon::Weapon;

pub struct SimulationEngine {
    config: SimConfig,
    time: SimTime,
    time_scale: f64,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    collision_queue: VecDeque<CollisionEvent>,
    events: Vec<SimEvent>,

    targets: TargetPools,
    projectiles: ProjectileSimulator,
    coordinator: SpawnCoordinator,
    clock: SessionClock,
    weapon: Weapon,
    scheduler: Scheduler,
}

impl SimulationEngine {
    /// Build an engine using fallback entity definitions.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        Self::with_definitions(config, &EntityDefinitions::default())
    }

    pub fn with_definitions(
        config: SimConfig,
        definitions: &EntityDefinitions,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let resolved = setup::resolve_definitions(definitions);

        let mut engine = Self {
            time: SimTime::default(),
            time_scale: config.time_scale.clamp(0.0, 4.0),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            collision_queue: VecDeque::new(),
            events: Vec::new(),
            targets: setup::build_target_pools(&config, &resolved),
            projectiles: setup::build_projectiles(&config, &resolved),
            coordinator: SpawnCoordinator::new(&config.spawn),
            clock: SessionClock::new(&config.session),
            weapon: Weapon::new(&config.weapon),
            scheduler: Scheduler::new(),
            config,
        };
        if engine.config.session.auto_start {
            engine.queue_command(PlayerCommand::StartSession);
        }
        info!(seed = engine.config.seed, "simulation engine ready");
        Ok(engine)
    }

    /// Queue a player command for the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Queue a collision from the external physics layer for the next tick.
    /// Collisions still queued when a tick runs outside a running session
    /// (idle, paused or ended) are discarded, not carried over.
    pub fn report_collision(&mut self, event: CollisionEvent) {
        self.collision_queue.push_back(event);
    }

    /// Physics write-back of a body position. Returns false for stale or
    /// static entities.
    pub fn report_body_position(&mut self, entity: EntityRef, position: DVec3) -> bool {
        match entity {
            EntityRef::Projectile { handle } => match self.projectiles.get_mut(handle) {
                Some(p) => {
                    p.position = position;
                    true
                }
                None => false,
            },
            EntityRef::Target { id } => match self.targets.core_mut(id) {
                Some(core) => {
                    core.body_mut().position = position;
                    true
                }
                None => false,
            },
            EntityRef::Scenery { .. } | EntityRef::Ground => false,
        }
    }

    /// Place a single target outside the spawn line. It counts toward the
    /// active total like any other.
    pub fn spawn_target(&mut self, kind: TargetKind, position: DVec3) -> TargetId {
        let id = self
            .targets
            .spawn(kind, position, MovementPattern::Horizontal);
        self.coordinator.register_spawn();
        id
    }

    /// Advance one fixed tick.
    pub fn tick(&mut self) -> SessionSnapshot {
        self.advance(DT)
    }

    /// Advance by `dt` seconds (before time scaling).
    pub fn advance(&mut self, dt: f64) -> SessionSnapshot {
        self.process_commands();

        if self.clock.is_running() {
            self.process_collisions();
            self.run_systems(dt * self.time_scale);
        } else if !self.collision_queue.is_empty() {
            debug!(
                count = self.collision_queue.len(),
                "collisions dropped outside a running session"
            );
            self.collision_queue.clear();
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.time,
            &self.clock,
            &self.coordinator,
            &self.weapon,
            &self.targets,
            &self.projectiles,
            events,
        )
    }

    // --- Queries ---

    /// Authoritative number of Active targets.
    pub fn active_count(&self) -> u32 {
        self.coordinator.active_count()
    }

    pub fn current_health(&self, id: TargetId) -> Option<u32> {
        self.targets.core(id).map(|core| core.health())
    }

    /// Lifecycle state of a pooled entity. A stale handle reports `Inactive`:
    /// the instance it named is back in its pool. `None` for static geometry.
    pub fn lifecycle_state(&self, entity: EntityRef) -> Option<LifecycleState> {
        match entity {
            EntityRef::Projectile { handle } => Some(
                self.projectiles
                    .get(handle)
                    .map_or(LifecycleState::Inactive, |p| p.state),
            ),
            EntityRef::Target { id } => {
                Some(self.targets.state(id).unwrap_or(LifecycleState::Inactive))
            }
            EntityRef::Scenery { .. } | EntityRef::Ground => None,
        }
    }

    pub fn score(&self) -> u32 {
        self.clock.score()
    }

    pub fn time_remaining(&self) -> f64 {
        self.clock.remaining()
    }

    pub fn phase(&self) -> SessionPhase {
        self.clock.phase()
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        self.clock.outcome()
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn ammo(&self) -> AmmoView {
        self.weapon.view()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn targets(&self) -> &TargetPools {
        &self.targets
    }

    pub fn projectiles(&self) -> &ProjectileSimulator {
        &self.projectiles
    }

    /// Live deferred actions (removal, respawn and post-hit timers).
    pub fn pending_actions(&self) -> usize {
        self.scheduler.pending()
    }

    // --- Commands ---

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartSession => {
                if self.clock.start() {
                    self.begin_session();
                }
            }
            PlayerCommand::Restart => self.restart(),
            PlayerCommand::Pause => {
                self.clock.pause();
            }
            PlayerCommand::Resume => {
                self.clock.resume();
            }
            PlayerCommand::SetTimeScale { scale } => {
                self.time_scale = scale.clamp(0.0, 4.0);
            }
            PlayerCommand::Fire { origin, direction } => self.fire(origin, direction),
            PlayerCommand::Reload => {
                if self.clock.is_running() && self.weapon.request_reload() {
                    self.events.push(SimEvent::ReloadStarted {
                        duration_secs: self.weapon.reload_secs(),
                    });
                }
            }
        }
    }

    fn begin_session(&mut self) {
        info!(duration_secs = self.clock.duration(), "session started");
        self.events.push(SimEvent::SessionStarted {
            duration_secs: self.clock.duration(),
        });
        let report = self.coordinator.start(&mut self.targets, &mut self.rng);
        self.record_spawn(report);
    }

    /// Tear down everything in flight and start a fresh session.
    fn restart(&mut self) {
        info!("session restart");
        self.scheduler.cancel_all();
        self.sweep_pools();
        self.coordinator.reset();
        self.weapon.reset();
        self.clock.restart();
        self.time = SimTime::default();
        self.begin_session();
    }

    fn fire(&mut self, origin: DVec3, direction: DVec3) {
        if !self.clock.is_running() {
            self.events.push(SimEvent::FireRejected {
                reason: FireRejection::SessionNotRunning,
            });
            return;
        }
        match self.weapon.try_fire() {
            Ok(shot) => {
                let projectile = self.projectiles.fire(origin, direction);
                self.events.push(SimEvent::Fired {
                    projectile,
                    origin,
                    direction,
                    ammo_remaining: shot.ammo_remaining,
                });
                if shot.reload_started {
                    self.events.push(SimEvent::ReloadStarted {
                        duration_secs: self.weapon.reload_secs(),
                    });
                }
            }
            Err(reason) => self.events.push(SimEvent::FireRejected { reason }),
        }
    }

    // --- Collisions ---

    fn process_collisions(&mut self) {
        while let Some(event) = self.collision_queue.pop_front() {
            self.handle_collision(event);
        }
    }

    fn handle_collision(&mut self, event: CollisionEvent) {
        match (event.a, event.b) {
            (EntityRef::Projectile { handle }, other) | (other, EntityRef::Projectile { handle }) => {
                self.projectile_contact(handle, other, event.contact_point, event.contact_normal);
            }
            (EntityRef::Target { id }, EntityRef::Ground)
            | (EntityRef::Ground, EntityRef::Target { id }) => {
                let landed = match self.targets.core_mut(id) {
                    Some(core) => core.land(),
                    None => {
                        debug!(target_id = %id, "ground contact for stale target ignored");
                        false
                    }
                };
                if landed {
                    self.events.push(SimEvent::Landed { target: id });
                }
            }
            _ => {}
        }
    }

    fn projectile_contact(
        &mut self,
        handle: PoolHandle,
        other: EntityRef,
        contact_point: DVec3,
        contact_normal: DVec3,
    ) {
        let target = match other {
            EntityRef::Target { id } => {
                if self.targets.core(id).is_none() {
                    debug!(target_id = %id, projectile = %handle, "hit on stale target ignored");
                    return;
                }
                Some(id)
            }
            EntityRef::Scenery { .. } | EntityRef::Ground => None,
            EntityRef::Projectile { .. } => return,
        };

        let receiver = match target {
            Some(id) => self.targets.receiver_mut(id),
            None => None,
        };
        let resolution = self.projectiles.resolve_collision(
            handle,
            receiver,
            &mut self.rng,
            contact_point,
            contact_normal,
        );

        match (resolution, target) {
            (HitResolution::Ignored, _) => {}
            (HitResolution::Released, _) => {
                self.events.push(SimEvent::ProjectileReleased {
                    projectile: handle,
                    reason: ReleaseReason::Scenery,
                });
            }
            (HitResolution::Struck { outcome, release_after }, Some(id)) => {
                self.scheduler.schedule(
                    self.time.elapsed_secs + release_after,
                    DeferredAction::ReleaseProjectile(handle),
                );
                self.on_damage(id, handle, contact_point, outcome);
            }
            (HitResolution::Struck { .. }, None) => {
                warn!(projectile = %handle, "struck without a receiver");
            }
        }
    }

    fn on_damage(
        &mut self,
        id: TargetId,
        projectile: PoolHandle,
        point: DVec3,
        outcome: DamageOutcome,
    ) {
        let remaining_health = match outcome {
            DamageOutcome::Ignored => return,
            DamageOutcome::Wounded { remaining_health } => remaining_health,
            DamageOutcome::Killed { .. } => 0,
        };
        self.events.push(SimEvent::Hit {
            target: id,
            projectile,
            point,
            remaining_health,
        });
        if let DamageOutcome::Killed { score } = outcome {
            self.clock.add_score(score);
            self.events.push(SimEvent::Destroyed {
                target: id,
                score_awarded: score,
            });
            debug!(target_id = %id, score, "target destroyed");
            self.on_left_active(id);
        }
    }

    // --- Lifecycle side effects ---

    /// Every transition out of Active lands here exactly once: the active
    /// count drops now and the removal delay starts.
    fn on_left_active(&mut self, id: TargetId) {
        let now = self.time.elapsed_secs;
        self.scheduler.schedule(
            now + self.config.target.removal_delay_secs,
            DeferredAction::ReleaseTarget(id),
        );
        if self.coordinator.notify_removed(&mut self.scheduler, now) {
            debug!("line cleared, respawn scheduled");
        }
    }

    fn record_spawn(&mut self, report: SpawnReport) {
        if report.force_returned > 0 {
            debug!(count = report.force_returned, "targets force-returned");
        }
        if !report.spawned.is_empty() {
            self.events.push(SimEvent::Respawn {
                count: report.spawned.len() as u32,
            });
        }
    }

    /// Return every pooled entity, emitting release events for projectiles.
    fn sweep_pools(&mut self) {
        self.targets.force_return_all();
        for projectile in self.projectiles.release_all() {
            self.events.push(SimEvent::ProjectileReleased {
                projectile,
                reason: ReleaseReason::Forced,
            });
        }
    }

    // --- Systems ---

    fn run_systems(&mut self, dt: f64) {
        self.time.advance(dt);

        // 1. Session countdown
        if let Some(outcome) = self.clock.advance(dt) {
            self.end_session(outcome);
            return;
        }

        // 2. Weapon reload
        if self.weapon.advance(dt) {
            self.events.push(SimEvent::Reloaded {
                ammo: self.weapon.ammo(),
            });
        }

        // 3. Projectile flight and expiry
        for projectile in self.projectiles.advance(dt) {
            self.events.push(SimEvent::ProjectileReleased {
                projectile,
                reason: ReleaseReason::Expired,
            });
        }

        // 4. Targets: motion, integration, boundary, ground plane
        let transitions = systems::targets::run(&mut self.targets, dt, self.config.ground_height);
        for id in transitions.out_of_bounds {
            self.events.push(SimEvent::OutOfBounds { target: id });
            self.on_left_active(id);
        }
        for id in transitions.landed {
            self.events.push(SimEvent::Landed { target: id });
        }

        // 5. Deferred actions
        for action in self.scheduler.drain_due(self.time.elapsed_secs) {
            self.run_deferred(action);
        }
    }

    fn run_deferred(&mut self, action: DeferredAction) {
        match action {
            DeferredAction::ReleaseTarget(id) => {
                let finished = self
                    .targets
                    .core_mut(id)
                    .is_some_and(|core| core.finish_removal());
                if !finished {
                    debug!(target_id = %id, "removal for stale target skipped");
                    return;
                }
                match self.targets.release(id) {
                    Ok(()) => self.events.push(SimEvent::TargetReturned { target: id }),
                    Err(err) => warn!(%err, "target release ignored"),
                }
            }
            DeferredAction::ReleaseProjectile(handle) => {
                if self.projectiles.get(handle).is_none() {
                    debug!(projectile = %handle, "post-hit release for stale projectile skipped");
                    return;
                }
                if self.projectiles.release(handle) {
                    self.events.push(SimEvent::ProjectileReleased {
                        projectile: handle,
                        reason: ReleaseReason::AfterHit,
                    });
                }
            }
            DeferredAction::Respawn { token } => {
                if let Some(report) =
                    self.coordinator
                        .on_respawn_due(token, &mut self.targets, &mut self.rng)
                {
                    self.record_spawn(report);
                }
            }
        }
    }

    fn end_session(&mut self, outcome: SessionOutcome) {
        let score = self.clock.score();
        info!(?outcome, score, "session ended");
        self.coordinator.reset();
        self.scheduler.cancel_all();
        self.sweep_pools();
        self.events.push(SimEvent::SessionEnded { outcome, score });
    }
}
