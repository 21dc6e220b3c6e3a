//! The field engine facade: owns the pool, the RNG, and the command queue,
//! and advances everything from a single `update(now)` entry point.
//!
//! All mutation happens on one logical timeline. The two periodic triggers
//! (spawn tick, expiry tick) and every deferred per-entity callback are
//! data in the command queue, drained in fire-time order by `update`.
//! `shutdown` cancels all pending work; a command whose target has been
//! evicted or completed its lifecycle fails its pool lookup and no-ops.

use crate::config::FieldConfig;
use crate::entity::{EntitySnapshot, LifecycleState};
use crate::factory::EntityFactory;
use crate::lifecycle::LifecycleController;
use crate::pool::EntityPool;
use crate::rng::FieldRng;
use crate::schedule::{Command, CommandQueue};
use log::{debug, info, warn};
use stardrift_core::{Result, Viewport};

/// Log a chronic-exhaustion warning every this many skipped spawns
const SKIP_WARN_EVERY: u64 = 64;

pub struct FieldEngine {
    config: FieldConfig,
    viewport: Viewport,
    pool: EntityPool,
    factory: EntityFactory,
    queue: CommandQueue,
    rng: FieldRng,
    next_spawn_at: f64,
    next_expiry_at: f64,
    started: bool,
    running: bool,
    skipped_spawns: u64,
}

impl FieldEngine {
    /// Validates the configuration against the viewport; unsatisfiable
    /// geometry is rejected here rather than degrading into chronic spawn
    /// skips at runtime.
    pub fn new(config: FieldConfig, viewport: Viewport, seed: u64) -> Result<Self> {
        config.validate(&viewport)?;
        let pool = EntityPool::new(config.capacity, config.evict_chunk);
        let factory = EntityFactory::new(&config);
        info!(
            "field engine up: capacity {} on {}x{}",
            config.capacity, viewport.width, viewport.height
        );
        Ok(Self {
            config,
            viewport,
            pool,
            factory,
            queue: CommandQueue::new(),
            rng: FieldRng::new(seed),
            next_spawn_at: 0.0,
            next_expiry_at: 0.0,
            started: false,
            running: true,
            skipped_spawns: 0,
        })
    }

    /// Advance the simulation to `now` (seconds, monotonic). Call once per
    /// animation frame. Order per update: periodic ticks enqueue work, due
    /// commands fire, then the per-frame lifecycle pass re-derives every
    /// entity's visual attributes.
    pub fn update(&mut self, now: f64) {
        if !self.running {
            return;
        }
        if !self.started {
            self.started = true;
            self.next_spawn_at = now;
            self.next_expiry_at = now + self.config.expiry_interval;
        }

        while now >= self.next_spawn_at {
            let tick_at = self.next_spawn_at;
            self.spawn_tick(tick_at);
            self.next_spawn_at += self.config.spawn_interval;
        }

        while now >= self.next_expiry_at {
            self.expiry_tick(now);
            self.next_expiry_at += self.config.expiry_interval;
        }

        // Commands run at their scheduled instant, not the frame time they
        // drained on; a slow frame that makes a whole staggered batch due at
        // once must still give every unit its own timestamp.
        while let Some((fire_at, command)) = self.queue.pop_due(now) {
            self.dispatch(command, fire_at);
        }

        for entity in self.pool.entities_mut() {
            LifecycleController::advance(entity, &self.config, now);
        }
    }

    /// Immutable render view, ordered by insertion. Taken fresh each frame.
    pub fn snapshot(&self) -> Vec<EntitySnapshot> {
        self.pool.snapshot()
    }

    /// Host view bounds changed. Live entities keep their positions; only
    /// future placements see the new bounds.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
        debug!("viewport resized to {width}x{height}");
    }

    /// Tear down: cancel every pending trigger and in-flight command and
    /// drop all live entities. Further updates are no-ops.
    pub fn shutdown(&mut self) {
        self.running = false;
        self.queue.clear();
        self.pool.clear();
        info!("field engine shut down");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn live_count(&self) -> usize {
        self.pool.len()
    }

    /// Spawn units dropped because the sampler's attempt cap exhausted
    pub fn skipped_spawns(&self) -> u64 {
        self.skipped_spawns
    }

    /// One spawn tick: draw a batch size and stagger the units out with
    /// monotonically increasing delays plus per-unit jitter, so no two
    /// insertions land on the same instant.
    fn spawn_tick(&mut self, at: f64) {
        let batch = self
            .rng
            .range_u32(self.config.spawn_batch_min, self.config.spawn_batch_max);
        for i in 0..batch {
            let delay = self.config.spawn_stagger * (i + 1) as f64
                + self.rng.range_f64(0.0, self.config.spawn_jitter.max(1e-9));
            self.queue.schedule(at + delay, Command::SpawnUnit);
        }
    }

    /// One expiry scan: entities past their lifespan begin fading out and
    /// get a removal command; they stay visible-but-fading until it fires.
    fn expiry_tick(&mut self, now: f64) {
        let mut expired = Vec::new();
        for entity in self.pool.entities_mut() {
            if entity.expired(now) && LifecycleController::begin_fade_out(entity, now) {
                expired.push(entity.id);
            }
        }
        for id in expired {
            self.queue
                .schedule(now + self.config.fade_out, Command::FinishFadeOut(id));
        }
    }

    /// `at` is the command's scheduled fire time; birth timestamps, state
    /// clocks, and follow-up scheduling all anchor on it.
    fn dispatch(&mut self, command: Command, at: f64) {
        match command {
            Command::SpawnUnit => self.spawn_unit(at),
            Command::FinishFadeIn(id) => {
                let Some(entity) = self.pool.get_mut(id) else {
                    return;
                };
                if LifecycleController::finish_fade_in(entity, at) {
                    let period = self
                        .rng
                        .range_f64(self.config.glitter_period_min, self.config.glitter_period_max);
                    self.queue.schedule(at + period, Command::GlitterPulse(id));
                }
            }
            Command::GlitterPulse(id) => {
                let Some(entity) = self.pool.get_mut(id) else {
                    return;
                };
                let duration = self
                    .rng
                    .range_f64(self.config.glitter_pulse_min, self.config.glitter_pulse_max);
                let peak = self.rng.range_f32(1.0, self.config.glitter_peak);
                if LifecycleController::start_pulse(entity, at, duration, peak) {
                    let period = self
                        .rng
                        .range_f64(self.config.glitter_period_min, self.config.glitter_period_max);
                    self.queue
                        .schedule(at + duration + period, Command::GlitterPulse(id));
                }
            }
            Command::FinishFadeOut(id) => {
                // Only delete targets still on the fade-out path; anything
                // else is a stale handle
                if self
                    .pool
                    .get(id)
                    .is_some_and(|e| e.state == LifecycleState::FadingOut)
                {
                    self.pool.remove(id);
                }
            }
        }
    }

    fn spawn_unit(&mut self, at: f64) {
        let created = self.factory.create(
            &self.config,
            &self.viewport,
            self.pool.entities(),
            &mut self.rng,
            at,
        );
        let Some(mut entity) = created else {
            self.skipped_spawns += 1;
            if self.skipped_spawns % SKIP_WARN_EVERY == 0 {
                warn!(
                    "position sampling exhausted {} times; configuration may be too dense",
                    self.skipped_spawns
                );
            }
            return;
        };

        // Spawning -> FadingIn immediately upon insertion
        entity.enter(LifecycleState::FadingIn, at);
        let id = entity.id;
        let fade_in = entity.fade_in;
        let evicted = self.pool.insert(entity);
        if !evicted.is_empty() {
            // Forced eviction skips the fade path; pending commands against
            // these ids become stale and no-op when they fire
            debug!("capacity eviction removed {} entities", evicted.len());
        }
        self.queue.schedule(at + fade_in, Command::FinishFadeIn(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MotionModel, SamplerShape};
    use stardrift_core::EntityId;

    /// Small, fully pinned config: fixed batch and lifespan, tiny exclusion
    /// zone, static motion, chunk of 1 so eviction counts are exact.
    fn test_config() -> FieldConfig {
        let mut config = FieldConfig::starfield();
        config.capacity = 10;
        config.evict_chunk = 1;
        config.spawn_interval = 1.0;
        config.spawn_batch_min = 4;
        config.spawn_batch_max = 4;
        config.spawn_stagger = 0.01;
        config.spawn_jitter = 0.005;
        config.expiry_interval = 1.0;
        config.exclusion_radius = 10.0;
        config.separation = 2.0;
        config.lifespan_min = 2.0;
        config.lifespan_max = 2.0;
        config.fade_in_min = 0.1;
        config.fade_in_max = 0.2;
        config.fade_out = 0.5;
        config.motion = MotionModel::Static;
        config.shape = SamplerShape::Area { margin: 5.0 };
        config
    }

    fn drive(engine: &mut FieldEngine, from: f64, to: f64, step: f64) {
        let mut t = from;
        while t <= to {
            engine.update(t);
            t += step;
        }
    }

    #[test]
    fn capacity_holds_under_sustained_overspawn() {
        // 4 creations per 1s tick against capacity 10, lifespan 2s: 12
        // attempts in 3 ticks must never push the pool past 10, and the two
        // oldest must be gone once the third batch lands.
        let mut engine = FieldEngine::new(test_config(), Viewport::new(800.0, 800.0), 42).unwrap();

        let mut t = 0.0;
        let mut first_batch: Vec<EntityId> = Vec::new();
        while t <= 2.5 {
            engine.update(t);
            assert!(engine.live_count() <= 10, "pool over capacity at t={t}");
            if first_batch.is_empty() && engine.live_count() == 4 {
                first_batch = engine.snapshot().iter().map(|s| s.id).collect();
            }
            t += 0.01;
        }

        assert_eq!(engine.live_count(), 10);
        assert_eq!(first_batch.len(), 4);
        // Two oldest of the first batch were force-evicted by the third
        let live: Vec<EntityId> = engine.snapshot().iter().map(|s| s.id).collect();
        assert!(!live.contains(&first_batch[0]));
        assert!(!live.contains(&first_batch[1]));
    }

    #[test]
    fn expired_entities_fade_then_leave_within_the_bound() {
        let mut config = test_config();
        config.capacity = 40;
        config.expiry_interval = 0.1;
        let lifespan = config.lifespan_max;
        let fade_out = config.fade_out;
        let mut engine = FieldEngine::new(config, Viewport::new(800.0, 800.0), 7).unwrap();

        let mut t = 0.0;
        while t <= 8.0 {
            engine.update(t);
            for e in engine.pool.entities() {
                // lifespan + fade-out + one expiry interval + a step of slack
                assert!(
                    e.age(t) <= lifespan + fade_out + 0.1 + 0.05,
                    "entity overstayed at t={t}"
                );
            }
            t += 0.02;
        }
        // Population kept turning over the whole run
        assert!(engine.live_count() > 0);
    }

    #[test]
    fn live_entities_keep_exclusion_and_separation() {
        let config = test_config();
        let exclusion = config.exclusion_radius;
        let separation = config.separation;
        let mut engine = FieldEngine::new(config, Viewport::new(800.0, 800.0), 13).unwrap();
        let center = Viewport::new(800.0, 800.0).center();

        let mut t = 0.0;
        while t <= 3.0 {
            engine.update(t);
            let snap = engine.snapshot();
            for (i, a) in snap.iter().enumerate() {
                assert!(a.position.distance(center) >= exclusion);
                for b in snap.iter().skip(i + 1) {
                    assert!(a.position.distance(b.position) >= separation);
                }
            }
            t += 0.05;
        }
    }

    #[test]
    fn opacity_stays_within_bounds_every_frame() {
        let mut engine = FieldEngine::new(test_config(), Viewport::new(800.0, 800.0), 3).unwrap();
        let mut t = 0.0;
        while t <= 4.0 {
            engine.update(t);
            for e in engine.pool.entities() {
                assert!(e.opacity >= 0.0 && e.opacity <= e.max_opacity);
                assert!(e.max_opacity <= 1.0);
                assert!(e.size > 0.0);
            }
            t += 0.03;
        }
    }

    #[test]
    fn batch_spawn_timestamps_are_pairwise_distinct() {
        // Coarse 0.1s frames: the whole staggered batch (delays of ~0.01s
        // each) becomes due inside one update, so this only passes if each
        // unit is dispatched at its own fire time rather than the frame time.
        let mut engine = FieldEngine::new(test_config(), Viewport::new(800.0, 800.0), 99).unwrap();
        drive(&mut engine, 0.0, 0.5, 0.1);

        let born: Vec<f64> = engine.pool.entities().iter().map(|e| e.born_at).collect();
        assert!(born.len() >= 3);
        for (i, a) in born.iter().enumerate() {
            for b in born.iter().skip(i + 1) {
                assert_ne!(a, b, "two entities spawned in lockstep: {born:?}");
            }
        }
    }

    #[test]
    fn stale_commands_are_no_ops() {
        let mut engine = FieldEngine::new(test_config(), Viewport::new(800.0, 800.0), 5).unwrap();
        drive(&mut engine, 0.0, 0.5, 0.01);
        let count = engine.live_count();

        // Commands against ids that never existed, and against a removed id
        let ghost = EntityId::from_raw(u64::MAX);
        engine.queue.schedule(0.6, Command::FinishFadeIn(ghost));
        engine.queue.schedule(0.6, Command::GlitterPulse(ghost));
        engine.queue.schedule(0.6, Command::FinishFadeOut(ghost));
        let victim = engine.snapshot()[0].id;
        engine.pool.remove(victim);
        engine.queue.schedule(0.6, Command::GlitterPulse(victim));

        engine.update(0.61);
        assert_eq!(engine.live_count(), count - 1);
    }

    #[test]
    fn shutdown_cancels_pending_work() {
        let mut engine = FieldEngine::new(test_config(), Viewport::new(800.0, 800.0), 21).unwrap();
        drive(&mut engine, 0.0, 1.2, 0.01);
        assert!(engine.live_count() > 0);

        engine.shutdown();
        assert!(!engine.is_running());
        assert_eq!(engine.live_count(), 0);
        assert!(engine.queue.is_empty());

        // Later updates must not resurrect anything
        engine.update(5.0);
        engine.update(6.0);
        assert_eq!(engine.live_count(), 0);
        assert!(engine.snapshot().is_empty());
    }

    #[test]
    fn glitter_runs_only_while_active() {
        let mut config = test_config();
        config.glitter_period_min = 0.2;
        config.glitter_period_max = 0.4;
        config.glitter_pulse_min = 0.2;
        config.glitter_pulse_max = 0.3;
        let peak = config.glitter_peak;
        let mut engine = FieldEngine::new(config, Viewport::new(800.0, 800.0), 31).unwrap();

        let mut saw_glitter = false;
        let mut t = 0.0;
        while t <= 3.0 {
            engine.update(t);
            for e in engine.pool.entities() {
                assert!(e.glitter >= 1.0 && e.glitter <= peak);
                if e.state != LifecycleState::Active {
                    assert_eq!(e.glitter, 1.0);
                } else if e.glitter > 1.0 {
                    saw_glitter = true;
                }
            }
            t += 0.01;
        }
        assert!(saw_glitter, "no glitter pulse ever landed");
    }

    #[test]
    fn unsatisfiable_config_is_rejected_at_construction() {
        let mut config = test_config();
        config.separation = 500.0;
        assert!(FieldEngine::new(config, Viewport::new(390.0, 844.0), 1).is_err());
    }

    #[test]
    fn sampling_exhaustion_degrades_to_skips() {
        // Valid at construction, then shrink the viewport so the exclusion
        // disc swallows it: spawns skip, nothing panics
        let mut engine = FieldEngine::new(test_config(), Viewport::new(800.0, 800.0), 11).unwrap();
        engine.resize(15.0, 15.0);
        drive(&mut engine, 0.0, 3.0, 0.05);
        assert!(engine.skipped_spawns() > 0);
        assert_eq!(engine.live_count(), 0);
    }
}
