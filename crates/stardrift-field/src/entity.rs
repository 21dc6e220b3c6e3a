//! The visual entity record and its render snapshot

use serde::Serialize;
use stardrift_core::{EntityId, Vec2};

/// Visual lifecycle of one entity. There is no `Removed` variant: removal
/// deletes the record from the pool rather than marking it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Just constructed, not yet inserted
    Spawning,
    /// Easing opacity up to `max_opacity` and scale up to 1.0
    FadingIn,
    /// Steady state; the glitter sub-loop runs only here
    Active,
    /// Easing opacity down to 0 before deletion
    FadingOut,
}

/// One in-flight glitter perturbation window
#[derive(Debug, Clone, Copy)]
pub struct GlitterPulse {
    pub started_at: f64,
    pub duration: f64,
    /// Multiplier at the pulse apex; the band is [1.0, peak]
    pub peak: f32,
}

/// One ephemeral visual particle managed by the engine.
///
/// The engine stores only simulation attributes. `category` is an opaque
/// label the rendering collaborator resolves to a color or symbol.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    /// Sampled spawn point; drifting models re-derive `position` from it
    pub origin: Vec2,
    pub position: Vec2,
    pub base_size: f32,
    pub size: f32,
    pub category: u8,
    pub max_opacity: f32,
    pub opacity: f32,
    pub scale: f32,
    pub glitter: f32,
    pub born_at: f64,
    pub lifespan: f64,
    /// Per-entity jittered fade-in duration
    pub fade_in: f64,
    /// Drift direction scaled by speed (units per second)
    pub drift: Vec2,
    pub state: LifecycleState,
    /// When the current state was entered
    pub state_since: f64,
    pub pulse: Option<GlitterPulse>,
    /// Opacity and scale at the instant fade-out began; the fade eases
    /// down from wherever the entity visually was, which may be mid
    /// fade-in rather than the steady state
    pub fade_from_opacity: f32,
    pub fade_from_scale: f32,
}

impl Entity {
    pub fn age(&self, now: f64) -> f64 {
        now - self.born_at
    }

    pub fn expired(&self, now: f64) -> bool {
        self.age(now) > self.lifespan
    }

    /// Move to a new lifecycle state, resetting the state clock
    pub fn enter(&mut self, state: LifecycleState, now: f64) {
        self.state = state;
        self.state_since = now;
    }
}

/// Read-only per-entity view handed to the renderer each frame
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub position: Vec2,
    pub size: f32,
    pub opacity: f32,
    pub scale: f32,
    pub glitter: f32,
    pub category: u8,
}

impl EntitySnapshot {
    pub fn of(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            position: entity.position,
            size: entity.size,
            opacity: entity.opacity,
            scale: entity.scale,
            glitter: entity.glitter,
            category: entity.category,
        }
    }
}
