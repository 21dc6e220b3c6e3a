//! Per-frame lifecycle pass and state transitions.
//!
//! The frame pass is pure attribute math: given the current state and the
//! time spent in it, it derives opacity, scale, glitter, position, and size.
//! Discrete transitions (fade-in completion, pulse starts, fade-out) are
//! driven by scheduled commands in the engine; the helpers here guard each
//! transition so a late command against a moved-on entity is a no-op.

use crate::config::{FieldConfig, MotionModel};
use crate::entity::{Entity, GlitterPulse, LifecycleState};
use stardrift_core::{ease_in_out, lerp, pulse};

pub struct LifecycleController;

impl LifecycleController {
    /// Advance one entity's visual attributes to `now`. Runs once per frame
    /// for every live entity, in any state.
    pub fn advance(entity: &mut Entity, config: &FieldConfig, now: f64) {
        let in_state = (now - entity.state_since).max(0.0);

        match entity.state {
            LifecycleState::Spawning => {
                // Transient: insertion moves entities straight to FadingIn
                entity.opacity = 0.0;
                entity.scale = config.spawn_scale;
            }
            LifecycleState::FadingIn => {
                let t = ease_in_out((in_state / entity.fade_in.max(1e-6)) as f32);
                entity.opacity = entity.max_opacity * t;
                entity.scale = lerp(config.spawn_scale, 1.0, t);
            }
            LifecycleState::Active => {
                entity.opacity = entity.max_opacity;
                entity.scale = 1.0;
            }
            LifecycleState::FadingOut => {
                let t = ease_in_out((in_state / config.fade_out.max(1e-6)) as f32);
                entity.opacity = entity.fade_from_opacity * (1.0 - t);
                entity.scale = lerp(entity.fade_from_scale, config.spawn_scale, t);
            }
        }

        Self::advance_glitter(entity, now);
        Self::advance_motion(entity, config, now);

        entity.opacity = entity.opacity.clamp(0.0, entity.max_opacity);
    }

    /// FadingIn -> Active. Returns false for a stale or moved-on target.
    pub fn finish_fade_in(entity: &mut Entity, now: f64) -> bool {
        if entity.state != LifecycleState::FadingIn {
            return false;
        }
        entity.enter(LifecycleState::Active, now);
        entity.opacity = entity.max_opacity;
        entity.scale = 1.0;
        true
    }

    /// Any pre-fade state -> FadingOut. Leaving Active kills the glitter
    /// sub-loop: the pulse is dropped and late pulse commands no-op.
    pub fn begin_fade_out(entity: &mut Entity, now: f64) -> bool {
        if entity.state == LifecycleState::FadingOut {
            return false;
        }
        // Entities can expire mid fade-in; ease down from where they are,
        // never up to the steady-state values first
        entity.fade_from_opacity = entity.opacity;
        entity.fade_from_scale = entity.scale;
        entity.enter(LifecycleState::FadingOut, now);
        entity.pulse = None;
        entity.glitter = 1.0;
        true
    }

    /// Open a glitter window. Only Active entities glitter.
    pub fn start_pulse(entity: &mut Entity, now: f64, duration: f64, peak: f32) -> bool {
        if entity.state != LifecycleState::Active {
            return false;
        }
        entity.pulse = Some(GlitterPulse {
            started_at: now,
            duration: duration.max(1e-6),
            peak,
        });
        true
    }

    fn advance_glitter(entity: &mut Entity, now: f64) {
        if entity.state != LifecycleState::Active {
            entity.glitter = 1.0;
            return;
        }
        match entity.pulse {
            Some(p) => {
                let t = ((now - p.started_at) / p.duration) as f32;
                if t >= 1.0 {
                    entity.pulse = None;
                    entity.glitter = 1.0;
                } else {
                    // Eased in and back out within the window
                    entity.glitter = 1.0 + (p.peak - 1.0) * pulse(t);
                }
            }
            None => entity.glitter = 1.0,
        }
    }

    fn advance_motion(entity: &mut Entity, config: &FieldConfig, now: f64) {
        let age = entity.age(now).max(0.0) as f32;
        match config.motion {
            MotionModel::Static => {}
            MotionModel::Drift { .. } => {
                entity.position = entity.origin + entity.drift * age;
            }
            MotionModel::Approach { growth, .. } => {
                entity.position = entity.origin + entity.drift * age;
                entity.size = (entity.base_size * (1.0 + growth * age))
                    .min(entity.base_size * 3.0);
            }
        }
    }
}
