//! Entity construction: placement via the sampler, then randomized visual
//! attributes. A factory failure ("no admissible position") skips the
//! spawn unit; it is never an error.

use crate::config::{FieldConfig, MotionModel};
use crate::entity::{Entity, LifecycleState};
use crate::rng::FieldRng;
use crate::sampler::PositionSampler;
use stardrift_core::{EntityId, Vec2, Viewport};

pub struct EntityFactory {
    sampler: PositionSampler,
}

impl EntityFactory {
    pub fn new(config: &FieldConfig) -> Self {
        Self {
            sampler: PositionSampler::from_config(config),
        }
    }

    /// Build one entity at `now`, or `None` when the sampler's attempt cap
    /// exhausts against the current pool contents.
    pub fn create(
        &self,
        config: &FieldConfig,
        viewport: &Viewport,
        existing: &[Entity],
        rng: &mut FieldRng,
        now: f64,
    ) -> Option<Entity> {
        let origin = self.sampler.sample(viewport, existing, rng)?;

        // Weight index i maps to category i + 1
        let category = (rng.pick_weighted(&config.category_weights) + 1) as u8;
        let base_size = rng.range_f32(config.size_min, config.size_max);
        let max_opacity = rng.range_f32(config.opacity_min, config.opacity_max)
            * edge_attenuation(origin, viewport, config);
        let lifespan = rng.range_f64(config.lifespan_min, config.lifespan_max);
        let fade_in = rng.range_f64(config.fade_in_min, config.fade_in_max);
        let drift = match config.motion {
            MotionModel::Static => Vec2::ZERO,
            MotionModel::Drift { speed_min, speed_max }
            | MotionModel::Approach { speed_min, speed_max, .. } => {
                let angle = rng.range_f32(0.0, std::f32::consts::TAU);
                Vec2::from_angle(angle) * rng.range_f32(speed_min, speed_max)
            }
        };

        Some(Entity {
            id: EntityId::next(),
            origin,
            position: origin,
            base_size,
            size: base_size,
            category,
            max_opacity,
            opacity: 0.0,
            scale: config.spawn_scale,
            glitter: 1.0,
            born_at: now,
            lifespan,
            fade_in,
            drift,
            state: LifecycleState::Spawning,
            state_since: now,
            pulse: None,
            fade_from_opacity: max_opacity,
            fade_from_scale: 1.0,
        })
    }
}

/// Dim entities born right at the exclusion ring so the field does not form
/// a bright halo around the center content. Full opacity from half an
/// exclusion radius out.
fn edge_attenuation(p: Vec2, viewport: &Viewport, config: &FieldConfig) -> f32 {
    if config.exclusion_radius <= 0.0 {
        return 1.0;
    }
    let band = config.exclusion_radius * 0.5;
    let past_ring = p.distance(viewport.center()) - config.exclusion_radius;
    let t = (past_ring / band).clamp(0.0, 1.0);
    0.5 + 0.5 * t
}
