//! Bounded rejection sampling for spawn placement.
//!
//! A candidate is admissible when it keeps the configured distance from the
//! viewport center (the exclusion zone) and from every live entity (the
//! separation constraint). Exhausting the attempt cap reports failure; the
//! sampler never emits a violating placement.

use crate::config::{FieldConfig, SamplerShape};
use crate::entity::Entity;
use crate::rng::FieldRng;
use stardrift_core::{Vec2, Viewport};

pub struct PositionSampler {
    exclusion_radius: f32,
    separation: f32,
    attempts: u32,
    shape: SamplerShape,
}

impl PositionSampler {
    pub fn from_config(config: &FieldConfig) -> Self {
        Self {
            exclusion_radius: config.exclusion_radius,
            separation: config.separation,
            attempts: config.sample_attempts.max(1),
            shape: config.shape,
        }
    }

    /// Draw a placement satisfying both constraints, or `None` once the
    /// attempt cap is exhausted. The caller treats `None` as "skip this
    /// spawn", not as an error.
    pub fn sample(
        &self,
        viewport: &Viewport,
        existing: &[Entity],
        rng: &mut FieldRng,
    ) -> Option<Vec2> {
        for _ in 0..self.attempts {
            let candidate = self.candidate(viewport, rng);
            if self.admissible(candidate, viewport, existing) {
                return Some(candidate);
            }
        }
        None
    }

    fn candidate(&self, viewport: &Viewport, rng: &mut FieldRng) -> Vec2 {
        match self.shape {
            SamplerShape::Area { margin } => Vec2::new(
                rng.range_f32(margin, (viewport.width - margin).max(margin)),
                rng.range_f32(margin, (viewport.height - margin).max(margin)),
            ),
            SamplerShape::Rings { count, band } => {
                // Pick a ring, then a radius within its band, offset outward
                // from the exclusion disc
                let ring = rng.range_u32(0, count.saturating_sub(1)) as f32;
                let inner = self.exclusion_radius + ring * band;
                let radius = rng.range_f32(inner, inner + band);
                let angle = rng.range_f32(0.0, std::f32::consts::TAU);
                viewport.center() + Vec2::from_angle(angle) * radius
            }
        }
    }

    fn admissible(&self, p: Vec2, viewport: &Viewport, existing: &[Entity]) -> bool {
        if !viewport.contains(p) {
            return false;
        }
        if p.distance(viewport.center()) < self.exclusion_radius {
            return false;
        }
        existing
            .iter()
            .all(|e| e.position.distance(p) >= self.separation)
    }
}
