//! Field configuration: construction-time constants, with a sparse TOML
//! override parser for the app's per-screen presets.

use stardrift_core::{Result, StardriftError, Viewport};

/// How live entities move after spawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionModel {
    /// Position is fixed at the sampled spawn point (digit-field variant)
    Static,
    /// Position drifts from the spawn point along a random direction
    /// (traveling star field)
    Drift { speed_min: f32, speed_max: f32 },
    /// Drifting plus size growth over age, as if approaching the viewer.
    /// Growth is fractional size gain per second, capped at 3x base size.
    Approach {
        speed_min: f32,
        speed_max: f32,
        growth: f32,
    },
}

/// Where spawn candidates are drawn from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SamplerShape {
    /// Uniform within the viewport minus a margin on every edge
    Area { margin: f32 },
    /// Banded into `count` concentric rings offset outward from the
    /// exclusion radius, each `band` wide (ring-emanation variant)
    Rings { count: u32, band: f32 },
}

/// All engine constants. Built once, validated against the viewport at
/// engine construction; there is no runtime reconfiguration surface.
#[derive(Debug, Clone)]
pub struct FieldConfig {
    /// Hard pool capacity
    pub capacity: usize,
    /// Oldest-first eviction chunk; at least the overflow is evicted
    pub evict_chunk: usize,
    /// Seconds between spawn ticks
    pub spawn_interval: f64,
    pub spawn_batch_min: u32,
    pub spawn_batch_max: u32,
    /// Base per-unit insertion delay within a batch
    pub spawn_stagger: f64,
    /// Extra random delay added to each unit
    pub spawn_jitter: f64,
    /// Seconds between expiry scans
    pub expiry_interval: f64,
    /// No spawn within this distance of the viewport center
    pub exclusion_radius: f32,
    /// Minimum distance between any two live entities at spawn
    pub separation: f32,
    /// Rejection-sampling attempt cap
    pub sample_attempts: u32,
    pub lifespan_min: f64,
    pub lifespan_max: f64,
    pub fade_in_min: f64,
    pub fade_in_max: f64,
    pub fade_out: f64,
    /// Upper bound of the glitter multiplier band (lower bound is 1.0)
    pub glitter_peak: f32,
    pub glitter_period_min: f64,
    pub glitter_period_max: f64,
    pub glitter_pulse_min: f64,
    pub glitter_pulse_max: f64,
    pub size_min: f32,
    pub size_max: f32,
    pub opacity_min: f32,
    pub opacity_max: f32,
    /// Scale an entity is born at (eases up to 1.0 during fade-in)
    pub spawn_scale: f32,
    /// Weight per category; index i maps to category i + 1
    pub category_weights: Vec<f32>,
    pub motion: MotionModel,
    pub shape: SamplerShape,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::starfield()
    }
}

impl FieldConfig {
    /// Traveling star field: drifting entities spawned anywhere outside the
    /// center exclusion disc.
    pub fn starfield() -> Self {
        Self {
            capacity: 160,
            evict_chunk: 4,
            spawn_interval: 0.8,
            spawn_batch_min: 2,
            spawn_batch_max: 5,
            spawn_stagger: 0.06,
            spawn_jitter: 0.05,
            expiry_interval: 1.0,
            exclusion_radius: 120.0,
            separation: 24.0,
            sample_attempts: 20,
            lifespan_min: 6.0,
            lifespan_max: 12.0,
            fade_in_min: 0.4,
            fade_in_max: 0.9,
            fade_out: 0.6,
            glitter_peak: 1.8,
            glitter_period_min: 1.5,
            glitter_period_max: 4.0,
            glitter_pulse_min: 0.5,
            glitter_pulse_max: 0.9,
            size_min: 1.5,
            size_max: 3.5,
            opacity_min: 0.35,
            opacity_max: 0.9,
            spawn_scale: 0.4,
            category_weights: vec![1.0; 9],
            motion: MotionModel::Drift {
                speed_min: 8.0,
                speed_max: 20.0,
            },
            shape: SamplerShape::Area { margin: 16.0 },
        }
    }

    /// Emanating digit field: fixed positions banded into rings around the
    /// center, fewer and larger entities.
    pub fn digit_field() -> Self {
        Self {
            capacity: 48,
            evict_chunk: 4,
            spawn_interval: 1.2,
            spawn_batch_min: 1,
            spawn_batch_max: 3,
            spawn_stagger: 0.12,
            spawn_jitter: 0.08,
            expiry_interval: 1.0,
            exclusion_radius: 140.0,
            separation: 48.0,
            sample_attempts: 20,
            lifespan_min: 5.0,
            lifespan_max: 9.0,
            fade_in_min: 0.5,
            fade_in_max: 1.1,
            fade_out: 0.8,
            glitter_peak: 1.5,
            glitter_period_min: 2.0,
            glitter_period_max: 5.0,
            glitter_pulse_min: 0.6,
            glitter_pulse_max: 1.0,
            size_min: 10.0,
            size_max: 18.0,
            opacity_min: 0.4,
            opacity_max: 0.85,
            spawn_scale: 0.3,
            category_weights: vec![1.0; 9],
            motion: MotionModel::Static,
            shape: SamplerShape::Rings { count: 3, band: 60.0 },
        }
    }

    /// Apply sparse overrides from a TOML table; unknown keys are ignored,
    /// missing keys keep their preset value.
    pub fn apply_toml(&mut self, table: &toml::value::Table) {
        if let Some(v) = table.get("capacity") {
            self.capacity = v.as_integer().unwrap_or(self.capacity as i64).max(0) as usize;
        }
        if let Some(v) = table.get("evict_chunk") {
            self.evict_chunk = v.as_integer().unwrap_or(self.evict_chunk as i64).max(1) as usize;
        }
        if let Some(v) = table.get("spawn_interval") {
            self.spawn_interval = toml_f64(v, self.spawn_interval);
        }
        if let Some(v) = table.get("spawn_batch_min") {
            self.spawn_batch_min = v.as_integer().unwrap_or(self.spawn_batch_min as i64).max(0) as u32;
        }
        if let Some(v) = table.get("spawn_batch_max") {
            self.spawn_batch_max = v.as_integer().unwrap_or(self.spawn_batch_max as i64).max(0) as u32;
        }
        if let Some(v) = table.get("spawn_stagger") {
            self.spawn_stagger = toml_f64(v, self.spawn_stagger);
        }
        if let Some(v) = table.get("spawn_jitter") {
            self.spawn_jitter = toml_f64(v, self.spawn_jitter);
        }
        if let Some(v) = table.get("expiry_interval") {
            self.expiry_interval = toml_f64(v, self.expiry_interval);
        }
        if let Some(v) = table.get("exclusion_radius") {
            self.exclusion_radius = toml_f32(v, self.exclusion_radius);
        }
        if let Some(v) = table.get("separation") {
            self.separation = toml_f32(v, self.separation);
        }
        if let Some(v) = table.get("sample_attempts") {
            self.sample_attempts = v.as_integer().unwrap_or(self.sample_attempts as i64).max(1) as u32;
        }
        if let Some(v) = table.get("lifespan_min") {
            self.lifespan_min = toml_f64(v, self.lifespan_min);
        }
        if let Some(v) = table.get("lifespan_max") {
            self.lifespan_max = toml_f64(v, self.lifespan_max);
        }
        if let Some(v) = table.get("fade_in_min") {
            self.fade_in_min = toml_f64(v, self.fade_in_min);
        }
        if let Some(v) = table.get("fade_in_max") {
            self.fade_in_max = toml_f64(v, self.fade_in_max);
        }
        if let Some(v) = table.get("fade_out") {
            self.fade_out = toml_f64(v, self.fade_out);
        }
        if let Some(v) = table.get("glitter_peak") {
            self.glitter_peak = toml_f32(v, self.glitter_peak);
        }
        if let Some(v) = table.get("glitter_period_min") {
            self.glitter_period_min = toml_f64(v, self.glitter_period_min);
        }
        if let Some(v) = table.get("glitter_period_max") {
            self.glitter_period_max = toml_f64(v, self.glitter_period_max);
        }
        if let Some(v) = table.get("glitter_pulse_min") {
            self.glitter_pulse_min = toml_f64(v, self.glitter_pulse_min);
        }
        if let Some(v) = table.get("glitter_pulse_max") {
            self.glitter_pulse_max = toml_f64(v, self.glitter_pulse_max);
        }
        if let Some(v) = table.get("size_min") {
            self.size_min = toml_f32(v, self.size_min);
        }
        if let Some(v) = table.get("size_max") {
            self.size_max = toml_f32(v, self.size_max);
        }
        if let Some(v) = table.get("opacity_min") {
            self.opacity_min = toml_f32(v, self.opacity_min);
        }
        if let Some(v) = table.get("opacity_max") {
            self.opacity_max = toml_f32(v, self.opacity_max);
        }
        if let Some(v) = table.get("spawn_scale") {
            self.spawn_scale = toml_f32(v, self.spawn_scale);
        }
        if let Some(v) = table.get("category_weights") {
            if let Some(arr) = v.as_array() {
                self.category_weights = arr.iter().map(|w| toml_f32(w, 0.0)).collect();
            }
        }

        // Motion model
        if let Some(motion) = table.get("motion").and_then(|v| v.as_str()) {
            let speed_min = table.get("speed_min").map(|v| toml_f32(v, 8.0)).unwrap_or(8.0);
            let speed_max = table.get("speed_max").map(|v| toml_f32(v, 20.0)).unwrap_or(20.0);
            let growth = table.get("growth").map(|v| toml_f32(v, 0.1)).unwrap_or(0.1);
            self.motion = match motion {
                "drift" => MotionModel::Drift { speed_min, speed_max },
                "approach" => MotionModel::Approach {
                    speed_min,
                    speed_max,
                    growth,
                },
                _ => MotionModel::Static,
            };
        }

        // Sampler shape
        if let Some(shape) = table.get("shape").and_then(|v| v.as_str()) {
            match shape {
                "rings" => {
                    let count = table
                        .get("ring_count")
                        .and_then(|v| v.as_integer())
                        .unwrap_or(3)
                        .max(1) as u32;
                    let band = table.get("ring_band").map(|v| toml_f32(v, 60.0)).unwrap_or(60.0);
                    self.shape = SamplerShape::Rings { count, band };
                }
                _ => {
                    let margin = table.get("margin").map(|v| toml_f32(v, 16.0)).unwrap_or(16.0);
                    self.shape = SamplerShape::Area { margin };
                }
            }
        }
    }

    /// Parse a preset named by `base` ("starfield" or "digit_field") with
    /// sparse overrides from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let table: toml::value::Table = toml::from_str(s)?;
        let mut config = match table.get("base").and_then(|v| v.as_str()) {
            Some("digit_field") => Self::digit_field(),
            _ => Self::starfield(),
        };
        config.apply_toml(&table);
        Ok(config)
    }

    /// Reject configurations the sampler cannot satisfy. Checked once at
    /// engine construction; a passing config can still skip individual
    /// spawns, but cannot fail chronically by construction.
    pub fn validate(&self, viewport: &Viewport) -> Result<()> {
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return Err(StardriftError::InvalidConfig(format!(
                "viewport must have positive dimensions, got {}x{}",
                viewport.width, viewport.height
            )));
        }
        if self.capacity == 0 {
            return Err(StardriftError::InvalidConfig("capacity must be > 0".into()));
        }
        if self.evict_chunk == 0 {
            return Err(StardriftError::InvalidConfig("evict_chunk must be > 0".into()));
        }
        check_range("spawn_batch", self.spawn_batch_min as f64, self.spawn_batch_max as f64)?;
        check_range("lifespan", self.lifespan_min, self.lifespan_max)?;
        check_range("fade_in", self.fade_in_min, self.fade_in_max)?;
        check_range("glitter_period", self.glitter_period_min, self.glitter_period_max)?;
        check_range("glitter_pulse", self.glitter_pulse_min, self.glitter_pulse_max)?;
        check_range("size", self.size_min as f64, self.size_max as f64)?;
        check_range("opacity", self.opacity_min as f64, self.opacity_max as f64)?;
        if self.size_min <= 0.0 {
            return Err(StardriftError::InvalidConfig("size_min must be > 0".into()));
        }
        if self.opacity_min < 0.0 || self.opacity_max > 1.0 {
            return Err(StardriftError::ValueOutOfRange {
                field: "opacity".into(),
                min: 0.0,
                max: 1.0,
                value: self.opacity_max as f64,
            });
        }
        if self.spawn_interval <= 0.0 || self.expiry_interval <= 0.0 {
            return Err(StardriftError::InvalidConfig(
                "spawn_interval and expiry_interval must be > 0".into(),
            ));
        }
        if self.fade_out <= 0.0 {
            return Err(StardriftError::InvalidConfig("fade_out must be > 0".into()));
        }
        if self.glitter_peak < 1.0 {
            return Err(StardriftError::InvalidConfig(
                "glitter_peak must be >= 1.0".into(),
            ));
        }
        if self.category_weights.iter().all(|w| *w <= 0.0) {
            return Err(StardriftError::InvalidConfig(
                "category_weights must contain a positive weight".into(),
            ));
        }

        // Feasibility: `capacity` discs of radius separation/2 must fit the
        // spawnable region, or the attempt cap will exhaust routinely.
        let spawnable = self.spawnable_area(viewport);
        let per_entity = std::f32::consts::PI * (self.separation * 0.5).powi(2);
        let needed = per_entity * self.capacity as f32;
        if needed > spawnable {
            return Err(StardriftError::InvalidConfig(format!(
                "capacity {} with separation {} needs {:.0} units^2 but only {:.0} are spawnable",
                self.capacity, self.separation, needed, spawnable
            )));
        }
        Ok(())
    }

    /// Coarse area of the region positions can be drawn from
    fn spawnable_area(&self, viewport: &Viewport) -> f32 {
        let exclusion = std::f32::consts::PI * self.exclusion_radius.powi(2);
        match self.shape {
            SamplerShape::Area { margin } => {
                let w = (viewport.width - 2.0 * margin).max(0.0);
                let h = (viewport.height - 2.0 * margin).max(0.0);
                (w * h - exclusion).max(0.0)
            }
            SamplerShape::Rings { count, band } => {
                let outer = self.exclusion_radius + count as f32 * band;
                let annulus = std::f32::consts::PI * outer.powi(2) - exclusion;
                annulus.max(0.0).min(viewport.area())
            }
        }
    }
}

fn check_range(field: &str, min: f64, max: f64) -> Result<()> {
    if min < 0.0 || max < min {
        return Err(StardriftError::InvalidConfig(format!(
            "{field} range [{min}, {max}] is invalid"
        )));
    }
    Ok(())
}

fn toml_f32(v: &toml::Value, default: f32) -> f32 {
    v.as_float()
        .map(|f| f as f32)
        .or_else(|| v.as_integer().map(|i| i as f32))
        .unwrap_or(default)
}

fn toml_f64(v: &toml::Value, default: f64) -> f64 {
    v.as_float()
        .or_else(|| v.as_integer().map(|i| i as f64))
        .unwrap_or(default)
}
