//! Stardrift Field - procedural cosmic-field particle simulation
//!
//! Drives animated background fields (traveling star fields, emanating
//! digit fields) by spawning, positioning, aging, and retiring a bounded
//! population of ephemeral visual entities:
//! - Bounded rejection sampling for placement (center exclusion + minimum
//!   separation)
//! - Insertion-ordered pool with a hard capacity and oldest-first chunked
//!   eviction
//! - Per-entity lifecycle state machine with independently jittered timing
//! - All deferred work carried as scheduled commands processed by a single
//!   `update` loop, so timing is fully testable with a virtual clock
//!
//! The engine is renderer-agnostic: each frame the host reads an immutable
//! [`snapshot`](engine::FieldEngine::snapshot) and paints it however it
//! likes. Categories are opaque labels; resolving them to colors or symbols
//! is the renderer's business.

pub mod clock;
pub mod config;
pub mod engine;
pub mod entity;
pub mod factory;
pub mod lifecycle;
pub mod pool;
pub mod rng;
pub mod sampler;
pub mod schedule;

pub use clock::FrameClock;
pub use config::{FieldConfig, MotionModel, SamplerShape};
pub use engine::FieldEngine;
pub use entity::{Entity, EntitySnapshot, GlitterPulse, LifecycleState};
pub use pool::EntityPool;
pub use rng::FieldRng;
pub use sampler::PositionSampler;
