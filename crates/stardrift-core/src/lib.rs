//! Stardrift Core - foundational types for the cosmic-field engine
//!
//! This crate provides the types the field simulation is built on:
//! - `EntityId` - stable identifiers for live field entities
//! - `Vec2`, `Viewport` - 2D viewport geometry
//! - Easing helpers for fade and glitter animation
//! - Error types and Result alias

mod ease;
mod error;
mod geom;
mod id;

pub use ease::{ease_in_out, lerp, pulse};
pub use error::{Result, StardriftError};
pub use geom::{Vec2, Viewport};
pub use id::EntityId;
