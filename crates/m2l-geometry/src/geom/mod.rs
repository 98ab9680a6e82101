//! Core geometry modules.

pub mod bounds;
pub mod point;
pub mod shape;
pub mod stats;
