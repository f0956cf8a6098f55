//! Geometry adapters and input validation shared by both tiling schemes.

pub mod geometry;
pub mod validation;
