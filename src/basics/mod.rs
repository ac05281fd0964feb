//! Primitive values and control flow.

pub mod control;
pub mod primitives;
