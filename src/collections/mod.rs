//! Arrays, maps and slices.

pub mod arrays;
pub mod maps;
pub mod slices;
