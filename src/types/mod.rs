//! Data types for the grid: rows, columns, values and coordinates.

mod cell;
mod column;
mod json;

pub use cell::*;
pub use column::*;
pub use json::*;
