//! Render output of the grid.
//!
//! The grid does not draw; it produces a [`RenderFrame`] for the current
//! window that a DOM, canvas or terminal backend paints. The frame doubles as
//! the `(row, col) -> cell` arena used by clipboard copy and highlight
//! resolution, so nothing ever looks cells up by string key.

mod frame;

pub use frame::{CellFlags, RenderFrame, RenderedCell};
