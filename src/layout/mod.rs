//! Layout engine for the grid body.
//!
//! This module handles:
//! - Computing the visible row window for a scroll offset and container height
//! - Padding that keeps the scrollbar exact while only the window renders
//! - Scroll targets for centering or revealing a row

mod virtualizer;

pub use virtualizer::{compute_window, VirtualWindow, Virtualizer};
