//! Row virtualization: visible index window, padding, and scroll targets.

use serde::Serialize;

use crate::config::GridConfig;

/// Rows to render plus the spacer heights that keep the total scroll height
/// equal to `total_rows * row_height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualWindow {
    /// First rendered row (inclusive).
    pub start: usize,
    /// One past the last rendered row.
    pub end: usize,
    /// Spacer height above the first rendered row.
    pub top_padding: f64,
    /// Spacer height below the last rendered row.
    pub bottom_padding: f64,
    /// False when every row renders directly.
    pub virtualized: bool,
}

impl VirtualWindow {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, row: usize) -> bool {
        row >= self.start && row < self.end
    }

    pub fn rows(&self) -> std::ops::Range<usize> {
        self.start..self.end.max(self.start)
    }
}

/// Float-to-index conversion for values already known to be finite and
/// non-negative.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_index(x: f64) -> usize {
    if x.is_finite() && x > 0.0 {
        x as usize
    } else {
        0
    }
}

/// Compute the visible window.
///
/// ```text
/// start  = max(0, floor(S/H) - O)              (clamped to N)
/// end    = min(N, start + ceil(C/H) + 2*O)
/// top    = start * H
/// bottom = max(0, N*H - end*H)
/// ```
///
/// A container that has not been laid out yet (`C <= 0`), a non-positive row
/// height, or any non-finite input yields an empty window rather than a
/// negative or NaN range.
pub fn compute_window(
    total_rows: usize,
    row_height: f64,
    container_height: f64,
    scroll_top: f64,
    overscan: usize,
) -> VirtualWindow {
    if !(row_height.is_finite() && row_height > 0.0) {
        return VirtualWindow {
            start: 0,
            end: 0,
            top_padding: 0.0,
            bottom_padding: 0.0,
            virtualized: true,
        };
    }
    if !(container_height.is_finite() && container_height > 0.0) {
        return VirtualWindow {
            start: 0,
            end: 0,
            top_padding: 0.0,
            bottom_padding: total_rows as f64 * row_height,
            virtualized: true,
        };
    }
    let scroll_top = if scroll_top.is_finite() { scroll_top.max(0.0) } else { 0.0 };

    let first_visible = to_index((scroll_top / row_height).floor());
    let start = first_visible.saturating_sub(overscan).min(total_rows);
    let visible = to_index((container_height / row_height).ceil());
    let end = start
        .saturating_add(visible)
        .saturating_add(overscan.saturating_mul(2))
        .min(total_rows);

    VirtualWindow {
        start,
        end,
        top_padding: start as f64 * row_height,
        bottom_padding: (total_rows - end) as f64 * row_height,
        virtualized: true,
    }
}

/// Scroll state of the grid body plus the parameters the window is computed
/// from.
#[derive(Debug, Clone)]
pub struct Virtualizer {
    row_height: f64,
    overscan: usize,
    threshold: usize,
    container_height: f64,
    scroll_top: f64,
}

impl Virtualizer {
    pub fn new(config: &GridConfig) -> Self {
        Self {
            row_height: config.row_height,
            overscan: config.overscan,
            threshold: config.virtualization_threshold,
            container_height: 0.0,
            scroll_top: 0.0,
        }
    }

    pub fn row_height(&self) -> f64 {
        self.row_height
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    pub fn container_height(&self) -> f64 {
        self.container_height
    }

    /// Whether `total_rows` is large enough to virtualize.
    pub fn is_active(&self, total_rows: usize) -> bool {
        total_rows >= self.threshold
    }

    pub fn window(&self, total_rows: usize) -> VirtualWindow {
        if !self.is_active(total_rows) {
            return VirtualWindow {
                start: 0,
                end: total_rows,
                top_padding: 0.0,
                bottom_padding: 0.0,
                virtualized: false,
            };
        }
        compute_window(
            total_rows,
            self.row_height,
            self.container_height,
            self.scroll_top,
            self.overscan,
        )
    }

    pub fn total_height(&self, total_rows: usize) -> f64 {
        if self.row_height.is_finite() && self.row_height > 0.0 {
            total_rows as f64 * self.row_height
        } else {
            0.0
        }
    }

    /// Largest scroll offset that still fills the viewport.
    pub fn max_scroll(&self, total_rows: usize) -> f64 {
        let container = if self.container_height.is_finite() {
            self.container_height.max(0.0)
        } else {
            0.0
        };
        (self.total_height(total_rows) - container).max(0.0)
    }

    fn clamp_scroll(&self, offset: f64, total_rows: usize) -> f64 {
        if !offset.is_finite() {
            return 0.0;
        }
        offset.clamp(0.0, self.max_scroll(total_rows))
    }

    /// Record a scroll offset reported by the host. Returns the stored
    /// (clamped) value.
    pub fn set_scroll_top(&mut self, offset: f64, total_rows: usize) -> f64 {
        self.scroll_top = self.clamp_scroll(offset, total_rows);
        self.scroll_top
    }

    /// Record a new container height. Non-finite or negative heights count as
    /// "not laid out yet".
    pub fn resize(&mut self, container_height: f64, total_rows: usize) {
        self.container_height = if container_height.is_finite() {
            container_height.max(0.0)
        } else {
            0.0
        };
        self.scroll_top = self.clamp_scroll(self.scroll_top, total_rows);
    }

    /// Offset that vertically centers `row` in the viewport:
    /// `row*H - C/2 + H/2`, clamped to `[0, N*H - C]`.
    pub fn centered_offset(&self, row: usize, total_rows: usize) -> f64 {
        let raw = row as f64 * self.row_height - self.container_height / 2.0
            + self.row_height / 2.0;
        self.clamp_scroll(raw, total_rows)
    }

    /// Scroll so `row` is centered; returns the new offset.
    pub fn scroll_to_center(&mut self, row: usize, total_rows: usize) -> f64 {
        self.scroll_top = self.centered_offset(row, total_rows);
        self.scroll_top
    }

    /// Scroll the minimum distance that brings `row` fully into view.
    /// Returns the new offset if the scroll position changed.
    pub fn scroll_into_view(&mut self, row: usize, total_rows: usize) -> Option<f64> {
        let top = row as f64 * self.row_height;
        let bottom = top + self.row_height;
        let target = if top < self.scroll_top {
            top
        } else if bottom > self.scroll_top + self.container_height {
            bottom - self.container_height
        } else {
            return None;
        };
        let target = self.clamp_scroll(target, total_rows);
        if (target - self.scroll_top).abs() > f64::EPSILON {
            self.scroll_top = target;
            Some(target)
        } else {
            None
        }
    }
}
