//! Scroll and resize handling for `LedgerGrid`.

use super::{GridEvent, LedgerGrid};
use crate::types::Record;

impl<R: Record> LedgerGrid<R> {
    /// The host's scroll container moved. Returns `true` if the offset
    /// changed.
    pub fn on_scroll(&mut self, scroll_top: f64, now_ms: f64) -> bool {
        let total = self.model.row_count();
        let previous = self.virtualizer.scroll_top();
        let applied = self.virtualizer.set_scroll_top(scroll_top, total);
        if (applied - previous).abs() <= f64::EPSILON {
            return false;
        }
        self.events.push(GridEvent::ScrollChanged { offset: applied });
        let window = self.virtualizer.window(total);
        self.highlight.note_scroll(now_ms, &window);
        self.needs_render = true;
        true
    }

    /// The container was resized (observed by the host).
    pub fn on_resize(&mut self, container_height: f64, now_ms: f64) {
        let total = self.model.row_count();
        let previous = self.virtualizer.scroll_top();
        self.virtualizer.resize(container_height, total);
        let scroll_top = self.virtualizer.scroll_top();
        if (scroll_top - previous).abs() > f64::EPSILON {
            self.events.push(GridEvent::ScrollChanged { offset: scroll_top });
        }
        let window = self.virtualizer.window(total);
        self.highlight.note_scroll(now_ms, &window);
        self.needs_render = true;
    }

    pub fn scroll_top(&self) -> f64 {
        self.virtualizer.scroll_top()
    }
}
