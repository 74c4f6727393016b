//! "Go to row" deep links: scroll the target row to the middle of the
//! viewport, wait until it is actually rendered, then blink it.
//!
//! Every accepted request takes a fresh [`HighlightToken`]. Any delayed step
//! (render wait, settle wait, blink expiry) is only applied while its token
//! is still current, so a newer request fully suppresses an older one.

use serde::{Deserialize, Serialize};

use crate::layout::{VirtualWindow, Virtualizer};
use crate::model::GridModel;
use crate::types::{CellCoord, Record, RowId};

/// One-shot request to reveal and flash a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightRequest {
    pub row_id: RowId,
    #[serde(default)]
    pub column_key: Option<String>,
}

impl HighlightRequest {
    pub fn row(row_id: impl Into<RowId>) -> Self {
        Self {
            row_id: row_id.into(),
            column_key: None,
        }
    }

    #[must_use]
    pub fn with_column(mut self, column_key: impl Into<String>) -> Self {
        self.column_key = Some(column_key.into());
        self
    }
}

/// Generation of a highlight sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighlightToken(u64);

#[derive(Debug, Clone, PartialEq)]
struct Target {
    row_id: RowId,
    coord: CellCoord,
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    /// All rows render directly; wait for the next frame that has the row.
    AwaitingRender { token: HighlightToken, target: Target },
    /// Virtualized; wait for scrolling to go quiet and a frame with the row.
    AwaitingSettle {
        token: HighlightToken,
        target: Target,
        settle_at_ms: f64,
        rendered: bool,
    },
    Blinking {
        token: HighlightToken,
        target: Target,
        until_ms: f64,
    },
}

/// Result of accepting a request: where the viewport should scroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightScroll {
    pub token: HighlightToken,
    pub offset: f64,
}

#[derive(Debug)]
pub struct HighlightController {
    generation: u64,
    phase: Phase,
    blink_ms: f64,
    settle_ms: f64,
}

impl HighlightController {
    pub fn new(blink_ms: f64, settle_ms: f64) -> Self {
        Self {
            generation: 0,
            phase: Phase::Idle,
            blink_ms,
            settle_ms,
        }
    }

    /// Resolve `request` against the current dataset and scroll the target
    /// row to the center. An unknown row id is a silent no-op that leaves
    /// any in-flight highlight alone.
    pub fn request<R: Record>(
        &mut self,
        request: &HighlightRequest,
        model: &GridModel<R>,
        virtualizer: &mut Virtualizer,
        now_ms: f64,
    ) -> Option<HighlightScroll> {
        let Some(row) = model.index_of(&request.row_id) else {
            tracing::debug!(row = %request.row_id, "highlight target not in dataset");
            return None;
        };
        let col = request
            .column_key
            .as_deref()
            .and_then(|key| model.column_index(key))
            .unwrap_or(0);

        self.generation += 1;
        let token = HighlightToken(self.generation);
        let total = model.row_count();
        let offset = virtualizer.scroll_to_center(row, total);
        let target = Target {
            row_id: request.row_id.clone(),
            coord: CellCoord::new(row, col),
        };
        self.phase = if virtualizer.is_active(total) {
            Phase::AwaitingSettle {
                token,
                target,
                settle_at_ms: now_ms + self.settle_ms,
                rendered: false,
            }
        } else {
            Phase::AwaitingRender { token, target }
        };
        tracing::debug!(row, offset, generation = self.generation, "highlight scheduled");
        Some(HighlightScroll { token, offset })
    }

    pub fn current_token(&self) -> Option<HighlightToken> {
        match &self.phase {
            Phase::Idle => None,
            Phase::AwaitingRender { token, .. }
            | Phase::AwaitingSettle { token, .. }
            | Phase::Blinking { token, .. } => Some(*token),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(
            self.phase,
            Phase::AwaitingRender { .. } | Phase::AwaitingSettle { .. }
        )
    }

    /// Row currently blinking.
    pub fn blinking_row(&self, now_ms: f64) -> Option<usize> {
        match &self.phase {
            Phase::Blinking { target, until_ms, .. } if now_ms < *until_ms => {
                Some(target.coord.row)
            }
            _ => None,
        }
    }

    /// When the host should next call [`Self::fire`] (or `tick`).
    pub fn next_deadline(&self) -> Option<(HighlightToken, f64)> {
        match &self.phase {
            Phase::AwaitingSettle { token, settle_at_ms, .. } => Some((*token, *settle_at_ms)),
            Phase::Blinking { token, until_ms, .. } => Some((*token, *until_ms)),
            _ => None,
        }
    }

    /// A scroll event arrived: push the settle deadline out and require a
    /// fresh frame. A blink whose row scrolled out of the window ends.
    pub fn note_scroll(&mut self, now_ms: f64, window: &VirtualWindow) {
        match &mut self.phase {
            Phase::AwaitingSettle { settle_at_ms, rendered, .. } => {
                *settle_at_ms = now_ms + self.settle_ms;
                *rendered = false;
            }
            Phase::Blinking { target, .. } if !window.contains(target.coord.row) => {
                self.phase = Phase::Idle;
            }
            _ => {}
        }
    }

    /// A frame covering `window` was rendered. Returns the coordinate to
    /// select if the blink starts now.
    pub fn on_frame(&mut self, window: &VirtualWindow, now_ms: f64) -> Option<CellCoord> {
        match &mut self.phase {
            Phase::AwaitingRender { target, .. } if window.contains(target.coord.row) => {
                self.start_blink(now_ms)
            }
            Phase::AwaitingSettle { target, rendered, .. } => {
                *rendered = window.contains(target.coord.row);
                None
            }
            _ => None,
        }
    }

    /// Host timer callback carrying the token it was scheduled with. Stale
    /// tokens are dropped without touching state.
    pub fn fire(&mut self, token: HighlightToken, now_ms: f64) -> HighlightTick {
        if self.current_token() != Some(token) {
            return HighlightTick::default();
        }
        self.tick(now_ms)
    }

    /// Advance timed phases to `now_ms`.
    pub fn tick(&mut self, now_ms: f64) -> HighlightTick {
        match &self.phase {
            Phase::AwaitingSettle { settle_at_ms, rendered: true, .. }
                if now_ms >= *settle_at_ms =>
            {
                HighlightTick {
                    select: self.start_blink(now_ms),
                    changed: true,
                }
            }
            Phase::Blinking { until_ms, .. } if now_ms >= *until_ms => {
                self.phase = Phase::Idle;
                HighlightTick {
                    select: None,
                    changed: true,
                }
            }
            _ => HighlightTick::default(),
        }
    }

    fn start_blink(&mut self, now_ms: f64) -> Option<CellCoord> {
        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        let (token, target) = match phase {
            Phase::AwaitingRender { token, target } | Phase::AwaitingSettle { token, target, .. } => {
                (token, target)
            }
            other => {
                self.phase = other;
                return None;
            }
        };
        let coord = target.coord;
        tracing::debug!(row = coord.row, "highlight blink started");
        self.phase = Phase::Blinking {
            token,
            target,
            until_ms: now_ms + self.blink_ms,
        };
        Some(coord)
    }

    /// Re-resolve the target after the row order changed; drop it if the row
    /// no longer exists.
    pub fn remap(&mut self, index_of: impl Fn(&RowId) -> Option<usize>) {
        let target = match &mut self.phase {
            Phase::Idle => return,
            Phase::AwaitingRender { target, .. }
            | Phase::AwaitingSettle { target, .. }
            | Phase::Blinking { target, .. } => target,
        };
        match index_of(&target.row_id) {
            Some(row) => target.coord.row = row,
            None => self.phase = Phase::Idle,
        }
    }

    /// Drop whatever is in flight. Returns `false` if already idle.
    pub fn cancel(&mut self) -> bool {
        let active = !matches!(self.phase, Phase::Idle);
        self.phase = Phase::Idle;
        active
    }
}

/// Outcome of advancing the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighlightTick {
    /// The blink just started here; make it the active selection.
    pub select: Option<CellCoord>,
    /// Visual state changed and the grid needs a repaint.
    pub changed: bool,
}
