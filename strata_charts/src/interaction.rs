// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer hover handling for a built streamgraph.
//!
//! Entering a layer raises it to the hover opacity and shows its tooltip; moving within
//! the layer only moves the tooltip; leaving restores the resting opacity and hides the
//! tooltip. A hidden tooltip keeps its marks at zero opacity, so the next frame's diff is
//! a handful of updates rather than a rebuild.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::Point;
use strata_core::Mark;

use crate::streamgraph::StreamgraphChart;
use crate::tooltip::TooltipRequest;

/// A pointer event in view coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// The pointer moved to a position.
    Moved(Point),
    /// The pointer left the view.
    Left,
}

/// Current hover state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HoverState {
    /// The hovered layer.
    pub hovered: Option<usize>,
    /// Last pointer position over a layer; the tooltip follows it.
    pub pointer: Point,
    /// Whether the tooltip is shown.
    pub visible: bool,
    /// The series the tooltip was last built for.
    pub tooltip_series: Option<usize>,
}

/// What an event changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionChange {
    /// Nothing visible changed.
    None,
    /// The pointer entered a layer.
    Entered(usize),
    /// The pointer moved within the hovered layer.
    Moved(usize),
    /// The pointer went straight from one layer to another.
    Switched {
        /// Previously hovered layer.
        from: usize,
        /// Newly hovered layer.
        to: usize,
    },
    /// The pointer left a layer.
    Left(usize),
}

impl InteractionChange {
    /// Whether the frame needs to be redrawn.
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Hover state machine over a [`StreamgraphChart`].
#[derive(Clone, Debug, Default)]
pub struct StreamgraphInteraction {
    state: HoverState,
}

impl StreamgraphInteraction {
    /// Creates an interaction with nothing hovered.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current state.
    pub fn state(&self) -> &HoverState {
        &self.state
    }

    /// Applies a pointer event.
    pub fn handle(&mut self, chart: &StreamgraphChart, event: PointerEvent) -> InteractionChange {
        let previous = self.state.hovered;
        let (hit, pos) = match event {
            PointerEvent::Moved(pos) => (chart.layer_at(pos), Some(pos)),
            PointerEvent::Left => (None, None),
        };

        let change = match (previous, hit) {
            (None, None) => InteractionChange::None,
            (None, Some(to)) => InteractionChange::Entered(to),
            (Some(from), Some(to)) if from == to => InteractionChange::Moved(to),
            (Some(from), Some(to)) => InteractionChange::Switched { from, to },
            (Some(from), None) => InteractionChange::Left(from),
        };

        match change {
            InteractionChange::None => {}
            InteractionChange::Entered(to)
            | InteractionChange::Moved(to)
            | InteractionChange::Switched { to, .. } => {
                self.state.hovered = Some(to);
                self.state.tooltip_series = Some(to);
                self.state.visible = true;
                if let Some(pos) = pos {
                    self.state.pointer = pos;
                }
            }
            InteractionChange::Left(_) => {
                self.state.hovered = None;
                self.state.visible = false;
            }
        }

        match change {
            InteractionChange::None | InteractionChange::Moved(_) => {
                log::trace!("hover {change:?}");
            }
            _ => log::debug!("hover {change:?}"),
        }
        change
    }

    /// The tooltip to draw, once any layer has been hovered.
    pub fn tooltip_request(&self) -> Option<TooltipRequest> {
        self.state.tooltip_series.map(|series| TooltipRequest {
            series,
            anchor: self.state.pointer,
            visible: self.state.visible,
        })
    }

    /// Every mark of the current frame, ready for [`strata_core::Scene::tick`].
    pub fn marks(&self, chart: &StreamgraphChart) -> Vec<Mark> {
        chart.marks(self.state.hovered, self.tooltip_request().as_ref())
    }
}
