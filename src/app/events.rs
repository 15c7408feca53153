//! State transitions driven by user input.
//!
//! Drawing code never mutates the model directly. It queues [`UiEvent`]s while
//! a frame is laid out and [`ViewModel::handle`] applies them afterwards,
//! rebuilding the derived state each [`RenderRequest`] flag names.

use eframe::egui::Vec2;
use tracing::debug;

use crate::papers::Slot;

use super::ViewModel;
use super::views::{DetailView, filter_cards};

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) enum UiEvent {
    Spotlight(String),
    ToggleCompare,
    SwapCompareTarget,
    SearchChanged(String),
    ToggleSection(Slot),
    /// Pointer positions are in layout space.
    DragStarted { node: usize, pointer: Vec2 },
    Dragged { node: usize, pointer: Vec2 },
    DragEnded { node: usize },
    ViewportResized(Vec2),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(in crate::app) struct RenderRequest {
    /// Visible cards and graph search rings are recomputed.
    pub list: bool,
    /// Both detail slots are projected again.
    pub detail: bool,
    /// The graph needs frames of its own, e.g. while the layout moves.
    pub graph: bool,
}

impl RenderRequest {
    pub(in crate::app) const NONE: Self = Self {
        list: false,
        detail: false,
        graph: false,
    };

    pub(in crate::app) const ALL: Self = Self {
        list: true,
        detail: true,
        graph: true,
    };

    pub(in crate::app) fn merge(self, other: Self) -> Self {
        Self {
            list: self.list || other.list,
            detail: self.detail || other.detail,
            graph: self.graph || other.graph,
        }
    }

    pub(in crate::app) fn is_empty(self) -> bool {
        self == Self::NONE
    }
}

impl ViewModel {
    pub(in crate::app) fn handle(&mut self, event: UiEvent) -> RenderRequest {
        let request = self.apply(event);
        if request.list {
            self.refresh_search();
        }
        if request.detail {
            self.refresh_details();
        }
        request
    }

    fn apply(&mut self, event: UiEvent) -> RenderRequest {
        match event {
            UiEvent::Spotlight(id) => {
                if !self.store.select_paper(&id) {
                    return RenderRequest::NONE;
                }
                RenderRequest {
                    detail: true,
                    graph: true,
                    ..RenderRequest::NONE
                }
            }
            UiEvent::ToggleCompare => {
                let split = self.store.toggle_compare_mode();
                self.pending_split = Some(split);
                RenderRequest::ALL
            }
            UiEvent::SwapCompareTarget => {
                if !self.store.is_comparing() {
                    return RenderRequest::NONE;
                }
                self.store.advance_compare_target();
                debug!(
                    counter = self.store.compare_counter(),
                    "compare target advanced"
                );
                RenderRequest {
                    detail: true,
                    ..RenderRequest::NONE
                }
            }
            UiEvent::SearchChanged(query) => {
                if query == self.search {
                    return RenderRequest::NONE;
                }
                self.search = query;
                RenderRequest {
                    list: true,
                    graph: true,
                    ..RenderRequest::NONE
                }
            }
            UiEvent::ToggleSection(slot) => {
                let expanded = &mut self.expanded[slot.index()];
                *expanded = !*expanded;
                RenderRequest {
                    detail: true,
                    ..RenderRequest::NONE
                }
            }
            UiEvent::DragStarted { node, pointer } => {
                if node >= self.layout.len() {
                    return RenderRequest::NONE;
                }
                self.layout.drag_start(node);
                self.layout.drag_to(node, pointer);
                self.dragging = Some(node);
                Self::graph_only()
            }
            UiEvent::Dragged { node, pointer } => {
                if self.dragging != Some(node) {
                    return RenderRequest::NONE;
                }
                self.layout.drag_to(node, pointer);
                Self::graph_only()
            }
            UiEvent::DragEnded { node } => {
                if self.dragging != Some(node) {
                    return RenderRequest::NONE;
                }
                self.layout.drag_end(node);
                self.dragging = None;
                Self::graph_only()
            }
            UiEvent::ViewportResized(size) => {
                if (size - self.viewport).length_sq() <= f32::EPSILON {
                    return RenderRequest::NONE;
                }
                debug!(
                    width = size.x,
                    height = size.y,
                    previous_center = ?self.layout.center(),
                    "graph viewport resized"
                );
                self.viewport = size;
                self.layout.recenter(size / 2.0);
                Self::graph_only()
            }
        }
    }

    pub(in crate::app) fn handle_all(&mut self, events: Vec<UiEvent>) -> RenderRequest {
        events
            .into_iter()
            .fold(RenderRequest::NONE, |request, event| {
                request.merge(self.handle(event))
            })
    }

    pub(in crate::app) fn refresh_details(&mut self) {
        for slot in Slot::ALL {
            self.details[slot.index()] = self.store.slot_paper(slot).map(DetailView::project);
        }
    }

    fn refresh_search(&mut self) {
        self.visible_cards = filter_cards(&self.cards, &self.search);
        self.search_matches = if self.search.is_empty() {
            Default::default()
        } else {
            self.graph
                .nodes
                .iter()
                .enumerate()
                .filter(|(_, node)| self.visible_cards.binary_search(&node.paper).is_ok())
                .map(|(index, _)| index)
                .collect()
        };
    }

    fn graph_only() -> RenderRequest {
        RenderRequest {
            graph: true,
            ..RenderRequest::NONE
        }
    }
}
