use eframe::egui::{self, PointerButton, Pos2, Rect, Ui};

use super::super::ViewModel;
use super::super::events::UiEvent;
use super::super::render_utils::screen_to_world;

/// Extra pointer slack around a node's drawn radius.
const HIT_SLOP: f32 = 3.0;

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.1, 6.0);
        self.pan = pointer - rect.min - (world_before * self.zoom);
    }

    /// Node drawn under the screen position `point`.
    pub(in crate::app) fn node_under(&self, rect: Rect, radius: f32, point: Pos2) -> Option<usize> {
        let world = screen_to_world(rect, self.pan, self.zoom, point);
        self.layout.nearest(world, (radius + HIT_SLOP) / self.zoom)
    }

    /// Primary drags that start on a node move it; any other drag pans.
    pub(in crate::app) fn handle_graph_drag(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
        radius: f32,
        events: &mut Vec<UiEvent>,
    ) {
        let pointer = response
            .interact_pointer_pos()
            .map(|position| screen_to_world(rect, self.pan, self.zoom, position));

        if let Some(node) = self.dragging {
            match pointer {
                Some(pointer) if response.dragged_by(PointerButton::Primary) => {
                    events.push(UiEvent::Dragged { node, pointer });
                }
                _ => events.push(UiEvent::DragEnded { node }),
            }
            return;
        }

        if response.drag_started_by(PointerButton::Primary) {
            let press_origin = ui.input(|input| input.pointer.press_origin());
            let pressed_node =
                press_origin.and_then(|origin| self.node_under(rect, radius, origin));
            if let Some(node) = pressed_node
                && let Some(pointer) = pointer
            {
                events.push(UiEvent::DragStarted { node, pointer });
                return;
            }
        }

        if response.dragged() {
            self.pan += response.drag_delta();
        }
    }
}

