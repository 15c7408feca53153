use eframe::egui::{Align2, Color32, FontId, RichText, Sense, Stroke, Ui};

use super::super::events::UiEvent;
use super::super::render_utils::{
    ACCENT_COLOR, EDGE_COLOR, blend_color, circle_visible, draw_arrowhead, draw_background,
    palette_color, segment_visible, world_to_screen,
};
use super::super::ViewModel;
use super::super::views::Tooltip;

const NODE_RADIUS: f32 = 5.0;
const ARROW_SIZE: f32 = 7.0;

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui, events: &mut Vec<UiEvent>) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        if (rect.size() - self.viewport).length_sq() > f32::EPSILON {
            events.push(UiEvent::ViewportResized(rect.size()));
        }

        draw_background(&painter, rect, self.pan, self.zoom);

        if self.graph.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No papers share enough tags to draw a graph.",
                FontId::proportional(14.0),
                Color32::from_gray(200),
            );
            return;
        }

        self.handle_graph_zoom(ui, rect, &response);

        let layout_moving = self.layout.step();
        let radius = NODE_RADIUS * self.zoom.sqrt();
        let screen_positions = self
            .layout
            .positions()
            .iter()
            .map(|position| world_to_screen(rect, self.pan, self.zoom, *position))
            .collect::<Vec<_>>();

        self.handle_graph_drag(ui, rect, &response, radius, events);

        let hovered = if self.dragging.is_none() {
            ui.input(|input| input.pointer.hover_pos())
                .filter(|pointer| rect.contains(*pointer))
                .and_then(|pointer| self.node_under(rect, radius, pointer))
        } else {
            None
        };

        if response.clicked()
            && let Some(node) = hovered
        {
            events.push(UiEvent::Spotlight(self.graph.nodes[node].id.clone()));
        }

        let spotlighted = self
            .store
            .spotlighted()
            .and_then(|paper| self.graph.node_index(&paper.id));

        for edge in &self.graph.edges {
            let start = screen_positions[edge.source];
            let end = screen_positions[edge.target];
            if !segment_visible(rect, start, end, ARROW_SIZE) {
                continue;
            }

            let touches_focus = [hovered, spotlighted]
                .into_iter()
                .flatten()
                .any(|node| node == edge.source || node == edge.target);
            let color = if touches_focus {
                blend_color(EDGE_COLOR, Color32::WHITE, 0.6)
            } else {
                EDGE_COLOR.gamma_multiply(0.7)
            };
            let stroke = Stroke::new((edge.weight as f32).sqrt() * self.zoom.sqrt(), color);

            let direction = end - start;
            let length = direction.length();
            if length <= radius * 2.0 {
                continue;
            }
            let tip = end - direction / length * (radius + 1.5);
            painter.line_segment([start, tip], stroke);
            draw_arrowhead(&painter, start, tip, ARROW_SIZE * self.zoom.sqrt(), stroke);
        }

        for (index, node) in self.graph.nodes.iter().enumerate() {
            let position = screen_positions[index];
            if !circle_visible(rect, position, radius + 4.0) {
                continue;
            }

            painter.circle_filled(position, radius, palette_color(node.palette_index()));
            painter.circle_stroke(
                position,
                radius,
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(10, 10, 10, 200)),
            );

            if self.search_matches.contains(&index) {
                painter.circle_stroke(position, radius + 3.0, Stroke::new(1.5, Color32::WHITE));
            }
            if Some(index) == spotlighted {
                painter.circle_stroke(position, radius + 5.0, Stroke::new(2.0, ACCENT_COLOR));
            }
            if Some(index) == hovered || self.layout.is_pinned(index) {
                painter.circle_stroke(
                    position,
                    radius + 1.5,
                    Stroke::new(1.5, Color32::from_gray(240)),
                );
            }
        }

        if layout_moving || self.dragging.is_some() || response.dragged() {
            ui.ctx().request_repaint();
        }

        if let Some(node) = hovered
            && let Some(paper) = self.store.paper(&self.graph.nodes[node].id)
        {
            let tooltip = Tooltip::project(paper);
            let links = self.graph.degree(node);
            response.on_hover_ui_at_pointer(|ui| {
                ui.label(RichText::new(tooltip.title).strong());
                ui.label(tooltip.row.text());
                ui.small(format!("{links} shared-tag links"));
            });
        }
    }
}
