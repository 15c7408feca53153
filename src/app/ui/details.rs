use eframe::egui::scroll_area::ScrollSource;
use eframe::egui::{self, Align2, Color32, FontId, RichText, Sense, Ui, vec2};

use crate::papers::{PaneSplit, Slot};

use super::super::ViewModel;
use super::super::events::UiEvent;
use super::super::render_utils::ACCENT_COLOR;
use super::super::views::{DetailView, StepView};
use super::{tag_chips, tag_row};

const COLLAPSED_SECTIONS_HEIGHT: f32 = 96.0;
const STEP_BADGE_SIZE: f32 = 22.0;

impl ViewModel {
    pub(in crate::app) fn draw_details(&self, ui: &mut Ui, events: &mut Vec<UiEvent>) {
        match self.store.pane_split() {
            PaneSplit::Single => self.draw_slot(ui, Slot::Left, events),
            PaneSplit::Dual => {
                ui.columns(Slot::ALL.len(), |columns| {
                    for (column, slot) in columns.iter_mut().zip(Slot::ALL) {
                        self.draw_slot(column, slot, events);
                    }
                });
            }
        }
    }

    fn draw_slot(&self, ui: &mut Ui, slot: Slot, events: &mut Vec<UiEvent>) {
        if self.store.is_comparing() {
            ui.horizontal(|ui| {
                ui.label(RichText::new(format!("Compare {}", slot.label())).strong());
                if self.store.target_slot() == Some(slot) {
                    ui.label(RichText::new("receives next selection").small().color(ACCENT_COLOR));
                }
            });
            ui.separator();
        }

        let Some(view) = self.details[slot.index()].as_ref() else {
            ui.label("Select a paper from the list or the graph.");
            return;
        };

        egui::ScrollArea::vertical()
            .id_salt(("detail_slot", slot.index()))
            .auto_shrink([false, false])
            .show(ui, |ui| {
                draw_header(ui, view);
                ui.separator();
                self.draw_sections(ui, slot, view, events);
                ui.separator();
                draw_steps(ui, &view.steps);
            });
    }

    fn draw_sections(&self, ui: &mut Ui, slot: Slot, view: &DetailView, events: &mut Vec<UiEvent>) {
        let expanded = self.expanded[slot.index()];
        let max_height = if expanded {
            f32::INFINITY
        } else {
            COLLAPSED_SECTIONS_HEIGHT
        };

        egui::ScrollArea::vertical()
            .id_salt(("detail_sections", slot.index()))
            .max_height(max_height)
            .scroll_source(if expanded {
                ScrollSource::ALL
            } else {
                ScrollSource::NONE
            })
            .show(ui, |ui| {
                for section in &view.sections {
                    ui.label(RichText::new(section.heading).strong());
                    ui.label(section.body.as_str());
                    ui.add_space(4.0);
                }
                let citations = view
                    .citation_count
                    .map_or_else(|| "unknown".to_owned(), |count| count.to_string());
                ui.label(RichText::new(format!("Citation Count: {citations}")).strong());
            });

        let toggle = if expanded { "Show less" } else { "Show more" };
        if ui.small_button(toggle).clicked() {
            events.push(UiEvent::ToggleSection(slot));
        }
    }
}

fn draw_header(ui: &mut Ui, view: &DetailView) {
    let title = RichText::new(&view.title).heading();
    if view.link.is_empty() {
        ui.label(title);
    } else {
        ui.hyperlink_to(title, &view.link);
    }

    for (label, value) in &view.metrics {
        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new(format!("{label}:")).strong());
            ui.label(value.as_str());
        });
    }

    ui.add_space(4.0);
    tag_row(ui, &view.row, 13.0);
    tag_chips(ui, &view.chips, 12.0);
}

fn draw_steps(ui: &mut Ui, steps: &[StepView]) {
    ui.label(RichText::new("Process").strong());
    if steps.is_empty() {
        ui.label("No process model available for this paper.");
        return;
    }

    for step in steps {
        ui.horizontal(|ui| {
            let (rect, _) =
                ui.allocate_exact_size(vec2(STEP_BADGE_SIZE, STEP_BADGE_SIZE), Sense::hover());
            ui.painter()
                .circle_filled(rect.center(), STEP_BADGE_SIZE / 2.0, ACCENT_COLOR);
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                step.number.to_string(),
                FontId::proportional(12.0),
                Color32::BLACK,
            );
            ui.label(RichText::new(&step.kind).strong());
        });

        ui.indent(("step", step.number), |ui| {
            if !step.description.is_empty() {
                ui.label(step.description.as_str());
            }
            if !step.parameters.is_empty() {
                ui.small(format!("Parameters: {}", step.parameters.join(", ")));
            }
            if let Some(output) = &step.output {
                ui.small(format!("Output: {output}"));
            }
        });
        ui.add_space(6.0);
    }
}
