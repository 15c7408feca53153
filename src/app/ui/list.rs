use eframe::egui::{self, RichText, Stroke, Ui};

use super::super::ViewModel;
use super::super::events::UiEvent;
use super::super::render_utils::ACCENT_COLOR;
use super::super::views::{ListCard, ListLayout};
use super::{tag_chips, tag_row};

impl ViewModel {
    pub(in crate::app) fn draw_list(&self, ui: &mut Ui, events: &mut Vec<UiEvent>) {
        let layout = ListLayout::for_width(ui.available_width());

        ui.label(RichText::new("Mapping the Bioeconomy").size(layout.title_size).strong());
        ui.label(RichText::new("Generating techno-economic analyses with AI").italics());
        ui.add_space(6.0);

        let mut query = self.search.clone();
        let search_response = ui.add(
            egui::TextEdit::singleline(&mut query)
                .hint_text("Search papers")
                .desired_width(ui.available_width() * layout.search_fraction),
        );
        if search_response.changed() {
            events.push(UiEvent::SearchChanged(query));
        }
        ui.small(format!(
            "{} of {} papers",
            self.visible_cards.len(),
            self.cards.len()
        ));
        ui.separator();

        if self.visible_cards.is_empty() {
            ui.label("No papers match the current search.");
            return;
        }

        let spotlighted = self.store.spotlighted_index();

        egui::ScrollArea::vertical()
            .id_salt("paper_list")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for row in self.visible_cards.chunks(layout.columns) {
                    ui.columns(layout.columns, |columns| {
                        for (column, &index) in columns.iter_mut().zip(row) {
                            let is_spotlighted = spotlighted == Some(index);
                            draw_card(column, &self.cards[index], layout, is_spotlighted, events);
                        }
                    });
                    ui.add_space(4.0);
                }
            });
    }
}

fn draw_card(
    ui: &mut Ui,
    card: &ListCard,
    layout: ListLayout,
    is_spotlighted: bool,
    events: &mut Vec<UiEvent>,
) {
    let mut frame = egui::Frame::group(ui.style());
    if is_spotlighted {
        frame = frame.stroke(Stroke::new(1.5, ACCENT_COLOR));
    }

    frame.show(ui, |ui| {
        ui.set_width(ui.available_width());

        let title = RichText::new(&card.title).size(layout.body_size + 2.0).strong();
        if ui.selectable_label(is_spotlighted, title).clicked() {
            events.push(UiEvent::Spotlight(card.id.clone()));
        }

        tag_row(ui, &card.row, layout.body_size);
        tag_chips(ui, &card.chips, layout.chip_size());
        if !card.novelty_preview.is_empty() {
            ui.label(RichText::new(&card.novelty_preview).size(layout.body_size));
        }

        ui.horizontal(|ui| {
            if !card.link.is_empty() {
                ui.hyperlink_to("Citation", &card.link);
            }
            if ui.small_button("Show process").clicked() {
                events.push(UiEvent::Spotlight(card.id.clone()));
            }
        });
    });
}
