mod details;
mod list;
mod panels;

use eframe::egui::{Color32, RichText, Ui};

use super::render_utils::{ACCENT_COLOR, palette_color};
use super::views::TagRow;

fn badge(ui: &mut Ui, text: &str, fill: Color32) {
    ui.label(
        RichText::new(text)
            .small()
            .strong()
            .color(Color32::BLACK)
            .background_color(fill),
    );
}

/// `IN feedstocks → OUT products`, wrapping when narrow.
fn tag_row(ui: &mut Ui, row: &TagRow, size: f32) {
    ui.horizontal_wrapped(|ui| {
        badge(ui, "IN", palette_color(0));
        for input in &row.inputs {
            ui.label(RichText::new(input).size(size));
        }
        ui.label(RichText::new("→").size(size));
        badge(ui, "OUT", ACCENT_COLOR);
        for output in &row.outputs {
            ui.label(RichText::new(output).size(size));
        }
    });
}

fn tag_chips(ui: &mut Ui, chips: &[String], size: f32) {
    if chips.is_empty() {
        return;
    }
    ui.horizontal_wrapped(|ui| {
        for chip in chips {
            ui.label(
                RichText::new(chip)
                    .size(size)
                    .background_color(Color32::from_gray(55)),
            );
        }
    });
}
