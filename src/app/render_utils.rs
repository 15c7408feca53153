use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

const FEEDSTOCK_PALETTE: [Color32; 7] = [
    Color32::from_rgb(0xFF, 0xFF, 0x40),
    Color32::from_rgb(0xDD, 0xDF, 0x03),
    Color32::from_rgb(0xD5, 0xD7, 0x03),
    Color32::from_rgb(0xC0, 0xD2, 0x03),
    Color32::from_rgb(0x80, 0xB9, 0x18),
    Color32::from_rgb(0x2C, 0x93, 0x48),
    Color32::from_rgb(0x02, 0x7F, 0x5F),
];

pub(super) const EDGE_COLOR: Color32 = Color32::from_rgb(0xA5, 0xA5, 0xA5);
pub(super) const ACCENT_COLOR: Color32 = Color32::from_rgb(0x80, 0xB9, 0x18);

pub(super) fn palette_color(index: usize) -> Color32 {
    FEEDSTOCK_PALETTE[index % FEEDSTOCK_PALETTE.len()]
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * amount) as u8;

    Color32::from_rgba_unmultiplied(
        mix(base.r(), overlay.r()),
        mix(base.g(), overlay.g()),
        mix(base.b(), overlay.b()),
        mix(base.a(), overlay.a()),
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(24, 27, 24));

    let step = (64.0 * zoom.clamp(0.5, 2.0)).max(24.0);
    let origin = rect.min + pan;
    let dot = Color32::from_rgba_unmultiplied(90, 100, 90, 80);

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
        while y < rect.bottom() {
            painter.circle_filled(Pos2::new(x, y), 1.0, dot);
            y += step;
        }
        x += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    rect.expand(radius).contains(position)
}

pub(super) fn segment_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    Rect::from_two_pos(start, end)
        .expand(padding)
        .intersects(rect)
}

/// Layout space is viewport-local: the origin sits at the viewport's top left
/// corner before panning.
pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.min + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.min - pan) / zoom
}

/// Chevron at `tip`, pointing along `start -> tip`.
pub(super) fn draw_arrowhead(painter: &Painter, start: Pos2, tip: Pos2, size: f32, stroke: Stroke) {
    let direction = tip - start;
    if direction.length_sq() <= f32::EPSILON {
        return;
    }

    let back = -direction.normalized() * size;
    let side = back.rot90() * 0.6;
    painter.line_segment([tip, tip + back + side], stroke);
    painter.line_segment([tip, tip + back - side], stroke);
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    #[test]
    fn world_and_screen_are_inverse() {
        let rect = Rect::from_min_size(pos2(300.0, 40.0), vec2(800.0, 600.0));
        let pan = vec2(-25.0, 12.0);
        let world = vec2(120.0, 75.0);

        let screen = world_to_screen(rect, pan, 1.5, world);
        assert_eq!(screen, pos2(300.0 - 25.0 + 180.0, 40.0 + 12.0 + 112.5));
        assert!((screen_to_world(rect, pan, 1.5, screen) - world).length() < 1e-4);
    }

    #[test]
    fn palette_wraps_groups() {
        assert_eq!(palette_color(0), palette_color(7));
        assert_ne!(palette_color(0), palette_color(6));
    }

    #[test]
    fn visibility_checks_pad_the_viewport() {
        let rect = Rect::from_min_size(Pos2::ZERO, vec2(100.0, 100.0));
        assert!(circle_visible(rect, pos2(-4.0, 50.0), 5.0));
        assert!(!circle_visible(rect, pos2(-10.0, 50.0), 5.0));
        assert!(segment_visible(rect, pos2(-50.0, 50.0), pos2(150.0, 50.0), 1.0));
        assert!(!segment_visible(rect, pos2(-50.0, -50.0), pos2(-20.0, -10.0), 1.0));
    }
}
