//! Menu components: menu items and panel frames.

use egui::{Color32, CornerRadius, CursorIcon, Frame, Margin, Pos2, Sense, Stroke, Ui, vec2};

use crate::sizing;
use crate::theme::Palette;

/// Show a menu item with label and optional shortcut. Returns true if clicked.
pub fn menu_item(ui: &mut Ui, palette: &Palette, label: &str, shortcut: &str) -> bool {
    let size = vec2(ui.available_width().max(120.0), 28.0);
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());

    if ui.is_rect_visible(rect) {
        let bg_color = if response.hovered() {
            palette.hover_bg
        } else {
            Color32::TRANSPARENT
        };
        ui.painter()
            .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);

        ui.painter().text(
            Pos2::new(rect.left() + 12.0, rect.center().y),
            egui::Align2::LEFT_CENTER,
            label,
            egui::FontId::proportional(13.0),
            palette.text,
        );

        if !shortcut.is_empty() {
            ui.painter().text(
                Pos2::new(rect.right() - 12.0, rect.center().y),
                egui::Align2::RIGHT_CENTER,
                shortcut,
                egui::FontId::proportional(12.0),
                palette.text_muted,
            );
        }
    }

    let clicked = response.clicked();
    response.on_hover_cursor(CursorIcon::PointingHand);
    clicked
}

/// Standard popup panel frame with shadow.
pub fn panel_frame(palette: &Palette) -> Frame {
    Frame::new()
        .fill(palette.panel_bg)
        .corner_radius(CornerRadius::same(sizing::PANEL_RADIUS))
        .stroke(Stroke::new(1.0, palette.border))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 8,
            offset: [0, 2],
            color: Color32::from_black_alpha(15),
        })
        .inner_margin(Margin::same(6))
}

/// Toolbar frame (tighter padding than popups).
pub fn toolbar_frame(palette: &Palette) -> Frame {
    Frame::new()
        .fill(palette.panel_bg)
        .corner_radius(CornerRadius::same(sizing::PANEL_RADIUS))
        .stroke(Stroke::new(1.0, palette.border))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 6,
            offset: [0, 2],
            color: Color32::from_black_alpha(10),
        })
        .inner_margin(Margin::same(4))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;

    #[test]
    fn test_frames_follow_palette() {
        let light = panel_frame(&theme::LIGHT);
        let dark = toolbar_frame(&theme::DARK);
        assert_eq!(light.fill, theme::LIGHT.panel_bg);
        assert_eq!(dark.fill, theme::DARK.panel_bg);
        assert_eq!(dark.stroke.color, theme::DARK.border);
    }

    #[test]
    fn test_menu_item_not_clicked_without_input() {
        let ctx = egui::Context::default();
        let mut clicked = true;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                clicked = menu_item(ui, &theme::LIGHT, "Rectangle", "R");
            });
        });
        assert!(!clicked);
    }
}
