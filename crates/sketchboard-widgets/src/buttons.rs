//! Tool buttons for the toolbar.

use egui::{
    Color32, CornerRadius, CursorIcon, Image, ImageSource, Pos2, Rect, Response, Sense, Shape, Stroke, Ui,
    Vec2, vec2,
};

use crate::theme::{self, Palette};
use crate::sizing;

/// Style configuration for tool buttons.
#[derive(Debug, Clone)]
pub struct ToolButtonStyle {
    pub size: Vec2,
    /// Icon size (should be smaller than button size)
    pub icon_size: Vec2,
    pub corner_radius: u8,
    pub palette: Palette,
    /// Background color when active
    pub selected_color: Color32,
    /// Icon tint when active
    pub selected_icon_tint: Color32,
}

impl Default for ToolButtonStyle {
    fn default() -> Self {
        Self::themed(false)
    }
}

impl ToolButtonStyle {
    /// Toolbar tool style: 32x32, solid accent fill when active.
    pub fn themed(is_dark_mode: bool) -> Self {
        Self {
            size: vec2(sizing::TOOL, sizing::TOOL),
            icon_size: vec2(sizing::TOOL_ICON, sizing::TOOL_ICON),
            corner_radius: 6,
            palette: theme::palette(is_dark_mode),
            selected_color: theme::ACCENT,
            selected_icon_tint: Color32::WHITE,
        }
    }
}

/// Hover text for a tool, e.g. `Select (1)`.
pub fn tooltip_text(label: &str, kbd: Option<char>) -> String {
    match kbd {
        Some(key) => format!("{} ({})", label, key),
        None => label.to_string(),
    }
}

/// A toolbar button showing a tool icon.
pub struct ToolButton<'a> {
    icon: ImageSource<'a>,
    label: &'a str,
    kbd: Option<char>,
    active: bool,
    locked: bool,
    menu_indicator: bool,
    style: ToolButtonStyle,
}

impl<'a> ToolButton<'a> {
    pub fn new(icon: ImageSource<'a>, label: &'a str) -> Self {
        Self {
            icon,
            label,
            kbd: None,
            active: false,
            locked: false,
            menu_indicator: false,
            style: ToolButtonStyle::default(),
        }
    }

    /// Keyboard shortcut shown in the hover tooltip.
    pub fn kbd(mut self, kbd: Option<char>) -> Self {
        self.kbd = kbd;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Show the tool lock badge.
    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// Mark the button as opening a submenu.
    pub fn menu_indicator(mut self, menu_indicator: bool) -> Self {
        self.menu_indicator = menu_indicator;
        self
    }

    pub fn style(mut self, style: ToolButtonStyle) -> Self {
        self.style = style;
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        self.show_response(ui).clicked()
    }

    /// Show the button and return its response, for anchoring popups.
    pub fn show_response(self, ui: &mut Ui) -> Response {
        let (rect, response) = ui.allocate_exact_size(self.style.size, Sense::click());
        let palette = self.style.palette;

        if ui.is_rect_visible(rect) {
            let bg_color = if self.active {
                self.style.selected_color
            } else if response.hovered() {
                palette.hover_bg
            } else {
                Color32::TRANSPARENT
            };
            ui.painter().rect_filled(
                rect,
                CornerRadius::same(self.style.corner_radius),
                bg_color,
            );

            let icon_tint = if self.active {
                self.style.selected_icon_tint
            } else if response.hovered() {
                palette.text
            } else {
                palette.icon
            };
            let icon_rect = Rect::from_center_size(rect.center(), self.style.icon_size);
            Image::new(self.icon)
                .fit_to_exact_size(self.style.icon_size)
                .tint(icon_tint)
                .paint_at(ui, icon_rect);

            let badge_color = if self.active { icon_tint } else { theme::ACCENT };
            if self.locked {
                paint_lock_badge(ui, rect, badge_color);
            }
            if self.menu_indicator {
                let corner = rect.right_bottom() - vec2(4.0, 4.0);
                ui.painter().add(Shape::convex_polygon(
                    vec![corner, corner - vec2(5.0, 0.0), corner - vec2(0.0, 5.0)],
                    icon_tint,
                    Stroke::NONE,
                ));
            }
        }

        response
            .on_hover_text(tooltip_text(self.label, self.kbd))
            .on_hover_cursor(CursorIcon::PointingHand)
    }
}

/// Small padlock in the top-right corner of `rect`.
fn paint_lock_badge(ui: &Ui, rect: Rect, color: Color32) {
    let painter = ui.painter();
    let body = Rect::from_min_size(Pos2::new(rect.right() - 10.0, rect.top() + 6.0), vec2(7.0, 5.0));
    painter.rect_filled(body, CornerRadius::same(1), color);
    painter.circle_stroke(
        Pos2::new(body.center().x, body.top()),
        2.2,
        Stroke::new(1.2, color),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tooltip_text() {
        assert_eq!(tooltip_text("Select", Some('1')), "Select (1)");
        assert_eq!(tooltip_text("Heart", None), "Heart");
    }

    #[test]
    fn test_show_headless() {
        let ctx = egui::Context::default();
        let mut clicked = true;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                clicked = ToolButton::new(ImageSource::Uri("bytes://tool.svg".into()), "Heart")
                    .active(true)
                    .locked(true)
                    .menu_indicator(true)
                    .style(ToolButtonStyle::themed(true))
                    .show(ui);
            });
        });
        assert!(!clicked);
    }
}
