//! Layout helpers: toolbar flow direction and separators.

use egui::{Color32, InnerResponse, Pos2, Stroke, Ui};

/// Direction the toolbar lays out its buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Row,
    Column,
}

impl Flow {
    pub fn from_horizontal(horizontal: bool) -> Self {
        if horizontal { Flow::Row } else { Flow::Column }
    }

    /// Lay out `add` in this direction.
    pub fn show<R>(self, ui: &mut Ui, add: impl FnOnce(&mut Ui) -> R) -> InnerResponse<R> {
        match self {
            Flow::Row => ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 2.0;
                add(ui)
            }),
            Flow::Column => ui.vertical(|ui| {
                ui.spacing_mut().item_spacing.y = 2.0;
                add(ui)
            }),
        }
    }
}

/// Short separator line across the flow direction.
pub fn flow_separator(ui: &mut Ui, flow: Flow, color: Color32) {
    let rect = ui.available_rect_before_wrap();
    let length = 14.0;
    let stroke = Stroke::new(1.0, color);
    match flow {
        Flow::Row => {
            let x = rect.left() + 3.0;
            let top = rect.top() + (crate::sizing::TOOL - length) / 2.0;
            ui.painter()
                .line_segment([Pos2::new(x, top), Pos2::new(x, top + length)], stroke);
            ui.add_space(6.0);
        }
        Flow::Column => {
            let y = rect.top() + 3.0;
            let left = rect.left() + (crate::sizing::TOOL - length) / 2.0;
            ui.painter()
                .line_segment([Pos2::new(left, y), Pos2::new(left + length, y)], stroke);
            ui.add_space(6.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_from_horizontal() {
        assert_eq!(Flow::from_horizontal(true), Flow::Row);
        assert_eq!(Flow::from_horizontal(false), Flow::Column);
    }

    #[test]
    fn test_flow_show_returns_inner() {
        let ctx = egui::Context::default();
        let mut result = 0;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                result = Flow::Column
                    .show(ui, |ui| {
                        flow_separator(ui, Flow::Column, Color32::GRAY);
                        7
                    })
                    .inner;
            });
        });
        assert_eq!(result, 7);
    }
}
