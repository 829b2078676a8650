//! Reusable egui widget components for the sketchboard toolbar.
//!
//! - **Buttons**: tool buttons with active, locked and shortcut states
//! - **Menu**: menu items and panel frames
//! - **Layout**: row / column flow following the toolbar dock

pub mod buttons;
pub mod layout;
pub mod menu;

pub use buttons::{ToolButton, ToolButtonStyle, tooltip_text};
pub use layout::{Flow, flow_separator};
pub use menu::{menu_item, panel_frame, toolbar_frame};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Toolbar button size
    pub const TOOL: f32 = 32.0;
    /// Toolbar icon size
    pub const TOOL_ICON: f32 = 18.0;
    /// Standard corner radius
    pub const CORNER_RADIUS: u8 = 4;
    /// Panel corner radius
    pub const PANEL_RADIUS: u8 = 8;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    /// Selection/active color (blue)
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);

    /// Colors that change with dark mode.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Palette {
        pub text: Color32,
        pub text_muted: Color32,
        pub border: Color32,
        pub hover_bg: Color32,
        pub panel_bg: Color32,
        pub icon: Color32,
    }

    pub const LIGHT: Palette = Palette {
        text: Color32::from_rgb(60, 60, 60),
        text_muted: Color32::from_rgb(120, 120, 120),
        border: Color32::from_rgb(220, 220, 220),
        hover_bg: Color32::from_rgb(235, 235, 235),
        panel_bg: Color32::from_rgba_premultiplied(250, 250, 252, 250),
        icon: Color32::from_rgb(80, 80, 80),
    };

    pub const DARK: Palette = Palette {
        text: Color32::from_rgb(225, 225, 225),
        text_muted: Color32::from_rgb(150, 150, 150),
        border: Color32::from_rgb(70, 76, 84),
        hover_bg: Color32::from_rgb(64, 72, 80),
        panel_bg: Color32::from_rgba_premultiplied(40, 46, 52, 250),
        icon: Color32::from_rgb(200, 200, 200),
    };

    pub fn palette(is_dark_mode: bool) -> Palette {
        if is_dark_mode { DARK } else { LIGHT }
    }
}
