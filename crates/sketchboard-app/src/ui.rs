//! Primary toolbar: tool buttons, the shapes dropdown and digit shortcuts.

use egui::{Align2, Context, Id, ImageSource, Key, Pos2, Rect, Vec2, include_image};
use sketchboard_core::{Commands, DockPosition, Selector, Store, ToolKind};
use sketchboard_widgets::theme::{self, Palette};
use sketchboard_widgets::{
    Flow, ToolButton, ToolButtonStyle, flow_separator, menu_item, panel_frame, toolbar_frame,
};

/// Tools grouped under the shapes dropdown, in menu order.
pub const SHAPE_TOOLS: [ToolKind; 4] = [
    ToolKind::Rectangle,
    ToolKind::Ellipse,
    ToolKind::Triangle,
    ToolKind::Line,
];

/// Distance between the toolbar and the window edge.
const DOCK_MARGIN: f32 = 12.0;

/// Something the toolbar wants the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    SelectTool(ToolKind),
    OpenAsset,
}

impl ToolbarAction {
    /// Dispatch as a single command.
    pub fn apply(self, commands: &mut dyn Commands) {
        log::debug!("Toolbar action {:?}", self);
        match self {
            ToolbarAction::SelectTool(tool) => commands.select_tool(tool),
            ToolbarAction::OpenAsset => commands.open_asset(),
        }
    }
}

/// What a toolbar slot does when clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarEntry {
    Tool(ToolKind),
    /// The shapes dropdown, showing its last used tool.
    Shapes(ToolKind),
    Image,
}

/// One button in the toolbar table.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolbarButton {
    pub entry: ToolbarEntry,
    pub label: &'static str,
    pub kbd: Option<char>,
    pub is_active: bool,
    pub is_locked: bool,
}

impl ToolbarButton {
    fn tool(tool: ToolKind, active_tool: ToolKind, is_tool_locked: bool) -> Self {
        Self {
            entry: ToolbarEntry::Tool(tool),
            label: tool_label(tool),
            kbd: tool.shortcut(),
            is_active: tool == active_tool,
            is_locked: is_tool_locked && tool.shows_lock(),
        }
    }

    pub fn icon(&self) -> ImageSource<'static> {
        match self.entry {
            ToolbarEntry::Tool(tool) | ToolbarEntry::Shapes(tool) => tool_icon(tool),
            ToolbarEntry::Image => include_image!("../assets/image.svg"),
        }
    }
}

pub fn tool_label(tool: ToolKind) -> &'static str {
    match tool {
        ToolKind::Select => "Select",
        ToolKind::Draw => "Draw",
        ToolKind::Erase => "Eraser",
        ToolKind::Rectangle => "Rectangle",
        ToolKind::Ellipse => "Ellipse",
        ToolKind::Triangle => "Triangle",
        ToolKind::Line => "Line",
        ToolKind::Arrow => "Arrow",
        ToolKind::Text => "Text",
        ToolKind::Sticky => "Sticky note",
        ToolKind::Heart => "Heart",
    }
}

pub fn tool_icon(tool: ToolKind) -> ImageSource<'static> {
    match tool {
        ToolKind::Select => include_image!("../assets/select.svg"),
        ToolKind::Draw => include_image!("../assets/draw.svg"),
        ToolKind::Erase => include_image!("../assets/eraser.svg"),
        ToolKind::Rectangle => include_image!("../assets/rectangle.svg"),
        ToolKind::Ellipse => include_image!("../assets/ellipse.svg"),
        ToolKind::Triangle => include_image!("../assets/triangle.svg"),
        ToolKind::Line => include_image!("../assets/line.svg"),
        ToolKind::Arrow => include_image!("../assets/arrow.svg"),
        ToolKind::Text => include_image!("../assets/text.svg"),
        ToolKind::Sticky => include_image!("../assets/sticky.svg"),
        ToolKind::Heart => include_image!("../assets/heart.svg"),
    }
}

/// Build the toolbar table for the given state.
pub fn toolbar_buttons(
    active_tool: ToolKind,
    is_tool_locked: bool,
    last_shape: ToolKind,
) -> Vec<ToolbarButton> {
    let tool = |kind| ToolbarButton::tool(kind, active_tool, is_tool_locked);
    vec![
        tool(ToolKind::Select),
        tool(ToolKind::Draw),
        tool(ToolKind::Erase),
        ToolbarButton {
            entry: ToolbarEntry::Shapes(last_shape),
            label: "Shapes",
            kbd: None,
            is_active: SHAPE_TOOLS.contains(&active_tool),
            is_locked: is_tool_locked && SHAPE_TOOLS.contains(&active_tool),
        },
        tool(ToolKind::Arrow),
        tool(ToolKind::Text),
        tool(ToolKind::Sticky),
        tool(ToolKind::Heart),
        ToolbarButton {
            entry: ToolbarEntry::Image,
            label: "Image",
            kbd: None,
            is_active: false,
            is_locked: false,
        },
    ]
}

/// Map a digit key to a tool selection.
pub fn shortcut_action(key: char) -> Option<ToolbarAction> {
    ToolKind::from_shortcut(key).map(ToolbarAction::SelectTool)
}

fn key_digit(key: Key) -> Option<char> {
    let mut chars = key.symbol_or_name().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_digit() => Some(c),
        _ => None,
    }
}

/// Toolbar anchor for a dock position.
fn dock_anchor(dock: DockPosition) -> (Align2, Vec2) {
    match dock {
        DockPosition::Top => (Align2::CENTER_TOP, Vec2::new(0.0, DOCK_MARGIN)),
        DockPosition::Right => (Align2::RIGHT_CENTER, Vec2::new(-DOCK_MARGIN, 0.0)),
        DockPosition::Bottom => (Align2::CENTER_BOTTOM, Vec2::new(0.0, -DOCK_MARGIN)),
        DockPosition::Left => (Align2::LEFT_CENTER, Vec2::new(DOCK_MARGIN, 0.0)),
    }
}

/// Dropdown listing the shape tools. Opens away from the docked edge.
#[derive(Debug, Clone)]
pub struct ShapesMenu {
    open: bool,
    last_used: ToolKind,
}

impl Default for ShapesMenu {
    fn default() -> Self {
        Self {
            open: false,
            last_used: ToolKind::Rectangle,
        }
    }
}

impl ShapesMenu {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn last_used(&self) -> ToolKind {
        self.last_used
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Remember `tool` if it belongs to the menu.
    fn remember(&mut self, tool: ToolKind) {
        if SHAPE_TOOLS.contains(&tool) {
            self.last_used = tool;
        }
    }

    fn placement(anchor: Rect, dock: DockPosition) -> (Align2, Pos2) {
        let gap = 6.0;
        match dock {
            DockPosition::Top => (Align2::CENTER_TOP, anchor.center_bottom() + Vec2::new(0.0, gap)),
            DockPosition::Right => (Align2::RIGHT_CENTER, anchor.left_center() - Vec2::new(gap, 0.0)),
            DockPosition::Bottom => (Align2::CENTER_BOTTOM, anchor.center_top() - Vec2::new(0.0, gap)),
            DockPosition::Left => (Align2::LEFT_CENTER, anchor.right_center() + Vec2::new(gap, 0.0)),
        }
    }

    /// Show the dropdown if open and return the picked tool.
    ///
    /// `trigger_clicked` suppresses click-outside closing on the frame the
    /// menu button itself was clicked.
    pub fn show(
        &mut self,
        ctx: &Context,
        anchor: Rect,
        dock: DockPosition,
        palette: &Palette,
        trigger_clicked: bool,
    ) -> Option<ToolKind> {
        if !self.open {
            return None;
        }
        let (pivot, pos) = Self::placement(anchor, dock);
        let mut picked = None;
        let area = egui::Area::new(Id::new("shapes_menu"))
            .pivot(pivot)
            .fixed_pos(pos)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                panel_frame(palette).show(ui, |ui| {
                    ui.set_min_width(140.0);
                    for tool in SHAPE_TOOLS {
                        let kbd = tool.shortcut().map(String::from).unwrap_or_default();
                        if menu_item(ui, palette, tool_label(tool), &kbd) {
                            picked = Some(tool);
                        }
                    }
                });
            });

        if let Some(tool) = picked {
            self.remember(tool);
            self.open = false;
        } else if area.response.clicked_elsewhere() && !trigger_clicked {
            self.open = false;
        }
        picked
    }
}

/// The primary tools toolbar.
///
/// Reads the active tool, the tool lock and the dock position through
/// selectors and rebuilds its button table only when one of them changes.
#[derive(Debug)]
pub struct PrimaryTools {
    active_tool: Selector<ToolKind>,
    is_tool_locked: Selector<bool>,
    dock_position: Selector<DockPosition>,
    shapes_menu: ShapesMenu,
    buttons: Vec<ToolbarButton>,
    rebuilds: u64,
}

impl PrimaryTools {
    pub fn new(store: &Store) -> Self {
        let mut tools = Self {
            active_tool: Selector::new(store, |s| s.app_state.active_tool),
            is_tool_locked: Selector::new(store, |s| s.app_state.is_tool_locked),
            dock_position: Selector::new(store, |s| s.settings.dock_position),
            shapes_menu: ShapesMenu::default(),
            buttons: Vec::new(),
            rebuilds: 0,
        };
        tools.rebuild();
        tools
    }

    pub fn buttons(&self) -> &[ToolbarButton] {
        &self.buttons
    }

    pub fn shapes_menu(&self) -> &ShapesMenu {
        &self.shapes_menu
    }

    pub fn flow(&self) -> Flow {
        Flow::from_horizontal(self.dock_position.get().is_horizontal())
    }

    /// Poll the selectors. Returns true when the table was rebuilt.
    pub fn sync(&mut self, store: &Store) -> bool {
        // Poll every selector so none keeps a stale version.
        let changed = [
            self.active_tool.poll(store),
            self.is_tool_locked.poll(store),
            self.dock_position.poll(store),
        ];
        if !changed.contains(&true) {
            return false;
        }
        self.rebuild();
        true
    }

    fn rebuild(&mut self) {
        let active_tool = *self.active_tool.get();
        self.shapes_menu.remember(active_tool);
        self.buttons = toolbar_buttons(
            active_tool,
            *self.is_tool_locked.get(),
            self.shapes_menu.last_used(),
        );
        self.rebuilds += 1;
    }

    /// Digit key presses for this frame, unless a text field has focus.
    fn keyboard_action(ctx: &Context) -> Option<ToolbarAction> {
        if ctx.wants_keyboard_input() {
            return None;
        }
        ctx.input(|input| {
            input.events.iter().find_map(|event| match event {
                egui::Event::Key {
                    key,
                    pressed: true,
                    repeat: false,
                    modifiers,
                    ..
                } if modifiers.is_none() => key_digit(*key).and_then(shortcut_action),
                _ => None,
            })
        })
    }

    /// Show the toolbar docked to the window edge and return the triggered
    /// action, if any.
    pub fn show(&mut self, ctx: &Context, store: &Store) -> Option<ToolbarAction> {
        self.sync(store);
        let is_dark_mode = store.snapshot().settings.is_dark_mode;
        let palette = theme::palette(is_dark_mode);
        let style = ToolButtonStyle::themed(is_dark_mode);
        let dock = *self.dock_position.get();
        let flow = self.flow();
        let (align, offset) = dock_anchor(dock);

        let mut clicked = None;
        let mut shapes_rect = Rect::NOTHING;
        let buttons = &self.buttons;
        egui::Area::new(Id::new("primary_tools"))
            .anchor(align, offset)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                toolbar_frame(&palette).show(ui, |ui| {
                    flow.show(ui, |ui| {
                        for button in buttons {
                            if button.entry == ToolbarEntry::Image {
                                flow_separator(ui, flow, palette.border);
                            }
                            let response = ToolButton::new(button.icon(), button.label)
                                .kbd(button.kbd)
                                .active(button.is_active)
                                .locked(button.is_locked)
                                .menu_indicator(matches!(button.entry, ToolbarEntry::Shapes(_)))
                                .style(style.clone())
                                .show_response(ui);
                            if matches!(button.entry, ToolbarEntry::Shapes(_)) {
                                shapes_rect = response.rect;
                            }
                            if response.clicked() {
                                clicked = Some(button.entry);
                            }
                        }
                    });
                });
            });

        let mut action = Self::keyboard_action(ctx);
        let mut trigger_clicked = false;
        match clicked {
            Some(ToolbarEntry::Tool(tool)) => action = Some(ToolbarAction::SelectTool(tool)),
            Some(ToolbarEntry::Image) => action = Some(ToolbarAction::OpenAsset),
            Some(ToolbarEntry::Shapes(_)) => {
                self.shapes_menu.toggle();
                trigger_clicked = true;
            }
            None => {}
        }
        if let Some(tool) = self
            .shapes_menu
            .show(ctx, shapes_rect, dock, &palette, trigger_clicked)
        {
            action = Some(ToolbarAction::SelectTool(tool));
        }
        action
    }
}

/// Register the image loaders the toolbar icons need.
pub fn install_image_loaders(ctx: &Context) {
    egui_extras::install_image_loaders(ctx);
}
