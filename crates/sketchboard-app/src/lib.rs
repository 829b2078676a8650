//! Sketchboard application shell.
//!
//! Hosts the primary toolbar and the `sketchboard` command line tool.

pub mod cli;
mod ui;

pub use cli::{Cli, Command};
pub use ui::{
    PrimaryTools, SHAPE_TOOLS, ShapesMenu, ToolbarAction, ToolbarButton, ToolbarEntry,
    install_image_loaders, shortcut_action, tool_icon, tool_label, toolbar_buttons,
};
