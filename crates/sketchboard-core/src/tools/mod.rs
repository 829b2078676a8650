//! Tool system for the whiteboard.

use crate::shapes::{Shape, ShapeError, ShapeKind, ShapePartial, ShapeStyle, ShapeUtils, StylePartial};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raised for tool ids that name no known tool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tool: {0}")]
pub struct UnknownTool(pub String);

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Draw,
    Erase,
    Rectangle,
    Ellipse,
    Triangle,
    Line,
    Arrow,
    Text,
    Sticky,
    Heart,
}

impl ToolKind {
    pub const ALL: [ToolKind; 11] = [
        ToolKind::Select,
        ToolKind::Draw,
        ToolKind::Erase,
        ToolKind::Rectangle,
        ToolKind::Ellipse,
        ToolKind::Triangle,
        ToolKind::Line,
        ToolKind::Arrow,
        ToolKind::Text,
        ToolKind::Sticky,
        ToolKind::Heart,
    ];

    /// Stable string id.
    pub fn id(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Draw => "draw",
            ToolKind::Erase => "erase",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Ellipse => "ellipse",
            ToolKind::Triangle => "triangle",
            ToolKind::Line => "line",
            ToolKind::Arrow => "arrow",
            ToolKind::Text => "text",
            ToolKind::Sticky => "sticky",
            ToolKind::Heart => "heart",
        }
    }

    /// Digit key that selects this tool, if any.
    pub fn shortcut(self) -> Option<char> {
        match self {
            ToolKind::Select => Some('1'),
            ToolKind::Draw => Some('2'),
            ToolKind::Erase => Some('3'),
            ToolKind::Rectangle => Some('4'),
            ToolKind::Ellipse => Some('5'),
            ToolKind::Triangle => Some('6'),
            ToolKind::Line => Some('7'),
            ToolKind::Arrow => Some('8'),
            ToolKind::Text => Some('9'),
            ToolKind::Sticky => Some('0'),
            ToolKind::Heart => None,
        }
    }

    pub fn from_shortcut(key: char) -> Option<Self> {
        ToolKind::ALL.into_iter().find(|tool| tool.shortcut() == Some(key))
    }

    /// The shape kind this tool creates, for tools backed by a shape util.
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            ToolKind::Rectangle => Some(ShapeKind::Rectangle),
            ToolKind::Ellipse => Some(ShapeKind::Ellipse),
            ToolKind::Heart => Some(ShapeKind::Heart),
            _ => None,
        }
    }

    /// Whether the toolbar shows this tool's lock state.
    pub fn shows_lock(self) -> bool {
        matches!(self, ToolKind::Arrow | ToolKind::Text)
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ToolKind {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|tool| tool.id() == s)
            .ok_or_else(|| UnknownTool(s.to_string()))
    }
}

/// State of a tool interaction.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ToolState {
    #[default]
    Idle,
    /// A drag is in progress.
    Active { start: Point, current: Point },
}

/// Manages the current tool and its pointer interaction.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    pub current_tool: ToolKind,
    pub state: ToolState,
    /// Style applied to new shapes.
    pub current_style: ShapeStyle,
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool, dropping any interaction in progress.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
        self.state = ToolState::Idle;
    }

    pub fn begin(&mut self, point: Point) {
        self.state = ToolState::Active {
            start: point,
            current: point,
        };
    }

    pub fn update(&mut self, point: Point) {
        if let ToolState::Active { current, .. } = &mut self.state {
            *current = point;
        }
    }

    /// End the current interaction and build the shape it describes.
    pub fn end(&mut self, point: Point, utils: &ShapeUtils) -> Result<Option<Shape>, ShapeError> {
        let ToolState::Active { start, .. } = self.state else {
            return Ok(None);
        };
        self.state = ToolState::Idle;
        self.create_shape(start, point, utils)
    }

    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, ToolState::Active { .. })
    }

    /// Shape the current drag would create.
    pub fn preview_shape(&self, utils: &ShapeUtils) -> Option<Shape> {
        match self.state {
            ToolState::Active { start, current } => {
                self.create_shape(start, current, utils).ok().flatten()
            }
            ToolState::Idle => None,
        }
    }

    fn create_shape(
        &self,
        start: Point,
        end: Point,
        utils: &ShapeUtils,
    ) -> Result<Option<Shape>, ShapeError> {
        let Some(kind) = self.current_tool.shape_kind() else {
            return Ok(None);
        };
        let style = Some(StylePartial::from(self.current_style));
        let partial = match kind {
            // Fixed-size shapes are placed at the press point.
            ShapeKind::Heart => ShapePartial {
                point: Some(start),
                style,
                ..ShapePartial::default()
            },
            ShapeKind::Rectangle | ShapeKind::Ellipse => {
                let rect = Rect::from_points(start, end);
                ShapePartial {
                    point: Some(rect.origin()),
                    size: Some(Size::new(rect.width().max(1.0), rect.height().max(1.0))),
                    style,
                    ..ShapePartial::default()
                }
            }
        };
        utils.get_shape(kind, &partial).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_selection() {
        let mut tm = ToolManager::new();
        assert_eq!(tm.current_tool, ToolKind::Select);

        tm.set_tool(ToolKind::Rectangle);
        assert_eq!(tm.current_tool, ToolKind::Rectangle);
    }

    #[test]
    fn test_ids_round_trip_and_unknown_fails() {
        for tool in ToolKind::ALL {
            assert_eq!(tool.id().parse::<ToolKind>(), Ok(tool));
        }
        assert_eq!(
            "laser".parse::<ToolKind>(),
            Err(UnknownTool("laser".to_string()))
        );
    }

    #[test]
    fn test_shortcuts() {
        assert_eq!(ToolKind::from_shortcut('1'), Some(ToolKind::Select));
        assert_eq!(ToolKind::from_shortcut('0'), Some(ToolKind::Sticky));
        assert_eq!(ToolKind::from_shortcut('7'), Some(ToolKind::Line));
        assert_eq!(ToolKind::Heart.shortcut(), None);
        assert_eq!(ToolKind::from_shortcut('x'), None);
    }

    #[test]
    fn test_rectangle_drag() {
        let utils = ShapeUtils::new();
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Rectangle);

        assert!(!tm.is_active());
        tm.begin(Point::new(100.0, 100.0));
        assert!(tm.is_active());
        tm.update(Point::new(50.0, 60.0));
        let preview = tm.preview_shape(&utils).unwrap();
        assert_eq!(preview.point(), Point::new(50.0, 60.0));

        let shape = tm.end(Point::new(0.0, 0.0), &utils).unwrap().unwrap();
        assert_eq!(shape.kind(), ShapeKind::Rectangle);
        assert_eq!(shape.size(), Size::new(100.0, 100.0));
        assert!(!tm.is_active());
    }

    #[test]
    fn test_heart_click_places_default_size() {
        let utils = ShapeUtils::new();
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Heart);
        tm.begin(Point::new(5.0, 5.0));
        let shape = tm.end(Point::new(5.0, 5.0), &utils).unwrap().unwrap();
        assert_eq!(shape.kind(), ShapeKind::Heart);
        assert_eq!(shape.point(), Point::new(5.0, 5.0));
        assert_eq!(shape.size(), Size::new(70.0, 70.0));
    }

    #[test]
    fn test_cancel_interaction() {
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Rectangle);
        tm.begin(Point::new(0.0, 0.0));
        tm.cancel();
        assert!(!tm.is_active());
    }

    #[test]
    fn test_tools_without_util_create_nothing() {
        let utils = ShapeUtils::new();
        let mut tm = ToolManager::new();
        for tool in [ToolKind::Select, ToolKind::Draw, ToolKind::Triangle, ToolKind::Sticky] {
            tm.set_tool(tool);
            tm.begin(Point::new(0.0, 0.0));
            assert!(tm.end(Point::new(100.0, 100.0), &utils).unwrap().is_none());
        }
    }
}
