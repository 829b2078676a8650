//! Sketchboard Core Library
//!
//! Shape records and utils, the page document, the session store and the
//! editor command surface for the sketchboard whiteboard.

pub mod app;
pub mod document;
pub mod settings;
pub mod shapes;
pub mod storage;
pub mod store;
pub mod svg;
pub mod tools;
pub mod visual;

pub use app::{App, AssetRequest, Commands, RenderedShape, export_shapes};
pub use document::Document;
pub use settings::{DockPosition, Settings, SettingsError};
pub use shapes::{Shape, ShapeError, ShapeId, ShapeKind, ShapePartial, ShapeUtil, ShapeUtils};
pub use store::{AppState, Selector, Snapshot, Store, SubscriptionId};
pub use tools::{ToolKind, ToolManager, UnknownTool};
pub use visual::{RenderMeta, RenderProps, Visual};
