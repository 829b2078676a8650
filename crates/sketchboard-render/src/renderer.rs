//! Renderer trait abstraction.

use kurbo::{Affine, Size};
use peniko::Color;
use sketchboard_core::shapes::style::{CANVAS_DARK, CANVAS_LIGHT};
use sketchboard_core::visual::INDICATOR_COLOR;
use sketchboard_core::{RenderedShape, Settings, Shape};
use thiserror::Error;

/// Spacing of background grid lines in page units.
pub const GRID_SIZE: f64 = 20.0;

#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Nothing to render")]
    EmptyScene,
    #[error("Invalid export scale: {0}")]
    InvalidScale(f64),
}

/// Inputs for a single frame.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    /// Shape visuals back to front, as produced by `App::render_page`.
    pub shapes: &'a [RenderedShape],
    /// Visual for a shape being drawn, with its placement.
    pub preview: Option<(&'a sketchboard_core::Visual, Affine)>,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Page to screen transform (pan and zoom).
    pub view_transform: Affine,
    pub background_color: Color,
    pub show_grid: bool,
    pub selection_color: Color,
}

impl<'a> RenderContext<'a> {
    pub fn new(shapes: &'a [RenderedShape], viewport_size: Size) -> Self {
        Self {
            shapes,
            preview: None,
            viewport_size,
            view_transform: Affine::IDENTITY,
            background_color: CANVAS_LIGHT,
            show_grid: false,
            selection_color: INDICATOR_COLOR,
        }
    }

    /// Take background and grid from user settings.
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.background_color = if settings.is_dark_mode {
            CANVAS_DARK
        } else {
            CANVAS_LIGHT
        };
        self.show_grid = settings.show_grid;
        self
    }

    pub fn with_view_transform(mut self, transform: Affine) -> Self {
        self.view_transform = transform;
        self
    }

    pub fn with_preview(mut self, visual: &'a sketchboard_core::Visual, shape: &Shape) -> Self {
        let placement =
            sketchboard_core::visual::placement(shape.point(), shape.size(), shape.rotation());
        self.preview = Some((visual, placement));
        self
    }

    /// Current zoom level, read from the view transform.
    pub fn zoom(&self) -> f64 {
        self.view_transform.determinant().abs().sqrt().max(f64::EPSILON)
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Record all drawing commands for a frame.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Color to clear the surface with.
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketchboard_core::DockPosition;

    #[test]
    fn test_context_from_settings() {
        let settings = Settings {
            dock_position: DockPosition::Top,
            is_dark_mode: true,
            show_grid: true,
        };
        let ctx = RenderContext::new(&[], Size::new(800.0, 600.0)).with_settings(&settings);
        assert_eq!(ctx.background_color, CANVAS_DARK);
        assert!(ctx.show_grid);
    }

    #[test]
    fn test_zoom_from_transform() {
        let ctx = RenderContext::new(&[], Size::new(800.0, 600.0))
            .with_view_transform(Affine::translate((10.0, 5.0)) * Affine::scale(2.0));
        assert!((ctx.zoom() - 2.0).abs() < 1e-9);
    }
}
