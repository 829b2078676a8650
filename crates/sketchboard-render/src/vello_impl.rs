//! Vello-based renderer implementation.

use crate::renderer::{GRID_SIZE, RenderContext, Renderer, RendererError};
use kurbo::{Affine, BezPath, Point, Rect, RoundedRect, Stroke};
use peniko::{Color, Fill};
use sketchboard_core::{RenderedShape, Visual};
use sketchboard_core::visual::INDICATOR_COLOR;
use vello::Scene;

/// Padding around exported content, in page units.
const EXPORT_PADDING: f64 = 16.0;

/// Records shape visuals into a Vello scene.
pub struct VelloRenderer {
    scene: Scene,
    selection_color: Color,
    /// Current zoom level (for zoom-independent UI strokes).
    zoom: f64,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            selection_color: INDICATOR_COLOR,
            zoom: 1.0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Build a scene for export: shapes only, cropped to `bounds` plus padding.
    ///
    /// Returns the scene and the output size in pixels.
    pub fn build_export_scene(
        &mut self,
        shapes: &[RenderedShape],
        bounds: Option<Rect>,
        background: Color,
        scale: f64,
    ) -> Result<(Scene, Rect), RendererError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(RendererError::InvalidScale(scale));
        }
        let bounds = bounds.ok_or(RendererError::EmptyScene)?;
        self.scene.reset();
        self.zoom = scale;

        let padded = bounds.inflate(EXPORT_PADDING, EXPORT_PADDING);
        let transform = Affine::scale(scale) * Affine::translate((-padded.x0, -padded.y0));
        let output = Rect::new(0.0, 0.0, padded.width() * scale, padded.height() * scale);

        self.scene
            .fill(Fill::NonZero, Affine::IDENTITY, background, None, &output);
        for shape in shapes {
            self.paint_visual(&shape.visual, transform * shape.transform, 1.0);
        }
        Ok((std::mem::take(&mut self.scene), output))
    }

    /// Paint a visual tree. `opacity` accumulates through groups.
    fn paint_visual(&mut self, visual: &Visual, transform: Affine, opacity: f64) {
        match visual {
            Visual::Group {
                transform: local,
                opacity: group_opacity,
                children,
            } => {
                let transform = transform * *local;
                let opacity = opacity * group_opacity;
                for child in children {
                    self.paint_visual(child, transform, opacity);
                }
            }
            Visual::Fill { path, color } => {
                self.scene.fill(
                    Fill::NonZero,
                    transform,
                    color.multiply_alpha(opacity as f32),
                    None,
                    path,
                );
            }
            Visual::Stroke {
                path,
                color,
                width,
                dashes,
            } => {
                let mut stroke = Stroke::new(*width);
                if !dashes.is_empty() {
                    stroke = stroke.with_dashes(0.0, dashes.iter().copied());
                }
                self.scene.stroke(
                    &stroke,
                    transform,
                    color.multiply_alpha(opacity as f32),
                    None,
                    path,
                );
            }
            Visual::Shadow {
                rect,
                radius,
                color,
                offset,
                blur,
            } => {
                self.scene.draw_blurred_rounded_rect(
                    transform * Affine::translate(*offset),
                    *rect,
                    color.multiply_alpha(opacity as f32),
                    *radius,
                    blur / 2.0,
                );
            }
            Visual::BindingIndicator { rect } => {
                let shape = RoundedRect::from_rect(*rect, 8.0);
                self.scene.fill(
                    Fill::NonZero,
                    transform,
                    self.selection_color.multiply_alpha(0.15 * opacity as f32),
                    None,
                    &shape,
                );
                self.scene.stroke(
                    &Stroke::new(2.0 / self.zoom),
                    transform,
                    self.selection_color.multiply_alpha(opacity as f32),
                    None,
                    &shape,
                );
            }
        }
    }

    /// Paint a selection / hover outline in the selection color at a
    /// zoom-independent width.
    fn paint_indicator(&mut self, visual: &Visual, transform: Affine) {
        for node in visual.walk() {
            if let Visual::Stroke { path, width, .. } = node {
                self.scene.stroke(
                    &Stroke::new(width / self.zoom),
                    transform,
                    self.selection_color,
                    None,
                    path,
                );
            }
        }
    }

    fn grid_bounds(&self, viewport: Rect, transform: Affine) -> (f64, f64, f64, f64) {
        let inv = transform.inverse();
        let world_tl = inv * Point::new(viewport.x0, viewport.y0);
        let world_br = inv * Point::new(viewport.x1, viewport.y1);

        let start_x = (world_tl.x / GRID_SIZE).floor() * GRID_SIZE;
        let start_y = (world_tl.y / GRID_SIZE).floor() * GRID_SIZE;
        let end_x = (world_br.x / GRID_SIZE).ceil() * GRID_SIZE;
        let end_y = (world_br.y / GRID_SIZE).ceil() * GRID_SIZE;

        (start_x, start_y, end_x, end_y)
    }

    fn render_grid_lines(&mut self, viewport: Rect, transform: Affine) {
        let grid_color = Color::from_rgba8(200, 200, 200, 100);
        let stroke = Stroke::new(0.5 / self.zoom);
        let (start_x, start_y, end_x, end_y) = self.grid_bounds(viewport, transform);

        let mut path = BezPath::new();
        let mut x = start_x;
        while x <= end_x {
            path.move_to(Point::new(x, start_y));
            path.line_to(Point::new(x, end_y));
            x += GRID_SIZE;
        }
        let mut y = start_y;
        while y <= end_y {
            path.move_to(Point::new(start_x, y));
            path.line_to(Point::new(end_x, y));
            y += GRID_SIZE;
        }
        self.scene.stroke(&stroke, transform, grid_color, None, &path);
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();
        self.selection_color = ctx.selection_color;
        self.zoom = ctx.zoom();
        let view = ctx.view_transform;

        if ctx.show_grid {
            let viewport = Rect::new(0.0, 0.0, ctx.viewport_size.width, ctx.viewport_size.height);
            self.render_grid_lines(viewport, view);
        }

        for shape in ctx.shapes {
            self.paint_visual(&shape.visual, view * shape.transform, 1.0);
        }

        // Indicators sit above every shape so overlapping shapes never hide them.
        for shape in ctx.shapes {
            if let Some(indicator) = &shape.indicator {
                self.paint_indicator(indicator, view * shape.transform);
            }
        }

        if let Some((visual, placement)) = ctx.preview {
            self.paint_visual(visual, view * placement, 1.0);
        }
        log::trace!("Built scene with {} shapes", ctx.shapes.len());
    }
}
