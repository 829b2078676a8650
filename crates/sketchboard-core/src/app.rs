//! The editor: command surface over the store, shape utils and tools.

use crate::document::Document;
use crate::settings::{DockPosition, Settings};
use crate::shapes::{Shape, ShapeError, ShapeId, ShapeKind, ShapePartial, ShapeUtils, style};
use crate::store::{Snapshot, Store, SubscriptionId};
use crate::svg::{self, SvgElement, fmt_num};
use crate::tools::{ToolKind, ToolManager};
use crate::visual::{RenderMeta, RenderProps, Visual, placement};
use kurbo::{Affine, Point, Rect, Vec2};
use std::collections::{HashMap, VecDeque};

/// Padding around exported drawings.
const EXPORT_PADDING: f64 = 16.0;

/// Commands the toolbar may dispatch.
pub trait Commands {
    /// Make `tool` the active tool.
    fn select_tool(&mut self, tool: ToolKind);

    /// Ask the host to show an asset picker.
    fn open_asset(&mut self);
}

/// A request for the host to pick an external asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetRequest {
    Image,
}

/// One shape's visual for the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedShape {
    pub id: ShapeId,
    /// Maps shape-local coordinates to page coordinates.
    pub transform: Affine,
    pub visual: Visual,
    /// Outline drawn when the shape is selected or hovered.
    pub indicator: Option<Visual>,
    /// The visual was reused from the previous frame.
    pub reused: bool,
}

#[derive(Debug)]
struct CachedRender {
    shape: Shape,
    props: RenderProps,
    visual: Visual,
}

#[derive(Debug, Default)]
pub struct App {
    store: Store,
    utils: ShapeUtils,
    tools: ToolManager,
    asset_requests: VecDeque<AssetRequest>,
    render_cache: HashMap<ShapeId, CachedRender>,
}

impl App {
    pub fn new(document: Document, settings: Settings) -> Self {
        Self {
            store: Store::new(Snapshot {
                document,
                settings,
                ..Snapshot::default()
            }),
            ..Self::default()
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn snapshot(&self) -> &Snapshot {
        self.store.snapshot()
    }

    pub fn document(&self) -> &Document {
        &self.store.snapshot().document
    }

    pub fn utils(&self) -> &ShapeUtils {
        &self.utils
    }

    pub fn subscribe<T, S, C>(&mut self, selector: S, callback: C) -> SubscriptionId
    where
        T: PartialEq + 'static,
        S: Fn(&Snapshot) -> T + 'static,
        C: FnMut(&T) + 'static,
    {
        self.store.subscribe(selector, callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    pub fn toggle_tool_lock(&mut self) {
        let locked = self.store.update(|s| {
            s.app_state.is_tool_locked = !s.app_state.is_tool_locked;
            s.app_state.is_tool_locked
        });
        log::debug!("Tool lock {}", if locked { "on" } else { "off" });
    }

    pub fn set_dock_position(&mut self, dock: DockPosition) {
        if self.snapshot().settings.dock_position != dock {
            log::debug!("Dock toolbar {:?}", dock);
            self.store.update(|s| s.settings.dock_position = dock);
        }
    }

    pub fn toggle_dark_mode(&mut self) {
        self.store
            .update(|s| s.settings.is_dark_mode = !s.settings.is_dark_mode);
    }

    /// Build a shape from its kind's template and add it on top of the page.
    ///
    /// A partial naming the id of an existing shape is refused.
    pub fn create_shape(&mut self, kind: ShapeKind, partial: &ShapePartial) -> Result<ShapeId, ShapeError> {
        let shape = self.utils.get_shape(kind, partial).inspect_err(|e| {
            log::warn!("Rejected {} partial: {}", kind, e);
        })?;
        if self.document().contains(shape.id()) {
            log::warn!("Rejected {} partial: id {} is taken", kind, shape.id());
            return Err(ShapeError::DuplicateId(shape.id()));
        }
        Ok(self.insert_shape(shape))
    }

    fn insert_shape(&mut self, shape: Shape) -> ShapeId {
        log::debug!("Create {} {}", shape.kind(), shape.id());
        self.store.update(|s| {
            s.document.push_undo();
            let id = s.document.add_shape(shape);
            s.app_state.selected_ids = vec![id];
            id
        })
    }

    pub fn pointer_down(&mut self, point: Point) {
        self.tools.set_tool(self.snapshot().app_state.active_tool);
        self.tools.begin(point);
    }

    pub fn pointer_move(&mut self, point: Point) {
        self.tools.update(point);
    }

    /// Finish a drag. Creates a shape for shape tools, then returns to the
    /// select tool unless the tool is locked.
    pub fn pointer_up(&mut self, point: Point) -> Result<Option<ShapeId>, ShapeError> {
        let Some(shape) = self.tools.end(point, &self.utils)? else {
            return Ok(None);
        };
        let id = self.insert_shape(shape);
        if !self.snapshot().app_state.is_tool_locked {
            self.select_tool(ToolKind::Select);
        }
        Ok(Some(id))
    }

    /// Shape the current drag would create.
    pub fn preview_shape(&self) -> Option<Shape> {
        self.tools.preview_shape(&self.utils)
    }

    pub fn delete_selected(&mut self) {
        let ids = self.snapshot().app_state.selected_ids.clone();
        if ids.is_empty() {
            return;
        }
        let removed = self.store.update(|s| {
            s.document.push_undo();
            s.app_state.selected_ids.clear();
            ids.iter()
                .filter_map(|id| s.document.remove_shape(*id))
                .collect::<Vec<_>>()
        });
        for shape in &removed {
            self.utils.forget(shape);
            self.render_cache.remove(&shape.id());
        }
    }

    /// Resize a shape into `bounds`. `initial` is the shape as it was when
    /// the resize began.
    pub fn transform_shape(
        &mut self,
        id: ShapeId,
        initial: &Shape,
        bounds: Rect,
        scale: Vec2,
        origin: Vec2,
    ) -> Result<bool, ShapeError> {
        let Some(shape) = self.document().get_shape(id) else {
            return Ok(false);
        };
        let patch = self.utils.transform(shape, initial, bounds, scale, origin);
        self.apply_patch(id, patch)
    }

    /// Resize a shape that is the only one selected.
    pub fn transform_single_shape(
        &mut self,
        id: ShapeId,
        initial: &Shape,
        bounds: Rect,
        scale: Vec2,
        origin: Vec2,
    ) -> Result<bool, ShapeError> {
        let Some(shape) = self.document().get_shape(id) else {
            return Ok(false);
        };
        let patch = self
            .utils
            .transform_single(shape, initial, bounds, scale, origin);
        self.apply_patch(id, patch)
    }

    /// Apply a patch with an undo point. Empty patches leave the store untouched.
    pub fn update_shape(&mut self, id: ShapeId, patch: &ShapePartial) -> Result<bool, ShapeError> {
        self.apply_patch(id, patch.clone())
    }

    fn apply_patch(&mut self, id: ShapeId, patch: ShapePartial) -> Result<bool, ShapeError> {
        if patch.is_empty() || self.document().get_shape(id).is_none() {
            return Ok(false);
        }
        patch.validate().inspect_err(|e| log::warn!("Rejected patch for {}: {}", id, e))?;
        self.store.update(|s| {
            s.document.push_undo();
            s.document.update_shape(id, &patch)
        })
    }

    /// Highlight `target` as the shape an arrow would bind to. Shapes whose
    /// util cannot bind are refused and the current target is kept.
    pub fn set_binding_target(&mut self, target: Option<ShapeId>) -> bool {
        if let Some(id) = target {
            let Some(shape) = self.document().get_shape(id) else {
                log::warn!("Binding target {} does not exist", id);
                return false;
            };
            if !self.utils.capabilities(shape.kind()).can_bind {
                log::warn!("{} shapes cannot be bound", shape.kind());
                return false;
            }
        }
        if self.snapshot().app_state.binding_id != target {
            self.store.update(|s| s.app_state.binding_id = target);
        }
        true
    }

    pub fn select(&mut self, ids: Vec<ShapeId>) {
        let ids: Vec<ShapeId> = ids
            .into_iter()
            .filter(|id| self.document().get_shape(*id).is_some())
            .collect();
        if self.snapshot().app_state.selected_ids != ids {
            self.store.update(|s| s.app_state.selected_ids = ids);
        }
    }

    /// Select the topmost shape under `point`, or clear the selection.
    pub fn select_at(&mut self, point: Point) -> Option<ShapeId> {
        let hit = self.document().shapes_at_point(point, 0.0).first().copied();
        self.select(hit.into_iter().collect());
        hit
    }

    pub fn set_hovered(&mut self, id: Option<ShapeId>) {
        if self.snapshot().app_state.hovered_id != id {
            self.store.update(|s| s.app_state.hovered_id = id);
        }
    }

    pub fn undo(&mut self) -> bool {
        self.step_history(Document::undo)
    }

    pub fn redo(&mut self) -> bool {
        self.step_history(Document::redo)
    }

    /// Run an undo or redo step and drop cached data for shapes it removed.
    fn step_history(&mut self, step: fn(&mut Document) -> bool) -> bool {
        let before: Vec<Shape> = self.document().shapes_ordered().cloned().collect();
        let done = self.store.update(|s| {
            let done = step(&mut s.document);
            prune_selection(s);
            done
        });
        for shape in before {
            if !self.document().contains(shape.id()) {
                self.utils.forget(&shape);
                self.render_cache.remove(&shape.id());
            }
        }
        done
    }

    /// Drain pending asset picker requests.
    pub fn take_asset_requests(&mut self) -> Vec<AssetRequest> {
        self.asset_requests.drain(..).collect()
    }

    /// Visuals for every shape, back to front.
    ///
    /// A shape's previous visual is reused when its util reports that it
    /// would render identically and its render flags are unchanged.
    pub fn render_page(&mut self) -> Vec<RenderedShape> {
        let snapshot = self.store.snapshot();
        let state = &snapshot.app_state;
        let meta = RenderMeta {
            is_dark_mode: snapshot.settings.is_dark_mode,
        };

        let mut frame = Vec::with_capacity(snapshot.document.len());
        let mut cache = HashMap::with_capacity(snapshot.document.len());
        for shape in snapshot.document.shapes_ordered() {
            let id = shape.id();
            let props = RenderProps {
                meta,
                is_binding: state.binding_id == Some(id),
                is_hovered: state.hovered_id == Some(id),
                is_selected: state.selected_ids.contains(&id),
                ..RenderProps::default()
            };
            let previous = self.render_cache.remove(&id).filter(|cached| {
                cached.props == props && self.utils.should_skip_rerender(&cached.shape, shape)
            });
            let reused = previous.is_some();
            let visual = match previous {
                Some(cached) => cached.visual,
                None => self.utils.render(shape, &props),
            };
            let indicator = (props.is_selected || props.is_hovered).then(|| self.utils.indicator(shape));
            frame.push(RenderedShape {
                id,
                transform: placement(shape.point(), shape.size(), shape.rotation()),
                visual: visual.clone(),
                indicator,
                reused,
            });
            cache.insert(
                id,
                CachedRender {
                    shape: shape.clone(),
                    props,
                    visual,
                },
            );
        }
        self.render_cache = cache;
        frame
    }

    /// Export the selected shapes (or every shape when nothing is selected)
    /// as a standalone SVG document. Returns `None` for an empty page.
    pub fn export_svg(&self) -> Option<String> {
        let snapshot = self.snapshot();
        let selected = &snapshot.app_state.selected_ids;
        let shapes: Vec<&Shape> = snapshot
            .document
            .shapes_ordered()
            .filter(|s| selected.is_empty() || selected.contains(&s.id()))
            .collect();
        export_shapes(&self.utils, &shapes, snapshot.settings.is_dark_mode)
    }
}

/// Render `shapes` as an SVG document cropped to their bounds.
pub fn export_shapes(utils: &ShapeUtils, shapes: &[&Shape], is_dark_mode: bool) -> Option<String> {
    let bounds = shapes
        .iter()
        .map(|shape| utils.rotated_bounds(shape))
        .reduce(|a, b| a.union(b))?;
    let offset = Vec2::new(EXPORT_PADDING - bounds.x0, EXPORT_PADDING - bounds.y0);

    let body: Vec<SvgElement> = shapes
        .iter()
        .filter_map(|shape| {
            let fragment = utils.to_svg(shape, is_dark_mode)?;
            let point = shape.point() + offset;
            let size = shape.size();
            let mut transform = format!("translate({} {})", fmt_num(point.x), fmt_num(point.y));
            if shape.rotation() != 0.0 {
                transform.push_str(&format!(
                    " rotate({} {} {})",
                    fmt_num(shape.rotation().to_degrees()),
                    fmt_num(size.width / 2.0),
                    fmt_num(size.height / 2.0)
                ));
            }
            Some(SvgElement::new("g").attr("transform", transform).child(fragment))
        })
        .collect();

    let background = if is_dark_mode {
        style::CANVAS_DARK
    } else {
        style::CANVAS_LIGHT
    };
    Some(svg::document(
        bounds.width() + EXPORT_PADDING * 2.0,
        bounds.height() + EXPORT_PADDING * 2.0,
        Some(&style::to_hex(background)),
        body,
    ))
}

fn prune_selection(snapshot: &mut Snapshot) {
    let document = &snapshot.document;
    let state = &mut snapshot.app_state;
    state.selected_ids.retain(|id| document.get_shape(*id).is_some());
    if state.hovered_id.is_some_and(|id| document.get_shape(id).is_none()) {
        state.hovered_id = None;
    }
    if state.binding_id.is_some_and(|id| document.get_shape(id).is_none()) {
        state.binding_id = None;
    }
}

impl Commands for App {
    fn select_tool(&mut self, tool: ToolKind) {
        self.tools.set_tool(tool);
        if self.snapshot().app_state.active_tool == tool {
            return;
        }
        log::debug!("Select tool {}", tool);
        self.store.update(|s| s.app_state.active_tool = tool);
    }

    fn open_asset(&mut self) {
        log::debug!("Asset picker requested");
        self.asset_requests.push_back(AssetRequest::Image);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;

    fn app_with_heart() -> (App, ShapeId) {
        let mut app = App::default();
        let id = app
            .create_shape(ShapeKind::Heart, &ShapePartial::point(Point::new(5.0, 5.0)))
            .unwrap();
        (app, id)
    }

    #[test]
    fn test_select_tool_same_tool_leaves_store_unchanged() {
        let mut app = App::default();
        app.select_tool(ToolKind::Heart);
        let version = app.store().version();
        app.select_tool(ToolKind::Heart);
        assert_eq!(app.store().version(), version);
        assert_eq!(app.snapshot().app_state.active_tool, ToolKind::Heart);
    }

    #[test]
    fn test_open_asset_queues_request_without_touching_store() {
        let mut app = App::default();
        let version = app.store().version();
        app.open_asset();
        app.open_asset();
        assert_eq!(app.store().version(), version);
        assert_eq!(
            app.take_asset_requests(),
            vec![AssetRequest::Image, AssetRequest::Image]
        );
        assert!(app.take_asset_requests().is_empty());
    }

    #[test]
    fn test_pointer_creation_reverts_to_select() {
        let mut app = App::default();
        app.select_tool(ToolKind::Rectangle);
        app.pointer_down(Point::new(0.0, 0.0));
        app.pointer_move(Point::new(20.0, 10.0));
        assert!(app.preview_shape().is_some());
        let id = app.pointer_up(Point::new(40.0, 30.0)).unwrap().unwrap();

        assert_eq!(app.snapshot().app_state.active_tool, ToolKind::Select);
        assert_eq!(app.snapshot().app_state.selected_ids, vec![id]);
        assert_eq!(
            app.document().get_shape(id).unwrap().size(),
            Size::new(40.0, 30.0)
        );
    }

    #[test]
    fn test_tool_lock_keeps_tool() {
        let mut app = App::default();
        app.toggle_tool_lock();
        app.select_tool(ToolKind::Heart);
        app.pointer_down(Point::new(0.0, 0.0));
        app.pointer_up(Point::new(0.0, 0.0)).unwrap();
        app.pointer_down(Point::new(100.0, 0.0));
        app.pointer_up(Point::new(100.0, 0.0)).unwrap();

        assert_eq!(app.snapshot().app_state.active_tool, ToolKind::Heart);
        assert_eq!(app.document().len(), 2);
    }

    #[test]
    fn test_create_shape_rejects_malformed_partial() {
        let mut app = App::default();
        let bad = ShapePartial {
            point: Some(Point::new(f64::NAN, 0.0)),
            ..ShapePartial::default()
        };
        assert!(app.create_shape(ShapeKind::Heart, &bad).is_err());
        assert!(app.document().is_empty());
    }

    #[test]
    fn test_transform_heart_moves_only() {
        let (mut app, id) = app_with_heart();
        let initial = app.document().get_shape(id).unwrap().clone();
        let changed = app
            .transform_shape(
                id,
                &initial,
                Rect::new(0.0, 0.0, 140.0, 70.0),
                Vec2::new(2.0, 1.0),
                Vec2::ZERO,
            )
            .unwrap();
        assert!(changed);
        let heart = app.document().get_shape(id).unwrap();
        assert_eq!(heart.point(), Point::ZERO);
        assert_eq!(heart.size(), Size::new(70.0, 70.0));
    }

    #[test]
    fn test_transform_single_heart_is_noop() {
        let (mut app, id) = app_with_heart();
        let initial = app.document().get_shape(id).unwrap().clone();
        let version = app.store().version();
        let changed = app
            .transform_single_shape(
                id,
                &initial,
                Rect::new(0.0, 0.0, 140.0, 70.0),
                Vec2::new(2.0, 1.0),
                Vec2::ZERO,
            )
            .unwrap();
        assert!(!changed);
        assert_eq!(app.store().version(), version);
    }

    #[test]
    fn test_binding_target() {
        let (mut app, id) = app_with_heart();
        assert!(app.set_binding_target(Some(id)));
        assert_eq!(app.snapshot().app_state.binding_id, Some(id));
        assert!(!app.set_binding_target(Some(uuid::Uuid::new_v4())));
        assert_eq!(app.snapshot().app_state.binding_id, Some(id));

        let frame = app.render_page();
        assert!(frame[0].visual.has_binding_indicator());

        assert!(app.set_binding_target(None));
        let frame = app.render_page();
        assert!(!frame[0].visual.has_binding_indicator());
    }

    #[test]
    fn test_render_page_reuses_unchanged_visuals() {
        let (mut app, id) = app_with_heart();
        let first = app.render_page();
        assert!(!first[0].reused);

        // Moving does not change a heart's visual.
        app.update_shape(id, &ShapePartial::point(Point::new(50.0, 50.0)))
            .unwrap();
        let second = app.render_page();
        assert!(second[0].reused);
        assert_eq!(second[0].transform, Affine::translate((50.0, 50.0)));

        app.toggle_dark_mode();
        let third = app.render_page();
        assert!(!third[0].reused);
    }

    #[test]
    fn test_indicator_for_selected_and_hovered() {
        let (mut app, id) = app_with_heart();
        assert!(app.render_page()[0].indicator.is_some());
        app.select(vec![]);
        assert!(app.render_page()[0].indicator.is_none());
        app.set_hovered(Some(id));
        assert!(app.render_page()[0].indicator.is_some());
    }

    #[test]
    fn test_undo_redo_prunes_selection() {
        let (mut app, id) = app_with_heart();
        assert!(app.undo());
        assert!(app.document().is_empty());
        assert!(app.snapshot().app_state.selected_ids.is_empty());
        assert!(app.redo());
        assert!(app.document().get_shape(id).is_some());
    }

    #[test]
    fn test_delete_selected() {
        let (mut app, _) = app_with_heart();
        app.delete_selected();
        assert!(app.document().is_empty());
        assert!(app.undo());
        assert_eq!(app.document().len(), 1);
    }

    #[test]
    fn test_select_at_hits_topmost() {
        let (mut app, _) = app_with_heart();
        let top = app
            .create_shape(ShapeKind::Heart, &ShapePartial::point(Point::new(20.0, 20.0)))
            .unwrap();
        assert_eq!(app.select_at(Point::new(40.0, 40.0)), Some(top));
        assert_eq!(app.select_at(Point::new(500.0, 500.0)), None);
        assert!(app.snapshot().app_state.selected_ids.is_empty());
    }

    #[test]
    fn test_export_svg_wraps_fragments() {
        let (app, _) = app_with_heart();
        let svg = app.export_svg().unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("width=\"102\""));
        assert!(svg.contains("<g transform=\"translate(16 16)\"><g><rect width=\"70\" height=\"70\" fill=\"#fddf8e\" rx=\"3\" ry=\"3\"/></g></g>"));
        assert!(App::default().export_svg().is_none());
    }

    #[test]
    fn test_subscription_sees_dock_changes_once() {
        use std::cell::Cell;
        use std::rc::Rc;

        let mut app = App::default();
        let hits = Rc::new(Cell::new(0));
        let sink = hits.clone();
        app.subscribe(|s| s.settings.dock_position, move |_| sink.set(sink.get() + 1));
        app.set_dock_position(DockPosition::Left);
        app.set_dock_position(DockPosition::Left);
        app.toggle_dark_mode();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_create_shape_refuses_taken_id() {
        let (mut app, id) = app_with_heart();
        let partial = ShapePartial {
            id: Some(id),
            ..ShapePartial::default()
        };
        assert_eq!(
            app.create_shape(ShapeKind::Rectangle, &partial),
            Err(ShapeError::DuplicateId(id))
        );
        assert_eq!(app.document().len(), 1);
        assert_eq!(app.document().get_shape(id).map(Shape::kind), Some(ShapeKind::Heart));
    }

    #[test]
    fn test_undo_forgets_removed_shapes() {
        let mut app = App::default();
        for _ in 0..5 {
            app.create_shape(ShapeKind::Heart, &ShapePartial::default())
                .unwrap();
            app.export_svg().unwrap();
            app.render_page();
            assert!(app.undo());
        }
        assert!(app.document().is_empty());
        assert_eq!(app.utils().cached_bounds(), 0);
        assert!(app.render_cache.is_empty());
    }

    #[test]
    fn test_redo_of_delete_forgets_shape() {
        let (mut app, id) = app_with_heart();
        app.select(vec![id]);
        app.delete_selected();
        assert!(app.undo());
        app.export_svg().unwrap();
        assert_eq!(app.utils().cached_bounds(), 1);
        assert!(app.redo());
        assert_eq!(app.utils().cached_bounds(), 0);
    }
}
