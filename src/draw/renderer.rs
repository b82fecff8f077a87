//! Layered compositor: background, annotations, and the export merge.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant;

use thiserror::Error;

use super::canvas_set::CanvasSet;
use super::container::GraphContainer;
use super::effects::{PixelBlock, SurfaceExtractor};
use super::graph::{Graph, ImageData};
use super::handle::GraphHandle;
use super::render::RenderPass;
use super::zoom::{self, ZoomDirection, ZoomResult, ZoomTip};
use crate::export::{self, ExportError};
use crate::observer::{Observer, TypedObservable};

/// Errors raised while setting up or resizing the drawing surfaces.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Device pixel ratio must be a positive number, got {0}")]
    InvalidDevicePixelRatio(f64),

    #[error("Background image has no pixels ({width}x{height})")]
    EmptyBackground { width: i32, height: i32 },

    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),
}

/// Draws the background and committed graphs onto their surfaces and
/// flattens them for export.
///
/// The renderer observes its graph container and redraws the annotation
/// surface on every notification.
pub struct Renderer {
    canvases: RefCell<CanvasSet>,
    container: Rc<GraphContainer>,
    background_graph: GraphHandle,
    /// Background size in logical pixels at 100% zoom
    base_size: (f64, f64),
    device_pixel_ratio: f64,
    scaling_ratio: Cell<f64>,
    zoom_tip: RefCell<ZoomTip>,
    /// Bumped on every annotation pass
    annotation_revision: Cell<u64>,
}

impl Renderer {
    /// Creates a renderer for `background` and registers it on `container`.
    ///
    /// The logical size is the image's pixel size divided by
    /// `device_pixel_ratio`, so the screenshot maps 1:1 onto device pixels.
    pub fn new(
        background: cairo::ImageSurface,
        device_pixel_ratio: f64,
        container: Rc<GraphContainer>,
    ) -> Result<Rc<Self>, RenderError> {
        if !device_pixel_ratio.is_finite() || device_pixel_ratio <= 0.0 {
            return Err(RenderError::InvalidDevicePixelRatio(device_pixel_ratio));
        }
        let (width, height) = (background.width(), background.height());
        if width <= 0 || height <= 0 {
            return Err(RenderError::EmptyBackground { width, height });
        }

        let base_size = (
            width as f64 / device_pixel_ratio,
            height as f64 / device_pixel_ratio,
        );
        log::info!(
            "Background {}x{} px at ratio {} -> {:.1}x{:.1} logical",
            width,
            height,
            device_pixel_ratio,
            base_size.0,
            base_size.1
        );

        let canvases = CanvasSet::new(base_size.0, base_size.1, device_pixel_ratio)?;
        let background_graph = GraphHandle::new(Graph::Image(ImageData {
            x: Some(0.0),
            y: Some(0.0),
            width: Some(base_size.0),
            height: Some(base_size.1),
            source: Some(background),
        }));

        let renderer = Rc::new(Self {
            canvases: RefCell::new(canvases),
            container: Rc::clone(&container),
            background_graph,
            base_size,
            device_pixel_ratio,
            scaling_ratio: Cell::new(1.0),
            zoom_tip: RefCell::new(ZoomTip::default()),
            annotation_revision: Cell::new(0),
        });

        let observer = Rc::downgrade(&renderer);
        container.add_observer(observer);

        Ok(renderer)
    }

    /// Commits a graph. The container notification triggers the redraw.
    pub fn render(&self, graph: GraphHandle) {
        self.container.add(graph);
    }

    /// Number of annotation passes so far. Hosts compare it against the last
    /// value they presented to decide whether to repaint.
    pub fn annotation_revision(&self) -> u64 {
        self.annotation_revision.get()
    }

    pub fn render_background(&self) {
        let canvases = self.canvases.borrow();
        canvases.background.clear();
        self.background_graph
            .render(canvases.background.context(), &RenderPass::default());
    }

    /// Clears the annotation surface and draws every committed graph in order.
    ///
    /// Pixel-effect graphs get a fresh extractor over the current background.
    /// `force` draws hidden graphs too.
    pub fn render_annotations(&self, force: bool) {
        let canvases = self.canvases.borrow();
        let annotation = &canvases.annotation;
        annotation.clear();

        for graph in self.container.as_ref() {
            let extractor;
            let pass = if graph.with(Graph::is_background_image_aware) {
                extractor =
                    SurfaceExtractor::new(canvases.background.surface(), self.device_pixel_ratio);
                RenderPass {
                    force,
                    extractor: Some(&extractor),
                }
            } else {
                RenderPass {
                    force,
                    extractor: None,
                }
            };
            graph.render(annotation.context(), &pass);
        }
        self.annotation_revision
            .set(self.annotation_revision.get() + 1);
    }

    pub fn render_all(&self, force: bool) {
        self.render_background();
        self.render_annotations(force);
    }

    /// Force-renders everything and flattens background + annotations onto
    /// the merge surface, returning its pixels.
    fn compose(&self) -> Result<PixelBlock, ExportError> {
        self.render_all(true);

        let canvases = self.canvases.borrow();
        let merge = &canvases.merge;
        merge.clear();

        let ctx = merge.context();
        ctx.save().map_err(RenderError::from)?;
        ctx.identity_matrix();
        for layer in [&canvases.background, &canvases.annotation] {
            ctx.set_source_surface(layer.surface(), 0.0, 0.0)
                .map_err(RenderError::from)?;
            ctx.paint().map_err(RenderError::from)?;
        }
        ctx.restore().map_err(RenderError::from)?;

        let (width, height) = merge.device_size();
        PixelBlock::read_from(merge.surface(), 0, 0, width, height).ok_or(ExportError::EmptyImage)
    }

    /// Exports the flattened image as a PNG data URL.
    pub fn export_image_to_data_url(&self) -> Result<String, ExportError> {
        let snapshot = self.compose()?;
        let png = export::encode_png(&snapshot)?;
        Ok(export::to_data_url(&png))
    }

    /// Exports the flattened image as PNG bytes.
    ///
    /// Composition happens before the first await; encoding runs on the
    /// blocking pool.
    pub async fn export_image(&self) -> Result<Vec<u8>, ExportError> {
        let snapshot = self.compose()?;
        let png = export::encode_png_async(snapshot).await?;
        log::info!("Exported {} PNG bytes", png.len());
        Ok(png)
    }

    /// Zooms one notch, anchored at the top-left corner.
    ///
    /// Resizes every surface to `base size * ratio`, scales the background
    /// and all committed graphs by the relative ratio, redraws, and shows
    /// the percentage tip. Returns `None` (and changes nothing) when the zoom
    /// would go below the minimum ratio.
    pub fn zoom(&self, direction: ZoomDirection) -> Result<Option<ZoomResult>, RenderError> {
        let Some(step) = zoom::step(self.scaling_ratio.get(), direction) else {
            log::debug!("Zoom {:?} refused at {:.1}", direction, self.scaling_ratio.get());
            return Ok(None);
        };

        let width = self.base_size.0 * step.scaling_ratio;
        let height = self.base_size.1 * step.scaling_ratio;
        self.canvases.borrow_mut().resize_all(width, height)?;
        self.scaling_ratio.set(step.scaling_ratio);

        self.background_graph.scale(step.graph_ratio);
        for graph in self.container.as_ref() {
            graph.scale(step.graph_ratio);
        }

        self.render_all(false);

        let text = zoom::percentage_text(step.scaling_ratio);
        log::debug!("Zoomed {:?} to {}", direction, text);
        self.zoom_tip.borrow_mut().show(text, Instant::now());

        Ok(Some(ZoomResult {
            width,
            height,
            scaling_ratio: step.scaling_ratio,
        }))
    }

    pub fn scaling_ratio(&self) -> f64 {
        self.scaling_ratio.get()
    }

    /// Current surface size in logical pixels.
    pub fn logical_size(&self) -> (f64, f64) {
        self.canvases.borrow().logical_size()
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// Zoom percentage to display at `now`, if the tip is still up.
    pub fn zoom_tip(&self, now: Instant) -> Option<String> {
        self.zoom_tip.borrow().visible_text(now).map(str::to_string)
    }

    pub fn container(&self) -> &Rc<GraphContainer> {
        &self.container
    }

    pub fn background_graph(&self) -> &GraphHandle {
        &self.background_graph
    }

    /// Handle to the annotation surface, for hosts that present it.
    pub fn annotation_surface(&self) -> cairo::ImageSurface {
        self.canvases.borrow().annotation.surface().clone()
    }

    /// Handle to the background surface, for hosts that present it.
    pub fn background_surface(&self) -> cairo::ImageSurface {
        self.canvases.borrow().background.surface().clone()
    }
}

impl Observer for Renderer {
    fn update(&self, _source: &dyn TypedObservable) {
        self.render_annotations(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::graph::{BoxData, StrokeStyle};
    use crate::draw::{Color, RED};

    fn solid_background(width: i32, height: i32, color: Color) -> cairo::ImageSurface {
        let surface =
            cairo::ImageSurface::create(cairo::Format::ARgb32, width, height).expect("surface");
        {
            let ctx = cairo::Context::new(&surface).expect("context");
            color.apply_to(&ctx);
            ctx.paint().expect("paint");
        }
        surface
    }

    fn renderer(dpr: f64) -> Rc<Renderer> {
        let background = solid_background(200, 100, Color::new(1.0, 1.0, 1.0, 1.0));
        Renderer::new(background, dpr, GraphContainer::new()).expect("renderer")
    }

    fn annotation_pixel(renderer: &Renderer, x: i32, y: i32) -> [u8; 4] {
        let surface = renderer.annotation_surface();
        PixelBlock::read_from(&surface, x, y, 1, 1)
            .expect("pixel")
            .pixel(0, 0)
    }

    fn rect(x: f64, y: f64, w: f64, h: f64) -> GraphHandle {
        GraphHandle::new(Graph::Rect {
            bounds: BoxData::new(x, y, w, h),
            stroke: StrokeStyle::new(RED, 2.0),
        })
    }

    #[test]
    fn logical_size_divides_by_pixel_ratio() {
        let renderer = renderer(2.0);
        assert_eq!(renderer.logical_size(), (100.0, 50.0));
        assert_eq!(
            renderer
                .background_graph()
                .with(|g| g.image().and_then(|i| i.width)),
            Some(100.0)
        );
    }

    #[test]
    fn invalid_inputs_fail_fast() {
        let background = solid_background(10, 10, RED);
        assert!(matches!(
            Renderer::new(background, 0.0, GraphContainer::new()),
            Err(RenderError::InvalidDevicePixelRatio(_))
        ));
        let empty = cairo::ImageSurface::create(cairo::Format::ARgb32, 0, 0).expect("surface");
        assert!(matches!(
            Renderer::new(empty, 1.0, GraphContainer::new()),
            Err(RenderError::EmptyBackground { .. })
        ));
    }

    #[test]
    fn container_changes_redraw_annotations() {
        let renderer = renderer(1.0);
        let graph = rect(10.0, 10.0, 50.0, 50.0);
        renderer.render(graph.clone());
        assert_eq!(annotation_pixel(&renderer, 10, 30), [255, 0, 0, 255]);

        renderer.container().undo_add();
        assert_eq!(annotation_pixel(&renderer, 10, 30)[3], 0);

        renderer.container().redo_add();
        graph.set(|g| {
            if let Some(bounds) = g.bounds_mut() {
                *bounds = BoxData::new(20.0, 10.0, 50.0, 50.0);
            }
        });
        assert_eq!(annotation_pixel(&renderer, 10, 30)[3], 0);
        assert_eq!(annotation_pixel(&renderer, 20, 30), [255, 0, 0, 255]);
    }

    #[test]
    fn committing_a_graph_draws_annotations_once() {
        let renderer = renderer(1.0);
        let before = renderer.annotation_revision();
        renderer.render(rect(10.0, 10.0, 50.0, 50.0));
        assert_eq!(renderer.annotation_revision(), before + 1);
        assert_eq!(annotation_pixel(&renderer, 10, 30), [255, 0, 0, 255]);
    }

    #[test]
    fn annotations_draw_at_device_resolution() {
        let renderer = renderer(2.0);
        renderer.render(rect(10.0, 10.0, 20.0, 20.0));
        // logical x = 10 is device x = 20
        assert_eq!(annotation_pixel(&renderer, 20, 40), [255, 0, 0, 255]);
        assert_eq!(annotation_pixel(&renderer, 10, 40)[3], 0);
    }

    #[test]
    fn zoom_round_trip_restores_geometry() {
        let renderer = renderer(1.0);
        let graph = rect(10.0, 20.0, 30.0, 40.0);
        renderer.render(graph.clone());

        let zoomed = renderer
            .zoom(ZoomDirection::In)
            .expect("zoom in")
            .expect("not refused");
        assert!((zoomed.width - 220.0).abs() < 1e-9);
        assert_eq!(renderer.zoom_tip(Instant::now()).as_deref(), Some("110%"));
        let bounds = graph.with(|g| *g.bounds().expect("bounds"));
        assert!((bounds.x.expect("x") - 11.0).abs() < 1e-9);

        renderer
            .zoom(ZoomDirection::Out)
            .expect("zoom out")
            .expect("not refused");
        assert!((renderer.scaling_ratio() - 1.0).abs() < 1e-9);
        let (x, y, w, h) = graph
            .with(|g| g.bounds().and_then(BoxData::complete))
            .expect("complete bounds");
        for (actual, expected) in [(x, 10.0), (y, 20.0), (w, 30.0), (h, 40.0)] {
            assert!((actual - expected).abs() < 1e-9);
        }
        let (width, height) = renderer.logical_size();
        assert!((width - 200.0).abs() < 1e-9 && (height - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zoom_out_is_refused_at_minimum() {
        let renderer = renderer(1.0);
        for _ in 0..9 {
            assert!(renderer.zoom(ZoomDirection::Out).expect("zoom").is_some());
        }
        assert!(renderer.zoom(ZoomDirection::Out).expect("zoom").is_none());
        assert!((renderer.scaling_ratio() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn export_composites_background_under_annotations() {
        let background = solid_background(40, 40, Color::new(0.0, 0.0, 1.0, 1.0));
        let renderer = Renderer::new(background, 1.0, GraphContainer::new()).expect("renderer");
        renderer.render(rect(10.0, 10.0, 20.0, 20.0));

        let snapshot = renderer.compose().expect("compose");
        assert_eq!((snapshot.width, snapshot.height), (40, 40));
        assert_eq!(snapshot.pixel(10, 20), [255, 0, 0, 255]);
        assert_eq!(snapshot.pixel(20, 20), [0, 0, 255, 255]);
    }

    #[test]
    fn data_url_export_is_png() {
        let renderer = renderer(1.0);
        let url = renderer.export_image_to_data_url().expect("export");
        assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[tokio::test]
    async fn async_export_yields_png_bytes() {
        let renderer = renderer(1.5);
        let png = renderer.export_image().await.expect("export");
        assert_eq!(&png[1..4], b"PNG");
    }
}
