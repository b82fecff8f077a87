//! Editing session: one opened image, its tools, and its undo history.
//!
//! [`Editor`] owns the input surface, the graph container and the renderer,
//! keeps track of which tool is active, and exposes the entry points the host
//! calls: tool switching, undo/redo, input forwarding, zoom and export.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Instant;

use thiserror::Error;

use crate::draw::{Color, FontDescriptor, GraphContainer, RED, RenderError, Renderer, ZoomDirection, ZoomResult};
use crate::export::ExportError;
use crate::input::tools::curve_tool::{DEFAULT_MARKER_OPACITY, DEFAULT_MARKER_WIDTH};
use crate::input::tools::text_tool::MIN_FONT_SIZE;
use crate::input::tools::{
    self, BoxTool, CurveTool, EditorRegistry, LineTool, NumberTool, TextTool,
};
use crate::input::{InputEvent, SharedTool, StyleContext, ToolName, Touchpad};

/// Errors reported by the editing session.
///
/// Unknown and duplicate tools are wiring bugs in the host, not user errors.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Tool {0} is already registered")]
    DuplicateTool(ToolName),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Initial style of the built-in tools.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorOptions {
    /// Shapes, lines, curves and numbered markers
    pub stroke: StyleContext,
    /// Marker pen; the color carries the translucency
    pub marker: StyleContext,
    pub font: FontDescriptor,
    pub font_size: f64,
    pub text_color: Color,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            stroke: StyleContext::default(),
            marker: StyleContext {
                stroke_width: DEFAULT_MARKER_WIDTH,
                stroke_color: RED.with_alpha(DEFAULT_MARKER_OPACITY),
            },
            font: FontDescriptor::default(),
            font_size: MIN_FONT_SIZE,
            text_color: RED,
        }
    }
}

type ZoomListener = Box<dyn Fn(&ZoomResult)>;

/// One annotation session over a background image.
pub struct Editor {
    touchpad: Rc<Touchpad>,
    container: Rc<GraphContainer>,
    renderer: Rc<Renderer>,
    tools: HashMap<ToolName, SharedTool>,
    active: Option<ToolName>,
    editing: bool,
    text_editors: Option<Rc<EditorRegistry>>,
    zoom_listeners: RefCell<Vec<ZoomListener>>,
}

impl Editor {
    /// Opens `background` for annotation with every built-in tool registered.
    ///
    /// # Errors
    /// Fails when the renderer cannot be built: a non-positive device pixel
    /// ratio, an empty image, or a surface that cairo refuses to create.
    pub fn open(
        background: cairo::ImageSurface,
        device_pixel_ratio: f64,
        options: EditorOptions,
    ) -> Result<Self, EditorError> {
        let container = GraphContainer::new();
        let renderer = Renderer::new(background, device_pixel_ratio, Rc::clone(&container))?;
        let (width, height) = renderer.logical_size();
        let touchpad = Touchpad::new(width, height);

        let mut editor = Self {
            touchpad,
            container,
            renderer,
            tools: HashMap::new(),
            active: None,
            editing: false,
            text_editors: None,
            zoom_listeners: RefCell::new(Vec::new()),
        };
        editor.register_builtin_tools(&options)?;
        editor.renderer.render_background();
        editor.renderer.render_annotations(false);

        Ok(editor)
    }

    fn register_builtin_tools(&mut self, options: &EditorOptions) -> Result<(), EditorError> {
        let container = &self.container;
        let touchpad = &self.touchpad;
        let stroke = options.stroke;

        let text = TextTool::new(
            Rc::clone(container),
            Rc::clone(touchpad),
            options.font.clone(),
            options.font_size,
            options.text_color,
        );
        self.text_editors = Some(Rc::clone(text.registry()));

        let builtin: Vec<SharedTool> = vec![
            shared(BoxTool::rectangle(container.clone(), touchpad.clone(), stroke)),
            shared(BoxTool::ellipse(container.clone(), touchpad.clone(), stroke)),
            shared(LineTool::straight_line(container.clone(), touchpad.clone(), stroke)),
            shared(CurveTool::free_curve(container.clone(), touchpad.clone(), stroke)),
            shared(CurveTool::marker_pen(
                container.clone(),
                touchpad.clone(),
                options.marker,
            )),
            shared(NumberTool::new(container.clone(), touchpad.clone(), stroke)),
            shared(LineTool::arrow(container.clone(), touchpad.clone(), stroke)),
            shared(BoxTool::eraser(container.clone(), touchpad.clone(), stroke)),
            shared(BoxTool::mosaic(container.clone(), touchpad.clone(), stroke)),
            shared(BoxTool::gaussian_blur(container.clone(), touchpad.clone(), stroke)),
            shared(text),
        ];
        for tool in builtin {
            self.register_tool(tool)?;
        }
        Ok(())
    }

    /// Adds a tool under its own name.
    ///
    /// # Errors
    /// [`EditorError::DuplicateTool`] if a tool with that name is registered.
    pub fn register_tool(&mut self, tool: SharedTool) -> Result<(), EditorError> {
        let name = tool.borrow().name();
        if self.tools.contains_key(&name) {
            return Err(EditorError::DuplicateTool(name));
        }
        log::debug!("Registered tool {}", name);
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Switches to the tool registered as `name` and enters edit mode.
    ///
    /// The previously active tool is deactivated first.
    ///
    /// # Errors
    /// [`EditorError::UnknownTool`] if `name` is not a registered tool. The
    /// active tool is left untouched in that case.
    pub fn active_tool(&mut self, name: &str) -> Result<(), EditorError> {
        let tool_name: ToolName = name
            .parse()
            .map_err(|_| EditorError::UnknownTool(name.to_string()))?;
        let tool = self
            .tools
            .get(&tool_name)
            .cloned()
            .ok_or_else(|| EditorError::UnknownTool(name.to_string()))?;

        self.deactivate_current();
        tools::activate(&tool);
        self.active = Some(tool_name);
        self.editing = true;
        log::info!("Active tool: {}", tool_name);
        Ok(())
    }

    /// Deactivates the current tool and leaves edit mode.
    pub fn exit_edit_mode(&mut self) {
        self.deactivate_current();
        self.editing = false;
        log::debug!("Left edit mode");
    }

    fn deactivate_current(&mut self) {
        if let Some(name) = self.active.take()
            && let Some(tool) = self.tools.get(&name)
        {
            tools::deactivate(tool);
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn active_tool_name(&self) -> Option<ToolName> {
        self.active
    }

    pub fn tool(&self, name: ToolName) -> Option<&SharedTool> {
        self.tools.get(&name)
    }

    /// Moves the most recent graph to the redo history.
    pub fn undo(&self) -> bool {
        self.container.undo_add()
    }

    pub fn redo(&self) -> bool {
        self.container.redo_add()
    }

    /// Forwards a pointer or wheel event to the active tool.
    pub fn handle_input(&self, event: impl Into<InputEvent>) {
        let event = event.into();
        log::trace!("Input {:?}", event);
        self.touchpad.dispatch(&event);
    }

    /// Wheel over the viewport: zooms one notch unless a tool is active,
    /// in which case the wheel belongs to the tool.
    pub fn on_viewport_wheel(&self, delta_y: f64) -> Result<Option<ZoomResult>, EditorError> {
        if self.editing {
            return Ok(None);
        }
        let Some(direction) = ZoomDirection::from_wheel_delta(delta_y) else {
            return Ok(None);
        };
        let Some(result) = self.renderer.zoom(direction)? else {
            return Ok(None);
        };

        self.touchpad.set_viewport(result.width, result.height);
        for listener in self.zoom_listeners.borrow().iter() {
            listener(&result);
        }
        Ok(Some(result))
    }

    /// Registers a callback run after every zoom with the new surface size.
    pub fn add_zoom_listener(&self, listener: impl Fn(&ZoomResult) + 'static) {
        self.zoom_listeners.borrow_mut().push(Box::new(listener));
    }

    /// Types into the focused text editor. Returns `false` if none has focus.
    pub fn text_input(&self, text: &str) -> bool {
        self.text_editors
            .as_ref()
            .is_some_and(|registry| registry.input(text))
    }

    /// Focus-out of the focused text editor.
    pub fn commit_text(&self) -> bool {
        self.text_editors
            .as_ref()
            .is_some_and(|registry| registry.commit_focused())
    }

    pub fn text_editors(&self) -> Option<&Rc<EditorRegistry>> {
        self.text_editors.as_ref()
    }

    /// Draws the active tool's cursor at the pointer.
    pub fn render_cursor(&self, ctx: &cairo::Context) {
        let Some(tool) = self.active.and_then(|name| self.tools.get(&name)) else {
            return;
        };
        if let Ok(tool) = tool.try_borrow() {
            tool.cursor().render(ctx);
        }
    }

    /// Flattens background and annotations into a PNG data URL.
    pub fn export_png_image_to_data_url(&self) -> Result<String, ExportError> {
        self.renderer.export_image_to_data_url()
    }

    /// Flattens background and annotations into PNG bytes.
    pub async fn export_png_image(&self) -> Result<Vec<u8>, ExportError> {
        self.renderer.export_image().await
    }

    /// Zoom percentage to show at `now`, while the tip is up.
    pub fn zoom_tip_text(&self, now: Instant) -> Option<String> {
        self.renderer.zoom_tip(now)
    }

    pub fn renderer(&self) -> &Rc<Renderer> {
        &self.renderer
    }

    pub fn container(&self) -> &Rc<GraphContainer> {
        &self.container
    }

    pub fn touchpad(&self) -> &Rc<Touchpad> {
        &self.touchpad
    }
}

fn shared<T: tools::AnnotationTool + 'static>(tool: T) -> SharedTool {
    Rc::new(RefCell::new(tool))
}
