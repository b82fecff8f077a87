//! Text tool and its live text editors.
//!
//! A [`TextEditor`] stands in for the host's editable text box. Each editor
//! owns a backing `Text` graph that is committed as soon as the editor opens
//! and kept in sync on every edit: hidden (`visible = false`) while the
//! editor shows the text itself, visible once the editor loses focus.
//!
//! The [`EditorRegistry`] observes the graph container so undo hides the
//! editor of an undone text and redo shows it again.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::{Rc, Weak};

use super::{AnnotationTool, StyleContext, ToolCore, wheel_step};
use crate::draw::{
    Color, FontDescriptor, Graph, GraphContainer, GraphHandle, TextData, text,
};
use crate::input::cursor::CustomCursor;
use crate::input::events::{PointerEvent, WheelEvent};
use crate::input::tool::ToolName;
use crate::input::touchpad::Touchpad;
use crate::observer::{Observer, TypedObservable};

pub const MIN_FONT_SIZE: f64 = 14.0;
pub const MAX_FONT_SIZE: f64 = 32.0;

const LINE_HEIGHT_FACTOR: f64 = 1.35;

/// `floor(font_size * 1.35)`, never shorter than the editor's first row.
pub fn line_height(font_size: f64, initial_height: f64) -> f64 {
    (font_size * LINE_HEIGHT_FACTOR).floor().max(initial_height)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EditorId(u64);

/// One live, editable text box.
pub struct TextEditor {
    id: EditorId,
    x: f64,
    y: f64,
    content: String,
    font: FontDescriptor,
    font_size: f64,
    color: Color,
    initial_height: f64,
    line_height: f64,
    max_width: f64,
    focused: bool,
    hidden: bool,
    graph: GraphHandle,
    /// Reused for every measurement; rebuilt when the font size changes
    layout: Option<pango::Layout>,
}

impl TextEditor {
    /// Opens a focused, empty editor with its top-left corner at `(x, y)`.
    ///
    /// Rows wrap at the right edge of the viewport.
    pub fn new(
        id: EditorId,
        (x, y): (f64, f64),
        font: FontDescriptor,
        font_size: f64,
        color: Color,
        viewport_width: f64,
    ) -> Self {
        let layout = text::measuring_layout(&font, font_size);
        let initial_height = layout
            .as_ref()
            .map(|layout| text::layout_size(layout, " ").1)
            .unwrap_or(font_size);
        let mut editor = Self {
            id,
            x,
            y,
            content: String::new(),
            font,
            font_size,
            color,
            initial_height,
            line_height: line_height(font_size, initial_height),
            max_width: (viewport_width - x).max(0.0),
            focused: true,
            hidden: false,
            graph: GraphHandle::new(Graph::Text(TextData::default())),
            layout,
        };
        editor.graph = GraphHandle::new(Graph::Text(editor.text_data(false)));
        editor
    }

    pub fn id(&self) -> EditorId {
        self.id
    }

    pub fn graph(&self) -> &GraphHandle {
        &self.graph
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn line_height(&self) -> f64 {
        self.line_height
    }

    pub fn max_width(&self) -> f64 {
        self.max_width
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Snapshot of the backing graph's data. The anchor sits at the
    /// vertical middle of the first row.
    fn text_data(&self, visible: bool) -> TextData {
        TextData {
            x: Some(self.x),
            y: Some(self.y + self.line_height / 2.0),
            content: Some(self.content.clone()),
            font: Some(self.font.clone()),
            font_size: Some(self.font_size),
            font_color: Some(self.color),
            line_height: Some(self.line_height),
            max_width: Some(self.max_width),
            visible: Some(visible),
        }
    }

    /// Box the editor occupies: `(x, y, width, height)`.
    ///
    /// An empty editor is one em wide and one row tall.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let measure = |row: &str| {
            self.layout
                .as_ref()
                .map(|layout| text::layout_size(layout, row).0)
                .unwrap_or(0.0)
        };
        let rows = text::wrap_rows(&self.content, self.max_width, measure);
        let widest = rows.iter().map(|row| measure(row)).fold(0.0, f64::max);
        let width = widest.max(self.font_size);
        let height = rows.len().max(1) as f64 * self.line_height;
        (self.x, self.y, width, height)
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        let (x, y, width, height) = self.bounds();
        px >= x && px <= x + width && py >= y && py <= y + height
    }

    fn set_font_size(&mut self, font_size: f64) {
        self.font_size = font_size;
        self.layout = text::measuring_layout(&self.font, font_size);
        self.line_height = line_height(font_size, self.initial_height);
    }

    fn move_to(&mut self, x: f64, y: f64, viewport_width: f64) {
        self.x = x;
        self.y = y;
        self.max_width = (viewport_width - x).max(0.0);
    }
}

// ============================================================================
// Registry
// ============================================================================

/// The text tool's editors plus the set hidden because their text was undone.
///
/// No method keeps a borrow alive across a graph mutation, so the container
/// notifications those mutations trigger can re-enter [`Observer::update`].
pub struct EditorRegistry {
    container: Rc<GraphContainer>,
    editors: RefCell<Vec<TextEditor>>,
    hidden_by_undo: RefCell<HashSet<EditorId>>,
    next_id: Cell<u64>,
}

impl EditorRegistry {
    pub fn new(container: Rc<GraphContainer>) -> Rc<Self> {
        Rc::new(Self {
            container,
            editors: RefCell::new(Vec::new()),
            hidden_by_undo: RefCell::new(HashSet::new()),
            next_id: Cell::new(0),
        })
    }

    pub fn len(&self) -> usize {
        self.editors.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.editors.borrow().is_empty()
    }

    pub fn ids(&self) -> Vec<EditorId> {
        self.editors.borrow().iter().map(TextEditor::id).collect()
    }

    /// Reads one editor.
    pub fn with_editor<R>(&self, id: EditorId, f: impl FnOnce(&TextEditor) -> R) -> Option<R> {
        self.editors
            .borrow()
            .iter()
            .find(|editor| editor.id == id)
            .map(f)
    }

    fn with_editor_mut<R>(
        &self,
        id: EditorId,
        f: impl FnOnce(&mut TextEditor) -> R,
    ) -> Option<R> {
        self.editors
            .borrow_mut()
            .iter_mut()
            .find(|editor| editor.id == id)
            .map(f)
    }

    pub fn focused(&self) -> Option<EditorId> {
        self.editors
            .borrow()
            .iter()
            .find(|editor| editor.focused)
            .map(TextEditor::id)
    }

    pub fn is_hidden_by_undo(&self, id: EditorId) -> bool {
        self.hidden_by_undo.borrow().contains(&id)
    }

    fn next_id(&self) -> EditorId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        EditorId(id)
    }

    /// Editor under `(x, y)`. Editors hidden by undo only come back through
    /// redo, so they never match.
    pub fn find_at(&self, x: f64, y: f64) -> Option<EditorId> {
        let hidden = self.hidden_by_undo.borrow();
        self.editors
            .borrow()
            .iter()
            .find(|editor| !hidden.contains(&editor.id) && editor.contains(x, y))
            .map(TextEditor::id)
    }

    /// Takes ownership of a new editor, committing whichever editor had
    /// focus. Returns the backing graph, not yet added to the container.
    pub fn open(&self, editor: TextEditor) -> GraphHandle {
        if let Some(current) = self.focused() {
            self.commit(current);
        }
        let graph = editor.graph.clone();
        log::debug!("Opened text editor {:?} at {:?}", editor.id, editor.position());
        self.editors.borrow_mut().push(editor);
        graph
    }

    /// Shows and focuses an existing editor; the previously focused one
    /// commits.
    pub fn focus(&self, id: EditorId) {
        if let Some(current) = self.focused()
            && current != id
        {
            self.commit(current);
        }
        self.with_editor_mut(id, |editor| {
            editor.hidden = false;
            editor.focused = true;
        });
    }

    /// Appends typed text to the focused editor. Returns `false` when no
    /// editor has focus.
    pub fn input(&self, typed: &str) -> bool {
        let Some(id) = self.focused() else {
            return false;
        };
        self.with_editor_mut(id, |editor| editor.content.push_str(typed));
        self.sync(id, false);
        true
    }

    /// Focus-out of the focused editor: the text becomes visible and the
    /// editor hides.
    pub fn commit_focused(&self) -> bool {
        match self.focused() {
            Some(id) => {
                self.commit(id);
                true
            }
            None => false,
        }
    }

    /// Moves the focused editor so its top-left corner is at `(x, y)`.
    pub fn move_focused(&self, x: f64, y: f64, viewport_width: f64) -> bool {
        let Some(id) = self.focused() else {
            return false;
        };
        self.with_editor_mut(id, |editor| editor.move_to(x, y, viewport_width));
        self.sync(id, false);
        true
    }

    pub fn set_font_size_focused(&self, font_size: f64) -> bool {
        let Some(id) = self.focused() else {
            return false;
        };
        self.with_editor_mut(id, |editor| editor.set_font_size(font_size));
        self.sync(id, false);
        true
    }

    /// Drops editors hidden by undo. Called after a fresh commit, which
    /// clears the redo history those editors were waiting on.
    pub fn remove_hidden_by_undo(&self) {
        let hidden = std::mem::take(&mut *self.hidden_by_undo.borrow_mut());
        if hidden.is_empty() {
            return;
        }
        log::debug!("Removing {} editor(s) hidden by undo", hidden.len());
        self.editors
            .borrow_mut()
            .retain(|editor| !hidden.contains(&editor.id));
    }

    /// Closes every editor, leaving each text visible.
    pub fn remove_all(&self) {
        let editors = std::mem::take(&mut *self.editors.borrow_mut());
        self.hidden_by_undo.borrow_mut().clear();
        for editor in editors {
            let data = editor.text_data(true);
            editor.graph.set(|graph| {
                if let Some(text) = graph.text_mut() {
                    *text = data;
                }
            });
        }
    }

    fn commit(&self, id: EditorId) {
        self.sync(id, true);
        self.with_editor_mut(id, |editor| {
            editor.hidden = true;
            editor.focused = false;
        });
        log::debug!("Committed text editor {:?}", id);
    }

    /// Pushes the editor's state into its backing graph.
    fn sync(&self, id: EditorId, visible: bool) {
        let Some((graph, data)) =
            self.with_editor(id, |editor| (editor.graph.clone(), editor.text_data(visible)))
        else {
            return;
        };
        graph.set(|graph| {
            if let Some(text) = graph.text_mut() {
                *text = data;
            }
        });
    }
}

impl Observer for EditorRegistry {
    fn update(&self, _source: &dyn TypedObservable) {
        let committed = self.container.graphs();
        let (Ok(mut editors), Ok(mut hidden)) = (
            self.editors.try_borrow_mut(),
            self.hidden_by_undo.try_borrow_mut(),
        ) else {
            log::trace!("Editor registry busy, skipping container update");
            return;
        };

        for editor in editors.iter_mut() {
            let in_container = committed.iter().any(|graph| graph.ptr_eq(&editor.graph));
            if !in_container {
                if hidden.insert(editor.id) {
                    log::debug!("Text of editor {:?} was undone, hiding it", editor.id);
                    editor.hidden = true;
                    editor.focused = false;
                }
            } else if hidden.remove(&editor.id) {
                log::debug!("Text of editor {:?} was redone, showing it", editor.id);
                editor.hidden = false;
            }
        }
    }
}

// ============================================================================
// Tool
// ============================================================================

/// Opens a text editor where the user clicks, or refocuses the one under the
/// pointer. Alt+move drags the focused editor; the wheel sets the font size.
pub struct TextTool {
    core: ToolCore,
    cursor: CustomCursor,
    registry: Rc<EditorRegistry>,
    font: FontDescriptor,
    font_size: f64,
    font_color: Color,
}

impl TextTool {
    pub fn new(
        container: Rc<GraphContainer>,
        touchpad: Rc<Touchpad>,
        font: FontDescriptor,
        font_size: f64,
        font_color: Color,
    ) -> Self {
        let font_size = font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        let mut cursor = CustomCursor::text_cursor();
        cursor.set_stroke_color(font_color);
        cursor.set_text_height(line_height(font_size, 0.0));

        let style = StyleContext {
            stroke_width: 1.0,
            stroke_color: font_color,
        };
        Self {
            core: ToolCore::new(Rc::clone(&container), touchpad, style).accept_any_button(),
            cursor,
            registry: EditorRegistry::new(container),
            font,
            font_size,
            font_color,
        }
    }

    pub fn registry(&self) -> &Rc<EditorRegistry> {
        &self.registry
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    fn observer(&self) -> Weak<dyn Observer> {
        let registry: Weak<EditorRegistry> = Rc::downgrade(&self.registry);
        registry
    }
}

impl AnnotationTool for TextTool {
    fn name(&self) -> ToolName {
        ToolName::Text
    }

    fn core(&self) -> &ToolCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ToolCore {
        &mut self.core
    }

    fn cursor(&self) -> &CustomCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut CustomCursor {
        &mut self.cursor
    }

    /// # Behavior
    /// - Over an editor (probing the pointer, half and full cursor height
    ///   below it): focus that editor
    /// - Elsewhere: open a new editor, commit its text graph, and drop
    ///   editors made stale by the cleared redo history
    fn on_mouse_down(&mut self, event: &PointerEvent) {
        if !event.is_primary_pressed() {
            return;
        }

        if !self.registry.is_empty() {
            let cursor_height = self.cursor.size().1;
            let hit = [event.y, event.y + cursor_height / 2.0, event.y + cursor_height]
                .into_iter()
                .find_map(|y| self.registry.find_at(event.x, y));
            if let Some(id) = hit {
                log::debug!("Pointer-down over text editor {:?}", id);
                self.registry.focus(id);
                return;
            }
        }

        let viewport_width = self.core.touchpad.viewport().0;
        let editor = TextEditor::new(
            self.registry.next_id(),
            (event.x, event.y),
            self.font.clone(),
            self.font_size,
            self.font_color,
            viewport_width,
        );
        let graph = self.registry.open(editor);
        self.add(graph);
        self.registry.remove_hidden_by_undo();
    }

    fn on_mouse_move(&mut self, event: &PointerEvent) {
        if event.alt {
            let viewport_width = self.core.touchpad.viewport().0;
            self.registry.move_focused(event.x, event.y, viewport_width);
        }
    }

    fn on_wheel(&mut self, event: &WheelEvent) {
        self.font_size = wheel_step(self.font_size, event, MIN_FONT_SIZE, MAX_FONT_SIZE);
        self.cursor.set_text_height(line_height(self.font_size, 0.0));
        self.registry.set_font_size_focused(self.font_size);
        log::debug!("Text font size -> {}", self.font_size);
    }

    fn on_activate(&mut self) {
        self.core.container.add_observer(self.observer());
    }

    fn on_deactivate(&mut self) {
        self.registry.remove_all();
        self.core.container.remove_observer(&self.observer());
    }
}
