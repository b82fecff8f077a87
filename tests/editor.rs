use std::io::Cursor;

use snapscribe::draw::{BoxData, Graph, GraphContainer, GraphHandle, GraphKind, PixelBlock};
use snapscribe::input::{PointerEvent, ToolName};
use snapscribe::{Editor, EditorOptions};

fn solid_background(width: i32, height: i32, rgb: (f64, f64, f64)) -> cairo::ImageSurface {
    let surface =
        cairo::ImageSurface::create(cairo::Format::ARgb32, width, height).expect("surface");
    {
        let ctx = cairo::Context::new(&surface).expect("context");
        ctx.set_source_rgb(rgb.0, rgb.1, rgb.2);
        ctx.paint().expect("paint");
    }
    surface
}

fn striped_background(width: i32, height: i32) -> cairo::ImageSurface {
    let surface =
        cairo::ImageSurface::create(cairo::Format::ARgb32, width, height).expect("surface");
    {
        let ctx = cairo::Context::new(&surface).expect("context");
        ctx.set_source_rgb(1.0, 1.0, 1.0);
        ctx.paint().expect("paint");
        ctx.set_source_rgb(0.0, 0.0, 0.0);
        for x in (0..width).step_by(2) {
            ctx.rectangle(x as f64, 0.0, 1.0, height as f64);
        }
        ctx.fill().expect("fill");
    }
    surface
}

fn decode(png: &[u8]) -> PixelBlock {
    let surface =
        cairo::ImageSurface::create_from_png(&mut Cursor::new(png)).expect("decodable PNG");
    PixelBlock::read_from(&surface, 0, 0, surface.width(), surface.height()).expect("pixels")
}

fn drag(editor: &Editor, from: (f64, f64), to: (f64, f64)) {
    editor.handle_input(PointerEvent::down(from.0, from.1));
    editor.handle_input(PointerEvent::moved(to.0, to.1, 1));
    editor.handle_input(PointerEvent::up(to.0, to.1));
}

#[test]
fn undo_then_redo_restores_paint_order() {
    let container = GraphContainer::new();
    let a = GraphHandle::new(Graph::empty(GraphKind::Rect));
    let b = GraphHandle::new(Graph::empty(GraphKind::Ellipse));
    container.add(a.clone());
    container.add(b.clone());

    assert!(container.undo_add());
    assert_eq!(container.graphs(), vec![a.clone()]);

    assert!(container.redo_add());
    assert_eq!(container.graphs(), vec![a, b.clone()]);
    assert!(container.top().is_some_and(|top| top.ptr_eq(&b)));
}

#[test]
fn new_graph_discards_redo_history() {
    let container = GraphContainer::new();
    container.add(GraphHandle::new(Graph::empty(GraphKind::Rect)));
    container.add(GraphHandle::new(Graph::empty(GraphKind::Line)));
    container.undo_add();
    assert_eq!(container.undone_len(), 1);

    container.add(GraphHandle::new(Graph::empty(GraphKind::Arrow)));
    assert_eq!(container.undone_len(), 0);
    assert!(!container.redo_add());
    assert_eq!(container.committed_len(), 2);
}

#[test]
fn drawn_rectangle_reaches_the_export() {
    let mut options = EditorOptions::default();
    options.stroke.stroke_width = 4.0;
    let mut editor =
        Editor::open(solid_background(100, 80, (1.0, 1.0, 1.0)), 1.0, options).expect("editor");

    editor.active_tool("RectangleTool").expect("rectangle tool");
    drag(&editor, (50.0, 50.0), (10.0, 10.0));
    assert_eq!(editor.container().committed_len(), 1);

    let url = editor.export_png_image_to_data_url().expect("data url");
    assert!(url.starts_with("data:image/png;base64,"));

    let rt = tokio::runtime::Runtime::new().expect("runtime");
    let pixels = decode(&rt.block_on(editor.export_png_image()).expect("png"));
    assert_eq!((pixels.width, pixels.height), (100, 80));
    assert_eq!(pixels.pixel(10, 30), [255, 0, 0, 255]);
    assert_eq!(pixels.pixel(30, 30), [255, 255, 255, 255]);
}

#[test]
fn undone_rectangle_is_not_exported() {
    let mut options = EditorOptions::default();
    options.stroke.stroke_width = 4.0;
    let mut editor =
        Editor::open(solid_background(60, 60, (1.0, 1.0, 1.0)), 1.0, options).expect("editor");

    editor.active_tool("RectangleTool").expect("rectangle tool");
    drag(&editor, (10.0, 10.0), (40.0, 40.0));
    assert!(editor.undo());

    let rt = tokio::runtime::Runtime::new().expect("runtime");
    let pixels = decode(&rt.block_on(editor.export_png_image()).expect("png"));
    assert_eq!(pixels.pixel(10, 20), [255, 255, 255, 255]);
}

#[test]
fn mosaic_averages_the_background_under_it() {
    let mut editor =
        Editor::open(striped_background(64, 32), 1.0, EditorOptions::default()).expect("editor");

    editor.active_tool("MosaicTool").expect("mosaic tool");
    drag(&editor, (0.0, 0.0), (16.0, 16.0));

    let rt = tokio::runtime::Runtime::new().expect("runtime");
    let pixels = decode(&rt.block_on(editor.export_png_image()).expect("png"));

    let [r, g, b, a] = pixels.pixel(3, 3);
    assert_eq!(a, 255);
    for channel in [r, g, b] {
        assert!((i32::from(channel) - 128).abs() <= 3, "channel {channel}");
    }
    // Outside the mosaic the stripes are untouched
    assert_eq!(pixels.pixel(40, 20), [0, 0, 0, 255]);
    assert_eq!(pixels.pixel(41, 20), [255, 255, 255, 255]);
}

#[test]
fn zoom_in_then_out_restores_geometry() {
    let mut editor = Editor::open(
        solid_background(200, 100, (1.0, 1.0, 1.0)),
        1.0,
        EditorOptions::default(),
    )
    .expect("editor");

    editor.active_tool("EllipseTool").expect("ellipse tool");
    drag(&editor, (20.0, 30.0), (80.0, 70.0));
    editor.exit_edit_mode();

    editor.on_viewport_wheel(-1.0).expect("zoom in");
    editor.on_viewport_wheel(1.0).expect("zoom out");

    assert!((editor.renderer().scaling_ratio() - 1.0).abs() < 1e-9);
    let (x, y, w, h) = editor
        .container()
        .top()
        .and_then(|graph| graph.with(|g| g.bounds().and_then(BoxData::complete)))
        .expect("ellipse bounds");
    for (actual, expected) in [(x, 20.0), (y, 30.0), (w, 60.0), (h, 40.0)] {
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }
}

#[test]
fn text_becomes_visible_when_editing_ends() {
    let mut editor = Editor::open(
        solid_background(200, 100, (1.0, 1.0, 1.0)),
        1.0,
        EditorOptions::default(),
    )
    .expect("editor");

    editor.active_tool("TextTool").expect("text tool");
    editor.handle_input(PointerEvent::down(10.0, 10.0));
    assert!(editor.text_input("Hello"));

    let graph = editor.container().top().expect("text graph");
    assert_eq!(graph.with(|g| g.text().and_then(|t| t.visible)), Some(false));

    editor.exit_edit_mode();
    assert_eq!(graph.with(|g| g.text().and_then(|t| t.visible)), Some(true));
    assert_eq!(
        graph.with(|g| g.text().and_then(|t| t.content.clone())),
        Some("Hello".to_string())
    );
    assert_eq!(editor.active_tool_name(), None);
    assert!(editor.tool(ToolName::Text).is_some());
}
