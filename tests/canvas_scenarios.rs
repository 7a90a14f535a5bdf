// End-to-end editing sessions driven through the public canvas API.

use std::cell::RefCell;
use std::rc::Rc;

use paint_light::{
    Canvas, CanvasObserver, Damage, EditorConfig, Error, FloodFill, Notice, PixelBuffer, Pixel, Rect,
    RenderFrame, Tolerance, ToolMode,
};

fn config(width: usize, height: usize) -> EditorConfig {
    EditorConfig { width, height, ..EditorConfig::default() }
}

#[derive(Default)]
struct Seen {
    frames: usize,
    last_selection: Option<Rect>,
    notices: Vec<Notice>,
}

struct Watcher(Rc<RefCell<Seen>>);

impl CanvasObserver for Watcher {
    fn render(&mut self, frame: &RenderFrame<'_>) {
        let mut seen = self.0.borrow_mut();
        seen.frames += 1;
        seen.last_selection = frame.selection;
    }

    fn notice(&mut self, notice: &Notice) {
        self.0.borrow_mut().notices.push(notice.clone());
    }
}

fn watched(canvas: &mut Canvas) -> Rc<RefCell<Seen>> {
    let seen = Rc::new(RefCell::new(Seen::default()));
    canvas.subscribe(Box::new(Watcher(seen.clone())));
    seen
}

#[test]
fn wand_on_blank_canvas_selects_everything() {
    let buf = PixelBuffer::blank(10, 10).unwrap();
    let res = FloodFill::new(Tolerance::new(0.0).unwrap()).select(&buf, 5, 5).unwrap();
    assert_eq!(res.mask.count(), 100);
    assert_eq!(res.bbox, Some(Rect::from_corners(0, 0, 9, 9)));
}

#[test]
fn wand_isolates_black_square_then_erase_removes_it() {
    let mut canvas = Canvas::new(&EditorConfig { tolerance: Tolerance::new(10.0).unwrap(), ..config(10, 10) }).unwrap();
    let seen = watched(&mut canvas);

    // Paint a 3x3 black square with a size-3 brush dab along one row.
    canvas.set_brush_size(3);
    canvas.pointer_down(3, 3);
    canvas.pointer_move(3, 3);
    canvas.pointer_up(3, 3);
    assert_eq!(canvas.buffer().pixels().iter().filter(|&&p| p == Pixel::BLACK).count(), 9);

    canvas.select_tool(ToolMode::MagicWand);
    canvas.pointer_down(3, 3);
    canvas.pointer_up(3, 3);
    assert_eq!(canvas.selection(), Some(Rect::from_corners(2, 2, 4, 4)));
    assert_eq!(seen.borrow().last_selection, Some(Rect::from_corners(2, 2, 4, 4)));
    assert!(seen.borrow().notices.iter().any(|n| matches!(n, Notice::WandSelected { pixels: 9, .. })));

    assert!(canvas.erase_selection());
    assert_eq!(canvas.selection(), None);
    assert_eq!(seen.borrow().last_selection, None);
    assert!(canvas.buffer().pixels().iter().all(|&p| p == Pixel::WHITE));
}

#[test]
fn rect_drag_from_bottom_right_normalizes() {
    let mut canvas = Canvas::new(&config(100, 100)).unwrap();
    canvas.select_tool(ToolMode::RectSelect);
    canvas.pointer_down(50, 50);
    canvas.pointer_move(30, 30);
    canvas.pointer_up(10, 10);
    assert_eq!(canvas.selection(), Some(Rect::from_corners(10, 10, 50, 50)));
}

#[test]
fn wand_off_canvas_is_not_fatal() {
    let mut canvas = Canvas::new(&config(20, 20)).unwrap();
    let seen = watched(&mut canvas);
    canvas.select_tool(ToolMode::MagicWand);
    canvas.pointer_down(-1, -1);
    canvas.pointer_up(-1, -1);
    assert_eq!(canvas.selection(), None);
    assert!(seen.borrow().notices.iter().any(|n| matches!(n, Notice::SeedOutsideCanvas { .. })));
}

#[test]
fn visit_cap_leaves_prior_selection() {
    let mut canvas = Canvas::new(&EditorConfig { max_fill_visits: Some(10), ..config(50, 50) }).unwrap();
    let seen = watched(&mut canvas);
    canvas.select_tool(ToolMode::MagicWand);

    // Small isolated dot fits under the cap.
    canvas.set_tolerance(Tolerance::new(0.0).unwrap());
    canvas.select_tool(ToolMode::Brush);
    canvas.set_brush_size(1);
    canvas.pointer_down(10, 10);
    canvas.pointer_move(11, 10);
    canvas.pointer_up(11, 10);
    canvas.select_tool(ToolMode::MagicWand);
    canvas.pointer_down(10, 10);
    canvas.pointer_up(10, 10);
    let dot = Some(Rect::from_corners(10, 10, 11, 10));
    assert_eq!(canvas.selection(), dot);

    // The white background is far too big.
    canvas.pointer_down(40, 40);
    canvas.pointer_up(40, 40);
    assert_eq!(canvas.selection(), dot);
    assert!(seen.borrow().notices.contains(&Notice::FillTooLarge { cap: 10 }));
}

#[test]
fn every_mutation_triggers_a_render() {
    let mut canvas = Canvas::new(&config(30, 30)).unwrap();
    let seen = watched(&mut canvas);
    canvas.pointer_down(1, 1);
    canvas.pointer_move(20, 20);
    let after_stroke = seen.borrow().frames;
    assert_eq!(after_stroke, 1);

    canvas.resize_canvas(15, 15).unwrap();
    canvas.clear_canvas(30, 30).unwrap();
    canvas.select_tool(ToolMode::RectSelect);
    assert_eq!(seen.borrow().frames, after_stroke + 3);
}

#[test]
fn resize_preserves_drawing_roughly() {
    let mut canvas = Canvas::new(&config(64, 64)).unwrap();
    canvas.set_brush_size(20);
    canvas.pointer_down(0, 32);
    canvas.pointer_move(63, 32);
    canvas.pointer_up(63, 32);
    canvas.resize_canvas(32, 32).unwrap();
    assert_eq!(canvas.buffer().dimensions(), (32, 32));
    assert!(canvas.buffer().get(16, 16).unwrap().r < 64);
    assert!(canvas.buffer().get(16, 1).unwrap().r > 192);

    assert!(matches!(canvas.resize_canvas(32, 0), Err(Error::InvalidDimensions { .. })));
    assert_eq!(canvas.buffer().dimensions(), (32, 32));
}

#[test]
fn save_and_reopen_is_pixel_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.png");

    let mut canvas = Canvas::new(&config(48, 32)).unwrap();
    canvas.set_color(Pixel::new(200, 40, 90));
    canvas.pointer_down(2, 2);
    canvas.pointer_move(40, 28);
    canvas.pointer_up(40, 28);
    canvas.save(&path).unwrap();
    let drawn = canvas.buffer().clone();

    let mut other = Canvas::new(&config(5, 5)).unwrap();
    let seen = watched(&mut other);
    other.load(&path).unwrap();
    assert_eq!(other.buffer(), &drawn);
    assert!(seen.borrow().notices.iter().any(|n| matches!(n, Notice::Loaded(_))));
}

#[test]
fn failed_load_leaves_canvas_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let mut canvas = Canvas::new(&config(8, 8)).unwrap();
    canvas.select_tool(ToolMode::RectSelect);
    canvas.pointer_down(1, 1);
    canvas.pointer_up(4, 4);
    let before = canvas.buffer().clone();

    let err = canvas.load(dir.path().join("absent.png")).unwrap_err();
    assert!(matches!(err, Error::Persistence { .. }));
    assert_eq!(canvas.buffer(), &before);
    assert_eq!(canvas.selection(), Some(Rect::from_corners(1, 1, 4, 4)));
}

#[test]
fn damage_hint_is_full_after_clear() {
    struct LastDamage(Rc<RefCell<Option<Damage>>>);
    impl CanvasObserver for LastDamage {
        fn render(&mut self, frame: &RenderFrame<'_>) {
            *self.0.borrow_mut() = Some(frame.damage);
        }
    }

    let mut canvas = Canvas::new(&config(8, 8)).unwrap();
    let last = Rc::new(RefCell::new(None));
    canvas.subscribe(Box::new(LastDamage(last.clone())));
    canvas.clear_canvas(8, 8).unwrap();
    assert_eq!(*last.borrow(), Some(Damage::Full));
}
