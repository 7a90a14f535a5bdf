// What you SEE now:
// • A white canvas. Hold Left Mouse to draw with the brush.
// • B brush, R rectangle select, W magic wand (click a colour region).
// • Delete/Backspace erases the selection, N clears the canvas.
// • C cycles ink colour, [ ] brush size, - = wand tolerance.
// • S saves to --output (PNG), O re-opens it. ESC quits.

mod draw;

use std::cell::RefCell;
use std::rc::Rc;

use clap::Parser;
use draw::{Drawer, MARQUEE_COLOR, draw_crosshair, draw_dashed_rect, draw_text_5x7};
use minifb::Key;
use paint_light::color::MAX_DISTANCE;
use paint_light::{
    Canvas, CanvasObserver, Cli, Error, FrameBuffer, Notice, Pixel, Rect, RenderFrame, Tolerance, ToolMode,
    io,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Ink colours `C` cycles through (stand-in for a colour picker dialog).
const PALETTE: [Pixel; 8] = [
    Pixel::BLACK,
    Pixel::new(220, 30, 30),
    Pixel::new(30, 160, 60),
    Pixel::new(30, 80, 220),
    Pixel::new(250, 200, 20),
    Pixel::new(240, 120, 20),
    Pixel::new(140, 40, 170),
    Pixel::new(128, 128, 128),
];

const TOLERANCE_STEP: f64 = 5.0;

/// What the window needs to know between frames; filled in by the canvas callbacks.
#[derive(Default)]
struct ViewState {
    dirty: bool,                // buffer or overlay changed; rebuild the base frame
    selection: Option<Rect>,
    preview: Option<Rect>,
    status: String,             // last notice, shown on the HUD
}

struct ShellView(Rc<RefCell<ViewState>>);

impl CanvasObserver for ShellView {
    fn render(&mut self, frame: &RenderFrame<'_>) {
        let mut view = self.0.borrow_mut();
        view.dirty = true;
        view.selection = frame.selection;
        view.preview = frame.preview;
    }

    fn notice(&mut self, notice: &Notice) {
        self.0.borrow_mut().status = match notice {
            Notice::ToolChanged(mode) => mode.label().to_string(),
            Notice::WandSelected { pixels, .. } => format!("WAND {pixels} PX"),
            Notice::SeedOutsideCanvas { .. } => "CLICK OUTSIDE CANVAS".to_string(),
            Notice::FillTooLarge { cap } => format!("REGION OVER {cap} PX"),
            Notice::Saved(path) => format!("SAVED {path}"),
            Notice::Loaded(path) => format!("LOADED {path}"),
            Notice::PersistenceFailed(_) => "SAVE/LOAD FAILED".to_string(),
            Notice::WandFailed(_) => "WAND FAILED".to_string(),
        };
    }
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    /* --- Config + canvas setup ---
       Visual: nothing yet; the drawing surface exists in memory. */
    let cli = Cli::parse();
    let config = cli.editor_config()?;
    let mut canvas = match &cli.open {
        Some(path) => Canvas::with_buffer(io::load_image(path)?, &config),
        None => Canvas::new(&config)?,
    };
    let view = Rc::new(RefCell::new(ViewState { dirty: true, ..ViewState::default() }));
    canvas.subscribe(Box::new(ShellView(view.clone())));

    /* --- Window ---
       Visual: window opens showing the canvas (white unless --open was given). */
    let (w, h) = canvas.buffer().dimensions();
    let mut drawer = Drawer::new("Photoshop Light", w, h)?;
    info!(width = w, height = h, output = %cli.output.display(), "editor ready");

    /* --- Reusable frame buffers ---
       `base` mirrors the canvas pixels; `screen` is base + overlays (what you see). */
    let mut base = FrameBuffer { width: w, height: h, pixels: Vec::with_capacity(w * h) };
    let mut screen = base.clone();
    let mut palette_idx = 0usize;
    let mut was_down = false;
    let mut last_pos = (0i32, 0i32);

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Follow window resizes: the drawing is resampled to the new size. */
        let (ww, wh) = drawer.size();
        if ww > 0 && wh > 0 && (ww, wh) != canvas.buffer().dimensions() {
            canvas.resize_canvas(ww, wh)?;
        }

        /* 2) Keyboard commands */
        if drawer.pressed_once(Key::B) {
            canvas.select_tool(ToolMode::Brush);
        }
        if drawer.pressed_once(Key::R) {
            canvas.select_tool(ToolMode::RectSelect);
        }
        if drawer.pressed_once(Key::W) {
            canvas.select_tool(ToolMode::MagicWand);
        }
        if drawer.pressed_once(Key::Delete) || drawer.pressed_once(Key::Backspace) {
            canvas.erase_selection(); // visual: selected box turns white
        }
        if drawer.pressed_once(Key::N) {
            let (cw, ch) = drawer.size();
            canvas.clear_canvas(cw.max(1), ch.max(1))?; // visual: blank sheet
        }
        if drawer.pressed_once(Key::C) {
            palette_idx = (palette_idx + 1) % PALETTE.len();
            canvas.set_color(PALETTE[palette_idx]);
        }
        if drawer.pressed_once(Key::LeftBracket) {
            canvas.set_brush_size(canvas.brush().size.saturating_sub(1));
        }
        if drawer.pressed_once(Key::RightBracket) {
            canvas.set_brush_size(canvas.brush().size.saturating_add(1));
        }
        if drawer.pressed_once(Key::Minus) {
            let t = (canvas.tolerance().value() - TOLERANCE_STEP).max(0.0);
            canvas.set_tolerance(Tolerance::new(t)?);
        }
        if drawer.pressed_once(Key::Equal) {
            let t = (canvas.tolerance().value() + TOLERANCE_STEP).min(MAX_DISTANCE);
            canvas.set_tolerance(Tolerance::new(t)?);
        }
        // Persistence failures are already on the HUD; keep the editor running.
        if drawer.pressed_once(Key::S) {
            if let Err(err) = canvas.save(&cli.output) {
                warn!(%err, "could not save canvas");
            }
        }
        if drawer.pressed_once(Key::O) {
            if let Err(err) = canvas.load(&cli.output) {
                warn!(%err, "could not open canvas");
            }
        }

        /* 3) Pointer: press / drag / release of the left button. */
        let down = drawer.left_mouse_down();
        if let Some(pos) = drawer.mouse_pos() {
            match (was_down, down) {
                (false, true) => canvas.pointer_down(pos.0, pos.1),
                (true, true) if pos != last_pos => canvas.pointer_move(pos.0, pos.1),
                (true, false) => canvas.pointer_up(pos.0, pos.1),
                _ => {}
            }
            last_pos = pos;
        } else if was_down && !down {
            canvas.pointer_up(last_pos.0, last_pos.1);
        }
        was_down = down;

        /* 4) Rebuild the base image only when the canvas said something changed. */
        let (selection, preview, status) = {
            let mut v = view.borrow_mut();
            if v.dirty {
                canvas.buffer().write_frame(&mut base);
                v.dirty = false;
            }
            (v.selection, v.preview.filter(|_| down), v.status.clone())
        };
        screen.width = base.width;
        screen.height = base.height;
        screen.pixels.clone_from(&base.pixels);

        /* 5) Overlays: marquee, rubber band, crosshair, HUD text */
        if let Some(rect) = selection {
            draw_dashed_rect(&mut screen, &rect, MARQUEE_COLOR);
        }
        if let Some(rect) = preview {
            draw_dashed_rect(&mut screen, &rect, MARQUEE_COLOR);
        }
        if let Some((mx, my)) = drawer.mouse_pos() {
            draw_crosshair(&mut screen, mx, my, 8, 0x00_FF_CC_33);
        }
        let brush = canvas.brush();
        let hud = format!(
            "{} | SIZE {} | TOL {:.0} | {}",
            canvas.tool_mode(),
            brush.size,
            canvas.tolerance().value(),
            status
        );
        draw_text_5x7(&mut screen, 8, 8, &hud, brush.color.to_u32(), 0x00_C0_C0_C0);

        /* 6) Present to the window (this is when the on-screen image updates). */
        drawer.present(&screen)?;
    }

    Ok(())
}
