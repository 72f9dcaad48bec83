use crate::browser;
use anyhow::{anyhow, Result};
// web assembly is a single threaded environment, so Rc RefCell > Mutex
use async_trait::async_trait;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, Path2d};

pub mod audio;
pub mod dialog;
pub mod input;

/// ┌──────────────────────────── Frame ─────────────────────────────┐
/// │                                                                │
/// │  requestAnimationFrame(now)                                    │
/// │     └─► Game::update(now)                                      │
/// │           ├─► Clock::update       dt = elapsed × multiplicator │
/// │           ├─► input drain         queued events → handlers     │
/// │           ├─► timers              due deferred commands        │
/// │           └─► State::update(dt)   physics, HUD, UI             │
/// │     └─► Game::draw(surfaces)                                   │
/// │           └─► clear ─► State::draw   layers back to front      │
/// │                                                                │
/// └────────────────────────────────────────────────────────────────┘
#[async_trait(?Send)]
pub trait Game {
    async fn initialize(&self) -> Result<Box<dyn Game>>;
    fn update(&mut self, now: f64);
    fn draw(&self, surfaces: &Surfaces);
}

pub struct GameLoop;

type SharedLoopClosure = Rc<RefCell<Option<browser::LoopClosure>>>;

impl GameLoop {
    pub async fn start(game: impl Game + 'static) -> Result<()> {
        let mut game = game.initialize().await?;
        let foreground = Renderer::new(browser::context(browser::html::FOREGROUND_ID)?);
        let ui = Renderer::new(browser::context(browser::html::UI_ID)?);

        let f: SharedLoopClosure = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(browser::create_raf_closure(move |perf: f64| {
            game.update(perf);
            game.draw(&Surfaces {
                foreground: &foreground,
                ui: &ui,
            });
            if let Some(next_frame) = f.borrow().as_ref() {
                if let Err(err) = browser::request_animation_frame(next_frame) {
                    error!("GameLoop: {:#?}", err);
                }
            }
        }));

        browser::request_animation_frame(
            g.borrow()
                .as_ref()
                .ok_or_else(|| anyhow!("GameLoop: Loop is None"))?,
        )?;

        Ok(())
    }
}

/// Wall clock of the game. `delta` is scaled by `multiplicator`, which the
/// game sets to 0 to freeze the simulation during intros.
#[derive(Debug, Clone, PartialEq)]
pub struct Clock {
    start_time: f64,
    last_time: f64,
    current_time: f64,
    pub multiplicator: f64,
    delta: f64,
}

impl Clock {
    pub fn new(now: f64) -> Self {
        Clock {
            start_time: now,
            last_time: now,
            current_time: now,
            multiplicator: 1.0,
            delta: 0.0,
        }
    }

    /// `now` in milliseconds
    pub fn update(&mut self, now: f64) {
        self.current_time = now;
        self.delta = ((self.current_time - self.last_time) / 1000.0) * self.multiplicator;
        self.last_time = self.current_time;
    }

    /// Seconds elapsed between the last two updates
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Milliseconds, as last passed to `update`
    pub fn now(&self) -> f64 {
        self.current_time
    }

    pub fn total_time(&self) -> f64 {
        self.current_time - self.start_time
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    Center,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Start => "start",
            TextAlign::Center => "center",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Middle,
}

impl TextBaseline {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextBaseline::Top => "top",
            TextBaseline::Middle => "middle",
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

impl Cursor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Pointer => "pointer",
        }
    }
}

/// The subset of the canvas 2D API the scene graph draws with
pub trait DrawingContext {
    fn save(&self);
    fn restore(&self);
    fn scale(&self, x: f64, y: f64);
    fn translate(&self, x: f64, y: f64);
    fn rotate(&self, angle: f64);
    fn set_fill_style(&self, color: &str);
    fn set_stroke_style(&self, color: &str);
    fn set_line_width(&self, width: f64);
    fn set_font(&self, font: &str);
    fn set_text_align(&self, align: TextAlign);
    fn set_text_baseline(&self, baseline: TextBaseline);
    fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64);
    fn stroke_rect(&self, x: f64, y: f64, width: f64, height: f64);
    fn clear_rect(&self, x: f64, y: f64, width: f64, height: f64);
    fn fill_text(&self, text: &str, x: f64, y: f64);
    fn stroke_text(&self, text: &str, x: f64, y: f64);
    fn measure_text(&self, text: &str) -> f64;
    fn begin_path(&self);
    fn move_to(&self, x: f64, y: f64);
    fn line_to(&self, x: f64, y: f64);
    fn stroke(&self);
    fn fill(&self);
    /// Strokes an SVG path string (`M23 20l135 163...`)
    fn stroke_svg(&self, path: &str);
    fn fill_svg(&self, path: &str);
}

/// Saves the context state on creation and restores it when dropped, so the
/// restore also happens when a draw callback unwinds
pub struct SavedState<'a> {
    context: &'a dyn DrawingContext,
}

impl<'a> SavedState<'a> {
    pub fn new(context: &'a dyn DrawingContext) -> Self {
        context.save();
        SavedState { context }
    }
}

impl Drop for SavedState<'_> {
    fn drop(&mut self) {
        self.context.restore();
    }
}

/// Both canvases of the game, UI stacked on top of the foreground
pub struct Surfaces<'a> {
    pub foreground: &'a dyn DrawingContext,
    pub ui: &'a dyn DrawingContext,
}

impl Surfaces<'_> {
    pub fn clear(&self, width: f64, height: f64) {
        self.foreground.clear_rect(0.0, 0.0, width, height);
        self.ui.clear_rect(0.0, 0.0, width, height);
    }
}

pub struct Renderer {
    context: CanvasRenderingContext2d,
}

impl Renderer {
    pub fn new(context: CanvasRenderingContext2d) -> Self {
        Renderer { context }
    }

    fn path(&self, svg: &str) -> Option<Path2d> {
        match Path2d::new_with_path_string(svg) {
            Ok(path) => Some(path),
            Err(err) => {
                error!("[engine::Renderer] invalid SVG path : {:#?}", err);
                None
            }
        }
    }
}

fn report(result: Result<(), JsValue>) {
    if let Err(err) = result {
        error!("[engine::Renderer] canvas call failed : {:#?}", err);
    }
}

impl DrawingContext for Renderer {
    fn save(&self) {
        self.context.save();
    }

    fn restore(&self) {
        self.context.restore();
    }

    fn scale(&self, x: f64, y: f64) {
        report(self.context.scale(x, y));
    }

    fn translate(&self, x: f64, y: f64) {
        report(self.context.translate(x, y));
    }

    fn rotate(&self, angle: f64) {
        report(self.context.rotate(angle));
    }

    fn set_fill_style(&self, color: &str) {
        self.context.set_fill_style_str(color);
    }

    fn set_stroke_style(&self, color: &str) {
        self.context.set_stroke_style_str(color);
    }

    fn set_line_width(&self, width: f64) {
        self.context.set_line_width(width);
    }

    fn set_font(&self, font: &str) {
        self.context.set_font(font);
    }

    fn set_text_align(&self, align: TextAlign) {
        self.context.set_text_align(align.as_str());
    }

    fn set_text_baseline(&self, baseline: TextBaseline) {
        self.context.set_text_baseline(baseline.as_str());
    }

    fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64) {
        self.context.fill_rect(x, y, width, height);
    }

    fn stroke_rect(&self, x: f64, y: f64, width: f64, height: f64) {
        self.context.stroke_rect(x, y, width, height);
    }

    fn clear_rect(&self, x: f64, y: f64, width: f64, height: f64) {
        self.context.clear_rect(x, y, width, height);
    }

    fn fill_text(&self, text: &str, x: f64, y: f64) {
        report(self.context.fill_text(text, x, y));
    }

    fn stroke_text(&self, text: &str, x: f64, y: f64) {
        report(self.context.stroke_text(text, x, y));
    }

    fn measure_text(&self, text: &str) -> f64 {
        match self.context.measure_text(text) {
            Ok(metrics) => metrics.width(),
            Err(err) => {
                error!("[engine::Renderer] measure_text failed : {:#?}", err);
                0.0
            }
        }
    }

    fn begin_path(&self) {
        self.context.begin_path();
    }

    fn move_to(&self, x: f64, y: f64) {
        self.context.move_to(x, y);
    }

    fn line_to(&self, x: f64, y: f64) {
        self.context.line_to(x, y);
    }

    fn stroke(&self) {
        self.context.stroke();
    }

    fn fill(&self) {
        self.context.fill();
    }

    fn stroke_svg(&self, path: &str) {
        if let Some(path) = self.path(path) {
            self.context.stroke_with_path(&path);
        }
    }

    fn fill_svg(&self, path: &str) {
        if let Some(path) = self.path(path) {
            self.context.fill_with_path_2d(&path);
        }
    }
}
