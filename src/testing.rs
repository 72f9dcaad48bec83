//! Recording stand-ins for the browser capabilities, for native tests.

use crate::config::Config;
use crate::engine::audio::Audio;
use crate::engine::dialog::Dialog;
use crate::engine::input::{EventKind, InputEvent, InputSource};
use crate::engine::{DrawingContext, TextAlign, TextBaseline};
use crate::geometry::Point;
use crate::level::{LanderStart, Level, Maps, StartingPos};
use crate::state::Context;
use anyhow::Result;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Save,
    Restore,
    Scale(f64, f64),
    Translate(f64, f64),
    Rotate(f64),
    FillStyle(String),
    StrokeStyle(String),
    LineWidth(f64),
    Font(String),
    TextAlign(TextAlign),
    TextBaseline(TextBaseline),
    FillRect(f64, f64, f64, f64),
    StrokeRect(f64, f64, f64, f64),
    ClearRect(f64, f64, f64, f64),
    FillText(String, f64, f64),
    StrokeText(String, f64, f64),
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Stroke,
    Fill,
    StrokeSvg(String),
    FillSvg(String),
}

/// Remembers every call; text is measured at 8 px per character
#[derive(Debug, Default)]
pub struct RecordingContext {
    calls: RefCell<Vec<Call>>,
}

impl RecordingContext {
    pub const CHAR_WIDTH: f64 = 8.0;

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Every `fill_text` as (text, x, y)
    pub fn texts(&self) -> Vec<(String, f64, f64)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::FillText(text, x, y) => Some((text.clone(), *x, *y)),
                _ => None,
            })
            .collect()
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|(text, _, _)| text.contains(needle))
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl DrawingContext for RecordingContext {
    fn save(&self) {
        self.record(Call::Save);
    }

    fn restore(&self) {
        self.record(Call::Restore);
    }

    fn scale(&self, x: f64, y: f64) {
        self.record(Call::Scale(x, y));
    }

    fn translate(&self, x: f64, y: f64) {
        self.record(Call::Translate(x, y));
    }

    fn rotate(&self, angle: f64) {
        self.record(Call::Rotate(angle));
    }

    fn set_fill_style(&self, color: &str) {
        self.record(Call::FillStyle(color.to_string()));
    }

    fn set_stroke_style(&self, color: &str) {
        self.record(Call::StrokeStyle(color.to_string()));
    }

    fn set_line_width(&self, width: f64) {
        self.record(Call::LineWidth(width));
    }

    fn set_font(&self, font: &str) {
        self.record(Call::Font(font.to_string()));
    }

    fn set_text_align(&self, align: TextAlign) {
        self.record(Call::TextAlign(align));
    }

    fn set_text_baseline(&self, baseline: TextBaseline) {
        self.record(Call::TextBaseline(baseline));
    }

    fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64) {
        self.record(Call::FillRect(x, y, width, height));
    }

    fn stroke_rect(&self, x: f64, y: f64, width: f64, height: f64) {
        self.record(Call::StrokeRect(x, y, width, height));
    }

    fn clear_rect(&self, x: f64, y: f64, width: f64, height: f64) {
        self.record(Call::ClearRect(x, y, width, height));
    }

    fn fill_text(&self, text: &str, x: f64, y: f64) {
        self.record(Call::FillText(text.to_string(), x, y));
    }

    fn stroke_text(&self, text: &str, x: f64, y: f64) {
        self.record(Call::StrokeText(text.to_string(), x, y));
    }

    fn measure_text(&self, text: &str) -> f64 {
        text.chars().count() as f64 * Self::CHAR_WIDTH
    }

    fn begin_path(&self) {
        self.record(Call::BeginPath);
    }

    fn move_to(&self, x: f64, y: f64) {
        self.record(Call::MoveTo(x, y));
    }

    fn line_to(&self, x: f64, y: f64) {
        self.record(Call::LineTo(x, y));
    }

    fn stroke(&self) {
        self.record(Call::Stroke);
    }

    fn fill(&self) {
        self.record(Call::Fill);
    }

    fn stroke_svg(&self, path: &str) {
        self.record(Call::StrokeSvg(path.to_string()));
    }

    fn fill_svg(&self, path: &str) {
        self.record(Call::FillSvg(path.to_string()));
    }
}

#[derive(Debug, Default)]
struct InputState {
    listening: Vec<EventKind>,
    pending: Vec<(EventKind, InputEvent)>,
}

/// Input fed by the test. Clones share state, so a test can keep a handle
/// after giving one to the machine.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    state: Rc<RefCell<InputState>>,
}

impl ScriptedInput {
    /// Delivers `event` only if something listens to `kind`, like the DOM
    pub fn fire(&self, kind: EventKind, event: InputEvent) {
        let mut state = self.state.borrow_mut();
        if state.listening.contains(&kind) {
            state.pending.push((kind, event));
        }
    }

    pub fn click(&self, x: f64, y: f64) {
        self.fire(EventKind::Click, InputEvent::Pointer(Point::new(x, y)));
    }

    pub fn key_down(&self, key: &str) {
        self.fire(EventKind::KeyDown, InputEvent::Key(key.to_string()));
    }

    pub fn key_up(&self, key: &str) {
        self.fire(EventKind::KeyUp, InputEvent::Key(key.to_string()));
    }

    pub fn listening(&self) -> Vec<EventKind> {
        self.state.borrow().listening.clone()
    }
}

impl InputSource for ScriptedInput {
    fn listen(&mut self, kind: EventKind) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if !state.listening.contains(&kind) {
            state.listening.push(kind);
        }
        Ok(())
    }

    fn unlisten(&mut self, kind: EventKind) -> Result<()> {
        self.state.borrow_mut().listening.retain(|listening| *listening != kind);
        Ok(())
    }

    fn poll(&mut self) -> Vec<(EventKind, InputEvent)> {
        std::mem::take(&mut self.state.borrow_mut().pending)
    }
}

#[derive(Debug, Default)]
struct AudioState {
    log: Vec<String>,
    unloaded: Vec<String>,
    gains: HashMap<String, f64>,
}

/// Logs every call as `action name`. Sounds are loaded unless marked
/// otherwise with `set_unloaded`.
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    state: Rc<RefCell<AudioState>>,
}

impl RecordingAudio {
    pub fn log(&self) -> Vec<String> {
        self.state.borrow().log.clone()
    }

    pub fn played(&self, name: &str) -> bool {
        self.log().contains(&format!("play {}", name))
    }

    /// Last gain set for `name`, 0 when never set
    pub fn gain(&self, name: &str) -> f64 {
        self.state.borrow().gains.get(name).copied().unwrap_or(0.0)
    }

    pub fn set_unloaded(&self, name: &str, unloaded: bool) {
        let mut state = self.state.borrow_mut();
        state.unloaded.retain(|sound| sound != name);
        if unloaded {
            state.unloaded.push(name.to_string());
        }
    }

    fn record(&self, entry: String) {
        self.state.borrow_mut().log.push(entry);
    }
}

impl Audio for RecordingAudio {
    fn load(&mut self, name: &str) {
        self.record(format!("load {}", name));
    }

    fn is_loaded(&self, name: &str) -> bool {
        !self.state.borrow().unloaded.iter().any(|sound| sound == name)
    }

    fn play(&mut self, name: &str) {
        self.record(format!("play {}", name));
    }

    fn stop(&mut self, name: &str) {
        self.record(format!("stop {}", name));
    }

    fn set_looping(&mut self, name: &str, looping: bool) {
        self.record(format!("loop {} {}", name, looping));
    }

    fn set_gain(&mut self, name: &str, gain: f64) {
        self.state.borrow_mut().gains.insert(name.to_string(), gain);
    }
}

#[derive(Debug, Default)]
struct DialogState {
    answers: VecDeque<Option<String>>,
    confirm: bool,
    prompts: Vec<String>,
    alerts: Vec<String>,
}

/// Answers prompts from a queue; an empty queue means the player cancelled
#[derive(Debug, Default, Clone)]
pub struct ScriptedDialog {
    state: Rc<RefCell<DialogState>>,
}

impl ScriptedDialog {
    pub fn answer(&self, answer: Option<&str>) {
        self.state
            .borrow_mut()
            .answers
            .push_back(answer.map(str::to_string));
    }

    pub fn set_confirm(&self, confirm: bool) {
        self.state.borrow_mut().confirm = confirm;
    }

    pub fn prompts(&self) -> Vec<String> {
        self.state.borrow().prompts.clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.state.borrow().alerts.clone()
    }
}

impl Dialog for ScriptedDialog {
    fn prompt(&self, message: &str) -> Option<String> {
        let mut state = self.state.borrow_mut();
        state.prompts.push(message.to_string());
        state.answers.pop_front().flatten()
    }

    fn confirm(&self, _message: &str) -> bool {
        self.state.borrow().confirm
    }

    fn alert(&self, message: &str) {
        self.state.borrow_mut().alerts.push(message.to_string());
    }
}

fn level(path: Vec<Point>, x: f64, y: f64, fuel: f64, bonus_time_limit: f64) -> Level {
    Level {
        path,
        lander: LanderStart {
            starting_pos: StartingPos { x, y },
            starting_fuel: fuel,
        },
        bonus_time_limit,
    }
}

/// LEVEL1 and TUTORIAL0 on flat ground at y = 400. LEVEL1 spawns the lander
/// just above the ground, so an idle lander touches down gently.
pub fn sample_maps() -> Maps {
    let flat = vec![Point::new(0.0, 400.0), Point::new(700.0, 400.0)];
    let mut maps = Maps::default();
    maps.insert("LEVEL1", level(flat.clone(), 350.0, 385.0, 150.0, 40.0));
    maps.insert("TUTORIAL0", level(flat, 350.0, 50.0, 500.0, 0.0));
    maps
}

pub struct Harness {
    pub context: Context,
    pub audio: RecordingAudio,
    pub dialog: ScriptedDialog,
}

pub fn harness() -> Harness {
    let audio = RecordingAudio::default();
    let dialog = ScriptedDialog::default();
    let context = Context::new(
        Config::default(),
        sample_maps(),
        Box::new(audio.clone()),
        Box::new(dialog.clone()),
        0.0,
    );
    Harness {
        context,
        audio,
        dialog,
    }
}

pub fn test_context() -> Context {
    harness().context
}
