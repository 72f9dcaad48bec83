//! Application states and the machine that swaps between them.

pub mod editor;
pub mod in_game;
pub mod menu;

pub use editor::Editor;
pub use in_game::{InGame, Outcome};
pub use menu::Menu;

use crate::config::Config;
use crate::engine::audio::Audio;
use crate::engine::dialog::Dialog;
use crate::engine::input::{EventKind, InputEvent, InputSource};
use crate::engine::{Clock, Cursor, Surfaces};
use crate::geometry::Point;
use crate::level::Maps;
use crate::object::Entity;
use crate::timer::{Deferred, Scheduler};
use crate::ui::Ui;
use std::collections::HashMap;

/// Delay between a button press and its action, so the press is visible
pub const PRESS_FEEDBACK_MS: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    Menu,
    InGame,
    Editor,
    Test,
}

/// What a state is entered with
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StateOptions {
    /// Shown in a dialog box on the menu
    pub message: Option<String>,
    pub show_tutorial: bool,
    /// Ask the player for a level name before starting
    pub choose_level: bool,
    pub map_name: Option<String>,
    pub level_number: Option<u32>,
}

impl StateOptions {
    pub fn with_message(message: impl Into<String>) -> Self {
        StateOptions {
            message: Some(message.into()),
            ..StateOptions::default()
        }
    }

    pub fn level(number: u32) -> Self {
        StateOptions {
            level_number: Some(number),
            ..StateOptions::default()
        }
    }

    pub fn map(name: impl Into<String>) -> Self {
        StateOptions {
            map_name: Some(name.into()),
            ..StateOptions::default()
        }
    }

    pub fn tutorial(name: impl Into<String>) -> Self {
        StateOptions {
            show_tutorial: true,
            ..StateOptions::map(name)
        }
    }

    pub fn choose_level() -> Self {
        StateOptions {
            choose_level: true,
            ..StateOptions::default()
        }
    }
}

/// Work a state asks to have done later, through the [`Scheduler`]
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ChangeState(StateKind, StateOptions),
    RemoveObjects(Vec<String>),
    StartGame,
    BeginFlight,
    NextSlide,
    ShowResult(Outcome),
    ExportLevel,
}

impl Command {
    pub fn remove_objects(names: &[&str]) -> Self {
        Command::RemoveObjects(names.iter().map(|name| name.to_string()).collect())
    }
}

/// Everything a state may touch besides its own objects
pub struct Context {
    pub config: Config,
    pub maps: Maps,
    pub clock: Clock,
    pub scheduler: Scheduler,
    pub audio: Box<dyn Audio>,
    pub dialog: Box<dyn Dialog>,
    cursor: Cursor,
    cursor_changed: bool,
    transition: Option<(StateKind, StateOptions)>,
}

impl Context {
    pub fn new(
        config: Config,
        maps: Maps,
        audio: Box<dyn Audio>,
        dialog: Box<dyn Dialog>,
        now: f64,
    ) -> Self {
        Context {
            config,
            maps,
            clock: Clock::new(now),
            scheduler: Scheduler::default(),
            audio,
            dialog,
            cursor: Cursor::Default,
            cursor_changed: false,
            transition: None,
        }
    }

    pub fn width(&self) -> f64 {
        self.config.app.width
    }

    pub fn height(&self) -> f64 {
        self.config.app.height
    }

    /// Requests a state change. The machine applies it once the current
    /// handler returns; the last request wins.
    pub fn change_state(&mut self, kind: StateKind, options: StateOptions) {
        self.transition = Some((kind, options));
    }

    pub fn take_transition(&mut self) -> Option<(StateKind, StateOptions)> {
        self.transition.take()
    }

    pub fn schedule(&mut self, deferred: Deferred) {
        self.scheduler.schedule(self.clock.now(), deferred);
    }

    pub fn set_cursor(&mut self, cursor: Cursor) {
        if self.cursor != cursor {
            self.cursor = cursor;
            self.cursor_changed = true;
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// The cursor, when it changed since the last call
    pub fn take_cursor(&mut self) -> Option<Cursor> {
        if self.cursor_changed {
            self.cursor_changed = false;
            Some(self.cursor)
        } else {
            None
        }
    }
}

pub trait State {
    /// Input kinds this state listens to while active
    fn events(&self) -> &'static [EventKind];
    fn handle(&mut self, kind: EventKind, event: &InputEvent, ctx: &mut Context);
    fn init(&mut self, options: StateOptions, ctx: &mut Context);
    fn update(&mut self, dt: f64, ctx: &mut Context);
    fn draw(&self, surfaces: &Surfaces);
    fn reset(&mut self) {}
    fn command(&mut self, _command: Command, _ctx: &mut Context) {}
}

/// Placeholder state that does nothing
#[derive(Debug, Default)]
pub struct Test;

impl State for Test {
    fn events(&self) -> &'static [EventKind] {
        &[]
    }

    fn handle(&mut self, _kind: EventKind, _event: &InputEvent, _ctx: &mut Context) {}

    fn init(&mut self, _options: StateOptions, _ctx: &mut Context) {}

    fn update(&mut self, _dt: f64, _ctx: &mut Context) {}

    fn draw(&self, _surfaces: &Surfaces) {}
}

/// Runs the click hook of the button under `point`, if any
pub fn click_at(ui: &mut Ui, point: Point, ctx: &mut Context) -> bool {
    match ui
        .check_collision_with_point(point)
        .and_then(Entity::as_button_mut)
    {
        Some(button) => {
            if let Some(deferred) = button.click() {
                ctx.schedule(deferred);
            }
            true
        }
        None => false,
    }
}

/// Pointer cursor over buttons, default elsewhere
pub fn hover_at(ui: &mut Ui, point: Point, ctx: &mut Context) {
    match ui
        .check_collision_with_point(point)
        .and_then(Entity::as_button_mut)
    {
        Some(button) => {
            button.hover();
            ctx.set_cursor(Cursor::Pointer);
        }
        None => ctx.set_cursor(Cursor::Default),
    }
}

/// Removes each named object wherever it lives in `ui`
pub fn remove_objects(ui: &mut Ui, names: &[String]) {
    for name in names {
        ui.remove_object(name, None, 0);
    }
}

/// ┌────────────────────── change_state ───────────────────────┐
/// │  old state   unlisten its events ─► reset()               │
/// │  machine     drop queued input ─► advance timer generation│
/// │  new state   listen its events ─► init(options)           │
/// │  repeat while init requested another transition           │
/// └───────────────────────────────────────────────────────────┘
pub struct StateMachine {
    states: HashMap<StateKind, Box<dyn State>>,
    current: Option<StateKind>,
    queue: Vec<(EventKind, InputEvent)>,
    input: Box<dyn InputSource>,
}

impl StateMachine {
    pub fn new(input: Box<dyn InputSource>) -> Self {
        StateMachine {
            states: HashMap::new(),
            current: None,
            queue: Vec::new(),
            input,
        }
    }

    /// Machine with the game's four states
    pub fn standard(input: Box<dyn InputSource>) -> Self {
        StateMachine::new(input)
            .with_state(StateKind::Menu, Box::<Menu>::default())
            .with_state(StateKind::InGame, Box::<InGame>::default())
            .with_state(StateKind::Editor, Box::<Editor>::default())
            .with_state(StateKind::Test, Box::new(Test))
    }

    pub fn with_state(mut self, kind: StateKind, state: Box<dyn State>) -> Self {
        self.states.insert(kind, state);
        self
    }

    pub fn current(&self) -> Option<StateKind> {
        self.current
    }

    fn current_mut(&mut self) -> Option<&mut Box<dyn State>> {
        let kind = self.current?;
        self.states.get_mut(&kind)
    }

    pub fn change_state(&mut self, kind: StateKind, options: StateOptions, ctx: &mut Context) {
        let mut next = Some((kind, options));
        while let Some((kind, options)) = next.take() {
            if let Some(old) = self.current.and_then(|old| self.states.get_mut(&old)) {
                for &event in old.events() {
                    if let Err(err) = self.input.unlisten(event) {
                        error!("[state] {:#?}", err);
                    }
                }
                old.reset();
            }

            self.current = Some(kind);
            self.queue.clear();
            ctx.scheduler.advance_generation();

            match self.states.get_mut(&kind) {
                Some(state) => {
                    for &event in state.events() {
                        if let Err(err) = self.input.listen(event) {
                            error!("[state] {:#?}", err);
                        }
                    }
                    log!("[state] entering {:?}", kind);
                    state.init(options, ctx);
                }
                None => error!("[state] no state registered for {:?}", kind),
            }
            next = ctx.take_transition();
        }
    }

    /// Moves what the input source captured into this tick's queue
    pub fn capture(&mut self) {
        let events = self.input.poll();
        self.queue.extend(events);
    }

    /// Dispatches the queue through the active state. A transition requested
    /// by a handler is applied at once and the rest of the queue is dropped.
    pub fn handle_input(&mut self, ctx: &mut Context) {
        let events = std::mem::take(&mut self.queue);
        for (kind, event) in events {
            let Some(state) = self.current_mut() else {
                break;
            };
            if !state.events().contains(&kind) {
                continue;
            }
            state.handle(kind, &event, ctx);
            if let Some((next, options)) = ctx.take_transition() {
                self.change_state(next, options, ctx);
                break;
            }
        }
    }

    pub fn fire_timers(&mut self, ctx: &mut Context) {
        while let Some(command) = ctx.scheduler.pop_due(ctx.clock.now()) {
            match command {
                Command::ChangeState(kind, options) => self.change_state(kind, options, ctx),
                command => {
                    if let Some(state) = self.current_mut() {
                        state.command(command, ctx);
                    }
                }
            }
            if let Some((next, options)) = ctx.take_transition() {
                self.change_state(next, options, ctx);
            }
        }
    }

    pub fn update(&mut self, dt: f64, ctx: &mut Context) {
        if let Some(state) = self.current_mut() {
            state.update(dt, ctx);
        }
        if let Some((next, options)) = ctx.take_transition() {
            self.change_state(next, options, ctx);
        }
    }

    pub fn draw(&self, surfaces: &Surfaces) {
        if let Some(state) = self.current.and_then(|kind| self.states.get(&kind)) {
            state.draw(surfaces);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_context, ScriptedInput};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Journal = Rc<RefCell<Vec<String>>>;

    /// Records its lifecycle and bounces to Menu on any key
    struct Probe {
        name: &'static str,
        events: &'static [EventKind],
        journal: Journal,
        redirect_on_init: Option<StateKind>,
    }

    impl Probe {
        fn boxed(
            name: &'static str,
            events: &'static [EventKind],
            journal: &Journal,
        ) -> Box<Probe> {
            Box::new(Probe {
                name,
                events,
                journal: journal.clone(),
                redirect_on_init: None,
            })
        }

        fn log(&self, entry: String) {
            self.journal.borrow_mut().push(format!("{}:{}", self.name, entry));
        }
    }

    impl State for Probe {
        fn events(&self) -> &'static [EventKind] {
            self.events
        }

        fn handle(&mut self, kind: EventKind, event: &InputEvent, ctx: &mut Context) {
            self.log(format!("{:?}", kind));
            if event.key() == Some("Q") {
                ctx.change_state(StateKind::Menu, StateOptions::default());
            }
        }

        fn init(&mut self, options: StateOptions, ctx: &mut Context) {
            self.log(format!("init {:?}", options.level_number));
            if let Some(kind) = self.redirect_on_init {
                ctx.change_state(kind, StateOptions::level(9));
            }
        }

        fn update(&mut self, _dt: f64, _ctx: &mut Context) {
            self.log("update".to_string());
        }

        fn draw(&self, _surfaces: &Surfaces) {}

        fn reset(&mut self) {
            self.log("reset".to_string());
        }

        fn command(&mut self, command: Command, _ctx: &mut Context) {
            self.log(format!("{:?}", command));
        }
    }

    const KEYS: &[EventKind] = &[EventKind::KeyDown];
    const POINTER: &[EventKind] = &[EventKind::Click, EventKind::MouseMove];

    fn machine(input: &ScriptedInput, journal: &Journal) -> StateMachine {
        StateMachine::new(Box::new(input.clone()))
            .with_state(StateKind::Menu, Probe::boxed("menu", POINTER, journal))
            .with_state(StateKind::InGame, Probe::boxed("game", KEYS, journal))
    }

    #[test]
    fn only_the_active_states_events_are_registered() {
        let input = ScriptedInput::default();
        let journal = Journal::default();
        let mut ctx = test_context();
        let mut machine = machine(&input, &journal);

        machine.change_state(StateKind::Menu, StateOptions::default(), &mut ctx);
        assert_eq!(input.listening(), vec![EventKind::Click, EventKind::MouseMove]);

        machine.change_state(StateKind::InGame, StateOptions::level(2), &mut ctx);
        assert_eq!(input.listening(), vec![EventKind::KeyDown]);
        assert_eq!(
            *journal.borrow(),
            vec!["menu:init None", "menu:reset", "game:init Some(2)"]
        );
        assert_eq!(machine.current(), Some(StateKind::InGame));
    }

    #[test]
    fn transitions_requested_by_init_are_followed() {
        let input = ScriptedInput::default();
        let journal = Journal::default();
        let mut ctx = test_context();
        let mut bouncer = Probe::boxed("bouncer", &[], &journal);
        bouncer.redirect_on_init = Some(StateKind::InGame);
        let mut machine = machine(&input, &journal).with_state(StateKind::Test, bouncer);

        machine.change_state(StateKind::Test, StateOptions::default(), &mut ctx);

        assert_eq!(machine.current(), Some(StateKind::InGame));
        assert_eq!(
            *journal.borrow(),
            vec!["bouncer:init None", "bouncer:reset", "game:init Some(9)"]
        );
    }

    #[test]
    fn a_transition_drops_the_rest_of_the_queue() {
        let input = ScriptedInput::default();
        let journal = Journal::default();
        let mut ctx = test_context();
        let mut machine = machine(&input, &journal);
        machine.change_state(StateKind::InGame, StateOptions::default(), &mut ctx);

        input.fire(EventKind::KeyDown, InputEvent::Key("W".to_string()));
        input.fire(EventKind::KeyDown, InputEvent::Key("Q".to_string()));
        input.fire(EventKind::KeyDown, InputEvent::Key("W".to_string()));
        machine.capture();
        machine.handle_input(&mut ctx);

        assert_eq!(machine.current(), Some(StateKind::Menu));
        let handled = journal
            .borrow()
            .iter()
            .filter(|entry| entry.ends_with("KeyDown"))
            .count();
        assert_eq!(handled, 2);
    }

    #[test]
    fn events_outside_the_table_are_ignored() {
        let input = ScriptedInput::default();
        let journal = Journal::default();
        let mut ctx = test_context();
        let mut machine = machine(&input, &journal);
        machine.change_state(StateKind::Menu, StateOptions::default(), &mut ctx);

        input.fire(EventKind::KeyDown, InputEvent::Key("Q".to_string()));
        input.fire(EventKind::Click, InputEvent::Pointer(Point::new(1.0, 1.0)));
        machine.capture();
        machine.handle_input(&mut ctx);

        assert_eq!(*journal.borrow(), vec!["menu:init None", "menu:Click"]);
    }

    #[test]
    fn timers_from_a_previous_state_never_fire() {
        let input = ScriptedInput::default();
        let journal = Journal::default();
        let mut ctx = test_context();
        let mut machine = machine(&input, &journal);
        machine.change_state(StateKind::Menu, StateOptions::default(), &mut ctx);

        ctx.schedule(Deferred::after(100.0, Command::StartGame));
        ctx.schedule(Deferred::after(
            50.0,
            Command::ChangeState(StateKind::InGame, StateOptions::default()),
        ));
        ctx.clock.update(ctx.clock.now() + 500.0);
        machine.fire_timers(&mut ctx);

        assert_eq!(machine.current(), Some(StateKind::InGame));
        assert!(!journal.borrow().iter().any(|entry| entry.contains("StartGame")));
    }

    #[test]
    fn commands_reach_the_active_state() {
        let input = ScriptedInput::default();
        let journal = Journal::default();
        let mut ctx = test_context();
        let mut machine = machine(&input, &journal);
        machine.change_state(StateKind::InGame, StateOptions::default(), &mut ctx);

        ctx.schedule(Deferred::now(Command::BeginFlight));
        machine.fire_timers(&mut ctx);
        machine.update(0.1, &mut ctx);

        assert_eq!(
            *journal.borrow(),
            vec!["game:init None", "game:BeginFlight", "game:update"]
        );
    }

    #[test]
    fn cursor_changes_are_reported_once() {
        let mut ctx = test_context();
        assert_eq!(ctx.take_cursor(), None);

        ctx.set_cursor(Cursor::Pointer);
        ctx.set_cursor(Cursor::Pointer);
        assert_eq!(ctx.take_cursor(), Some(Cursor::Pointer));
        assert_eq!(ctx.take_cursor(), None);
        assert_eq!(ctx.cursor(), Cursor::Pointer);
    }
}
