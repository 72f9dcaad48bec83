use crate::engine::input::InputSource;
use crate::engine::{Cursor, Surfaces};
use crate::state::{Context, StateKind, StateMachine, StateOptions};

/// Owns everything a running game needs. One `tick` per animation frame,
/// then one `draw`.
pub struct App {
    context: Context,
    machine: StateMachine,
}

impl App {
    pub fn new(context: Context, input: Box<dyn InputSource>) -> Self {
        App {
            context,
            machine: StateMachine::standard(input),
        }
    }

    /// Enters the menu
    pub fn start(&mut self) {
        self.change_state(StateKind::Menu, StateOptions::default());
    }

    pub fn change_state(&mut self, kind: StateKind, options: StateOptions) {
        self.machine.change_state(kind, options, &mut self.context);
    }

    /// `now` in milliseconds, as handed out by `requestAnimationFrame`
    pub fn tick(&mut self, now: f64) {
        self.context.clock.update(now);
        self.machine.capture();
        self.machine.handle_input(&mut self.context);
        self.machine.fire_timers(&mut self.context);
        let dt = self.context.clock.delta();
        self.machine.update(dt, &mut self.context);
    }

    pub fn draw(&self, surfaces: &Surfaces) {
        surfaces.clear(self.context.width(), self.context.height());
        self.machine.draw(surfaces);
    }

    pub fn current_state(&self) -> Option<StateKind> {
        self.machine.current()
    }

    /// New cursor for the UI canvas, if a state changed it
    pub fn take_cursor(&mut self) -> Option<Cursor> {
        self.context.take_cursor()
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.context.config.app.width = width;
        self.context.config.app.height = height;
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }
}
