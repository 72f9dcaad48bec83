use crate::browser::{self, Bounds};
use crate::geometry::{Point, Size};
use anyhow::{anyhow, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlCanvasElement, KeyboardEvent, MouseEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    MouseMove,
    KeyDown,
    KeyUp,
}

impl EventKind {
    pub fn dom_name(&self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::MouseMove => "mousemove",
            EventKind::KeyDown => "keydown",
            EventKind::KeyUp => "keyup",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer position in canvas space
    Pointer(Point),
    /// Upper-cased `KeyboardEvent.key`
    Key(String),
}

impl InputEvent {
    pub fn pointer(&self) -> Option<Point> {
        match self {
            InputEvent::Pointer(point) => Some(*point),
            InputEvent::Key(_) => None,
        }
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            InputEvent::Key(key) => Some(key),
            InputEvent::Pointer(_) => None,
        }
    }
}

/// Where input comes from. Only kinds passed to `listen` are ever returned by
/// `poll`.
pub trait InputSource {
    fn listen(&mut self, kind: EventKind) -> Result<()>;
    fn unlisten(&mut self, kind: EventKind) -> Result<()>;
    /// Events captured since the last poll, oldest first
    fn poll(&mut self) -> Vec<(EventKind, InputEvent)>;
}

/// Maps a client-space position onto the canvas' own pixel grid, which may be
/// scaled by CSS
pub fn to_canvas_space(client: Point, bounds: Bounds, canvas: Size) -> Point {
    Point {
        x: (client.x - bounds.left) / (bounds.right - bounds.left) * canvas.width,
        y: (client.y - bounds.top) / (bounds.bottom - bounds.top) * canvas.height,
    }
}

type Inbox = Rc<RefCell<Vec<(EventKind, InputEvent)>>>;
type Listener = Closure<dyn FnMut(Event)>;

/// Document-level listeners. Pointer positions are mapped onto `canvas`.
pub struct WebInput {
    canvas: HtmlCanvasElement,
    inbox: Inbox,
    listeners: HashMap<EventKind, Listener>,
}

impl WebInput {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        WebInput {
            canvas,
            inbox: Rc::new(RefCell::new(Vec::new())),
            listeners: HashMap::new(),
        }
    }

    fn translate(kind: EventKind, event: &Event, canvas: &HtmlCanvasElement) -> Option<InputEvent> {
        match kind {
            EventKind::Click | EventKind::MouseMove => {
                let mouse = event.dyn_ref::<MouseEvent>()?;
                let client = Point::new(f64::from(mouse.client_x()), f64::from(mouse.client_y()));
                let size = Size::new(f64::from(canvas.width()), f64::from(canvas.height()));
                Some(InputEvent::Pointer(to_canvas_space(
                    client,
                    browser::bounds(canvas),
                    size,
                )))
            }
            EventKind::KeyDown | EventKind::KeyUp => {
                let keyboard = event.dyn_ref::<KeyboardEvent>()?;
                Some(InputEvent::Key(keyboard.key().to_uppercase()))
            }
        }
    }
}

impl InputSource for WebInput {
    fn listen(&mut self, kind: EventKind) -> Result<()> {
        if self.listeners.contains_key(&kind) {
            return Ok(());
        }
        let inbox = self.inbox.clone();
        let canvas = self.canvas.clone();
        let listener: Listener = Closure::wrap(Box::new(move |event: Event| {
            if let Some(input) = WebInput::translate(kind, &event, &canvas) {
                inbox.borrow_mut().push((kind, input));
            }
        }) as Box<dyn FnMut(Event)>);

        browser::document()?
            .add_event_listener_with_callback(kind.dom_name(), listener.as_ref().unchecked_ref())
            .map_err(|err| anyhow!("Could not listen to '{}' : {:#?}", kind.dom_name(), err))?;
        self.listeners.insert(kind, listener);
        Ok(())
    }

    fn unlisten(&mut self, kind: EventKind) -> Result<()> {
        // dropping the closure after removal releases it on the JS side too
        if let Some(listener) = self.listeners.remove(&kind) {
            browser::document()?
                .remove_event_listener_with_callback(
                    kind.dom_name(),
                    listener.as_ref().unchecked_ref(),
                )
                .map_err(|err| {
                    anyhow!("Could not stop listening to '{}' : {:#?}", kind.dom_name(), err)
                })?;
        }
        Ok(())
    }

    fn poll(&mut self) -> Vec<(EventKind, InputEvent)> {
        self.inbox.borrow_mut().drain(..).collect()
    }
}
