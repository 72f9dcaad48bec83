use super::{
    click_at, hover_at, remove_objects, Command, Context, State, StateKind, StateOptions,
    PRESS_FEEDBACK_MS,
};
use crate::engine::input::{EventKind, InputEvent};
use crate::engine::{Cursor, Surfaces};
use crate::geometry::Point;
use crate::object::{Button, Entity, Lander, Rectangle, TextObject};
use crate::timer::Deferred;
use crate::ui::Ui;

const HEADLINE_LAYER: usize = 5;
const BUTTON_LAYER: usize = 5;
const LOGO_LAYER: usize = 10;
const LOGO_SIZE: f64 = 200.0;

/// Button whose click presses it and, after the press feedback delay, runs
/// `command`
pub fn command_button(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    text: &str,
    command: Command,
) -> Button {
    Button::new(x, y, width, height, text, true, Some("white")).on_click(move |button| {
        button.press();
        Some(Deferred::after(PRESS_FEEDBACK_MS, command.clone()))
    })
}

/// Title screen
#[derive(Default)]
pub struct Menu {
    ui: Ui,
}

impl Menu {
    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    fn show_message(&mut self, message: &str, ctx: &Context) {
        let (width, height) = (ctx.width(), ctx.height());

        self.ui.add_object(
            2,
            false,
            "overlay",
            Rectangle::overlay(width, height, "rgba(0,0,0,0.7)"),
        );

        let mut message_box = Rectangle::new(
            width / 2.0,
            height / 3.0,
            Point::new(-200.0, -100.0),
            Point::new(200.0, 100.0),
            Some("white"),
        );
        message_box.drawable.color.fill = "black".to_string();
        self.ui.add_object(1, false, "message_box", message_box);

        self.ui.add_object(
            0,
            false,
            "message_text",
            TextObject::new(width / 2.0, height * 2.0 / 10.0, message, Some("white"))
                .centered()
                .with_size(12.0)
                .with_wrap(380.0),
        );

        self.ui.add_object(
            0,
            true,
            "ok_button",
            command_button(
                width / 2.0,
                height * 37.0 / 80.0,
                90.0,
                45.0,
                "OK",
                Command::remove_objects(&["overlay", "message_box", "message_text", "ok_button"]),
            ),
        );
    }

    /// Decorative lander that drops onto the bottom edge and stays there
    fn logo_lander(x: f64, y: f64, ctx: &Context) -> Lander {
        let floor = ctx.height();
        Lander::new(x, y, LOGO_SIZE, LOGO_SIZE, &ctx.config.physics).on_update(move |lander, dt| {
            if lander.body.drawable.global.y + lander.height / 2.0 > floor || dt == 0.0 {
                lander.body.acceleration.y = 0.0;
                lander.body.speed.y = 0.0;
                lander.body.drawable.global.y = floor - lander.height / 2.0;
            }
        })
    }
}

impl State for Menu {
    fn events(&self) -> &'static [EventKind] {
        &[EventKind::Click, EventKind::MouseMove]
    }

    fn handle(&mut self, kind: EventKind, event: &InputEvent, ctx: &mut Context) {
        let Some(point) = event.pointer() else {
            return;
        };
        match kind {
            EventKind::Click => {
                click_at(&mut self.ui, point, ctx);
            }
            EventKind::MouseMove => hover_at(&mut self.ui, point, ctx),
            EventKind::KeyDown | EventKind::KeyUp => {}
        }
    }

    fn init(&mut self, options: StateOptions, ctx: &mut Context) {
        ctx.set_cursor(Cursor::Default);
        let (width, height) = (ctx.width(), ctx.height());

        if let Some(message) = options.message.as_deref() {
            self.show_message(message, ctx);
        }

        self.ui.add_object(
            HEADLINE_LAYER,
            false,
            "headline",
            TextObject::new(width / 2.0, height / 3.0, &ctx.config.app.title, Some("white"))
                .centered()
                .with_size(24.0),
        );

        self.ui.add_object(
            BUTTON_LAYER,
            true,
            "start_button",
            command_button(
                width / 2.0,
                height / 2.0,
                100.0,
                40.0,
                "START",
                Command::ChangeState(StateKind::InGame, StateOptions::level(1)),
            ),
        );
        self.ui.add_object(
            BUTTON_LAYER,
            true,
            "how_to_play_button",
            command_button(
                width / 2.0,
                height * 5.0 / 8.0,
                250.0,
                40.0,
                "HOW TO PLAY",
                Command::ChangeState(StateKind::InGame, StateOptions::tutorial("TUTORIAL0")),
            ),
        );
        self.ui.add_object(
            BUTTON_LAYER,
            true,
            "editor_button",
            command_button(
                width / 2.0,
                height * 6.0 / 8.0,
                120.0,
                40.0,
                "EDITOR",
                Command::ChangeState(StateKind::Editor, StateOptions::default()),
            ),
        );

        let logo = Menu::logo_lander(100.0, 100.0, ctx);
        self.ui.add_object(LOGO_LAYER, false, "logo_lander", logo);
        let logo = Menu::logo_lander(width - 100.0, 100.0, ctx);
        self.ui.add_object(LOGO_LAYER, false, "logo_lander2", logo);
    }

    fn update(&mut self, dt: f64, ctx: &mut Context) {
        let center = Point::new(ctx.width() / 2.0, ctx.height() / 3.0);
        if let Some(headline) = self
            .ui
            .get_object_mut("headline", Some(false), HEADLINE_LAYER)
            .and_then(Entity::as_text_mut)
        {
            headline.drawable.global = center;
        }
        self.ui.update(dt);
    }

    fn draw(&self, surfaces: &Surfaces) {
        self.ui.draw(surfaces.ui);
    }

    fn reset(&mut self) {
        self.ui = Ui::default();
    }

    fn command(&mut self, command: Command, _ctx: &mut Context) {
        if let Command::RemoveObjects(names) = command {
            remove_objects(&mut self.ui, &names);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_context, RecordingContext};
    use approx::assert_relative_eq;

    fn menu(options: StateOptions) -> (Menu, Context) {
        let mut ctx = test_context();
        let mut menu = Menu::default();
        menu.init(options, &mut ctx);
        (menu, ctx)
    }

    #[test]
    fn builds_title_buttons_and_logos() {
        let (menu, _) = menu(StateOptions::default());

        for name in [
            "headline",
            "start_button",
            "how_to_play_button",
            "editor_button",
            "logo_lander",
            "logo_lander2",
        ] {
            assert!(menu.ui().contains(name), "missing {}", name);
        }
        assert!(!menu.ui().contains("ok_button"));
        assert!(menu
            .ui()
            .get_object("logo_lander", Some(false), LOGO_LAYER)
            .and_then(Entity::as_lander)
            .is_some());
    }

    #[test]
    fn start_schedules_the_first_level() {
        let (mut menu, mut ctx) = menu(StateOptions::default());

        menu.handle(
            EventKind::Click,
            &InputEvent::Pointer(Point::new(350.0, 250.0)),
            &mut ctx,
        );

        let command = ctx.scheduler.pop_due(PRESS_FEEDBACK_MS);
        assert_eq!(
            command,
            Some(Command::ChangeState(StateKind::InGame, StateOptions::level(1)))
        );
        let pressed = menu
            .ui()
            .get_object("start_button", Some(true), 0)
            .and_then(Entity::as_button)
            .map(|button| button.is_pressed());
        assert_eq!(pressed, Some(true));
    }

    #[test]
    fn message_box_is_dismissed_by_ok() {
        let (mut menu, mut ctx) = menu(StateOptions::with_message("Thanks!"));
        assert!(menu.ui().contains("message_text"));

        let ok = Point::new(350.0, 500.0 * 37.0 / 80.0);
        menu.handle(EventKind::Click, &InputEvent::Pointer(ok), &mut ctx);
        let command = ctx.scheduler.pop_due(1000.0).expect("ok schedules removal");
        menu.command(command, &mut ctx);

        for name in ["overlay", "message_box", "message_text", "ok_button"] {
            assert!(!menu.ui().contains(name), "{} should be gone", name);
        }
        assert!(menu.ui().contains("start_button"));
    }

    #[test]
    fn pointer_cursor_over_buttons_only() {
        let (mut menu, mut ctx) = menu(StateOptions::default());
        ctx.take_cursor();

        menu.handle(
            EventKind::MouseMove,
            &InputEvent::Pointer(Point::new(350.0, 250.0)),
            &mut ctx,
        );
        assert_eq!(ctx.take_cursor(), Some(Cursor::Pointer));

        menu.handle(
            EventKind::MouseMove,
            &InputEvent::Pointer(Point::new(5.0, 5.0)),
            &mut ctx,
        );
        assert_eq!(ctx.take_cursor(), Some(Cursor::Default));
    }

    #[test]
    fn logo_landers_rest_on_the_floor() {
        let (mut menu, mut ctx) = menu(StateOptions::default());

        for _ in 0..400 {
            menu.update(0.05, &mut ctx);
        }

        let y = menu
            .ui()
            .get_object("logo_lander", None, 0)
            .and_then(Entity::as_lander)
            .map(|lander| lander.global().y)
            .unwrap_or_default();
        assert!(y <= 500.0 - LOGO_SIZE / 2.0 + 1.0);
        assert!(y >= 500.0 - LOGO_SIZE / 2.0 - 1.0);
    }

    #[test]
    fn headline_follows_the_canvas_size() {
        let (mut menu, mut ctx) = menu(StateOptions::default());
        ctx.config.app.width = 1000.0;

        menu.update(0.0, &mut ctx);

        let x = menu
            .ui()
            .get_object("headline", None, 0)
            .map(|headline| headline.drawable().global.x)
            .unwrap_or_default();
        assert_relative_eq!(x, 500.0);
    }

    #[test]
    fn draws_the_title_on_the_ui_canvas() {
        let (menu, _) = menu(StateOptions::default());
        let foreground = RecordingContext::default();
        let ui = RecordingContext::default();

        menu.draw(&Surfaces {
            foreground: &foreground,
            ui: &ui,
        });

        assert!(ui.has_text("Moon Lander"));
        assert!(ui.has_text("START"));
        assert!(foreground.calls().is_empty());
    }

    #[test]
    fn reset_clears_the_screen() {
        let (mut menu, _) = menu(StateOptions::default());
        menu.reset();
        assert!(menu.ui().is_empty());
    }
}
