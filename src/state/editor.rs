use super::menu::command_button;
use super::{
    click_at, hover_at, remove_objects, Command, Context, State, StateKind, StateOptions,
    PRESS_FEEDBACK_MS,
};
use crate::engine::input::{EventKind, InputEvent};
use crate::engine::{Cursor, SavedState, Surfaces};
use crate::geometry::Point;
use crate::level::{self, Level};
use crate::object::{Button, Entity, Rectangle, TextObject};
use crate::timer::Deferred;
use crate::ui::Ui;

const INTRO_LAYER: usize = 2;
const BUTTON_LAYER: usize = 5;

const INTRO: &str = "Click around the canvas to build a level. To export it, press EXPORT in the \
                     top right corner. Press R to undo your latest point.";

/// Level editor: clicks outside the buttons append points to a ground path
#[derive(Default)]
pub struct Editor {
    ui: Ui,
    path: Vec<Point>,
}

impl Editor {
    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    pub fn path(&self) -> &[Point] {
        &self.path
    }

    /// Asks for a name until it is valid. `None` when the player cancelled.
    fn ask_for_name(ctx: &Context) -> Option<String> {
        loop {
            let name = ctx
                .dialog
                .prompt("What should the level be called?\n\n(Only capital letters A-Z and digits)")?;
            if level::is_valid_name(&name) {
                return Some(name);
            }
        }
    }

    fn export(&mut self, ctx: &mut Context) {
        self.save_level(ctx);
        if let Some(button) = self
            .ui
            .get_object_mut("export_button", Some(true), BUTTON_LAYER)
            .and_then(Entity::as_button_mut)
        {
            button.release();
        }
    }

    fn save_level(&self, ctx: &mut Context) {
        // points sharing an x collapse into one, so count what is stored
        let level = Level::from_path(self.path.clone());
        if level.path.len() < 2 {
            ctx.dialog
                .alert("A level needs at least two points. Click the canvas to add some.");
            return;
        }
        let Some(name) = Editor::ask_for_name(ctx) else {
            return;
        };
        if ctx.maps.contains(&name) {
            ctx.dialog
                .alert("This level already exists. Try another name.");
            return;
        }
        if !ctx.dialog.confirm(&format!(
            "Are you sure you want to save your level as:\n\n{}",
            name
        )) {
            ctx.dialog.alert("Level not saved.");
            return;
        }

        match serde_json::to_string(&level) {
            Ok(json) => log!("[editor] {} : {}", name, json),
            Err(err) => error!("[editor] Could not serialize {} : {:#?}", name, err),
        }
        ctx.maps.insert(name.clone(), level);
        ctx.dialog.alert(&format!(
            "Level saved as:\n\n{}\nUnfortunately only until the page is closed...",
            name
        ));
    }
}

impl State for Editor {
    fn events(&self) -> &'static [EventKind] {
        &[EventKind::Click, EventKind::MouseMove, EventKind::KeyUp]
    }

    fn handle(&mut self, kind: EventKind, event: &InputEvent, ctx: &mut Context) {
        match (kind, event) {
            (EventKind::Click, InputEvent::Pointer(point)) => {
                if !click_at(&mut self.ui, *point, ctx) {
                    self.path.push(*point);
                }
            }
            (EventKind::MouseMove, InputEvent::Pointer(point)) => {
                hover_at(&mut self.ui, *point, ctx);
            }
            (EventKind::KeyUp, InputEvent::Key(key)) => {
                if *key == ctx.config.controls.undo {
                    self.path.pop();
                }
            }
            _ => {}
        }
    }

    fn init(&mut self, _options: StateOptions, ctx: &mut Context) {
        ctx.set_cursor(Cursor::Default);
        self.path.clear();
        let (width, height) = (ctx.width(), ctx.height());

        self.ui.add_object(
            3,
            false,
            "overlay",
            Rectangle::overlay(width, height, "rgba(0,0,0,0.7)"),
        );
        self.ui.add_object(
            INTRO_LAYER,
            false,
            "headline",
            TextObject::new(width / 2.0, height / 5.0, "Welcome to the editor", Some("white"))
                .centered()
                .with_size(20.0),
        );
        self.ui.add_object(
            INTRO_LAYER,
            false,
            "message",
            TextObject::new(width / 2.0, height / 3.0, INTRO, Some("white"))
                .centered()
                .with_size(12.0)
                .with_wrap(400.0),
        );
        self.ui.add_object(
            INTRO_LAYER,
            true,
            "ok_button",
            command_button(
                width / 2.0,
                height * 3.0 / 5.0,
                165.0,
                45.0,
                "OK",
                Command::remove_objects(&["ok_button", "overlay", "headline", "message"]),
            ),
        );

        self.ui.add_object(
            BUTTON_LAYER,
            true,
            "export_button",
            Button::new(width - 100.0, 37.0, 165.0, 45.0, "EXPORT", true, Some("white")).on_click(
                |button| {
                    button.press();
                    Some(Deferred::after(PRESS_FEEDBACK_MS, Command::ExportLevel))
                },
            ),
        );
        self.ui.add_object(
            BUTTON_LAYER,
            true,
            "to_menu_button",
            command_button(
                100.0,
                37.0,
                165.0,
                45.0,
                "MENU",
                Command::ChangeState(StateKind::Menu, StateOptions::default()),
            ),
        );
    }

    fn update(&mut self, dt: f64, _ctx: &mut Context) {
        self.ui.update(dt);
    }

    fn draw(&self, surfaces: &Surfaces) {
        self.ui.draw(surfaces.ui);

        if let [first, rest @ ..] = self.path.as_slice() {
            if rest.is_empty() {
                return;
            }
            let context = surfaces.foreground;
            let _saved = SavedState::new(context);
            context.set_stroke_style("white");
            context.begin_path();
            context.move_to(first.x, first.y);
            for point in rest {
                context.line_to(point.x, point.y);
            }
            context.stroke();
        }
    }

    fn reset(&mut self) {
        *self = Editor::default();
    }

    fn command(&mut self, command: Command, ctx: &mut Context) {
        match command {
            Command::ExportLevel => self.export(ctx),
            Command::RemoveObjects(names) => remove_objects(&mut self.ui, &names),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{harness, Call, Harness, RecordingContext};

    fn editor() -> (Editor, Harness) {
        let mut harness = harness();
        let mut editor = Editor::default();
        editor.init(StateOptions::default(), &mut harness.context);
        (editor, harness)
    }

    fn click(editor: &mut Editor, ctx: &mut Context, x: f64, y: f64) {
        editor.handle(EventKind::Click, &InputEvent::Pointer(Point::new(x, y)), ctx);
    }

    fn draw_path(editor: &mut Editor, ctx: &mut Context) {
        for (x, y) in [(100.0, 300.0), (300.0, 350.0), (500.0, 320.0)] {
            click(editor, ctx, x, y);
        }
    }

    fn fire_due(editor: &mut Editor, ctx: &mut Context) {
        let now = ctx.clock.now() + PRESS_FEEDBACK_MS;
        ctx.clock.update(now);
        while let Some(command) = ctx.scheduler.pop_due(now) {
            editor.command(command, ctx);
        }
    }

    fn export(editor: &mut Editor, ctx: &mut Context) {
        click(editor, ctx, 600.0, 37.0);
        fire_due(editor, ctx);
    }

    #[test]
    fn clicks_outside_buttons_add_points_and_undo_removes_them() {
        let (mut editor, mut harness) = editor();
        let ctx = &mut harness.context;

        draw_path(&mut editor, ctx);
        assert_eq!(editor.path().len(), 3);

        editor.handle(EventKind::KeyUp, &InputEvent::Key("R".to_string()), ctx);
        assert_eq!(
            editor.path(),
            &[Point::new(100.0, 300.0), Point::new(300.0, 350.0)]
        );

        editor.handle(EventKind::KeyUp, &InputEvent::Key("X".to_string()), ctx);
        assert_eq!(editor.path().len(), 2);
    }

    #[test]
    fn ok_dismisses_the_intro_without_adding_a_point() {
        let (mut editor, mut harness) = editor();
        let ctx = &mut harness.context;

        click(&mut editor, ctx, 350.0, 300.0);
        fire_due(&mut editor, ctx);

        assert!(editor.path().is_empty());
        for name in ["ok_button", "overlay", "headline", "message"] {
            assert!(!editor.ui().contains(name), "{} should be gone", name);
        }
        assert!(editor.ui().contains("export_button"));
    }

    #[test]
    fn export_stores_a_valid_new_level() {
        let (mut editor, mut harness) = editor();
        let ctx = &mut harness.context;
        draw_path(&mut editor, ctx);
        harness.dialog.answer(Some("bad name"));
        harness.dialog.answer(Some("CRATER2"));
        harness.dialog.set_confirm(true);

        export(&mut editor, ctx);

        assert_eq!(harness.dialog.prompts().len(), 2);
        let level = ctx.maps.get("CRATER2").expect("level stored");
        assert_eq!(level.path.len(), 3);
        assert_eq!(level.lander.starting_pos.x, 300.0);
        assert!(harness.dialog.alerts()[0].contains("CRATER2"));

        let pressed = editor
            .ui()
            .get_object("export_button", Some(true), 0)
            .and_then(Entity::as_button)
            .map(Button::is_pressed);
        assert_eq!(pressed, Some(false));
    }

    #[test]
    fn export_refuses_existing_names() {
        let (mut editor, mut harness) = editor();
        let ctx = &mut harness.context;
        draw_path(&mut editor, ctx);
        harness.dialog.answer(Some("LEVEL1"));
        harness.dialog.set_confirm(true);

        export(&mut editor, ctx);

        assert_eq!(
            harness.dialog.alerts(),
            vec!["This level already exists. Try another name.".to_string()]
        );
        assert_eq!(ctx.maps.get("LEVEL1").map(|level| level.path.len()), Some(2));
    }

    #[test]
    fn export_can_be_cancelled_or_declined() {
        let (mut editor, mut harness) = editor();
        let ctx = &mut harness.context;
        draw_path(&mut editor, ctx);

        export(&mut editor, ctx);
        assert!(harness.dialog.alerts().is_empty());

        harness.dialog.answer(Some("MOON"));
        harness.dialog.set_confirm(false);
        export(&mut editor, ctx);
        assert_eq!(harness.dialog.alerts(), vec!["Level not saved.".to_string()]);
        assert!(!ctx.maps.contains("MOON"));
    }

    #[test]
    fn export_needs_two_points() {
        let (mut editor, mut harness) = editor();
        let ctx = &mut harness.context;
        click(&mut editor, ctx, 100.0, 300.0);

        export(&mut editor, ctx);

        assert!(harness.dialog.prompts().is_empty());
        assert_eq!(harness.dialog.alerts().len(), 1);
    }

    #[test]
    fn points_stacked_on_one_x_do_not_make_a_level() {
        let (mut editor, mut harness) = editor();
        let ctx = &mut harness.context;
        click(&mut editor, ctx, 200.0, 300.0);
        click(&mut editor, ctx, 200.0, 450.0);
        harness.dialog.answer(Some("CLIFF"));
        harness.dialog.set_confirm(true);

        export(&mut editor, ctx);

        assert!(harness.dialog.prompts().is_empty());
        assert_eq!(
            harness.dialog.alerts(),
            vec!["A level needs at least two points. Click the canvas to add some.".to_string()]
        );
        assert!(!ctx.maps.contains("CLIFF"));
    }

    #[test]
    fn menu_button_leaves_the_editor() {
        let (mut editor, mut harness) = editor();
        let ctx = &mut harness.context;

        click(&mut editor, ctx, 100.0, 37.0);

        assert_eq!(
            ctx.scheduler.pop_due(ctx.clock.now() + PRESS_FEEDBACK_MS),
            Some(Command::ChangeState(StateKind::Menu, StateOptions::default()))
        );
    }

    #[test]
    fn path_is_stroked_on_the_foreground() {
        let (mut editor, mut harness) = editor();
        let ctx = &mut harness.context;
        let foreground = RecordingContext::default();
        let ui = RecordingContext::default();

        click(&mut editor, ctx, 100.0, 300.0);
        editor.draw(&Surfaces {
            foreground: &foreground,
            ui: &ui,
        });
        assert!(foreground.calls().is_empty());

        click(&mut editor, ctx, 200.0, 310.0);
        editor.draw(&Surfaces {
            foreground: &foreground,
            ui: &ui,
        });
        let calls = foreground.calls();
        assert!(calls.contains(&Call::StrokeStyle("white".to_string())));
        assert!(calls.contains(&Call::MoveTo(100.0, 300.0)));
        assert!(calls.contains(&Call::LineTo(200.0, 310.0)));
        assert!(calls.contains(&Call::Stroke));
        assert!(ui.has_text("Welcome to the editor"));
    }

    #[test]
    fn reset_drops_the_path() {
        let (mut editor, mut harness) = editor();
        draw_path(&mut editor, &mut harness.context);

        editor.reset();

        assert!(editor.path().is_empty());
        assert!(editor.ui().is_empty());
    }
}
