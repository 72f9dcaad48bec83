use super::menu::command_button;
use super::{
    click_at, hover_at, remove_objects, Command, Context, State, StateKind, StateOptions,
};
use crate::config::{Config, Scores};
use crate::engine::input::{EventKind, InputEvent};
use crate::engine::{Cursor, Surfaces};
use crate::geometry::{self, Point};
use crate::level::{self, Level};
use crate::object::{Button, Entity, Lander, Rectangle, Terrain, TextObject};
use crate::timer::Deferred;
use crate::ui::Ui;
use std::collections::HashSet;

const LIFT_OFF: &str = "WeHaveLiftOff.wav";
const LANDED: &str = "TheEagleHasLanded.wav";
const THRUSTERS: &str = "Thrusters.wav";
const EXPLOSION: &str = "Explosion.wav";

const LIFT_OFF_MS: f64 = 3300.0;
const RESOURCE_RETRY_MS: f64 = 50.0;
const RESULT_DELAY_MS: f64 = 1000.0;

const HUD_LAYER: usize = 5;
const HEADLINE_LAYER: usize = 5;
const HUD_FONT_SIZE: f64 = 11.0;
/// Lander edge length in meters
const LANDER_SIZE: f64 = 5.0;

const TUTORIAL_OBJECTS: [&str; 5] = [
    "tutorial_overlay",
    "tutorial_box",
    "tutorial_title",
    "tutorial_message",
    "tutorial_button",
];

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Player {
    pub score: i64,
    /// Milliseconds, from the game clock
    pub start_time: f64,
    pub end_time: f64,
    /// Seconds of simulated flight
    pub play_time: f64,
    pub playing: bool,
}

impl Player {
    /// Fuel left plus a bonus for every second under the level's time limit
    pub fn calculate_score(&mut self, fuel: f64, bonus_time_limit: f64, scores: &Scores) -> i64 {
        let bonus = if self.play_time < bonus_time_limit {
            (bonus_time_limit - self.play_time) * scores.bonus_time_worth
        } else {
            0.0
        };
        self.score = (fuel * scores.fuel_worth + bonus).floor() as i64;
        self.score
    }
}

/// How a flight ended, as shown on the result screen
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub survived: bool,
    pub title: String,
    pub message: String,
}

impl Outcome {
    pub fn landed(score: i64) -> Self {
        Outcome {
            survived: true,
            title: "CONGRATULATIONS!".to_string(),
            message: format!(
                "You got {} points.\nDo you want to play again or go back to the menu?",
                score
            ),
        }
    }

    pub fn exploded() -> Self {
        Outcome {
            survived: false,
            title: "YOU EXPLODED!".to_string(),
            message: "No points for that. Better luck next time!\nPS! Remember that you are \
                      steering an expensive space probe, use your head!"
                .to_string(),
        }
    }
}

fn tutorial_slides(config: &Config) -> Vec<(String, String)> {
    let controls = &config.controls;
    vec![
        (
            format!("Welcome to {}", config.app.title),
            "You are about to take control of a state of the art lunar lander sent to \
             explore new planets. But before the fun begins, you have to learn how to fly it!"
                .to_string(),
        ),
        (
            "Using the thrusters 1".to_string(),
            format!(
                "Matching your vertical speed is an important part of landing. To get more \
                 lift, press:\n\n{}",
                controls.thrust_increase
            ),
        ),
        (
            String::new(),
            format!(
                "Our current probe only survives touching down at about {:.1} meters per second.",
                config.landing.vertical_speed / config.physics.meter
            ),
        ),
        (
            "Using the thrusters 2".to_string(),
            format!(
                "Too much lift is no good either, we are supposed to land! You can reduce the \
                 lift with:\n\n{}",
                controls.thrust_decrease
            ),
        ),
        (
            "Planets are not flat".to_string(),
            format!(
                "However much you wish the planet was flat so landing would be easy, it is not. \
                 That is why you can rotate the probe with:\n\n{} and {}",
                controls.rotate_left, controls.rotate_right
            ),
        ),
        (
            "Fuel costs money".to_string(),
            "The already expensive probe burns expensive rocket fuel. Try to use as little \
             of it as possible. You will be rewarded for it."
                .to_string(),
        ),
        (
            "Time is money".to_string(),
            "Not only should you use little fuel, you should also use as little time as \
             possible. Time is money (and points)."
                .to_string(),
        ),
        (
            "Good luck!".to_string(),
            "As we said, planets are not flat, but our landing pad is. Give it a go!".to_string(),
        ),
    ]
}

fn hud_text(x: f64, y: f64, text: &str) -> TextObject {
    TextObject::new(x, y, text, Some("white")).with_size(HUD_FONT_SIZE)
}

fn speed_text(speed: f64, meter: f64) -> String {
    let speed = speed / meter;
    // avoid printing "-0.0" for a lander at rest
    let speed = if speed == 0.0 { 0.0 } else { speed };
    format!("{:.1} m/s", speed)
}

/// ┌──────────────────────── InGame ────────────────────────┐
/// │  init        sounds, level, lander, terrain, HUD       │
/// │     │        tutorial slides ─► NEXT ... ─┐            │
/// │     └────────────────────────────────────►start        │
/// │  start       "Level n" ─► lift-off sound ─► 3.3 s      │
/// │  flight      clock running, keys, HUD, contact check   │
/// │  landing     evaluate ─► 1 s ─► result overlay         │
/// └────────────────────────────────────────────────────────┘
#[derive(Default)]
pub struct InGame {
    ui: Ui,
    player: Player,
    lander: Option<Lander>,
    terrain: Option<Terrain>,
    keys: HashSet<String>,
    options: StateOptions,
    slide: usize,
    landed: bool,
}

impl InGame {
    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn lander(&self) -> Option<&Lander> {
        self.lander.as_ref()
    }

    pub fn lander_mut(&mut self) -> Option<&mut Lander> {
        self.lander.as_mut()
    }

    pub fn terrain(&self) -> Option<&Terrain> {
        self.terrain.as_ref()
    }

    /// Options after level resolution, so `map_name` and `level_number` agree
    pub fn options(&self) -> &StateOptions {
        &self.options
    }

    pub fn has_landed(&self) -> bool {
        self.landed
    }

    /// Prompts until the player names an existing level. `None` when the
    /// player cancelled.
    fn choose_level(ctx: &mut Context) -> Option<String> {
        let levels = ctx.maps.names().collect::<Vec<_>>().join(", ");
        let question = format!(
            "Which level do you want to play?\nYou can choose between:\n\n{}",
            levels
        );
        loop {
            let answer = ctx.dialog.prompt(&question)?;
            if ctx.maps.contains(&answer) {
                ctx.dialog
                    .alert(&format!("The level {} was chosen.\nGood luck!", answer));
                return Some(answer);
            }
        }
    }

    /// Fills in whichever of `map_name` and `level_number` is missing
    fn resolve_level(options: &mut StateOptions) {
        match options.map_name.as_deref() {
            Some(name) => options.level_number = level::level_number(name),
            None => options.map_name = options.level_number.map(level::level_name),
        }
    }

    fn build_world(&mut self, level: &Level, ctx: &Context) {
        let size = LANDER_SIZE * ctx.config.physics.meter;
        let start = level.lander.starting_pos;
        let mut lander = Lander::new(start.x, start.y, size, size, &ctx.config.physics)
            .with_fuel(level.lander.starting_fuel);
        lander.show_bounds = ctx.config.app.debug;
        self.lander = Some(lander);
        self.terrain = Some(
            Terrain::new(level.path.clone()).with_bonus_time_limit(level.bonus_time_limit),
        );
    }

    fn build_hud(&mut self, ctx: &Context) {
        let width = ctx.width();
        let right = [
            ("speed_vertical", "Vertical speed", 25.0, "0"),
            ("speed_horizontal", "Horizontal speed", 50.0, "0"),
            ("altitude", "Altitude", 75.0, "0"),
        ];
        let left = [
            ("score", "Score", 25.0, "0"),
            ("fuel", "Fuel", 50.0, "0"),
            ("time", "Time", 75.0, "00:00"),
        ];

        for (name, label, y, value) in right {
            self.ui.add_object(
                HUD_LAYER,
                false,
                &format!("{}_value", name),
                hud_text(width - 90.0, y, value),
            );
            self.ui.add_object(
                HUD_LAYER,
                false,
                &format!("{}_label", name),
                hud_text(width - 330.0, y, label),
            );
        }
        for (name, label, y, value) in left {
            self.ui
                .add_object(HUD_LAYER, false, &format!("{}_value", name), hud_text(180.0, y, value));
            self.ui
                .add_object(HUD_LAYER, false, &format!("{}_label", name), hud_text(40.0, y, label));
        }
    }

    fn set_hud_value(&mut self, name: &str, text: String) {
        if let Some(value) = self
            .ui
            .get_object_mut(name, Some(false), HUD_LAYER)
            .and_then(Entity::as_text_mut)
        {
            value.text = text;
        }
    }

    fn refresh_hud(&mut self, ctx: &Context) {
        let meter = ctx.config.physics.meter;
        let Some(lander) = self.lander.as_ref() else {
            return;
        };
        let vertical = speed_text(-lander.body.speed.y, meter);
        let horizontal = speed_text(lander.body.speed.x, meter);
        let ground = self
            .terrain
            .as_ref()
            .and_then(|terrain| terrain.height_at(lander.global().x))
            .unwrap_or_else(|| ctx.height());
        let altitude = ((ground - lander.global().y - lander.height / 2.0) / meter)
            .floor()
            .max(0.0);
        let fuel = lander.fuel.floor();

        self.set_hud_value("speed_vertical_value", vertical);
        self.set_hud_value("speed_horizontal_value", horizontal);
        self.set_hud_value("altitude_value", format!("{} m", altitude));
        self.set_hud_value("fuel_value", format!("{} l", fuel));
        self.set_hud_value("time_value", geometry::seconds_to_mmss(self.player.play_time));
        self.set_hud_value("score_value", self.player.score.to_string());
    }

    fn show_tutorial(&mut self, ctx: &mut Context) {
        let (width, height) = (ctx.width(), ctx.height());

        self.ui.add_object(
            3,
            false,
            "tutorial_overlay",
            Rectangle::overlay(width, height, "rgba(0,0,0,0.8)"),
        );

        let mut tutorial_box = Rectangle::new(
            width / 2.0,
            height * 3.0 / 7.0,
            Point::new(-230.0, -140.0),
            Point::new(230.0, 140.0),
            Some("rgba(0,0,0,0.8)"),
        );
        tutorial_box.drawable.color.stroke = "white".to_string();
        tutorial_box.drawable.line_width = 4.0;
        self.ui.add_object(2, false, "tutorial_box", tutorial_box);

        self.ui.add_object(
            1,
            false,
            "tutorial_title",
            TextObject::new(width / 2.0, height / 4.0, "", Some("white"))
                .centered()
                .with_wrap(400.0),
        );
        self.ui.add_object(
            1,
            false,
            "tutorial_message",
            TextObject::new(width / 2.0, height * 11.0 / 32.0, "", Some("white"))
                .centered()
                .with_size(12.0)
                .with_wrap(400.0),
        );
        self.ui.add_object(
            1,
            true,
            "tutorial_button",
            Button::new(width / 2.0, height * 5.0 / 8.0, 140.0, 40.0, "NEXT", true, Some("white"))
                .on_click(|_| Some(Deferred::now(Command::NextSlide))),
        );

        self.slide = 0;
        self.next_slide(ctx);
    }

    /// Shows the next slide, or starts the game after the last one
    fn next_slide(&mut self, ctx: &mut Context) {
        let slides = tutorial_slides(&ctx.config);
        match slides.get(self.slide) {
            Some((title, message)) => {
                for (name, text) in [("tutorial_title", title), ("tutorial_message", message)] {
                    if let Some(object) = self
                        .ui
                        .get_object_mut(name, Some(false), 0)
                        .and_then(Entity::as_text_mut)
                    {
                        object.text = text.clone();
                    }
                }
                self.slide += 1;
            }
            None => {
                for name in TUTORIAL_OBJECTS {
                    self.ui.remove_object(name, None, 0);
                }
                self.start_game(ctx);
            }
        }
    }

    fn start_game(&mut self, ctx: &mut Context) {
        let number = self
            .options
            .level_number
            .map(|number| number.to_string())
            .unwrap_or_default();
        self.ui.add_object(
            HEADLINE_LAYER,
            false,
            "level_headline",
            TextObject::new(
                ctx.width() / 2.0,
                ctx.height() * 3.0 / 12.0,
                &format!("Level {}", number),
                Some("white"),
            )
            .centered(),
        );

        if ctx.audio.is_loaded(LIFT_OFF) {
            ctx.audio.play(LIFT_OFF);
            ctx.schedule(Deferred::after(LIFT_OFF_MS, Command::BeginFlight));
        } else {
            ctx.schedule(Deferred::after(RESOURCE_RETRY_MS, Command::StartGame));
        }
    }

    fn begin_flight(&mut self, ctx: &mut Context) {
        ctx.clock.multiplicator = 1.0;
        self.ui
            .remove_object("level_headline", Some(false), HEADLINE_LAYER);
    }

    fn apply_controls(&mut self, dt: f64, ctx: &Context) {
        let Some(lander) = self.lander.as_mut() else {
            return;
        };
        let controls = &ctx.config.controls;
        let meter = ctx.config.physics.meter;
        for key in &self.keys {
            if *key == controls.thrust_increase {
                lander.thruster.thrust(meter * dt, true);
            } else if *key == controls.thrust_decrease {
                lander.thruster.thrust(-meter * dt, true);
            } else if *key == controls.rotate_left {
                lander.rotate(-meter / 5.0 * dt);
            } else if *key == controls.rotate_right {
                lander.rotate(meter / 5.0 * dt);
            }
        }
    }

    /// Keeps the lander under the ceiling and between the walls. Returns true
    /// when it touches the ground.
    fn confine_lander(&mut self, ctx: &Context) -> bool {
        let (Some(lander), Some(terrain)) = (self.lander.as_mut(), self.terrain.as_ref()) else {
            return false;
        };
        let width = ctx.width();
        let body = &mut lander.body;
        let mut touched_ground = false;

        match terrain.height_at(body.drawable.global.x) {
            Some(ground) if lander.bounding_rect.bottom() > ground => {
                body.drawable.global.y = ground - lander.width / 2.0;
                body.update_movement = false;
                touched_ground = true;
            }
            _ => {
                if body.drawable.global.y - lander.height / 2.0 < 0.0 {
                    body.acceleration.y = 0.0;
                    body.speed.y = 0.0;
                    body.drawable.global.y = lander.height / 2.0;
                }
            }
        }

        if body.drawable.global.x - lander.width / 2.0 < 0.0 {
            body.acceleration.x = 0.0;
            body.speed.x = 0.0;
            body.drawable.global.x = lander.width / 2.0;
        } else if body.drawable.global.x + lander.width / 2.0 > width {
            body.acceleration.x = 0.0;
            body.speed.x = 0.0;
            body.drawable.global.x = width - lander.width / 2.0;
        }

        touched_ground
    }

    fn land(&mut self, ctx: &mut Context) {
        let (Some(lander), Some(terrain)) = (self.lander.as_mut(), self.terrain.as_ref()) else {
            return;
        };
        self.landed = true;
        self.player.end_time = ctx.clock.now();
        self.player.playing = false;
        ctx.audio.stop(THRUSTERS);

        let outcome = if lander.has_survived_landing(terrain, &ctx.config.landing) {
            let score = self.player.calculate_score(
                lander.fuel,
                terrain.bonus_time_limit,
                &ctx.config.scores,
            );
            ctx.audio.play(LANDED);
            log!("[game] landed with {} points", score);
            Outcome::landed(score)
        } else {
            lander.is_exploded = true;
            ctx.audio.play(EXPLOSION);
            log!("[game] lander exploded");
            Outcome::exploded()
        };
        ctx.schedule(Deferred::after(RESULT_DELAY_MS, Command::ShowResult(outcome)));
    }

    fn show_result(&mut self, outcome: Outcome, ctx: &Context) {
        let (width, height) = (ctx.width(), ctx.height());

        self.ui.add_object(
            3,
            false,
            "overlay",
            Rectangle::overlay(width, height, "rgba(0,0,0,0.8)"),
        );
        self.ui.add_object(
            0,
            false,
            "post_game_title",
            TextObject::new(width / 2.0, height / 3.0, &outcome.title, Some("white"))
                .centered()
                .with_size(20.0),
        );
        self.ui.add_object(
            0,
            false,
            "post_game_message",
            TextObject::new(width / 2.0, height * 2.0 / 5.0, &outcome.message, Some("white"))
                .centered()
                .with_size(11.0)
                .with_wrap(width),
        );

        let replay = match &self.options.map_name {
            Some(name) => StateOptions::map(name.clone()),
            None => self.options.clone(),
        };
        self.ui.add_object(
            0,
            true,
            "play_again_button",
            command_button(
                width / 3.0,
                height * 2.0 / 3.0,
                190.0,
                50.0,
                "PLAY AGAIN",
                Command::ChangeState(StateKind::InGame, replay),
            ),
        );
        self.ui.add_object(
            0,
            true,
            "quit_to_menu_button",
            command_button(
                width * 2.0 / 3.0,
                height * 2.0 / 3.0,
                220.0,
                50.0,
                "MENU",
                Command::ChangeState(StateKind::Menu, StateOptions::default()),
            ),
        );

        if outcome.survived {
            let next = self.options.level_number.unwrap_or(0) + 1;
            self.ui.add_object(
                0,
                true,
                "next_level_button",
                command_button(
                    width / 2.0,
                    height * 5.0 / 6.0,
                    220.0,
                    50.0,
                    "NEXT LEVEL",
                    Command::ChangeState(StateKind::InGame, StateOptions::level(next)),
                ),
            );
        }
    }
}

impl State for InGame {
    fn events(&self) -> &'static [EventKind] {
        &[
            EventKind::KeyDown,
            EventKind::KeyUp,
            EventKind::Click,
            EventKind::MouseMove,
        ]
    }

    fn handle(&mut self, kind: EventKind, event: &InputEvent, ctx: &mut Context) {
        match (kind, event) {
            (EventKind::KeyDown, InputEvent::Key(key)) => {
                self.keys.insert(key.clone());
            }
            (EventKind::KeyUp, InputEvent::Key(key)) => {
                self.keys.remove(key);
            }
            (EventKind::Click, InputEvent::Pointer(point)) => {
                click_at(&mut self.ui, *point, ctx);
            }
            (EventKind::MouseMove, InputEvent::Pointer(point)) => {
                hover_at(&mut self.ui, *point, ctx);
            }
            _ => {}
        }
    }

    fn init(&mut self, mut options: StateOptions, ctx: &mut Context) {
        for sound in [LIFT_OFF, LANDED, THRUSTERS, EXPLOSION] {
            ctx.audio.load(sound);
        }

        let now = ctx.clock.now();
        self.player = Player {
            start_time: now,
            end_time: now,
            playing: true,
            ..Player::default()
        };
        ctx.set_cursor(Cursor::Default);
        ctx.clock.multiplicator = 0.0;

        if options.choose_level {
            match InGame::choose_level(ctx) {
                Some(name) => {
                    options.map_name = Some(name);
                    options.level_number = None;
                }
                None => {
                    ctx.change_state(StateKind::Menu, StateOptions::default());
                    return;
                }
            }
        }

        InGame::resolve_level(&mut options);
        let level = options
            .map_name
            .as_deref()
            .and_then(|name| ctx.maps.get(name))
            .cloned();
        let Some(level) = level else {
            log!("[game] no level {:?}, back to the menu", options.map_name);
            let thanks = format!(
                "Thanks for playing {}!\n\nSee you among the stars.",
                ctx.config.app.title
            );
            ctx.change_state(StateKind::Menu, StateOptions::with_message(thanks));
            return;
        };

        self.build_world(&level, ctx);
        self.build_hud(ctx);

        ctx.audio.set_looping(THRUSTERS, true);
        ctx.audio.set_gain(THRUSTERS, 0.0);
        ctx.audio.play(THRUSTERS);

        let show_tutorial = options.show_tutorial;
        self.options = options;
        if show_tutorial {
            self.show_tutorial(ctx);
        } else {
            self.start_game(ctx);
        }
    }

    fn update(&mut self, dt: f64, ctx: &mut Context) {
        if self.player.playing {
            self.player.play_time += dt;
            self.apply_controls(dt, ctx);
        }

        self.refresh_hud(ctx);
        self.ui.update(dt);

        if let Some(lander) = self.lander.as_mut() {
            lander.update(dt);
            ctx.audio.set_gain(THRUSTERS, lander.thruster.gain());
        }
        if let Some(terrain) = self.terrain.as_mut() {
            terrain.update(dt);
        }

        if self.confine_lander(ctx) && !self.landed {
            self.land(ctx);
        }
    }

    fn draw(&self, surfaces: &Surfaces) {
        self.ui.draw(surfaces.ui);
        if let Some(lander) = &self.lander {
            lander.draw(surfaces.foreground);
        }
        if let Some(terrain) = &self.terrain {
            terrain.draw(surfaces.foreground);
        }
    }

    fn reset(&mut self) {
        *self = InGame::default();
    }

    fn command(&mut self, command: Command, ctx: &mut Context) {
        match command {
            Command::StartGame => self.start_game(ctx),
            Command::BeginFlight => self.begin_flight(ctx),
            Command::NextSlide => self.next_slide(ctx),
            Command::ShowResult(outcome) => self.show_result(outcome, ctx),
            Command::RemoveObjects(names) => remove_objects(&mut self.ui, &names),
            Command::ChangeState(..) | Command::ExportLevel => {}
        }
    }
}
