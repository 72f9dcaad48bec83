use super::drawable::{Hooked, Hooks};
use super::moveable::Moveable;
use super::rectangle::Rectangle;
use super::terrain::Terrain;
use crate::config::{LandingRequirements, Physics};
use crate::engine::{DrawingContext, SavedState};
use crate::geometry::{self, Point};
use std::f64::consts::{PI, TAU};

// Artwork is drawn on a 512 × 512 grid and scaled to the lander size
const ARTWORK_SIZE: f64 = 512.0;

const HULL_PATH: &str = "M144 23c-9.282 0-17 7.718-17 17 0 5.99 3.224 11.317 8 14.35v40.46l-15.156 7.38L91.68 228.93l76.5-12.75 15.238-91.434 48.268-77.014L153 86.047V54.35c4.776-3.033 8-8.36 8-14.35 0-9.282-7.718-17-17-17zm112 19.832L202.62 128h106.76L256 42.832zM416 45c-24.96 0-45 20.04-45 45s20.04 45 45 45 45-20.04 45-45-20.04-45-45-45zm-135.686 2.732l48.268 77.014 15.068 90.414 76.637 13.617-17.135-77.105C374.586 145.708 353 120.287 353 90c0-2.263.126-4.497.36-6.7l-73.046-35.568zM416 71c9.282 0 17 7.718 17 17s-7.718 17-17 17-17-7.718-17-17 7.718-17 17-17zm-288 48h32v18h-32v-18zm64 89l16 32h96l16-32H192zm149.88 25.13l-39.46 92.067 91.148-13.35 25.967-64.92-77.656-13.798zm-171.468.925L92.51 247.04l25.922 64.806 89.494 13.11-37.514-90.9zM198.942 256l29.71 71.992L256 331.998l25.527-3.74L312.494 256h-113.55zm-84.962 73.385L58.15 455H32v18h64v-18H77.85l6.543-14.72c.154-.06.285-.122.486-.18 1.41-.413 3.09-.958 5.097-1.637 4.014-1.358 9.296-3.25 15.464-5.514 12.34-4.53 28.187-10.538 43.86-16.546 18.96-7.267 34.964-13.486 46.782-18.093L247 436.5V471h-23v18h64v-18h-23v-34.5l50.918-38.19c11.818 4.608 27.82 10.827 46.78 18.094 15.675 6.008 31.523 12.017 43.86 16.545 6.17 2.263 11.45 4.155 15.465 5.513 2.007.68 3.687 1.224 5.098 1.637.202.058.333.12.487.18L434.15 455H416v18h64v-18h-26.15l-55.83-125.613-18.493 2.71 38.096 85.717c-1.6-.578-3.097-1.116-4.86-1.763-12.184-4.47-27.99-10.462-43.622-16.454-14.304-5.483-28.13-10.84-39.288-15.176l24.304-48.608-21.715 3.18L314.44 375H265v-26.13l-9 1.32-9-1.32V375h-49.438l-18.003-36.008-21.718-3.18 24.304 48.608c-11.156 4.337-24.983 9.693-39.287 15.176-15.633 5.992-31.44 11.983-43.622 16.455-1.764.648-3.26 1.186-4.86 1.764l38.095-85.72-18.493-2.71zM219 393h28v21l-28-21zm46 0h28l-28 21v-21z";

const FLAME_PATH: &str = "M23.018 20.705l135.64 163.623-107.33-32.39 168.79 111.326L82.784 224.11l192.51 111.87-130.525-1.76 282.08 126.116c13.913 7.198 28.182 13.638 42.728 19.246l2.297.885 20.797 9.3-16.895-37.82c-3.67-9.115-7.69-18.094-12.03-26.926L338.312 144.24l1.094 129.362L228.352 82.393l38.482 136.49L155.906 50.668l31.684 106.467L23.018 20.705zm225.148 225.178c94.262 38.75 169.608 116.195 208.152 207.924-91.01-40.827-168.835-115.908-208.152-207.924z";

const EXPLOSION_PATH: &str = "M340.625 18.438l-42.438 104.657-39.562-99.938L213.25 157l-75.97-54.78 14.22 92.53L24.53 27l108.095 202.032-72.094-36.344 59.532 171.188-88.906-12.53 55.25 72.06-52.47-12.03 103.626 78.75 1.875 2.47h240.188l110.28-151.376-52.03 5.468 56.406-67.562-71.718 36.03L459.97 203.22l-54.783 24.625-88.75 67.843 54.282-78.25 18.936-116.343-57.75 37.562 8.72-120.22zM310.312 204.25L296.72 317.127l82.53-21.5-59.47 57.625L376.907 395l-77.437-12.905 36.092 75.75-67-39.313-40.593 50.375-3.72-57.97-70.063 5.783 70.063-37.313-77.53-79.28 75.124 18.56-8.375-84.75 51.405 87.5 45.437-117.186z";

/// Symmetric random offset in `[-amplitude, amplitude)`
fn jitter(amplitude: f64) -> f64 {
    (geometry::random_unit() * 2.0 - 1.0) * amplitude
}

/// Main engine. Thrust points along the lander's up axis, so its world
/// components follow the rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Thruster {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub amount: f64,
    pub amount_limit: f64,
    cos: f64,
    sin: f64,
    scale: Point,
}

impl Thruster {
    const ROTATION: f64 = 5.0 * PI / 4.0;
    const OFFSET: f64 = -550.0;

    fn new(gravitation: f64, width: f64, height: f64) -> Self {
        Thruster {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            amount: 0.0,
            amount_limit: 1.7 * gravitation,
            cos: 1.0,
            sin: 0.0,
            scale: Point::new(2.0 * width / ARTWORK_SIZE, 2.0 * height / ARTWORK_SIZE),
        }
    }

    /// Sets the thrust, or adds to it when `conserve` is set. The result is
    /// clamped to `[0, amount_limit]`.
    pub fn thrust(&mut self, amount: f64, conserve: bool) {
        let base = if conserve { self.amount } else { 0.0 };
        self.amount = (amount + base).clamp(0.0, self.amount_limit.max(0.0));
        self.refresh(true);
    }

    /// Recomputes the thrust components. `use_cached` skips the trigonometry
    /// when only the amount changed.
    pub fn refresh(&mut self, use_cached: bool) {
        if !use_cached {
            self.cos = self.rotation.cos();
            self.sin = self.rotation.sin();
        }
        self.x = self.sin * self.amount;
        self.y = self.cos * self.amount;
    }

    /// Volume of the engine sound for the current thrust
    pub fn gain(&self) -> f64 {
        if self.amount_limit > 0.0 {
            0.3 * self.amount / self.amount_limit
        } else {
            0.0
        }
    }

    fn ratio(&self) -> f64 {
        if self.amount_limit > 0.0 {
            self.amount / self.amount_limit
        } else {
            0.0
        }
    }

    fn draw(&self, context: &dyn DrawingContext) {
        let _saved = SavedState::new(context);
        context.rotate(Self::ROTATION);
        context.scale(self.scale.x * self.ratio(), self.scale.y * self.ratio());
        context.translate(Self::OFFSET + jitter(5.0), Self::OFFSET + jitter(5.0));
        context.stroke_svg(FLAME_PATH);
    }
}

/// Burst shown when a landing fails. `size` grows for the first half of
/// `playtime` seconds and shrinks back to zero in the second half.
#[derive(Debug, Clone, PartialEq)]
pub struct Explosion {
    pub global: Point,
    pub animating: bool,
    pub size: f64,
    pub playtime: f64,
    progress: f64,
    direction: f64,
    scale: Point,
}

impl Explosion {
    const OFFSET: Point = Point::new(-256.0, -400.0);

    fn new(width: f64, height: f64) -> Self {
        Explosion {
            global: Point::default(),
            animating: false,
            size: 0.0,
            playtime: 1.2,
            progress: 0.0001,
            direction: 1.0,
            scale: Point::new(4.0 * width / ARTWORK_SIZE, 4.0 * height / ARTWORK_SIZE),
        }
    }

    pub fn advance(&mut self, dt: f64) {
        self.animating = true;
        if self.progress > self.playtime / 2.0 {
            self.direction = -1.0;
        }
        if self.progress > 0.0 {
            self.progress += dt * self.direction;
        } else {
            self.progress = 0.0;
            self.animating = false;
        }
        self.size = (2.0 * self.progress / self.playtime).max(0.0);
    }

    fn draw(&self, context: &dyn DrawingContext) {
        let _saved = SavedState::new(context);
        context.translate(self.global.x, self.global.y);
        context.scale(self.scale.x * self.size, self.scale.y * self.size);
        context.translate(Self::OFFSET.x + jitter(4.0), Self::OFFSET.y + jitter(4.0));
        context.set_stroke_style("white");
        context.set_line_width(5.0);
        context.stroke_svg(EXPLOSION_PATH);
    }
}

/// ┌──────────────────────── Lander::update ────────────────────────┐
/// │  1. update hook                                                │
/// │  2. Moveable integration        speed, then position           │
/// │  3. bounding rect sync          global + rotation              │
/// │  4. fuel burn                   empty tank cuts the thrust     │
/// │  5. thruster direction          only when rotation changed     │
/// │  6. acceleration                gravity − thrust.y, thrust.x   │
/// │  7. explosion animation         once exploded                  │
/// └────────────────────────────────────────────────────────────────┘
pub struct Lander {
    pub body: Moveable,
    pub width: f64,
    pub height: f64,
    pub fuel: f64,
    pub is_exploded: bool,
    pub thruster: Thruster,
    pub explosion: Explosion,
    pub bounding_rect: Rectangle,
    pub show_bounds: bool,
    gravitation: f64,
    hooks: Hooks<Lander>,
}

impl Hooked for Lander {
    fn hooks(&self) -> &Hooks<Self> {
        &self.hooks
    }

    fn hooks_mut(&mut self) -> &mut Hooks<Self> {
        &mut self.hooks
    }
}

impl Lander {
    pub fn new(x: f64, y: f64, width: f64, height: f64, physics: &Physics) -> Self {
        let mut body = Moveable::new(x, y);
        body.drawable.fill = false;
        body.drawable.color.fill = "white".to_string();
        body.drawable.line_width = 6.0;

        let mut bounding_rect = Rectangle::new(
            x + width / 2.0,
            y + height / 2.0,
            Point::new(-width / 2.0, -height / 2.0),
            Point::new(width / 2.0, height / 2.0),
            None,
        );
        bounding_rect.drawable.fill = false;

        Lander {
            body,
            width,
            height,
            fuel: 0.0,
            is_exploded: false,
            thruster: Thruster::new(physics.gravitation, width, height),
            explosion: Explosion::new(width, height),
            bounding_rect,
            show_bounds: false,
            gravitation: physics.gravitation,
            hooks: Hooks::default(),
        }
    }

    pub fn with_fuel(mut self, fuel: f64) -> Self {
        self.fuel = fuel;
        self
    }

    pub fn on_update(mut self, hook: impl FnMut(&mut Lander, f64) + 'static) -> Self {
        self.hooks.on_update = Some(Box::new(hook));
        self
    }

    pub fn global(&self) -> Point {
        self.body.drawable.global
    }

    pub fn rotation(&self) -> f64 {
        self.body.drawable.rotation
    }

    pub fn rotate(&mut self, angle: f64) {
        self.body.drawable.rotation += angle;
    }

    pub fn update(&mut self, dt: f64) {
        self.run_update_hook(dt);
        self.body.update(dt);

        self.bounding_rect.drawable.global = self.body.drawable.global;
        self.bounding_rect.drawable.rotation = self.body.drawable.rotation;

        self.fuel -= self.thruster.amount * dt;
        if self.fuel <= 0.0 {
            self.thruster.thrust(0.0, false);
            self.fuel = 0.0;
        }

        if self.thruster.rotation != self.body.drawable.rotation {
            self.thruster.rotation = self.body.drawable.rotation;
            self.thruster.refresh(false);
        }

        self.body.acceleration.y = self.gravitation - self.thruster.y;
        self.body.acceleration.x = self.thruster.x;

        if self.is_exploded {
            self.explosion.global = self.body.drawable.global;
            self.explosion.advance(dt);
        }
    }

    /// Cuts the engine and checks speed, slope and attitude against `limits`.
    /// A surviving lander is set upright.
    pub fn has_survived_landing(&mut self, terrain: &Terrain, limits: &LandingRequirements) -> bool {
        self.thruster.thrust(0.0, false);
        let Some(gradient) = terrain.gradient_at(self.body.drawable.global.x) else {
            return false;
        };
        if self.body.speed.y.abs() > limits.vertical_speed
            || self.body.speed.x.abs() > limits.horizontal_speed
            || gradient.abs() > limits.ground_gradient
            || (self.body.drawable.rotation % TAU).abs() > limits.angle
        {
            return false;
        }
        self.body.drawable.rotation = 0.0;
        true
    }

    pub fn draw(&self, context: &dyn DrawingContext) {
        self.run_draw_hook(context);
        let drawable = &self.body.drawable;
        drawable.prepare_and_draw(context, |ctx| {
            if self.is_exploded {
                return;
            }
            self.thruster.draw(ctx);
            ctx.scale(self.width / ARTWORK_SIZE, self.height / ARTWORK_SIZE);
            ctx.translate(-ARTWORK_SIZE / 2.0, -ARTWORK_SIZE / 2.0);
            if drawable.stroke {
                ctx.stroke_svg(HULL_PATH);
            }
            if drawable.fill {
                ctx.fill_svg(HULL_PATH);
            }
        });
        if self.explosion.animating {
            self.explosion.draw(context);
        }

        if self.show_bounds {
            self.bounding_rect.draw(context);
        }
    }
}
