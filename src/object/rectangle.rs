use super::drawable::{Drawable, Hooked, Hooks};
use crate::engine::DrawingContext;
use crate::geometry::Point;

/// Axis-aligned box spanned by two local corners
#[derive(Debug)]
pub struct Rectangle {
    pub drawable: Drawable,
    pub pt1: Point,
    pub pt2: Point,
    pub width: f64,
    pub height: f64,
    hooks: Hooks<Rectangle>,
}

impl Hooked for Rectangle {
    fn hooks(&self) -> &Hooks<Self> {
        &self.hooks
    }

    fn hooks_mut(&mut self) -> &mut Hooks<Self> {
        &mut self.hooks
    }
}

impl Rectangle {
    pub fn new(x: f64, y: f64, pt1: Point, pt2: Point, color: Option<&str>) -> Self {
        Rectangle {
            drawable: Drawable::new(x, y).with_color(color),
            pt1,
            pt2,
            width: (pt2.x - pt1.x).abs(),
            height: (pt2.y - pt1.y).abs(),
            hooks: Hooks::default(),
        }
    }

    /// Full-screen rectangle used to dim everything beneath an overlay
    pub fn overlay(width: f64, height: f64, color: &str) -> Self {
        Rectangle::new(
            0.0,
            0.0,
            Point::new(0.0, 0.0),
            Point::new(width, height),
            Some(color),
        )
    }

    pub fn on_update(mut self, hook: impl FnMut(&mut Rectangle, f64) + 'static) -> Self {
        self.hooks.on_update = Some(Box::new(hook));
        self
    }

    pub fn on_draw(mut self, hook: impl Fn(&Rectangle, &dyn DrawingContext) + 'static) -> Self {
        self.hooks.on_draw = Some(Box::new(hook));
        self
    }

    /// World y of the `pt2` corner
    pub fn bottom(&self) -> f64 {
        self.drawable.global.y + self.pt2.y
    }

    pub fn update(&mut self, dt: f64) {
        self.run_update_hook(dt);
    }

    pub fn draw(&self, context: &dyn DrawingContext) {
        self.run_draw_hook(context);
        self.drawable.prepare_and_draw(context, |ctx| {
            if self.drawable.fill {
                ctx.fill_rect(self.pt1.x, self.pt1.y, self.width, self.height);
            }
            if self.drawable.stroke {
                ctx.stroke_rect(self.pt1.x, self.pt1.y, self.width, self.height);
            }
        });
    }
}
