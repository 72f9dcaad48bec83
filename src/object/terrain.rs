use super::drawable::{Drawable, Hooked, Hooks};
use crate::engine::DrawingContext;
use crate::geometry::{self, Point};

/// Ground polyline. Lookups clamp `x` into the path's x-range and use the
/// first segment whose closed interval contains it, so a shared vertex
/// belongs to the segment on its left.
#[derive(Debug)]
pub struct Terrain {
    pub drawable: Drawable,
    pub path: Vec<Point>,
    pub bonus_time_limit: f64,
    hooks: Hooks<Terrain>,
}

impl Hooked for Terrain {
    fn hooks(&self) -> &Hooks<Self> {
        &self.hooks
    }

    fn hooks_mut(&mut self) -> &mut Hooks<Self> {
        &mut self.hooks
    }
}

impl Terrain {
    pub fn new(path: Vec<Point>) -> Self {
        let mut drawable = Drawable::new(0.0, 0.0);
        drawable.fill = false;
        drawable.line_width = 3.0;
        Terrain {
            drawable,
            path,
            bonus_time_limit: 0.0,
            hooks: Hooks::default(),
        }
    }

    pub fn with_bonus_time_limit(mut self, limit: f64) -> Self {
        self.bonus_time_limit = limit;
        self
    }

    pub fn on_update(mut self, hook: impl FnMut(&mut Terrain, f64) + 'static) -> Self {
        self.hooks.on_update = Some(Box::new(hook));
        self
    }

    pub fn on_draw(mut self, hook: impl Fn(&Terrain, &dyn DrawingContext) + 'static) -> Self {
        self.hooks.on_draw = Some(Box::new(hook));
        self
    }

    fn segment(&self, x: f64) -> Option<(Point, Point)> {
        if self.path.len() < 2 {
            return None;
        }
        let first = self.path[0].x;
        let last = self.path[self.path.len() - 1].x;
        let x = if first <= last { x.clamp(first, last) } else { x };

        self.path
            .windows(2)
            .find(|pair| pair[0].x <= x && x <= pair[1].x)
            .map(|pair| (pair[0], pair[1]))
    }

    /// Ground y under `x`
    pub fn height_at(&self, x: f64) -> Option<f64> {
        let (a, b) = self.segment(x)?;
        if a.x == b.x {
            return Some(a.y.min(b.y));
        }
        Some(geometry::interpolation(a, b, x.clamp(a.x, b.x)))
    }

    pub fn gradient_at(&self, x: f64) -> Option<f64> {
        self.segment(x).map(|(a, b)| geometry::gradient(a, b))
    }

    pub fn update(&mut self, dt: f64) {
        self.run_update_hook(dt);
    }

    pub fn draw(&self, context: &dyn DrawingContext) {
        self.run_draw_hook(context);
        let Some((first, rest)) = self.path.split_first() else {
            return;
        };
        self.drawable.prepare_and_draw(context, |ctx| {
            ctx.begin_path();
            ctx.move_to(first.x, first.y);
            for point in rest {
                ctx.line_to(point.x, point.y);
            }
            if self.drawable.stroke {
                ctx.stroke();
            }
            if self.drawable.fill {
                ctx.fill();
            }
        });
    }
}
