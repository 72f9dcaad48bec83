use crate::engine::{DrawingContext, SavedState};
use crate::geometry::Point;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Color {
    pub stroke: String,
    pub fill: String,
}

impl Default for Color {
    fn default() -> Self {
        Color {
            stroke: "white".to_string(),
            fill: "black".to_string(),
        }
    }
}

impl Color {
    /// Same colour for stroke and fill
    pub fn solid(color: &str) -> Self {
        Color {
            stroke: color.to_string(),
            fill: color.to_string(),
        }
    }
}

/// Transform and style shared by everything in the scene graph. Draw
/// callbacks emit geometry relative to `global`, after scale and rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub global: Point,
    pub rotation: f64,
    pub scale: Point,
    pub color: Color,
    pub line_width: f64,
    pub stroke: bool,
    pub fill: bool,
    pub is_out_of_bounds: bool,
    pub is_alive: bool,
}

impl Default for Drawable {
    fn default() -> Self {
        Drawable::new(0.0, 0.0)
    }
}

impl Drawable {
    pub fn new(x: f64, y: f64) -> Self {
        Drawable {
            global: Point::new(x, y),
            rotation: 0.0,
            scale: Point::new(1.0, 1.0),
            color: Color::default(),
            line_width: 2.0,
            stroke: true,
            fill: true,
            is_out_of_bounds: false,
            is_alive: true,
        }
    }

    pub fn with_color(mut self, color: Option<&str>) -> Self {
        if let Some(color) = color {
            self.color = Color::solid(color);
        }
        self
    }

    /// scale → translate(global) → rotate → styles → `draw`, all inside a
    /// save/restore pair
    pub fn prepare_and_draw(
        &self,
        context: &dyn DrawingContext,
        draw: impl FnOnce(&dyn DrawingContext),
    ) {
        let _saved = SavedState::new(context);
        context.scale(self.scale.x, self.scale.y);
        context.translate(self.global.x, self.global.y);
        context.rotate(self.rotation);
        if self.fill {
            context.set_fill_style(&self.color.fill);
        }
        if self.stroke {
            context.set_line_width(self.line_width);
            context.set_stroke_style(&self.color.stroke);
        }
        draw(context);
    }
}

pub type UpdateHook<T> = Box<dyn FnMut(&mut T, f64)>;
pub type DrawHook<T> = Box<dyn Fn(&T, &dyn DrawingContext)>;

/// Optional per-instance behaviour attached to an entity
pub struct Hooks<T> {
    pub on_update: Option<UpdateHook<T>>,
    pub on_draw: Option<DrawHook<T>>,
}

impl<T> Default for Hooks<T> {
    fn default() -> Self {
        Hooks {
            on_update: None,
            on_draw: None,
        }
    }
}

impl<T> fmt::Debug for Hooks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_update", &self.on_update.is_some())
            .field("on_draw", &self.on_draw.is_some())
            .finish()
    }
}

pub trait Hooked: Sized {
    fn hooks(&self) -> &Hooks<Self>;
    fn hooks_mut(&mut self) -> &mut Hooks<Self>;

    fn run_update_hook(&mut self, dt: f64) {
        // the hook needs `&mut self`, so it is taken out while it runs
        if let Some(mut hook) = self.hooks_mut().on_update.take() {
            hook(self, dt);
            let slot = &mut self.hooks_mut().on_update;
            if slot.is_none() {
                *slot = Some(hook);
            }
        }
    }

    fn run_draw_hook(&self, context: &dyn DrawingContext) {
        if let Some(hook) = &self.hooks().on_draw {
            hook(self, context);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingContext};

    #[test]
    fn transforms_apply_scale_translate_rotate_then_styles() {
        let mut drawable = Drawable::new(10.0, 20.0);
        drawable.rotation = 0.5;
        drawable.scale = Point::new(2.0, 3.0);
        drawable.line_width = 4.0;
        let context = RecordingContext::default();

        drawable.prepare_and_draw(&context, |ctx| ctx.fill_rect(0.0, 0.0, 1.0, 1.0));

        assert_eq!(
            context.calls(),
            vec![
                Call::Save,
                Call::Scale(2.0, 3.0),
                Call::Translate(10.0, 20.0),
                Call::Rotate(0.5),
                Call::FillStyle("black".to_string()),
                Call::LineWidth(4.0),
                Call::StrokeStyle("white".to_string()),
                Call::FillRect(0.0, 0.0, 1.0, 1.0),
                Call::Restore,
            ]
        );
    }

    #[test]
    fn disabled_styles_are_not_set() {
        let mut drawable = Drawable::new(0.0, 0.0).with_color(Some("red"));
        drawable.fill = false;
        let context = RecordingContext::default();

        drawable.prepare_and_draw(&context, |_| {});

        let calls = context.calls();
        assert!(!calls.iter().any(|call| matches!(call, Call::FillStyle(_))));
        assert!(calls.contains(&Call::StrokeStyle("red".to_string())));
        assert_eq!(calls.last(), Some(&Call::Restore));
    }

    #[test]
    fn restore_happens_even_when_the_callback_panics() {
        let drawable = Drawable::new(0.0, 0.0);
        let context = RecordingContext::default();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            drawable.prepare_and_draw(&context, |_| panic!("draw failed"));
        }));

        assert!(result.is_err());
        assert_eq!(context.calls().last(), Some(&Call::Restore));
    }
}
