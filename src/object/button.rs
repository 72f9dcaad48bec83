use super::drawable::Drawable;
use super::text::TextObject;
use crate::engine::DrawingContext;
use crate::geometry::Point;
use crate::timer::Deferred;

pub type ClickHook = Box<dyn FnMut(&mut Button) -> Option<Deferred>>;
pub type HoverHook = Box<dyn FnMut(&mut Button)>;

/// Outlined box with a centred label. `global` is always the centre; `local`
/// is the top-left corner relative to it.
pub struct Button {
    pub drawable: Drawable,
    pub local: Point,
    pub width: f64,
    pub height: f64,
    pub label: TextObject,
    on_click: Option<ClickHook>,
    on_hover: Option<HoverHook>,
}

impl Button {
    pub fn new(
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        text: &str,
        define_from_center: bool,
        color: Option<&str>,
    ) -> Self {
        let center = if define_from_center {
            Point::new(x, y)
        } else {
            Point::new(x + width / 2.0, y + height / 2.0)
        };
        let mut drawable = Drawable::new(center.x, center.y).with_color(color);
        drawable.fill = false;

        let mut label = TextObject::new(center.x, center.y, text, None).centered();
        if let Some(color) = color {
            label.drawable.color.fill = color.to_string();
        }

        Button {
            drawable,
            local: Point::new(-width / 2.0, -height / 2.0),
            width,
            height,
            label,
            on_click: None,
            on_hover: None,
        }
    }

    pub fn on_click(
        mut self,
        hook: impl FnMut(&mut Button) -> Option<Deferred> + 'static,
    ) -> Self {
        self.on_click = Some(Box::new(hook));
        self
    }

    pub fn on_hover(mut self, hook: impl FnMut(&mut Button) + 'static) -> Self {
        self.on_hover = Some(Box::new(hook));
        self
    }

    /// Runs the click hook; the returned command is for the caller to schedule
    pub fn click(&mut self) -> Option<Deferred> {
        let mut hook = self.on_click.take()?;
        let deferred = hook(self);
        if self.on_click.is_none() {
            self.on_click = Some(hook);
        }
        deferred
    }

    pub fn hover(&mut self) {
        if let Some(mut hook) = self.on_hover.take() {
            hook(self);
            if self.on_hover.is_none() {
                self.on_hover = Some(hook);
            }
        }
    }

    /// Filled background with an inverted label
    pub fn press(&mut self) {
        self.drawable.fill = true;
        self.drawable.color.fill = self.drawable.color.stroke.clone();
        self.label.drawable.color.fill = "black".to_string();
    }

    pub fn release(&mut self) {
        self.drawable.fill = false;
        self.label.drawable.color.fill = self.drawable.color.stroke.clone();
    }

    pub fn is_pressed(&self) -> bool {
        self.drawable.fill
    }

    pub fn update(&mut self, _dt: f64) {
        self.label.drawable.global = self.drawable.global;
    }

    pub fn draw(&self, context: &dyn DrawingContext) {
        self.drawable.prepare_and_draw(context, |ctx| {
            if self.drawable.fill {
                ctx.fill_rect(self.local.x, self.local.y, self.width, self.height);
            }
            if self.drawable.stroke {
                ctx.stroke_rect(self.local.x, self.local.y, self.width, self.height);
            }
        });
        self.label.draw(context);
    }

    /// Axis-aligned test against the unrotated box, edges included
    pub fn collision_with_point(&self, point: Point) -> bool {
        let left = self.drawable.global.x + self.local.x;
        let top = self.drawable.global.y + self.local.y;
        !(point.x < left
            || point.x > left + self.width
            || point.y < top
            || point.y > top + self.height)
    }
}
