use super::drawable::{Drawable, Hooked, Hooks};
use crate::engine::{DrawingContext, TextAlign, TextBaseline};
use crate::geometry::Point;

const DEFAULT_FONT_SIZE: f64 = 16.0;
const DEFAULT_FONT_FAMILY: &str = "'Atari','Arial',sans-serif";

#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub size: f64,
    pub family: String,
}

impl Default for Font {
    fn default() -> Self {
        Font {
            size: DEFAULT_FONT_SIZE,
            family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

impl Font {
    /// CSS shorthand, e.g. `16px 'Atari','Arial',sans-serif`
    pub fn css(&self) -> String {
        format!("{}px {}", self.size, self.family)
    }
}

#[derive(Debug)]
pub struct TextObject {
    pub drawable: Drawable,
    pub text: String,
    pub local: Point,
    pub font: Font,
    pub text_align: TextAlign,
    pub text_baseline: TextBaseline,
    pub wrap: bool,
    pub max_width: f64,
    pub line_separation: f64,
    hooks: Hooks<TextObject>,
}

impl Hooked for TextObject {
    fn hooks(&self) -> &Hooks<Self> {
        &self.hooks
    }

    fn hooks_mut(&mut self) -> &mut Hooks<Self> {
        &mut self.hooks
    }
}

impl TextObject {
    pub fn new(x: f64, y: f64, text: &str, color: Option<&str>) -> Self {
        let mut drawable = Drawable::new(x, y).with_color(color);
        drawable.stroke = false;
        TextObject {
            drawable,
            text: text.to_string(),
            local: Point::default(),
            font: Font::default(),
            text_align: TextAlign::Start,
            text_baseline: TextBaseline::Top,
            wrap: false,
            max_width: f64::MAX,
            line_separation: DEFAULT_FONT_SIZE / 3.0,
            hooks: Hooks::default(),
        }
    }

    /// Centre aligned on both axes, the way headlines and labels are laid out
    pub fn centered(mut self) -> Self {
        self.text_align = TextAlign::Center;
        self.text_baseline = TextBaseline::Middle;
        self
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.font.size = size;
        self
    }

    pub fn with_wrap(mut self, max_width: f64) -> Self {
        self.wrap = true;
        self.max_width = max_width;
        self
    }

    pub fn on_update(mut self, hook: impl FnMut(&mut TextObject, f64) + 'static) -> Self {
        self.hooks.on_update = Some(Box::new(hook));
        self
    }

    pub fn on_draw(mut self, hook: impl Fn(&TextObject, &dyn DrawingContext) + 'static) -> Self {
        self.hooks.on_draw = Some(Box::new(hook));
        self
    }

    pub fn update(&mut self, dt: f64) {
        self.run_update_hook(dt);
    }

    pub fn draw(&self, context: &dyn DrawingContext) {
        self.run_draw_hook(context);
        self.drawable.prepare_and_draw(context, |ctx| {
            ctx.set_font(&self.font.css());
            ctx.set_text_align(self.text_align);
            ctx.set_text_baseline(self.text_baseline);

            if self.wrap {
                self.wrap_text(ctx);
            } else {
                if self.drawable.fill {
                    ctx.fill_text(&self.text, self.local.x, self.local.y);
                }
                if self.drawable.stroke {
                    ctx.stroke_text(&self.text, self.local.x, self.local.y);
                }
            }
        });
    }

    /// Breaks on `\n` and wherever the measured line would exceed
    /// `max_width`. A single word wider than `max_width` keeps its own line.
    fn wrap_text(&self, ctx: &dyn DrawingContext) {
        let line_height = self.font.size + self.line_separation;
        let mut y = self.local.y;

        for paragraph in self.text.split('\n') {
            let mut line = String::new();
            for (n, word) in paragraph.split(' ').enumerate() {
                let candidate = format!("{}{} ", line, word);
                if n > 0 && ctx.measure_text(&candidate) > self.max_width {
                    ctx.fill_text(line.trim_end(), 0.0, y);
                    line = format!("{} ", word);
                    y += line_height;
                } else {
                    line = candidate;
                }
            }
            ctx.fill_text(line.trim_end(), 0.0, y);
            y += line_height;
        }
    }
}
