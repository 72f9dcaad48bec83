//! Scene graph entities. Every concrete type embeds a [`Drawable`], either
//! directly or through a [`Moveable`], and draws itself relative to it.

pub mod button;
pub mod drawable;
pub mod lander;
pub mod moveable;
pub mod rectangle;
pub mod terrain;
pub mod text;

pub use button::Button;
pub use drawable::{Color, Drawable, Hooked, Hooks};
pub use lander::Lander;
pub use moveable::{Motion, Moveable};
pub use rectangle::Rectangle;
pub use terrain::Terrain;
pub use text::TextObject;

use crate::engine::DrawingContext;
use crate::geometry::Point;

/// Everything the UI container can hold
pub enum Entity {
    Text(TextObject),
    Rectangle(Rectangle),
    Button(Button),
    Terrain(Terrain),
    Lander(Lander),
}

impl Entity {
    pub fn update(&mut self, dt: f64) {
        match self {
            Entity::Text(text) => text.update(dt),
            Entity::Rectangle(rectangle) => rectangle.update(dt),
            Entity::Terrain(terrain) => terrain.update(dt),
            Entity::Button(button) => button.update(dt),
            Entity::Lander(lander) => lander.update(dt),
        }
    }

    pub fn draw(&self, context: &dyn DrawingContext) {
        match self {
            Entity::Text(text) => text.draw(context),
            Entity::Rectangle(rectangle) => rectangle.draw(context),
            Entity::Button(button) => button.draw(context),
            Entity::Terrain(terrain) => terrain.draw(context),
            Entity::Lander(lander) => lander.draw(context),
        }
    }

    /// Only buttons can be hit
    pub fn collision_with_point(&self, point: Point) -> bool {
        match self {
            Entity::Button(button) => button.collision_with_point(point),
            _ => false,
        }
    }

    pub fn drawable(&self) -> &Drawable {
        match self {
            Entity::Text(text) => &text.drawable,
            Entity::Rectangle(rectangle) => &rectangle.drawable,
            Entity::Button(button) => &button.drawable,
            Entity::Terrain(terrain) => &terrain.drawable,
            Entity::Lander(lander) => &lander.body.drawable,
        }
    }

    pub fn drawable_mut(&mut self) -> &mut Drawable {
        match self {
            Entity::Text(text) => &mut text.drawable,
            Entity::Rectangle(rectangle) => &mut rectangle.drawable,
            Entity::Button(button) => &mut button.drawable,
            Entity::Terrain(terrain) => &mut terrain.drawable,
            Entity::Lander(lander) => &mut lander.body.drawable,
        }
    }

    pub fn as_text(&self) -> Option<&TextObject> {
        match self {
            Entity::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextObject> {
        match self {
            Entity::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_button(&self) -> Option<&Button> {
        match self {
            Entity::Button(button) => Some(button),
            _ => None,
        }
    }

    pub fn as_button_mut(&mut self) -> Option<&mut Button> {
        match self {
            Entity::Button(button) => Some(button),
            _ => None,
        }
    }

    pub fn as_rectangle_mut(&mut self) -> Option<&mut Rectangle> {
        match self {
            Entity::Rectangle(rectangle) => Some(rectangle),
            _ => None,
        }
    }

    pub fn as_lander(&self) -> Option<&Lander> {
        match self {
            Entity::Lander(lander) => Some(lander),
            _ => None,
        }
    }
}

impl From<TextObject> for Entity {
    fn from(text: TextObject) -> Self {
        Entity::Text(text)
    }
}

impl From<Rectangle> for Entity {
    fn from(rectangle: Rectangle) -> Self {
        Entity::Rectangle(rectangle)
    }
}

impl From<Button> for Entity {
    fn from(button: Button) -> Self {
        Entity::Button(button)
    }
}

impl From<Terrain> for Entity {
    fn from(terrain: Terrain) -> Self {
        Entity::Terrain(terrain)
    }
}

impl From<Lander> for Entity {
    fn from(lander: Lander) -> Self {
        Entity::Lander(lander)
    }
}
