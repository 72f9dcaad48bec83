use super::drawable::Drawable;

/// Linear and angular components, used for both speed and acceleration
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Motion {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Moveable {
    pub drawable: Drawable,
    pub speed: Motion,
    pub acceleration: Motion,
    pub update_movement: bool,
}

impl Moveable {
    pub fn new(x: f64, y: f64) -> Self {
        Moveable {
            drawable: Drawable::new(x, y),
            speed: Motion::default(),
            acceleration: Motion::default(),
            update_movement: true,
        }
    }

    /// Explicit Euler step: speed first, then position with the new speed
    pub fn update(&mut self, dt: f64) {
        if !self.update_movement {
            return;
        }
        self.speed.x += self.acceleration.x * dt;
        self.speed.y += self.acceleration.y * dt;
        self.speed.rotation += self.acceleration.rotation * dt;

        self.drawable.global.x += self.speed.x * dt;
        self.drawable.global.y += self.speed.y * dt;
        self.drawable.rotation += self.speed.rotation * dt;
    }
}
