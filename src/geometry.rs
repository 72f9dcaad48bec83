use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Size { width, height }
    }
}

/// y value at `x` on the line through `a` and `b`
pub fn interpolation(a: Point, b: Point, x: f64) -> f64 {
    ((x - a.x) * (b.y - a.y)) / (b.x - a.x) + a.y
}

pub fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Midpoint between two points
pub fn median(a: Point, b: Point) -> Point {
    Point {
        x: (a.x + b.x) / 2.0,
        y: (a.y + b.y) / 2.0,
    }
}

pub fn gradient(a: Point, b: Point) -> f64 {
    (b.y - a.y) / (b.x - a.x)
}

/// Formats a duration in seconds as `MM:SS`, truncating partial seconds
pub fn seconds_to_mmss(seconds: f64) -> String {
    let minutes = seconds.max(0.0) / 60.0;
    let rest = (minutes - minutes.floor()) * 60.0;
    format!("{:02}:{:02}", minutes.floor() as u64, rest.floor() as u64)
}

/// Uniform sample from [0, 1), used to jitter flames and explosions
pub fn random_unit() -> f64 {
    let mut bytes = [0u8; 4];
    match getrandom::getrandom(&mut bytes) {
        Ok(()) => f64::from(u32::from_le_bytes(bytes)) / (f64::from(u32::MAX) + 1.0),
        Err(_) => 0.5,
    }
}
