//! Game tuning. Every section defaults to the values the game ships with, and
//! `config.json` may override any subset of them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub app: AppConfig,
    pub physics: Physics,
    pub controls: Controls,
    pub landing: LandingRequirements,
    pub scores: Scores,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub width: f64,
    pub height: f64,
    /// Follow the browser window size instead of the fixed width/height
    pub fit_screen: bool,
    pub audio_folder: String,
    pub muted: bool,
    /// Outlines the lander's bounding box
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            title: "Moon Lander".to_string(),
            width: 700.0,
            height: 500.0,
            fit_screen: false,
            audio_folder: "res/sounds/".to_string(),
            muted: false,
            debug: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Physics {
    /// Pixels per meter
    pub meter: f64,
    /// Downward acceleration in pixels per second squared
    pub gravitation: f64,
}

impl Default for Physics {
    fn default() -> Self {
        Physics {
            meter: 4.0,
            gravitation: 6.5,
        }
    }
}

/// Key bindings, compared against the upper-cased `KeyboardEvent.key`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Controls {
    pub thrust_increase: String,
    pub thrust_decrease: String,
    pub rotate_left: String,
    pub rotate_right: String,
    pub undo: String,
}

impl Default for Controls {
    fn default() -> Self {
        Controls {
            thrust_increase: "W".to_string(),
            thrust_decrease: "S".to_string(),
            rotate_left: "A".to_string(),
            rotate_right: "D".to_string(),
            undo: "R".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LandingRequirements {
    /// Radians
    pub angle: f64,
    pub vertical_speed: f64,
    pub horizontal_speed: f64,
    pub ground_gradient: f64,
}

impl Default for LandingRequirements {
    fn default() -> Self {
        LandingRequirements {
            angle: 0.8,
            vertical_speed: 11.0,
            horizontal_speed: 4.0,
            ground_gradient: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Scores {
    pub fuel_worth: f64,
    pub bonus_time_worth: f64,
}

impl Default for Scores {
    fn default() -> Self {
        Scores {
            fuel_worth: 3.0,
            bonus_time_worth: 1.0,
        }
    }
}
