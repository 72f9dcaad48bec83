use crate::geometry::{self, Point};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const DEFAULT_STARTING_FUEL: f64 = 200.0;
const DEFAULT_BONUS_TIME_LIMIT: f64 = 60.0;
const SPAWN_ALTITUDE: f64 = 50.0;

/// One entry of `maps.json`
///
/// ```json
/// "LEVEL1": {
///   "PATH": [{ "x": 0, "y": 400 }, { "x": 700, "y": 420 }],
///   "LANDER": { "STARTING_POS": { "X": 100, "Y": 50 }, "STARTING_FUEL": 150 },
///   "BONUS_TIME_LIMIT": 40
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Level {
    #[serde(rename = "PATH")]
    pub path: Vec<Point>,
    #[serde(rename = "LANDER")]
    pub lander: LanderStart,
    #[serde(rename = "BONUS_TIME_LIMIT", default)]
    pub bonus_time_limit: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LanderStart {
    #[serde(rename = "STARTING_POS")]
    pub starting_pos: StartingPos,
    #[serde(rename = "STARTING_FUEL")]
    pub starting_fuel: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct StartingPos {
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
}

impl Level {
    /// Level drawn in the editor. Points are ordered by x and duplicate x
    /// values dropped so terrain lookups stay well defined.
    pub fn from_path(mut path: Vec<Point>) -> Self {
        path.sort_by(|a, b| a.x.total_cmp(&b.x));
        path.dedup_by(|a, b| a.x == b.x);
        let spawn_x = match (path.first(), path.last()) {
            (Some(first), Some(last)) => geometry::median(*first, *last).x,
            _ => 0.0,
        };
        Level {
            path,
            lander: LanderStart {
                starting_pos: StartingPos {
                    x: spawn_x,
                    y: SPAWN_ALTITUDE,
                },
                starting_fuel: DEFAULT_STARTING_FUEL,
            },
            bonus_time_limit: DEFAULT_BONUS_TIME_LIMIT,
        }
    }
}

/// All known levels, keyed by name
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Maps {
    levels: BTreeMap<String, Level>,
}

impl Maps {
    pub fn get(&self, name: &str) -> Option<&Level> {
        self.levels.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.levels.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, level: Level) {
        self.levels.insert(name.into(), level);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.levels.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Campaign levels are named `LEVEL1`, `LEVEL2`, ...
pub fn level_name(number: u32) -> String {
    format!("LEVEL{}", number)
}

/// First run of digits in a level name, `TUTORIAL0` -> 0
pub fn level_number(name: &str) -> Option<u32> {
    let digits: String = name
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Names accepted by the editor export: capital letters and digits only
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}
