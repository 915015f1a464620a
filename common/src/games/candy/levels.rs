use serde::{Deserialize, Serialize};

use super::types::{MAX_CANDY_TYPES, MIN_CANDY_TYPES};

pub const LEVEL_COUNT: u32 = 100;

const BASE_DURATION_SECS: f64 = 60.0;
const DURATION_STEP_SECS: f64 = 0.3;
const MIN_DURATION_SECS: f64 = 20.0;
const BASE_TARGET_SCORE: u32 = 100;
const TARGET_SCORE_STEP: u32 = 10;
const LEVELS_PER_EXTRA_CANDY: u32 = 20;

#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct LevelConfig {
    pub id: u32,
    pub duration: f64,
    pub target_score: u32,
    pub candy_types: u8,
}

impl LevelConfig {
    /// Whole seconds on the countdown when the level starts.
    pub fn starting_time_left(&self) -> u32 {
        self.duration.ceil() as u32
    }
}

/// Difficulty curve for level `id` (1-based). Level 1 is the easiest.
pub fn level_config(id: u32) -> LevelConfig {
    let step = id.saturating_sub(1);

    let duration = (BASE_DURATION_SECS - step as f64 * DURATION_STEP_SECS).max(MIN_DURATION_SECS);
    let target_score = BASE_TARGET_SCORE + step * TARGET_SCORE_STEP;
    let extra_candies = (step / LEVELS_PER_EXTRA_CANDY).min((MAX_CANDY_TYPES - MIN_CANDY_TYPES) as u32);
    let candy_types = MIN_CANDY_TYPES + extra_candies as u8;

    LevelConfig {
        id,
        duration,
        target_score,
        candy_types,
    }
}

/// The ordered, immutable table of levels, built once at startup.
#[derive(Clone, Debug)]
pub struct LevelTable {
    levels: Vec<LevelConfig>,
}

impl LevelTable {
    pub fn new(count: u32) -> Self {
        Self {
            levels: (1..=count).map(level_config).collect(),
        }
    }

    pub fn get(&self, id: u32) -> Option<&LevelConfig> {
        if id == 0 {
            return None;
        }
        self.levels.get(id as usize - 1)
    }

    pub fn next_id(&self, id: u32) -> Option<u32> {
        self.get(id + 1).map(|level| level.id)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelConfig> {
        self.levels.iter()
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::new(LEVEL_COUNT)
    }
}
