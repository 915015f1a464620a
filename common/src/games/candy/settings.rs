use serde::{Deserialize, Serialize};

use super::levels::LEVEL_COUNT;
use super::types::{DEFAULT_GRID_SIZE, MIN_RUN_LENGTH, SwapPolicy};
use crate::config::Validate;

const MAX_GRID_SIZE: usize = 16;

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct EngineSettings {
    pub grid_size: usize,
    pub bonus_row_chance: f64,
    pub bonus_column_chance: f64,
    pub points_per_run: u32,
    pub bonus_points: u32,
    pub time_bonus_per_second: u32,
    pub swap_policy: SwapPolicy,
    pub level_count: u32,
}

impl Validate for EngineSettings {
    fn validate(&self) -> Result<(), String> {
        if self.grid_size < MIN_RUN_LENGTH || self.grid_size > MAX_GRID_SIZE {
            return Err(format!(
                "Grid size must be between {} and {}, got {}",
                MIN_RUN_LENGTH, MAX_GRID_SIZE, self.grid_size
            ));
        }
        for (name, chance) in [
            ("bonus_row_chance", self.bonus_row_chance),
            ("bonus_column_chance", self.bonus_column_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(format!("{} must be between 0 and 1, got {}", name, chance));
            }
        }
        if self.bonus_row_chance + self.bonus_column_chance >= 1.0 {
            return Err("Bonus chances must leave room for plain candies".to_string());
        }
        if self.points_per_run == 0 {
            return Err("Points per run must be positive".to_string());
        }
        if self.level_count == 0 {
            return Err("Level count must be positive".to_string());
        }
        Ok(())
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            bonus_row_chance: 0.03,
            bonus_column_chance: 0.03,
            points_per_run: 30,
            bonus_points: 100,
            time_bonus_per_second: 10,
            swap_policy: SwapPolicy::Free,
            level_count: LEVEL_COUNT,
        }
    }
}
