mod board;
mod game_state;
mod levels;
mod session;
mod settings;
mod types;

pub use board::{Board, BonusClear, Cascade, CascadeStep, RefillResult, ScanResult, SwapOutcome};
pub use game_state::{CandyGameState, GameSnapshot};
pub use levels::{LEVEL_COUNT, LevelConfig, LevelTable, level_config};
pub use session::CandySession;
pub use settings::EngineSettings;
pub use types::{
    CellValue, DEFAULT_GRID_SIZE, GameEvent, MAX_CANDY_TYPES, MIN_CANDY_TYPES, MIN_RUN_LENGTH,
    Outcome, Position, Selection, SwapPolicy,
};
