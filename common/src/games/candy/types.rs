use serde::{Deserialize, Serialize};

pub const DEFAULT_GRID_SIZE: usize = 8;
pub const MIN_RUN_LENGTH: usize = 3;
pub const MIN_CANDY_TYPES: u8 = 3;
pub const MAX_CANDY_TYPES: u8 = 5;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum CellValue {
    /// Transient hole between clearing and refill.
    Empty,
    Candy(u8),
    BonusRow,
    BonusColumn,
}

impl CellValue {
    pub fn candy_kind(self) -> Option<u8> {
        match self {
            CellValue::Candy(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn is_empty(self) -> bool {
        self == CellValue::Empty
    }

    pub fn is_bonus(self) -> bool {
        matches!(self, CellValue::BonusRow | CellValue::BonusColumn)
    }

    /// Only two plain candies of the same kind match; holes and bonus
    /// markers never do.
    pub fn matches(self, other: CellValue) -> bool {
        match (self, other) {
            (CellValue::Candy(a), CellValue::Candy(b)) => a == b,
            _ => false,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn to_index(self, size: usize) -> usize {
        self.row * size + self.col
    }

    pub fn from_index(index: usize, size: usize) -> Self {
        Self {
            row: index / size,
            col: index % size,
        }
    }

    /// Edge adjacency (4-connectivity).
    pub fn is_adjacent(self, other: Position) -> bool {
        let row_distance = self.row.abs_diff(other.row);
        let col_distance = self.col.abs_diff(other.col);
        row_distance + col_distance == 1
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Selection {
    #[default]
    NoneSelected,
    OneSelected(usize),
}

impl Selection {
    pub fn selected_index(self) -> Option<usize> {
        match self {
            Selection::NoneSelected => None,
            Selection::OneSelected(index) => Some(index),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Outcome {
    InProgress,
    LevelComplete,
    GameOver,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        self != Outcome::InProgress
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapPolicy {
    /// The exchange stays even when nothing matches.
    #[default]
    Free,
    /// The exchange is undone when nothing matches.
    RevertUnmatched,
}

/// What a single engine operation did, in order. Drained by the presentation
/// layer to drive animation; the engine itself keeps no visual state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    SelectionChanged {
        selection: Selection,
    },
    Swapped {
        first: usize,
        second: usize,
        reverted: bool,
    },
    MatchesCleared {
        cleared: Vec<usize>,
        runs: u32,
        score: u32,
    },
    BonusResolved {
        index: usize,
        bonus: CellValue,
        cleared: Vec<usize>,
        score: u32,
    },
    Refilled {
        fallen: Vec<(usize, usize)>,
        spawned: Vec<usize>,
    },
    OutcomeChanged {
        outcome: Outcome,
        final_score: u32,
    },
}
