use std::collections::BTreeSet;

use super::levels::LevelConfig;
use super::settings::EngineSettings;
use super::types::{
    CellValue, MAX_CANDY_TYPES, MIN_CANDY_TYPES, MIN_RUN_LENGTH, Position, SwapPolicy,
};
use crate::games::session_rng::SessionRng;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct SwapOutcome {
    pub swapped: bool,
    pub triggered_match: bool,
    pub reverted: bool,
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ScanResult {
    /// Sorted, each index at most once.
    pub cleared: Vec<usize>,
    pub runs: u32,
    pub score_delta: u32,
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct RefillResult {
    /// `(from, to)` for every cell that fell.
    pub fallen: Vec<(usize, usize)>,
    pub spawned: Vec<usize>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BonusClear {
    pub bonus: CellValue,
    pub cleared: Vec<usize>,
    pub score_delta: u32,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum CascadeStep {
    Cleared(ScanResult),
    Refilled(RefillResult),
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Cascade {
    pub steps: Vec<CascadeStep>,
    pub runs: u32,
    pub score: u32,
}

impl Cascade {
    pub fn match_passes(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step, CascadeStep::Cleared(_)))
            .count()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: Vec<CellValue>,
    size: usize,
    candy_types: u8,
}

impl Board {
    /// Fresh random board. A kind count outside the playable range is clamped
    /// into it; fewer than three kinds never settles into a quiet board.
    pub fn generate(level: &LevelConfig, settings: &EngineSettings, rng: &mut SessionRng) -> Self {
        let size = settings.grid_size;
        let mut board = Self {
            cells: Vec::with_capacity(size * size),
            size,
            candy_types: level.candy_types.clamp(MIN_CANDY_TYPES, MAX_CANDY_TYPES),
        };

        for _ in 0..size * size {
            let value = if rng.chance(settings.bonus_row_chance) {
                CellValue::BonusRow
            } else if rng.chance(settings.bonus_column_chance) {
                CellValue::BonusColumn
            } else {
                board.random_candy(rng)
            };
            board.cells.push(value);
        }

        board
    }

    /// Builds a board from explicit cells, e.g. a restored snapshot or a
    /// hand-made test position.
    pub fn from_cells(size: usize, candy_types: u8, cells: Vec<CellValue>) -> Result<Self, String> {
        if size < MIN_RUN_LENGTH {
            return Err(format!("Board size must be at least {}, got {}", MIN_RUN_LENGTH, size));
        }
        if cells.len() != size * size {
            return Err(format!(
                "Expected {} cells for a {}x{} board, got {}",
                size * size,
                size,
                size,
                cells.len()
            ));
        }
        if !(MIN_CANDY_TYPES..=MAX_CANDY_TYPES).contains(&candy_types) {
            return Err(format!(
                "Candy type count must be between {} and {}, got {}",
                MIN_CANDY_TYPES, MAX_CANDY_TYPES, candy_types
            ));
        }
        if let Some(kind) = cells
            .iter()
            .filter_map(|cell| cell.candy_kind())
            .find(|&kind| kind >= candy_types)
        {
            return Err(format!(
                "Candy kind {} is out of range for {} candy types",
                kind, candy_types
            ));
        }

        Ok(Self {
            cells,
            size,
            candy_types,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn candy_types(&self) -> u8 {
        self.candy_types
    }

    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<CellValue> {
        self.cells.get(index).copied()
    }

    pub fn get_at(&self, pos: Position) -> Option<CellValue> {
        if pos.row >= self.size || pos.col >= self.size {
            return None;
        }
        self.get(pos.to_index(self.size))
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.cells.len()
    }

    pub fn is_adjacent(&self, a: usize, b: usize) -> bool {
        if !self.contains(a) || !self.contains(b) {
            return false;
        }
        Position::from_index(a, self.size).is_adjacent(Position::from_index(b, self.size))
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_empty()).count()
    }

    /// Exchanges two edge-adjacent cells. Anything else leaves the board
    /// untouched.
    pub fn attempt_swap(&mut self, a: usize, b: usize, policy: SwapPolicy) -> SwapOutcome {
        if !self.is_adjacent(a, b) {
            return SwapOutcome::default();
        }

        self.cells.swap(a, b);
        let triggered_match = self.has_matches();

        let reverted = !triggered_match && policy == SwapPolicy::RevertUnmatched;
        if reverted {
            self.cells.swap(a, b);
        }

        SwapOutcome {
            swapped: true,
            triggered_match,
            reverted,
        }
    }

    pub fn has_matches(&self) -> bool {
        !self.find_runs().is_empty()
    }

    /// Maximal horizontal and vertical runs of at least three equal plain
    /// candies. A cell can belong to one horizontal and one vertical run.
    pub fn find_runs(&self) -> Vec<Vec<usize>> {
        let mut runs = Vec::new();

        for row in 0..self.size {
            let line: Vec<usize> = (0..self.size).map(|col| row * self.size + col).collect();
            self.collect_line_runs(&line, &mut runs);
        }
        for col in 0..self.size {
            let line: Vec<usize> = (0..self.size).map(|row| row * self.size + col).collect();
            self.collect_line_runs(&line, &mut runs);
        }

        runs
    }

    fn collect_line_runs(&self, line: &[usize], runs: &mut Vec<Vec<usize>>) {
        let mut start = 0;
        while start < line.len() {
            let head = self.cells[line[start]];
            let mut end = start + 1;
            while end < line.len() && head.matches(self.cells[line[end]]) {
                end += 1;
            }
            if end - start >= MIN_RUN_LENGTH {
                runs.push(line[start..end].to_vec());
            }
            start = end;
        }
    }

    /// Clears every matched cell once and scores each run once, whatever its
    /// length.
    pub fn scan_matches(&mut self, points_per_run: u32) -> ScanResult {
        let runs = self.find_runs();
        if runs.is_empty() {
            return ScanResult::default();
        }

        let cleared: BTreeSet<usize> = runs.iter().flatten().copied().collect();
        for &index in &cleared {
            self.cells[index] = CellValue::Empty;
        }

        let run_count = runs.len() as u32;
        ScanResult {
            cleared: cleared.into_iter().collect(),
            runs: run_count,
            score_delta: run_count * points_per_run,
        }
    }

    /// Per column, lets every non-empty cell fall to the bottom in order and
    /// fills the gap above with fresh plain candies.
    pub fn refill(&mut self, rng: &mut SessionRng) -> RefillResult {
        let mut result = RefillResult::default();

        for col in 0..self.size {
            let mut write_row = self.size;

            for row in (0..self.size).rev() {
                let index = row * self.size + col;
                let value = self.cells[index];
                if value.is_empty() {
                    continue;
                }
                write_row -= 1;
                if write_row != row {
                    let target = write_row * self.size + col;
                    self.cells[target] = value;
                    self.cells[index] = CellValue::Empty;
                    result.fallen.push((index, target));
                }
            }

            for row in 0..write_row {
                let index = row * self.size + col;
                self.cells[index] = self.random_candy(rng);
                result.spawned.push(index);
            }
        }

        result
    }

    /// Refills any holes, then scans and refills until a scan clears nothing.
    pub fn cascade(&mut self, points_per_run: u32, rng: &mut SessionRng) -> Cascade {
        let mut cascade = Cascade::default();

        if self.empty_count() > 0 {
            cascade.steps.push(CascadeStep::Refilled(self.refill(rng)));
        }

        loop {
            let scan = self.scan_matches(points_per_run);
            if scan.cleared.is_empty() {
                break;
            }
            cascade.runs += scan.runs;
            cascade.score += scan.score_delta;
            cascade.steps.push(CascadeStep::Cleared(scan));
            cascade.steps.push(CascadeStep::Refilled(self.refill(rng)));
        }

        cascade
    }

    /// Empties the row or column of the bonus marker at `index`. Other bonus
    /// markers in that line are consumed without firing.
    pub fn resolve_bonus(&mut self, index: usize, bonus_points: u32) -> Option<BonusClear> {
        let bonus = self.get(index)?;
        let pos = Position::from_index(index, self.size);

        let cleared: Vec<usize> = match bonus {
            CellValue::BonusRow => (0..self.size).map(|col| pos.row * self.size + col).collect(),
            CellValue::BonusColumn => (0..self.size).map(|row| row * self.size + pos.col).collect(),
            _ => return None,
        };

        for &i in &cleared {
            self.cells[i] = CellValue::Empty;
        }

        Some(BonusClear {
            bonus,
            cleared,
            score_delta: bonus_points,
        })
    }

    fn random_candy(&self, rng: &mut SessionRng) -> CellValue {
        CellValue::Candy(rng.random_range(0..self.candy_types))
    }
}
