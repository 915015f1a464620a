use super::board::{Board, Cascade, CascadeStep};
use super::levels::LevelConfig;
use super::settings::EngineSettings;
use super::types::{CellValue, GameEvent, Outcome, Selection};
use crate::games::session_rng::SessionRng;

/// Everything the presentation layer needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSnapshot {
    pub level_id: u32,
    pub target_score: u32,
    pub grid_size: usize,
    pub cells: Vec<CellValue>,
    pub score: u32,
    pub time_left: u32,
    pub outcome: Outcome,
    pub selection: Selection,
    pub final_score: Option<u32>,
}

pub struct CandyGameState {
    level: LevelConfig,
    settings: EngineSettings,
    board: Board,
    score: u32,
    time_left: u32,
    outcome: Outcome,
    selection: Selection,
    final_score: Option<u32>,
    moves_made: u32,
    pending_events: Vec<GameEvent>,
}

impl CandyGameState {
    pub fn new(level: LevelConfig, settings: EngineSettings, rng: &mut SessionRng) -> Self {
        let board = Board::generate(&level, &settings, rng);
        Self::with_board(level, settings, board)
    }

    pub fn with_board(level: LevelConfig, settings: EngineSettings, board: Board) -> Self {
        Self {
            level,
            settings,
            board,
            score: 0,
            time_left: level.starting_time_left(),
            outcome: Outcome::InProgress,
            selection: Selection::NoneSelected,
            final_score: None,
            moves_made: 0,
            pending_events: Vec::new(),
        }
    }

    /// Handles a tap on cell `index`. Returns `false` when the tap was
    /// ignored (session over or index off the board).
    pub fn tap(&mut self, index: usize, rng: &mut SessionRng) -> bool {
        if self.outcome.is_terminal() {
            return false;
        }

        let Some(value) = self.board.get(index) else {
            return false;
        };

        if value.is_bonus() {
            self.resolve_bonus(index, rng);
            return true;
        }

        match self.selection {
            Selection::NoneSelected => {
                self.set_selection(Selection::OneSelected(index));
            }
            Selection::OneSelected(first) => {
                if self.board.is_adjacent(first, index) {
                    self.swap(first, index, rng);
                }
                self.set_selection(Selection::NoneSelected);
            }
        }

        true
    }

    /// One second of the countdown. Returns the outcome when this tick ended
    /// the session.
    pub fn tick(&mut self) -> Option<Outcome> {
        if self.outcome.is_terminal() {
            return None;
        }

        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left > 0 {
            return None;
        }

        self.finish();
        Some(self.outcome)
    }

    fn swap(&mut self, first: usize, second: usize, rng: &mut SessionRng) {
        let outcome = self.board.attempt_swap(first, second, self.settings.swap_policy);
        if !outcome.swapped {
            return;
        }

        self.moves_made += 1;
        self.pending_events.push(GameEvent::Swapped {
            first,
            second,
            reverted: outcome.reverted,
        });

        if outcome.triggered_match {
            let cascade = self.board.cascade(self.settings.points_per_run, rng);
            self.apply_cascade(cascade);
        }
    }

    fn resolve_bonus(&mut self, index: usize, rng: &mut SessionRng) {
        let Some(clear) = self.board.resolve_bonus(index, self.settings.bonus_points) else {
            return;
        };

        self.score += clear.score_delta;
        self.pending_events.push(GameEvent::BonusResolved {
            index,
            bonus: clear.bonus,
            cleared: clear.cleared,
            score: clear.score_delta,
        });

        let cascade = self.board.cascade(self.settings.points_per_run, rng);
        self.apply_cascade(cascade);
    }

    fn apply_cascade(&mut self, cascade: Cascade) {
        self.score += cascade.score;

        for step in cascade.steps {
            let event = match step {
                CascadeStep::Cleared(scan) => GameEvent::MatchesCleared {
                    cleared: scan.cleared,
                    runs: scan.runs,
                    score: scan.score_delta,
                },
                CascadeStep::Refilled(refill) => GameEvent::Refilled {
                    fallen: refill.fallen,
                    spawned: refill.spawned,
                },
            };
            self.pending_events.push(event);
        }
    }

    fn set_selection(&mut self, selection: Selection) {
        if self.selection == selection {
            return;
        }
        self.selection = selection;
        self.pending_events.push(GameEvent::SelectionChanged { selection });
    }

    fn finish(&mut self) {
        self.outcome = if self.score >= self.level.target_score {
            Outcome::LevelComplete
        } else {
            Outcome::GameOver
        };
        self.selection = Selection::NoneSelected;

        // time_left is already 0 here, so the time bonus never adds anything
        let final_score = self.score + self.time_left * self.settings.time_bonus_per_second;
        self.final_score = Some(final_score);

        crate::log!(
            "Level {} ended: {:?} with score {} (target {})",
            self.level.id,
            self.outcome,
            final_score,
            self.level.target_score
        );

        self.pending_events.push(GameEvent::OutcomeChanged {
            outcome: self.outcome,
            final_score,
        });
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            level_id: self.level.id,
            target_score: self.level.target_score,
            grid_size: self.board.size(),
            cells: self.board.cells().to_vec(),
            score: self.score,
            time_left: self.time_left,
            outcome: self.outcome,
            selection: self.selection,
            final_score: self.final_score,
        }
    }

    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn final_score(&self) -> Option<u32> {
        self.final_score
    }

    pub fn moves_made(&self) -> u32 {
        self.moves_made
    }

    #[cfg(test)]
    pub(crate) fn set_score(&mut self, score: u32) {
        self.score = score;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::candy::board::tests::board_with;
    use crate::games::candy::levels::level_config;
    use crate::games::candy::types::SwapPolicy;

    fn create_state(overrides: &[(usize, CellValue)]) -> (CandyGameState, SessionRng) {
        let state = CandyGameState::with_board(
            level_config(1),
            EngineSettings::default(),
            board_with(overrides),
        );
        (state, SessionRng::new(42))
    }

    #[test]
    fn test_new_starts_in_progress() {
        let mut rng = SessionRng::new(42);
        let state = CandyGameState::new(level_config(1), EngineSettings::default(), &mut rng);
        assert_eq!(state.outcome(), Outcome::InProgress);
        assert_eq!(state.score(), 0);
        assert_eq!(state.time_left(), 60);
        assert_eq!(state.selection(), Selection::NoneSelected);
        assert_eq!(state.board().cells().len(), 64);
    }

    #[test]
    fn test_first_tap_selects() {
        let (mut state, mut rng) = create_state(&[]);

        assert!(state.tap(10, &mut rng));

        assert_eq!(state.selection(), Selection::OneSelected(10));
        assert_eq!(
            state.take_events(),
            vec![GameEvent::SelectionChanged {
                selection: Selection::OneSelected(10)
            }]
        );
    }

    #[test]
    fn test_adjacent_second_tap_swaps_and_clears_selection() {
        let (mut state, mut rng) = create_state(&[]);
        let before = state.board().cells().to_vec();

        state.tap(0, &mut rng);
        state.tap(1, &mut rng);

        assert_eq!(state.selection(), Selection::NoneSelected);
        assert_eq!(state.board().cells()[0], before[1]);
        assert_eq!(state.board().cells()[1], before[0]);
        assert_eq!(state.moves_made(), 1);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_non_adjacent_second_tap_only_clears_selection() {
        let (mut state, mut rng) = create_state(&[]);
        let before = state.board().clone();

        state.tap(0, &mut rng);
        state.tap(9, &mut rng);

        assert_eq!(state.selection(), Selection::NoneSelected);
        assert_eq!(state.board(), &before);
        assert_eq!(state.moves_made(), 0);
    }

    #[test]
    fn test_tapping_selected_cell_again_deselects() {
        let (mut state, mut rng) = create_state(&[]);
        state.tap(5, &mut rng);
        state.tap(5, &mut rng);
        assert_eq!(state.selection(), Selection::NoneSelected);
    }

    #[test]
    fn test_matching_swap_scores_and_settles() {
        let (mut state, mut rng) =
            create_state(&[(0, CellValue::Candy(4)), (1, CellValue::Candy(4))]);

        state.tap(2, &mut rng);
        state.tap(10, &mut rng);

        assert!(state.score() >= 30);
        assert_eq!(state.score() % 30, 0);
        assert_eq!(state.board().empty_count(), 0);
        assert!(!state.board().has_matches());

        let events = state.take_events();
        assert!(events.contains(&GameEvent::Swapped {
            first: 2,
            second: 10,
            reverted: false
        }));
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::MatchesCleared { cleared, runs: 1, score: 30 } if cleared == &vec![0, 1, 2]
        )));
    }

    #[test]
    fn test_revert_policy_restores_unmatched_swap() {
        let settings = EngineSettings {
            swap_policy: SwapPolicy::RevertUnmatched,
            ..Default::default()
        };
        let mut state = CandyGameState::with_board(level_config(1), settings, board_with(&[]));
        let mut rng = SessionRng::new(1);
        let before = state.board().clone();

        state.tap(0, &mut rng);
        state.tap(1, &mut rng);

        assert_eq!(state.board(), &before);
        assert!(state.take_events().contains(&GameEvent::Swapped {
            first: 0,
            second: 1,
            reverted: true
        }));
    }

    #[test]
    fn test_bonus_tap_resolves_without_touching_selection() {
        let (mut state, mut rng) = create_state(&[(27, CellValue::BonusRow)]);

        state.tap(3, &mut rng);
        state.take_events();
        assert!(state.tap(27, &mut rng));

        assert_eq!(state.selection(), Selection::OneSelected(3));
        assert!(state.score() >= 100);
        assert_eq!(state.board().empty_count(), 0);
        assert!(!state.board().has_matches());

        let events = state.take_events();
        assert!(matches!(
            events.first(),
            Some(GameEvent::BonusResolved { index: 27, bonus: CellValue::BonusRow, score: 100, .. })
        ));
        assert!(matches!(events.get(1), Some(GameEvent::Refilled { .. })));
    }

    #[test]
    fn test_bonus_tap_with_nothing_selected() {
        let (mut state, mut rng) = create_state(&[(13, CellValue::BonusColumn)]);

        state.tap(13, &mut rng);

        assert_eq!(state.selection(), Selection::NoneSelected);
        assert!(state.score() >= 100);
        assert!(!state.board().cells().contains(&CellValue::Empty));
    }

    #[test]
    fn test_out_of_range_tap_is_ignored() {
        let (mut state, mut rng) = create_state(&[]);
        assert!(!state.tap(64, &mut rng));
        assert_eq!(state.selection(), Selection::NoneSelected);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_countdown_reaching_zero_with_target_met_completes_level() {
        let (mut state, _) = create_state(&[]);
        state.set_score(100);

        for _ in 0..59 {
            assert_eq!(state.tick(), None);
        }
        assert_eq!(state.tick(), Some(Outcome::LevelComplete));

        assert_eq!(state.time_left(), 0);
        assert_eq!(state.outcome(), Outcome::LevelComplete);
        assert_eq!(state.final_score(), Some(100));
    }

    #[test]
    fn test_countdown_reaching_zero_below_target_is_game_over() {
        let (mut state, _) = create_state(&[]);
        state.set_score(99);

        for _ in 0..60 {
            state.tick();
        }

        assert_eq!(state.outcome(), Outcome::GameOver);
        assert_eq!(state.final_score(), Some(99));
        assert!(state.take_events().contains(&GameEvent::OutcomeChanged {
            outcome: Outcome::GameOver,
            final_score: 99
        }));
    }

    #[test]
    fn test_terminal_session_ignores_input_and_ticks() {
        let (mut state, mut rng) = create_state(&[(27, CellValue::BonusRow)]);
        for _ in 0..60 {
            state.tick();
        }
        let snapshot = state.snapshot();

        assert!(!state.tap(27, &mut rng));
        assert!(!state.tap(0, &mut rng));
        assert_eq!(state.tick(), None);

        assert_eq!(state.snapshot(), snapshot);
        assert_eq!(state.time_left(), 0);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let (mut state, mut rng) = create_state(&[]);
        state.tap(4, &mut rng);
        state.tick();

        let snapshot = state.snapshot();

        assert_eq!(snapshot.level_id, 1);
        assert_eq!(snapshot.target_score, 100);
        assert_eq!(snapshot.grid_size, 8);
        assert_eq!(snapshot.cells, state.board().cells());
        assert_eq!(snapshot.time_left, 59);
        assert_eq!(snapshot.selection, Selection::OneSelected(4));
        assert_eq!(snapshot.final_score, None);
    }
}
