use super::game_state::{CandyGameState, GameSnapshot};
use super::levels::{LevelConfig, LevelTable, level_config};
use super::settings::EngineSettings;
use super::types::{GameEvent, Outcome};
use crate::config::Validate;
use crate::games::session_rng::SessionRng;
use crate::progress::{CURRENT_LEVEL_KEY, LAST_SCORE_KEY, ProgressStore};

/// One player's run through the level table: the current level's game state
/// plus the level lifecycle and persisted progress around it.
///
/// Store failures never interrupt play; they are logged and the session keeps
/// its in-memory state.
pub struct CandySession<S: ProgressStore> {
    settings: EngineSettings,
    levels: LevelTable,
    store: S,
    rng: SessionRng,
    state: CandyGameState,
}

impl<S: ProgressStore> CandySession<S> {
    /// Starts at the persisted `current_level`, or level 1 when there is none.
    pub fn resume(settings: EngineSettings, store: S, mut rng: SessionRng) -> Result<Self, String> {
        settings.validate()?;

        let levels = LevelTable::new(settings.level_count);
        let level = resume_level(&store, &levels);
        let state = CandyGameState::new(level, settings, &mut rng);

        crate::log!("Starting at level {} (seed {})", level.id, rng.seed());

        Ok(Self {
            settings,
            levels,
            store,
            rng,
            state,
        })
    }

    pub fn start_level(&mut self, id: u32) -> Result<(), String> {
        let level = *self
            .levels
            .get(id)
            .ok_or_else(|| format!("Unknown level {}, expected 1..={}", id, self.levels.len()))?;

        self.begin(level);
        self.persist(CURRENT_LEVEL_KEY, i64::from(level.id));
        Ok(())
    }

    pub fn retry_current_level(&mut self) {
        let level = *self.state.level();
        self.begin(level);
    }

    /// Moves on after a completed level. Returns the new level id.
    pub fn advance_to_next_level(&mut self) -> Result<u32, String> {
        if self.state.outcome() != Outcome::LevelComplete {
            return Err(format!("Level {} is not complete yet", self.state.level().id));
        }

        let current = self.state.level().id;
        let next = self
            .levels
            .next_id(current)
            .ok_or_else(|| format!("Level {} is the last level", current))?;

        self.start_level(next)?;
        Ok(next)
    }

    pub fn tap(&mut self, index: usize) -> bool {
        self.state.tap(index, &mut self.rng)
    }

    pub fn tick(&mut self) -> Option<Outcome> {
        let outcome = self.state.tick()?;
        let final_score = self.state.final_score().unwrap_or(self.state.score());
        self.persist(LAST_SCORE_KEY, i64::from(final_score));
        Some(outcome)
    }

    fn begin(&mut self, level: LevelConfig) {
        self.state = CandyGameState::new(level, self.settings, &mut self.rng);
        crate::log!(
            "Level {} started: target {}, {}s, {} candy types",
            level.id,
            level.target_score,
            level.starting_time_left(),
            level.candy_types
        );
    }

    fn persist(&self, key: &str, value: i64) {
        if let Err(e) = self.store.write_int(key, value) {
            crate::warn!("Failed to save {}: {}", key, e);
        }
    }

    /// The score saved by the last finished level, if it can be read.
    pub fn last_score(&self) -> Option<u32> {
        match self.store.read_int(LAST_SCORE_KEY) {
            Ok(value) => value.and_then(|v| u32::try_from(v).ok()),
            Err(e) => {
                crate::warn!("Failed to read {}: {}", LAST_SCORE_KEY, e);
                None
            }
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.state.snapshot()
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.state.take_events()
    }

    pub fn state(&self) -> &CandyGameState {
        &self.state
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    pub fn level_id(&self) -> u32 {
        self.state.level().id
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

fn resume_level<S: ProgressStore>(store: &S, levels: &LevelTable) -> LevelConfig {
    let fallback = levels.get(1).copied().unwrap_or_else(|| level_config(1));

    let stored = match store.read_int(CURRENT_LEVEL_KEY) {
        Ok(stored) => stored,
        Err(e) => {
            crate::warn!("Failed to read {}: {}; starting at level 1", CURRENT_LEVEL_KEY, e);
            return fallback;
        }
    };

    let Some(id) = stored else {
        return fallback;
    };

    match u32::try_from(id).ok().and_then(|id| levels.get(id)) {
        Some(level) => *level,
        None => {
            crate::warn!("Stored level {} does not exist; starting at level 1", id);
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{MemoryProgressStore, StoreError};

    struct BrokenStore;

    impl ProgressStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Io("disk unplugged".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Io("disk unplugged".to_string()))
        }
    }

    fn create_session(store: MemoryProgressStore) -> CandySession<MemoryProgressStore> {
        CandySession::resume(EngineSettings::default(), store, SessionRng::new(42)).unwrap()
    }

    fn run_out_clock<S: ProgressStore>(session: &mut CandySession<S>) -> Outcome {
        loop {
            if let Some(outcome) = session.tick() {
                return outcome;
            }
        }
    }

    fn complete_level<S: ProgressStore>(session: &mut CandySession<S>) {
        let target = session.state.level().target_score;
        session.state.set_score(target);
        assert_eq!(run_out_clock(session), Outcome::LevelComplete);
    }

    #[test]
    fn test_resume_without_progress_starts_level_one() {
        let session = create_session(MemoryProgressStore::in_memory());
        assert_eq!(session.level_id(), 1);
        assert_eq!(session.snapshot().outcome, Outcome::InProgress);
        assert_eq!(session.levels().len(), 100);
    }

    #[test]
    fn test_resume_uses_stored_level() {
        let store = MemoryProgressStore::in_memory();
        store.write_int(CURRENT_LEVEL_KEY, 5).unwrap();

        let session = create_session(store);

        assert_eq!(session.level_id(), 5);
        assert_eq!(session.snapshot().target_score, 140);
    }

    #[test]
    fn test_resume_ignores_unknown_or_garbled_level() {
        let store = MemoryProgressStore::in_memory();
        store.write_int(CURRENT_LEVEL_KEY, 500).unwrap();
        assert_eq!(create_session(store).level_id(), 1);

        let store = MemoryProgressStore::in_memory();
        store.set(CURRENT_LEVEL_KEY, "five").unwrap();
        assert_eq!(create_session(store).level_id(), 1);
    }

    #[test]
    fn test_broken_store_degrades_to_defaults() {
        let mut session =
            CandySession::resume(EngineSettings::default(), BrokenStore, SessionRng::new(1))
                .unwrap();
        assert_eq!(session.level_id(), 1);

        assert_eq!(run_out_clock(&mut session), Outcome::GameOver);
        assert_eq!(session.last_score(), None);
        assert!(session.start_level(3).is_ok());
        assert_eq!(session.level_id(), 3);
    }

    #[test]
    fn test_outcome_transition_saves_last_score() {
        let mut session = create_session(MemoryProgressStore::in_memory());
        session.state.set_score(70);

        assert_eq!(run_out_clock(&mut session), Outcome::GameOver);

        assert_eq!(session.last_score(), Some(70));
        assert_eq!(session.store().read_int(LAST_SCORE_KEY).unwrap(), Some(70));
    }

    #[test]
    fn test_start_level_persists_and_resets() {
        let mut session = create_session(MemoryProgressStore::in_memory());
        session.state.set_score(50);

        session.start_level(21).unwrap();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.level_id, 21);
        assert_eq!(snapshot.score, 0);
        assert!(snapshot
            .cells
            .iter()
            .filter_map(|cell| cell.candy_kind())
            .all(|kind| kind < 4));
        assert_eq!(session.store().read_int(CURRENT_LEVEL_KEY).unwrap(), Some(21));
    }

    #[test]
    fn test_start_unknown_level_is_rejected() {
        let mut session = create_session(MemoryProgressStore::in_memory());
        assert!(session.start_level(0).is_err());
        assert!(session.start_level(101).is_err());
        assert_eq!(session.level_id(), 1);
    }

    #[test]
    fn test_retry_restarts_same_level() {
        let mut session = create_session(MemoryProgressStore::in_memory());
        session.start_level(4).unwrap();
        run_out_clock(&mut session);

        session.retry_current_level();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.level_id, 4);
        assert_eq!(snapshot.outcome, Outcome::InProgress);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.time_left, level_config(4).starting_time_left());
    }

    #[test]
    fn test_advance_requires_completed_level() {
        let mut session = create_session(MemoryProgressStore::in_memory());
        assert!(session.advance_to_next_level().is_err());

        run_out_clock(&mut session);
        assert!(session.advance_to_next_level().is_err());
        assert_eq!(session.level_id(), 1);
    }

    #[test]
    fn test_advance_after_completion() {
        let mut session = create_session(MemoryProgressStore::in_memory());
        complete_level(&mut session);

        assert_eq!(session.advance_to_next_level(), Ok(2));

        assert_eq!(session.level_id(), 2);
        assert_eq!(session.snapshot().outcome, Outcome::InProgress);
        assert_eq!(session.store().read_int(CURRENT_LEVEL_KEY).unwrap(), Some(2));
        assert_eq!(session.store().read_int(LAST_SCORE_KEY).unwrap(), Some(100));
    }

    #[test]
    fn test_cannot_advance_past_last_level() {
        let mut session = create_session(MemoryProgressStore::in_memory());
        session.start_level(100).unwrap();
        complete_level(&mut session);

        assert!(session.advance_to_next_level().is_err());
        assert_eq!(session.level_id(), 100);
    }

    #[test]
    fn test_resume_rejects_invalid_settings() {
        let settings = EngineSettings {
            bonus_row_chance: f64::NAN,
            ..Default::default()
        };
        let result = CandySession::resume(
            settings,
            MemoryProgressStore::in_memory(),
            SessionRng::new(42),
        );
        assert!(result.is_err());

        let settings = EngineSettings {
            grid_size: 40,
            ..Default::default()
        };
        let result = CandySession::resume(
            settings,
            MemoryProgressStore::in_memory(),
            SessionRng::new(42),
        );
        assert!(matches!(result, Err(e) if e.contains("Grid size")));
    }

    #[test]
    fn test_same_seed_same_board() {
        let a = create_session(MemoryProgressStore::in_memory());
        let b = create_session(MemoryProgressStore::in_memory());
        assert_eq!(a.snapshot().cells, b.snapshot().cells);
        assert_eq!(a.seed(), 42);
    }
}
