//! Session module - one game, from first batch to game over
//!
//! [`GameSession`] owns the grid, shape library, spawner and score manager of a game and is the
//! only thing a presentation layer talks to. It is constructed once, becomes playable on
//! [`GameSession::mark_ready`], and reports everything that happened through a drained queue of
//! [`CoreEvent`]s.
//!
//! Lifecycle:
//!
//! ```text
//! Initializing --mark_ready--> Playing --(nothing fits, credit left)--> AwaitingRevive
//!                                 ^   \--(nothing fits, no credit)--> GameOver
//!                                 |                                      ^
//!                                 +------accept_revive--- AwaitingRevive -+--decline_revive
//! ```
//!
//! ```
//! use block_blast_core::GameSession;
//!
//! let mut session = GameSession::with_standard(7);
//! session.mark_ready().unwrap();
//! assert_eq!(session.batch_for_display().len(), 3);
//! ```

use std::mem;

use log::{debug, info};
use thiserror::Error;

use crate::config::GameConfig;
use crate::error::{ConfigError, SpawnError};
use crate::grid::Grid;
use crate::library::ShapeLibrary;
use crate::pacing::SessionPacing;
use crate::scoring::{ScoreManager, ScoreResult};
use crate::snapshot::GameSnapshot;
use crate::spawner::Spawner;
use crate::types::{CoreEvent, SessionStatus, ShapeId, SpawnerMode};

/// Why a placement request was rejected. The grid is untouched in every case.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlaceError {
    #[error("session is not accepting placements")]
    NotPlayable,
    #[error("slot holds no shape")]
    SlotEmpty,
    #[error("shape is not in the library")]
    UnknownShape,
    #[error("shape would extend past the grid")]
    OutOfBounds,
    #[error("shape overlaps an occupied cell")]
    Blocked,
}

impl PlaceError {
    /// Stable identifier for protocol use
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::NotPlayable => "not_playable",
            PlaceError::SlotEmpty | PlaceError::UnknownShape => "invalid_slot",
            PlaceError::OutOfBounds | PlaceError::Blocked => "invalid_place",
        }
    }
}

/// Session lifecycle violations
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("session is already running")]
    AlreadyReady,
    #[error("session is not playing (status {0:?})")]
    NotPlaying(SessionStatus),
    #[error("current batch still has {0} unplaced shapes")]
    BatchNotConsumed(usize),
    #[error("no revive is on offer")]
    NoReviveOffered,
    #[error(transparent)]
    Spawn(#[from] SpawnError),
}

/// Result of a successful placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceOutcome {
    pub shape: ShapeId,
    pub placed_cells: u32,
    pub cleared_cells: u32,
    pub lines: u32,
    pub score: ScoreResult,
    /// Every slot of the batch has now been placed
    pub batch_consumed: bool,
    /// Session status after the placement
    pub status: SessionStatus,
}

pub struct GameSession {
    config: GameConfig,
    library: ShapeLibrary,
    grid: Grid,
    spawner: Spawner,
    scores: ScoreManager,
    batch: Vec<Option<ShapeId>>,
    status: SessionStatus,
    revive_credits: u8,
    rounds: u32,
    lines_cleared: u32,
    events: Vec<CoreEvent>,
}

impl GameSession {
    /// Build a session. Configuration problems are fatal here and never later.
    pub fn new(config: GameConfig, library: ShapeLibrary, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        if library.is_empty() {
            return Err(ConfigError::EmptyLibrary);
        }
        if library.easy().is_empty() {
            return Err(ConfigError::EmptyEasyPool);
        }

        Ok(Self::assemble(config, library, seed))
    }

    /// Default configuration with the built-in shape set
    pub fn with_standard(seed: u64) -> Self {
        Self::assemble(GameConfig::default(), ShapeLibrary::standard(), seed)
    }

    /// Wire up the services. `config` and `library` are already known to be valid.
    fn assemble(config: GameConfig, library: ShapeLibrary, seed: u64) -> Self {
        let grid = Grid::new(config.grid.width as usize, config.grid.height as usize);
        let spawner = Spawner::new(config.spawner.clone(), seed);
        let scores = ScoreManager::new(config.scoring.clone());
        let revive_credits = config.revive.credits;

        Self {
            config,
            library,
            grid,
            spawner,
            scores,
            batch: Vec::new(),
            status: SessionStatus::Initializing,
            revive_credits,
            rounds: 0,
            lines_cleared: 0,
            events: Vec::new(),
        }
    }

    /// Second phase of initialization: the presentation is listening, spawn the first batch.
    pub fn mark_ready(&mut self) -> Result<(), SessionError> {
        if self.status != SessionStatus::Initializing {
            return Err(SessionError::AlreadyReady);
        }
        self.status = SessionStatus::Playing;
        self.events.push(CoreEvent::Ready);
        self.spawn_batch()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn library(&self) -> &ShapeLibrary {
        &self.library
    }

    pub fn score(&self) -> u64 {
        self.scores.score()
    }

    pub fn best_score(&self) -> u64 {
        self.scores.best_score()
    }

    pub fn multiplier(&self) -> u32 {
        self.scores.multiplier()
    }

    pub fn mode(&self) -> SpawnerMode {
        self.spawner.mode()
    }

    pub fn pacing(&self) -> &SessionPacing {
        self.spawner.pacing()
    }

    pub fn revive_credits(&self) -> u8 {
        self.revive_credits
    }

    /// Batches spawned this game
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    /// Slots of the current batch in display order; placed slots are `None`
    pub fn batch_for_display(&self) -> &[Option<ShapeId>] {
        &self.batch
    }

    /// Shapes of the current batch that are still waiting to be placed
    pub fn remaining_shapes(&self) -> impl Iterator<Item = (usize, ShapeId)> + '_ {
        self.batch
            .iter()
            .enumerate()
            .filter_map(|(slot, id)| id.map(|id| (slot, id)))
    }

    /// Take every event raised since the last drain
    pub fn drain_events(&mut self) -> Vec<CoreEvent> {
        mem::take(&mut self.events)
    }

    /// Place the first unplaced slot holding `shape` with its origin at (ox, oy).
    ///
    /// Returns false on any rejection.
    pub fn try_place(&mut self, shape: ShapeId, ox: i32, oy: i32) -> bool {
        let Some(slot) = self.batch.iter().position(|s| *s == Some(shape)) else {
            return false;
        };
        self.place_slot(slot, ox, oy).is_ok()
    }

    /// Place the shape in `slot` with its origin at (ox, oy).
    pub fn place_slot(&mut self, slot: usize, ox: i32, oy: i32) -> Result<PlaceOutcome, PlaceError> {
        if self.status != SessionStatus::Playing {
            return Err(PlaceError::NotPlayable);
        }
        let shape = self
            .batch
            .get(slot)
            .copied()
            .flatten()
            .ok_or(PlaceError::SlotEmpty)?;
        let def = self.library.get(shape).ok_or(PlaceError::UnknownShape)?;

        for (dx, dy) in def.matrix.cells() {
            let (x, y) = (ox + dx as i32, oy + dy as i32);
            if !self.grid.in_bounds(x, y) {
                return Err(PlaceError::OutOfBounds);
            }
            if self.grid.is_occupied(x, y) {
                return Err(PlaceError::Blocked);
            }
        }
        if !self.grid.place(&def.matrix, ox, oy, def.color) {
            return Err(PlaceError::Blocked);
        }

        for (dx, dy) in def.matrix.cells() {
            self.events.push(CoreEvent::CellOccupied {
                x: (ox + dx as i32) as u8,
                y: (oy + dy as i32) as u8,
                color: def.color,
            });
        }
        let placed_cells = def.matrix.cell_mass() as u32;
        self.batch[slot] = None;

        let clear = self.grid.clear_full_lines();
        let lines = clear.lines() as u32;
        let cleared_cells = clear.cleared_cells() as u32;
        if !clear.is_empty() {
            for &(x, y) in &clear.cells {
                self.events.push(CoreEvent::CellCleared {
                    x: x as u8,
                    y: y as u8,
                });
            }
            self.events.push(CoreEvent::LinesCleared {
                cleared_cells,
                lines,
            });
            self.lines_cleared = self.lines_cleared.saturating_add(lines);
            self.spawner.on_lines_cleared(lines);
            debug!("cleared {lines} lines ({cleared_cells} cells)");
        }

        let score = self
            .scores
            .register_placement(placed_cells, cleared_cells, lines);
        self.events.push(CoreEvent::ScoreChanged {
            score: self.scores.score(),
            multiplier: self.scores.multiplier(),
        });

        let batch_consumed = self.batch.iter().all(Option::is_none);
        if !batch_consumed {
            self.check_game_over();
        }

        Ok(PlaceOutcome {
            shape,
            placed_cells,
            cleared_cells,
            lines,
            score,
            batch_consumed,
            status: self.status,
        })
    }

    /// Spawn the next batch once every slot of the current one has been placed.
    pub fn request_next_batch(&mut self) -> Result<(), SessionError> {
        if self.status != SessionStatus::Playing {
            return Err(SessionError::NotPlaying(self.status));
        }
        let remaining = self.batch.iter().flatten().count();
        if remaining > 0 {
            return Err(SessionError::BatchNotConsumed(remaining));
        }
        self.spawn_batch()
    }

    /// Spend a revive credit: clear the grid, extend warm-up and deal a fresh batch.
    pub fn accept_revive(&mut self) -> Result<(), SessionError> {
        if self.status != SessionStatus::AwaitingRevive {
            return Err(SessionError::NoReviveOffered);
        }
        self.revive_credits = self.revive_credits.saturating_sub(1);
        self.clear_grid();
        self.spawner.on_revive(self.config.revive.bonus_moves);
        self.status = SessionStatus::Playing;
        info!(
            "revive accepted, {} credits left, warm-up target {}",
            self.revive_credits,
            self.spawner.pacing().target_warmup_moves()
        );
        self.spawn_batch()
    }

    pub fn decline_revive(&mut self) -> Result<(), SessionError> {
        if self.status != SessionStatus::AwaitingRevive {
            return Err(SessionError::NoReviveOffered);
        }
        self.end_game();
        Ok(())
    }

    /// Reset for another game. The best score survives; call [`mark_ready`](Self::mark_ready)
    /// again to deal the first batch.
    pub fn new_game(&mut self) {
        self.clear_grid();
        self.scores.reset();
        self.spawner.reset();
        self.batch.clear();
        self.revive_credits = self.config.revive.credits;
        self.rounds = 0;
        self.lines_cleared = 0;
        self.status = SessionStatus::Initializing;
        debug!("new game, best score {}", self.scores.best_score());
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let pacing = self.spawner.pacing();
        GameSnapshot {
            grid: self.grid.to_tag_rows(),
            batch: self.batch.clone(),
            status: self.status,
            mode: self.spawner.mode(),
            score: self.scores.score(),
            best_score: self.scores.best_score(),
            multiplier: self.scores.multiplier(),
            rounds: self.rounds,
            lines_cleared: self.lines_cleared,
            moves_played: pacing.moves_played(),
            warmup_target: pacing.target_warmup_moves(),
            dynamic_threshold: pacing.dynamic_threshold(),
            revive_credits: self.revive_credits,
        }
    }

    fn spawn_batch(&mut self) -> Result<(), SessionError> {
        let batch = self.spawner.next_batch(&self.grid, &self.library)?;
        self.batch = batch.shapes.into_iter().map(Some).collect();
        self.rounds = self.rounds.saturating_add(1);
        self.events.push(CoreEvent::BatchSpawned {
            mode: batch.mode,
            rescue: batch.rescue,
        });
        self.check_game_over();
        Ok(())
    }

    /// Ends or suspends the game when no unplaced shape fits anywhere
    fn check_game_over(&mut self) {
        let mut remaining = self.batch.iter().flatten().peekable();
        if remaining.peek().is_none() {
            return;
        }
        let any_fits = remaining.any(|&id| {
            self.library
                .matrix(id)
                .is_some_and(|m| self.grid.can_fit_anywhere(m))
        });
        if any_fits {
            return;
        }

        if self.revive_credits > 0 {
            info!("no move left, offering revive ({} credits)", self.revive_credits);
            self.status = SessionStatus::AwaitingRevive;
            self.events.push(CoreEvent::ReviveOffered);
        } else {
            self.end_game();
        }
    }

    fn end_game(&mut self) {
        info!(
            "game over: score {} after {} rounds",
            self.scores.score(),
            self.rounds
        );
        self.status = SessionStatus::GameOver;
        self.events.push(CoreEvent::GameOver);
    }

    fn clear_grid(&mut self) {
        for y in 0..self.grid.height() {
            for x in 0..self.grid.width() {
                if self.grid.occupied_at(x, y) {
                    self.events.push(CoreEvent::CellCleared {
                        x: x as u8,
                        y: y as u8,
                    });
                }
            }
        }
        self.grid.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColorTag;

    fn ready_session(seed: u64) -> GameSession {
        let mut session = GameSession::with_standard(seed);
        session.mark_ready().unwrap();
        session
    }

    fn fill_grid(session: &mut GameSession, rows: &[&str]) {
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    session.grid.set(x as i32, y as i32, Some(ColorTag(1)));
                }
            }
        }
    }

    #[test]
    fn test_two_phase_init() {
        let mut session = GameSession::with_standard(1);
        assert_eq!(session.status(), SessionStatus::Initializing);
        assert!(session.batch_for_display().is_empty());
        assert_eq!(session.place_slot(0, 0, 0), Err(PlaceError::NotPlayable));

        session.mark_ready().unwrap();
        assert_eq!(session.status(), SessionStatus::Playing);
        assert_eq!(session.rounds(), 1);
        let events = session.drain_events();
        assert_eq!(events[0], CoreEvent::Ready);
        assert!(matches!(events[1], CoreEvent::BatchSpawned { .. }));
        assert!(session.drain_events().is_empty());

        assert_eq!(session.mark_ready(), Err(SessionError::AlreadyReady));
    }

    #[test]
    fn test_with_standard_matches_new() {
        let mut a = GameSession::with_standard(21);
        let mut b = GameSession::new(GameConfig::default(), ShapeLibrary::standard(), 21).unwrap();
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.library().len(), b.library().len());

        a.mark_ready().unwrap();
        b.mark_ready().unwrap();
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.drain_events(), b.drain_events());
    }

    #[test]
    fn test_rejections_leave_grid_untouched() {
        let mut session = ready_session(3);
        session.drain_events();

        assert_eq!(session.place_slot(9, 0, 0), Err(PlaceError::SlotEmpty));
        assert_eq!(session.place_slot(0, -1, 0), Err(PlaceError::OutOfBounds));
        assert_eq!(session.place_slot(0, 0, 8), Err(PlaceError::OutOfBounds));
        assert!(!session.try_place(ShapeId(u16::MAX), 0, 0));

        assert!(session.grid().is_empty());
        assert!(session.drain_events().is_empty());
        assert_eq!(PlaceError::Blocked.code(), "invalid_place");
    }

    #[test]
    fn test_place_emits_events_and_consumes_slot() {
        let mut session = ready_session(11);
        let id = session.library().find("square2").unwrap();
        let dot = session.library().find("dot").unwrap();
        session.batch = vec![Some(id), Some(dot), None];
        session.drain_events();
        let mass = 4;

        let outcome = session.place_slot(0, 0, 0).unwrap();
        assert_eq!(outcome.shape, id);
        assert_eq!(outcome.placed_cells as usize, mass);
        assert_eq!(session.batch_for_display()[0], None);
        assert_eq!(session.grid().occupied_count(), mass);
        assert_eq!(session.score(), mass as u64);

        let events = session.drain_events();
        let occupied = events
            .iter()
            .filter(|e| matches!(e, CoreEvent::CellOccupied { .. }))
            .count();
        assert_eq!(occupied, mass);
        assert!(matches!(events.last(), Some(CoreEvent::ScoreChanged { .. })));

        assert_eq!(session.place_slot(0, 4, 4), Err(PlaceError::SlotEmpty));
        assert_eq!(session.place_slot(1, 1, 1), Err(PlaceError::Blocked));
        assert!(session.try_place(dot, 2, 2));
    }

    #[test]
    fn test_next_batch_requires_consumed_batch() {
        let mut session = ready_session(5);
        assert!(matches!(
            session.request_next_batch(),
            Err(SessionError::BatchNotConsumed(3))
        ));

        session.batch = vec![None, None, None];
        session.request_next_batch().unwrap();
        assert_eq!(session.rounds(), 2);
        assert_eq!(session.remaining_shapes().count(), 3);
    }

    #[test]
    fn test_line_clear_scores_and_extends_warmup() {
        let mut session = ready_session(8);
        fill_grid(&mut session, &["#######."]);
        let dot = session.library().find("dot").unwrap();
        session.batch = vec![Some(dot), None, None];
        let target = session.pacing().target_warmup_moves();
        session.drain_events();

        let outcome = session.place_slot(0, 7, 0).unwrap();
        assert_eq!(outcome.lines, 1);
        assert_eq!(outcome.cleared_cells, 8);
        assert_eq!(outcome.score.total, 1 + 80);
        assert!(outcome.batch_consumed);
        assert!(session.grid().is_empty());
        assert_eq!(session.multiplier(), 2);
        assert_eq!(session.lines_cleared(), 1);
        assert_eq!(session.pacing().target_warmup_moves(), target + 2);

        let events = session.drain_events();
        let cleared = events
            .iter()
            .filter(|e| matches!(e, CoreEvent::CellCleared { .. }))
            .count();
        assert_eq!(cleared, 8);
        assert!(events.contains(&CoreEvent::LinesCleared {
            cleared_cells: 8,
            lines: 1
        }));
    }

    #[test]
    fn test_revive_then_game_over() {
        let mut session = ready_session(21);
        // Checkerboard: no shape of mass > 1 fits, and the dot is not offered.
        let rows: Vec<String> = (0..8)
            .map(|y| (0..8).map(|x| if (x + y) % 2 == 0 { '#' } else { '.' }).collect())
            .collect();
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        fill_grid(&mut session, &rows);
        let square = session.library().find("square2").unwrap();
        let line = session.library().find("line3").unwrap();
        session.batch = vec![Some(square), Some(line), None];
        session.drain_events();

        session.check_game_over();
        assert_eq!(session.status(), SessionStatus::AwaitingRevive);
        assert_eq!(session.drain_events(), vec![CoreEvent::ReviveOffered]);
        assert_eq!(session.place_slot(0, 1, 0), Err(PlaceError::NotPlayable));

        let moves = session.pacing().moves_played();
        session.accept_revive().unwrap();
        assert_eq!(session.status(), SessionStatus::Playing);
        assert_eq!(session.revive_credits(), 0);
        assert_eq!(session.pacing().target_warmup_moves(), moves + 20);
        assert!(session.grid().is_empty());
        assert_eq!(session.accept_revive(), Err(SessionError::NoReviveOffered));

        let rows: Vec<String> = (0..8)
            .map(|y| (0..8).map(|x| if (x + y) % 2 == 0 { '#' } else { '.' }).collect())
            .collect();
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        fill_grid(&mut session, &rows);
        session.batch = vec![Some(square), None, None];
        session.check_game_over();
        assert_eq!(session.status(), SessionStatus::GameOver);
        assert!(session.drain_events().contains(&CoreEvent::GameOver));
    }

    #[test]
    fn test_decline_revive_ends_game() {
        let mut session = ready_session(2);
        session.status = SessionStatus::AwaitingRevive;
        session.decline_revive().unwrap();
        assert_eq!(session.status(), SessionStatus::GameOver);
        assert_eq!(session.revive_credits(), 1);
        assert_eq!(session.decline_revive(), Err(SessionError::NoReviveOffered));
    }

    #[test]
    fn test_new_game_keeps_best_score() {
        let mut session = ready_session(4);
        session.place_slot(0, 0, 0).unwrap();
        let best = session.best_score();
        assert!(best > 0);

        session.new_game();
        assert_eq!(session.status(), SessionStatus::Initializing);
        assert_eq!(session.score(), 0);
        assert_eq!(session.best_score(), best);
        assert!(session.grid().is_empty());
        assert_eq!(session.mode(), SpawnerMode::None);
        session.mark_ready().unwrap();
        assert_eq!(session.rounds(), 1);
    }

    #[test]
    fn test_snapshot_matches_session() {
        let mut session = ready_session(6);
        session.place_slot(0, 0, 0).unwrap();
        let snap = session.snapshot();
        assert_eq!(snap.width(), 8);
        assert_eq!(snap.height(), 8);
        assert_eq!(snap.occupied_count(), session.grid().occupied_count());
        assert_eq!(snap.score, session.score());
        assert_eq!(snap.batch, session.batch_for_display());
        assert_eq!(snap.status, SessionStatus::Playing);
    }

    #[test]
    fn test_construction_rejects_bad_config() {
        let mut config = GameConfig::default();
        config.spawner.slot_count = 0;
        assert!(matches!(
            GameSession::new(config, ShapeLibrary::standard(), 1),
            Err(ConfigError::NoSlots)
        ));
    }
}
