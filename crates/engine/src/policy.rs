//! Placement policies for autoplay

use block_blast_core::{GameSession, ShapeFinder, SpawnRng};

/// One placement: which batch slot goes where
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub slot: usize,
    pub x: i32,
    pub y: i32,
}

/// Policy chooses a placement for the current session state.
///
/// Returns `None` if no unplaced shape fits anywhere.
///
/// Object-safe so it can be used as `Box<dyn Policy>`.
pub trait Policy {
    fn choose_move(&mut self, session: &GameSession) -> Option<Move>;
}

/// Weight of one cleared line against contact score (which lies in [0, 1])
const LINE_WEIGHT: f32 = 2.0;
/// Weight of one cleared cell, so large clears win among equal line counts
const CELL_WEIGHT: f32 = 0.01;

/// One-ply greedy search: most lines, then tightest contact.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyPolicy;

impl GreedyPolicy {
    /// Value of placing `slot` at (x, y), `None` if illegal
    pub fn evaluate(session: &GameSession, slot: usize, x: i32, y: i32) -> Option<f32> {
        let id = session.batch_for_display().get(slot).copied().flatten()?;
        let matrix = session.library().matrix(id)?;
        let sim = session.grid().simulate(matrix, x, y)?;
        let finder = ShapeFinder::new(session.grid(), session.library());
        Some(
            sim.lines as f32 * LINE_WEIGHT
                + sim.cleared_cells as f32 * CELL_WEIGHT
                + finder.contact_score(matrix, x, y),
        )
    }
}

impl Policy for GreedyPolicy {
    fn choose_move(&mut self, session: &GameSession) -> Option<Move> {
        let grid = session.grid();
        let mut best: Option<(Move, f32)> = None;

        for (slot, id) in session.remaining_shapes() {
            let Some(matrix) = session.library().matrix(id) else {
                continue;
            };
            for (x, y) in grid.valid_origins(matrix) {
                let Some(value) = Self::evaluate(session, slot, x, y) else {
                    continue;
                };
                // Strictly greater keeps the first candidate on ties.
                if best.map_or(true, |(_, b)| value > b) {
                    best = Some((Move { slot, x, y }, value));
                }
            }
        }
        best.map(|(mv, _)| mv)
    }
}

/// Uniformly random legal placement, as a baseline.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: SpawnRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SpawnRng::new(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn choose_move(&mut self, session: &GameSession) -> Option<Move> {
        let grid = session.grid();
        let moves: Vec<Move> = session
            .remaining_shapes()
            .filter_map(|(slot, id)| session.library().matrix(id).map(|m| (slot, m)))
            .flat_map(|(slot, m)| grid.valid_origins(m).map(move |(x, y)| Move { slot, x, y }))
            .collect();
        self.rng.choose(&moves)
    }
}
