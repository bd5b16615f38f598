//! Spawner module - chooses the pieces offered each round
//!
//! Each round the spawner:
//!
//! 1. Looks for a **rescue** shape that can empty the whole grid. If found it takes slot 0
//!    and the round is played as [`SpawnerMode::SkillBased`].
//! 2. Otherwise classifies the round from grid fill and warm-up pacing (first match wins):
//!    `Critical` (fill above 0.85), `WarmUp` (moves below target), `Relax` (fill below 0.15),
//!    `SmartHelp` (fill above 0.5), else `SkillBased`. In `Critical` a mega-killer, if any,
//!    takes slot 0.
//! 3. Fills the remaining slots from the mode's pool, then two reshuffled passes over every
//!    fitting shape, then uniform draws from the easy pool. A candidate is accepted only if
//!    it fits somewhere on the current grid and is not already in the batch; the easy-pool
//!    draws skip both checks.
//!
//! `WarmUp` and `SkillBased` use a layered pool, the first non-empty of: mega killers,
//! large perfect fits at the dynamic threshold, hole fillers at `dynamic - 0.15`, clean
//! killers, every fitting shape, fitting easy shapes.

use log::{debug, trace};

use crate::config::SpawnerConfig;
use crate::error::SpawnError;
use crate::finder::ShapeFinder;
use crate::grid::Grid;
use crate::library::ShapeLibrary;
use crate::pacing::SessionPacing;
use crate::rng::SpawnRng;
use crate::types::{ShapeId, SpawnerMode};

/// Pieces offered for one round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnBatch {
    pub shapes: Vec<ShapeId>,
    pub mode: SpawnerMode,
    /// Slot 0 holds a rescue shape (full clear, or a mega kill in danger)
    pub rescue: bool,
}

#[derive(Debug, Clone)]
pub struct Spawner {
    config: SpawnerConfig,
    pacing: SessionPacing,
    mode: SpawnerMode,
    rng: SpawnRng,
}

impl Spawner {
    /// Create a spawner for a new session with the given RNG seed
    pub fn new(config: SpawnerConfig, seed: u64) -> Self {
        let mut rng = SpawnRng::new(seed);
        let pacing = SessionPacing::new(&config, &mut rng);
        Self {
            config,
            pacing,
            mode: SpawnerMode::None,
            rng,
        }
    }

    /// Create a spawner with explicit pacing state.
    ///
    /// The line-clear reward is taken from `config`.
    pub fn with_pacing(config: SpawnerConfig, pacing: SessionPacing, seed: u64) -> Self {
        Self {
            pacing: pacing.with_reward_per_line(config.reward_moves_per_line),
            config,
            mode: SpawnerMode::None,
            rng: SpawnRng::new(seed),
        }
    }

    /// Start a new session: resample pacing and return to [`SpawnerMode::None`].
    ///
    /// The RNG stream continues, so consecutive sessions differ.
    pub fn reset(&mut self) {
        self.pacing = SessionPacing::new(&self.config, &mut self.rng);
        self.mode = SpawnerMode::None;
    }

    /// Mode of the last assembled batch
    pub fn mode(&self) -> SpawnerMode {
        self.mode
    }

    pub fn pacing(&self) -> &SessionPacing {
        &self.pacing
    }

    pub fn config(&self) -> &SpawnerConfig {
        &self.config
    }

    pub fn on_lines_cleared(&mut self, lines: u32) {
        self.pacing.on_lines_cleared(lines);
    }

    pub fn on_revive(&mut self, bonus_moves: u32) {
        self.pacing.on_revive(bonus_moves);
    }

    /// Classify a round from the grid fill fraction and pacing
    pub fn classify(&self, fill: f32) -> SpawnerMode {
        if fill > self.config.critical_fill {
            SpawnerMode::Critical
        } else if self.pacing.in_warmup() {
            SpawnerMode::WarmUp
        } else if fill < self.config.relax_fill {
            SpawnerMode::Relax
        } else if fill > self.config.smart_help_fill {
            SpawnerMode::SmartHelp
        } else {
            SpawnerMode::SkillBased
        }
    }

    /// Primary pool of a mode
    pub fn pool_for(
        &self,
        mode: SpawnerMode,
        finder: &ShapeFinder<'_>,
        library: &ShapeLibrary,
    ) -> Vec<ShapeId> {
        match mode {
            SpawnerMode::Relax => finder.fits(library.all()),
            SpawnerMode::Critical => finder.fits(library.easy()),
            SpawnerMode::SmartHelp => {
                finder.hole_fillers(library.all(), self.config.smart_help_hole_threshold)
            }
            SpawnerMode::WarmUp | SpawnerMode::SkillBased | SpawnerMode::None => {
                self.layered_pool(finder, library)
            }
        }
    }

    fn layered_pool(&self, finder: &ShapeFinder<'_>, library: &ShapeLibrary) -> Vec<ShapeId> {
        let all = library.all();
        let threshold = self.pacing.dynamic_threshold();

        let tiers: [(&str, &dyn Fn() -> Vec<ShapeId>); 6] = [
            ("mega_killers", &|| finder.mega_killers(all)),
            ("large_perfect_fits", &|| {
                finder.large_perfect_fits(all, threshold)
            }),
            ("hole_fillers", &|| {
                finder.hole_fillers(all, threshold - self.config.hole_filler_offset)
            }),
            ("clean_killers", &|| finder.clean_killers(all)),
            ("fits", &|| finder.fits(all)),
            ("easy_fits", &|| finder.fits(library.easy())),
        ];

        for (name, tier) in tiers {
            let pool = tier();
            if !pool.is_empty() {
                trace!("layered pool from {name} ({} shapes, threshold {threshold:.3})", pool.len());
                return pool;
            }
        }
        Vec::new()
    }

    /// Assemble the next batch for the current grid and advance pacing by one round.
    pub fn next_batch(
        &mut self,
        grid: &Grid,
        library: &ShapeLibrary,
    ) -> Result<SpawnBatch, SpawnError> {
        let slots = self.config.slot_count.max(1) as usize;
        let finder = ShapeFinder::new(grid, library);
        let all = library.all();
        let fill = grid.fill_percentage();

        let mut selected: Vec<ShapeId> = Vec::with_capacity(slots);
        let mut mode = self.classify(fill);
        let mut rescue = false;

        if let Some(id) = finder.full_clear_rescue(all) {
            debug!("full-clear rescue available: {id:?}");
            selected.push(id);
            mode = SpawnerMode::SkillBased;
            rescue = true;
        } else if mode == SpawnerMode::Critical {
            let megas = finder.mega_killers(all);
            if let Some(id) = self.rng.choose(&megas) {
                debug!("critical grid, mega-kill rescue: {id:?}");
                selected.push(id);
                rescue = true;
            }
        }
        debug!("round {} mode {} (fill {fill:.2})", self.pacing.moves_played(), mode.as_str());

        let primary = self.pool_for(mode, &finder, library);
        let secondary = finder.fits(all);
        let tertiary = secondary.clone();

        for (tier, mut pool) in [primary, secondary, tertiary].into_iter().enumerate() {
            if selected.len() >= slots {
                break;
            }
            self.rng.shuffle(&mut pool);
            for id in pool {
                if selected.len() >= slots {
                    break;
                }
                if selected.contains(&id) {
                    continue;
                }
                if library
                    .matrix(id)
                    .is_some_and(|m| grid.can_fit_anywhere(m))
                {
                    selected.push(id);
                }
            }
            trace!("after pool tier {tier}: {} of {slots} slots", selected.len());
        }

        while selected.len() < slots {
            let id = self
                .rng
                .choose(library.easy())
                .ok_or(SpawnError::EmptyEasyPool)?;
            trace!("easy fallback draw: {id:?}");
            selected.push(id);
        }

        self.mode = mode;
        self.pacing.register_round();

        Ok(SpawnBatch {
            shapes: selected,
            mode,
            rescue,
        })
    }
}
