//! Autoplay - drive a session with a policy until it ends

use std::collections::BTreeMap;

use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;

use block_blast_core::{GameSession, PlaceError, SessionError};
use block_blast_types::{CoreEvent, SessionStatus};

use crate::policy::Policy;

#[derive(Debug, Error)]
pub enum AutoplayError {
    #[error("session: {0}")]
    Session(#[from] SessionError),
    #[error("policy chose an illegal move: {0}")]
    Place(#[from] PlaceError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoplayConfig {
    /// Stop after this many batches; `None` plays until game over
    pub max_rounds: Option<u32>,
    /// Take revive offers while credits last
    pub accept_revives: bool,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            max_rounds: None,
            accept_revives: true,
        }
    }
}

/// Outcome of one autoplayed game
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GameSummary {
    pub score: u64,
    pub best_score: u64,
    pub rounds: u32,
    pub placements: u32,
    pub lines_cleared: u32,
    pub revives_used: u32,
    /// Reached game over rather than the round cap
    pub game_over: bool,
    /// Batches dealt per spawner mode
    pub modes: BTreeMap<&'static str, u32>,
    /// Batches whose first slot was a rescue shape
    pub rescues: u32,
}

impl GameSummary {
    fn record(&mut self, events: Vec<CoreEvent>) {
        for event in events {
            match event {
                CoreEvent::BatchSpawned { mode, rescue } => {
                    *self.modes.entry(mode.as_str()).or_default() += 1;
                    if rescue {
                        self.rescues += 1;
                    }
                }
                CoreEvent::ReviveOffered => debug!("revive offered"),
                _ => {}
            }
        }
    }
}

/// Play `session` with `policy` until game over or the round cap.
///
/// Marks the session ready if it is still initializing.
pub fn play(
    session: &mut GameSession,
    policy: &mut dyn Policy,
    config: &AutoplayConfig,
) -> Result<GameSummary, AutoplayError> {
    let mut summary = GameSummary::default();
    if session.status() == SessionStatus::Initializing {
        session.mark_ready()?;
    }

    loop {
        summary.record(session.drain_events());

        match session.status() {
            SessionStatus::GameOver => {
                summary.game_over = true;
                break;
            }
            SessionStatus::AwaitingRevive if config.accept_revives => {
                session.accept_revive()?;
                summary.revives_used += 1;
                continue;
            }
            SessionStatus::AwaitingRevive => {
                session.decline_revive()?;
                continue;
            }
            SessionStatus::Initializing => session.mark_ready()?,
            SessionStatus::Playing => {}
        }

        if session.remaining_shapes().next().is_none() {
            if config.max_rounds.is_some_and(|cap| session.rounds() >= cap) {
                break;
            }
            session.request_next_batch()?;
            continue;
        }

        let Some(mv) = policy.choose_move(session) else {
            warn!("policy found no move while the session is playing");
            break;
        };
        session.place_slot(mv.slot, mv.x, mv.y)?;
        summary.placements += 1;
    }

    summary.record(session.drain_events());
    summary.score = session.score();
    summary.best_score = session.best_score();
    summary.rounds = session.rounds();
    summary.lines_cleared = session.lines_cleared();
    debug!(
        "autoplay finished: score {} rounds {} placements {}",
        summary.score, summary.rounds, summary.placements
    );
    Ok(summary)
}
