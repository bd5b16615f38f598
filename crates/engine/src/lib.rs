//! Headless drivers that play block-blast sessions through the public session API.
//!
//! - [`policy`]: placement policies ([`GreedyPolicy`], [`RandomPolicy`])
//! - [`autoplay`]: runs a session to game over (or a round cap) and summarizes it

pub mod autoplay;
pub mod policy;

pub use autoplay::{play, AutoplayConfig, AutoplayError, GameSummary};
pub use policy::{GreedyPolicy, Move, Policy, RandomPolicy};
