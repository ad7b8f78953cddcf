extern crate rand;
extern crate serde_json;

use crate::bracket::advancement::AdvancementError;
use crate::bracket::scoring::ScoreSubmissionError;
use crate::models::matches::MatchStateError;
use crate::models::tournament::TournamentError;
use thiserror::Error;

pub mod bracket;
pub mod config;
pub mod constants;
pub mod db;
pub mod models;
pub mod schema;
pub mod utils;

#[cfg(test)]
pub mod test_utils;

#[derive(Error, Debug)]
pub enum SaboArenaError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),

    #[error("[De]serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Match state error: {0}")]
    MatchStateError(#[from] MatchStateError),

    #[error("Tournament error: {0}")]
    TournamentError(#[from] TournamentError),

    #[error("Score submission error: {0}")]
    ScoreSubmissionError(#[from] ScoreSubmissionError),

    #[error("Advancement error: {0}")]
    AdvancementError(#[from] AdvancementError),

    #[error("Illegal state transition: {0:?}")]
    StateError(String),
}
