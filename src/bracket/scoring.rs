use crate::bracket::advancement::{advance_match, AdvancementError};
use crate::models::matches::{Match, MatchState, MatchStateError};
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::info;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoreSubmissionError {
    #[error("Match {0} not found")]
    MatchNotFound(i32),
    #[error("Match is already completed; results cannot be resubmitted")]
    AlreadyCompleted,
    #[error("Match does not have both players assigned yet")]
    PlayersUnassigned,
    #[error("SABO matches cannot be ties")]
    TiedScore,
    #[error("Scores cannot be negative (got {0}-{1})")]
    NegativeScore(i32, i32),
    #[error("Match state error: {0}")]
    StateError(#[from] MatchStateError),
    #[error("Advancement error: {0}")]
    AdvancementError(#[from] AdvancementError),
    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),
}

/// Records a final score for a match: the higher scorer becomes the winner,
/// the match completes, and the winner (and loser, where the bracket calls
/// for it) advances downstream. The whole thing happens in one transaction;
/// a conflict anywhere downstream rolls the submission back too.
///
/// Returns the winner's player id.
pub fn submit_score(
    match_id: i32,
    player_1_score: i32,
    player_2_score: i32,
    conn: &mut SqliteConnection,
) -> Result<i32, ScoreSubmissionError> {
    conn.transaction(|c| submit_score_inner(match_id, player_1_score, player_2_score, c))
}

fn submit_score_inner(
    match_id: i32,
    player_1_score: i32,
    player_2_score: i32,
    conn: &mut SqliteConnection,
) -> Result<i32, ScoreSubmissionError> {
    if player_1_score < 0 || player_2_score < 0 {
        return Err(ScoreSubmissionError::NegativeScore(
            player_1_score,
            player_2_score,
        ));
    }
    if player_1_score == player_2_score {
        return Err(ScoreSubmissionError::TiedScore);
    }

    let mut m =
        Match::get_by_id(match_id, conn)?.ok_or(ScoreSubmissionError::MatchNotFound(match_id))?;
    match m.state()? {
        MatchState::Completed => {
            return Err(ScoreSubmissionError::AlreadyCompleted);
        }
        MatchState::Pending | MatchState::InProgress => {}
    }
    let (p1_id, p2_id) = match (m.player_1_id, m.player_2_id) {
        (Some(p1), Some(p2)) => (p1, p2),
        _ => {
            return Err(ScoreSubmissionError::PlayersUnassigned);
        }
    };

    let winner = if player_1_score > player_2_score {
        p1_id
    } else {
        p2_id
    };
    m.player_1_score = Some(player_1_score);
    m.player_2_score = Some(player_2_score);
    m.winner_id = Some(winner);
    m.set_state(MatchState::Completed);
    m.update(conn)?;
    info!(
        "Match {} (round {} match {}) completed {}-{}; winner is player {}",
        m.id, m.round_number, m.match_number, player_1_score, player_2_score, winner
    );

    advance_match(&m, conn)?;
    Ok(winner)
}
