use crate::bracket::stage::Stage;
use crate::models::matches::{Match, MatchState};
use crate::models::player::Player;
use crate::models::tournament::Tournament;
use crate::SaboArenaError;
use diesel::SqliteConnection;
use itertools::Itertools;
use log::warn;

/// all of a tournament's matches bucketed by stage, in bracket order
pub fn matches_by_stage(
    tournament: &Tournament,
    conn: &mut SqliteConnection,
) -> Result<Vec<(Stage, Vec<Match>)>, diesel::result::Error> {
    let mut by_round = tournament
        .matches(conn)?
        .into_iter()
        .into_group_map_by(|m| m.round_number);
    let mut out = vec![];
    for stage in Stage::all() {
        let mut stage_matches = by_round.remove(&stage.round_number()).unwrap_or_default();
        stage_matches.sort_by_key(|m| m.match_number);
        out.push((stage, stage_matches));
    }
    for (round_number, stray) in by_round {
        warn!(
            "Tournament {} has {} match(es) with unrecognized round number {}",
            tournament.uuid,
            stray.len(),
            round_number
        );
    }
    Ok(out)
}

#[derive(Debug, Default, Eq, PartialEq)]
pub struct Progress {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl Progress {
    pub fn is_all_played(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// completion counts across the whole bracket
pub fn progress(
    tournament: &Tournament,
    conn: &mut SqliteConnection,
) -> Result<Progress, SaboArenaError> {
    let mut progress = Progress::default();
    for m in tournament.matches(conn)? {
        progress.total += 1;
        match m.state()? {
            MatchState::Pending => progress.pending += 1,
            MatchState::InProgress => progress.in_progress += 1,
            MatchState::Completed => progress.completed += 1,
        }
    }
    Ok(progress)
}

/// the grand final winner, once there is one
pub fn champion(
    tournament: &Tournament,
    conn: &mut SqliteConnection,
) -> Result<Option<Player>, diesel::result::Error> {
    let gf = Match::get_by_seat(tournament, Stage::GrandFinal, 1, conn)?;
    match gf.and_then(|m| m.winner_id) {
        Some(winner_id) => Player::get_by_id(winner_id, conn),
        None => Ok(None),
    }
}
