use crate::bracket::feeds::{loser_feed, winner_feed, Feed};
use crate::bracket::stage::{Slot, Stage};
use crate::models::matches::{Match, MatchState, MatchStateError};
use crate::models::tournament::{Tournament, TournamentError};
use crate::schema::matches;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::{debug, info};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdvancementError {
    #[error("Match {0} not found")]
    MatchNotFound(i32),
    #[error("Match {match_id} has an unrecognized round number {round_number}")]
    UnknownRound { match_id: i32, round_number: i32 },
    #[error("Cannot advance from a match that isn't completed")]
    SourceNotCompleted,
    #[error("Completed match {0} has no winner")]
    MissingWinner(i32),
    #[error("Match {match_id} winner {winner_id} is not one of its players")]
    ForeignWinner { match_id: i32, winner_id: i32 },
    #[error("No {stage} match {match_number} exists for this tournament")]
    MissingTarget { stage: Stage, match_number: i32 },
    #[error(
        "{slot:?} seat of match {match_id} already holds player {occupant}; \
         refusing to overwrite with player {incoming}"
    )]
    SlotConflict {
        match_id: i32,
        slot: Slot,
        occupant: i32,
        incoming: i32,
    },
    #[error("Match state error: {0}")]
    StateError(#[from] MatchStateError),
    #[error("Tournament error: {0}")]
    TournamentError(#[from] TournamentError),
    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),
}

/// Pushes a completed match's winner (and, out of the winners bracket, its
/// loser) into the downstream seats given by [crate::bracket::feeds].
/// Re-applying is a no-op; a seat that already holds somebody else is a
/// conflict, never an overwrite.
pub fn advance(match_id: i32, conn: &mut SqliteConnection) -> Result<(), AdvancementError> {
    let source =
        Match::get_by_id(match_id, conn)?.ok_or(AdvancementError::MatchNotFound(match_id))?;
    advance_match(&source, conn)
}

/// [advance], for a match that's already been loaded
pub fn advance_match(source: &Match, conn: &mut SqliteConnection) -> Result<(), AdvancementError> {
    if source.state()? != MatchState::Completed {
        return Err(AdvancementError::SourceNotCompleted);
    }
    let winner = source
        .winner_id
        .ok_or(AdvancementError::MissingWinner(source.id))?;
    if source.player_1_id != Some(winner) && source.player_2_id != Some(winner) {
        return Err(AdvancementError::ForeignWinner {
            match_id: source.id,
            winner_id: winner,
        });
    }
    let stage = source.stage().ok_or(AdvancementError::UnknownRound {
        match_id: source.id,
        round_number: source.round_number,
    })?;
    let mut tournament = source.tournament(conn)?;

    match winner_feed(stage, source.match_number) {
        Some(feed) => {
            seat_player(&tournament, winner, &feed, conn)?;
        }
        None => {
            // the grand final feeds nothing; the tournament is decided
            if tournament.finish(conn)? {
                info!(
                    "Tournament {} decided; player {} is the champion",
                    tournament.uuid, winner
                );
            }
        }
    }
    if let Some(feed) = loser_feed(stage, source.match_number) {
        // a completed match with a winner always has both seats filled, but
        // there's no point exploding on a row somebody hand-edited
        if let Some(loser) = source.loser_id() {
            seat_player(&tournament, loser, &feed, conn)?;
        }
    }
    Ok(())
}

/// Runs [advance_match] for every completed match of the tournament, in
/// bracket order. Advancement is idempotent, so sweeping the whole bracket
/// is safe; this is the repair tool for brackets that stalled while
/// advancement was broken or bypassed.
pub fn advance_all_completed(
    tournament: &Tournament,
    conn: &mut SqliteConnection,
) -> Result<usize, AdvancementError> {
    let mut completed: Vec<Match> = tournament
        .matches(conn)?
        .into_iter()
        .filter(|m| matches!(m.state(), Ok(MatchState::Completed)))
        .collect();
    completed.sort_by_key(|m| (m.round_number, m.match_number));
    let count = completed.len();
    for m in completed {
        advance_match(&m, conn)?;
    }
    Ok(count)
}

fn seat_player(
    tournament: &Tournament,
    player_id: i32,
    feed: &Feed,
    conn: &mut SqliteConnection,
) -> Result<(), AdvancementError> {
    let target = Match::get_by_seat(tournament, feed.stage, feed.match_number, conn)?.ok_or(
        AdvancementError::MissingTarget {
            stage: feed.stage,
            match_number: feed.match_number,
        },
    )?;

    if target.player_in_slot(feed.slot) == Some(player_id) {
        debug!(
            "Player {} already seated in {} match {}; nothing to do",
            player_id, feed.stage, feed.match_number
        );
        return Ok(());
    }
    // the same player turning up in the opposite seat means two different
    // feeds produced one player; that's the duplicate-assignment bug and it
    // has to surface, not get written over
    if target.player_in_slot(feed.slot.other()) == Some(player_id) {
        return Err(AdvancementError::SlotConflict {
            match_id: target.id,
            slot: feed.slot.other(),
            occupant: player_id,
            incoming: player_id,
        });
    }
    if let Some(occupant) = target.player_in_slot(feed.slot) {
        return Err(AdvancementError::SlotConflict {
            match_id: target.id,
            slot: feed.slot,
            occupant,
            incoming: player_id,
        });
    }

    // conditional write: only an empty seat is ever written, so two racing
    // submissions can't both land
    let updated = match feed.slot {
        Slot::Player1 => diesel::update(
            matches::table
                .filter(matches::id.eq(target.id))
                .filter(matches::player_1_id.is_null()),
        )
        .set(matches::player_1_id.eq(player_id))
        .execute(conn)?,
        Slot::Player2 => diesel::update(
            matches::table
                .filter(matches::id.eq(target.id))
                .filter(matches::player_2_id.is_null()),
        )
        .set(matches::player_2_id.eq(player_id))
        .execute(conn)?,
    };
    if updated == 0 {
        // somebody seated this slot between our read and our write
        let current = Match::get_by_id(target.id, conn)?
            .ok_or(AdvancementError::MatchNotFound(target.id))?;
        return match current.player_in_slot(feed.slot) {
            Some(p) if p == player_id => Ok(()),
            Some(occupant) => Err(AdvancementError::SlotConflict {
                match_id: target.id,
                slot: feed.slot,
                occupant,
                incoming: player_id,
            }),
            None => Err(AdvancementError::MatchNotFound(target.id)),
        };
    }
    info!(
        "Advanced player {} into {} match {} ({:?})",
        player_id, feed.stage, feed.match_number, feed.slot
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{advance, advance_all_completed, AdvancementError};
    use crate::bracket::scoring::submit_score;
    use crate::bracket::stage::Stage;
    use crate::models::matches::{Match, MatchState};
    use crate::models::tournament::Tournament;
    use crate::test_utils::{sabo_fixtures, setup_db, Fixture};
    use diesel::SqliteConnection;

    fn seat(
        t: &Tournament,
        stage: Stage,
        n: i32,
        conn: &mut SqliteConnection,
    ) -> anyhow::Result<Match> {
        Match::get_by_seat(t, stage, n, conn)?
            .ok_or(anyhow::anyhow!("missing {stage} match {n}"))
    }

    /// completes a match in place without firing advancement, the way a
    /// hand-edit against the hosted db would
    fn complete_by_hand(
        m: &mut Match,
        winner_id: Option<i32>,
        conn: &mut SqliteConnection,
    ) -> anyhow::Result<()> {
        m.player_1_score = Some(2);
        m.player_2_score = Some(0);
        m.winner_id = winner_id.or(m.player_1_id);
        m.set_state(MatchState::Completed);
        m.update(conn)?;
        Ok(())
    }

    #[test]
    fn test_advance_requires_completed_source() -> anyhow::Result<()> {
        let mut db = setup_db()?;
        let Fixture { tournament, .. } = sabo_fixtures(&mut db)?;
        let m = seat(&tournament, Stage::WinnersRound(1), 1, &mut db)?;
        assert!(matches!(
            advance(m.id, &mut db),
            Err(AdvancementError::SourceNotCompleted)
        ));
        Ok(())
    }

    #[test]
    fn test_advance_missing_match() -> anyhow::Result<()> {
        let mut db = setup_db()?;
        sabo_fixtures(&mut db)?;
        assert!(matches!(
            advance(9999, &mut db),
            Err(AdvancementError::MatchNotFound(9999))
        ));
        Ok(())
    }

    #[test]
    fn test_advance_is_idempotent() -> anyhow::Result<()> {
        let mut db = setup_db()?;
        let Fixture { tournament, .. } = sabo_fixtures(&mut db)?;
        let m = seat(&tournament, Stage::WinnersRound(1), 1, &mut db)?;
        let winner = submit_score(m.id, 2, 0, &mut db)?;

        let downstream = seat(&tournament, Stage::WinnersRound(2), 1, &mut db)?;
        assert_eq!(Some(winner), downstream.player_1_id);
        let dropped = seat(&tournament, Stage::LosersBranchA(1), 1, &mut db)?;
        let m = seat(&tournament, Stage::WinnersRound(1), 1, &mut db)?;
        assert_eq!(m.loser_id(), dropped.player_1_id);

        // re-firing changes nothing
        advance(m.id, &mut db)?;
        advance(m.id, &mut db)?;
        let downstream_after = seat(&tournament, Stage::WinnersRound(2), 1, &mut db)?;
        assert_eq!(Some(winner), downstream_after.player_1_id);
        assert_eq!(None, downstream_after.player_2_id);
        let dropped_after = seat(&tournament, Stage::LosersBranchA(1), 1, &mut db)?;
        assert_eq!(dropped.player_1_id, dropped_after.player_1_id);
        Ok(())
    }

    #[test]
    fn test_occupied_seat_is_a_conflict_not_an_overwrite() -> anyhow::Result<()> {
        let mut db = setup_db()?;
        let Fixture { tournament, .. } = sabo_fixtures(&mut db)?;
        let mut source = seat(&tournament, Stage::WinnersRound(1), 1, &mut db)?;
        complete_by_hand(&mut source, None, &mut db)?;

        // somebody already (wrongly) seated a different player downstream
        let stranger = seat(&tournament, Stage::WinnersRound(1), 8, &mut db)?
            .player_1_id
            .ok_or(anyhow::anyhow!("round 1 should be seated"))?;
        let mut downstream = seat(&tournament, Stage::WinnersRound(2), 1, &mut db)?;
        downstream.player_1_id = Some(stranger);
        downstream.update(&mut db)?;

        match advance(source.id, &mut db) {
            Err(AdvancementError::SlotConflict {
                occupant, incoming, ..
            }) => {
                assert_eq!(stranger, occupant);
                assert_eq!(source.winner_id, Some(incoming));
            }
            other => panic!("Expected SlotConflict, got {other:?}"),
        }
        // and the seat is untouched
        let downstream_after = seat(&tournament, Stage::WinnersRound(2), 1, &mut db)?;
        assert_eq!(Some(stranger), downstream_after.player_1_id);
        Ok(())
    }

    #[test]
    fn test_player_cannot_take_both_seats_of_one_match() -> anyhow::Result<()> {
        let mut db = setup_db()?;
        let Fixture { tournament, .. } = sabo_fixtures(&mut db)?;
        let mut source = seat(&tournament, Stage::WinnersRound(1), 1, &mut db)?;
        complete_by_hand(&mut source, None, &mut db)?;
        let winner = source
            .winner_id
            .ok_or(anyhow::anyhow!("just completed this match"))?;

        // the winner is somehow already in the downstream player 2 seat
        let mut downstream = seat(&tournament, Stage::WinnersRound(2), 1, &mut db)?;
        downstream.player_2_id = Some(winner);
        downstream.update(&mut db)?;

        assert!(matches!(
            advance(source.id, &mut db),
            Err(AdvancementError::SlotConflict { .. })
        ));
        let downstream_after = seat(&tournament, Stage::WinnersRound(2), 1, &mut db)?;
        assert_eq!(None, downstream_after.player_1_id);
        Ok(())
    }

    #[test]
    fn test_winner_must_be_a_participant() -> anyhow::Result<()> {
        let mut db = setup_db()?;
        let Fixture {
            tournament,
            players,
        } = sabo_fixtures(&mut db)?;
        let mut source = seat(&tournament, Stage::WinnersRound(1), 1, &mut db)?;
        let outsider = players
            .iter()
            .map(|p| p.id)
            .find(|id| Some(*id) != source.player_1_id && Some(*id) != source.player_2_id)
            .ok_or(anyhow::anyhow!("16 players, 2 seats; somebody's free"))?;
        complete_by_hand(&mut source, Some(outsider), &mut db)?;

        assert!(matches!(
            advance(source.id, &mut db),
            Err(AdvancementError::ForeignWinner { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_sweep_repairs_a_stalled_bracket() -> anyhow::Result<()> {
        let mut db = setup_db()?;
        let Fixture { tournament, .. } = sabo_fixtures(&mut db)?;
        // all of round 1 decided by hand-edits that never fired advancement
        for n in 1..=8 {
            let mut m = seat(&tournament, Stage::WinnersRound(1), n, &mut db)?;
            complete_by_hand(&mut m, None, &mut db)?;
        }
        let swept = advance_all_completed(&tournament, &mut db)?;
        assert_eq!(8, swept);
        for n in 1..=4 {
            let m = seat(&tournament, Stage::WinnersRound(2), n, &mut db)?;
            assert!(m.players_assigned(), "winners round 2 match {n} not seated");
            let dropped = seat(&tournament, Stage::LosersBranchA(1), n, &mut db)?;
            assert!(dropped.players_assigned(), "branch A match {n} not seated");
        }
        Ok(())
    }
}
