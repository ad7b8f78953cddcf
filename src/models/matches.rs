use crate::bracket::stage::{Slot, Stage};
use crate::models::player::Player;
use crate::models::tournament::Tournament;
use crate::schema::matches;
use crate::{save_fn, update_fn};
use diesel::prelude::*;
use diesel::SqliteConnection;
use serde::Serialize;
use thiserror::Error;

#[derive(serde::Serialize, serde::Deserialize, Eq, PartialEq, Debug)]
pub enum MatchState {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Error)]
pub enum MatchStateError {
    #[error("Invalid state")]
    InvalidState,
    #[error("Deserialization error: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),
}

/// One match of a bracket. `round_number`/`match_number` place it in the
/// bracket (see [Stage]); player seats stay empty until an upstream match
/// feeds them.
#[derive(Queryable, Identifiable, AsChangeset, Debug, Serialize, Clone)]
#[diesel(table_name=matches)]
pub struct Match {
    pub id: i32,
    pub tournament_id: i32,
    pub round_number: i32,
    pub match_number: i32,
    pub player_1_id: Option<i32>,
    pub player_2_id: Option<i32>,
    pub winner_id: Option<i32>,
    pub state: String,
    pub player_1_score: Option<i32>,
    pub player_2_score: Option<i32>,
}

impl Match {
    pub fn get_by_id(
        id: i32,
        conn: &mut SqliteConnection,
    ) -> Result<Option<Self>, diesel::result::Error> {
        matches::table.find(id).first(conn).optional()
    }

    pub fn get_by_seat(
        tournament: &Tournament,
        stage: Stage,
        match_number: i32,
        conn: &mut SqliteConnection,
    ) -> Result<Option<Self>, diesel::result::Error> {
        matches::table
            .filter(matches::tournament_id.eq(tournament.id))
            .filter(matches::round_number.eq(stage.round_number()))
            .filter(matches::match_number.eq(match_number))
            .first(conn)
            .optional()
    }

    pub fn state(&self) -> Result<MatchState, MatchStateError> {
        serde_json::from_str(&self.state).map_err(From::from)
    }

    pub(crate) fn set_state(&mut self, state: MatchState) {
        self.state = serde_json::to_string(&state).unwrap_or("Unknown".to_string());
    }

    pub fn is_completed(&self) -> Result<bool, MatchStateError> {
        Ok(self.state()? == MatchState::Completed)
    }

    pub fn stage(&self) -> Option<Stage> {
        Stage::from_round_number(self.round_number)
    }

    pub fn player_in_slot(&self, slot: Slot) -> Option<i32> {
        match slot {
            Slot::Player1 => self.player_1_id,
            Slot::Player2 => self.player_2_id,
        }
    }

    pub fn players_assigned(&self) -> bool {
        self.player_1_id.is_some() && self.player_2_id.is_some()
    }

    /// the player who lost this match, if it's been decided
    pub fn loser_id(&self) -> Option<i32> {
        let winner = self.winner_id?;
        if self.player_1_id == Some(winner) {
            self.player_2_id
        } else {
            self.player_1_id
        }
    }

    /// moves a fully-seated Pending match to InProgress; anything else is a
    /// state error
    pub fn start(&mut self, conn: &mut SqliteConnection) -> Result<(), MatchStateError> {
        if self.state()? != MatchState::Pending || !self.players_assigned() {
            return Err(MatchStateError::InvalidState);
        }
        self.set_state(MatchState::InProgress);
        self.update(conn)?;
        Ok(())
    }

    pub fn tournament(
        &self,
        conn: &mut SqliteConnection,
    ) -> Result<Tournament, diesel::result::Error> {
        Tournament::get_by_id(self.tournament_id, conn)
    }

    /// returns (player 1, player 2); a seat that hasn't been fed yet is None
    pub fn players(
        &self,
        conn: &mut SqliteConnection,
    ) -> Result<(Option<Player>, Option<Player>), diesel::result::Error> {
        let p1 = match self.player_1_id {
            Some(id) => Player::get_by_id(id, conn)?,
            None => None,
        };
        let p2 = match self.player_2_id {
            Some(id) => Player::get_by_id(id, conn)?,
            None => None,
        };
        Ok((p1, p2))
    }

    /// this hits the db to find players, so uh. i guess if that matters to you don't call it
    pub fn title(&self, conn: &mut SqliteConnection) -> Result<String, diesel::result::Error> {
        let (p1, p2) = self.players(conn)?;
        let name = |p: Option<Player>| p.map(|p| p.name).unwrap_or("TBD".to_string());
        Ok(format!("{} vs {}", name(p1), name(p2)))
    }

    update_fn! {}
}

#[derive(Insertable)]
#[diesel(table_name=matches)]
pub struct NewMatch {
    tournament_id: i32,
    round_number: i32,
    match_number: i32,
    pub player_1_id: Option<i32>,
    pub player_2_id: Option<i32>,
    winner_id: Option<i32>,
    state: String,
    player_1_score: Option<i32>,
    player_2_score: Option<i32>,
}

impl NewMatch {
    /// a match with both seats waiting on upstream results
    pub fn new(tournament: &Tournament, stage: Stage, match_number: i32) -> Self {
        Self {
            tournament_id: tournament.id,
            round_number: stage.round_number(),
            match_number,
            player_1_id: None,
            player_2_id: None,
            winner_id: None,
            state: serde_json::to_string(&MatchState::Pending).unwrap_or("Unknown".to_string()),
            player_1_score: None,
            player_2_score: None,
        }
    }

    pub fn with_players(
        tournament: &Tournament,
        stage: Stage,
        match_number: i32,
        player_1: &Player,
        player_2: &Player,
    ) -> Self {
        let mut nm = Self::new(tournament, stage, match_number);
        nm.player_1_id = Some(player_1.id);
        nm.player_2_id = Some(player_2.id);
        nm
    }

    save_fn!(matches::table, Match);
}

pub fn insert_bulk(
    new_matches: &Vec<NewMatch>,
    conn: &mut SqliteConnection,
) -> Result<usize, diesel::result::Error> {
    diesel::insert_into(matches::table)
        .values(new_matches)
        .execute(conn)
}
