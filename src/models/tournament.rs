use crate::bracket::stage::Stage;
use crate::constants::FULL_FIELD_SIZE;
use crate::models::matches::{insert_bulk, Match, NewMatch};
use crate::models::player::Player;
use crate::models::{epoch_timestamp, tournament_entries};
use crate::schema::tournaments;
use crate::{save_fn, update_fn};
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use rand::seq::SliceRandom;
use rand::thread_rng;
use serde::Serialize;
use thiserror::Error;

#[derive(serde::Serialize, serde::Deserialize, Eq, PartialEq, Debug)]
pub enum TournamentState {
    Created,
    Started,
    Finished,
}

#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("Invalid tournament state")]
    InvalidState,
    #[error("SABO brackets take exactly {expected} players; this tournament has {actual}")]
    WrongFieldSize { expected: usize, actual: usize },
    #[error("Database error: {0}")]
    DBError(#[from] diesel::result::Error),
    #[error("Serialization error (probably from invalid db state): {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Queryable, Identifiable, AsChangeset, Debug, Serialize)]
pub struct Tournament {
    pub id: i32,
    pub uuid: String,
    pub name: String,
    pub created: i64,
    state: String,
}

impl Tournament {
    pub fn get_by_id(
        id: i32,
        conn: &mut SqliteConnection,
    ) -> Result<Tournament, diesel::result::Error> {
        tournaments::table.find(id).first(conn)
    }

    pub fn get_by_uuid(
        uuid: &str,
        conn: &mut SqliteConnection,
    ) -> Result<Option<Tournament>, diesel::result::Error> {
        Ok(tournaments::table
            .filter(tournaments::uuid.eq(uuid))
            .load(conn)?
            .pop())
    }

    fn state(&self) -> Result<TournamentState, serde_json::Error> {
        serde_json::from_str(&self.state)
    }

    fn set_state(&mut self, state: TournamentState) -> Result<(), serde_json::Error> {
        self.state = serde_json::to_string(&state)?;
        Ok(())
    }

    pub fn is_started(&self) -> Result<bool, serde_json::Error> {
        Ok(self.state()? == TournamentState::Started)
    }

    pub fn is_finished(&self) -> Result<bool, serde_json::Error> {
        Ok(self.state()? == TournamentState::Finished)
    }

    pub fn players(
        &self,
        conn: &mut SqliteConnection,
    ) -> Result<Vec<Player>, diesel::result::Error> {
        use crate::schema::players;
        use crate::schema::tournament_entries as entries;
        entries::table
            .filter(entries::tournament_id.eq(self.id))
            .inner_join(players::table)
            .select(players::all_columns)
            .load(conn)
    }

    /// returns all matches for this tournament (unordered)
    pub fn matches(
        &self,
        conn: &mut SqliteConnection,
    ) -> Result<Vec<Match>, diesel::result::Error> {
        use crate::schema::matches;
        matches::table
            .filter(matches::tournament_id.eq(self.id))
            .load(conn)
    }

    pub fn register(
        &self,
        player: &Player,
        conn: &mut SqliteConnection,
    ) -> Result<tournament_entries::TournamentEntry, diesel::result::Error> {
        tournament_entries::NewTournamentEntry::new(self, player).save(conn)
    }

    /// Creates and saves the full 29-match bracket: winners round 1 seated
    /// from a shuffled field, every later match with empty seats waiting on
    /// its feeds. One-shot; regenerating a started bracket is an error.
    pub fn generate_bracket(
        &mut self,
        conn: &mut SqliteConnection,
    ) -> Result<(), TournamentError> {
        match self.state()? {
            TournamentState::Created => conn.transaction(|c| self.generate_bracket_inner(c)),
            TournamentState::Started | TournamentState::Finished => {
                Err(TournamentError::InvalidState)
            }
        }
    }

    fn generate_bracket_inner(
        &mut self,
        conn: &mut SqliteConnection,
    ) -> Result<(), TournamentError> {
        let mut players = self.players(conn)?;
        if players.len() != FULL_FIELD_SIZE {
            return Err(TournamentError::WrongFieldSize {
                expected: FULL_FIELD_SIZE,
                actual: players.len(),
            });
        }
        players.as_mut_slice().shuffle(&mut thread_rng());

        let mut new_matches = vec![];
        for stage in Stage::all() {
            for match_number in 1..=stage.match_count() {
                let nm = if stage == Stage::WinnersRound(1) {
                    let p1 = &players[(match_number as usize - 1) * 2];
                    let p2 = &players[(match_number as usize - 1) * 2 + 1];
                    NewMatch::with_players(self, stage, match_number, p1, p2)
                } else {
                    NewMatch::new(self, stage, match_number)
                };
                new_matches.push(nm);
            }
        }
        debug!(
            "Generating {} matches for tournament {}",
            new_matches.len(),
            self.uuid
        );
        insert_bulk(&new_matches, conn)?;

        self.set_state(TournamentState::Started)?;
        self.update(conn)?;
        Ok(())
    }

    /// sets this tournament's state to finished, if the grand final is decided
    pub fn finish(
        &mut self,
        conn: &mut SqliteConnection,
    ) -> Result<bool, TournamentError> {
        let gf = Match::get_by_seat(self, Stage::GrandFinal, 1, conn)?;
        match gf {
            Some(m) if m.winner_id.is_some() => {
                self.set_state(TournamentState::Finished)?;
                self.update(conn)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    update_fn! {}
}

#[derive(Insertable)]
#[diesel(table_name=tournaments)]
pub struct NewTournament {
    uuid: String,
    name: String,
    created: i64,
    state: String,
}

impl NewTournament {
    pub fn new<S: Into<String>>(name: S) -> Self {
        let state =
            serde_json::to_string(&TournamentState::Created).unwrap_or("Unknown".to_string());
        Self {
            uuid: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            created: epoch_timestamp(),
            state,
        }
    }

    save_fn!(tournaments::table, Tournament);
}
