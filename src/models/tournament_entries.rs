use diesel::prelude::*;

use crate::models::player::Player;
use crate::models::tournament::Tournament;
use crate::save_fn;
use crate::schema::tournament_entries;

#[derive(Queryable, Debug)]
pub struct TournamentEntry {
    pub id: i32,
    pub tournament_id: i32,
    pub player_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name=tournament_entries)]
pub struct NewTournamentEntry {
    pub tournament_id: i32,
    pub player_id: i32,
}

impl NewTournamentEntry {
    pub fn new(tournament: &Tournament, player: &Player) -> Self {
        Self {
            tournament_id: tournament.id,
            player_id: player.id,
        }
    }

    save_fn!(tournament_entries::table, TournamentEntry);
}
