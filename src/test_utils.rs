use diesel::{Connection as _, SqliteConnection};

use crate::constants::FULL_FIELD_SIZE;
use crate::db::run_migrations;
use crate::models::player::{NewPlayer, Player};
use crate::models::tournament::{NewTournament, Tournament};

pub fn setup_db() -> Result<SqliteConnection, anyhow::Error> {
    let mut db = SqliteConnection::establish(":memory:")?;
    run_migrations(&mut db).map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(db)
}

pub struct Fixture {
    pub tournament: Tournament,
    pub players: Vec<Player>,
}

/// a tournament with a full 16-player field and a freshly generated bracket
pub fn sabo_fixtures(conn: &mut SqliteConnection) -> Result<Fixture, anyhow::Error> {
    let mut tournament = NewTournament::new("test tournament").save(conn)?;
    let mut players = Vec::with_capacity(FULL_FIELD_SIZE);
    for i in 0..FULL_FIELD_SIZE {
        let p = NewPlayer::new(format!("p{i}")).save(conn)?;
        tournament.register(&p, conn)?;
        players.push(p);
    }
    tournament.generate_bracket(conn)?;
    Ok(Fixture {
        tournament,
        players,
    })
}

#[cfg(test)]
mod tests {
    use super::{sabo_fixtures, setup_db};
    use diesel::dsl::count;
    use diesel::prelude::*;

    #[test]
    fn test_database_init() -> anyhow::Result<()> {
        let mut db = setup_db()?;
        let fixture = sabo_fixtures(&mut db)?;
        assert_eq!(16, fixture.players.len());
        let matches = crate::schema::matches::table
            .select(count(crate::schema::matches::id))
            .get_result::<i64>(&mut db)?;
        assert_eq!(29, matches);
        Ok(())
    }

    #[test]
    fn test_database_init_is_isolated() -> anyhow::Result<()> {
        // this is just a separate test to make sure that the rows created in the previous test don't carry over

        let mut db = setup_db()?;
        let players = crate::schema::players::table
            .select(count(crate::schema::players::id))
            .get_result::<i64>(&mut db)?;
        assert_eq!(0, players);
        Ok(())
    }
}
