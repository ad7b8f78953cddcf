use crate::save_fn;
use crate::schema::players;
use diesel::prelude::*;
use diesel::SqliteConnection;
use serde::Serialize;

#[derive(Queryable, Identifiable, Debug, Serialize, Clone)]
pub struct Player {
    pub id: i32,
    pub uuid: String,
    pub name: String,
}

impl Player {
    pub fn get_by_id(
        id: i32,
        conn: &mut SqliteConnection,
    ) -> Result<Option<Self>, diesel::result::Error> {
        players::table.find(id).first(conn).optional()
    }

    pub fn get_by_uuid(
        uuid: &str,
        conn: &mut SqliteConnection,
    ) -> Result<Option<Self>, diesel::result::Error> {
        Ok(players::table
            .filter(players::uuid.eq(uuid))
            .load(conn)?
            .pop())
    }
}

#[derive(Insertable)]
#[diesel(table_name=players)]
pub struct NewPlayer {
    pub uuid: String,
    pub name: String,
}

impl NewPlayer {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            uuid: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }

    save_fn!(players::table, Player);
}
