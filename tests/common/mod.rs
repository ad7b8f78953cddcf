use diesel::{Connection, SqliteConnection};
use sabo_arena_bot::db::run_migrations;

pub fn start_db() -> Result<SqliteConnection, anyhow::Error> {
    let mut db = SqliteConnection::establish(":memory:")?;
    run_migrations(&mut db).map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(db)
}
