use sabo_arena_bot::constants::FULL_FIELD_SIZE;
use sabo_arena_bot::db::{raw_diesel_cxn_from_env, run_migrations};
use sabo_arena_bot::models::player::NewPlayer;
use sabo_arena_bot::models::tournament::NewTournament;

extern crate dotenv;

// Generates a tournament with a full field and a fresh bracket
fn main() -> anyhow::Result<()> {
    dotenv::dotenv()?;
    let mut db = raw_diesel_cxn_from_env()?;
    run_migrations(&mut db).map_err(|e| anyhow::anyhow!("Error running migrations: {e}"))?;

    let mut tournament = NewTournament::new("Test SABO Tournament").save(&mut db)?;
    for i in 0..FULL_FIELD_SIZE {
        let p = NewPlayer::new(format!("test_p{i}")).save(&mut db)?;
        tournament.register(&p, &mut db)?;
    }
    tournament.generate_bracket(&mut db)?;
    println!("Generated test tournament {}", tournament.uuid);
    Ok(())
}
