use sabo_arena_bot::bracket::advancement::advance_all_completed;
use sabo_arena_bot::db::raw_diesel_cxn_from_env;
use sabo_arena_bot::models::tournament::Tournament;

/// Re-applies advancement for every completed match of one tournament.
/// Advancement is idempotent, so this is safe to run on a healthy bracket;
/// on a bracket that stalled (results recorded while advancement was broken)
/// it fills in whatever seats should already be filled.
fn main() -> anyhow::Result<()> {
    dotenv::dotenv()?;
    let uuid = std::env::args()
        .nth(1)
        .ok_or(anyhow::anyhow!("Usage: run_pending_advancements <tournament-uuid>"))?;

    let mut db = raw_diesel_cxn_from_env()?;
    let tournament = Tournament::get_by_uuid(&uuid, &mut db)?
        .ok_or(anyhow::anyhow!("No tournament with uuid {uuid}"))?;

    let swept = advance_all_completed(&tournament, &mut db)?;
    println!("Re-applied advancement for {swept} completed matches");
    Ok(())
}
