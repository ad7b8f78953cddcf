use itertools::Itertools;
use sabo_arena_bot::bracket::stage::Stage;
use sabo_arena_bot::db::raw_diesel_cxn_from_env;
use sabo_arena_bot::models::matches::Match;
use sabo_arena_bot::models::tournament::Tournament;

/// Scans the finals stages of one tournament for the duplicate-assignment
/// bug: the same player seated on both sides of a match, or seated in both
/// semifinals at once. Report-only; fixing a corrupted bracket means
/// deciding which feed was wrong, and that's a human call.
fn main() -> anyhow::Result<()> {
    dotenv::dotenv()?;
    let uuid = std::env::args()
        .nth(1)
        .ok_or(anyhow::anyhow!("Usage: find_duplicate_semifinal_slots <tournament-uuid>"))?;

    let mut db = raw_diesel_cxn_from_env()?;
    let tournament = Tournament::get_by_uuid(&uuid, &mut db)?
        .ok_or(anyhow::anyhow!("No tournament with uuid {uuid}"))?;

    let mut clean = true;
    let mut semifinal_seats: Vec<(String, i32)> = vec![];
    for (stage, match_number) in [
        (Stage::Semifinals, 1),
        (Stage::Semifinals, 2),
        (Stage::GrandFinal, 1),
    ] {
        let Some(m) = Match::get_by_seat(&tournament, stage, match_number, &mut db)? else {
            println!("Missing {stage} match {match_number}?!");
            continue;
        };
        if let (Some(p1), Some(p2)) = (m.player_1_id, m.player_2_id) {
            if p1 == p2 {
                clean = false;
                println!(
                    "{stage} match {match_number} (id {}) has player {p1} on both sides",
                    m.id
                );
            }
        }
        if stage == Stage::Semifinals {
            if let Some(p) = m.player_1_id {
                seat(&mut semifinal_seats, match_number, 1, p);
            }
            if let Some(p) = m.player_2_id {
                seat(&mut semifinal_seats, match_number, 2, p);
            }
        }
    }

    // a player can legitimately appear in a semifinal and then the grand
    // final, but never in two semifinal seats
    for (player_id, dupes) in semifinal_seats
        .iter()
        .into_group_map_by(|(_, player_id)| *player_id)
        .into_iter()
        .filter(|(_, seats)| seats.len() > 1)
        .sorted_by_key(|(player_id, _)| *player_id)
    {
        clean = false;
        println!("Player {player_id} holds {} semifinal seats:", dupes.len());
        for (description, _) in dupes {
            println!("  {description}");
        }
    }
    if clean {
        println!("No duplicate assignments found");
    }
    Ok(())
}

fn seat(seats: &mut Vec<(String, i32)>, match_number: i32, side: i32, player_id: i32) {
    seats.push((
        format!("semifinal {match_number} player {side}"),
        player_id,
    ));
}
