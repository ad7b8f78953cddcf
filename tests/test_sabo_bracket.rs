use diesel::SqliteConnection;
use itertools::Itertools;
use sabo_arena_bot::bracket::scoring::submit_score;
use sabo_arena_bot::bracket::stage::Stage;
use sabo_arena_bot::bracket::summary;
use sabo_arena_bot::constants::FULL_FIELD_SIZE;
use sabo_arena_bot::models::matches::Match;
use sabo_arena_bot::models::player::NewPlayer;
use sabo_arena_bot::models::tournament::{NewTournament, Tournament};

mod common;

fn build_tournament(db: &mut SqliteConnection) -> Result<Tournament, anyhow::Error> {
    let mut tournament = NewTournament::new("integration test").save(db)?;
    for i in 0..FULL_FIELD_SIZE {
        let player = NewPlayer::new(format!("player_{i}")).save(db)?;
        tournament.register(&player, db)?;
    }
    tournament.generate_bracket(db)?;
    Ok(tournament)
}

fn seat(
    t: &Tournament,
    stage: Stage,
    n: i32,
    db: &mut SqliteConnection,
) -> Result<Match, anyhow::Error> {
    Match::get_by_seat(t, stage, n, db)?.ok_or(anyhow::anyhow!("No {stage} match {n}?!?"))
}

/// plays out every match of a stage; player 1 wins the odd match numbers
fn play_stage(
    t: &Tournament,
    stage: Stage,
    db: &mut SqliteConnection,
) -> Result<(), anyhow::Error> {
    for n in 1..=stage.match_count() {
        let m = seat(t, stage, n, db)?;
        if n % 2 == 1 {
            submit_score(m.id, 2, 1, db)?;
        } else {
            submit_score(m.id, 1, 2, db)?;
        }
    }
    Ok(())
}

#[test]
fn test_full_playthrough() -> Result<(), anyhow::Error> {
    let mut db = common::start_db()?;
    let tournament = build_tournament(&mut db)?;

    play_stage(&tournament, Stage::WinnersRound(1), &mut db)?;
    // winners pair off into round 2; losers drop to branch A
    for n in 1..=4 {
        assert!(seat(&tournament, Stage::WinnersRound(2), n, &mut db)?.players_assigned());
        assert!(seat(&tournament, Stage::LosersBranchA(1), n, &mut db)?.players_assigned());
    }

    play_stage(&tournament, Stage::WinnersRound(2), &mut db)?;
    for n in 1..=2 {
        assert!(seat(&tournament, Stage::WinnersRound(3), n, &mut db)?.players_assigned());
        assert!(seat(&tournament, Stage::LosersBranchB(1), n, &mut db)?.players_assigned());
    }

    play_stage(&tournament, Stage::WinnersRound(3), &mut db)?;
    // each winners final seeds its semifinal's player 1 seat; each loser gets
    // a second chance in branch B round 2
    for n in 1..=2 {
        let winners_final = seat(&tournament, Stage::WinnersRound(3), n, &mut db)?;
        let semifinal = seat(&tournament, Stage::Semifinals, n, &mut db)?;
        assert_eq!(winners_final.winner_id, semifinal.player_1_id);
        assert_eq!(None, semifinal.player_2_id);
        let second_chance = seat(&tournament, Stage::LosersBranchB(2), n, &mut db)?;
        assert_eq!(winners_final.loser_id(), second_chance.player_2_id);
    }

    play_stage(&tournament, Stage::LosersBranchA(1), &mut db)?;
    play_stage(&tournament, Stage::LosersBranchA(2), &mut db)?;
    play_stage(&tournament, Stage::LosersBranchA(3), &mut db)?;
    // the branch A champion takes semifinal 1's player 2 seat
    let branch_a_final = seat(&tournament, Stage::LosersBranchA(3), 1, &mut db)?;
    let semifinal_1 = seat(&tournament, Stage::Semifinals, 1, &mut db)?;
    assert_eq!(branch_a_final.winner_id, semifinal_1.player_2_id);

    play_stage(&tournament, Stage::LosersBranchB(1), &mut db)?;
    play_stage(&tournament, Stage::LosersBranchB(2), &mut db)?;
    play_stage(&tournament, Stage::LosersBranchB(3), &mut db)?;
    let branch_b_final = seat(&tournament, Stage::LosersBranchB(3), 1, &mut db)?;
    let semifinal_2 = seat(&tournament, Stage::Semifinals, 2, &mut db)?;
    assert_eq!(branch_b_final.winner_id, semifinal_2.player_2_id);

    // four distinct players across the four semifinal seats
    let semifinal_1 = seat(&tournament, Stage::Semifinals, 1, &mut db)?;
    let finalists = vec![
        semifinal_1.player_1_id,
        semifinal_1.player_2_id,
        semifinal_2.player_1_id,
        semifinal_2.player_2_id,
    ];
    assert!(finalists.iter().all(|p| p.is_some()));
    assert_eq!(4, finalists.iter().unique().count());

    // semifinal 1 goes 2-1 to player 1, who must land in the grand final's
    // player 1 seat
    let sf1_winner = submit_score(semifinal_1.id, 2, 1, &mut db)?;
    assert_eq!(semifinal_1.player_1_id, Some(sf1_winner));
    let grand_final = seat(&tournament, Stage::GrandFinal, 1, &mut db)?;
    assert_eq!(Some(sf1_winner), grand_final.player_1_id);

    let sf2_winner = submit_score(semifinal_2.id, 1, 2, &mut db)?;
    let grand_final = seat(&tournament, Stage::GrandFinal, 1, &mut db)?;
    assert_eq!(Some(sf2_winner), grand_final.player_2_id);

    let champion_id = submit_score(grand_final.id, 3, 2, &mut db)?;
    assert_eq!(Some(sf1_winner), Some(champion_id));

    let champion = summary::champion(&tournament, &mut db)?
        .ok_or(anyhow::anyhow!("No champion after the grand final?!?"))?;
    assert_eq!(champion_id, champion.id);

    let progress = summary::progress(&tournament, &mut db)?;
    assert_eq!(29, progress.total);
    assert!(progress.is_all_played());

    let tournament = Tournament::get_by_id(tournament.id, &mut db)?;
    assert!(tournament.is_finished()?);
    Ok(())
}

#[test]
fn test_progress_counts() -> Result<(), anyhow::Error> {
    let mut db = common::start_db()?;
    let tournament = build_tournament(&mut db)?;

    let progress = summary::progress(&tournament, &mut db)?;
    assert_eq!(29, progress.total);
    assert_eq!(29, progress.pending);
    assert_eq!(0, progress.completed);

    let m = seat(&tournament, Stage::WinnersRound(1), 1, &mut db)?;
    submit_score(m.id, 2, 0, &mut db)?;
    let progress = summary::progress(&tournament, &mut db)?;
    assert_eq!(1, progress.completed);
    assert_eq!(28, progress.pending);
    assert!(!progress.is_all_played());
    Ok(())
}
