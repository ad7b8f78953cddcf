use anyhow::anyhow;
use clap::{Parser, Subcommand};
use diesel::SqliteConnection;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;

use sabo_arena_bot::bracket::{advancement, scoring, summary};
use sabo_arena_bot::config::CONFIG;
use sabo_arena_bot::db::{raw_diesel_cxn_from_env, run_migrations};
use sabo_arena_bot::models::matches::{Match, MatchState};
use sabo_arena_bot::models::player::NewPlayer;
use sabo_arena_bot::models::tournament::{NewTournament, Tournament};

#[derive(Parser)]
#[command(name = "saboctl", about = "SABO bracket operations")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new tournament
    CreateTournament { name: String },
    /// Create a player and register them for a tournament
    AddPlayer {
        /// tournament uuid
        tournament: String,
        name: String,
    },
    /// Generate the full bracket for a tournament with a complete field
    GenerateBracket {
        /// tournament uuid
        tournament: String,
    },
    /// Move a fully-seated match to in progress
    StartMatch { match_id: i32 },
    /// Record a final score; the winner advances automatically
    SubmitScore {
        match_id: i32,
        player_1_score: i32,
        player_2_score: i32,
    },
    /// Re-fire advancement for a completed match (safe to repeat)
    Advance { match_id: i32 },
    /// Print the bracket, stage by stage
    Inspect {
        /// tournament uuid
        tournament: String,
    },
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logging()?;
    let cli = Cli::parse();

    let mut conn = raw_diesel_cxn_from_env()?;
    run_migrations(&mut conn).map_err(|e| anyhow!("Error running migrations: {e}"))?;

    match cli.command {
        Command::CreateTournament { name } => {
            let t = NewTournament::new(name).save(&mut conn)?;
            println!("Created tournament {} ({})", t.name, t.uuid);
        }
        Command::AddPlayer { tournament, name } => {
            let t = find_tournament(&tournament, &mut conn)?;
            let p = NewPlayer::new(name).save(&mut conn)?;
            t.register(&p, &mut conn)?;
            let field = t.players(&mut conn)?.len();
            println!("Registered {} ({}); field is now {field}", p.name, p.uuid);
        }
        Command::GenerateBracket { tournament } => {
            let mut t = find_tournament(&tournament, &mut conn)?;
            t.generate_bracket(&mut conn)?;
            println!("Bracket generated for {}", t.name);
        }
        Command::StartMatch { match_id } => {
            let mut m = get_match(match_id, &mut conn)?;
            m.start(&mut conn)?;
            println!("Started match {}: {}", m.id, m.title(&mut conn)?);
        }
        Command::SubmitScore {
            match_id,
            player_1_score,
            player_2_score,
        } => {
            let winner_id =
                scoring::submit_score(match_id, player_1_score, player_2_score, &mut conn)?;
            println!("Match {match_id} decided; winner is player {winner_id}");
        }
        Command::Advance { match_id } => {
            advancement::advance(match_id, &mut conn)?;
            println!("Advancement applied for match {match_id}");
        }
        Command::Inspect { tournament } => {
            let t = find_tournament(&tournament, &mut conn)?;
            inspect(&t, &mut conn)?;
        }
    }
    Ok(())
}

fn init_logging() -> anyhow::Result<()> {
    match &CONFIG.log4rs_conf_file {
        Some(path) => {
            log4rs::init_file(path, Default::default())?;
        }
        None => {
            let stdout = ConsoleAppender::builder()
                .encoder(Box::new(PatternEncoder::new("{d} {l} {t} - {m}{n}")))
                .build();
            let config = log4rs::config::Config::builder()
                .appender(Appender::builder().build("stdout", Box::new(stdout)))
                .build(Root::builder().appender("stdout").build(LevelFilter::Info))?;
            log4rs::init_config(config)?;
        }
    }
    Ok(())
}

fn find_tournament(uuid: &str, conn: &mut SqliteConnection) -> anyhow::Result<Tournament> {
    Tournament::get_by_uuid(uuid, conn)?.ok_or(anyhow!("No tournament with uuid {uuid}"))
}

fn get_match(match_id: i32, conn: &mut SqliteConnection) -> anyhow::Result<Match> {
    Match::get_by_id(match_id, conn)?.ok_or(anyhow!("No match with id {match_id}"))
}

fn inspect(t: &Tournament, conn: &mut SqliteConnection) -> anyhow::Result<()> {
    println!("{} ({})", t.name, t.uuid);
    for (stage, stage_matches) in summary::matches_by_stage(t, conn)? {
        if stage_matches.is_empty() {
            continue;
        }
        println!("{stage}:");
        for m in stage_matches {
            println!("  [{}] #{}: {}", m.id, m.match_number, describe(&m, conn)?);
        }
    }
    let progress = summary::progress(t, conn)?;
    println!(
        "{}/{} matches played ({} in progress)",
        progress.completed, progress.total, progress.in_progress
    );
    if let Some(champ) = summary::champion(t, conn)? {
        println!("Champion: {}", champ.name);
    }
    Ok(())
}

fn describe(m: &Match, conn: &mut SqliteConnection) -> anyhow::Result<String> {
    let title = m.title(conn)?;
    let line = match m.state()? {
        MatchState::Pending => format!("{title} (pending)"),
        MatchState::InProgress => format!("{title} (in progress)"),
        MatchState::Completed => format!(
            "{title} ({}-{})",
            m.player_1_score.unwrap_or(0),
            m.player_2_score.unwrap_or(0)
        ),
    };
    Ok(line)
}
