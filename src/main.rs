use anyhow::{anyhow, Result};
use clap::Parser;
use indicatif::ProgressBar;
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use std::io::{stdin, stdout, Write};
use std::path::PathBuf;

use connect4_engine::config::GameConfig;
use connect4_engine::difficulty::Difficulty;
use connect4_engine::game::{GameSession, GameStatus};
use connect4_engine::solver::Solver;

mod terminal;

#[derive(Parser, Debug)]
#[command(about = "Play Connect 4 against the computer")]
struct Args {
    /// Path to a TOML config file, defaults are used if it does not exist
    #[arg(short, long, default_value = "connect4.toml")]
    config: PathBuf,

    #[arg(long)]
    rows: Option<usize>,

    #[arg(long)]
    columns: Option<usize>,

    /// One of "easy", "medium", "hard"
    #[arg(short, long)]
    difficulty: Option<Difficulty>,

    /// Seed for the AI's random moves
    #[arg(long)]
    seed: Option<u64>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "warn")]
    log_level: LevelFilter,

    /// Print the game as JSON after every turn
    #[arg(long)]
    json: bool,

    /// Print the default configuration and exit
    #[arg(long)]
    print_config: bool,
}

enum Command {
    Move(usize),
    NewGame,
    SetDifficulty(Difficulty),
    Help,
    Quit,
}

fn parse_command(input: &str, columns: usize) -> Result<Command> {
    match input.to_lowercase().as_str() {
        "n" | "new" => return Ok(Command::NewGame),
        "q" | "quit" => return Ok(Command::Quit),
        "?" | "help" => return Ok(Command::Help),
        _ => {}
    }
    if let Ok(difficulty) = input.parse::<Difficulty>() {
        return Ok(Command::SetDifficulty(difficulty));
    }
    match input.parse::<usize>() {
        Ok(column) if (1..=columns).contains(&column) => Ok(Command::Move(column - 1)),
        Ok(column) => Err(anyhow!("Invalid column {}, expected 1 to {}", column, columns)),
        Err(_) => Err(anyhow!("Unknown command: {}", input)),
    }
}

fn print_help() {
    println!("Enter a column number to drop a piece");
    println!("  n      new game");
    println!("  e/m/h  switch to easy, medium or hard (takes effect on the next AI move)");
    println!("  q      quit\n");
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    initialize_logging(args.log_level);

    if args.print_config {
        print!("{}", GameConfig::default_toml()?);
        return Ok(());
    }

    let mut config = GameConfig::load_or_default(&args.config)?;
    if let Some(rows) = args.rows {
        config.rows = rows;
    }
    if let Some(columns) = args.columns {
        config.columns = columns;
    }
    if let Some(difficulty) = args.difficulty {
        config.difficulty = difficulty;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate()?;

    let seed = config.seed.unwrap_or_else(rand::random);
    info!(seed, rows = config.rows, columns = config.columns, "starting");

    let mut solver = Solver::seeded(seed);
    let mut session = GameSession::from_config(&config);
    let stdin = stdin();

    println!("Welcome to Connect 4\n");
    print_help();

    loop {
        terminal::display(&session)?;
        if args.json {
            println!("{}", serde_json::to_string(&session.view())?);
        }
        if session.status().is_over() {
            println!("{} (n for a new game, q to quit)", terminal::announce(session.status()));
        }

        print!("[{}] > ", session.difficulty());
        stdout().flush()?;
        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            break;
        }

        let command = match parse_command(input.trim(), config.columns) {
            Ok(command) => command,
            Err(err) => {
                println!("{}", err);
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => print_help(),
            Command::NewGame => session.reset(),
            Command::SetDifficulty(difficulty) => {
                session.set_difficulty(difficulty, config.profiles.get(difficulty).clone());
                println!("Difficulty set to {}", difficulty);
            }
            Command::Move(column) => match session.apply_player_move(column) {
                Err(err) => println!("{}", err),
                Ok(GameStatus::InProgress) => {
                    let task = session.begin_ai_move()?;

                    let spinner = ProgressBar::new_spinner();
                    spinner.set_message("AI is thinking...");
                    spinner.enable_steady_tick(100);
                    let (outcome, returned) = task
                        .spawn(solver)
                        .join()
                        .map_err(|_| anyhow!("AI search panicked"))?;
                    spinner.finish_and_clear();
                    solver = returned;

                    let column = outcome.result().column;
                    if session.finish_ai_move(outcome)? {
                        println!("AI plays {}", column + 1);
                    }
                }
                Ok(_) => {}
            },
        }
    }
    Ok(())
}
