//! earshot - terminal ear-training game
//!
//! Run with: cargo run -- --difficulty medium

mod app;
mod audio;
mod ui;

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use earshot::{
    scores::{HighScores, JsonFileStore},
    Difficulty,
};

use app::{App, AppConfig};

#[derive(Parser, Debug)]
#[command(name = "earshot", version, about = "Name the note you just heard")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    play: PlayArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a game (the default)
    Play(PlayArgs),
    /// Print the high-score table and exit
    Scores {
        /// Score file to read
        #[arg(long)]
        scores: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
struct PlayArgs {
    /// Name recorded with the score
    #[arg(long, env = "EARSHOT_PLAYER", default_value = "player")]
    player: String,

    /// easy, medium or hard
    #[arg(long, short, default_value_t = Difficulty::Easy)]
    difficulty: Difficulty,

    /// Button device to read channel numbers from (e.g. /dev/ttyACM0)
    #[arg(long)]
    device: Option<PathBuf>,

    /// Score file (defaults to the user data directory)
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Seed for reproducible targets
    #[arg(long)]
    seed: Option<u64>,

    /// Play without opening an audio device
    #[arg(long)]
    mute: bool,

    /// Log file (defaults to the user data directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Scores { scores }) => print_scores(scores),
        Some(Command::Play(args)) => play(args),
        None => play(cli.play),
    }
}

fn data_dir() -> EyreResult<PathBuf> {
    let dir = dirs::data_dir()
        .ok_or_else(|| eyre!("unable to determine the user data directory"))?
        .join("earshot");
    fs::create_dir_all(&dir)
        .wrap_err_with(|| format!("failed to create {}", dir.display()))?;
    Ok(dir)
}

fn scores_path(explicit: Option<PathBuf>) -> EyreResult<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(data_dir()?.join("scores.json")),
    }
}

/// Route tracing to a file; the terminal belongs to the UI.
fn init_logging(explicit: Option<PathBuf>) -> EyreResult<()> {
    let path = match explicit {
        Some(path) => path,
        None => data_dir()?.join("earshot.log"),
    };
    let file = File::options()
        .create(true)
        .append(true)
        .open(&path)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("earshot=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|err| eyre!("failed to install log subscriber: {err}"))?;
    Ok(())
}

fn play(args: PlayArgs) -> EyreResult<()> {
    init_logging(args.log_file.clone())?;

    let path = scores_path(args.scores)?;
    let store = JsonFileStore::open(&path)
        .wrap_err_with(|| format!("failed to open score file {}", path.display()))?;

    let config = AppConfig {
        player: args.player,
        difficulty: args.difficulty,
        device: args.device,
        seed: args.seed,
        mute: args.mute,
    };

    let mut terminal = ratatui::init();
    let result = App::new(config, store).and_then(|mut app| app.run(&mut terminal));
    ratatui::restore();
    result
}

fn print_scores(explicit: Option<PathBuf>) -> EyreResult<()> {
    let path = scores_path(explicit)?;
    let table = HighScores::new(JsonFileStore::open(&path)?);
    let records = table.records()?;

    if records.is_empty() {
        println!("No scores yet.");
        return Ok(());
    }

    println!("{:<3} {:<16} {:<7} {:>6} {:>5}  {}", "#", "player", "level", "score", "%", "when");
    for (rank, record) in records.iter().enumerate() {
        println!(
            "{:<3} {:<16} {:<7} {:>3}/{:<2} {:>4}%  {}",
            rank + 1,
            record.player,
            record.difficulty.label(),
            record.score,
            record.total_rounds,
            record.percentage,
            record.recorded_at.format("%Y-%m-%d %H:%M"),
        );
    }
    Ok(())
}
