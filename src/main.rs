use std::fs::{self, File};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use grid_snake::arena::Arena;
use grid_snake::config::{FRAME_INTERVAL_MS, GameConfig, THEME_CLASSIC, data_dir};
use grid_snake::error::AppError;
use grid_snake::input::{GameInput, InputHandler};
use grid_snake::level::{BuiltinLevels, LevelDirectory, LevelProvider};
use grid_snake::renderer;
use grid_snake::score::{HighScores, load_high_scores, save_high_scores};
use grid_snake::session::{GameMode, SessionState};
use grid_snake::terminal_runtime::TerminalSession;
use log::{LevelFilter, error, info, warn};
use simplelog::{Config, WriteLogger};

const LOG_FILE_NAME: &str = "grid-snake.log";

#[derive(Debug, Parser)]
#[command(name = "grid-snake")]
#[command(version, about = "Tile-arena snake with path-planning AI opponents")]
struct Cli {
    /// Start this mode directly instead of showing the main menu.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Directory holding Level1.txt, Level2.txt, ... (built-in maps otherwise).
    #[arg(long = "levels-dir")]
    levels_dir: Option<PathBuf>,

    /// Path to config.json (platform config directory otherwise).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for target placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Log file path (platform data directory otherwise).
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Log level filter.
    #[arg(long = "log-level", default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Single,
    Coop,
    Pvp,
    Pvai,
    Coopai,
}

impl From<ModeArg> for GameMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Single => Self::SinglePlayer,
            ModeArg::Coop => Self::Coop,
            ModeArg::Pvp => Self::PvP,
            ModeArg::Pvai => Self::PvAI,
            ModeArg::Coopai => Self::CoopAI,
        }
    }
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_logging(&cli)?;
    info!("starting grid-snake");

    let config = match &cli.config {
        Some(path) => GameConfig::load_from_path(path)?,
        None => GameConfig::load()?,
    };
    let high_scores = load_high_scores().unwrap_or_else(|error| {
        eprintln!("Ignoring unreadable high scores: {error}");
        warn!("ignoring unreadable high scores: {error}");
        HighScores::default()
    });
    let provider: Box<dyn LevelProvider> = match &cli.levels_dir {
        Some(root) => Box::new(LevelDirectory::new(root.clone())),
        None => Box::new(BuiltinLevels),
    };
    let seed = cli.seed.unwrap_or_else(clock_seed);
    info!("target seed {seed}");

    let arena = Arena::new(provider, config, seed);
    run(arena, high_scores, cli.mode.map(GameMode::from))
}

fn run<P: LevelProvider>(
    mut arena: Arena<P>,
    mut high_scores: HighScores,
    start_mode: Option<GameMode>,
) -> Result<(), AppError> {
    let mut terminal = TerminalSession::enter()?;
    let mut input = InputHandler::new();
    let frame_interval = Duration::from_millis(FRAME_INTERVAL_MS);

    if let Some(mode) = start_mode {
        start(&mut arena, mode);
    }

    let mut last_frame = Instant::now();
    let mut last_state = arena.session().state();

    loop {
        terminal
            .terminal_mut()
            .draw(|frame| renderer::render(frame, &arena, &high_scores, &THEME_CLASSIC))?;

        let elapsed = last_frame.elapsed();
        let timeout = frame_interval.saturating_sub(elapsed);
        if let Some(game_input) = input.poll_input(timeout)? {
            if game_input == GameInput::Quit {
                break;
            }
            handle_input(&mut arena, game_input);
        }

        let now = Instant::now();
        let delta = now.duration_since(last_frame);
        if delta >= frame_interval {
            let _ = arena.tick(delta.as_secs_f32());
            last_frame = now;
        }

        let state = arena.session().state();
        if state != last_state {
            if state == SessionState::Ended {
                record_high_score(&arena, &mut high_scores);
            }
            last_state = state;
        }
    }

    info!("shutting down");
    Ok(())
}

fn handle_input<P: LevelProvider>(arena: &mut Arena<P>, input: GameInput) {
    match (arena.session().state(), input) {
        (SessionState::MainMenu | SessionState::Ended, GameInput::SelectMode(mode)) => {
            start(arena, mode);
        }
        (SessionState::Paused | SessionState::Ended, GameInput::Confirm) => {
            let _ = arena.return_to_menu();
        }
        (_, GameInput::Pause) => {
            let _ = arena.toggle_pause();
        }
        (_, GameInput::Steer { player, direction }) => {
            let _ = arena.steer(player, direction);
        }
        (_, GameInput::Hop { player }) => arena.hop(player),
        _ => {}
    }
}

fn start<P: LevelProvider>(arena: &mut Arena<P>, mode: GameMode) {
    if let Err(error) = arena.start(mode) {
        error!("could not start {}: {error}", mode.label());
    }
}

fn record_high_score<P: LevelProvider>(arena: &Arena<P>, high_scores: &mut HighScores) {
    let session = arena.session();
    if !high_scores.submit(session.mode(), session.best_score()) {
        return;
    }

    info!(
        "new {} high score {}",
        session.mode().label(),
        session.best_score()
    );
    if let Err(error) = save_high_scores(high_scores) {
        warn!("failed to save high scores: {error}");
    }
}

fn init_logging(cli: &Cli) -> Result<(), AppError> {
    let path = match &cli.log_file {
        Some(path) => path.clone(),
        None => {
            let dir = data_dir();
            fs::create_dir_all(&dir)?;
            dir.join(LOG_FILE_NAME)
        }
    };

    WriteLogger::init(cli.log_level, Config::default(), File::create(path)?)?;
    Ok(())
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}
