use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sokoban::moves::ALL_DIRECTIONS;
use sokoban::{Direction, EngineConfig, Level, LevelState, LevelsSet, Size};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sokoban")]
#[command(about = "Play Sokoban levels from the command line", long_about = None)]
struct Args {
    /// Path to the levels file (XSB format)
    #[arg(value_name = "FILE")]
    levels_file: PathBuf,

    /// Level number to play (1-indexed)
    #[arg(value_name = "LEVEL")]
    level: Option<usize>,

    /// Path to the engine config file (TOML)
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the maximal level width
    #[arg(long)]
    width: Option<usize>,

    /// Override the maximal level height
    #[arg(long)]
    height: Option<usize>,

    /// Moves to play, in LURD notation
    #[arg(short, long, default_value = "")]
    moves: String,

    /// Number of moves to take back after playing
    #[arg(short, long, default_value = "0")]
    undo: usize,

    /// Number of taken-back moves to repeat
    #[arg(short, long, default_value = "0")]
    redo: usize,

    /// Number of random moves to make after everything else
    #[arg(long, default_value = "0")]
    walk: usize,

    /// Seed for the random walk
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Allow selecting levels that are not playable
    #[arg(long, default_value = "false")]
    all_levels: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_lurd(moves: &str) -> Result<Vec<Direction>, char> {
    moves
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| Direction::from_lurd(ch).ok_or(ch))
        .collect()
}

fn play_moves(level: &Level, moves: &[Direction]) {
    for (i, &dir) in moves.iter().enumerate() {
        let result = level.move_worker(dir);
        if result.is_nothing() {
            warn!(step = i + 1, %dir, "move blocked");
        }
    }
}

fn random_walk(level: &Level, steps: usize, seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut made = 0;
    for _ in 0..steps {
        let dir = ALL_DIRECTIONS[rng.gen_range(0..ALL_DIRECTIONS.len())];
        if !level.move_worker(dir).is_nothing() {
            made += 1;
        }
    }
    info!(steps, made, seed, "random walk finished");
}

fn print_level(level: &Level) {
    println!("\nLevel {} - {}:\n{}", level.id(), level.name(), level);
    println!(
        "moves: {:<5}  pushes: {:<5}  history: {:<5}  boxes on goals: {}/{}  completed: {}",
        level.moves_count(),
        level.pushes_count(),
        level.moves_history_count(),
        level.boxes_on_goals_count(),
        level.boxes_count(),
        if level.is_completed() { 'Y' } else { 'N' },
    );
    let lurd = level.history_lurd();
    if !lurd.is_empty() {
        println!("lurd: {}", lurd);
    }
}

fn main() {
    init_tracing();
    let args = Args::parse();

    let mut config = EngineConfig::load_or_default(&args.config);
    if let Some(width) = args.width {
        config.maximal_size.width = width;
    }
    if let Some(height) = args.height {
        config.maximal_size.height = height;
    }
    if args.all_levels {
        config.playable_only = false;
    }
    let Size { width, height } = config.maximal_size;
    if width == 0 || height == 0 {
        eprintln!("Error: maximal level size must be at least 1x1");
        std::process::exit(1);
    }

    // Load levels from file
    let mut levels = match LevelsSet::from_file(&args.levels_file) {
        Ok(levels) => levels,
        Err(e) => {
            eprintln!("Error loading levels: {}", e);
            std::process::exit(1);
        }
    };

    let playable = levels.initialize_all(config.maximal_size);
    println!("{} of {} levels are playable", playable, levels.len());
    for state in [LevelState::OutOfBounds, LevelState::Corrupted] {
        let count = levels.levels_count_by_state(state);
        if count > 0 {
            println!("  {}: {}", state, count);
        }
    }

    // Validate level number
    let selected = match args.level {
        Some(0) => {
            eprintln!("Error: level numbers must be at least 1");
            std::process::exit(1);
        }
        Some(number) => levels.set_current_by_index(number - 1, config.playable_only),
        None if config.playable_only => levels
            .current_index()
            .filter(|&index| levels.get(index).is_some_and(Level::is_playable))
            .map(Ok)
            .unwrap_or_else(|| levels.go_to_next(true)),
        None => levels.set_current_by_index(0, false),
    };
    if let Err(e) = selected {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    let Some(level) = levels.current_level() else {
        eprintln!("Error: no level selected");
        std::process::exit(1);
    };
    if !level.is_playable() {
        eprintln!(
            "Error: level {} is not playable ({})",
            level.id(),
            level.state()
        );
        std::process::exit(1);
    }

    let moves = match parse_lurd(&args.moves) {
        Ok(moves) => moves,
        Err(ch) => {
            eprintln!("Error: invalid move '{}' (expected one of l, u, r, d)", ch);
            std::process::exit(1);
        }
    };

    play_moves(level, &moves);
    if args.undo > 0 {
        if let Err(e) = level.take_back(args.undo) {
            error!(error = %e, "take back failed");
        }
    }
    if args.redo > 0 {
        if let Err(e) = level.repeat_moves(args.redo) {
            error!(error = %e, "repeat failed");
        }
    }
    if args.walk > 0 {
        random_walk(level, args.walk, args.seed);
    }

    print_level(level);
}
