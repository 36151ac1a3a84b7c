//! Draughts-Rust: an English draughts engine.
//!
//! ## Usage
//!
//! - `draughts-rust` - Play against the engine on the console
//! - `draughts-rust play --black computer --white human` - Choose the players
//! - `draughts-rust selfplay --games 10` - Let the engine play itself
//! - `draughts-rust show` - Print the starting position

use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use draughts_rust::console::Console;
use draughts_rust::constants::{DEFAULT_DEPTH, MAX_GAME_LEN};
use draughts_rust::game::{Game, Level, PlayerType};
use draughts_rust::position::{Board, Side};

/// Draughts-Rust: an English draughts engine
#[derive(Parser)]
#[command(name = "draughts-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game through the console command loop
    Play {
        /// Search depth in plies
        #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
        depth: u32,
        /// Who plays Black
        #[arg(long, default_value = "human")]
        black: PlayerType,
        /// Who plays White
        #[arg(long, default_value = "computer")]
        white: PlayerType,
    },
    /// Let the engine play against itself
    Selfplay {
        /// Number of games
        #[arg(short, long, default_value_t = 1)]
        games: usize,
        /// Search depth in plies
        #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
        depth: u32,
        /// Random plies played at the start of each game
        #[arg(short, long, default_value_t = 2)]
        random_plies: usize,
        /// Seed for the random opening plies
        #[arg(short, long, default_value_t = 1)]
        seed: u64,
    },
    /// Print the starting position
    Show,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Play { depth, black, white }) => run_play(depth, black, white),
        Some(Commands::Selfplay {
            games,
            depth,
            random_plies,
            seed,
        }) => run_selfplay(games, depth, random_plies, seed),
        Some(Commands::Show) => {
            print!("{}", Board::new());
            Ok(())
        }
        None => run_play(DEFAULT_DEPTH, PlayerType::Human, PlayerType::Computer),
    }
}

fn run_play(depth: u32, black: PlayerType, white: PlayerType) -> Result<()> {
    let mut game = Game::new();
    game.set_level(Level::new(depth)?);
    game.set_player_type(Side::Black, black);
    game.set_player_type(Side::White, white);

    println!("Draughts-Rust: type 'help' for commands\n");
    println!("{}", game.board());

    let mut console = Console::new(game);
    let stdin = io::stdin();
    console.run(stdin.lock(), io::stdout())
}

fn run_selfplay(games: usize, depth: u32, random_plies: usize, seed: u64) -> Result<()> {
    let level = Level::new(depth)?;
    let mut wins = [0usize; 2];
    let mut draws = 0;

    for i in 0..games {
        let mut game = Game::with_seed(seed.wrapping_add(i as u64));
        game.set_level(level);
        game.set_player_type(Side::Black, PlayerType::Computer);
        game.set_player_type(Side::White, PlayerType::Computer);

        let mut record = Vec::new();
        while !game.is_game_over() && game.ply() < MAX_GAME_LEN {
            let player = if game.ply() < random_plies {
                PlayerType::Random
            } else {
                PlayerType::Computer
            };
            let Some(mv) = game.choose_move(player) else {
                break;
            };
            game.play(&mv);
            record.push(mv.to_string());
        }

        let outcome = match game.winner() {
            Some(side) => {
                wins[side.index()] += 1;
                format!("{side} wins")
            }
            None => {
                draws += 1;
                "draw".to_string()
            }
        };
        info!(game = i + 1, plies = game.ply(), %outcome, "selfplay game finished");
        println!("game {}: {outcome} after {} plies", i + 1, game.ply());
        println!("  {}", record.join(" "));
    }

    println!(
        "black {} - white {} - draws {draws}",
        wins[Side::Black.index()],
        wins[Side::White.index()]
    );
    Ok(())
}
