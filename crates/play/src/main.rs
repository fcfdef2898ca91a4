//! Nim play and arena runner for the mcgraph search engine.
//!
//! Plays normal-play Nim with the engine in seat 0 and random movers (or more
//! engines) in the other seats. Progress goes through `tracing`; set
//! `RUST_LOG=mcgraph_mcts=trace` to watch individual search iterations.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use mcgraph_core::GameRule;
use mcgraph_mcts::{
    games::{Nim, NimMove, NimState},
    Mcts, MctsConfig, RandomPlayout, Transpositions,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info};

/// mcgraph Nim player.
#[derive(Parser)]
#[command(name = "mcgraph-play")]
#[command(about = "Play Nim with a transposition-aware Monte Carlo search engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game and print every move.
    Play {
        #[command(flatten)]
        game: GameArgs,

        /// Who plays the seats after seat 0.
        #[arg(long, value_enum, default_value = "random")]
        opponent: Opponent,
    },

    /// Play many games in parallel against random movers and tally the winners.
    Arena {
        #[command(flatten)]
        game: GameArgs,

        /// Number of games to play.
        #[arg(short, long, default_value = "100")]
        games: usize,
    },
}

/// Settings shared by every subcommand.
#[derive(Args, Clone, Debug)]
struct GameArgs {
    /// Comma-separated starting heap sizes.
    #[arg(long, default_value = "3,4,5", value_delimiter = ',')]
    heaps: Vec<u32>,

    /// Number of players taking turns.
    #[arg(short, long, default_value = "2")]
    players: usize,

    /// Search iterations per engine move.
    #[arg(short, long, default_value = "1000")]
    iterations: usize,

    /// Random seed for reproducibility.
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Register every expanded position so all move orders share statistics.
    #[arg(long)]
    register_transpositions: bool,
}

impl GameArgs {
    /// Reject settings that leave nothing to play.
    fn validate(&self) -> Result<()> {
        if self.players == 0 {
            bail!("at least one player is required");
        }
        if self.heaps.iter().all(|&h| h == 0) {
            bail!("starting heaps {:?} leave no move to play", self.heaps);
        }
        Ok(())
    }

    fn config(&self) -> MctsConfig {
        let transpositions = if self.register_transpositions {
            Transpositions::Register
        } else {
            Transpositions::Lookup
        };
        MctsConfig {
            num_iterations: self.iterations,
            transpositions,
        }
    }

    fn start(&self) -> NimState {
        NimState::new(self.heaps.clone())
    }
}

/// Mover for the seats after seat 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Opponent {
    Random,
    Engine,
}

/// A finished game.
#[derive(Debug)]
struct GameRecord {
    /// (seat, move) in play order.
    moves: Vec<(usize, NimMove)>,

    /// Seat that took the last object.
    winner: usize,
}

/// Let the engine pick the next position.
fn engine_move(game: &Nim, state: &NimState, config: &MctsConfig, seed: u64) -> Result<NimState> {
    let playout = RandomPlayout::new(ChaCha8Rng::seed_from_u64(seed));
    let mut mcts = Mcts::new(game.clone(), state.clone(), config.clone(), playout)?;
    let result = mcts
        .run()
        .with_context(|| format!("search failed from {}", state))?;

    for child in &result.children {
        debug!(
            state = %child.state,
            visits = child.stats.visit_count,
            wins = ?child.stats.win_count,
            "root child"
        );
    }

    Ok(result.best_state)
}

/// Play one game from `start`. Seat 0 always uses the engine.
fn play_game(
    game: &Nim,
    start: &NimState,
    config: &MctsConfig,
    opponent: Opponent,
    seed: u64,
) -> Result<GameRecord> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut state = start.clone();
    let mut moves = Vec::new();
    let mut seat = 0;

    while !game.is_end(&state) {
        let next = if seat == 0 || opponent == Opponent::Engine {
            let search_seed = seed.wrapping_add(moves.len() as u64 + 1);
            engine_move(game, &state, config, search_seed)?
        } else {
            game.random_child(&state, &mut rng)
                .context("random mover found no move")?
        };

        let mv = state
            .move_to(&next)
            .with_context(|| format!("illegal transition {} -> {}", state, next))?;
        debug!(seat, %mv, from = %state, to = %next, "move");

        moves.push((seat, mv));
        state = next;
        seat = game.next_player(seat);
    }

    // Normal play: whoever moved last wins
    let winner = moves
        .last()
        .map(|&(seat, _)| seat)
        .context("game ended before any move")?;

    Ok(GameRecord { moves, winner })
}

/// Run the play command.
fn cmd_play(args: GameArgs, opponent: Opponent) -> Result<()> {
    args.validate()?;
    let game = Nim::new(args.players);
    let start = args.start();
    let config = args.config();

    println!(
        "Nim {} with {} players, {} iterations/move ({:?} opponent)",
        start, args.players, args.iterations, opponent
    );

    let record = play_game(&game, &start, &config, opponent, args.seed)?;

    let mut state = start;
    for (ply, (seat, mv)) in record.moves.iter().enumerate() {
        state = state
            .apply(*mv)
            .with_context(|| format!("recorded move {} does not apply to {}", mv, state))?;
        println!("{:>3}. seat {}: {:<22} -> {}", ply + 1, seat, mv.to_string(), state);
    }
    println!("\nSeat {} takes the last object and wins", record.winner);

    Ok(())
}

/// Run the arena command.
fn cmd_arena(args: GameArgs, games: usize) -> Result<()> {
    args.validate()?;
    let game = Nim::new(args.players);
    let start = args.start();
    let config = args.config();

    info!(
        games,
        players = args.players,
        iterations = args.iterations,
        heaps = %start,
        "starting arena"
    );
    let started = Instant::now();

    let records: Vec<GameRecord> = (0..games)
        .into_par_iter()
        .map(|i| {
            let game_seed = args.seed.wrapping_add(i as u64 * 1000);
            play_game(&game, &start, &config, Opponent::Random, game_seed)
                .with_context(|| format!("game {} failed", i))
        })
        .collect::<Result<_>>()?;

    let mut wins = vec![0usize; args.players];
    for record in &records {
        wins[record.winner] += 1;
    }
    let total_moves: usize = records.iter().map(|r| r.moves.len()).sum();

    println!("Completed {} games in {:.2}s", games, started.elapsed().as_secs_f64());
    if games > 0 {
        println!(
            "Average game length: {:.1} moves",
            total_moves as f64 / games as f64
        );
    }
    for (seat, count) in wins.iter().enumerate() {
        let label = if seat == 0 { "engine" } else { "random" };
        let share = if games > 0 {
            *count as f64 / games as f64 * 100.0
        } else {
            0.0
        };
        println!("Seat {} ({}): {} wins ({:.1}%)", seat, label, count, share);
    }
    if start.nim_sum() == 0 && args.players == 2 {
        println!("Note: {} is a lost start for seat 0 under perfect play", start);
    }

    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mcgraph_play=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play { game, opponent } => cmd_play(game, opponent),
        Commands::Arena { game, games } => cmd_arena(game, games),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(heaps: Vec<u32>, players: usize) -> GameArgs {
        GameArgs {
            heaps,
            players,
            iterations: 100,
            seed: 42,
            register_transpositions: false,
        }
    }

    #[test]
    fn test_cli_parses_arena() {
        let cli = Cli::try_parse_from([
            "mcgraph-play",
            "arena",
            "--heaps",
            "1,2,3",
            "-p",
            "3",
            "--games",
            "8",
            "--register-transpositions",
        ])
        .unwrap();

        match cli.command {
            Commands::Arena { game, games } => {
                assert_eq!(game.heaps, vec![1, 2, 3]);
                assert_eq!(game.players, 3);
                assert_eq!(games, 8);
                assert_eq!(game.config().transpositions, Transpositions::Register);
            }
            Commands::Play { .. } => panic!("expected arena"),
        }
    }

    #[test]
    fn test_validate() {
        assert!(args(vec![3, 4], 2).validate().is_ok());
        assert!(args(vec![0, 0], 2).validate().is_err());
        assert!(args(vec![], 2).validate().is_err());
        assert!(args(vec![1], 0).validate().is_err());
    }

    #[test]
    fn test_play_game_replays_to_end() {
        let args = args(vec![2, 3], 2);
        let game = Nim::new(args.players);
        let record = play_game(&game, &args.start(), &args.config(), Opponent::Random, 7).unwrap();

        let mut state = args.start();
        for (ply, (seat, mv)) in record.moves.iter().enumerate() {
            assert_eq!(*seat, ply % 2);
            state = state.apply(*mv).unwrap();
        }
        assert!(game.is_end(&state));
        assert_eq!(record.winner, record.moves.last().unwrap().0);
    }

    #[test]
    fn test_engine_wins_from_single_heap() {
        // Seat 0 can take everything at once
        let args = args(vec![4], 2);
        let game = Nim::new(args.players);
        let record = play_game(&game, &args.start(), &args.config(), Opponent::Engine, 3).unwrap();

        assert_eq!(record.moves.len(), 1);
        assert_eq!(record.winner, 0);
    }
}
