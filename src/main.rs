//! Plays a game between the Monte Carlo Tree Search bot and an opponent and
//! prints every move.

use std::fmt::Display;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use flexi_logger::Logger;
use log::{debug, info};
use playout::game::{Game, Outcome};
use playout::games::nim::Nim;
use playout::games::tictactoe::{Board, TicTacToe};
use playout::games::Player;
use playout::mcts::{self, Config};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum GameKind {
    Tictactoe,
    Nim,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Opponent {
    /// Picks uniformly random legal moves.
    Random,
    /// Searches with the same parameters as the first player.
    Mcts,
}

/// Plays a single game between a Monte Carlo Tree Search bot and an opponent.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[arg(long, value_enum, default_value_t = GameKind::Tictactoe)]
    game: GameKind,
    #[arg(long, value_enum, default_value_t = Opponent::Random)]
    opponent: Opponent,
    /// Side played by the bot: `red` (moves first) or `blue`.
    #[arg(long, default_value = "red", value_parser = parse_player)]
    bot: Player,
    /// Search iterations per move.
    #[arg(long, default_value_t = Config::DEFAULT_ITERATIONS)]
    iterations: u32,
    /// Exploration constant of the scoring formula.
    #[arg(long, default_value_t = Config::DEFAULT_EXPLORATION)]
    exploration: f64,
    /// Seed for every random decision, both in search and by the opponent.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Starting heap size for Nim.
    #[arg(long, default_value_t = 15)]
    heap: u32,
    /// Starting tic-tac-toe position, e.g. `RB./.R./..B`.
    #[arg(long)]
    board: Option<String>,
}

fn parse_player(name: &str) -> anyhow::Result<Player> {
    Player::try_from(name)
}

fn play<G>(game: &G, mut state: G::State, args: &Args) -> anyhow::Result<()>
where
    G: Game<Player = Player>,
    G::State: Display,
    G::Action: Display,
{
    let config = Config::default()
        .with_iterations(args.iterations)
        .with_exploration(args.exploration);
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(args.seed);
    let bot = args.bot;

    println!("start: {state}");
    while !game.is_ended(&state) {
        let player = game.current_player(&state);
        let action = if player == bot || args.opponent == Opponent::Mcts {
            let timer = Instant::now();
            let action = mcts::think(game, &state, &config, &mut rng)
                .with_context(|| format!("failed to choose a move for {player} at {state}"))?;
            debug!("{player} searched for {:?}", timer.elapsed());
            action
        } else {
            game.legal_actions(&state)
                .choose(&mut rng)
                .cloned()
                .with_context(|| format!("no legal moves for {player} at {state}"))?
        };
        println!("{player} plays {action}");
        state = game.next_state(&state, &action);
    }
    println!("final: {state}");

    let outcome = game
        .win_values(&state)
        .get(&bot)
        .copied()
        .and_then(Outcome::from_win_value)
        .with_context(|| format!("no valid payoff for {bot}"))?;
    info!("game finished after reaching {state}");
    println!(
        "result: {bot} {}",
        match outcome {
            Outcome::Win => "wins",
            Outcome::Draw => "draws",
            Outcome::Loss => "loses",
        }
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _logger = Logger::try_with_env_or_str("info")?.start()?;
    playout::print_binary_info();

    match args.game {
        GameKind::Tictactoe => {
            let board = match &args.board {
                Some(board) => Board::try_from(board.as_str())?,
                None => Board::empty(),
            };
            play(&TicTacToe, board, &args)
        },
        GameKind::Nim => play(&Nim::default(), Nim::start(args.heap), &args),
    }
}
