//! Play command - human vs computer, or two humans, on the terminal
//!
//! ## Architecture
//!
//! - run(): set up the game and loop over turns
//! - human_turn() / ai_turn(): one move each
//! - parse_input(), render(): text I/O

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Args;

use kinrow_core::{AiConfig, AiPlayer, Board, Coord, Difficulty, Game, GameResult, Move, Placement, Player};

use crate::GameArgs;

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    #[command(flatten)]
    pub game: GameArgs,

    /// Computer strength: easy, medium or hard
    #[arg(long, default_value = "medium")]
    pub difficulty: Difficulty,

    /// Search depth for the hard tier
    #[arg(long, default_value = "4")]
    pub depth: u32,

    /// Let the computer move first
    #[arg(long, conflicts_with = "no_ai")]
    pub ai_first: bool,

    /// Two humans take turns (type `a` during the game to bring the computer in)
    #[arg(long)]
    pub no_ai: bool,
}

/// One line of player input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Input {
    Play(Move),
    Hint,
    Undo,
    ToggleAi,
    Quit,
}

// ============================================================================
// GAME LOOP
// ============================================================================

pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let config = args.game.load()?;
    let mut game = Game::new(config)?;

    let ai_config = AiConfig {
        difficulty: args.difficulty,
        depth: args.depth,
        seed,
        ..AiConfig::default()
    };
    ai_config.validate()?;
    let mut ai = AiPlayer::new(ai_config);

    // Side the computer plays, if any
    let mut ai_side = match (args.no_ai, args.ai_first) {
        (true, _) => None,
        (false, true) => Some(Player::A),
        (false, false) => Some(Player::B),
    };
    match ai_side {
        Some(side) => tracing::info!(
            "Starting {} vs {} AI (computer is {})",
            game.config().name,
            args.difficulty,
            side
        ),
        None => tracing::info!("Starting {} for two players", game.config().name),
    }
    print_help(game.board().placement());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        match game.result() {
            GameResult::InProgress => {}
            GameResult::Win(winner) => {
                print!("{}", render(game.board()));
                match ai_side {
                    Some(side) if side == winner => println!("The computer wins."),
                    Some(_) => println!("You win!"),
                    None => println!("{} wins!", winner),
                }
                break;
            }
            GameResult::Draw => {
                print!("{}", render(game.board()));
                println!("It's a draw.");
                break;
            }
        }

        if ai_side == Some(game.to_move()) {
            if !ai_turn(&mut game, &mut ai)? {
                break;
            }
        } else {
            print!("{}", render(game.board()));
            print!("{} to move: ", game.to_move());
            io::stdout().flush()?;

            let Some(line) = lines.next() else { break };
            if !human_turn(&mut game, &line?, &mut ai_side) {
                break;
            }
        }
    }

    Ok(())
}

/// Handle one line of input. Returns false when the player quits.
fn human_turn(game: &mut Game, line: &str, ai_side: &mut Option<Player>) -> bool {
    match parse_input(line, game.board().placement()) {
        Ok(Input::Quit) => return false,
        Ok(Input::Hint) => match game.hint() {
            Some(mv) => println!("Hint: try {}", describe(mv)),
            None => println!("No moves left."),
        },
        Ok(Input::Undo) => {
            // Against the computer, also take back its reply
            let takebacks = if ai_side.is_some() { 2 } else { 1 };
            for _ in 0..takebacks {
                game.undo_last();
            }
        }
        Ok(Input::ToggleAi) => {
            *ai_side = match ai_side {
                Some(_) => None,
                None => Some(game.to_move().opponent()),
            };
            match ai_side {
                Some(side) => println!("AI: ON (computer plays {})", side),
                None => println!("AI: OFF"),
            }
        }
        Ok(Input::Play(mv)) => {
            // Illegal moves are ignored; the prompt repeats
            if let Err(e) = game.apply_move(mv) {
                println!("{}", e);
            }
        }
        Err(msg) => println!("{}", msg),
    }
    true
}

/// Let the computer move. Returns false when no move is available.
fn ai_turn(game: &mut Game, ai: &mut AiPlayer) -> Result<bool> {
    let Some(mv) = game.choose_ai_move(ai) else {
        return Ok(false);
    };
    game.apply_move(mv)?;
    println!("Computer plays {}", describe(mv));
    if let Some(outcome) = ai.last_search() {
        tracing::debug!(nodes = outcome.nodes, score = outcome.score, "search stats");
    }
    Ok(true)
}

// ============================================================================
// TEXT I/O
// ============================================================================

fn print_help(placement: Placement) {
    match placement {
        Placement::Gravity => println!("Enter a column number (1-based)."),
        Placement::FreeCell => println!("Enter row,col (1-based)."),
    }
    println!("h: hint, u: undo, a: computer on/off, q: quit.");
}

/// Parse 1-based user input into a move or command
fn parse_input(line: &str, placement: Placement) -> Result<Input, String> {
    let line = line.trim().to_ascii_lowercase();
    match line.as_str() {
        "q" | "quit" => return Ok(Input::Quit),
        "h" | "hint" => return Ok(Input::Hint),
        "u" | "undo" => return Ok(Input::Undo),
        "a" | "ai" => return Ok(Input::ToggleAi),
        _ => {}
    }

    let numbers: Vec<usize> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<usize>().map_err(|_| format!("'{}' is not a number", s)))
        .collect::<Result<_, _>>()?;

    if numbers.contains(&0) {
        return Err("positions start at 1".to_string());
    }

    match (placement, numbers.as_slice()) {
        (Placement::Gravity, [col]) => Ok(Input::Play(Move::Drop(col - 1))),
        (Placement::FreeCell, [row, col]) => Ok(Input::Play(Move::Place(Coord::new(row - 1, col - 1)))),
        (Placement::Gravity, _) => Err("enter a single column number".to_string()),
        (Placement::FreeCell, _) => Err("enter row,col".to_string()),
    }
}

/// Human-facing (1-based) move description
fn describe(mv: Move) -> String {
    match mv {
        Move::Drop(col) => format!("column {}", col + 1),
        Move::Place(c) => format!("{},{}", c.row + 1, c.col + 1),
    }
}

/// Board with 1-based column numbers on top
fn render(board: &Board) -> String {
    let header: String = (1..=board.cols()).map(|c| format!("{:>2}", c)).collect();
    let mut out = format!("\n {}\n", header.trim_start());
    for line in board.to_string().lines() {
        let row: String = line.chars().map(|ch| format!(" {}", ch)).collect();
        out.push_str(&row);
        out.push('\n');
    }
    out
}
