use std::error::Error;
use std::time::Instant;

use block_slider::config::{COLS, GOAL_CELL, START_LAYOUT};
use block_slider::{
    big_at, BoardState, Piece, Search, SearchConfig, SearchError, SearchStats, Shape,
};
use clap::Parser;
use crossterm::style::{style, Color, Stylize};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thousands::Separable;

#[derive(Parser, Debug)]
#[command(name = "block-slider")]
#[command(about = "Finds the shortest solution of the 5x4 sliding-block puzzle")]
struct Args {
    /// Start layout, five rows of four labels separated by '/' (B, H, V, S, '.')
    #[arg(short, long, default_value = START_LAYOUT)]
    layout: String,

    /// Cell the big piece's top-left corner has to reach
    #[arg(short, long, default_value_t = GOAL_CELL)]
    goal: u8,

    /// Make this many random moves from the start layout before solving
    #[arg(long)]
    scramble: Option<usize>,

    /// Seed for --scramble
    #[arg(long)]
    seed: Option<u64>,

    /// Give up on boards deeper than this many moves
    #[arg(long)]
    max_depth: Option<usize>,

    /// Only print the summary line
    #[arg(short, long)]
    quiet: bool,

    /// Print boards without colours
    #[arg(long)]
    no_color: bool,

    /// Log search progress
    #[arg(short, long)]
    verbose: bool,
}

fn label_color(label: char) -> Color {
    match Shape::from_label(label) {
        Some(Shape::Big) => Color::Blue,
        Some(Shape::HorizontalPair) | Some(Shape::VerticalPair) => Color::Red,
        Some(Shape::Single) => Color::Yellow,
        None => Color::DarkGrey,
    }
}

fn print_board(board: &BoardState, color: bool) {
    if !color {
        print!("{}", board);
        return;
    }
    for row in board.render().chunks(COLS as usize) {
        for &label in row {
            print!("{}", style(label).with(label_color(label)));
        }
        println!();
    }
}

fn summary(stats: &SearchStats) -> String {
    format!(
        "Tested {} positions in total, found solution in {} steps.",
        stats.positions_tested.separate_with_commas(),
        stats.solution_length.unwrap_or(0).separate_with_commas()
    )
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let filter = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let mut start: BoardState = args.layout.parse()?;
    if let Some(steps) = args.scramble {
        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        start = start.scramble(&mut rng, steps);
    }
    let goal = Piece::new(Shape::Big, args.goal)?.anchor();
    let color = !args.no_color;

    if !args.quiet {
        println!("Initial board:");
        print_board(&start, color);
        println!();
    }

    if start.big_anchor() == Some(goal) {
        println!("Start board already has the big piece at {}.", goal);
        return Ok(());
    }

    let config = SearchConfig {
        max_depth: args.max_depth,
    };
    let stopwatch = Instant::now();
    let mut search = Search::with_config(start, big_at(goal), config);
    let result = search.run();
    let stats = search.stats();
    info!(
        "search took {} ms, {} boards discovered",
        stopwatch.elapsed().as_millis(),
        stats.states_discovered.separate_with_commas()
    );

    let solution = match result {
        Ok(solution) => solution,
        Err(SearchError::NoSolution { positions_tested }) => {
            eprintln!("No solution found");
            eprintln!(
                "Tested {} positions in total.",
                positions_tested.separate_with_commas()
            );
            return Err(SearchError::NoSolution { positions_tested }.into());
        }
        Err(err) => return Err(err.into()),
    };

    println!("{}", summary(&stats));
    if args.quiet {
        return Ok(());
    }

    for (i, board) in solution.states.iter().enumerate() {
        match i.checked_sub(1).and_then(|m| solution.moves.get(m)) {
            Some(mv) => println!("== {} == {}", i + 1, mv),
            None => println!("== {} ==", i + 1),
        }
        print_board(board, color);
    }

    println!("{}", summary(&stats));
    Ok(())
}
