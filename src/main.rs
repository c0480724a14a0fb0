use std::process::ExitCode;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crossword_link::entry_list::EntryList;
use crossword_link::grid::Cell;
use crossword_link::placement::Direction;
use crossword_link::puzzle::{self, Generated, LoadedPuzzle, PuzzleError};

/// Shareable crossword puzzles packed into a single link
#[derive(Parser, Debug)]
#[command(author, version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"), about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pack an ANSWER=CLUE file into a puzzle code
    Generate {
        /// Path to the entry file (one ANSWER=CLUE per line)
        file: String,

        /// Seed for the shuffle, for reproducible layouts
        #[arg(short, long)]
        seed: Option<u64>,

        /// Print a share link built on this page URL instead of the bare code
        #[arg(short, long)]
        base_url: Option<String>,
    },

    /// Decode a puzzle code (or share link) and print its grid and clues
    Show {
        /// The puzzle code, or a URL carrying it as `?p=...`
        input: String,

        /// Print the answers instead of blank cells
        #[arg(short, long)]
        reveal: bool,
    },
}

/// Entry point of the crossword-link CLI.
///
/// Delegates to [`try_main`], catching any errors and printing them
/// in a user-friendly way before exiting with code 1.
fn main() -> ExitCode {
    let debug_enabled = std::env::var("CROSSWORD_LINK_DEBUG").is_ok();
    crossword_link::log::init_logger(debug_enabled);

    if let Err(e) = try_main() {
        if let Some(puzzle_err) = e.downcast_ref::<PuzzleError>() {
            eprintln!("Error: {}", puzzle_err.display_detailed());
        } else {
            eprintln!("Error: {e}");
        }
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Core application logic: dispatch on the subcommand.
///
/// Puzzle codes and grids go to stdout; reports about skipped entries go to stderr.
fn try_main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate { file, seed, base_url } => {
            let list = EntryList::load_from_path(&file)?;
            let generated = match seed {
                Some(seed) => puzzle::generate_from_list(list, &mut StdRng::seed_from_u64(seed))?,
                None => puzzle::generate_from_list(list, &mut rand::thread_rng())?,
            };

            match base_url {
                Some(base) => println!("{}", puzzle::share_url(&base, &generated.token)),
                None => println!("{}", generated.token),
            }
            report_generated(&generated);
        }
        Command::Show { input, reveal } => {
            let loaded = puzzle::load(&input)?;
            print_puzzle(&loaded, reveal);
        }
    }

    Ok(())
}

fn report_generated(generated: &Generated) {
    for rejected in &generated.rejected {
        eprintln!("⚠️  Line {}: {}", rejected.line_number, rejected.error.display_detailed());
    }
    if !generated.dropped.is_empty() {
        eprintln!("⚠️  No crossing found for: {}", generated.dropped.join(", "));
    }
    if !generated.truncated.is_empty() {
        eprintln!("⚠️  Placement limit reached, left out: {}", generated.truncated.join(", "));
    }
    eprintln!(
        "✓ Placed {} words on a {}x{} grid",
        generated.placements.len(),
        generated.bounds.width,
        generated.bounds.height
    );
}

fn print_puzzle(loaded: &LoadedPuzzle, reveal: bool) {
    for row in loaded.grids.solution.rows() {
        let line: String = row
            .iter()
            .map(|cell| match cell {
                Cell::Void => '#',
                Cell::Letter(c) if reveal => *c,
                Cell::Letter(_) => '.',
            })
            .collect();
        println!("{line}");
    }
    println!();

    for (i, p) in loaded.placements.iter().enumerate() {
        let direction = match p.direction {
            Direction::Across => "across",
            Direction::Down => "down",
        };
        let answer = if reveal { format!(" [{}]", p.word) } else { String::new() };
        println!("{:>2}. ({}, {}) {direction}, {} letters: {}{answer}", i + 1, p.x, p.y, p.len(), p.clue);
    }
}
