//! `bench_local.rs`: quick local timing runner (no Criterion)
//!
//! PURPOSE
//! -------
//! - Fast, ad-hoc timing of the pack + encode + decode pipeline on *your* machine.
//! - Runs each built-in word set several times and reports the median.
//! - Every run uses its own seeded RNG, so repeated runs time the same layouts.
//!
//! HOW TO RUN
//! ----------
//! - Optimized build:                `cargo run --bin bench_local --release`
//! - Multiple repeats:               `cargo run --bin bench_local --release -- -r 5`
//! - Print the last grid per case:   `cargo run --bin bench_local --release -- -p`
//!
//! NOTES
//! -----
//! - Not statistically rigorous; use the same machine and `--release` for comparable numbers.
//! - One warm-up run per case is done (not included in timing).

use clap::Parser;
use crossword_link::entry_list::{Entry, EntryList};
use crossword_link::grid::{self, Cell};
use crossword_link::{codec, packer};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::hint::black_box;
use std::time::Instant;

/// Simple local benchmark runner for the puzzle pipeline.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of repeats per case (use >1 to reduce noise; median is reported)
    #[arg(short = 'r', long = "repeats", default_value_t = 3)]
    num_repeats: usize,

    /// Seed of the first run; run `i` uses `seed + i`
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Print the grid produced by the last run of each case
    #[arg(short = 'p', long = "print")]
    print_grid: bool,
}

struct Case {
    name: &'static str,
    text: String,
}

fn get_cases() -> Vec<Case> {
    let animals = "CAT=Purrs\nCAR=Drives\nZEBRA=Striped\nOTTER=Swims on its back\nEAGLE=Soars\n\
                   TIGER=Big cat\nRAVEN=Black bird\nMOOSE=Antlered\nLLAMA=Spits\nGECKO=Climbs walls";
    let languages = ["RUST", "PYTHON", "JAVASCRIPT", "HASKELL", "OCAML", "ERLANG", "ELIXIR", "KOTLIN",
        "SCALA", "CLOJURE", "PASCAL", "FORTRAN", "COBOL", "PROLOG", "SMALLTALK", "JULIA"]
        .iter()
        .map(|w| format!("{w}=A language"))
        .collect::<Vec<_>>()
        .join("\n");
    // more answers than the placement ceiling
    let many = (0..80)
        .map(|i| {
            let word: String = (0..6).map(|j| char::from(b'A' + ((i * 7 + j * 3) % 26) as u8)).collect();
            format!("{word}=Generated {i}")
        })
        .collect::<Vec<_>>()
        .join("\n");

    vec![
        Case { name: "animals (10)", text: animals.to_string() },
        Case { name: "languages (16)", text: languages },
        Case { name: "generated (80)", text: many },
    ]
}

/// Small helper: robust central tendency for small samples.
fn median(mut xs: Vec<f64>) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.sort_by(f64::total_cmp);
    let n = xs.len();
    if n % 2 == 1 {
        xs[n / 2]
    } else {
        0.5 * (xs[n / 2 - 1] + xs[n / 2])
    }
}

/// Pack, encode and decode once; returns the number of placements that survived the round trip.
fn run_once(entries: &[Entry], seed: u64) -> Result<usize, Box<dyn std::error::Error>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let layout = packer::pack_with_rng(entries, &mut rng)?;
    let token = codec::encode(&layout.placement_set())?;
    let decoded = codec::decode(black_box(&token))?;
    Ok(decoded.len())
}

fn print_grid(entries: &[Entry], seed: u64) -> Result<(), Box<dyn std::error::Error>> {
    let layout = packer::pack_with_rng(entries, &mut StdRng::seed_from_u64(seed))?;
    let grids = grid::reconstruct(&layout.placement_set());
    for row in grids.solution.rows() {
        let line: String = row.iter().map(|c| if let Cell::Letter(l) = c { *l } else { '.' }).collect();
        println!("  {line}");
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cases = get_cases();
    let mut summary: Vec<(&'static str, f64, usize)> = Vec::with_capacity(cases.len());

    for (idx, case) in cases.iter().enumerate() {
        let list = EntryList::parse_from_str(&case.text);
        eprintln!("\n[{:02}] {} ({} entries)", idx + 1, case.name, list.entries.len());

        if let Err(e) = run_once(&list.entries, cli.seed) {
            eprintln!("  ✗ Warm-up failed: {e}");
            continue;
        }

        let mut times = Vec::with_capacity(cli.num_repeats);
        let mut last_placed = 0;
        for rep in 0..cli.num_repeats {
            let seed = cli.seed + rep as u64;
            let t_run = Instant::now();
            let placed = match run_once(&list.entries, seed) {
                Ok(placed) => placed,
                Err(e) => {
                    eprintln!("  ✗ Run {}/{} failed: {e}", rep + 1, cli.num_repeats);
                    continue;
                }
            };
            let secs = t_run.elapsed().as_secs_f64();
            times.push(secs);
            last_placed = placed;
            eprintln!("  run {:>2}/{:>2}: {:.6}s ({} placed)", rep + 1, cli.num_repeats, secs, placed);
        }

        let med = median(times);
        eprintln!(
            "  → median {:.6}s over {} run(s); last run placed {} {}",
            med,
            cli.num_repeats,
            last_placed,
            pluralizer(last_placed, "word".into(), None)
        );

        if cli.print_grid && cli.num_repeats > 0 {
            print_grid(&list.entries, cli.seed + cli.num_repeats as u64 - 1)?;
        }
        summary.push((case.name, med, last_placed));
    }

    eprintln!("\n==== Summary ====");
    eprintln!("{:<20} | {:>12} | {:>8}", "case", "median (s)", "placed");
    eprintln!("{:-<20}-+-{:-<12}-+-{:-<8}", "", "", "");
    for (name, med, placed) in &summary {
        eprintln!("{name:<20} | {med:>12.6} | {placed:>8}");
    }

    Ok(())
}

fn pluralizer(count: usize, singular: String, plural: Option<String>) -> String {
    if count == 1 {
        singular
    } else {
        plural.unwrap_or_else(|| singular + "s")
    }
}
