use std::path::PathBuf;
use std::process::ExitCode;

use log::{info, warn, LevelFilter};
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::filter::threshold::ThresholdFilter;
use nanoserde::SerJson;
use rand::rngs::StdRng;
use rand::SeedableRng;

use polarize::board::DEFAULT_SIZE;
use polarize::canonical::{canonical_boards, canonical_puzzles_with_unique_solution};
use polarize::count::count_unique_readings;
use polarize::difficulty::puzzle_features;
use polarize::generate::{generate_with, GeneratorConfig};
use polarize::solve::{quick_solve, solve, PuzzleTable};
use polarize::storage::{load_puzzle, save_puzzle};
use polarize::{print_overwrite, Board};

const HELP: &str = "\
polarize

USAGE:
  polarize [-v] [--threads T] <COMMAND>

COMMANDS:
  generate [FILE] [--pieces K] [--max-attempts M] [--seed S]
                          make a puzzle with a unique solution
  solve FILE [--fewer] [--quick]
                          list every solution of a saved puzzle
  count K [--blocked]     count puzzles with K pieces that have one solution
  canonical K             count boards and puzzles with K pieces up to symmetry

OPTIONS:
  -v, -vv                 more logging
  --threads T             size of the worker pool
  -h, --help              print this message
";

/// Log to stderr at `level` and above, leaving stdout to results.
fn init_log(level: LevelFilter) -> Result<(), Error> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("[{l}] {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(level)))
                .build("stderr", Box::new(stderr)),
        )
        .build(Root::builder().appender("stderr").build(level))?;
    log4rs::init_config(config)?;
    Ok(())
}

type Error = Box<dyn std::error::Error>;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Error> {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let mut verbosity = 0;
    while args.contains("-v") {
        verbosity += 1;
    }
    if args.contains("-vv") {
        verbosity += 2;
    }
    init_log(match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    })?;

    if let Some(num_threads) = args.opt_value_from_str::<_, usize>("--threads")? {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()?;
    }

    let now = std::time::Instant::now();

    match args.subcommand()?.as_deref() {
        Some("generate") => {
            let config = GeneratorConfig {
                pieces: args.opt_value_from_str("--pieces")?.unwrap_or(3),
                max_attempts: args.opt_value_from_str("--max-attempts")?,
                ..Default::default()
            };
            let seed: Option<u64> = args.opt_value_from_str("--seed")?;
            let file: Option<PathBuf> = args.opt_free_from_str()?;
            warn_unused(args);

            let (puzzle, board) = match seed {
                Some(seed) => generate_with(&config, &mut StdRng::seed_from_u64(seed))?,
                None => generate_with(&config, &mut rand::thread_rng())?,
            };

            info!("features: {}", puzzle_features(&puzzle).serialize_json());
            eprintln!("{board}");
            eprintln!("{puzzle}");

            match file {
                Some(path) => {
                    save_puzzle(&puzzle, &path)?;
                    info!("saved to {}", path.display());
                }
                None => println!("{}", puzzle.to_json_string()),
            }
        }
        Some("solve") => {
            let fewer = args.contains("--fewer");
            let quick = args.contains("--quick");
            let path: PathBuf = args.free_from_str()?;
            warn_unused(args);

            let puzzle = load_puzzle(&path)?;
            println!("{puzzle}\n");

            let tabled = (quick && puzzle.n() == DEFAULT_SIZE).then(|| {
                let table = PuzzleTable::new(puzzle.dominoes().len());
                quick_solve(&table, &puzzle, fewer)
            });
            let solutions = match tabled.flatten() {
                Some(solutions) => solutions,
                None => {
                    if quick {
                        warn!("no table for this puzzle, searching instead");
                    }
                    solve(&puzzle, fewer)
                }
            };

            println!("{} solution(s)", solutions.len());
            for board in solutions {
                println!("\n{board}");
            }
        }
        Some("count") => {
            let blocked = args.contains("--blocked");
            let num_pieces: usize = args.free_from_str()?;
            warn_unused(args);

            let progress = |done: usize, total: usize| {
                print_overwrite(&format!("{done}/{total} domino multisets"));
            };
            let count = if blocked {
                count_unique_readings(DEFAULT_SIZE, num_pieces, Board::blocked_lines, progress)
            } else {
                count_unique_readings(DEFAULT_SIZE, num_pieces, Board::lights, progress)
            };
            eprintln!();

            println!("{count} puzzles with {num_pieces} pieces and a unique solution");
        }
        Some("canonical") => {
            let num_pieces: usize = args.free_from_str()?;
            warn_unused(args);

            let boards = canonical_boards(num_pieces).len();
            let puzzles = canonical_puzzles_with_unique_solution(num_pieces).len();

            println!("{boards} boards with {num_pieces} pieces up to symmetry");
            println!("{puzzles} puzzles with {num_pieces} pieces and a unique solution up to symmetry");
        }
        other => {
            print!("{HELP}");
            return Err(match other {
                Some(command) => format!("unknown command {command:?}").into(),
                None => "missing command".into(),
            });
        }
    }

    info!("total time: {:?}", now.elapsed());
    Ok(())
}

fn warn_unused(args: pico_args::Arguments) {
    let rest = args.finish();
    if !rest.is_empty() {
        warn!("ignoring arguments {rest:?}");
    }
}
