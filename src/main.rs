use std::path::PathBuf;

use clap::Parser;
use knn_bench::bench::{run, verify, Params};
use knn_bench::knn::{schemes, SortedQueue};
use knn_bench::TRAIN_SIZE;

#[derive(Parser)]
struct Args {
    /// Number of steps
    #[clap(long, default_value_t = 10)]
    steps: usize,

    /// Factor for each step
    #[clap(long, default_value_t = 2)]
    step: usize,

    /// Initial data size
    #[clap(long, default_value_t = TRAIN_SIZE)]
    size: usize,

    /// Iterations inside measured region
    #[clap(long, default_value_t = 1)]
    repeat: usize,

    /// Print with each result
    #[clap(long, default_value = "")]
    text: String,

    /// Check for correctness by comparing output with the sorted-queue reference
    #[clap(long)]
    test: bool,

    /// Output json data filename
    #[clap(long, default_value = "knn_bench.json")]
    json: PathBuf,

    /// Scheme to benchmark
    #[clap(long, default_value = "heap")]
    alg: String,

    #[clap(short, default_value_t = 0, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();

    stderrlog::new()
        .verbosity(2 + args.verbose as usize)
        .show_level(false)
        .init()
        .unwrap();

    let scheme = *schemes()
        .iter()
        .find(|s| s.name() == args.alg)
        .unwrap_or_else(|| panic!("Unknown scheme {:?}", args.alg));

    if args.test {
        let ok = verify(scheme, &SortedQueue, args.size);
        std::process::exit(if ok { 0 } else { 1 });
    }

    let mut params = Params::new(&args.alg);
    params.steps = args.steps;
    params.step = args.step;
    params.size = args.size;
    params.repeat = args.repeat;
    params.text = args.text;
    params.json = args.json;
    run(&params, scheme);
}
