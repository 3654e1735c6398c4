use std::path::PathBuf;
use std::time::Instant;

use log::info;

use crate::datagen::{gen_data_x, gen_data_y};
use crate::util::{device_selector, time};
use crate::{KnnScheme, Scratch, Workload, CLASSES, DATA_DIM, NEIGHBORS, SEED, TEST_SEED, TRAIN_SIZE};

pub struct Params {
    /// Name recorded in the report and printed with each result.
    pub name: String,
    /// Number of benchmark steps.
    pub steps: usize,
    /// Multiplicative factor between steps.
    pub step: usize,
    /// Initial test-set size.
    pub size: usize,
    /// Iterations inside the measured region.
    pub repeat: usize,
    /// Extra text appended to each result line.
    pub text: String,
    pub json: PathBuf,
    pub perf_csv: PathBuf,
    pub runtimes_csv: PathBuf,
}

impl Params {
    pub fn new(name: &str) -> Self {
        Params {
            name: name.to_string(),
            steps: 10,
            step: 2,
            size: TRAIN_SIZE,
            repeat: 1,
            text: String::new(),
            json: "knn_bench.json".into(),
            perf_csv: "perf_output.csv".into(),
            runtimes_csv: "runtimes.csv".into(),
        }
    }
}

/// JSON summary written after the sweep.
#[derive(serde::Serialize)]
pub struct Report {
    pub name: String,
    /// Number of steps in the sweep.
    pub sizes: usize,
    pub step: usize,
    pub repeat: usize,
    pub randseed: u64,
    pub metrics: Vec<Metric>,
}

/// (size, MOPS, seconds) for one step.
#[derive(serde::Serialize)]
pub struct Metric(pub usize, pub f64, pub f64);

/// The geometric size sweep: `steps` sizes starting at `size`, each
/// `step` times the previous.
pub fn sizes(params: &Params) -> Vec<usize> {
    let mut v = Vec::with_capacity(params.steps);
    let mut n = params.size;
    for _ in 0..params.steps {
        v.push(n);
        n *= params.step;
    }
    v
}

/// One warmup call, then `repeat` timed calls. Returns (MOPS, seconds),
/// where an "operation" is one classified test point.
pub fn measure(
    scheme: &dyn KnnScheme,
    input: &Workload,
    out: &mut Scratch,
    repeat: usize,
) -> (f64, f64) {
    scheme.classify(input, out);
    let start = Instant::now();
    for _ in 0..repeat {
        scheme.classify(input, out);
    }
    let time = start.elapsed().as_secs_f64();
    let mops = input.test_size as f64 / time / 1e6;
    (mops, time)
}

/// Run the full sweep: fixed training set, test set generated once at the
/// largest size with each step slicing a prefix. Writes (size, MOPS) and
/// (size, seconds) CSV rows per step and the JSON report at the end.
pub fn run(params: &Params, scheme: &dyn KnnScheme) {
    info!("Device selector: {}", device_selector(true));

    let sizes = sizes(params);
    let max_size = *sizes.last().unwrap();

    let (x_train, y_train, x_test) = time("Generating", || {
        (
            gen_data_x(TRAIN_SIZE, 0),
            gen_data_y(TRAIN_SIZE, CLASSES, 0),
            gen_data_x(max_size, TEST_SEED),
        )
    });

    let mut perf = csv::Writer::from_path(&params.perf_csv).unwrap();
    let mut runtimes = csv::Writer::from_path(&params.runtimes_csv).unwrap();

    let mut report = Report {
        name: params.name.clone(),
        sizes: params.steps,
        step: params.step,
        repeat: params.repeat,
        randseed: SEED,
        metrics: Vec::new(),
    };

    let mut repeat = params.repeat;
    for &nopt in &sizes {
        info!("Benchmarking size {nopt}");
        let input = Workload {
            x_train: &x_train,
            y_train: &y_train,
            x_test: &x_test[..nopt * DATA_DIM],
            dim: DATA_DIM,
            k: NEIGHBORS,
            classes: CLASSES,
            train_size: TRAIN_SIZE,
            test_size: nopt,
        };
        let mut out = Scratch::new(nopt, NEIGHBORS, CLASSES);
        let (mops, time) = measure(scheme, &input, &mut out, repeat);
        let result_mops = mops * repeat as f64;

        perf.write_record(&[nopt.to_string(), result_mops.to_string()])
            .unwrap();
        runtimes
            .write_record(&[nopt.to_string(), time.to_string()])
            .unwrap();
        perf.flush().unwrap();
        runtimes.flush().unwrap();

        println!(
            "ERF: {:15} | Size: {:10} | MOPS: {:15.2} | TIME: {:10.6} {}",
            params.name, nopt, result_mops, time, params.text
        );
        report.metrics.push(Metric(nopt, mops, time));

        repeat = repeat.saturating_sub(params.step).max(1);
    }

    let f = std::fs::File::create(&params.json).unwrap();
    serde_json::to_writer_pretty(f, &report).unwrap();
}

/// Correctness mode: classify `nopt` test points with both schemes and
/// compare the predictions.
pub fn verify(scheme: &dyn KnnScheme, reference: &dyn KnnScheme, nopt: usize) -> bool {
    let x_train = gen_data_x(TRAIN_SIZE, 0);
    let y_train = gen_data_y(TRAIN_SIZE, CLASSES, 0);
    let x_test = gen_data_x(nopt, TEST_SEED);
    let input = Workload {
        x_train: &x_train,
        y_train: &y_train,
        x_test: &x_test,
        dim: DATA_DIM,
        k: NEIGHBORS,
        classes: CLASSES,
        train_size: TRAIN_SIZE,
        test_size: nopt,
    };

    let mut expected = Scratch::new(nopt, NEIGHBORS, CLASSES);
    reference.classify(&input, &mut expected);
    let mut actual = Scratch::new(nopt, NEIGHBORS, CLASSES);
    scheme.classify(&input, &mut actual);

    if actual.predictions == expected.predictions {
        println!("Test succeeded\n");
        true
    } else {
        println!("Test failed\n");
        false
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::knn::{HeapSearch, SortedQueue};

    #[test]
    fn sweep_is_geometric() {
        let mut params = Params::new("test");
        params.steps = 4;
        params.step = 2;
        params.size = 1024;
        assert_eq!(sizes(&params), [1024, 2048, 4096, 8192]);
    }

    #[test]
    fn measure_tallies_votes_once() {
        let nopt = 4;
        let x_train = gen_data_x(TRAIN_SIZE, 0);
        let y_train = gen_data_y(TRAIN_SIZE, CLASSES, 0);
        let x_test = gen_data_x(nopt, TEST_SEED);
        let input = Workload {
            x_train: &x_train,
            y_train: &y_train,
            x_test: &x_test,
            dim: DATA_DIM,
            k: NEIGHBORS,
            classes: CLASSES,
            train_size: TRAIN_SIZE,
            test_size: nopt,
        };
        let mut out = Scratch::new(nopt, NEIGHBORS, CLASSES);
        measure(&SortedQueue, &input, &mut out, 1);
        // Warmup plus the measured call share one Scratch; tallies must
        // reflect a single classification.
        for i in 0..nopt {
            let row = &out.votes[i * CLASSES..(i + 1) * CLASSES];
            assert_eq!(row.iter().sum::<u32>() as usize, NEIGHBORS);
        }
    }

    #[test]
    fn verify_accepts_matching_schemes() {
        assert!(verify(&HeapSearch, &SortedQueue, 32));
        assert!(verify(&SortedQueue, &SortedQueue, 32));
    }

    #[test]
    fn report_matches_output_schema() {
        let report = Report {
            name: "heap".to_string(),
            sizes: 2,
            step: 2,
            repeat: 1,
            randseed: SEED,
            metrics: vec![Metric(1024, 1.5, 0.25), Metric(2048, 1.4, 0.5)],
        };
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["name"], "heap");
        assert_eq!(v["randseed"], SEED);
        // Metrics serialize as (size, mops, time) tuples.
        assert_eq!(v["metrics"][0][0], 1024);
        assert_eq!(v["metrics"][1][2], 0.5);
    }

    #[test]
    fn run_writes_csvs_and_json() {
        let dir = std::env::temp_dir().join("knn_bench_test");
        std::fs::create_dir_all(&dir).unwrap();
        let mut params = Params::new("heap");
        params.steps = 2;
        params.size = 8;
        params.json = dir.join("out.json");
        params.perf_csv = dir.join("perf_output.csv");
        params.runtimes_csv = dir.join("runtimes.csv");

        run(&params, &HeapSearch);

        let json: serde_json::Value =
            serde_json::from_reader(std::fs::File::open(&params.json).unwrap()).unwrap();
        assert_eq!(json["metrics"].as_array().unwrap().len(), 2);

        for path in [&params.perf_csv, &params.runtimes_csv] {
            let mut rdr = csv::ReaderBuilder::new()
                .has_headers(false)
                .from_path(path)
                .unwrap();
            let records: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
            assert_eq!(records.len(), 2);
            assert_eq!(&records[0][0], "8");
            assert_eq!(&records[1][0], "16");
        }
    }
}
