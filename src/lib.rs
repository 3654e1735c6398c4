pub mod bench;
pub mod datagen;
pub mod knn;
pub mod util;

#[ctor::ctor]
fn init_color_backtrace() {
    color_backtrace::install();
}

/// Number of features per point.
pub const DATA_DIM: usize = 1 << 8;
/// Number of classes in the generated labels.
pub const CLASSES: usize = 3;
/// Neighbors considered per test point.
pub const NEIGHBORS: usize = 5;
/// Training points, fixed across the whole sweep.
pub const TRAIN_SIZE: usize = 1 << 10;
/// Seed recorded in the report.
pub const SEED: u64 = 7777777;
/// Seed for the test set, distinct from the training seed.
pub const TEST_SEED: u64 = 777777;

/// One classification problem, borrowed from harness-owned buffers.
/// Feature matrices are row-major with `dim` columns.
pub struct Workload<'a> {
    pub x_train: &'a [f64],
    pub y_train: &'a [u32],
    pub x_test: &'a [f64],
    pub dim: usize,
    pub k: usize,
    pub classes: usize,
    pub train_size: usize,
    pub test_size: usize,
}

impl<'a> Workload<'a> {
    pub fn train_point(&self, j: usize) -> &'a [f64] {
        &self.x_train[j * self.dim..(j + 1) * self.dim]
    }

    pub fn test_point(&self, i: usize) -> &'a [f64] {
        &self.x_test[i * self.dim..(i + 1) * self.dim]
    }
}

/// Output buffers, allocated by the harness and filled by a scheme.
pub struct Scratch {
    /// Predicted class per test point.
    pub predictions: Vec<u32>,
    /// `test_size` rows of `k` (distance, label) pairs, ascending by distance.
    pub neighbors: Vec<(f64, u32)>,
    /// `test_size` rows of `classes` vote tallies.
    pub votes: Vec<u32>,
}

impl Scratch {
    pub fn new(test_size: usize, k: usize, classes: usize) -> Self {
        Scratch {
            predictions: vec![0; test_size],
            neighbors: vec![(0.0, 0); test_size * k],
            votes: vec![0; test_size * classes],
        }
    }
}

/// A KNN classification kernel pluggable into the harness.
pub trait KnnScheme: Sync + Send {
    /// Classify every point of `input.x_test`, filling all of `out`.
    fn classify(&self, input: &Workload, out: &mut Scratch);

    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
