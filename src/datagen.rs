use itertools::Itertools;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::DATA_DIM;

/// Generate a feature matrix of n points, row-major with DATA_DIM columns,
/// uniform in [0, 1).
pub fn gen_data_x(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n * DATA_DIM).map(|_| rng.gen_range(0.0..1.0)).collect_vec()
}

/// Generate n labels uniform in [0, classes).
pub fn gen_data_y(n: usize, classes: usize, seed: u64) -> Vec<u32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(0..classes as u32)).collect_vec()
}
