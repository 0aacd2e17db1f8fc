//! Seeded stratified train/test partition

use crate::error::{ChurnError, Result};
use ndarray::Array1;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Disjoint row-index partition covering every row, indices ascending
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainTestSplit {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

impl TrainTestSplit {
    pub fn n_train(&self) -> usize {
        self.train_indices.len()
    }

    pub fn n_test(&self) -> usize {
        self.test_indices.len()
    }
}

/// Split 0/1 labels into train and test rows, preserving the class ratio.
///
/// The test size is `ceil(test_fraction * n)`. Each class receives the floor
/// of its proportional share, leftover rows go to the classes with the
/// largest remainders (class 0 first on ties), and every class keeps at
/// least one row on each side.
pub fn stratified_train_test_split(
    y: &Array1<f64>,
    test_fraction: f64,
    seed: u64,
) -> Result<TrainTestSplit> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(ChurnError::InvalidSplitConfiguration(format!(
            "test_fraction must be in (0, 1), got {}",
            test_fraction
        )));
    }

    let mut classes: [Vec<usize>; 2] = [Vec::new(), Vec::new()];
    for (i, &label) in y.iter().enumerate() {
        classes[usize::from(label > 0.5)].push(i);
    }

    for (class, members) in classes.iter().enumerate() {
        if members.len() < 2 {
            return Err(ChurnError::InvalidSplitConfiguration(format!(
                "class {} has {} member(s); stratified split needs at least 2 per class",
                class,
                members.len()
            )));
        }
    }

    let n = y.len();
    let n_test = (test_fraction * n as f64).ceil() as usize;
    if n_test < 2 || n - n_test.min(n) < 2 {
        return Err(ChurnError::InvalidSplitConfiguration(format!(
            "test_fraction {} on {} rows leaves {} test and {} train rows; each side needs at least 2",
            test_fraction,
            n,
            n_test,
            n.saturating_sub(n_test)
        )));
    }

    let quotas = allocate_test_rows(&[classes[0].len(), classes[1].len()], n_test);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut train_indices = Vec::with_capacity(n - n_test);
    let mut test_indices = Vec::with_capacity(n_test);
    for (members, quota) in classes.iter_mut().zip(quotas) {
        members.shuffle(&mut rng);
        test_indices.extend_from_slice(&members[..quota]);
        train_indices.extend_from_slice(&members[quota..]);
    }

    train_indices.sort_unstable();
    test_indices.sort_unstable();

    Ok(TrainTestSplit {
        train_indices,
        test_indices,
    })
}

/// Largest-remainder allocation of `n_test` rows, clamped to [1, count - 1]
fn allocate_test_rows(counts: &[usize; 2], n_test: usize) -> [usize; 2] {
    let n: usize = counts.iter().sum();
    let exact: Vec<f64> = counts
        .iter()
        .map(|&c| n_test as f64 * c as f64 / n as f64)
        .collect();

    let mut quotas = [exact[0].floor() as usize, exact[1].floor() as usize];
    let mut leftover = n_test.saturating_sub(quotas[0] + quotas[1]);

    let mut by_remainder = [0usize, 1usize];
    by_remainder.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal)
    });
    for &class in by_remainder.iter().cycle() {
        if leftover == 0 {
            break;
        }
        quotas[class] += 1;
        leftover -= 1;
    }

    for (quota, &count) in quotas.iter_mut().zip(counts.iter()) {
        *quota = (*quota).clamp(1, count - 1);
    }
    quotas
}
