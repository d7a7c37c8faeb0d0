//! Random train/test partitioning and row shuffling.
//!
//! Mirrors scikit-learn's `train_test_split` / `shuffle`: the test share is
//! `ceil(test_size × n)` rows taken from the front of one random permutation,
//! the train share is the rest in permutation order.
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Error, Result};
use crate::stack::ensure_aligned;

/// RNG for one compilation: seeded for reproducible runs, else from OS entropy.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Features and labels of one partition.
#[derive(Debug, Clone, PartialEq)]
pub struct Labeled {
    pub features: Array2<f64>,
    pub labels: Array1<f64>,
}

/// Randomly partition rows into `(train, test)`.
///
/// `test_size` must lie in `(0, 1)`, and the train share must not be empty.
pub fn train_test_split(
    features: ArrayView2<'_, f64>,
    labels: ArrayView1<'_, f64>,
    test_size: f64,
    rng: &mut StdRng,
) -> Result<(Labeled, Labeled)> {
    ensure_aligned(features, labels.len(), "train/test split")?;
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(Error::InvalidParameter(format!(
            "test_size must lie in (0, 1), got {test_size}"
        )));
    }
    let n = features.nrows();
    let n_test = (test_size * n as f64).ceil() as usize;
    if n_test >= n {
        return Err(Error::InvalidParameter(format!(
            "with {n} rows and test_size={test_size} the train split would be empty"
        )));
    }

    let mut perm: Vec<usize> = (0..n).collect();
    perm.shuffle(rng);
    let (test_idx, train_idx) = perm.split_at(n_test);

    let take = |idx: &[usize]| Labeled {
        features: features.select(Axis(0), idx),
        labels: labels.select(Axis(0), idx),
    };
    Ok((take(train_idx), take(test_idx)))
}

/// Apply one random permutation to both the rows of `features` and `labels`.
pub fn shuffle_rows(
    features: ArrayView2<'_, f64>,
    labels: ArrayView1<'_, f64>,
    rng: &mut StdRng,
) -> Result<Labeled> {
    ensure_aligned(features, labels.len(), "shuffle")?;
    let mut perm: Vec<usize> = (0..features.nrows()).collect();
    perm.shuffle(rng);
    Ok(Labeled {
        features: features.select(Axis(0), &perm),
        labels: labels.select(Axis(0), &perm),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array;

    fn indexed(n: usize) -> (Array2<f64>, Array1<f64>) {
        let x = Array::from_shape_fn((n, 2), |(i, j)| (i * 10 + j) as f64);
        let y = Array::from_shape_fn(n, |i| i as f64);
        (x, y)
    }

    #[test]
    fn split_sizes_round_test_share_up() {
        let (x, y) = indexed(10);
        let mut rng = make_rng(Some(0));
        let (train, test) = train_test_split(x.view(), y.view(), 0.25, &mut rng).unwrap();
        assert_eq!(test.features.nrows(), 3); // ceil(2.5)
        assert_eq!(train.features.nrows(), 7);
        assert_eq!(train.labels.len(), 7);
    }

    #[test]
    fn split_partitions_every_row_once() {
        let (x, y) = indexed(17);
        let mut rng = make_rng(Some(3));
        let (train, test) = train_test_split(x.view(), y.view(), 0.3, &mut rng).unwrap();
        let mut seen: Vec<usize> =
            train.labels.iter().chain(test.labels.iter()).map(|&v| v as usize).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..17).collect::<Vec<_>>());
        for part in [&train, &test] {
            for (row, &lab) in part.features.rows().into_iter().zip(part.labels.iter()) {
                assert_eq!(row[0], lab * 10.0);
            }
        }
    }

    #[test]
    fn same_seed_same_split() {
        let (x, y) = indexed(20);
        let a = train_test_split(x.view(), y.view(), 0.5, &mut make_rng(Some(42))).unwrap();
        let b = train_test_split(x.view(), y.view(), 0.5, &mut make_rng(Some(42))).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_train_split_is_rejected() {
        let (x, y) = indexed(1);
        let r = train_test_split(x.view(), y.view(), 0.5, &mut make_rng(Some(1)));
        assert!(matches!(r, Err(Error::InvalidParameter(_))));
        let (x, y) = indexed(4);
        assert!(train_test_split(x.view(), y.view(), 0.0, &mut make_rng(Some(1))).is_err());
    }

    #[test]
    fn shuffle_keeps_pairs_together() {
        let (x, y) = indexed(50);
        let out = shuffle_rows(x.view(), y.view(), &mut make_rng(Some(9))).unwrap();
        let mut labels: Vec<usize> = out.labels.iter().map(|&v| v as usize).collect();
        for (row, &lab) in out.features.rows().into_iter().zip(out.labels.iter()) {
            assert_eq!(row[1], lab * 10.0 + 1.0);
        }
        labels.sort_unstable();
        assert_eq!(labels, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn shuffle_rejects_misaligned_input() {
        let (x, _) = indexed(4);
        let y = Array1::zeros(3);
        assert!(shuffle_rows(x.view(), y.view(), &mut make_rng(None)).is_err());
    }
}
