//! Seizure and interictal feature loaders.
//!
//! Both loaders read one MAT-file, decode it into records and stack the
//! feature vectors as matrix rows in file order.  The file is fully read and
//! closed before decoding starts.
use std::path::Path;

use ndarray::{Array1, Array2};

use crate::error::Result;
use crate::mat::read_mat;
use crate::record::{InterictalRecord, WindowRecord};
use crate::stack::stack_rows;

/// Every window of one seizure file.
///
/// `features`, `labels` and `keep` are row-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct SeizureWindows {
    /// `[n_windows, n_features]`.
    pub features: Array2<f64>,
    pub labels: Array1<f64>,
    /// `false` once a seizure has run longer than `max_windows` windows.
    pub keep: Array1<bool>,
}

impl SeizureWindows {
    pub fn n_windows(&self) -> usize {
        self.features.nrows()
    }
}

/// Run-length keep flags over a sequence of seizure identifiers.
///
/// The count starts at 1, resets to 1 whenever the identifier changes and
/// increments while it repeats; a window is kept while the count is at most
/// `max_windows`.
///
/// ```
/// use eegset::loader::keep_flags;
/// assert_eq!(keep_flags(&["A", "A", "A", "B", "B"], 2), vec![true, true, false, true, true]);
/// ```
pub fn keep_flags<T: PartialEq>(ids: &[T], max_windows: usize) -> Vec<bool> {
    let mut out = Vec::with_capacity(ids.len());
    let mut prev: Option<&T> = None;
    let mut count = 0usize;
    for id in ids {
        if prev == Some(id) {
            count += 1;
        } else {
            prev = Some(id);
            count = 1;
        }
        out.push(count <= max_windows);
    }
    out
}

/// Load every window of a seizure file.
pub fn load_seizure<P: AsRef<Path>>(path: P, max_windows: usize) -> Result<SeizureWindows> {
    let path = path.as_ref();
    let mat = read_mat(path)?;
    let records = WindowRecord::decode_all(&mat).map_err(|e| e.at_path(path))?;

    let rows: Vec<Vec<f64>> = records.iter().map(|r| r.fv.clone()).collect();
    let features = stack_rows(&rows, &format!("feature vectors of {}", path.display()))?;
    let labels: Array1<f64> = records.iter().map(|r| r.label).collect();
    let ids: Vec<_> = records.iter().map(|r| &r.seizure).collect();
    let keep = Array1::from_vec(keep_flags(&ids, max_windows));

    log::debug!(
        "{}: {} windows × {} features, {} dropped by run length > {max_windows}",
        path.display(),
        features.nrows(),
        features.ncols(),
        keep.iter().filter(|k| !**k).count()
    );
    Ok(SeizureWindows { features, labels, keep })
}

/// Load every baseline feature vector of an interictal file as matrix rows.
pub fn load_interictal<P: AsRef<Path>>(path: P) -> Result<Array2<f64>> {
    let path = path.as_ref();
    let mat = read_mat(path)?;
    let records = InterictalRecord::decode_all(&mat).map_err(|e| e.at_path(path))?;
    let rows: Vec<Vec<f64>> = records.into_iter().map(|r| r.fv).collect();
    let features = stack_rows(&rows, &format!("feature vectors of {}", path.display()))?;
    log::debug!(
        "{}: {} interictal windows × {} features",
        path.display(),
        features.nrows(),
        features.ncols()
    );
    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_length_discards_tail_of_long_runs() {
        assert_eq!(keep_flags(&['A', 'A', 'A', 'B', 'B'], 2), vec![true, true, false, true, true]);
    }

    #[test]
    fn first_window_is_always_kept() {
        assert_eq!(keep_flags(&[7], 1), vec![true]);
        assert!(keep_flags::<u8>(&[], 1).is_empty());
    }

    #[test]
    fn returning_identifier_starts_a_new_run() {
        // A run is consecutive only: A B A counts A twice from 1.
        assert_eq!(keep_flags(&[1, 1, 2, 1, 1, 1], 2), vec![true, true, true, true, true, false]);
    }

    #[test]
    fn threshold_one_keeps_only_run_heads() {
        assert_eq!(keep_flags(&[1, 1, 1, 2], 1), vec![true, false, false, true]);
    }
}
