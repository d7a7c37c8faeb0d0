//! Full-seizure extraction and detection-result export.
//!
//! The inference path: a full (unsegmented) seizure file is flattened into a
//! feature matrix for the classifier, and the per-window classes it returns
//! are written back next to the features and window markers.
use std::path::Path;

use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::error::Result;
use crate::mat::{read_mat, MatArray, MatWriter};
use crate::record::{FullSeizureRecord, DATA_VAR, FIELD_CLASSES, FIELD_FV, FIELD_WIND};
use crate::stack::stack_rows;

/// Windows of one full seizure recording.
#[derive(Debug, Clone, PartialEq)]
pub struct FullSeizure {
    /// `[n_windows, n_features]`, file order.
    pub features: Array2<f64>,
    /// Window markers exactly as stored (`wind`).
    pub markers: Array2<f64>,
}

/// Read a full-seizure file into a feature matrix plus its window markers.
pub fn extract<P: AsRef<Path>>(path: P) -> Result<FullSeizure> {
    let path = path.as_ref();
    let mat = read_mat(path)?;
    let record = FullSeizureRecord::decode(&mat).map_err(|e| e.at_path(path))?;
    let features = stack_rows(&record.windows, &format!("windows of {}", path.display()))?;
    log::debug!(
        "{}: {} windows × {} features",
        path.display(),
        features.nrows(),
        features.ncols()
    );
    Ok(FullSeizure { features, markers: record.markers })
}

/// Write a detection result: variable `data`, a 1×1 struct with fields
/// `fv`, `wind` and `classes`.  Any existing file at `path` is replaced.
pub fn save_detection<P: AsRef<Path>>(
    path: P,
    features: ArrayView2<'_, f64>,
    classes: ArrayView1<'_, f64>,
    markers: ArrayView2<'_, f64>,
) -> Result<()> {
    let path = path.as_ref();
    if classes.len() != features.nrows() {
        log::warn!(
            "{}: {} classes for {} windows",
            path.display(),
            classes.len(),
            features.nrows()
        );
    }
    let classes: Vec<f64> = classes.to_vec();
    let data = MatArray::struct_scalar(vec![
        (FIELD_FV, MatArray::from_array2(&features.to_owned())),
        (FIELD_WIND, MatArray::from_array2(&markers.to_owned())),
        (FIELD_CLASSES, MatArray::row(&classes)),
    ]);
    let mut w = MatWriter::new();
    w.add(DATA_VAR, data);
    w.write(path)?;
    log::info!("detection result written → {}", path.display());
    Ok(())
}
