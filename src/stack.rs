//! Row slicing and stacking with checked shapes.
//!
//! Out-of-range slices and column-count disagreements surface as
//! [`Error::IndexRange`] and [`Error::ShapeMismatch`] instead of panics.
use ndarray::{concatenate, s, Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::config::IndexRange;
use crate::error::{Error, Result};

/// Stack equal-length vectors as the rows of a matrix.
///
/// An empty input gives a `[0, 0]` matrix.
pub fn stack_rows(rows: &[Vec<f64>], context: &str) -> Result<Array2<f64>> {
    let n_cols = rows.first().map_or(0, Vec::len);
    let mut flat = Vec::with_capacity(rows.len() * n_cols);
    for (i, r) in rows.iter().enumerate() {
        if r.len() != n_cols {
            return Err(Error::ShapeMismatch {
                context: format!("{context}, row {i}"),
                expected: vec![n_cols],
                found: vec![r.len()],
            });
        }
        flat.extend_from_slice(r);
    }
    Array2::from_shape_vec((rows.len(), n_cols), flat).map_err(|e| Error::ShapeMismatch {
        context: format!("{context}: {e}"),
        expected: vec![rows.len(), n_cols],
        found: vec![],
    })
}

fn check_range(range: IndexRange, available: usize, context: &str) -> Result<()> {
    if !range.is_empty() && range.end >= available {
        return Err(Error::IndexRange { context: context.to_string(), range, available });
    }
    Ok(())
}

/// Rows `range.start..=range.end` of `arr`.
pub fn slice_rows(arr: ArrayView2<'_, f64>, range: IndexRange, context: &str) -> Result<Array2<f64>> {
    check_range(range, arr.nrows(), context)?;
    if range.is_empty() {
        return Ok(Array2::zeros((0, arr.ncols())));
    }
    Ok(arr.slice(s![range.start..=range.end, ..]).to_owned())
}

/// Entries `range.start..=range.end` of `arr`.
pub fn slice_entries<A: Clone>(arr: ArrayView1<'_, A>, range: IndexRange, context: &str) -> Result<Array1<A>> {
    check_range(range, arr.len(), context)?;
    if range.is_empty() {
        return Ok(Array1::from_vec(Vec::new()));
    }
    Ok(arr.slice(s![range.start..=range.end]).to_owned())
}

/// Vertically concatenate `top` and `bottom`.
pub fn vstack<'a>(top: ArrayView2<'a, f64>, bottom: ArrayView2<'a, f64>, context: &str) -> Result<Array2<f64>> {
    if top.ncols() != bottom.ncols() {
        return Err(Error::ShapeMismatch {
            context: context.to_string(),
            expected: vec![top.nrows(), top.ncols()],
            found: vec![bottom.nrows(), bottom.ncols()],
        });
    }
    concatenate(Axis(0), &[top, bottom]).map_err(|e| Error::ShapeMismatch {
        context: format!("{context}: {e}"),
        expected: vec![top.ncols()],
        found: vec![bottom.ncols()],
    })
}

/// Concatenate two vectors.
pub fn concat<A: Clone>(front: ArrayView1<'_, A>, back: ArrayView1<'_, A>) -> Array1<A> {
    front.iter().chain(back.iter()).cloned().collect()
}

/// Fail unless `features` has exactly one row per label.
pub fn ensure_aligned(features: ArrayView2<'_, f64>, n_labels: usize, context: &str) -> Result<()> {
    if features.nrows() != n_labels {
        return Err(Error::ShapeMismatch {
            context: format!("{context}: feature rows vs labels"),
            expected: vec![features.nrows()],
            found: vec![n_labels],
        });
    }
    Ok(())
}

/// Keep the rows of `features` and entries of `labels` where `mask` is set.
pub fn select_rows(
    features: ArrayView2<'_, f64>,
    labels: ArrayView1<'_, f64>,
    mask: impl Fn(usize) -> bool,
) -> (Array2<f64>, Array1<f64>) {
    let idx: Vec<usize> = (0..features.nrows()).filter(|&i| mask(i)).collect();
    (features.select(Axis(0), &idx), labels.select(Axis(0), &idx))
}
