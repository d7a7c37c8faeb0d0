//! Named-field record types decoded from the feature MAT-files.
//!
//! Each file is decoded once into these types; callers then read fields by
//! name instead of searching the struct layout on every access.
//!
//! All three file kinds keep their records in a top-level variable `data`:
//!
//! | file          | `data` layout                        | fields                    |
//! |---------------|--------------------------------------|---------------------------|
//! | seizure       | struct array, one element per window | `fv`, `label`, `Seizure`  |
//! | interictal    | struct array, one element per window | `fv`                      |
//! | full seizure  | 1×1 struct                           | `fv` (cell or matrix), `wind` |
use ndarray::Array2;

use crate::error::{Error, Result};
use crate::mat::{MatArray, MatData, MatFile};

/// Top-level variable holding the records.
pub const DATA_VAR: &str = "data";
pub const FIELD_FV: &str = "fv";
pub const FIELD_LABEL: &str = "label";
pub const FIELD_SEIZURE: &str = "Seizure";
pub const FIELD_WIND: &str = "wind";
pub const FIELD_CLASSES: &str = "classes";

/// Identifier grouping the windows of one seizure event.
#[derive(Debug, Clone, PartialEq)]
pub enum SeizureId {
    Number(f64),
    Text(String),
}

/// One analysis window of a seizure file.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowRecord {
    pub fv: Vec<f64>,
    pub label: f64,
    pub seizure: SeizureId,
}

impl WindowRecord {
    /// Decode every window of a seizure file, in file order.
    pub fn decode_all(mat: &MatFile) -> Result<Vec<WindowRecord>> {
        let data = records(mat, &[FIELD_FV, FIELD_LABEL, FIELD_SEIZURE])?;
        (0..data.numel())
            .map(|i| {
                Ok(WindowRecord {
                    fv: feature_vector(field(data, i, FIELD_FV)?, i)?,
                    label: label(field(data, i, FIELD_LABEL)?, i)?,
                    seizure: seizure_id(field(data, i, FIELD_SEIZURE)?, i)?,
                })
            })
            .collect()
    }
}

/// One baseline window of an interictal file.
#[derive(Debug, Clone, PartialEq)]
pub struct InterictalRecord {
    pub fv: Vec<f64>,
}

impl InterictalRecord {
    /// Decode every window of an interictal file, in file order.
    pub fn decode_all(mat: &MatFile) -> Result<Vec<InterictalRecord>> {
        let data = records(mat, &[FIELD_FV])?;
        (0..data.numel())
            .map(|i| Ok(InterictalRecord { fv: feature_vector(field(data, i, FIELD_FV)?, i)? }))
            .collect()
    }
}

/// The single record of a full (unsegmented) seizure file.
#[derive(Debug, Clone, PartialEq)]
pub struct FullSeizureRecord {
    /// Per-window feature vectors, in file order.
    pub windows: Vec<Vec<f64>>,
    /// Window markers, dimensions as stored.
    pub markers: Array2<f64>,
}

impl FullSeizureRecord {
    /// `fv` may be a cell array of vectors (one cell per window) or a numeric
    /// matrix with one row per window.
    pub fn decode(mat: &MatFile) -> Result<FullSeizureRecord> {
        let data = records(mat, &[FIELD_FV, FIELD_WIND])?;
        if data.numel() == 0 {
            return Err(Error::format("'data' struct has no elements"));
        }
        let fv = field(data, 0, FIELD_FV)?;
        let windows = match &fv.data {
            MatData::Cell(cells) => cells
                .iter()
                .enumerate()
                .map(|(i, c)| feature_vector(c, i))
                .collect::<Result<Vec<_>>>()?,
            MatData::Numeric { .. } => fv
                .to_array2()?
                .rows()
                .into_iter()
                .map(|r| r.to_vec())
                .collect(),
            _ => {
                return Err(Error::format(format!(
                    "field 'fv' must be a cell array or matrix, found {}",
                    fv.class_name()
                )))
            }
        };
        let markers = field(data, 0, FIELD_WIND)?.to_array2()?;
        Ok(FullSeizureRecord { windows, markers })
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────

/// The `data` struct array, checked for the required fields.
fn records<'a>(mat: &'a MatFile, required: &[&str]) -> Result<&'a MatArray> {
    let data = mat.variable(DATA_VAR)?;
    let names = data.field_names().ok_or_else(|| {
        Error::format(format!("'{DATA_VAR}' is a {} array, not a struct", data.class_name()))
    })?;
    for &f in required {
        if !names.iter().any(|n| n == f) {
            return Err(Error::format(format!("'{DATA_VAR}' has no field '{f}'")));
        }
    }
    Ok(data)
}

fn field<'a>(data: &'a MatArray, index: usize, name: &str) -> Result<&'a MatArray> {
    data.field(index, name)
        .ok_or_else(|| Error::format(format!("record {index}: missing field '{name}'")))
}

/// A numeric vector (1×N, N×1, or scalar), flattened.
fn feature_vector(arr: &MatArray, index: usize) -> Result<Vec<f64>> {
    let non_singleton = arr.dims.iter().filter(|&&d| d != 1).count();
    match arr.real() {
        Some(v) if non_singleton <= 1 => Ok(v.to_vec()),
        _ => Err(Error::format(format!(
            "record {index}: 'fv' must be a numeric vector, found {} {:?}",
            arr.class_name(),
            arr.dims
        ))),
    }
}

fn label(arr: &MatArray, index: usize) -> Result<f64> {
    arr.scalar_value().ok_or_else(|| {
        Error::format(format!("record {index}: 'label' must be a numeric scalar"))
    })
}

fn seizure_id(arr: &MatArray, index: usize) -> Result<SeizureId> {
    if let Some(v) = arr.scalar_value() {
        return Ok(SeizureId::Number(v));
    }
    match arr.text() {
        Some(s) => Ok(SeizureId::Text(s.to_string())),
        None => Err(Error::format(format!(
            "record {index}: 'Seizure' must be a scalar or a string, found {} {:?}",
            arr.class_name(),
            arr.dims
        ))),
    }
}
