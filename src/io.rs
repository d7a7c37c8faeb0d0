//! Safetensors I/O for handing matrices to the classifier.
//!
//! Writer: [`StWriter`] and [`write_dataset`].  Reader: [`read_tensors`] and
//! [`load_dataset`], which parse files written by this module or by the
//! Python `safetensors` package (F32, F64, I32, I64 and U8 tensors).
use std::collections::HashMap;
use std::path::Path;

use ndarray::{Array1, Array2, ArrayD, IxDyn};

use crate::compile::Dataset;
use crate::error::{Error, Result};

/// Tensor keys of an exported [`Dataset`].
pub const KEY_X_TRAIN: &str = "x_train";
pub const KEY_Y_TRAIN: &str = "y_train";
pub const KEY_X_TEST: &str = "x_test";
pub const KEY_Y_TEST: &str = "y_test";

// ── Low-level safetensors parser (raw bytes → ndarray, no dependency on the
//    `safetensors` crate's tensor types). ──────────────────────────────────

fn parse_header(bytes: &[u8]) -> Result<(serde_json::Map<String, serde_json::Value>, usize)> {
    if bytes.len() < 8 {
        return Err(Error::format("safetensors file too small"));
    }
    let mut n = [0u8; 8];
    n.copy_from_slice(&bytes[..8]);
    let n = u64::from_le_bytes(n) as usize;
    let end = 8usize
        .checked_add(n)
        .filter(|&e| e <= bytes.len())
        .ok_or_else(|| Error::format("safetensors header runs past end of file"))?;
    let header: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(&bytes[8..end])
        .map_err(|e| Error::format(format!("failed to parse safetensors header: {e}")))?;
    Ok((header, end))
}

fn shape_of(name: &str, entry: &serde_json::Value) -> Result<Vec<usize>> {
    entry["shape"]
        .as_array()
        .ok_or_else(|| Error::format(format!("tensor '{name}' has no shape")))?
        .iter()
        .map(|v| {
            v.as_u64()
                .map(|d| d as usize)
                .ok_or_else(|| Error::format(format!("tensor '{name}' has a bad shape entry")))
        })
        .collect()
}

fn tensor_bytes<'a>(
    bytes: &'a [u8],
    data_start: usize,
    name: &str,
    entry: &serde_json::Value,
) -> Result<&'a [u8]> {
    let bad = || Error::format(format!("tensor '{name}' has bad data_offsets"));
    let offsets = entry["data_offsets"].as_array().ok_or_else(bad)?;
    let s = offsets.first().and_then(|v| v.as_u64()).ok_or_else(bad)? as usize;
    let e = offsets.get(1).and_then(|v| v.as_u64()).ok_or_else(bad)? as usize;
    if s > e || data_start + e > bytes.len() {
        return Err(bad());
    }
    Ok(&bytes[data_start + s..data_start + e])
}

fn decode_tensor(name: &str, dtype: &str, raw: &[u8]) -> Result<Vec<f64>> {
    Ok(match dtype {
        "F32" => raw.chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64)
            .collect(),
        "F64" => raw.chunks_exact(8)
            .map(|b| f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
            .collect(),
        "I32" => raw.chunks_exact(4)
            .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64)
            .collect(),
        "I64" => raw.chunks_exact(8)
            .map(|b| i64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]) as f64)
            .collect(),
        "U8" => raw.iter().map(|&b| b as f64).collect(),
        other => {
            return Err(Error::format(format!("tensor '{name}': unsupported dtype {other}")))
        }
    })
}

/// Read every tensor of a safetensors file, converted to `f64`.
pub fn read_tensors<P: AsRef<Path>>(path: P) -> Result<HashMap<String, ArrayD<f64>>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    parse_tensors(&bytes).map_err(|e| e.at_path(path))
}

fn parse_tensors(bytes: &[u8]) -> Result<HashMap<String, ArrayD<f64>>> {
    let (header, data_start) = parse_header(bytes)?;
    let mut out = HashMap::new();
    for (name, entry) in &header {
        if name == "__metadata__" {
            continue;
        }
        let dtype = entry["dtype"]
            .as_str()
            .ok_or_else(|| Error::format(format!("tensor '{name}' has no dtype")))?;
        let shape = shape_of(name, entry)?;
        let values = decode_tensor(name, dtype, tensor_bytes(bytes, data_start, name, entry)?)?;
        let arr = ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(|e| {
            Error::format(format!("tensor '{name}' does not fit shape {shape:?}: {e}"))
        })?;
        out.insert(name.clone(), arr);
    }
    Ok(out)
}

/// Take tensor `key` out of `tensors` as a matrix.
pub fn take_matrix(tensors: &mut HashMap<String, ArrayD<f64>>, key: &str) -> Result<Array2<f64>> {
    tensors
        .remove(key)
        .ok_or_else(|| Error::format(format!("missing tensor '{key}'")))?
        .into_dimensionality()
        .map_err(|e| Error::format(format!("tensor '{key}' is not 2-D: {e}")))
}

/// Take tensor `key` out of `tensors` as a vector; any shape is flattened.
pub fn take_vector(tensors: &mut HashMap<String, ArrayD<f64>>, key: &str) -> Result<Array1<f64>> {
    let t = tensors
        .remove(key)
        .ok_or_else(|| Error::format(format!("missing tensor '{key}'")))?;
    Ok(t.iter().copied().collect())
}

// ── Generic safetensors builder ───────────────────────────────────────────

/// Simple safetensors file writer for F32, F64 and I32 tensors.
///
/// Usage:
/// ```rust,no_run
/// use eegset::io::StWriter;
/// let mut w = StWriter::new();
/// w.add_f64("labels", &[0.0, 1.0, 1.0], &[3]);
/// w.add_i32("n_rows", &[3], &[1]);
/// w.write("/tmp/out.safetensors").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct StWriter {
    entries: Vec<(String, Vec<u8>, &'static str, Vec<usize>)>,
}

impl StWriter {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn add_f32(&mut self, name: &str, data: &[f32], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries.push((name.to_string(), bytes, "F32", shape.to_vec()));
    }

    pub fn add_f64(&mut self, name: &str, data: &[f64], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries.push((name.to_string(), bytes, "F64", shape.to_vec()));
    }

    /// Row-major `[rows, cols]` matrix.
    pub fn add_f64_arr2(&mut self, name: &str, arr: &Array2<f64>) {
        let data: Vec<f64> = arr.iter().copied().collect();
        self.add_f64(name, &data, &[arr.nrows(), arr.ncols()]);
    }

    pub fn add_f64_arr1(&mut self, name: &str, arr: &Array1<f64>) {
        let data: Vec<f64> = arr.iter().copied().collect();
        self.add_f64(name, &data, &[arr.len()]);
    }

    pub fn add_i32(&mut self, name: &str, data: &[i32], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries.push((name.to_string(), bytes, "I32", shape.to_vec()));
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut header_map = serde_json::Map::new();
        let mut offset: usize = 0;
        for (name, data, dtype, shape) in &self.entries {
            header_map.insert(name.clone(), serde_json::json!({
                "dtype": dtype,
                "shape": shape,
                "data_offsets": [offset, offset + data.len()],
            }));
            offset += data.len();
        }
        let hdr_bytes = serde_json::to_vec(&header_map)
            .map_err(|e| Error::format(format!("encoding safetensors header: {e}")))?;
        let pad = (8 - hdr_bytes.len() % 8) % 8;
        let padded: Vec<u8> = hdr_bytes.into_iter()
            .chain(std::iter::repeat(b' ').take(pad))
            .collect();

        let mut out = Vec::with_capacity(8 + padded.len() + offset);
        out.extend_from_slice(&(padded.len() as u64).to_le_bytes());
        out.extend_from_slice(&padded);
        for (_, data, _, _) in &self.entries {
            out.extend_from_slice(data);
        }
        std::fs::write(path, &out).map_err(|e| Error::io(path, e))
    }
}

// ── Dataset export ────────────────────────────────────────────────────────

/// Write a compiled dataset as `x_train`, `y_train`, `x_test`, `y_test`
/// (all F64).
pub fn write_dataset<P: AsRef<Path>>(ds: &Dataset, path: P) -> Result<()> {
    let mut w = StWriter::new();
    w.add_f64_arr2(KEY_X_TRAIN, &ds.x_train);
    w.add_f64_arr1(KEY_Y_TRAIN, &ds.y_train);
    w.add_f64_arr2(KEY_X_TEST, &ds.x_test);
    w.add_f64_arr1(KEY_Y_TEST, &ds.y_test);
    w.write(path)
}

/// Read a dataset written by [`write_dataset`].
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let mut t = read_tensors(path)?;
    dataset_from(&mut t).map_err(|e| e.at_path(path))
}

fn dataset_from(t: &mut HashMap<String, ArrayD<f64>>) -> Result<Dataset> {
    Ok(Dataset {
        x_train: take_matrix(t, KEY_X_TRAIN)?,
        y_train: take_vector(t, KEY_Y_TRAIN)?,
        x_test: take_matrix(t, KEY_X_TEST)?,
        y_test: take_vector(t, KEY_Y_TEST)?,
    })
}
