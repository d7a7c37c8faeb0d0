//! Level-5 MAT-file writer, a native counterpart of `scipy.io.savemat`.
//!
//! Files are always written little-endian.  With compression enabled every
//! top-level variable is wrapped in its own zlib `miCOMPRESSED` element, the
//! way MATLAB's default `save` does.
use std::io::Write;
use std::path::Path;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use super::array::{MatArray, MatData, NumericClass};
use super::constants::*;
use super::element::pad8;
use crate::error::{Error, Result};

/// Collects named variables and writes them as one MAT-file.
///
/// ```rust,no_run
/// use eegset::mat::{MatArray, MatWriter};
///
/// let mut w = MatWriter::new();
/// w.add("x", MatArray::row(&[1.0, 2.0, 3.0]));
/// w.write("/tmp/x.mat").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct MatWriter {
    header_text: String,
    compress: bool,
    variables: Vec<(String, MatArray)>,
}

impl Default for MatWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl MatWriter {
    pub fn new() -> Self {
        Self {
            header_text: format!(
                "MATLAB 5.0 MAT-file, Platform: {}, Created by: eegset {}",
                std::env::consts::OS,
                env!("CARGO_PKG_VERSION")
            ),
            compress: false,
            variables: Vec::new(),
        }
    }

    /// Enable or disable zlib compression of each variable.
    pub fn compressed(mut self, yes: bool) -> Self {
        self.compress = yes;
        self
    }

    /// Queue a variable; a later variable with the same name replaces it.
    pub fn add(&mut self, name: &str, array: MatArray) {
        self.variables.retain(|(n, _)| n != name);
        self.variables.push((name.to_string(), array));
    }

    /// Serialise header and variables.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(HEADER_LEN);
        let mut text = self.header_text.clone().into_bytes();
        text.resize(HEADER_TEXT_LEN, b' ');
        out.extend_from_slice(&text);
        out.extend_from_slice(&[0u8; 8]); // no subsystem data
        out.extend_from_slice(&MAT_VERSION.to_le_bytes());
        out.extend_from_slice(b"IM");

        for (name, array) in &self.variables {
            array.check_consistent().map_err(|e| match e {
                Error::ShapeMismatch { context, expected, found } => Error::ShapeMismatch {
                    context: format!("variable '{name}': {context}"),
                    expected,
                    found,
                },
                other => other,
            })?;
            let mut element = Vec::new();
            write_matrix(&mut element, name, array);
            if self.compress {
                let z = deflate(&element)
                    .map_err(|e| Error::format(format!("compressing '{name}': {e}")))?;
                write_tag(&mut out, MI_COMPRESSED, z.len());
                out.extend_from_slice(&z);
            } else {
                out.extend_from_slice(&element);
            }
        }
        Ok(out)
    }

    /// Write the file, replacing anything already at `path`.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        std::fs::write(path, &bytes).map_err(|e| Error::io(path, e))?;
        log::debug!("wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

// ── Element encoding ──────────────────────────────────────────────────────

fn deflate(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(bytes)?;
    enc.finish()
}

fn write_tag(out: &mut Vec<u8>, mtype: u32, nbytes: usize) {
    out.extend_from_slice(&mtype.to_le_bytes());
    out.extend_from_slice(&(nbytes as u32).to_le_bytes());
}

/// Regular element: tag, payload, zero padding to 8 bytes.
fn write_element(out: &mut Vec<u8>, mtype: u32, payload: &[u8]) {
    write_tag(out, mtype, payload.len());
    out.extend_from_slice(payload);
    out.resize(out.len() + pad8(payload.len()) - payload.len(), 0);
}

/// Small element: up to 4 bytes packed into the tag.
fn write_small_element(out: &mut Vec<u8>, mtype: u32, payload: &[u8]) {
    debug_assert!(payload.len() <= 4);
    out.extend_from_slice(&(((payload.len() as u32) << 16) | mtype).to_le_bytes());
    let mut data = [0u8; 4];
    data[..payload.len()].copy_from_slice(payload);
    out.extend_from_slice(&data);
}

fn encode_values(values: &[f64], class: NumericClass) -> Vec<u8> {
    match class {
        NumericClass::Double => values.iter().flat_map(|v| v.to_le_bytes()).collect(),
        NumericClass::Single => values.iter().flat_map(|&v| (v as f32).to_le_bytes()).collect(),
        NumericClass::Int8 => values.iter().flat_map(|&v| (v as i8).to_le_bytes()).collect(),
        NumericClass::UInt8 => values.iter().map(|&v| v as u8).collect(),
        NumericClass::Int16 => values.iter().flat_map(|&v| (v as i16).to_le_bytes()).collect(),
        NumericClass::UInt16 => values.iter().flat_map(|&v| (v as u16).to_le_bytes()).collect(),
        NumericClass::Int32 => values.iter().flat_map(|&v| (v as i32).to_le_bytes()).collect(),
        NumericClass::UInt32 => values.iter().flat_map(|&v| (v as u32).to_le_bytes()).collect(),
        NumericClass::Int64 => values.iter().flat_map(|&v| (v as i64).to_le_bytes()).collect(),
        NumericClass::UInt64 => values.iter().flat_map(|&v| (v as u64).to_le_bytes()).collect(),
    }
}

/// Append one complete `miMATRIX` element for `array`.
fn write_matrix(out: &mut Vec<u8>, name: &str, array: &MatArray) {
    let mut body = Vec::new();

    let (class, mut flags) = match &array.data {
        MatData::Numeric { class, logical, imag, .. } => {
            let mut f = 0;
            if *logical {
                f |= FLAG_LOGICAL;
            }
            if imag.is_some() {
                f |= FLAG_COMPLEX;
            }
            (class.mx(), f)
        }
        MatData::Char(_) => (MX_CHAR_CLASS, 0),
        MatData::Cell(_) => (MX_CELL_CLASS, 0),
        MatData::Struct { .. } => (MX_STRUCT_CLASS, 0),
    };
    flags |= class as u32;
    let mut flag_bytes = flags.to_le_bytes().to_vec();
    flag_bytes.extend_from_slice(&0u32.to_le_bytes());
    write_element(&mut body, MI_UINT32, &flag_bytes);

    let dims: Vec<u8> = array.dims.iter().flat_map(|&d| (d as i32).to_le_bytes()).collect();
    write_element(&mut body, MI_INT32, &dims);

    if name.len() <= 4 {
        write_small_element(&mut body, MI_INT8, name.as_bytes());
    } else {
        write_element(&mut body, MI_INT8, name.as_bytes());
    }

    match &array.data {
        MatData::Numeric { class, real, imag, .. } => {
            write_element(&mut body, class.mi_type(), &encode_values(real, *class));
            if let Some(im) = imag {
                write_element(&mut body, class.mi_type(), &encode_values(im, *class));
            }
        }
        MatData::Char(s) => {
            let units: Vec<u8> = s.encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
            write_element(&mut body, MI_UINT16, &units);
        }
        MatData::Cell(cells) => {
            for c in cells {
                write_matrix(&mut body, "", c);
            }
        }
        MatData::Struct { fields, elements } => {
            let longest = fields.iter().map(String::len).max().unwrap_or(0);
            let slot = DEFAULT_FIELD_NAME_LEN.max(longest + 1);
            write_small_element(&mut body, MI_INT32, &(slot as i32).to_le_bytes());
            let mut names = vec![0u8; slot * fields.len()];
            for (i, f) in fields.iter().enumerate() {
                names[i * slot..i * slot + f.len()].copy_from_slice(f.as_bytes());
            }
            write_element(&mut body, MI_INT8, &names);
            for el in elements {
                for v in el {
                    write_matrix(&mut body, "", v);
                }
            }
        }
    }

    write_tag(out, MI_MATRIX, body.len());
    out.extend_from_slice(&body);
}
