//! Level-5 MAT-file reader, a native counterpart of `scipy.io.loadmat`.
//!
//! # Algorithm
//! 1. Read the whole file into memory.
//! 2. Validate the 128-byte header and pick the byte order.
//! 3. Walk the top-level elements.  `miCOMPRESSED` elements are inflated and
//!    their single inner element parsed in place; `miMATRIX` elements are
//!    decoded recursively into [`MatArray`] values.
//! 4. Anything else at top level is skipped.
use std::io::Read;
use std::path::Path;

use flate2::read::ZlibDecoder;

use super::array::{MatArray, MatData, NumericClass};
use super::constants::*;
use super::element::{decode_i32, decode_name, decode_numeric, decode_text, element_data, read_tag, ElementTag, Endian};
use crate::error::{Error, Result};

/// A decoded MAT-file: header text plus named top-level variables.
#[derive(Debug, Clone)]
pub struct MatFile {
    /// Descriptive header text, trailing padding removed.
    pub header_text: String,
    pub endian: Endian,
    /// Variables in file order.
    pub variables: Vec<(String, MatArray)>,
}

impl MatFile {
    /// Look up a top-level variable.
    pub fn get(&self, name: &str) -> Option<&MatArray> {
        self.variables.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Like [`MatFile::get`], but a missing variable is a format error.
    pub fn variable(&self, name: &str) -> Result<&MatArray> {
        self.get(name)
            .ok_or_else(|| Error::format(format!("no variable named '{name}'")))
    }
}

/// Read and decode the MAT-file at `path`.
pub fn read_mat<P: AsRef<Path>>(path: P) -> Result<MatFile> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    let mat = parse_mat(&bytes).map_err(|e| e.at_path(path))?;
    log::debug!(
        "read {} ({} bytes, {} variable(s))",
        path.display(),
        bytes.len(),
        mat.variables.len()
    );
    Ok(mat)
}

/// Decode a MAT-file held in memory.
pub fn parse_mat(bytes: &[u8]) -> Result<MatFile> {
    let (header_text, endian) = parse_header(bytes)?;

    let mut variables = Vec::new();
    let mut pos = HEADER_LEN;
    while pos + 8 <= bytes.len() {
        let tag = read_tag(bytes, pos, endian)?;
        match tag.mtype {
            MI_MATRIX => variables.push(parse_matrix(element_data(bytes, &tag), endian)?),
            MI_COMPRESSED => {
                let inflated = inflate(element_data(bytes, &tag))?;
                let inner = read_tag(&inflated, 0, endian)?;
                if inner.mtype != MI_MATRIX {
                    return Err(Error::format(format!(
                        "compressed element @ {pos:#x} holds {} instead of miMATRIX",
                        mi_name(inner.mtype)
                    )));
                }
                variables.push(parse_matrix(element_data(&inflated, &inner), endian)?);
            }
            other => log::debug!("skipping top-level {} element @ {pos:#x}", mi_name(other)),
        }
        pos = tag.next_pos();
    }
    Ok(MatFile { header_text, endian, variables })
}

fn parse_header(bytes: &[u8]) -> Result<(String, Endian)> {
    if bytes.len() < HEADER_LEN {
        return Err(Error::format("file too small for a Level 5 header"));
    }
    let text = String::from_utf8_lossy(&bytes[..HEADER_TEXT_LEN])
        .trim_end_matches([' ', '\0'])
        .to_string();
    if text.starts_with("MATLAB 7.3") {
        return Err(Error::format("HDF5-based v7.3 MAT-files are not supported"));
    }
    let endian = match &bytes[126..128] {
        b"IM" => Endian::Little,
        b"MI" => Endian::Big,
        _ => return Err(Error::format("not a Level 5 MAT-file (bad endian indicator)")),
    };
    let version = endian.u16(&bytes[124..126]);
    if version != MAT_VERSION {
        return Err(Error::format(format!("unsupported MAT-file version {version:#06x}")));
    }
    Ok((text, endian))
}

fn inflate(compressed: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    ZlibDecoder::new(compressed)
        .read_to_end(&mut out)
        .map_err(|e| Error::format(format!("corrupt compressed element: {e}")))?;
    Ok(out)
}

// ── miMATRIX decoding ─────────────────────────────────────────────────────

/// Sequential reader over the sub-elements of one `miMATRIX` payload.
struct SubElements<'a> {
    buf: &'a [u8],
    pos: usize,
    endian: Endian,
}

impl<'a> SubElements<'a> {
    fn next_element(&mut self, what: &str) -> Result<(ElementTag, &'a [u8])> {
        if self.pos >= self.buf.len() {
            return Err(Error::format(format!("matrix element ends before its {what}")));
        }
        let tag = read_tag(self.buf, self.pos, self.endian)?;
        self.pos = tag.next_pos();
        Ok((tag, element_data(self.buf, &tag)))
    }
}

/// Decode one `miMATRIX` payload into `(name, array)`.
fn parse_matrix(payload: &[u8], endian: Endian) -> Result<(String, MatArray)> {
    // An empty matrix element stands for `[]`.
    if payload.is_empty() {
        return Ok((String::new(), MatArray::empty()));
    }
    let mut sub = SubElements { buf: payload, pos: 0, endian };

    let (flags_tag, flags) = sub.next_element("array flags")?;
    if flags_tag.mtype != MI_UINT32 || flags.len() < 4 {
        return Err(Error::format("malformed array-flags subelement"));
    }
    let flags = endian.u32(flags);
    let class = (flags & 0xff) as u8;

    let (dims_tag, dims) = sub.next_element("dimensions")?;
    let dims = decode_i32(dims, dims_tag.mtype, endian)?
        .into_iter()
        .map(|d| usize::try_from(d).map_err(|_| Error::format(format!("negative dimension {d}"))))
        .collect::<Result<Vec<usize>>>()?;
    let numel: usize = dims.iter().product();

    let (_, name) = sub.next_element("array name")?;
    let name = decode_name(name);

    let data = match class {
        MX_CHAR_CLASS => {
            let text = if numel == 0 && sub.pos >= payload.len() {
                String::new()
            } else {
                let (tag, bytes) = sub.next_element("character data")?;
                decode_text(bytes, tag.mtype, endian)?
            };
            MatData::Char(text)
        }
        MX_CELL_CLASS => {
            let mut cells = Vec::with_capacity(numel);
            for i in 0..numel {
                cells.push(parse_nested(&mut sub, &format!("cell {i}"))?);
            }
            MatData::Cell(cells)
        }
        MX_STRUCT_CLASS => parse_struct(&mut sub, numel)?,
        MX_OBJECT_CLASS => return Err(Error::format(format!("'{name}': MATLAB objects are not supported"))),
        MX_SPARSE_CLASS => return Err(Error::format(format!("'{name}': sparse arrays are not supported"))),
        c => {
            let class = NumericClass::from_mx(c)
                .ok_or_else(|| Error::format(format!("'{name}': unknown array class {c}")))?;
            let (tag, bytes) = sub.next_element("real part")?;
            let real = decode_numeric(bytes, tag.mtype, endian)?;
            let imag = if flags & FLAG_COMPLEX != 0 {
                let (tag, bytes) = sub.next_element("imaginary part")?;
                Some(decode_numeric(bytes, tag.mtype, endian)?)
            } else {
                None
            };
            if real.len() != numel {
                return Err(Error::format(format!(
                    "'{name}': {} values for dimensions {dims:?}",
                    real.len()
                )));
            }
            MatData::Numeric { class, logical: flags & FLAG_LOGICAL != 0, real, imag }
        }
    };
    Ok((name, MatArray { dims, data }))
}

/// Decode a nested `miMATRIX` (cell content or struct field value).
fn parse_nested(sub: &mut SubElements<'_>, what: &str) -> Result<MatArray> {
    let (tag, bytes) = sub.next_element(what)?;
    if tag.mtype != MI_MATRIX {
        return Err(Error::format(format!(
            "{what}: expected miMATRIX, found {}",
            mi_name(tag.mtype)
        )));
    }
    Ok(parse_matrix(bytes, sub.endian)?.1)
}

fn parse_struct(sub: &mut SubElements<'_>, numel: usize) -> Result<MatData> {
    let (len_tag, len_bytes) = sub.next_element("field name length")?;
    let name_len = decode_i32(len_bytes, len_tag.mtype, sub.endian)?
        .first()
        .copied()
        .filter(|&n| n > 0)
        .ok_or_else(|| Error::format("invalid struct field name length"))? as usize;

    let (_, names) = sub.next_element("field names")?;
    let fields: Vec<String> = names.chunks(name_len).map(decode_name).collect();

    let mut elements = Vec::with_capacity(numel);
    for i in 0..numel {
        let mut values = Vec::with_capacity(fields.len());
        for f in &fields {
            values.push(parse_nested(sub, &format!("field '{f}' of element {i}"))?);
        }
        elements.push(values);
    }
    Ok(MatData::Struct { fields, elements })
}
