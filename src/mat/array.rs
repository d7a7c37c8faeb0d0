//! In-memory MATLAB arrays.
//!
//! A [`MatArray`] is one decoded `miMATRIX` element: its dimensions plus a
//! class-specific payload.  Element storage follows MATLAB's column-major
//! order throughout; [`MatArray::to_array2`] and [`MatArray::from_array2`]
//! convert to and from row-major `ndarray` matrices.
use ndarray::{Array2, ShapeBuilder};

use super::constants::*;
use crate::error::{Error, Result};

/// Numeric array classes.  Values are widened to `f64` on read and narrowed
/// back to the class's storage type on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericClass {
    Double,
    Single,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
}

impl NumericClass {
    pub fn from_mx(class: u8) -> Option<Self> {
        Some(match class {
            MX_DOUBLE_CLASS => NumericClass::Double,
            MX_SINGLE_CLASS => NumericClass::Single,
            MX_INT8_CLASS => NumericClass::Int8,
            MX_UINT8_CLASS => NumericClass::UInt8,
            MX_INT16_CLASS => NumericClass::Int16,
            MX_UINT16_CLASS => NumericClass::UInt16,
            MX_INT32_CLASS => NumericClass::Int32,
            MX_UINT32_CLASS => NumericClass::UInt32,
            MX_INT64_CLASS => NumericClass::Int64,
            MX_UINT64_CLASS => NumericClass::UInt64,
            _ => return None,
        })
    }

    pub fn mx(&self) -> u8 {
        match self {
            NumericClass::Double => MX_DOUBLE_CLASS,
            NumericClass::Single => MX_SINGLE_CLASS,
            NumericClass::Int8 => MX_INT8_CLASS,
            NumericClass::UInt8 => MX_UINT8_CLASS,
            NumericClass::Int16 => MX_INT16_CLASS,
            NumericClass::UInt16 => MX_UINT16_CLASS,
            NumericClass::Int32 => MX_INT32_CLASS,
            NumericClass::UInt32 => MX_UINT32_CLASS,
            NumericClass::Int64 => MX_INT64_CLASS,
            NumericClass::UInt64 => MX_UINT64_CLASS,
        }
    }

    /// Element data type used when writing this class.
    pub fn mi_type(&self) -> u32 {
        match self {
            NumericClass::Double => MI_DOUBLE,
            NumericClass::Single => MI_SINGLE,
            NumericClass::Int8 => MI_INT8,
            NumericClass::UInt8 => MI_UINT8,
            NumericClass::Int16 => MI_INT16,
            NumericClass::UInt16 => MI_UINT16,
            NumericClass::Int32 => MI_INT32,
            NumericClass::UInt32 => MI_UINT32,
            NumericClass::Int64 => MI_INT64,
            NumericClass::UInt64 => MI_UINT64,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NumericClass::Double => "double",
            NumericClass::Single => "single",
            NumericClass::Int8 => "int8",
            NumericClass::UInt8 => "uint8",
            NumericClass::Int16 => "int16",
            NumericClass::UInt16 => "uint16",
            NumericClass::Int32 => "int32",
            NumericClass::UInt32 => "uint32",
            NumericClass::Int64 => "int64",
            NumericClass::UInt64 => "uint64",
        }
    }
}

/// Class-specific payload of a [`MatArray`].
#[derive(Debug, Clone, PartialEq)]
pub enum MatData {
    Numeric {
        class: NumericClass,
        logical: bool,
        real: Vec<f64>,
        imag: Option<Vec<f64>>,
    },
    /// Characters in column-major storage order.
    Char(String),
    /// Cells in column-major order.
    Cell(Vec<MatArray>),
    /// `elements[i][f]` is field `fields[f]` of struct element `i`
    /// (elements in column-major order).
    Struct {
        fields: Vec<String>,
        elements: Vec<Vec<MatArray>>,
    },
}

/// One MATLAB array: dimensions plus payload.
#[derive(Debug, Clone, PartialEq)]
pub struct MatArray {
    pub dims: Vec<usize>,
    pub data: MatData,
}

impl MatArray {
    // ── Constructors ──────────────────────────────────────────────────────

    /// Double array with explicit dimensions; `real` is column-major.
    pub fn numeric(dims: Vec<usize>, real: Vec<f64>) -> Self {
        Self {
            dims,
            data: MatData::Numeric {
                class: NumericClass::Double,
                logical: false,
                real,
                imag: None,
            },
        }
    }

    /// 1×1 double.
    pub fn scalar(v: f64) -> Self {
        Self::numeric(vec![1, 1], vec![v])
    }

    /// 1×N double row vector.
    pub fn row(values: &[f64]) -> Self {
        Self::numeric(vec![1, values.len()], values.to_vec())
    }

    /// 0×0 double, MATLAB's `[]`.
    pub fn empty() -> Self {
        Self::numeric(vec![0, 0], Vec::new())
    }

    /// R×C double from a row-major matrix.
    pub fn from_array2(arr: &Array2<f64>) -> Self {
        let (r, c) = arr.dim();
        Self::numeric(vec![r, c], arr.t().iter().copied().collect())
    }

    /// 1×N char array (0×0 for the empty string).
    pub fn char(s: &str) -> Self {
        let n = s.encode_utf16().count();
        let dims = if n == 0 { vec![0, 0] } else { vec![1, n] };
        Self { dims, data: MatData::Char(s.to_string()) }
    }

    /// 1×N cell array.
    pub fn cell_row(cells: Vec<MatArray>) -> Self {
        Self { dims: vec![1, cells.len()], data: MatData::Cell(cells) }
    }

    /// 1×1 struct with the given `(name, value)` fields, in order.
    pub fn struct_scalar(fields: Vec<(&str, MatArray)>) -> Self {
        let (names, values): (Vec<String>, Vec<MatArray>) =
            fields.into_iter().map(|(n, v)| (n.to_string(), v)).unzip();
        Self {
            dims: vec![1, 1],
            data: MatData::Struct { fields: names, elements: vec![values] },
        }
    }

    /// 1×N struct array; every element must supply one value per field.
    pub fn struct_row(fields: &[&str], elements: Vec<Vec<MatArray>>) -> Self {
        Self {
            dims: vec![1, elements.len()],
            data: MatData::Struct {
                fields: fields.iter().map(|s| s.to_string()).collect(),
                elements,
            },
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// Number of elements (product of dimensions).
    pub fn numel(&self) -> usize {
        self.dims.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.numel() == 0
    }

    /// MATLAB class name, for diagnostics.
    pub fn class_name(&self) -> &'static str {
        match &self.data {
            MatData::Numeric { logical: true, .. } => "logical",
            MatData::Numeric { class, .. } => class.name(),
            MatData::Char(_) => "char",
            MatData::Cell(_) => "cell",
            MatData::Struct { .. } => "struct",
        }
    }

    /// Real part of a numeric array, column-major.
    pub fn real(&self) -> Option<&[f64]> {
        match &self.data {
            MatData::Numeric { real, .. } => Some(real),
            _ => None,
        }
    }

    /// The value of a one-element numeric array.
    pub fn scalar_value(&self) -> Option<f64> {
        match self.real() {
            Some([v]) => Some(*v),
            _ => None,
        }
    }

    /// Text of a char array.
    pub fn text(&self) -> Option<&str> {
        match &self.data {
            MatData::Char(s) => Some(s),
            _ => None,
        }
    }

    /// Cells of a cell array, column-major.
    pub fn cells(&self) -> Option<&[MatArray]> {
        match &self.data {
            MatData::Cell(c) => Some(c),
            _ => None,
        }
    }

    /// Field names of a struct array.
    pub fn field_names(&self) -> Option<&[String]> {
        match &self.data {
            MatData::Struct { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Field `name` of struct element `index`.
    pub fn field(&self, index: usize, name: &str) -> Option<&MatArray> {
        match &self.data {
            MatData::Struct { fields, elements } => {
                let f = fields.iter().position(|n| n == name)?;
                elements.get(index)?.get(f)
            }
            _ => None,
        }
    }

    /// Numeric array as a row-major `[rows, cols]` matrix.
    ///
    /// Trailing singleton dimensions beyond the second are accepted.
    pub fn to_array2(&self) -> Result<Array2<f64>> {
        let real = self.real().ok_or_else(|| {
            Error::format(format!("expected a numeric array, found {}", self.class_name()))
        })?;
        if self.dims.len() > 2 && self.dims[2..].iter().any(|&d| d != 1) {
            return Err(Error::format(format!(
                "expected a 2-D array, found dimensions {:?}",
                self.dims
            )));
        }
        let rows = self.dims.first().copied().unwrap_or(0);
        let cols = self.dims.get(1).copied().unwrap_or(1);
        Array2::from_shape_vec((rows, cols).f(), real.to_vec())
            .map(|a| a.as_standard_layout().to_owned())
            .map_err(|e| Error::format(format!("array data does not fit {:?}: {e}", self.dims)))
    }

    /// Check that the payload length agrees with the dimensions.
    pub(crate) fn check_consistent(&self) -> Result<()> {
        let n = self.numel();
        let (found, nested) = match &self.data {
            MatData::Numeric { real, imag, .. } => {
                if let Some(im) = imag {
                    if im.len() != real.len() {
                        return Err(mismatch("imaginary part", vec![real.len()], vec![im.len()]));
                    }
                }
                (real.len(), None)
            }
            MatData::Char(s) => (s.encode_utf16().count(), None),
            MatData::Cell(c) => (c.len(), Some(c.iter().collect::<Vec<_>>())),
            MatData::Struct { fields, elements } => {
                for el in elements {
                    if el.len() != fields.len() {
                        return Err(mismatch("struct element", vec![fields.len()], vec![el.len()]));
                    }
                }
                (elements.len(), Some(elements.iter().flatten().collect()))
            }
        };
        if found != n {
            return Err(mismatch("array payload", self.dims.clone(), vec![found]));
        }
        if let Some(children) = nested {
            for child in children {
                child.check_consistent()?;
            }
        }
        Ok(())
    }
}

fn mismatch(context: &str, expected: Vec<usize>, found: Vec<usize>) -> Error {
    Error::ShapeMismatch { context: context.to_string(), expected, found }
}
