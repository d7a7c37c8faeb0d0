//! MAT-file data-element tags and payload decoding.
//!
//! Every piece of a Level-5 file after the header is a data element:
//!
//! ```text
//! regular element                       small element (nbytes <= 4)
//! ┌───────────────┬───────────────┐     ┌────────────┬────────────┬──────────┐
//! │ type : u32    │ nbytes : u32  │     │ nbytes:u16 │ type : u16 │ data (4) │
//! ├───────────────┴───────────────┤     └────────────┴────────────┴──────────┘
//! │ <nbytes of data, padded to 8> │
//! └───────────────────────────────┘
//! ```
//!
//! A small element is recognised by a non-zero upper half in the first
//! 32-bit word.  `miCOMPRESSED` payloads are not padded.
use super::constants::*;
use crate::error::{Error, Result};

// ── Byte order ────────────────────────────────────────────────────────────

/// Byte order of a MAT-file, taken from its header's endian indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

macro_rules! endian_reader {
    ($name:ident, $t:ty, $n:expr) => {
        pub fn $name(&self, b: &[u8]) -> $t {
            let mut a = [0u8; $n];
            a.copy_from_slice(&b[..$n]);
            match self {
                Endian::Little => <$t>::from_le_bytes(a),
                Endian::Big => <$t>::from_be_bytes(a),
            }
        }
    };
}

impl Endian {
    endian_reader!(u16, u16, 2);
    endian_reader!(u32, u32, 4);
    endian_reader!(i8, i8, 1);
    endian_reader!(i16, i16, 2);
    endian_reader!(i32, i32, 4);
    endian_reader!(i64, i64, 8);
    endian_reader!(u64, u64, 8);
    endian_reader!(f32, f32, 4);
    endian_reader!(f64, f64, 8);
}

// ── Tag ───────────────────────────────────────────────────────────────────

/// Header of one data element; payload not yet decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementTag {
    pub mtype: u32,
    pub nbytes: usize,
    /// Byte offset of the tag within its buffer.
    pub pos: usize,
    pub small: bool,
}

impl ElementTag {
    /// Offset of the first payload byte.
    #[inline]
    pub fn data_pos(&self) -> usize {
        if self.small { self.pos + 4 } else { self.pos + 8 }
    }

    /// Offset of the element that follows this one.
    pub fn next_pos(&self) -> usize {
        if self.small {
            self.pos + 8
        } else if self.mtype == MI_COMPRESSED {
            self.data_pos() + self.nbytes
        } else {
            self.data_pos() + pad8(self.nbytes)
        }
    }
}

/// Round `n` up to the next multiple of 8.
#[inline]
pub fn pad8(n: usize) -> usize {
    (n + 7) & !7
}

/// Read the element tag at `pos`.
pub fn read_tag(buf: &[u8], pos: usize, endian: Endian) -> Result<ElementTag> {
    if pos + 8 > buf.len() {
        return Err(Error::format(format!("truncated element tag @ {pos:#x}")));
    }
    let word = endian.u32(&buf[pos..]);
    let tag = if word >> 16 != 0 {
        ElementTag {
            mtype: word & 0xffff,
            nbytes: (word >> 16) as usize,
            pos,
            small: true,
        }
    } else {
        ElementTag {
            mtype: word,
            nbytes: endian.u32(&buf[pos + 4..]) as usize,
            pos,
            small: false,
        }
    };
    if tag.small && tag.nbytes > 4 {
        return Err(Error::format(format!(
            "small element @ {pos:#x} claims {} bytes",
            tag.nbytes
        )));
    }
    if tag.data_pos() + tag.nbytes > buf.len() {
        return Err(Error::format(format!(
            "{} element @ {pos:#x} runs past end of data ({} bytes)",
            mi_name(tag.mtype),
            tag.nbytes
        )));
    }
    Ok(tag)
}

/// Payload bytes of `tag` (without padding).
#[inline]
pub fn element_data<'a>(buf: &'a [u8], tag: &ElementTag) -> &'a [u8] {
    &buf[tag.data_pos()..tag.data_pos() + tag.nbytes]
}

// ── Payload decoding ──────────────────────────────────────────────────────

/// Decode a numeric payload of any integer or float type, widened to `f64`.
pub fn decode_numeric(bytes: &[u8], mtype: u32, endian: Endian) -> Result<Vec<f64>> {
    let size = mi_size(mtype)
        .filter(|_| !matches!(mtype, MI_UTF8 | MI_UTF16 | MI_UTF32))
        .ok_or_else(|| {
            Error::format(format!("{} is not a numeric data type", mi_name(mtype)))
        })?;
    if bytes.len() % size != 0 {
        return Err(Error::format(format!(
            "{} payload of {} bytes is not a whole number of values",
            mi_name(mtype),
            bytes.len()
        )));
    }
    let chunks = bytes.chunks_exact(size);
    Ok(match mtype {
        MI_INT8 => chunks.map(|b| endian.i8(b) as f64).collect(),
        MI_UINT8 => chunks.map(|b| b[0] as f64).collect(),
        MI_INT16 => chunks.map(|b| endian.i16(b) as f64).collect(),
        MI_UINT16 => chunks.map(|b| endian.u16(b) as f64).collect(),
        MI_INT32 => chunks.map(|b| endian.i32(b) as f64).collect(),
        MI_UINT32 => chunks.map(|b| endian.u32(b) as f64).collect(),
        MI_SINGLE => chunks.map(|b| endian.f32(b) as f64).collect(),
        MI_DOUBLE => chunks.map(|b| endian.f64(b)).collect(),
        MI_INT64 => chunks.map(|b| endian.i64(b) as f64).collect(),
        MI_UINT64 => chunks.map(|b| endian.u64(b) as f64).collect(),
        _ => unreachable!("mi_size admitted a non-numeric type"),
    })
}

/// Decode an `miINT32` payload (dimensions, field-name lengths).
pub fn decode_i32(bytes: &[u8], mtype: u32, endian: Endian) -> Result<Vec<i32>> {
    if mtype != MI_INT32 {
        return Err(Error::format(format!("expected miINT32, found {}", mi_name(mtype))));
    }
    Ok(bytes.chunks_exact(4).map(|b| endian.i32(b)).collect())
}

/// Decode character data.
///
/// MATLAB writes chars as `miUINT16`/`miUTF16` code units; other writers use
/// `miUTF8` or `miUINT8`.
pub fn decode_text(bytes: &[u8], mtype: u32, endian: Endian) -> Result<String> {
    match mtype {
        MI_UTF8 => Ok(String::from_utf8_lossy(bytes).into_owned()),
        // Latin-1: one byte per char.
        MI_UINT8 | MI_INT8 => Ok(bytes.iter().map(|&b| b as char).collect()),
        MI_UINT16 | MI_UTF16 => {
            let units: Vec<u16> = bytes.chunks_exact(2).map(|b| endian.u16(b)).collect();
            Ok(String::from_utf16_lossy(&units))
        }
        MI_UTF32 | MI_UINT32 | MI_INT32 => Ok(bytes
            .chunks_exact(4)
            .map(|b| char::from_u32(endian.u32(b)).unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()),
        other => Err(Error::format(format!("{} cannot hold characters", mi_name(other)))),
    }
}

/// Decode a NUL-padded ASCII name (array names, struct field names).
pub fn decode_name(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_tag_little_endian() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&MI_DOUBLE.to_le_bytes());
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1.5f64.to_le_bytes());
        buf.extend_from_slice(&(-2.0f64).to_le_bytes());

        let tag = read_tag(&buf, 0, Endian::Little).unwrap();
        assert_eq!(tag.mtype, MI_DOUBLE);
        assert_eq!(tag.nbytes, 16);
        assert!(!tag.small);
        assert_eq!(tag.next_pos(), 24);
        let v = decode_numeric(element_data(&buf, &tag), tag.mtype, Endian::Little).unwrap();
        assert_eq!(v, vec![1.5, -2.0]);
    }

    #[test]
    fn small_tag_big_endian() {
        // nbytes = 2, type = miINT16, then two bytes of data + 2 of padding.
        let word: u32 = (2 << 16) | MI_INT16;
        let mut buf = word.to_be_bytes().to_vec();
        buf.extend_from_slice(&(-7i16).to_be_bytes());
        buf.extend_from_slice(&[0, 0]);

        let tag = read_tag(&buf, 0, Endian::Big).unwrap();
        assert!(tag.small);
        assert_eq!(tag.mtype, MI_INT16);
        assert_eq!(tag.data_pos(), 4);
        assert_eq!(tag.next_pos(), 8);
        let v = decode_numeric(element_data(&buf, &tag), tag.mtype, Endian::Big).unwrap();
        assert_eq!(v, vec![-7.0]);
    }

    #[test]
    fn padding_is_skipped() {
        let tag = ElementTag { mtype: MI_INT8, nbytes: 5, pos: 16, small: false };
        assert_eq!(tag.next_pos(), 16 + 8 + 8);
        let tag = ElementTag { mtype: MI_COMPRESSED, nbytes: 5, pos: 16, small: false };
        assert_eq!(tag.next_pos(), 16 + 8 + 5);
    }

    #[test]
    fn truncated_payload_is_rejected() {
        let mut buf = MI_DOUBLE.to_le_bytes().to_vec();
        buf.extend_from_slice(&64u32.to_le_bytes());
        buf.extend_from_slice(&[0u8; 8]);
        assert!(matches!(read_tag(&buf, 0, Endian::Little), Err(Error::FileFormat { .. })));
    }

    #[test]
    fn utf16_text() {
        let bytes: Vec<u8> = "Sz1".encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
        assert_eq!(decode_text(&bytes, MI_UINT16, Endian::Little).unwrap(), "Sz1");
    }

    #[test]
    fn names_stop_at_nul() {
        assert_eq!(decode_name(b"label\0\0\0"), "label");
        assert_eq!(decode_name(b"fv"), "fv");
    }
}
