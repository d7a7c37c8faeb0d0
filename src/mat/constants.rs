//! MAT-file Level 5 constants.
//!
//! Values from the MathWorks "MAT-File Format" reference (Level 5).

/// Bytes of descriptive text at the start of the header.
pub const HEADER_TEXT_LEN: usize = 116;
/// Full header length: text + subsystem offset + version + endian indicator.
pub const HEADER_LEN: usize = 128;
/// Version field of every Level-5 file.
pub const MAT_VERSION: u16 = 0x0100;

// ── Data types (element tags) ─────────────────────────────────────────────

pub const MI_INT8: u32 = 1;
pub const MI_UINT8: u32 = 2;
pub const MI_INT16: u32 = 3;
pub const MI_UINT16: u32 = 4;
pub const MI_INT32: u32 = 5;
pub const MI_UINT32: u32 = 6;
pub const MI_SINGLE: u32 = 7;
pub const MI_DOUBLE: u32 = 9;
pub const MI_INT64: u32 = 12;
pub const MI_UINT64: u32 = 13;
pub const MI_MATRIX: u32 = 14;
pub const MI_COMPRESSED: u32 = 15;
pub const MI_UTF8: u32 = 16;
pub const MI_UTF16: u32 = 17;
pub const MI_UTF32: u32 = 18;

// ── Array classes (low byte of the array-flags word) ──────────────────────

pub const MX_CELL_CLASS: u8 = 1;
pub const MX_STRUCT_CLASS: u8 = 2;
pub const MX_OBJECT_CLASS: u8 = 3;
pub const MX_CHAR_CLASS: u8 = 4;
pub const MX_SPARSE_CLASS: u8 = 5;
pub const MX_DOUBLE_CLASS: u8 = 6;
pub const MX_SINGLE_CLASS: u8 = 7;
pub const MX_INT8_CLASS: u8 = 8;
pub const MX_UINT8_CLASS: u8 = 9;
pub const MX_INT16_CLASS: u8 = 10;
pub const MX_UINT16_CLASS: u8 = 11;
pub const MX_INT32_CLASS: u8 = 12;
pub const MX_UINT32_CLASS: u8 = 13;
pub const MX_INT64_CLASS: u8 = 14;
pub const MX_UINT64_CLASS: u8 = 15;

// ── Array-flag bits ───────────────────────────────────────────────────────

pub const FLAG_COMPLEX: u32 = 0x0800;
pub const FLAG_GLOBAL: u32 = 0x0400;
pub const FLAG_LOGICAL: u32 = 0x0200;

/// Field-name slot width MATLAB writes by default.
pub const DEFAULT_FIELD_NAME_LEN: usize = 32;

/// Size in bytes of one value of the given data type, if it is numeric.
pub fn mi_size(mtype: u32) -> Option<usize> {
    match mtype {
        MI_INT8 | MI_UINT8 | MI_UTF8 => Some(1),
        MI_INT16 | MI_UINT16 | MI_UTF16 => Some(2),
        MI_INT32 | MI_UINT32 | MI_SINGLE | MI_UTF32 => Some(4),
        MI_DOUBLE | MI_INT64 | MI_UINT64 => Some(8),
        _ => None,
    }
}

/// Human-readable data-type name, for diagnostics.
pub fn mi_name(mtype: u32) -> &'static str {
    match mtype {
        MI_INT8 => "miINT8",
        MI_UINT8 => "miUINT8",
        MI_INT16 => "miINT16",
        MI_UINT16 => "miUINT16",
        MI_INT32 => "miINT32",
        MI_UINT32 => "miUINT32",
        MI_SINGLE => "miSINGLE",
        MI_DOUBLE => "miDOUBLE",
        MI_INT64 => "miINT64",
        MI_UINT64 => "miUINT64",
        MI_MATRIX => "miMATRIX",
        MI_COMPRESSED => "miCOMPRESSED",
        MI_UTF8 => "miUTF8",
        MI_UTF16 => "miUTF16",
        MI_UTF32 => "miUTF32",
        _ => "unknown",
    }
}
