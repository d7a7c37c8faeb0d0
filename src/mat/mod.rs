//! MATLAB Level-5 MAT-file codec.
//!
//! Reads and writes the `.mat` files the feature-extraction stage produces
//! (MATLAB `save` or `scipy.io.savemat`), without MATLAB or Python.
//!
//! # Quick start
//! ```no_run
//! use eegset::mat::read_mat;
//!
//! let mat = read_mat("DV19_EEG_10sec_gmi_th=1.mat").unwrap();
//! let data = mat.variable("data").unwrap();
//! println!("{} windows, fields {:?}", data.numel(), data.field_names());
//! ```
pub mod array;
pub mod constants;
pub mod element;
pub mod reader;
pub mod writer;

pub use array::{MatArray, MatData, NumericClass};
pub use element::{ElementTag, Endian, read_tag};
pub use reader::{MatFile, parse_mat, read_mat};
pub use writer::MatWriter;
