//! # eegset: seizure / interictal EEG feature datasets
//!
//! `eegset` turns per-patient EEG feature files (MATLAB `.mat`) into the
//! train/test matrices a seizure classifier is fitted on.  The MAT-file
//! codec is native; no MATLAB, Python or HDF5 is needed.
//!
//! ## Pipeline overview
//!
//! ```text
//! <PT>19_EEG_<win>sec_<gmi>_th=<t>.mat   (DV, GB, SW, PE, RS, JY)
//!   │
//!   ├─ loader::load_seizure()      fv / label / Seizure per window + keep flags
//!   ├─ slice train/test ranges     inclusive, per patient (config::RangeTable)
//!   ├─ state policy                s1 | s2 | s1s2
//!   │
//! 6P19_EEG_<win>sec_<gmi>_th=<t>.mat
//!   ├─ loader::load_interictal()   fv per window, label 0       (not for s1s2)
//!   ├─ split::train_test_split()   ceil(test_size · n) rows to test
//!   │
//!   └─ split::shuffle_rows()       training rows only
//!        │
//!        └─→ Dataset { x_train, y_train, x_test, y_test }
//! ```
//!
//! ## Quick start
//!
//! ```no_run
//! use eegset::{compile_dataset, CompileConfig, StatePolicy, WindowSize};
//!
//! let cfg = CompileConfig {
//!     gmi_type:    "gmi".into(),
//!     window_size: WindowSize::Ten,
//!     policy:      StatePolicy::S1,
//!     seed:        Some(0),
//!     ..CompileConfig::default()
//! };
//! let ds = compile_dataset("data/features", &cfg).unwrap();
//! eegset::io::write_dataset(&ds, std::path::Path::new("dataset.safetensors")).unwrap();
//! ```
//!
//! ## Full-seizure inference path
//!
//! ```no_run
//! use eegset::full::{extract, save_detection};
//! use ndarray::Array1;
//!
//! let sz = extract("DV_full.mat").unwrap();
//! let classes = Array1::<f64>::zeros(sz.features.nrows()); // from the classifier
//! save_detection("DV_detect.mat", sz.features.view(), classes.view(), sz.markers.view()).unwrap();
//! ```

pub mod compile;
pub mod config;
pub mod error;
pub mod full;
pub mod io;
pub mod loader;
pub mod mat;
pub mod record;
pub mod split;
pub mod stack;

// ── Crate-root re-exports ─────────────────────────────────────────────────

// compile
pub use compile::{compile_dataset, interictal_file_name, seizure_file_name, Dataset};

// config
pub use config::{
    CompileConfig, IndexRange, PatientSplit, RangeTable, StatePolicy, WindowSize, PATIENTS,
};

// error
pub use error::{Error, Result};

// full
pub use full::{extract as full_seizure_extract, save_detection as full_seizure_save, FullSeizure};

// io
pub use io::{load_dataset, read_tensors, write_dataset, StWriter};

// loader
pub use loader::{keep_flags, load_interictal, load_seizure, SeizureWindows};

// mat
pub use mat::{read_mat, MatArray, MatFile, MatWriter};

// record
pub use record::{FullSeizureRecord, InterictalRecord, SeizureId, WindowRecord};

// split
pub use split::{shuffle_rows, train_test_split, Labeled};
