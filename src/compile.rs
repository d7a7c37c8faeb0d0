//! Dataset compiler: per-patient seizure windows plus interictal baseline
//! into shuffled train/test matrices.
//!
//! # Steps
//! 1. For each patient in table order, load the seizure file and slice the
//!    configured train/test ranges (inclusive) out of features, labels and
//!    keep flags; append to the running train/test partitions.
//! 2. Apply the state policy once to the accumulated partitions.
//! 3. Unless the policy is `s1s2`, load the interictal file, label it 0,
//!    split it randomly and append its halves to train and test.
//! 4. Shuffle the training rows.  The test rows keep their stacking order.
use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2};

use crate::config::{CompileConfig, IndexRange, StatePolicy, INTERICTAL_CODE};
use crate::error::Result;
use crate::loader::{load_interictal, load_seizure, SeizureWindows};
use crate::split::{make_rng, shuffle_rows, train_test_split, Labeled};
use crate::stack::{concat, ensure_aligned, select_rows, slice_entries, slice_rows, vstack};

/// Label value the `s1` policy treats as the seizure state.
pub const S1_STATE_LABEL: f64 = 0.0;
/// Label given to interictal rows.
pub const INTERICTAL_LABEL: f64 = 0.0;
/// Label every row surviving the `s1`/`s2` filters is rewritten to.
pub const SEIZURE_LABEL: f64 = 1.0;

/// A compiled dataset.  Training rows are shuffled; test rows are not.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub x_train: Array2<f64>,
    pub y_train: Array1<f64>,
    pub x_test: Array2<f64>,
    pub y_test: Array1<f64>,
}

/// `<PATIENT>19_EEG_<win>sec_<gmi>_th=<threshold>.mat`
pub fn seizure_file_name(patient: &str, cfg: &CompileConfig) -> String {
    format!(
        "{patient}19_EEG_{}sec_{}_th={}.mat",
        cfg.window_size, cfg.gmi_type, cfg.threshold
    )
}

/// `6P19_EEG_<win>sec_<gmi>_th=<threshold>.mat`
pub fn interictal_file_name(cfg: &CompileConfig) -> String {
    seizure_file_name(INTERICTAL_CODE, cfg)
}

// ── Accumulation ──────────────────────────────────────────────────────────

/// Running rows of one partition (train or test) across patients.
#[derive(Debug, Default)]
struct Partition {
    features: Option<Array2<f64>>,
    labels: Vec<f64>,
    keep: Vec<bool>,
}

impl Partition {
    fn append(&mut self, windows: &SeizureWindows, range: IndexRange, context: &str) -> Result<()> {
        let rows = slice_rows(windows.features.view(), range, context)?;
        let labels = slice_entries(windows.labels.view(), range, context)?;
        let keep = slice_entries(windows.keep.view(), range, context)?;
        self.features = Some(match self.features.take() {
            None => rows,
            Some(acc) => vstack(acc.view(), rows.view(), context)?,
        });
        self.labels.extend(labels.iter().copied());
        self.keep.extend(keep.iter().copied());
        Ok(())
    }

    /// Apply `policy`, returning aligned features and labels.
    fn finish(self, policy: StatePolicy) -> Result<Labeled> {
        let features = self.features.unwrap_or_else(|| Array2::zeros((0, 0)));
        let labels = Array1::from_vec(self.labels);
        ensure_aligned(features.view(), labels.len(), "seizure partition")?;
        let keep = self.keep;

        let (features, labels) = match policy {
            StatePolicy::S1S2 => (features, labels),
            StatePolicy::S1 => {
                let (x, _) = select_rows(features.view(), labels.view(), |i| {
                    labels[i] == S1_STATE_LABEL
                });
                let y = Array1::from_elem(x.nrows(), SEIZURE_LABEL);
                (x, y)
            }
            StatePolicy::S2 => {
                // Truthiness test on both columns: kept AND non-zero label.
                let (x, _) = select_rows(features.view(), labels.view(), |i| {
                    keep[i] && labels[i] != 0.0
                });
                let y = Array1::from_elem(x.nrows(), SEIZURE_LABEL);
                (x, y)
            }
        };
        Ok(Labeled { features, labels })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────

/// Compile train/test matrices from the feature files under `base_dir`.
///
/// # Errors
///
/// * [`Error::Io`] / [`Error::FileFormat`] when a file is missing or malformed.
/// * [`Error::IndexRange`] when a configured range exceeds a patient's windows.
/// * [`Error::ShapeMismatch`] when feature lengths disagree between files.
/// * [`Error::InvalidParameter`] for an invalid configuration.
///
/// [`Error::Io`]: crate::Error::Io
/// [`Error::FileFormat`]: crate::Error::FileFormat
/// [`Error::IndexRange`]: crate::Error::IndexRange
/// [`Error::ShapeMismatch`]: crate::Error::ShapeMismatch
/// [`Error::InvalidParameter`]: crate::Error::InvalidParameter
///
/// # Examples
///
/// ```no_run
/// use eegset::{compile_dataset, CompileConfig, StatePolicy};
///
/// let cfg = CompileConfig { policy: StatePolicy::S2, max_windows: 3, ..CompileConfig::default() };
/// let ds  = compile_dataset("features/", &cfg).unwrap();
/// println!("train {:?}  test {:?}", ds.x_train.dim(), ds.x_test.dim());
/// ```
pub fn compile_dataset<P: AsRef<Path>>(base_dir: P, cfg: &CompileConfig) -> Result<Dataset> {
    let base_dir = base_dir.as_ref();
    cfg.validate()?;
    let mut rng = make_rng(cfg.seed);

    // 1. Seizure windows, patient by patient.
    let mut train = Partition::default();
    let mut test = Partition::default();
    for split in cfg.ranges.splits(cfg.window_size)? {
        let path = base_dir.join(seizure_file_name(&split.patient, cfg));
        let windows = load_seizure(&path, cfg.max_windows)?;
        train.append(&windows, split.train, &format!("{} train", split.patient))?;
        test.append(&windows, split.test, &format!("{} test", split.patient))?;
    }

    // 2. State policy.
    let train = train.finish(cfg.policy)?;
    let test = test.finish(cfg.policy)?;
    if train.features.nrows() == 0 {
        log::warn!("policy {} left no seizure rows in the training set", cfg.policy);
    }

    // 3. Interictal blending.
    let (train, test) = if cfg.policy.blends_interictal() {
        let path: PathBuf = base_dir.join(interictal_file_name(cfg));
        let inter = load_interictal(&path)?;
        let inter_labels = Array1::from_elem(inter.nrows(), INTERICTAL_LABEL);
        let (i_train, i_test) =
            train_test_split(inter.view(), inter_labels.view(), cfg.inter_test_size, &mut rng)?;
        log::info!(
            "interictal: {} train / {} test rows",
            i_train.features.nrows(),
            i_test.features.nrows()
        );
        (blend(train, i_train, "train")?, blend(test, i_test, "test")?)
    } else {
        (train, test)
    };

    // 4. Shuffle the training rows only.
    let train = shuffle_rows(train.features.view(), train.labels.view(), &mut rng)?;

    log::info!(
        "compiled {} dataset: train {:?}, test {:?}",
        cfg.policy,
        train.features.dim(),
        test.features.dim()
    );
    Ok(Dataset {
        x_train: train.features,
        y_train: train.labels,
        x_test: test.features,
        y_test: test.labels,
    })
}

/// Append interictal rows under seizure rows.
fn blend(seizure: Labeled, interictal: Labeled, which: &str) -> Result<Labeled> {
    // A partition with no seizure patients has no column count yet.
    if seizure.features.dim() == (0, 0) {
        return Ok(interictal);
    }
    let features = vstack(
        seizure.features.view(),
        interictal.features.view(),
        &format!("{which}: seizure + interictal"),
    )?;
    let labels = concat(seizure.labels.view(), interictal.labels.view());
    Ok(Labeled { features, labels })
}
