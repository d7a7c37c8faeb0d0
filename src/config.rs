//! Dataset compilation configuration.
//!
//! [`CompileConfig`] holds every parameter of a [`compile_dataset`] call,
//! including the per-patient index-range table.  The built-in tables are the
//! ones the classifier was trained with; they are declared once here in
//! [`RangeTable::default`] and never inlined in control flow.
//!
//! [`compile_dataset`]: crate::compile::compile_dataset
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Patient identifiers, in the order their data is stacked.
pub const PATIENTS: [&str; 6] = ["DV", "GB", "SW", "PE", "RS", "JY"];

/// Pseudo-patient code used in interictal file names.
pub const INTERICTAL_CODE: &str = "6P";

// ── Window size ───────────────────────────────────────────────────────────

/// Analysis window length the feature files were computed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowSize {
    /// 10 s windows (`"10"`).
    Ten,
    /// 2 s windows (`"2"`).
    Two,
}

impl WindowSize {
    /// The selector as it appears in file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowSize::Ten => "10",
            WindowSize::Two => "2",
        }
    }
}

impl fmt::Display for WindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WindowSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "10" => Ok(WindowSize::Ten),
            "2" => Ok(WindowSize::Two),
            other => Err(Error::InvalidParameter(format!(
                "unknown window size {other:?} (expected \"10\" or \"2\")"
            ))),
        }
    }
}

// ── State policy ──────────────────────────────────────────────────────────

/// Which seizure states end up in the compiled dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatePolicy {
    /// Label-0 seizure rows (relabelled 1) against interictal rows.
    S1,
    /// Kept, non-zero-label seizure rows (relabelled 1) against interictal rows.
    S2,
    /// Seizure rows only, original labels, no interictal blending.
    S1S2,
}

impl StatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatePolicy::S1 => "s1",
            StatePolicy::S2 => "s2",
            StatePolicy::S1S2 => "s1s2",
        }
    }

    /// Whether interictal baseline rows are blended in.
    pub fn blends_interictal(&self) -> bool {
        !matches!(self, StatePolicy::S1S2)
    }
}

impl fmt::Display for StatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "s1" => Ok(StatePolicy::S1),
            "s2" => Ok(StatePolicy::S2),
            "s1s2" => Ok(StatePolicy::S1S2),
            other => Err(Error::InvalidParameter(format!(
                "unknown state policy {other:?} (expected s1, s2 or s1s2)"
            ))),
        }
    }
}

// ── Index ranges ──────────────────────────────────────────────────────────

/// Inclusive row range `start..=end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    pub start: usize,
    pub end: usize,
}

impl IndexRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of rows covered (0 when `end < start`, saturating at `usize::MAX`).
    pub fn len(&self) -> usize {
        match self.end.checked_sub(self.start) {
            Some(d) => d.saturating_add(1),
            None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for IndexRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Train and test ranges for one patient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientSplit {
    pub patient: String,
    pub train: IndexRange,
    pub test: IndexRange,
}

impl PatientSplit {
    pub fn new(patient: &str, train: (usize, usize), test: (usize, usize)) -> Self {
        Self {
            patient: patient.to_string(),
            train: IndexRange::new(train.0, train.1),
            test: IndexRange::new(test.0, test.1),
        }
    }
}

/// Window size → ordered per-patient ranges.
///
/// The order of each list is the order patients are stacked in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeTable {
    by_window: HashMap<WindowSize, Vec<PatientSplit>>,
}

impl RangeTable {
    /// An empty table; fill with [`RangeTable::insert`].
    pub fn empty() -> Self {
        Self { by_window: HashMap::new() }
    }

    /// Set (or replace) the patient list for `window`.
    pub fn insert(&mut self, window: WindowSize, splits: Vec<PatientSplit>) {
        self.by_window.insert(window, splits);
    }

    /// Patient splits for `window`, in stacking order.
    pub fn splits(&self, window: WindowSize) -> Result<&[PatientSplit]> {
        self.by_window
            .get(&window)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                Error::InvalidParameter(format!("no index ranges for {window} s windows"))
            })
    }
}

impl Default for RangeTable {
    /// The training tables for 10 s and 2 s windows.
    fn default() -> Self {
        let mut t = Self::empty();
        t.insert(WindowSize::Ten, vec![
            PatientSplit::new("DV", (0, 19), (20, 27)),
            PatientSplit::new("GB", (0, 3),  (4, 7)),
            PatientSplit::new("SW", (0, 1),  (2, 3)),
            PatientSplit::new("PE", (0, 1),  (2, 3)),
            PatientSplit::new("RS", (0, 3),  (4, 5)),
            PatientSplit::new("JY", (0, 7),  (8, 13)),
        ]);
        t.insert(WindowSize::Two, vec![
            PatientSplit::new("DV", (0, 99), (100, 139)),
            PatientSplit::new("GB", (0, 19), (20, 39)),
            PatientSplit::new("SW", (0, 9),  (10, 19)),
            PatientSplit::new("PE", (0, 19), (20, 29)),
            PatientSplit::new("RS", (0, 19), (20, 29)),
            PatientSplit::new("JY", (0, 39), (40, 69)),
        ]);
        t
    }
}

// ── Compile configuration ─────────────────────────────────────────────────

/// Parameters of one dataset compilation.
///
/// All fields are `pub`; construct with struct-update syntax:
///
/// ```
/// use eegset::{CompileConfig, StatePolicy, WindowSize};
///
/// let cfg = CompileConfig {
///     window_size: WindowSize::Two,
///     policy:      StatePolicy::S1S2,
///     seed:        Some(7),
///     ..CompileConfig::default()
/// };
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct CompileConfig {
    /// Feature-type tag embedded in file names (e.g. `"gmi"`).
    pub gmi_type: String,

    /// Window-size selector; picks the file names and the range table.
    ///
    /// Default: [`WindowSize::Ten`].
    pub window_size: WindowSize,

    /// Labelling threshold embedded in file names as `th=<threshold>`.
    ///
    /// Default: `1`.
    pub threshold: i32,

    /// State-filter policy.
    ///
    /// Default: [`StatePolicy::S1`].
    pub policy: StatePolicy,

    /// Fraction of interictal rows sent to the test set.  The test share is
    /// `ceil(inter_test_size × n)` rows.  Ignored for [`StatePolicy::S1S2`].
    ///
    /// Default: `0.25`.
    pub inter_test_size: f64,

    /// Longest run of consecutive same-seizure windows that is still kept.
    ///
    /// Default: `1`.
    pub max_windows: usize,

    /// RNG seed for the interictal split and the training shuffle.
    /// `None` draws from OS entropy, so two runs differ.
    ///
    /// Default: `None`.
    pub seed: Option<u64>,

    /// Per-patient index ranges.
    pub ranges: RangeTable,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            gmi_type: "gmi".to_string(),
            window_size: WindowSize::Ten,
            threshold: 1,
            policy: StatePolicy::S1,
            inter_test_size: 0.25,
            max_windows: 1,
            seed: None,
            ranges: RangeTable::default(),
        }
    }
}

impl CompileConfig {
    /// Reject parameter values the compiler cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.policy.blends_interictal()
            && !(self.inter_test_size > 0.0 && self.inter_test_size < 1.0)
        {
            return Err(Error::InvalidParameter(format!(
                "inter_test_size must lie in (0, 1), got {}",
                self.inter_test_size
            )));
        }
        if self.max_windows == 0 {
            return Err(Error::InvalidParameter("max_windows must be at least 1".into()));
        }
        self.ranges.splits(self.window_size)?;
        Ok(())
    }
}
