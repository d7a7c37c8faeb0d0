/// Shared fixtures: synthetic feature MAT-files written with the crate's own
/// writer into a temporary directory.
///
/// Every seizure window carries `fv = [patient_id, window_index, label]` so a
/// test can tell exactly which window a compiled row came from.  Interictal
/// windows carry `fv = [-1, window_index, 0]`.
use std::path::Path;

use eegset::mat::{MatArray, MatWriter};
use eegset::{interictal_file_name, seizure_file_name, CompileConfig, PATIENTS};

#[allow(unused)]
pub const INTERICTAL_ID: f64 = -1.0;

/// Windows each patient needs to cover the built-in 10 s range table.
#[allow(unused)]
pub fn min_windows_10s(patient: &str) -> usize {
    match patient {
        "DV" => 28,
        "GB" => 8,
        "SW" => 4,
        "PE" => 4,
        "RS" => 6,
        "JY" => 14,
        other => panic!("unknown patient {other}"),
    }
}

/// 1-based id of a patient, as stored in `fv[0]`.
#[allow(unused)]
pub fn patient_id(patient: &str) -> f64 {
    PATIENTS.iter().position(|p| *p == patient).expect("known patient") as f64 + 1.0
}

/// Write a seizure file with one struct element per `(label, seizure_id)`.
#[allow(unused)]
pub fn write_seizure(path: &Path, pid: f64, windows: &[(f64, f64)]) {
    let elements = windows
        .iter()
        .enumerate()
        .map(|(i, &(label, sz))| {
            vec![
                MatArray::row(&[pid, i as f64, label]),
                MatArray::scalar(label),
                MatArray::scalar(sz),
            ]
        })
        .collect();
    let mut w = MatWriter::new();
    w.add("data", MatArray::struct_row(&["fv", "label", "Seizure"], elements));
    w.write(path).unwrap();
}

/// Write an interictal file with `n` windows of 3 features.
#[allow(unused)]
pub fn write_interictal(path: &Path, n: usize) {
    let elements = (0..n)
        .map(|i| vec![MatArray::row(&[INTERICTAL_ID, i as f64, 0.0])])
        .collect();
    let mut w = MatWriter::new();
    w.add("data", MatArray::struct_row(&["fv"], elements));
    w.write(path).unwrap();
}

/// Populate `dir` with all six seizure files (sized for the 10 s table) and
/// an interictal file of `n_inter` windows.  `window(i)` gives the
/// `(label, seizure_id)` of window `i`.
#[allow(unused)]
pub fn populate(dir: &Path, cfg: &CompileConfig, n_inter: usize, window: impl Fn(usize) -> (f64, f64)) {
    for p in PATIENTS {
        let windows: Vec<(f64, f64)> = (0..min_windows_10s(p)).map(&window).collect();
        write_seizure(&dir.join(seizure_file_name(p, cfg)), patient_id(p), &windows);
    }
    write_interictal(&dir.join(interictal_file_name(cfg)), n_inter);
}
