mod common;
use common::{patient_id, populate, write_interictal, write_seizure, INTERICTAL_ID};
use eegset::{
    compile_dataset, interictal_file_name, seizure_file_name, CompileConfig, Error, StatePolicy,
    WindowSize, PATIENTS,
};
use ndarray::Array2;

/// `(fv[0], fv[1])` of each row: which file and window it came from.
fn origins(x: &Array2<f64>) -> Vec<(i64, i64)> {
    x.rows().into_iter().map(|r| (r[0] as i64, r[1] as i64)).collect()
}

fn cfg(policy: StatePolicy, seed: u64) -> CompileConfig {
    CompileConfig { policy, seed: Some(seed), ..CompileConfig::default() }
}

/// Rows the 10 s table selects, in stacking order, for the given half.
fn table_rows(test: bool) -> Vec<(i64, i64)> {
    let c = CompileConfig::default();
    let mut out = Vec::new();
    for s in c.ranges.splits(c.window_size).unwrap() {
        let r = if test { s.test } else { s.train };
        for i in r.start..=r.end {
            out.push((patient_id(&s.patient) as i64, i as i64));
        }
    }
    out
}

#[test]
fn s1s2_keeps_every_ranged_window_and_skips_interictal() {
    let dir = tempfile::tempdir().unwrap();
    let c = cfg(StatePolicy::S1S2, 0);
    populate(dir.path(), &c, 40, |i| ((i % 2) as f64, i as f64));

    let ds = compile_dataset(dir.path(), &c).unwrap();
    assert_eq!(ds.x_train.dim(), (40, 3));
    assert_eq!(ds.x_test.dim(), (24, 3));
    assert_eq!(ds.y_train.len(), 40);
    assert_eq!(ds.y_test.len(), 24);

    // Test rows keep their stacking order; no interictal rows anywhere.
    assert_eq!(origins(&ds.x_test), table_rows(true));
    assert!(ds.x_train.column(0).iter().all(|&v| v != INTERICTAL_ID));

    // Labels pass through untouched and stay attached to their rows.
    for (row, &y) in ds.x_train.rows().into_iter().zip(ds.y_train.iter()) {
        assert_eq!(row[2], y);
    }
}

#[test]
fn s1s2_does_not_need_an_interictal_file() {
    let dir = tempfile::tempdir().unwrap();
    let c = cfg(StatePolicy::S1S2, 0);
    populate(dir.path(), &c, 10, |_| (1.0, 0.0));
    std::fs::remove_file(dir.path().join(eegset::interictal_file_name(&c))).unwrap();
    assert!(compile_dataset(dir.path(), &c).is_ok());
}

#[test]
fn training_rows_are_a_permutation_of_the_table() {
    let dir = tempfile::tempdir().unwrap();
    let c = cfg(StatePolicy::S1S2, 11);
    populate(dir.path(), &c, 40, |i| ((i % 2) as f64, i as f64));

    let ds = compile_dataset(dir.path(), &c).unwrap();
    let mut got = origins(&ds.x_train);
    got.sort();
    let mut want = table_rows(false);
    want.sort();
    assert_eq!(got, want);
}

#[test]
fn s1_relabels_state_zero_and_blends_interictal() {
    let dir = tempfile::tempdir().unwrap();
    let c = cfg(StatePolicy::S1, 3);
    // Even windows are in state 0.
    populate(dir.path(), &c, 40, |i| ((i % 2) as f64, i as f64));

    let ds = compile_dataset(dir.path(), &c).unwrap();
    // 20 seizure + 30 interictal train; 12 seizure + ceil(0.25·40) = 10 interictal test.
    assert_eq!(ds.x_train.nrows(), 50);
    assert_eq!(ds.x_test.nrows(), 22);

    for (row, &y) in ds.x_train.rows().into_iter().zip(ds.y_train.iter()) {
        if row[0] == INTERICTAL_ID {
            assert_eq!(y, 0.0);
        } else {
            assert_eq!(row[2], 0.0, "s1 must only keep state-0 windows");
            assert_eq!(y, 1.0);
        }
    }
    assert_eq!(ds.y_train.iter().filter(|&&y| y == 1.0).count(), 20);

    // Test: seizure rows first, interictal rows after.
    let y: Vec<f64> = ds.y_test.to_vec();
    assert_eq!(&y[..12], &[1.0; 12]);
    assert_eq!(&y[12..], &[0.0; 10]);
    assert!(ds.x_test.column(0).iter().skip(12).all(|&v| v == INTERICTAL_ID));
}

#[test]
fn s2_keeps_first_window_of_each_run() {
    let dir = tempfile::tempdir().unwrap();
    let c = CompileConfig { max_windows: 1, ..cfg(StatePolicy::S2, 5) };
    // Every window is ictal; seizures run three windows each.
    populate(dir.path(), &c, 40, |i| (1.0, (i / 3) as f64));

    let ds = compile_dataset(dir.path(), &c).unwrap();
    // Train: DV 7, GB 2, SW 1, PE 1, RS 2, JY 3.  Test: DV 3, GB 1, SW 1, PE 1, RS 0, JY 2.
    assert_eq!(ds.x_train.nrows(), 16 + 30);
    assert_eq!(ds.x_test.nrows(), 8 + 10);
    for (row, &y) in ds.x_train.rows().into_iter().zip(ds.y_train.iter()) {
        if row[0] != INTERICTAL_ID {
            assert_eq!(row[1] as usize % 3, 0);
            assert_eq!(y, 1.0);
        }
    }
}

#[test]
fn s2_drops_state_zero_windows() {
    let dir = tempfile::tempdir().unwrap();
    let c = CompileConfig { max_windows: 100, ..cfg(StatePolicy::S2, 5) };
    populate(dir.path(), &c, 40, |_| (0.0, 1.0));

    let ds = compile_dataset(dir.path(), &c).unwrap();
    assert!(ds.y_train.iter().all(|&y| y == 0.0));
    assert_eq!(ds.x_train.nrows(), 30);
    assert_eq!(ds.x_test.nrows(), 10);
}

#[test]
fn same_seed_same_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let c = cfg(StatePolicy::S1, 42);
    populate(dir.path(), &c, 40, |i| ((i % 2) as f64, i as f64));

    let a = compile_dataset(dir.path(), &c).unwrap();
    let b = compile_dataset(dir.path(), &c).unwrap();
    assert_eq!(a, b);
}

#[test]
fn short_file_is_an_index_range_error() {
    let dir = tempfile::tempdir().unwrap();
    let c = cfg(StatePolicy::S1S2, 0);
    populate(dir.path(), &c, 40, |_| (1.0, 0.0));
    // DV's test range ends at window 27.
    let short: Vec<(f64, f64)> = vec![(1.0, 0.0); 25];
    write_seizure(&dir.path().join(seizure_file_name("DV", &c)), 1.0, &short);

    match compile_dataset(dir.path(), &c).unwrap_err() {
        Error::IndexRange { available, range, .. } => {
            assert_eq!(available, 25);
            assert_eq!((range.start, range.end), (20, 27));
        }
        other => panic!("expected IndexRange, got {other}"),
    }
}

#[test]
fn feature_length_disagreement_is_a_shape_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let c = cfg(StatePolicy::S1S2, 0);
    populate(dir.path(), &c, 40, |_| (1.0, 0.0));

    let elements = (0..8)
        .map(|i| {
            vec![
                eegset::MatArray::row(&[2.0, i as f64, 1.0, 9.0]),
                eegset::MatArray::scalar(1.0),
                eegset::MatArray::scalar(0.0),
            ]
        })
        .collect();
    let mut w = eegset::MatWriter::new();
    w.add("data", eegset::MatArray::struct_row(&["fv", "label", "Seizure"], elements));
    w.write(dir.path().join(seizure_file_name("GB", &c))).unwrap();

    let err = compile_dataset(dir.path(), &c).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }), "got {err}");
}

#[test]
fn missing_interictal_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let c = cfg(StatePolicy::S1, 0);
    populate(dir.path(), &c, 40, |_| (0.0, 0.0));
    std::fs::remove_file(dir.path().join(eegset::interictal_file_name(&c))).unwrap();
    assert!(matches!(compile_dataset(dir.path(), &c).unwrap_err(), Error::Io { .. }));
}

#[test]
fn invalid_test_size_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let c = CompileConfig { inter_test_size: 1.5, ..cfg(StatePolicy::S1, 0) };
    assert!(matches!(
        compile_dataset(dir.path(), &c).unwrap_err(),
        Error::InvalidParameter(_)
    ));
}

#[test]
fn two_second_table_selects_its_own_ranges() {
    let dir = tempfile::tempdir().unwrap();
    let c = CompileConfig { window_size: WindowSize::Two, ..cfg(StatePolicy::S1S2, 0) };
    for p in PATIENTS {
        let windows: Vec<(f64, f64)> = (0..140).map(|i| ((i % 2) as f64, i as f64)).collect();
        write_seizure(&dir.path().join(seizure_file_name(p, &c)), patient_id(p), &windows);
    }
    write_interictal(&dir.path().join(interictal_file_name(&c)), 20);

    let ds = compile_dataset(dir.path(), &c).unwrap();
    assert_eq!(ds.x_train.dim(), (210, 3));
    assert_eq!(ds.x_test.dim(), (120, 3));

    // DV's test rows are windows 100..=139, stacked first.
    let first: Vec<(i64, i64)> = origins(&ds.x_test).into_iter().take(40).collect();
    let want: Vec<(i64, i64)> = (100..=139).map(|i| (1, i)).collect();
    assert_eq!(first, want);
    // JY's test rows (40..=69) close the test set.
    assert_eq!(origins(&ds.x_test).last(), Some(&(6, 69)));
}
