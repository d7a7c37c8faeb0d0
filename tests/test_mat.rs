use eegset::mat::{read_mat, MatArray, MatData, MatWriter, NumericClass};
use ndarray::array;

fn round_trip(writer: &MatWriter) -> eegset::MatFile {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rt.mat");
    writer.write(&path).unwrap();
    read_mat(&path).unwrap()
}

#[test]
fn matrices_keep_row_major_layout() {
    let m = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
    let mut w = MatWriter::new();
    w.add("m", MatArray::from_array2(&m));
    let mat = round_trip(&w);

    let back = mat.variable("m").unwrap();
    assert_eq!(back.dims, vec![2, 3]);
    // Stored column-major.
    assert_eq!(back.real().unwrap(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    assert_eq!(back.to_array2().unwrap(), m);
}

#[test]
fn variables_come_back_in_write_order() {
    let mut w = MatWriter::new().compressed(true);
    w.add("zeta", MatArray::scalar(1.0));
    w.add("alpha", MatArray::char("hello"));
    w.add("mid", MatArray::empty());
    let mat = round_trip(&w);

    let names: Vec<&str> = mat.variables.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["zeta", "alpha", "mid"]);
    assert_eq!(mat.variable("alpha").unwrap().text(), Some("hello"));
    assert!(mat.variable("mid").unwrap().is_empty());
}

#[test]
fn complex_and_narrow_classes() {
    let z = MatArray {
        dims: vec![1, 2],
        data: MatData::Numeric {
            class: NumericClass::Int16,
            logical: false,
            real: vec![-3.0, 7.0],
            imag: Some(vec![1.0, -1.0]),
        },
    };
    let mut w = MatWriter::new();
    w.add("z", z.clone());
    let mat = round_trip(&w);
    assert_eq!(mat.variable("z").unwrap(), &z);
    assert_eq!(mat.variable("z").unwrap().class_name(), "int16");
}

#[test]
fn nested_cells_and_structs() {
    let inner = MatArray::struct_scalar(vec![
        ("a_rather_long_field_name_over_32_chars", MatArray::scalar(2.0)),
        ("s", MatArray::char("x")),
    ]);
    let cell = MatArray::cell_row(vec![inner.clone(), MatArray::row(&[1.0, 2.0]), MatArray::cell_row(vec![])]);
    let mut w = MatWriter::new().compressed(true);
    w.add("c", cell.clone());
    let mat = round_trip(&w);

    let back = mat.variable("c").unwrap();
    assert_eq!(back, &cell);
    let first = &back.cells().unwrap()[0];
    assert_eq!(
        first.field(0, "a_rather_long_field_name_over_32_chars").and_then(MatArray::scalar_value),
        Some(2.0)
    );
}

#[test]
fn missing_variable_is_format_error() {
    let mut w = MatWriter::new();
    w.add("x", MatArray::scalar(0.0));
    let mat = round_trip(&w);
    assert!(mat.get("y").is_none());
    assert!(matches!(mat.variable("y").unwrap_err(), eegset::Error::FileFormat { .. }));
}

#[test]
fn truncated_file_is_format_error() {
    let mut w = MatWriter::new();
    w.add("x", MatArray::row(&[1.0, 2.0, 3.0, 4.0]));
    let bytes = w.to_bytes().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cut.mat");
    std::fs::write(&path, &bytes[..bytes.len() - 12]).unwrap();
    let err = read_mat(&path).unwrap_err();
    assert!(matches!(err, eegset::Error::FileFormat { .. }));
    assert!(err.to_string().contains("cut.mat"));
}
