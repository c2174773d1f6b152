//! Integration tests for loading sweep files from disk.

use std::io::Write;
use noisesweep_core::{load, LoadError};

fn write_sweep(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn loads_upstream_export() {
    let file = write_sweep(
        "Epsilon,Strategy,Mean,StdDev,CI_Lower,CI_Upper\n\
         0.00,TitForTat,3.00,0.00,3.00,3.00\n\
         0.00,\"PAVLOV\",3.00,0.00,3.00,3.00\n\
         0.05,TitForTat,2.41,0.08,2.36,2.46\n\
         0.05,PAVLOV,2.78,0.05,2.75,2.81\n",
    );

    let data = load(file.path()).unwrap();
    assert_eq!(data.len(), 4);
    assert_eq!(data.strategies(), vec!["TitForTat", "PAVLOV"]);
    assert_eq!(data.epsilons(), vec![0.0, 0.05]);
    assert_eq!(data.lookup("PAVLOV", 0.05).unwrap().ci(), Some((2.75, 2.81)));
}

#[test]
fn loading_twice_gives_identical_fingerprint() {
    let file = write_sweep("Strategy,Epsilon,Mean\nPROBER,0.1,2.2\nPROBER,0.2,1.9\n");
    let a = load(file.path()).unwrap();
    let b = load(file.path()).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.fingerprint(), b.fingerprint());
}

#[test]
fn header_only_file_is_empty() {
    let file = write_sweep("Strategy,Epsilon,Mean\n");
    let data = load(file.path()).unwrap();
    assert!(data.is_empty());
}

#[test]
fn missing_strategy_column_is_malformed() {
    let file = write_sweep("Name,Epsilon,Mean\nPROBER,0.1,2.2\n");
    let err = load(file.path()).unwrap_err();
    assert!(matches!(err, LoadError::MissingColumn { column: "Strategy" }));
}

#[test]
fn ragged_row_is_malformed() {
    let file = write_sweep("Strategy,Epsilon,Mean\nPROBER,0.1\n");
    let err = load(file.path()).unwrap_err();
    assert!(err.is_malformed(), "unexpected error: {err}");
}

#[test]
fn missing_path_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = load(&dir.path().join("noise_analysis.csv")).unwrap_err();
    assert!(matches!(err, LoadError::NotFound { .. }));
}
