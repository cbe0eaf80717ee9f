use std::path::Path;
use std::process::{Command, Output};

mod common;
use common::{attribute, split_frames, trajectories};

fn xyz_extract(input: &str, output: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_xyz-extract"))
        .arg(input)
        .arg(output)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("couldn't run xyz-extract")
}

fn comments(output: &Path) -> Vec<String> {
    let text = std::fs::read_to_string(output).unwrap();
    split_frames(&text).into_iter().map(|frame| frame.1).collect()
}

#[test]
fn default_labels_frames() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.xyz");
    let result = xyz_extract(trajectories::WATER, &output, &["--skip", "1", "--stride", "2"]);
    assert!(result.status.success());
    assert_eq!(
        comments(&output),
        ["Frame: 1", "Frame: 3", "Frame: 5", "Frame: 7", "Frame: 9"]
    );
}

#[test]
fn historical_names() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.xyz");
    let result = xyz_extract(trajectories::WATER, &output, &["--comment", "frame", "--stop", "2"]);
    assert!(result.status.success());
    assert_eq!(comments(&output), ["Frame: 0", "Frame: 1"]);
}

#[test]
fn copy_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.xyz");
    let result = xyz_extract(trajectories::WATER, &output, &["--mode", "copy"]);
    assert!(result.status.success());
    let input = std::fs::read_to_string(trajectories::WATER).unwrap();
    let output = std::fs::read_to_string(&output).unwrap();
    assert_eq!(split_frames(&output), split_frames(&input));

    // Comment and atom lines are identical byte for byte. Only the padding around the atom
    // counts, which open each five-line frame of a three-atom trajectory, may differ.
    let input_lines: Vec<&str> = input.split_inclusive('\n').collect();
    let output_lines: Vec<&str> = output.split_inclusive('\n').collect();
    assert_eq!(input_lines.len(), output_lines.len());
    for (i, (original, written)) in input_lines.iter().zip(&output_lines).enumerate() {
        if i % 5 == 0 {
            assert_eq!(written.trim_end_matches('\n'), original.trim(), "count on line {}", i + 1);
        } else {
            assert_eq!(written, original, "line {} should be copied verbatim", i + 1);
        }
    }
}

#[test]
fn copy_non_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("latin1.xyz");
    let output = dir.path().join("out.xyz");
    let text: &[u8] = b"1\n\xc5ngstr\xf6m, \xb5s\nH 0.0 0.0 0.0\n1\nplain\nH 1.0 0.0 0.0\n";
    std::fs::write(&input, text).unwrap();
    let result = xyz_extract(input.to_str().unwrap(), &output, &["--mode", "copy"]);
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));
    assert_eq!(std::fs::read(&output).unwrap(), text);
}

#[test]
fn output_is_truncated() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.xyz");
    std::fs::write(&output, "this should be gone\n".repeat(1000)).unwrap();
    let result = xyz_extract(trajectories::WATER, &output, &["--stride", "5"]);
    assert!(result.status.success());
    assert_eq!(comments(&output), ["Frame: 0", "Frame: 5"]);
}

#[test]
fn extended_with_cell_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.xyz");
    let args = ["--mode", "extended", "--cell_file", trajectories::WATER_CELL, "--skip", "9"];
    let result = xyz_extract(trajectories::WATER, &output, &args);
    assert!(result.status.success());
    let comments = comments(&output);
    assert_eq!(comments.len(), 1);
    assert_eq!(attribute(&comments[0], "Time"), Some("4.500"));
    assert_eq!(attribute(&comments[0], "Step"), Some("9"));
}

#[test]
fn extended_with_lattice() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.xyz");
    let args = ["--mode", "extended", "--lattice", "10 11 12", "--stride", "3"];
    let result = xyz_extract(trajectories::WATER, &output, &args);
    assert!(result.status.success());
    for comment in comments(&output) {
        assert_eq!(attribute(&comment, "Lattice"), Some("10 0 0 0 11 0 0 0 12"));
    }
}

#[test]
fn missing_cell_record_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.xyz");
    let args = ["--mode", "extended", "--cell_file", trajectories::WATER_EVEN_CELL];
    let result = xyz_extract(trajectories::WATER, &output, &args);
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("no cell record for step 1"), "{stderr}");
    // What was written before the failure stays.
    assert_eq!(comments(&output).len(), 1);
}

#[test]
fn malformed_lattice_fails_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.xyz");
    let args = ["--mode", "extended", "--lattice", "10 11"];
    let result = xyz_extract(trajectories::WATER, &output, &args);
    assert!(!result.status.success());
    assert!(!output.exists());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("invalid lattice"), "{stderr}");
}

#[test]
fn non_finite_lattice_fails_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.xyz");
    let args = ["--mode", "extended", "--lattice", "nan inf 1"];
    let result = xyz_extract(trajectories::WATER, &output, &args);
    assert!(!result.status.success());
    assert!(!output.exists());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("not a finite number"), "{stderr}");
}

#[test]
fn malformed_trajectory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.xyz");
    let result = xyz_extract(trajectories::BAD_COUNT, &output, &[]);
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("line 11"), "{stderr}");
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.xyz");
    let result = xyz_extract("tests/trajectories/does_not_exist.xyz", &output, &[]);
    assert!(!result.status.success());
    assert!(!output.exists());
}

#[test]
fn zero_stride_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.xyz");
    let result = xyz_extract(trajectories::WATER, &output, &["--stride", "0"]);
    assert!(!result.status.success());
    assert!(!output.exists());
}
