//! File-level tests for clip loading and saving.
//!
//! To run: cargo test -p motion-io

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use std::fs;

use approx::assert_relative_eq;
use motion_io::{load_clip, load_csv, load_source_json, save_clip, save_csv, IoError};
use motion_types::{MotionClip, MotionError, MotionFrame, DEFAULT_FPS};
use tempfile::tempdir;

fn sample_clip() -> MotionClip {
    let frames = (0..10)
        .map(|i| {
            let t = f64::from(i) * 0.1;
            MotionFrame::from_parts(
                [t, -0.25, 0.8 - 0.01 * t],
                [0.0, 0.0, 0.0, 1.0],
                &[t.sin(), -t, 1.47],
            )
        })
        .collect();
    MotionClip::new(frames, DEFAULT_FPS).unwrap()
}

#[test]
fn csv_save_then_load_within_precision() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("clip.csv");
    let clip = sample_clip();

    save_csv(&clip, &path).unwrap();
    let loaded = load_csv(&path, DEFAULT_FPS).unwrap();

    assert_eq!(loaded.len(), clip.len());
    for (a, b) in loaded.iter().zip(&clip) {
        for (x, y) in a.values().iter().zip(b.values()) {
            assert_relative_eq!(*x, *y, epsilon = 5e-7);
        }
    }
}

#[test]
fn csv_lines_have_six_decimals() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("clip.csv");
    save_clip(&sample_clip(), &path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 10);
    for line in text.lines() {
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields.len(), 10);
        for field in fields {
            let (_, decimals) = field.split_once('.').unwrap();
            assert_eq!(decimals.len(), 6, "{field}");
        }
    }
}

#[test]
fn save_rejects_non_finite_with_location() {
    let dir = tempdir().unwrap();
    let mut frames = sample_clip().into_frames();
    frames[4].values_mut()[9] = f64::INFINITY;
    let clip = MotionClip::new(frames, DEFAULT_FPS).unwrap();

    let err = save_csv(&clip, dir.path().join("bad.csv")).unwrap_err();
    match err {
        IoError::Motion(MotionError::NonFiniteValue { frame, field, .. }) => {
            assert_eq!(frame.0, Some(4));
            assert_eq!(field, 9);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_file_reported() {
    let dir = tempdir().unwrap();
    let err = load_csv(dir.path().join("nope.csv"), DEFAULT_FPS).unwrap_err();
    assert!(matches!(err, IoError::FileNotFound { .. }));
}

#[test]
fn source_json_detected_and_loaded() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dump.json");
    fs::write(
        &path,
        r#"{"clip_a": {
            "dof": [[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]],
            "root_rot": [[0, 0, 0, 1], [0, 0, 0, 1]],
            "root_trans_offset": [[0, 0, 0.79], [0.01, 0, 0.79]]
        }}"#,
    )
    .unwrap();

    let clip = load_clip(&path, DEFAULT_FPS).unwrap();
    assert_eq!(clip.len(), 2);
    assert_eq!(clip.width(), Some(10));
    assert_eq!(clip.fps(), DEFAULT_FPS);
    assert_eq!(clip.frames()[1].root_position(), [0.01, 0.0, 0.79]);
}

#[test]
fn source_json_by_name() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dump.json");
    fs::write(
        &path,
        r#"{
            "first": {"dof": [[0.0]], "root_rot": [[0, 0, 0, 1]], "root_trans": [[0, 0, 1]]},
            "second": {"dof": [[0.7], [0.8]], "root_rot": [[0, 0, 0, 1], [0, 0, 0, 1]], "root_trans": [[0, 0, 1], [0, 0, 1]]}
        }"#,
    )
    .unwrap();

    let clip = load_source_json(&path, Some("second"), DEFAULT_FPS).unwrap();
    assert_eq!(clip.len(), 2);
    assert_eq!(clip.frames()[1].joints(), &[0.8]);

    let err = load_source_json(&path, Some("third"), DEFAULT_FPS).unwrap_err();
    assert!(err.to_string().contains("third"));
}

#[test]
fn ragged_source_rows_name_the_frame() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dump.json");
    fs::write(
        &path,
        r#"{"m": {"dof": [[0.0, 0.0], [0.0]], "root_rot": [[0, 0, 0, 1], [0, 0, 0, 1]], "root_trans": [[0, 0, 1], [0, 0, 1]]}}"#,
    )
    .unwrap();

    let err = load_source_json(&path, None, DEFAULT_FPS).unwrap_err();
    assert!(err.to_string().contains("at frame 1"), "{err}");
}
