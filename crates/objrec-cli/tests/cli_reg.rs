//! Command-line stage regression test
//!
//! Runs label, describe and recognize through their entry points on
//! temporary files.

use objrec_cli::{run_describe, run_label, run_recognize};
use objrec_io::{ImageFormat, read_image, write_image};
use objrec_region::{AxisRenderOptions, DescriptorStore, LabelOptions, MatchOptions};
use objrec_test::{RegParams, image_from_ascii};

#[test]
fn cli_reg() {
    let mut rp = RegParams::new("cli");
    let dir = tempfile::tempdir().expect("temp dir");
    let path = |name: &str| dir.path().join(name);

    let binary = image_from_ascii(&[
        "............",
        ".####....#..",
        ".####...###.",
        ".........#..",
        "..#.........",
        "..#...####..",
        "..#.........",
    ])
    .expect("fixture");
    write_image(&binary, path("binary.pbm"), ImageFormat::Pnm).expect("write input");

    // --- Stage 1 ---
    let labeling = run_label(
        &path("binary.pbm"),
        &path("labels.pgm"),
        &LabelOptions::default(),
    )
    .expect("label stage");
    rp.compare_values(4.0, labeling.component_count() as f64, 0.0);
    let labeled = read_image(path("labels.pgm")).expect("read labels");
    rp.compare_values(255.0, labeled.max_gray() as f64, 0.0);
    rp.compare_values(
        binary.count_foreground() as f64,
        labeled.count_foreground() as f64,
        0.0,
    );

    // --- Stage 2 ---
    let analysis = run_describe(
        &path("labels.pgm"),
        &path("objects.txt"),
        &path("axes.png"),
        &AxisRenderOptions::default(),
    )
    .expect("describe stage");
    rp.compare_values(4.0, analysis.store.len() as f64, 0.0);
    let stored = DescriptorStore::read_from_file(path("objects.txt")).expect("read descriptors");
    rp.compare_values(1.0, if stored == analysis.store { 1.0 } else { 0.0 }, 0.0);
    let axes = read_image(path("axes.png")).expect("read axes image");
    rp.compare_image(&analysis.annotated, &axes);

    // --- Stage 3 ---
    let recognition = run_recognize(
        &path("labels.pgm"),
        &path("objects.txt"),
        &path("found.pgm"),
        &MatchOptions::default(),
    )
    .expect("recognize stage");
    rp.compare_values(
        1.0,
        if recognition.matches.len() >= 4 { 1.0 } else { 0.0 },
        0.0,
    );
    let found = read_image(path("found.pgm")).expect("read recognition image");
    rp.compare_image(&recognition.image, &found);

    // --- Failures leave no output behind ---
    rp.compare_values(
        1.0,
        if run_label(&path("missing.pbm"), &path("never.pgm"), &LabelOptions::default()).is_err() {
            1.0
        } else {
            0.0
        },
        0.0,
    );
    rp.compare_values(0.0, if path("never.pgm").exists() { 1.0 } else { 0.0 }, 0.0);

    let describe_err = run_describe(
        &path("labels.pgm"),
        &path("no_such_dir").join("objects.txt"),
        &path("axes2.pgm"),
        &AxisRenderOptions::default(),
    );
    rp.compare_values(1.0, if describe_err.is_err() { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(0.0, if path("axes2.pgm").exists() { 1.0 } else { 0.0 }, 0.0);

    // An unwritable image path must not leave the descriptor file behind
    let describe_err = run_describe(
        &path("labels.pgm"),
        &path("objects2.txt"),
        &path("no_such_dir").join("axes3.pgm"),
        &AxisRenderOptions::default(),
    );
    rp.compare_values(1.0, if describe_err.is_err() { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(0.0, if path("objects2.txt").exists() { 1.0 } else { 0.0 }, 0.0);

    assert!(rp.cleanup(), "cli regression test failed");
}
