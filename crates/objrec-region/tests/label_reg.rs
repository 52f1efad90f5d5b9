//! Labeling regression test
//!
//! Two-pass 4-connected labeling, checked against a flood-fill reference
//! on synthetic fixtures.

use objrec_core::GrayImage;
use objrec_io::ImageFormat;
use objrec_region::{LabelOptions, Labeling, analyze_objects, label_components};
use objrec_test::{RegParams, image_from_ascii};
use std::collections::VecDeque;

/// 4-connected component ids by breadth-first flood fill (0 = background).
fn flood_fill_reference(image: &GrayImage) -> Vec<u32> {
    let rows = image.rows() as i64;
    let cols = image.cols() as i64;
    let mut ids = vec![0u32; (rows * cols) as usize];
    let mut next = 0;

    for start in 0..ids.len() {
        if image.data()[start] == 0 || ids[start] != 0 {
            continue;
        }
        next += 1;
        ids[start] = next;
        let mut queue = VecDeque::from([start]);
        while let Some(p) = queue.pop_front() {
            let (r, c) = (p as i64 / cols, p as i64 % cols);
            for (nr, nc) in [(r - 1, c), (r + 1, c), (r, c - 1), (r, c + 1)] {
                if nr < 0 || nr >= rows || nc < 0 || nc >= cols {
                    continue;
                }
                let q = (nr * cols + nc) as usize;
                if image.data()[q] != 0 && ids[q] == 0 {
                    ids[q] = next;
                    queue.push_back(q);
                }
            }
        }
    }
    ids
}

/// Same label iff same reference component, for every foreground pair.
fn partition_matches(labeling: &Labeling, reference: &[u32]) -> bool {
    let labels = labeling.labels();
    let fg: Vec<usize> = (0..labels.len()).filter(|&i| reference[i] != 0).collect();
    if labels.iter().zip(reference).any(|(&l, &r)| (l == 0) != (r == 0)) {
        return false;
    }
    fg.iter().all(|&i| {
        fg.iter()
            .all(|&j| (labels[i] == labels[j]) == (reference[i] == reference[j]))
    })
}

#[test]
fn label_reg() {
    let mut rp = RegParams::new("label");
    let options = LabelOptions::default();

    // --- Test 1: partition invariant on several shapes ---
    eprintln!("=== Partition invariant ===");
    let fixtures: [&[&str]; 4] = [
        &["#.#.#", "#.#.#", "#####"],
        &["##..##", ".#..#.", ".####.", "......", "#....#"],
        &[
            "#######", "#.....#", "#.###.#", "#.#.#.#", "#.#...#", "#.#####",
        ],
        &["#.#.", ".#.#", "#.#.", ".#.#"],
    ];
    for rows in fixtures {
        let image = image_from_ascii(rows).expect("fixture");
        let reference = flood_fill_reference(&image);
        let labeling = label_components(&image, &options).expect("label");
        let ncomp = reference.iter().copied().max().unwrap_or(0);
        eprintln!(
            "  {}x{}: {} provisional, {} components",
            image.rows(),
            image.cols(),
            labeling.provisional_count(),
            labeling.component_count()
        );
        rp.compare_values(ncomp as f64, labeling.component_count() as f64, 0.0);
        rp.compare_values(
            1.0,
            if partition_matches(&labeling, &reference) { 1.0 } else { 0.0 },
            0.0,
        );
        rp.compare_values(
            1.0,
            if labeling.provisional_count() >= labeling.component_count() { 1.0 } else { 0.0 },
            0.0,
        );
    }

    // --- Test 2: comb merges into one component ---
    eprintln!("=== Comb ===");
    let comb = image_from_ascii(&["#.#.#", "#.#.#", "#####"]).expect("comb");
    let labeling = label_components(&comb, &options).expect("label comb");
    rp.compare_values(3.0, labeling.provisional_count() as f64, 0.0);
    rp.compare_values(1.0, labeling.component_count() as f64, 0.0);

    // --- Test 3: normalized output stays within [0, 255] ---
    eprintln!("=== Normalization ===");
    let checker = image_from_ascii(&[
        "#.#.#.#.#.", ".#.#.#.#.#", "#.#.#.#.#.", ".#.#.#.#.#",
    ])
    .expect("checker");
    let labeling = label_components(&checker, &options).expect("label checker");
    rp.compare_values(20.0, labeling.component_count() as f64, 0.0);
    let normalized = labeling.to_image().expect("normalize");
    rp.compare_values(255.0, normalized.max_gray() as f64, 0.0);
    rp.compare_values(255.0, normalized.max_value() as f64, 0.0);
    rp.compare_values(
        1.0,
        if normalized.data().iter().all(|&v| v <= 255) { 1.0 } else { 0.0 },
        0.0,
    );
    rp.compare_values(20.0, normalized.count_foreground() as f64, 0.0);
    rp.write_image_and_check(&normalized, ImageFormat::Pnm)
        .expect("write normalized checker");

    // --- Test 4: 3x3 square in a 5x5 image ---
    eprintln!("=== Centered square ===");
    let square = image_from_ascii(&[".....", ".###.", ".###.", ".###.", "....."]).expect("square");
    let labeling = label_components(&square, &options).expect("label square");
    rp.compare_values(1.0, labeling.component_count() as f64, 0.0);
    rp.compare_values(21.0, labeling.label_at(2, 2).unwrap_or(0) as f64, 0.0);
    let labeled = labeling.to_image().expect("normalize square");
    rp.compare_values(255.0, labeled.get_pixel(1, 1).unwrap_or(0) as f64, 0.0);
    let objects = analyze_objects(&labeled);
    rp.compare_values(1.0, objects.len() as f64, 0.0);
    if let Some(d) = objects.first() {
        rp.compare_values(9.0, d.area as f64, 0.0);
        rp.compare_values(2.0, d.center_row, 1e-12);
        rp.compare_values(2.0, d.center_column, 1e-12);
        rp.compare_values(1.0, d.roundness, 1e-9);
        rp.compare_values(0.0, d.orientation_deg, 0.0);
    }

    // --- Test 5: two disjoint blobs ---
    eprintln!("=== Two blobs ===");
    let blobs = image_from_ascii(&["##...", "##..#", "....#", "...##"]).expect("blobs");
    let labeled = label_components(&blobs, &options)
        .and_then(|l| l.to_image())
        .expect("label blobs");
    let objects = analyze_objects(&labeled);
    rp.compare_values(2.0, objects.len() as f64, 0.0);
    if let [a, b] = objects.as_slice() {
        rp.compare_values(1.0, if a.label != b.label { 1.0 } else { 0.0 }, 0.0);
        rp.compare_values(4.0, a.area as f64, 0.0);
        rp.compare_values(4.0, b.area as f64, 0.0);
        rp.compare_values(8.0, (a.area + b.area) as f64, 0.0);
    }
    rp.write_image_and_check(&labeled, ImageFormat::Pnm)
        .expect("write labeled blobs");

    assert!(rp.cleanup(), "label regression test failed");
}
