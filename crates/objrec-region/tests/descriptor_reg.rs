//! Descriptor store regression test
//!
//! Text format, truncation on malformed records, and file round trip.

use objrec_region::{DescriptorStore, ObjectDescriptor};
use objrec_test::RegParams;

#[test]
fn descriptor_reg() {
    let mut rp = RegParams::new("descriptor");

    let store = DescriptorStore::from(vec![
        ObjectDescriptor {
            label: 243,
            center_row: 0.5,
            center_column: 0.5,
            min_inertia: 0.25,
            area: 4,
            roundness: 1.0,
            orientation_deg: 0.0,
        },
        ObjectDescriptor {
            label: 255,
            center_row: 1.75,
            center_column: 3.75,
            min_inertia: 0.1,
            area: 4,
            roundness: 0.3,
            orientation_deg: -26.5,
        },
    ]);

    // --- Test 1: serialized text ---
    let bytes = store.write_to_bytes().expect("serialize");
    rp.compare_strings(
        b"243 0.5 0.5 0.25 4 1 0\n255 1.75 3.75 0.1 4 0.3 -26.5\n",
        &bytes,
    );
    rp.write_data_and_check(&bytes, "txt").expect("write descriptors");

    // --- Test 2: file round trip ---
    let dir = std::env::temp_dir().join(format!("objrec_descriptor_reg_{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("objects.txt");
    store.write_to_file(&path).expect("write file");
    let back = DescriptorStore::read_from_file(&path).expect("read file");
    rp.compare_values(1.0, if back == store { 1.0 } else { 0.0 }, 0.0);
    let _ = std::fs::remove_dir_all(&dir);

    // --- Test 3: reading stops at the first malformed record ---
    let text = "\n243 0.5 0.5 0.25 4 1 0\n\n255 1.75 3.75 0.1 4 0.3\n7 0 0 0 1 0 0\n";
    let partial = DescriptorStore::read_from_bytes(text.as_bytes()).expect("read partial");
    rp.compare_values(1.0, partial.len() as f64, 0.0);
    rp.compare_values(243.0, partial.get(0).map_or(0.0, |d| d.label as f64), 0.0);

    // --- Test 4: empty input ---
    let empty = DescriptorStore::read_from_bytes(b"").expect("read empty");
    rp.compare_values(0.0, empty.len() as f64, 0.0);

    // --- Test 5: missing file is an error ---
    rp.compare_values(
        1.0,
        if DescriptorStore::read_from_file(dir.join("missing.txt")).is_err() { 1.0 } else { 0.0 },
        0.0,
    );

    assert!(rp.cleanup(), "descriptor regression test failed");
}
