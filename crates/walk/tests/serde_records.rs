//! JSON shape of scanned records.

#![cfg(all(unix, feature = "serde"))]

use label::FixedLabel;
use std::fs;
use std::os::unix::fs::symlink;

#[test]
fn scanned_records_serialize_with_uploader_names() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(temp.path().join("a.txt"), b"hello").expect("write");
    symlink("a.txt", temp.path().join("b")).expect("symlink");

    let labels = FixedLabel::new("u:object_r:rootfs:s0");
    let mut records = walk::scan(temp.path(), 1, &labels).expect("scan");
    records.sort_by(|left, right| left.path().cmp(right.path()));

    let json = serde_json::to_value(&records).expect("serialize");
    let file = &json[0];
    assert!(file["path"].as_str().expect("path").ends_with("/a.txt"));
    assert!(file["linkPath"].is_null());
    assert_eq!(file["size"], 5);
    assert_eq!(file["selinuxContext"], "u:object_r:rootfs:s0");

    let link = &json[1];
    assert_eq!(link["linkPath"], "a.txt");
    assert_eq!(link["mode"].as_u64().expect("mode") & 0o170_000, 0o120_000);
}
